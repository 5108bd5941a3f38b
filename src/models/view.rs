use crate::models::account::{CurrentUser, Role};

/// The page a request asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Signup,
    Dashboard,
}

/// Everything view selection depends on, gathered per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub user: Option<CurrentUser>,
    pub requested: Page,
}

impl ViewState {
    pub fn new(user: Option<CurrentUser>, requested: Page) -> Self {
        Self { user, requested }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Login,
    Signup,
    OrganizationDashboard,
    CivilianDashboard,
}

impl AppView {
    pub fn path(self) -> &'static str {
        match self {
            AppView::Login => "/login",
            AppView::Signup => "/signup",
            AppView::OrganizationDashboard | AppView::CivilianDashboard => "/dashboard",
        }
    }
}

/// Signed-in users always land on their role's dashboard; anonymous users
/// see the signup form only when they ask for it.
pub fn select_view(state: &ViewState) -> AppView {
    match (&state.user, state.requested) {
        (Some(user), _) => match user.role {
            Role::Organization => AppView::OrganizationDashboard,
            Role::Civilian => AppView::CivilianDashboard,
        },
        (None, Page::Signup) => AppView::Signup,
        (None, Page::Login | Page::Dashboard) => AppView::Login,
    }
}

/// Tabs of the civilian dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Projects,
    Feedback,
    Progress,
    AllFeedback,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Projects,
        DashboardTab::Feedback,
        DashboardTab::Progress,
        DashboardTab::AllFeedback,
    ];

    /// Unknown or missing values fall back to the projects tab.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("feedback") => DashboardTab::Feedback,
            Some("progress") => DashboardTab::Progress,
            Some("all-feedback") => DashboardTab::AllFeedback,
            _ => DashboardTab::Projects,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            DashboardTab::Projects => "projects",
            DashboardTab::Feedback => "feedback",
            DashboardTab::Progress => "progress",
            DashboardTab::AllFeedback => "all-feedback",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::Projects => "Approved Projects",
            DashboardTab::Feedback => "Give Feedback",
            DashboardTab::Progress => "Track Progress",
            DashboardTab::AllFeedback => "Community Feedback",
        }
    }
}
