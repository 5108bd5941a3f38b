//! View routing tests: which screen a visitor lands on, and dashboard tabs.

use dpr_portal::models::account::{CurrentUser, Role};
use dpr_portal::models::view::{AppView, DashboardTab, Page, ViewState, select_view};

fn user(role: Role) -> CurrentUser {
    CurrentUser {
        id: "u1".to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        role,
    }
}

#[test]
fn test_anonymous_visitors_see_login_unless_signup_requested() {
    assert_eq!(select_view(&ViewState::new(None, Page::Login)), AppView::Login);
    assert_eq!(select_view(&ViewState::new(None, Page::Dashboard)), AppView::Login);
    assert_eq!(select_view(&ViewState::new(None, Page::Signup)), AppView::Signup);
}

#[test]
fn test_signed_in_users_land_on_their_role_dashboard() {
    for page in [Page::Login, Page::Signup, Page::Dashboard] {
        assert_eq!(
            select_view(&ViewState::new(Some(user(Role::Organization)), page)),
            AppView::OrganizationDashboard
        );
        assert_eq!(
            select_view(&ViewState::new(Some(user(Role::Civilian)), page)),
            AppView::CivilianDashboard
        );
    }
}

#[test]
fn test_view_paths() {
    assert_eq!(AppView::Login.path(), "/login");
    assert_eq!(AppView::Signup.path(), "/signup");
    assert_eq!(AppView::CivilianDashboard.path(), "/dashboard");
    assert_eq!(AppView::OrganizationDashboard.path(), "/dashboard");
}

#[test]
fn test_dashboard_tab_from_query() {
    assert_eq!(DashboardTab::from_query(None), DashboardTab::Projects);
    assert_eq!(DashboardTab::from_query(Some("feedback")), DashboardTab::Feedback);
    assert_eq!(DashboardTab::from_query(Some("progress")), DashboardTab::Progress);
    assert_eq!(DashboardTab::from_query(Some(" all-feedback ")), DashboardTab::AllFeedback);
    assert_eq!(DashboardTab::from_query(Some("admin")), DashboardTab::Projects);
}

#[test]
fn test_dashboard_tab_slugs_round_trip() {
    for tab in DashboardTab::ALL {
        assert_eq!(DashboardTab::from_query(Some(tab.slug())), tab);
    }
}
