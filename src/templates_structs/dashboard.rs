use askama::Template;

use super::PageContext;
use crate::models::dpr::DprSummary;
use crate::models::feedback::FeedbackRecord;
use crate::models::project::{ApprovedProject, Phase, PhaseStatus};
use crate::models::view::DashboardTab;

/// A feedback record prepared for display to one viewer.
pub struct FeedbackRow {
    pub id: String,
    pub project_title: String,
    pub author_name: String,
    pub author_initial: String,
    pub content: String,
    pub submitted: String,
    pub like_count: u32,
    pub dislike_count: u32,
    pub liked: bool,
    pub disliked: bool,
}

impl FeedbackRow {
    pub fn from_record(record: &FeedbackRecord, viewer_id: &str) -> Self {
        let author_name = if record.author_name.trim().is_empty() {
            "Unknown User".to_string()
        } else {
            record.author_name.clone()
        };
        Self {
            id: record.id.clone(),
            project_title: record.project_title.clone(),
            author_initial: author_name.chars().next().unwrap_or('?').to_uppercase().to_string(),
            author_name,
            content: record.content.clone(),
            submitted: record.submitted_display(),
            like_count: record.like_count,
            dislike_count: record.dislike_count,
            liked: record.is_liked_by(viewer_id),
            disliked: record.is_disliked_by(viewer_id),
        }
    }
}

pub struct TabLink {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

impl TabLink {
    pub fn all(active: DashboardTab) -> Vec<Self> {
        DashboardTab::ALL
            .iter()
            .map(|&tab| TabLink { slug: tab.slug(), label: tab.label(), active: tab == active })
            .collect()
    }
}

pub struct ProjectCard {
    pub title: &'static str,
    pub summary: &'static str,
    pub status: &'static str,
    pub location: &'static str,
    pub budget: &'static str,
    pub completion: u8,
    pub period: String,
}

impl From<&ApprovedProject> for ProjectCard {
    fn from(p: &ApprovedProject) -> Self {
        Self {
            title: p.title,
            summary: p.summary,
            status: p.status,
            location: p.location,
            budget: p.budget,
            completion: p.completion,
            period: format!("{} to {}", p.start_date, p.end_date),
        }
    }
}

pub struct TimelineRow {
    pub name: &'static str,
    pub date: &'static str,
    pub css_class: &'static str,
    pub label: &'static str,
}

impl From<&Phase> for TimelineRow {
    fn from(p: &Phase) -> Self {
        Self {
            name: p.name,
            date: p.date,
            css_class: p.status.css_class(),
            label: match p.status {
                PhaseStatus::Completed => "Completed",
                PhaseStatus::InProgress => "In progress",
                PhaseStatus::Pending => "Pending",
            },
        }
    }
}

pub struct RiskRow {
    pub label: &'static str,
    pub value: String,
}

pub struct DprRow {
    pub project_title: String,
    pub file_name: String,
    pub uploaded_at: String,
    pub completeness: String,
    pub risks: Vec<RiskRow>,
}

impl From<DprSummary> for DprRow {
    fn from(d: DprSummary) -> Self {
        Self {
            risks: d
                .risk
                .rows()
                .into_iter()
                .map(|(label, value)| RiskRow { label, value })
                .collect(),
            project_title: d.project_title,
            file_name: d.file_name,
            uploaded_at: d.uploaded_at,
            completeness: d
                .completeness_score
                .map(|s| format!("{s:.0}%"))
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[derive(Template)]
#[template(path = "organization_dashboard.html")]
pub struct OrganizationDashboardTemplate {
    pub ctx: PageContext,
    pub feedback: Vec<FeedbackRow>,
    pub showing_samples: bool,
    pub total_likes: u32,
    pub total_dislikes: u32,
    pub dprs: Vec<DprRow>,
    pub dpr_error: Option<String>,
}

#[derive(Template)]
#[template(path = "civilian_dashboard.html")]
pub struct CivilianDashboardTemplate {
    pub ctx: PageContext,
    pub tabs: Vec<TabLink>,
    pub active_tab: &'static str,
    pub projects: Vec<ProjectCard>,
    pub timeline: Vec<TimelineRow>,
    pub feedback: Vec<FeedbackRow>,
    pub showing_samples: bool,
}
