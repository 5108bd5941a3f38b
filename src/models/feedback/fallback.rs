use super::types::FeedbackRecord;

/// Literal shape of a sample record, so the fixture can be a `const`.
#[derive(Debug, Clone, Copy)]
pub struct SampleFeedback {
    pub id: &'static str,
    pub project_id: &'static str,
    pub project_title: &'static str,
    pub author_id: &'static str,
    pub author_name: &'static str,
    pub content: &'static str,
    pub submitted_at: &'static str,
    pub liked_by: &'static [&'static str],
    pub disliked_by: &'static [&'static str],
}

impl SampleFeedback {
    pub fn to_record(&self) -> FeedbackRecord {
        FeedbackRecord {
            id: self.id.to_string(),
            project_id: self.project_id.to_string(),
            project_title: self.project_title.to_string(),
            author_id: self.author_id.to_string(),
            author_name: self.author_name.to_string(),
            content: self.content.to_string(),
            submitted_at: self.submitted_at.to_string(),
            like_count: self.liked_by.len() as u32,
            dislike_count: self.disliked_by.len() as u32,
            liked_by: self.liked_by.iter().map(|s| s.to_string()).collect(),
            disliked_by: self.disliked_by.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Shown in place of the live list whenever it cannot be fetched.
pub const FALLBACK_FEEDBACK: [SampleFeedback; 2] = [
    SampleFeedback {
        id: "1",
        project_id: "dpr1",
        project_title: "Rural Road Development Project",
        author_id: "user1",
        author_name: "John Citizen",
        content: "This project will greatly benefit our community. I hope it gets approved soon!",
        submitted_at: "2025-10-01T10:30:00Z",
        liked_by: &["user2", "user3", "user4", "user5", "user6"],
        disliked_by: &["user7"],
    },
    SampleFeedback {
        id: "2",
        project_id: "dpr2",
        project_title: "School Building Project",
        author_id: "user2",
        author_name: "Jane Resident",
        content: "I have concerns about the environmental impact of this project. \
                  Please consider a more eco-friendly approach.",
        submitted_at: "2025-09-28T14:15:00Z",
        liked_by: &["user1", "user3", "user4", "user5", "user6", "user8", "user9", "user10"],
        disliked_by: &["user11", "user12"],
    },
];

pub fn fallback_records() -> Vec<FeedbackRecord> {
    FALLBACK_FEEDBACK.iter().map(SampleFeedback::to_record).collect()
}
