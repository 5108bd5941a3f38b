use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A citizen comment on a project, as last reported by the feedback service.
///
/// Field names on the wire follow the backend (`dpr_id`, `civilian_id`,
/// `likes`, ...). Everything but `id` defaults so partial snapshots decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    #[serde(rename = "dpr_id", default)]
    pub project_id: String,
    #[serde(default)]
    pub project_title: String,
    #[serde(rename = "civilian_id", default)]
    pub author_id: String,
    #[serde(rename = "civilian_name", default)]
    pub author_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub submitted_at: String,
    #[serde(rename = "likes_count", default)]
    pub like_count: u32,
    #[serde(rename = "dislikes_count", default)]
    pub dislike_count: u32,
    #[serde(rename = "likes", alias = "likedBy", default)]
    pub liked_by: Vec<String>,
    #[serde(rename = "dislikes", alias = "dislikedBy", default)]
    pub disliked_by: Vec<String>,
}

impl FeedbackRecord {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|u| u == user_id)
    }

    pub fn is_disliked_by(&self, user_id: &str) -> bool {
        self.disliked_by.iter().any(|u| u == user_id)
    }

    /// The vote `user_id` currently holds on this record, if any.
    pub fn vote_of(&self, user_id: &str) -> Option<VoteDirection> {
        if self.is_liked_by(user_id) {
            Some(VoteDirection::Like)
        } else if self.is_disliked_by(user_id) {
            Some(VoteDirection::Dislike)
        } else {
            None
        }
    }

    /// `submitted_at` formatted for display. The backend emits naive UTC
    /// timestamps, sometimes with fractional seconds; anything unparseable is
    /// shown as received.
    pub fn submitted_display(&self) -> String {
        let raw = self.submitted_at.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        raw.to_string()
    }
}

/// Which mutation endpoint a vote goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Like,
    Dislike,
}

impl VoteDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Like => "like",
            VoteDirection::Dislike => "dislike",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(VoteDirection::Like),
            "dislike" => Ok(VoteDirection::Dislike),
            other => Err(format!("Unknown vote direction '{other}'")),
        }
    }
}

/// Body of a like/dislike request.
#[derive(Debug, Clone, Serialize)]
pub struct VoteRequest<'a> {
    pub user_id: &'a str,
}

/// Body of a feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFeedback {
    pub project: String,
    pub rating: u8,
    pub comments: String,
}

/// Form input for submitting feedback from the civilian dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackForm {
    pub project: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comments: String,
    pub csrf_token: String,
}

impl FeedbackForm {
    /// Validate and convert into the request body; returns every problem found.
    pub fn validate(&self) -> Result<NewFeedback, Vec<String>> {
        let mut errors = Vec::new();
        let project = self.project.trim();
        let comments = self.comments.trim();
        if project.is_empty() {
            errors.push("Please choose a project".to_string());
        }
        if !(1..=5).contains(&self.rating) {
            errors.push("Please give a rating between 1 and 5 stars".to_string());
        }
        if comments.is_empty() {
            errors.push("Comments are required".to_string());
        } else if comments.len() > 2000 {
            errors.push("Comments must be at most 2000 characters".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewFeedback {
            project: project.to_string(),
            rating: self.rating,
            comments: comments.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_shape() {
        let json = r#"{
            "id": "652f1c",
            "dpr_id": "dpr9",
            "project_title": "Bridge Repair",
            "civilian_id": "u1",
            "civilian_name": "Asha",
            "content": "Please fix the railing first.",
            "submitted_at": "2025-10-01T10:30:00.123000",
            "likes": ["u2", "u3"],
            "dislikes": [],
            "likes_count": 2,
            "dislikes_count": 0
        }"#;
        let fb: FeedbackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fb.project_id, "dpr9");
        assert_eq!(fb.author_name, "Asha");
        assert_eq!(fb.like_count, 2);
        assert_eq!(fb.liked_by, vec!["u2", "u3"]);
        assert_eq!(fb.submitted_display(), "2025-10-01 10:30");
    }

    #[test]
    fn decodes_partial_snapshot_with_camel_case_voters() {
        let json = r#"{"id":"fb1","likes_count":6,"likedBy":["u1","u9"]}"#;
        let fb: FeedbackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fb.like_count, 6);
        assert!(fb.is_liked_by("u9"));
        assert!(fb.disliked_by.is_empty());
        assert_eq!(fb.content, "");
    }

    #[test]
    fn missing_id_is_a_decode_error() {
        assert!(serde_json::from_str::<FeedbackRecord>(r#"{"content":"x"}"#).is_err());
    }

    #[test]
    fn vote_of_reports_membership() {
        let fb = FeedbackRecord {
            id: "1".into(),
            project_id: String::new(),
            project_title: String::new(),
            author_id: String::new(),
            author_name: String::new(),
            content: String::new(),
            submitted_at: "not a date".into(),
            like_count: 1,
            dislike_count: 1,
            liked_by: vec!["a".into()],
            disliked_by: vec!["b".into()],
        };
        assert_eq!(fb.vote_of("a"), Some(VoteDirection::Like));
        assert_eq!(fb.vote_of("b"), Some(VoteDirection::Dislike));
        assert_eq!(fb.vote_of("c"), None);
        assert_eq!(fb.submitted_display(), "not a date");
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("Like".parse::<VoteDirection>(), Ok(VoteDirection::Like));
        assert_eq!("dislike".parse::<VoteDirection>(), Ok(VoteDirection::Dislike));
        assert!("love".parse::<VoteDirection>().is_err());
    }

    #[test]
    fn feedback_form_collects_all_errors() {
        let form = FeedbackForm {
            project: " ".into(),
            rating: 0,
            comments: "".into(),
            csrf_token: "t".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 3);

        let ok = FeedbackForm {
            project: "Water Supply System".into(),
            rating: 5,
            comments: "  Water quality has improved.  ".into(),
            csrf_token: "t".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.comments, "Water quality has improved.");
    }
}
