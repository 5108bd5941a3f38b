use serde::{Deserialize, Serialize};
use serde_json::Value;

/// AI risk scores attached to a DPR. The analysis service may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskScores {
    #[serde(default)]
    pub cost_overruns: Option<f64>,
    #[serde(default)]
    pub schedule_delays: Option<f64>,
    #[serde(default)]
    pub resource_shortages: Option<f64>,
    #[serde(default)]
    pub environmental_risks: Option<f64>,
}

impl RiskScores {
    /// Rows for display: label and formatted score ("N/A" when missing).
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let fmt = |v: Option<f64>| v.map(|s| format!("{s:.1}")).unwrap_or_else(|| "N/A".to_string());
        vec![
            ("Cost Overruns", fmt(self.cost_overruns)),
            ("Schedule Delays", fmt(self.schedule_delays)),
            ("Resource Shortages", fmt(self.resource_shortages)),
            ("Environmental", fmt(self.environmental_risks)),
        ]
    }
}

/// One row of the organization's DPR list.
#[derive(Debug, Clone, PartialEq)]
pub struct DprSummary {
    pub id: String,
    pub file_name: String,
    pub uploaded_at: String,
    pub project_title: String,
    pub completeness_score: Option<f64>,
    pub risk: RiskScores,
}

#[derive(Debug, Deserialize)]
struct RawDpr {
    #[serde(default)]
    id: String,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    uploaded_at: String,
    #[serde(default)]
    extracted_data: Value,
    #[serde(default)]
    enhanced_extraction: Value,
    #[serde(default)]
    completeness_score: Option<f64>,
    #[serde(default)]
    ai_risk_scores: Option<RiskScores>,
}

impl DprSummary {
    /// Decode the loosely-shaped DPR documents the dashboard endpoint returns.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let raw: RawDpr = serde_json::from_value(value)?;
        let project_title = project_title_of(&raw.enhanced_extraction)
            .or_else(|| project_title_of(&raw.extracted_data))
            .unwrap_or_else(|| "Untitled DPR".to_string());
        Ok(Self {
            id: raw.id,
            file_name: raw.file_name,
            uploaded_at: raw.uploaded_at,
            project_title,
            completeness_score: raw.completeness_score,
            risk: raw.ai_risk_scores.unwrap_or_default(),
        })
    }
}

fn project_title_of(section: &Value) -> Option<String> {
    section
        .get("project_title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// A file on its way to the upload endpoint.
#[derive(Debug, Clone)]
pub struct DprUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub uploaded_by: String,
    pub generate_reports: bool,
}

/// Decoded reply of a successful upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub dpr: Value,
    #[serde(default)]
    pub ai_risk_scores: Value,
    #[serde(default)]
    pub recommendations: Vec<Value>,
    #[serde(default)]
    pub completeness_score: Option<f64>,
    #[serde(default)]
    pub reports: Value,
}

impl UploadResult {
    pub fn project_title(&self) -> Option<String> {
        self.dpr
            .get("enhanced_extraction")
            .and_then(project_title_of)
            .or_else(|| self.dpr.get("extracted_data").and_then(project_title_of))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_prefers_enhanced_title() {
        let s = DprSummary::from_value(json!({
            "id": "d1",
            "file_name": "bridges.pdf",
            "uploaded_at": "2025-09-01T08:00:00",
            "extracted_data": {"project_title": "Old"},
            "enhanced_extraction": {"project_title": "Bridge Strengthening"},
            "completeness_score": 82.5,
            "ai_risk_scores": {"cost_overruns": 0.4}
        }))
        .unwrap();
        assert_eq!(s.project_title, "Bridge Strengthening");
        assert_eq!(s.completeness_score, Some(82.5));
        assert_eq!(s.risk.rows()[0].1, "0.4");
        assert_eq!(s.risk.rows()[1].1, "N/A");
    }

    #[test]
    fn summary_tolerates_missing_sections() {
        let s = DprSummary::from_value(json!({"id": "d2", "ai_risk_scores": {}})).unwrap();
        assert_eq!(s.project_title, "Untitled DPR");
        assert_eq!(s.risk, RiskScores::default());
    }

    #[test]
    fn upload_result_title() {
        let r: UploadResult = serde_json::from_value(json!({
            "dpr": {"extracted_data": {"project_title": "School Block"}},
            "completeness_score": 70.0
        }))
        .unwrap();
        assert_eq!(r.project_title().as_deref(), Some("School Block"));
        assert!(r.recommendations.is_empty());
    }
}
