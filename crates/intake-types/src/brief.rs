use serde::{Deserialize, Serialize};

/// User-facing project brief, regenerated in full from a `Summary` on every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    pub project_title: String,
    pub project_description: String,
    pub purpose: String,
    pub expected_outcomes: Vec<String>,
    pub business_model: Vec<String>,
    pub constraints: Vec<String>,
    pub timeline: String,
    pub target_users: Vec<String>,
    pub documents: Vec<String>,
    pub opportunity_areas: Vec<String>,
    pub suggested_reads: Vec<String>,
    pub ideas_board: Vec<String>,
    pub success_metrics: Vec<String>,
}

impl Brief {
    /// Every text section in declaration order, for totality checks
    pub fn text_sections(&self) -> [(&'static str, &str); 4] {
        [
            ("project_title", self.project_title.as_str()),
            ("project_description", self.project_description.as_str()),
            ("purpose", self.purpose.as_str()),
            ("timeline", self.timeline.as_str()),
        ]
    }

    /// Every list section in declaration order, for totality checks
    pub fn list_sections(&self) -> [(&'static str, &[String]); 9] {
        [
            ("expected_outcomes", self.expected_outcomes.as_slice()),
            ("business_model", self.business_model.as_slice()),
            ("constraints", self.constraints.as_slice()),
            ("target_users", self.target_users.as_slice()),
            ("documents", self.documents.as_slice()),
            ("opportunity_areas", self.opportunity_areas.as_slice()),
            ("suggested_reads", self.suggested_reads.as_slice()),
            ("ideas_board", self.ideas_board.as_slice()),
            ("success_metrics", self.success_metrics.as_slice()),
        ]
    }
}
