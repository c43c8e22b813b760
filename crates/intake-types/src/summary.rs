use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT_TITLE: &str = "Untitled Project";

/// Structured facts extracted from the conversation so far.
///
/// A new `Summary` is produced on every extraction and replaces the previous
/// one for the thread; it is never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default = "default_project_title")]
    pub project_title: String,
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub target_users: Vec<String>,
    #[serde(default)]
    pub success_metrics: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub opportunity_areas: Vec<String>,
}

fn default_project_title() -> String {
    DEFAULT_PROJECT_TITLE.to_string()
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            project_title: default_project_title(),
            problem: None,
            solution: None,
            target_users: Vec::new(),
            success_metrics: Vec::new(),
            constraints: Vec::new(),
            timeline: None,
            resources: Vec::new(),
            documents: Vec::new(),
            opportunity_areas: Vec::new(),
        }
    }
}

impl Summary {
    /// True when the field carries no usable information yet
    pub fn is_missing(&self, field: SummaryField) -> bool {
        match field {
            SummaryField::ProjectTitle => {
                let title = self.project_title.trim();
                title.is_empty() || title == DEFAULT_PROJECT_TITLE
            }
            SummaryField::Problem => text_missing(&self.problem),
            SummaryField::Solution => text_missing(&self.solution),
            SummaryField::Timeline => text_missing(&self.timeline),
            SummaryField::TargetUsers => list_missing(&self.target_users),
            SummaryField::SuccessMetrics => list_missing(&self.success_metrics),
            SummaryField::Constraints => list_missing(&self.constraints),
            SummaryField::Resources => list_missing(&self.resources),
        }
    }

    /// Fields that are set, in priority order
    pub fn captured_fields(&self) -> Vec<SummaryField> {
        SummaryField::ALL
            .into_iter()
            .filter(|field| !self.is_missing(*field))
            .collect()
    }

    /// Fields that are still unset, in priority order
    pub fn missing_fields(&self) -> Vec<SummaryField> {
        SummaryField::ALL
            .into_iter()
            .filter(|field| self.is_missing(*field))
            .collect()
    }
}

fn text_missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn list_missing(values: &[String]) -> bool {
    values.iter().all(|v| v.trim().is_empty())
}

/// The eight informational fields the intake tries to fill.
///
/// Variant order is the fixed question priority (1 = ask first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryField {
    ProjectTitle,
    Problem,
    Solution,
    TargetUsers,
    SuccessMetrics,
    Timeline,
    Constraints,
    Resources,
}

impl SummaryField {
    pub const ALL: [SummaryField; 8] = [
        SummaryField::ProjectTitle,
        SummaryField::Problem,
        SummaryField::Solution,
        SummaryField::TargetUsers,
        SummaryField::SuccessMetrics,
        SummaryField::Timeline,
        SummaryField::Constraints,
        SummaryField::Resources,
    ];

    pub fn priority(&self) -> u8 {
        match self {
            SummaryField::ProjectTitle => 1,
            SummaryField::Problem => 2,
            SummaryField::Solution => 3,
            SummaryField::TargetUsers => 4,
            SummaryField::SuccessMetrics => 5,
            SummaryField::Timeline => 6,
            SummaryField::Constraints => 7,
            SummaryField::Resources => 8,
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            SummaryField::ProjectTitle => "What is the working title or name of the project?",
            SummaryField::Problem => "What problem or opportunity are you addressing?",
            SummaryField::Solution => "How will you solve the problem or deliver value?",
            SummaryField::TargetUsers => "Who are the primary users or stakeholders?",
            SummaryField::SuccessMetrics => "How will you measure success?",
            SummaryField::Timeline => "What is the timeline or key milestones?",
            SummaryField::Constraints => "Are there any constraints, risks, or dependencies?",
            SummaryField::Resources => "What resources, documents, or tools do you have?",
        }
    }

    /// Wire name, matching the serialized `Summary` keys
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryField::ProjectTitle => "project_title",
            SummaryField::Problem => "problem",
            SummaryField::Solution => "solution",
            SummaryField::TargetUsers => "target_users",
            SummaryField::SuccessMetrics => "success_metrics",
            SummaryField::Timeline => "timeline",
            SummaryField::Constraints => "constraints",
            SummaryField::Resources => "resources",
        }
    }

    /// Human readable name used in assistant messages
    pub fn label(&self) -> &'static str {
        match self {
            SummaryField::ProjectTitle => "the project title",
            SummaryField::Problem => "the problem",
            SummaryField::Solution => "the solution",
            SummaryField::TargetUsers => "the target users",
            SummaryField::SuccessMetrics => "success metrics",
            SummaryField::Timeline => "the timeline",
            SummaryField::Constraints => "constraints",
            SummaryField::Resources => "resources",
        }
    }
}

impl std::fmt::Display for SummaryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
