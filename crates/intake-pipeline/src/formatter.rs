use intake_types::{Brief, Summary};

const DESCRIPTION_PLACEHOLDER: &str =
    "This brief will be expanded as the intake conversation gathers more context.";
const PURPOSE_PLACEHOLDER: &str =
    "Clarify the project's purpose once additional details are collected.";
const TIMELINE_PLACEHOLDER: &str = "Timeline not specified yet.";

const EXPECTED_OUTCOMES_PLACEHOLDER: &[&str] = &[
    "Define success metrics that indicate adoption and impact.",
    "Identify measurable outcomes aligned with strategic goals.",
];
const BUSINESS_MODEL_PLACEHOLDER: &[&str] = &[
    "List revenue streams, partnerships, or resource requirements.",
    "Outline go-to-market considerations and support needs.",
];
const RISKS_PLACEHOLDER: &[&str] = &["Surface constraints, risks, and dependencies during intake."];
const TARGET_USERS_PLACEHOLDER: &[&str] = &["Define primary users with the intake agent."];
const DOCUMENTS_PLACEHOLDER: &[&str] = &["No supporting documents attached yet."];
const OPPORTUNITY_PLACEHOLDER: &[&str] = &[
    "Explore adjacent opportunities uncovered during discovery.",
    "Validate market demand and differentiation opportunities.",
];
const SUGGESTED_READS: &[&str] = &["Add foundational research or industry reports to guide the team."];
const IDEAS_BOARD: &[&str] = &["Capture brainstorm ideas and potential experiments here."];

/// Projects a `Summary` into the presentation brief
pub struct BriefFormatter;

impl BriefFormatter {
    /// Every brief field ends up non-empty: real values where the summary has
    /// them, fixed placeholders elsewhere.
    pub fn format(summary: &Summary) -> Brief {
        let expected_outcomes = list_or(&summary.success_metrics, EXPECTED_OUTCOMES_PLACEHOLDER);
        let success_metrics = if has_items(&summary.success_metrics) {
            clean(&summary.success_metrics)
        } else {
            expected_outcomes.clone()
        };

        Brief {
            project_title: text(Some(&summary.project_title))
                .unwrap_or(intake_types::DEFAULT_PROJECT_TITLE)
                .to_string(),
            project_description: text(summary.problem.as_ref())
                .or_else(|| text(summary.solution.as_ref()))
                .unwrap_or(DESCRIPTION_PLACEHOLDER)
                .to_string(),
            purpose: text(summary.solution.as_ref())
                .unwrap_or(PURPOSE_PLACEHOLDER)
                .to_string(),
            expected_outcomes,
            business_model: list_or(&summary.resources, BUSINESS_MODEL_PLACEHOLDER),
            constraints: list_or(&summary.constraints, RISKS_PLACEHOLDER),
            timeline: text(summary.timeline.as_ref())
                .unwrap_or(TIMELINE_PLACEHOLDER)
                .to_string(),
            target_users: list_or(&summary.target_users, TARGET_USERS_PLACEHOLDER),
            documents: list_or(&summary.documents, DOCUMENTS_PLACEHOLDER),
            opportunity_areas: list_or(&summary.opportunity_areas, OPPORTUNITY_PLACEHOLDER),
            suggested_reads: owned(SUGGESTED_READS),
            ideas_board: owned(IDEAS_BOARD),
            success_metrics,
        }
    }
}

fn text(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn has_items(values: &[String]) -> bool {
    values.iter().any(|v| !v.trim().is_empty())
}

fn clean(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn list_or(values: &[String], placeholder: &[&str]) -> Vec<String> {
    if has_items(values) {
        clean(values)
    } else {
        owned(placeholder)
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_total(brief: &Brief) {
        for (name, value) in brief.text_sections() {
            assert!(!value.trim().is_empty(), "{name} is empty");
        }
        for (name, values) in brief.list_sections() {
            assert!(!values.is_empty(), "{name} is empty");
            assert!(values.iter().all(|v| !v.trim().is_empty()), "{name} has blank items");
        }
    }

    #[test]
    fn test_empty_summary_formats_to_placeholders() {
        let brief = BriefFormatter::format(&Summary::default());
        assert_total(&brief);

        assert_eq!(brief.project_title, "Untitled Project");
        assert_eq!(brief.timeline, TIMELINE_PLACEHOLDER);
        assert_eq!(brief.documents, vec!["No supporting documents attached yet."]);
        assert_eq!(brief.success_metrics, brief.expected_outcomes);
    }

    #[test]
    fn test_blank_values_count_as_empty() {
        let summary = Summary {
            project_title: "  ".into(),
            problem: Some(" ".into()),
            target_users: vec!["".into()],
            ..Summary::default()
        };
        assert_total(&BriefFormatter::format(&summary));
    }

    #[test]
    fn test_populated_summary_uses_real_values() {
        let summary = Summary {
            project_title: "Beacon".into(),
            problem: Some("Volunteers churn".into()),
            solution: Some("Shift reminders".into()),
            success_metrics: vec!["Retention +20%".into()],
            timeline: Some("Pilot in Q3".into()),
            documents: vec!["Survey".into()],
            ..Summary::default()
        };
        let brief = BriefFormatter::format(&summary);
        assert_total(&brief);

        assert_eq!(brief.project_description, "Volunteers churn");
        assert_eq!(brief.purpose, "Shift reminders");
        assert_eq!(brief.expected_outcomes, vec!["Retention +20%"]);
        assert_eq!(brief.success_metrics, vec!["Retention +20%"]);
        assert_eq!(brief.timeline, "Pilot in Q3");
        assert_eq!(brief.documents, vec!["Survey"]);
    }

    #[test]
    fn test_description_falls_back_to_solution() {
        let summary = Summary {
            solution: Some("Shift reminders".into()),
            ..Summary::default()
        };
        assert_eq!(BriefFormatter::format(&summary).project_description, "Shift reminders");
    }
}
