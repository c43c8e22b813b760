//! Deterministic, dependency-free extraction used whenever the semantic
//! service is unavailable or its answer cannot be used.

use intake_types::{Summary, SummaryField, DEFAULT_PROJECT_TITLE};

const TITLE_MARKERS: [&str; 4] = ["project called", "project name is", "initiative", "product"];
const TITLE_MAX_CHARS: usize = 120;

const KEYWORDS: [(SummaryField, &[&str]); 7] = [
    (SummaryField::Problem, &["problem", "challenge", "pain", "issue", "need"]),
    (SummaryField::Solution, &["solution", "approach", "strategy", "idea"]),
    (SummaryField::TargetUsers, &["user", "audience", "customer", "stakeholder"]),
    (SummaryField::SuccessMetrics, &["success", "metric", "kpi", "measure"]),
    (
        SummaryField::Constraints,
        &["constraint", "risk", "concern", "dependency", "limitation"],
    ),
    (SummaryField::Timeline, &["timeline", "deadline", "milestone", "schedule"]),
    (
        SummaryField::Resources,
        &["resource", "document", "tool", "asset", "reference"],
    ),
];

pub fn extract(raw_text: &str, document_names: &[String]) -> Summary {
    let sentences = sentences(raw_text);
    let mut summary = Summary {
        project_title: extract_title(raw_text, &sentences)
            .unwrap_or_else(|| DEFAULT_PROJECT_TITLE.to_string()),
        documents: document_names.to_vec(),
        ..Summary::default()
    };

    for (field, keywords) in KEYWORDS {
        let Some(sentence) = first_sentence_with(&sentences, keywords) else {
            continue;
        };
        match field {
            SummaryField::Problem => summary.problem = Some(sentence.to_string()),
            SummaryField::Solution => summary.solution = Some(sentence.to_string()),
            SummaryField::Timeline => summary.timeline = Some(sentence.to_string()),
            SummaryField::TargetUsers => summary.target_users = split_list(sentence),
            SummaryField::SuccessMetrics => summary.success_metrics = split_list(sentence),
            SummaryField::Constraints => summary.constraints = split_list(sentence),
            SummaryField::Resources => summary.resources = split_list(sentence),
            SummaryField::ProjectTitle => {}
        }
    }

    if summary.resources.is_empty() {
        summary.resources = document_names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }

    summary.opportunity_areas = derive_opportunity_areas(&summary);
    summary
}

/// Sentences split on periods and newlines, trimmed, empties dropped
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn extract_title(raw_text: &str, sentences: &[&str]) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `raw_text`
    let lowered = raw_text.to_ascii_lowercase();
    for marker in TITLE_MARKERS {
        let Some(idx) = lowered.find(marker) else {
            continue;
        };
        let rest = &raw_text[idx + marker.len()..];
        let line = rest.split('\n').next().unwrap_or_default();
        let title = line.trim_matches(|c: char| c.is_whitespace() || c == ':');
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }

    let first = sentences.first()?;
    if first.split_whitespace().count() > 3 {
        let title: String = first.chars().take(TITLE_MAX_CHARS).collect();
        return Some(title.trim().to_string());
    }
    None
}

fn first_sentence_with<'a>(sentences: &[&'a str], keywords: &[&str]) -> Option<&'a str> {
    sentences.iter().copied().find(|sentence| {
        let lowered = sentence.to_lowercase();
        keywords.iter().any(|keyword| lowered.contains(keyword))
    })
}

/// Split on `;`, `,`, newline and the literal " and ", stripping bullets
pub fn split_list(text: &str) -> Vec<String> {
    text.replace(" and ", ";")
        .split([';', ',', '\n'])
        .map(|item| item.trim_start_matches(|c: char| c == '-' || c == '•' || c.is_whitespace()))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Opportunity areas implied by the other facts, in fixed order
pub fn derive_opportunity_areas(summary: &Summary) -> Vec<String> {
    if summary.opportunity_areas.iter().any(|area| !area.trim().is_empty()) {
        return summary.opportunity_areas.clone();
    }

    let mut areas = Vec::new();
    if let Some(solution) = present(&summary.solution) {
        areas.push(format!("Deliver the solution: {solution}"));
    }
    if let Some(problem) = present(&summary.problem) {
        areas.push(format!("Address the problem: {problem}"));
    }
    if !summary.is_missing(SummaryField::TargetUsers) {
        areas.push(format!("Delight {}", summary.target_users.join(", ")));
    }
    areas
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_level_matches_are_exact() {
        let raw = "We have a problem with onboarding. Our solution is a guided checklist. Target users are new hires.";
        let summary = extract(raw, &[]);

        assert_eq!(summary.problem.as_deref(), Some("We have a problem with onboarding"));
        assert_eq!(summary.solution.as_deref(), Some("Our solution is a guided checklist"));
        assert_eq!(summary.target_users, vec!["Target users are new hires".to_string()]);
        assert_eq!(summary.project_title, "We have a problem with onboarding");
        assert!(summary.timeline.is_none());
        assert!(summary.resources.is_empty());
    }

    #[test]
    fn test_title_follows_first_marker_up_to_newline() {
        let raw = "Our project called: Beacon Hub \nIt helps volunteers.";
        let summary = extract(raw, &[]);
        assert_eq!(summary.project_title, "Beacon Hub");
    }

    #[test]
    fn test_title_marker_is_case_insensitive() {
        let summary = extract("The Project Name Is Atlas", &[]);
        assert_eq!(summary.project_title, "Atlas");
    }

    #[test]
    fn test_empty_marker_remainder_is_not_a_match() {
        // "product" ends the line, so the first sentence is used instead
        let summary = extract("We are building a new product:\nMore later", &[]);
        assert_eq!(summary.project_title, "We are building a new product:");
    }

    #[test]
    fn test_short_first_sentence_leaves_default_title() {
        let summary = extract("Hello there. We need help.", &[]);
        assert_eq!(summary.project_title, DEFAULT_PROJECT_TITLE);
    }

    #[test]
    fn test_long_first_sentence_is_truncated() {
        let raw = "word ".repeat(60);
        let summary = extract(&raw, &[]);
        assert_eq!(summary.project_title.chars().count(), 119);
    }

    #[test]
    fn test_list_fields_split_on_separators() {
        assert_eq!(
            split_list("- Coordinators, donors and • volunteers; board members"),
            vec!["Coordinators", "donors", "volunteers", "board members"]
        );
        assert!(split_list(" ; , ").is_empty());
    }

    #[test]
    fn test_documents_fill_missing_resources() {
        let docs = vec!["Budget.xlsx".to_string(), "Survey results".to_string()];
        let summary = extract("Nothing relevant here at all", &docs);

        assert_eq!(summary.resources, docs);
        assert_eq!(summary.documents, docs);
    }

    #[test]
    fn test_document_names_with_separators_stay_whole() {
        let docs = vec![
            "Budget, Q3 draft".to_string(),
            "Terms and conditions".to_string(),
            "  ".to_string(),
        ];
        let summary = extract("Nothing relevant here at all", &docs);

        assert_eq!(
            summary.resources,
            vec!["Budget, Q3 draft".to_string(), "Terms and conditions".to_string()]
        );
    }

    #[test]
    fn test_keyword_resources_win_over_documents() {
        let docs = vec!["Budget.xlsx".to_string()];
        let summary = extract("We can reuse the design tool", &docs);
        assert_eq!(summary.resources, vec!["We can reuse the design tool".to_string()]);
    }

    #[test]
    fn test_opportunity_areas_are_derived_in_fixed_order() {
        let raw = "The challenge is churn. Our approach is a loyalty app. Customers and partners benefit.";
        let summary = extract(raw, &[]);

        assert_eq!(
            summary.opportunity_areas,
            vec![
                "Deliver the solution: Our approach is a loyalty app".to_string(),
                "Address the problem: The challenge is churn".to_string(),
                "Delight Customers, partners benefit".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_text_yields_default_summary() {
        let summary = extract("", &[]);
        assert_eq!(summary, Summary::default());
    }
}
