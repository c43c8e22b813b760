use chrono::{DateTime, Utc};
use intake_types::{QuestionItem, Summary, SummaryField};

/// Tracks outstanding questions, one per missing summary field
pub struct QuestionScheduler;

impl QuestionScheduler {
    /// One unasked item per missing field, in fixed priority order
    pub fn build_queue(summary: &Summary) -> Vec<QuestionItem> {
        summary
            .missing_fields()
            .into_iter()
            .map(QuestionItem::for_field)
            .collect()
    }

    /// Rebuild the queue from `new`, carrying `asked` forward.
    ///
    /// Fields answered in `new` drop out of the queue regardless of their
    /// previous `asked` flag.
    pub fn update(
        previous: Option<&Summary>,
        new: &Summary,
        previous_queue: &[QuestionItem],
    ) -> Vec<QuestionItem> {
        let mut queue = Self::build_queue(new);
        for item in queue.iter_mut() {
            if let Some(prev) = previous_queue
                .iter()
                .find(|prev| prev.field == item.field && prev.asked)
            {
                item.asked = true;
                item.asked_at = prev.asked_at;
            }
        }

        let answered = Self::newly_captured(previous, new);
        if !answered.is_empty() {
            tracing::debug!(
                answered = ?answered,
                outstanding = queue.len(),
                "Question queue updated"
            );
        }
        queue
    }

    /// Up to `max` unasked items by ascending priority
    pub fn select_next(queue: &[QuestionItem], max: usize) -> Vec<QuestionItem> {
        let mut unasked: Vec<&QuestionItem> = queue.iter().filter(|item| !item.asked).collect();
        unasked.sort_by_key(|item| item.priority);
        unasked.into_iter().take(max).cloned().collect()
    }

    pub fn mark_asked(queue: &mut [QuestionItem], fields: &[SummaryField], at: DateTime<Utc>) {
        for item in queue.iter_mut().filter(|item| fields.contains(&item.field)) {
            item.mark_asked(at);
        }
    }

    /// Fields set in `new` that were missing before (all set fields on a fresh thread)
    pub fn newly_captured(previous: Option<&Summary>, new: &Summary) -> Vec<SummaryField> {
        new.captured_fields()
            .into_iter()
            .filter(|field| previous.map_or(true, |prev| prev.is_missing(*field)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_missing(missing: &[SummaryField]) -> Summary {
        let mut summary = Summary {
            project_title: "Beacon".into(),
            problem: Some("Volunteers churn".into()),
            solution: Some("Shift reminders".into()),
            target_users: vec!["Coordinators".into()],
            success_metrics: vec!["Retention".into()],
            constraints: vec!["Budget".into()],
            timeline: Some("Q3".into()),
            resources: vec!["Survey".into()],
            ..Summary::default()
        };
        for field in missing {
            match field {
                SummaryField::ProjectTitle => summary.project_title = String::new(),
                SummaryField::Problem => summary.problem = None,
                SummaryField::Solution => summary.solution = None,
                SummaryField::TargetUsers => summary.target_users.clear(),
                SummaryField::SuccessMetrics => summary.success_metrics.clear(),
                SummaryField::Constraints => summary.constraints.clear(),
                SummaryField::Timeline => summary.timeline = None,
                SummaryField::Resources => summary.resources.clear(),
            }
        }
        summary
    }

    fn fields(items: &[QuestionItem]) -> Vec<SummaryField> {
        items.iter().map(|item| item.field).collect()
    }

    #[test]
    fn test_build_queue_covers_missing_fields_in_priority_order() {
        let queue = QuestionScheduler::build_queue(&Summary::default());
        assert_eq!(fields(&queue), SummaryField::ALL.to_vec());
        assert!(queue.iter().all(|item| !item.asked));
        assert_eq!(queue[0].question, "What is the working title or name of the project?");
    }

    #[test]
    fn test_select_next_picks_lowest_priority_numbers() {
        let summary = summary_missing(&[
            SummaryField::Resources,
            SummaryField::Timeline,
            SummaryField::Problem,
        ]);
        let selected = QuestionScheduler::select_next(&QuestionScheduler::build_queue(&summary), 2);
        assert_eq!(fields(&selected), vec![SummaryField::Problem, SummaryField::Timeline]);
    }

    #[test]
    fn test_select_next_skips_asked_items() {
        let mut queue = QuestionScheduler::build_queue(&Summary::default());
        QuestionScheduler::mark_asked(
            &mut queue,
            &[SummaryField::ProjectTitle, SummaryField::Problem],
            Utc::now(),
        );
        let selected = QuestionScheduler::select_next(&queue, 2);
        assert_eq!(fields(&selected), vec![SummaryField::Solution, SummaryField::TargetUsers]);
    }

    #[test]
    fn test_answered_question_is_removed_even_if_asked() {
        let previous = summary_missing(&[SummaryField::Solution, SummaryField::Timeline]);
        let mut previous_queue = QuestionScheduler::build_queue(&previous);
        QuestionScheduler::mark_asked(&mut previous_queue, &[SummaryField::Solution], Utc::now());

        let new = summary_missing(&[SummaryField::Timeline]);
        let queue = QuestionScheduler::update(Some(&previous), &new, &previous_queue);

        assert_eq!(fields(&queue), vec![SummaryField::Timeline]);
    }

    #[test]
    fn test_update_carries_asked_flag_and_timestamp() {
        let asked_at = Utc::now();
        let summary = summary_missing(&[SummaryField::Constraints, SummaryField::Resources]);
        let mut previous_queue = QuestionScheduler::build_queue(&summary);
        QuestionScheduler::mark_asked(&mut previous_queue, &[SummaryField::Constraints], asked_at);

        let queue = QuestionScheduler::update(Some(&summary), &summary, &previous_queue);

        assert!(queue[0].asked);
        assert_eq!(queue[0].asked_at, Some(asked_at));
        assert!(!queue[1].asked);
        assert!(queue[1].asked_at.is_none());
    }

    #[test]
    fn test_newly_captured_compares_against_previous_summary() {
        let previous = summary_missing(&[SummaryField::Solution, SummaryField::Timeline]);
        let new = summary_missing(&[SummaryField::Timeline]);
        assert_eq!(
            QuestionScheduler::newly_captured(Some(&previous), &new),
            vec![SummaryField::Solution]
        );
        assert_eq!(
            QuestionScheduler::newly_captured(None, &new).len(),
            SummaryField::ALL.len() - 1
        );
    }
}
