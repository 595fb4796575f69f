//! Per-category breakdown of an evaluated document.

use serde::{Deserialize, Serialize};

use crate::engine::Evaluation;
use crate::model::{Category, ConfigurationDocument};

/// What one category contributed to an answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    /// Entries present in the document.
    pub entries: usize,
    /// Findings the category produced.
    pub findings: usize,
    /// Points awarded by those findings.
    pub points_awarded: i64,
    /// Sum of `negative_points` recorded on the entries. The evaluator never
    /// deducts these.
    pub unused_negative_points: i64,
}

/// Break an evaluation down by category, in evaluation order.
///
/// Categories with no entries and no findings are omitted.
pub fn compute_breakdown(
    document: &ConfigurationDocument,
    evaluation: &Evaluation,
) -> Vec<CategoryBreakdown> {
    Category::evaluation_order(evaluation.os)
        .iter()
        .filter_map(|&category| {
            let entries = document
                .entries(category, evaluation.os)
                .unwrap_or_default();
            let (findings, points_awarded) = evaluation
                .findings
                .iter()
                .filter(|f| f.category == category)
                .fold((0usize, 0i64), |(n, pts), f| (n + 1, pts + f.points));

            if entries.is_empty() && findings == 0 {
                return None;
            }

            Some(CategoryBreakdown {
                category,
                entries: entries.len(),
                findings,
                points_awarded,
                unused_negative_points: entries.iter().map(|e| e.negative_points()).sum(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluate;
    use crate::model::*;

    #[test]
    fn breakdown_counts_entries_findings_and_budget() {
        let mut doc = ConfigurationDocument::new(Os::Linux);
        doc.users = Some(vec![
            User {
                name: "bob".into(),
                allowed: false,
                positive_points: 10,
                negative_points: 4,
                ..Default::default()
            },
            User {
                name: "alice".into(),
                allowed: true,
                positive_points: 5,
                ..Default::default()
            },
        ]);
        doc.processes = Some(vec![Process {
            name: "nc".into(),
            default_state: true,
            desired_state: false,
            positive_points: 3,
            negative_points: 1,
            ..Default::default()
        }]);

        let evaluation = evaluate(&doc).unwrap();
        let breakdown = compute_breakdown(&doc, &evaluation);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, Category::Users);
        assert_eq!(breakdown[0].entries, 2);
        assert_eq!(breakdown[0].findings, 1);
        assert_eq!(breakdown[0].points_awarded, 10);
        assert_eq!(breakdown[0].unused_negative_points, 4);
        assert_eq!(breakdown[1].category, Category::Processes);
        assert_eq!(breakdown[1].unused_negative_points, 1);

        let awarded: i64 = breakdown.iter().map(|b| b.points_awarded).sum();
        assert_eq!(awarded, evaluation.total_scored);
    }
}
