use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score for a single problem.
///
/// `earned`/`possible` are the weighted values used in aggregation;
/// `raw_earned`/`raw_possible` keep the unweighted points for display.
/// All point fields are optional because an unscored problem has no
/// points at all, only flags.
///
/// Equality is structural: two scores with the same fields are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemScore {
    pub raw_earned: Option<f64>,
    pub raw_possible: Option<f64>,
    pub earned: Option<f64>,
    pub possible: Option<f64>,
    pub weight: Option<f64>,
    pub graded: bool,
    pub attempted: bool,
}

impl ProblemScore {
    pub fn new(
        raw_earned: Option<f64>,
        raw_possible: Option<f64>,
        earned: Option<f64>,
        possible: Option<f64>,
        weight: Option<f64>,
        graded: bool,
        attempted: bool,
    ) -> Self {
        Self {
            raw_earned,
            raw_possible,
            earned,
            possible,
            weight,
            graded,
            attempted,
        }
    }
}

/// Rolled-up totals over many problem scores (a subsection) or many
/// subsections (a category or the whole course). Weighting has already
/// been folded in upstream, so there is no weight field here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedScore {
    pub earned: f64,
    pub possible: f64,
    pub graded: bool,
    pub attempted: bool,
}

impl AggregatedScore {
    pub fn new(earned: f64, possible: f64, graded: bool, attempted: bool) -> Self {
        Self {
            earned,
            possible,
            graded,
            attempted,
        }
    }
}

/// Sum a list of problem scores into `(all_total, graded_total)`.
///
/// `all_total` sums every score regardless of the graded flag;
/// `graded_total` restricts to scores with `graded == true`. A missing
/// `earned`/`possible` contributes 0.0. Empty input yields zeroed,
/// unattempted totals.
pub fn aggregate_scores(scores: &[ProblemScore]) -> (AggregatedScore, AggregatedScore) {
    let mut total_earned = 0.0;
    let mut total_possible = 0.0;
    let mut any_attempted = false;

    let mut graded_earned = 0.0;
    let mut graded_possible = 0.0;
    let mut any_attempted_graded = false;

    for score in scores {
        let earned = score.earned.unwrap_or(0.0);
        let possible = score.possible.unwrap_or(0.0);

        total_earned += earned;
        total_possible += possible;
        any_attempted = any_attempted || score.attempted;

        if score.graded {
            graded_earned += earned;
            graded_possible += possible;
            any_attempted_graded = any_attempted_graded || score.attempted;
        }
    }

    let all_total = AggregatedScore::new(total_earned, total_possible, false, any_attempted);
    let graded_total =
        AggregatedScore::new(graded_earned, graded_possible, true, any_attempted_graded);

    (all_total, graded_total)
}

/// Contract a grade-sheet provider must satisfy for each subsection
/// record: the grader only ever reads the graded total and the name.
pub trait ScoredSection {
    fn graded_total(&self) -> &AggregatedScore;
    fn display_name(&self) -> &str;
}

/// One graded subsection as materialized by the content-traversal
/// collaborator. `location` is an opaque unique id, carried through but
/// never used in arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub display_name: String,
    #[serde(default)]
    pub location: String,
    pub graded_total: AggregatedScore,
    pub all_total: AggregatedScore,
}

impl ScoredSection for SectionRecord {
    fn graded_total(&self) -> &AggregatedScore {
        &self.graded_total
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Subsection records grouped by assignment category, each list in
/// course order. Built entirely outside the engine.
pub type GradeSheet<S> = HashMap<String, Vec<S>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn score(earned: f64, possible: f64, graded: bool, attempted: bool) -> ProblemScore {
        ProblemScore::new(
            Some(earned),
            Some(possible),
            Some(earned),
            Some(possible),
            None,
            graded,
            attempted,
        )
    }

    #[test]
    fn test_aggregate_empty() {
        let (all_total, graded_total) = aggregate_scores(&[]);
        assert_eq!(all_total, AggregatedScore::new(0.0, 0.0, false, false));
        assert_eq!(graded_total, AggregatedScore::new(0.0, 0.0, true, false));
    }

    #[test]
    fn test_aggregate_mixed_graded() {
        let scores = vec![
            score(3.0, 5.0, true, true),
            score(2.0, 4.0, false, true),
            score(1.0, 2.0, true, false),
        ];
        let (all_total, graded_total) = aggregate_scores(&scores);

        assert_eq!(all_total.earned, 6.0);
        assert_eq!(all_total.possible, 11.0);
        assert!(!all_total.graded);
        assert!(all_total.attempted);

        assert_eq!(graded_total.earned, 4.0);
        assert_eq!(graded_total.possible, 7.0);
        assert!(graded_total.graded);
        assert!(graded_total.attempted);
    }

    #[test]
    fn test_aggregate_commutative() {
        let a = score(3.0, 5.0, true, true);
        let b = score(2.0, 4.0, false, false);
        let c = score(5.0, 5.0, true, false);

        let forward = aggregate_scores(&[a.clone(), b.clone(), c.clone()]);
        let reversed = aggregate_scores(&[c, b, a]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_aggregate_graded_attempted_ignores_ungraded() {
        // Only an ungraded score was attempted; graded total must not
        // report any attempt.
        let scores = vec![score(1.0, 1.0, false, true), score(0.0, 5.0, true, false)];
        let (all_total, graded_total) = aggregate_scores(&scores);
        assert!(all_total.attempted);
        assert!(!graded_total.attempted);
    }

    #[test]
    fn test_aggregate_none_points_count_as_zero() {
        let blank = ProblemScore::new(None, None, None, None, None, true, false);
        let (all_total, graded_total) = aggregate_scores(&[blank, score(2.0, 3.0, true, true)]);
        assert_eq!(all_total.earned, 2.0);
        assert_eq!(all_total.possible, 3.0);
        assert_eq!(graded_total.earned, 2.0);
        assert_eq!(graded_total.possible, 3.0);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(
            score(3.0, 5.0, true, true),
            score(3.0, 5.0, true, true)
        );
        assert_ne!(score(3.0, 5.0, true, true), score(3.0, 5.0, true, false));
        assert_eq!(
            AggregatedScore::new(1.0, 2.0, true, true),
            AggregatedScore::new(1.0, 2.0, true, true)
        );
    }

    #[test]
    fn test_extra_credit_not_clamped() {
        // earned above possible is legal (bonus points)
        let (all_total, _) = aggregate_scores(&[score(7.0, 5.0, true, true)]);
        assert_eq!(all_total.earned, 7.0);
        assert_eq!(all_total.possible, 5.0);
    }
}
