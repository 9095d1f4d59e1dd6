use serde::Serialize;

use super::assignment::{AssignmentFormatGrader, SectionEntry};
use crate::scores::{GradeSheet, ScoredSection};

/// One category's weighted contribution to the course grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub percent: f64,
    pub detail: String,
    pub category: String,
}

/// Final grade for a student: overall percentage, the flat list of
/// per-section rows from every category, and the coarse per-category
/// summary. `grade_breakdown` preserves policy order because that is
/// the display order; it is deliberately a list, not a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGradeResult {
    pub percent: f64,
    pub section_breakdown: Vec<SectionEntry>,
    pub grade_breakdown: Vec<CategoryBreakdown>,
}

/// Combines category graders into a course percentage by weighted sum.
///
/// Weights are not required to total 1.0: a policy summing above 1.0 is
/// extra credit, and the resulting percentage may exceed 100%. No
/// division happens at this level.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseGrader {
    /// `(grader, category_name, weight)` in policy order.
    pub subgraders: Vec<(AssignmentFormatGrader, String, f64)>,
}

impl CourseGrader {
    pub fn new(subgraders: Vec<(AssignmentFormatGrader, String, f64)>) -> Self {
        Self { subgraders }
    }

    pub fn grade<S: ScoredSection>(
        &self,
        sheet: &GradeSheet<S>,
        generate_random_scores: bool,
    ) -> CourseGradeResult {
        let mut total_percent = 0.0;
        let mut section_breakdown = Vec::new();
        let mut grade_breakdown = Vec::with_capacity(self.subgraders.len());

        for (subgrader, category_name, weight) in &self.subgraders {
            let subgrade = subgrader.grade(sheet, generate_random_scores);
            let weighted_percent = subgrade.percent * weight;

            total_percent += weighted_percent;
            section_breakdown.extend(subgrade.section_breakdown);
            grade_breakdown.push(CategoryBreakdown {
                percent: weighted_percent,
                detail: format!(
                    "{} = {:.2}% of a possible {:.2}%",
                    category_name,
                    weighted_percent * 100.0,
                    weight * 100.0
                ),
                category: category_name.clone(),
            });
        }

        CourseGradeResult {
            percent: total_percent,
            section_breakdown,
            grade_breakdown,
        }
    }
}
