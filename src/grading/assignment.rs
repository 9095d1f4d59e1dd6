use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;

use crate::scores::{GradeSheet, ScoredSection};

/// One row of a category's section breakdown, as shown in the grade
/// detail UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionEntry {
    pub percent: f64,
    pub label: String,
    pub detail: String,
    pub category: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub prominent: bool,
    /// Set when the entry was excluded by the drop-lowest policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<String>,
}

/// Result of grading one assignment category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGradeResult {
    pub percent: f64,
    pub section_breakdown: Vec<SectionEntry>,
}

/// Grades every section matching one assignment format (e.g. all
/// homeworks) with equal weight.
///
/// `min_count` is how many assignments the course expects overall;
/// placeholder zero scores fill in when fewer sections exist yet. If
/// more sections exist than `min_count`, `min_count` is ignored.
/// `drop_count` lowest-scoring entries are excluded from the average.
///
/// Display labels: `category` groups entries in the breakdown,
/// `section_type` is the singular name ("Lab"), `short_label` the
/// compact one ("HW"); all three default to `format`. `starting_index`
/// offsets the numbering ("Assignment 3", "Assignment 4" for
/// starting_index=3, min_count=2).
///
/// `show_only_average` suppresses the individual entries and keeps only
/// the summary row; `hide_average` does the opposite. Setting both
/// leaves the individual entries with no summary, which is almost
/// certainly a policy mistake (see `validate_policy`).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentFormatGrader {
    /// Category key used to look up sections in the grade sheet.
    pub format: String,
    pub min_count: usize,
    pub drop_count: usize,
    pub category: String,
    pub section_type: String,
    pub short_label: String,
    pub show_only_average: bool,
    pub hide_average: bool,
    pub starting_index: usize,
}

impl AssignmentFormatGrader {
    /// Create a grader with all display options defaulted from `format`.
    pub fn new(format: impl Into<String>, min_count: usize, drop_count: usize) -> Self {
        let format = format.into();
        Self {
            min_count,
            drop_count,
            category: format.clone(),
            section_type: format.clone(),
            short_label: format.clone(),
            show_only_average: false,
            hide_average: false,
            starting_index: 1,
            format,
        }
    }

    /// Grade every section of this format in the sheet.
    ///
    /// `generate_random_scores` replaces real lookups with random
    /// earned/possible pairs; debugging and policy demos only, never
    /// production grading.
    pub fn grade<S: ScoredSection>(
        &self,
        sheet: &GradeSheet<S>,
        generate_random_scores: bool,
    ) -> CategoryGradeResult {
        let empty = Vec::new();
        let sections = sheet.get(&self.format).unwrap_or(&empty);
        let slot_count = self.min_count.max(sections.len());

        let mut breakdown = Vec::with_capacity(slot_count + 1);
        for i in 0..slot_count {
            let index = i + self.starting_index;
            let (percent, detail) = if i < sections.len() || generate_random_scores {
                let (earned, possible, name) = if generate_random_scores {
                    let mut rng = rand::thread_rng();
                    let earned = rng.gen_range(2..=15u32);
                    let possible = rng.gen_range(earned..=15u32);
                    (f64::from(earned), f64::from(possible), "Generated".to_string())
                } else {
                    let section = &sections[i];
                    let total = section.graded_total();
                    (total.earned, total.possible, section.display_name().to_string())
                };

                let percent = safe_ratio(earned, possible);
                let detail = format!(
                    "{} {} - {} - {}% ({}/{})",
                    self.section_type,
                    index,
                    name,
                    fmt_percent(percent),
                    fmt_points(earned),
                    fmt_points(possible)
                );
                (percent, detail)
            } else {
                let detail = format!("{} {} Unreleased - 0% (?/?)", self.section_type, index);
                (0.0, detail)
            };

            breakdown.push(SectionEntry {
                percent,
                label: format!("{} {:02}", self.short_label, index),
                detail,
                category: self.category.clone(),
                prominent: false,
                mark: None,
            });
        }

        let (total_percent, dropped_indices) = total_with_drops(&breakdown, self.drop_count);

        for &dropped in &dropped_indices {
            breakdown[dropped].mark = Some(format!(
                "The lowest {} {} scores are dropped.",
                self.drop_count, self.section_type
            ));
        }

        if breakdown.len() == 1 {
            // A single-assignment category: the assignment and the
            // total are the same thing, so show one entry and skip the
            // "Average" framing.
            breakdown = vec![SectionEntry {
                percent: total_percent,
                label: self.short_label.clone(),
                detail: format!("{} = {}%", self.section_type, fmt_percent(total_percent)),
                category: self.category.clone(),
                prominent: true,
                mark: None,
            }];
        } else {
            // When both suppress flags are set the individual entries
            // win; clearing them too would leave nothing to display.
            if self.show_only_average && !self.hide_average {
                breakdown.clear();
            }

            if !self.hide_average {
                breakdown.push(SectionEntry {
                    percent: total_percent,
                    label: format!("{} Avg", self.short_label),
                    detail: format!(
                        "{} Average = {}%",
                        self.section_type,
                        fmt_percent(total_percent)
                    ),
                    category: self.category.clone(),
                    prominent: true,
                    mark: None,
                });
            }
        }

        CategoryGradeResult {
            percent: total_percent,
            section_breakdown: breakdown,
        }
    }
}

/// Average the breakdown while excluding the `drop_count` lowest
/// percentages. Returns the average and the dropped indices.
///
/// The sort is stable on the original order, so equal percentages drop
/// the later entry first. When dropping leaves nothing to average, the
/// undivided sum of kept entries is returned (0.0 when everything was
/// dropped) rather than dividing by zero.
fn total_with_drops(breakdown: &[SectionEntry], drop_count: usize) -> (f64, Vec<usize>) {
    let mut ranked: Vec<usize> = (0..breakdown.len()).collect();
    ranked.sort_by(|&a, &b| {
        breakdown[b]
            .percent
            .partial_cmp(&breakdown[a].percent)
            .unwrap_or(Ordering::Equal)
    });

    let dropped_indices: Vec<usize> = if drop_count > 0 {
        ranked
            .split_off(ranked.len().saturating_sub(drop_count))
    } else {
        Vec::new()
    };

    let mut aggregate = 0.0;
    for (index, entry) in breakdown.iter().enumerate() {
        if !dropped_indices.contains(&index) {
            aggregate += entry.percent;
        }
    }

    let kept = breakdown.len().saturating_sub(drop_count);
    if kept > 0 {
        aggregate /= kept as f64;
    }

    (aggregate, dropped_indices)
}

/// earned/possible with 0/0 (and anything over zero possible) defined
/// as 0% instead of a division fault. Ungraded placeholders legally
/// carry possible == 0.
fn safe_ratio(earned: f64, possible: f64) -> f64 {
    if possible > 0.0 {
        earned / possible
    } else {
        0.0
    }
}

/// Render a ratio as a whole percentage ("0.834" -> "83").
fn fmt_percent(ratio: f64) -> String {
    format!("{:.0}", ratio * 100.0)
}

/// Render a point value with at most three significant digits, trimming
/// trailing zeros ("5.00" -> "5", "12.333" -> "12.3").
fn fmt_points(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (2 - magnitude).max(0) as usize;
    let rendered = format!("{:.*}", decimals, value);
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}
