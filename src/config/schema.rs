use serde::Deserialize;
use serde_json::{Map, Value};

/// Course policy file. Each grader entry stays a raw map here; the
/// grading builder decides the variant and validates the keys
/// (`grading::grader_from_conf`).
///
/// Example YAML:
/// ```yaml
/// graders:
///   - type: Homework
///     min_count: 12
///     drop_count: 2
///     short_label: HW
///     weight: 0.15
///   - type: Final Exam
///     min_count: 1
///     drop_count: 0
///     short_label: Final
///     weight: 0.40
/// ```
#[derive(Debug, Deserialize)]
pub struct PolicyFile {
    pub graders: Vec<Map<String, Value>>,
}
