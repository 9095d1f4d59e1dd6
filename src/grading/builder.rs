use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::assignment::AssignmentFormatGrader;
use super::course::CourseGrader;

/// Keys the assignment-format variant understands. Anything else in a
/// spec is warned about and discarded, so old policies survive schema
/// additions.
const ASSIGNMENT_FORMAT_KEYS: &[&str] = &[
    "type",
    "min_count",
    "drop_count",
    "category",
    "section_type",
    "short_label",
    "show_only_average",
    "hide_average",
    "starting_index",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no grader matches spec {spec}: only assignment-format graders (with `min_count`) are supported")]
    UnrecognizedGrader { spec: String },

    #[error("unable to parse grader spec {spec}: {source}")]
    InvalidSpec {
        spec: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("grader spec {spec}: `weight` must be a number")]
    InvalidWeight { spec: String },
}

/// Typed body of one assignment-format grader spec. Optional display
/// fields default from `type` when the grader is built.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentFormatSpec {
    #[serde(rename = "type")]
    pub format: String,
    pub min_count: usize,
    pub drop_count: usize,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub section_type: Option<String>,
    #[serde(default)]
    pub short_label: Option<String>,
    #[serde(default)]
    pub show_only_average: bool,
    #[serde(default)]
    pub hide_average: bool,
    #[serde(default)]
    pub starting_index: Option<usize>,
}

/// Discriminated grader spec, decided at parse time. Today the only
/// recognized shape is the assignment-format grader, selected by the
/// presence of `min_count`.
#[derive(Debug, Clone)]
pub enum GraderSpec {
    AssignmentFormat(AssignmentFormatSpec),
}

impl GraderSpec {
    /// Parse one raw policy entry into a typed spec plus its weight
    /// (defaulting to 0 when absent, so an unweighted category is legal
    /// but contributes nothing).
    pub fn parse(mut raw: Map<String, Value>) -> Result<(Self, f64), ConfigError> {
        let rendered = Value::Object(raw.clone()).to_string();

        let weight = match raw.remove("weight") {
            Some(value) => value
                .as_f64()
                .ok_or(ConfigError::InvalidWeight { spec: rendered.clone() })?,
            None => 0.0,
        };

        if !raw.contains_key("min_count") {
            return Err(ConfigError::UnrecognizedGrader { spec: rendered });
        }

        let unknown: Vec<String> = raw
            .keys()
            .filter(|key| !ASSIGNMENT_FORMAT_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        for key in unknown {
            log::warn!("ignoring unsupported key `{}` in grader spec {}", key, rendered);
            let _ = raw.remove(&key);
        }

        let spec: AssignmentFormatSpec = serde_json::from_value(Value::Object(raw))
            .map_err(|source| ConfigError::InvalidSpec {
                spec: rendered,
                source,
            })?;

        Ok((GraderSpec::AssignmentFormat(spec), weight))
    }

    fn into_grader(self) -> AssignmentFormatGrader {
        match self {
            GraderSpec::AssignmentFormat(spec) => {
                let mut grader =
                    AssignmentFormatGrader::new(spec.format, spec.min_count, spec.drop_count);
                if let Some(category) = spec.category {
                    grader.category = category;
                }
                if let Some(section_type) = spec.section_type {
                    grader.section_type = section_type;
                }
                if let Some(short_label) = spec.short_label {
                    grader.short_label = short_label;
                }
                if let Some(starting_index) = spec.starting_index {
                    grader.starting_index = starting_index;
                }
                grader.show_only_average = spec.show_only_average;
                grader.hide_average = spec.hide_average;
                grader
            }
        }
    }
}

/// Input to `grader_from_conf`: either a grader that is already wired,
/// or the raw policy entries straight out of the policy file.
#[derive(Debug)]
pub enum GraderConf {
    Built(CourseGrader),
    Specs(Vec<Map<String, Value>>),
}

/// Build a `CourseGrader` from a policy configuration.
///
/// An already-built grader passes through untouched. Otherwise every
/// entry must parse; one bad spec aborts the whole build so a partial
/// policy is never silently accepted.
pub fn grader_from_conf(conf: GraderConf) -> Result<CourseGrader, ConfigError> {
    let specs = match conf {
        GraderConf::Built(grader) => return Ok(grader),
        GraderConf::Specs(specs) => specs,
    };

    let mut subgraders = Vec::with_capacity(specs.len());
    for raw in specs {
        let (spec, weight) = GraderSpec::parse(raw)?;
        let grader = spec.into_grader();
        let category_name = grader.category.clone();
        subgraders.push((grader, category_name, weight));
    }

    Ok(CourseGrader::new(subgraders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn homework_spec() -> Map<String, Value> {
        as_map(json!({
            "type": "Homework",
            "min_count": 12,
            "drop_count": 2,
            "short_label": "HW",
            "weight": 0.15,
        }))
    }

    #[test]
    fn test_builds_weighted_policy() {
        let specs = vec![
            homework_spec(),
            as_map(json!({
                "type": "Lab",
                "min_count": 12,
                "drop_count": 2,
                "category": "Labs",
                "weight": 0.15,
            })),
            as_map(json!({
                "type": "Midterm Exam",
                "min_count": 1,
                "drop_count": 0,
                "weight": 0.30,
            })),
            as_map(json!({
                "type": "Final Exam",
                "min_count": 1,
                "drop_count": 0,
                "weight": 0.40,
            })),
        ];

        let grader = grader_from_conf(GraderConf::Specs(specs)).unwrap();
        assert_eq!(grader.subgraders.len(), 4);

        let (homework, name, weight) = &grader.subgraders[0];
        assert_eq!(homework.format, "Homework");
        assert_eq!(homework.min_count, 12);
        assert_eq!(homework.drop_count, 2);
        assert_eq!(homework.short_label, "HW");
        assert_eq!(name, "Homework");
        assert_eq!(*weight, 0.15);

        // Tuple name follows `category` when it is set.
        let (_, lab_name, _) = &grader.subgraders[1];
        assert_eq!(lab_name, "Labs");

        let weights: f64 = grader.subgraders.iter().map(|(_, _, w)| w).sum();
        assert!((weights - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_built_grader_passes_through() {
        let grader = CourseGrader::new(vec![(
            AssignmentFormatGrader::new("Homework", 3, 1),
            "Homework".to_string(),
            1.0,
        )]);
        let rebuilt = grader_from_conf(GraderConf::Built(grader.clone())).unwrap();
        assert_eq!(rebuilt, grader);
    }

    #[test]
    fn test_weight_defaults_to_zero() {
        let mut spec = homework_spec();
        let _ = spec.remove("weight");
        let grader = grader_from_conf(GraderConf::Specs(vec![spec])).unwrap();
        assert_eq!(grader.subgraders[0].2, 0.0);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let mut spec = homework_spec();
        let _ = spec.insert("passing_grade".to_string(), json!(0.6));
        let grader = grader_from_conf(GraderConf::Specs(vec![spec])).unwrap();
        assert_eq!(grader.subgraders[0].0.format, "Homework");
    }

    #[test]
    fn test_missing_min_count_is_unrecognized() {
        let spec = as_map(json!({ "type": "Homework", "weight": 0.15 }));
        let err = grader_from_conf(GraderConf::Specs(vec![spec])).unwrap_err();
        match err {
            ConfigError::UnrecognizedGrader { spec } => assert!(spec.contains("Homework")),
            other => panic!("expected UnrecognizedGrader, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_field_type_embeds_spec_and_cause() {
        let spec = as_map(json!({
            "type": "Homework",
            "min_count": 12,
            "drop_count": "two",
        }));
        let err = grader_from_conf(GraderConf::Specs(vec![spec])).unwrap_err();
        match err {
            ConfigError::InvalidSpec { spec, source } => {
                assert!(spec.contains("drop_count"));
                assert!(!source.to_string().is_empty());
            }
            other => panic!("expected InvalidSpec, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_weight_is_rejected() {
        let mut spec = homework_spec();
        let _ = spec.insert("weight".to_string(), json!("heavy"));
        let err = grader_from_conf(GraderConf::Specs(vec![spec])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight { .. }));
    }

    #[test]
    fn test_one_bad_spec_aborts_the_build() {
        let specs = vec![homework_spec(), as_map(json!({ "type": "Mystery" }))];
        assert!(grader_from_conf(GraderConf::Specs(specs)).is_err());
    }

    #[test]
    fn test_display_options_carry_through() {
        let spec = as_map(json!({
            "type": "Quiz",
            "min_count": 10,
            "drop_count": 0,
            "section_type": "Quiz",
            "show_only_average": true,
            "starting_index": 0,
        }));
        let grader = grader_from_conf(GraderConf::Specs(vec![spec])).unwrap();
        let quiz = &grader.subgraders[0].0;
        assert!(quiz.show_only_average);
        assert!(!quiz.hide_average);
        assert_eq!(quiz.starting_index, 0);
    }
}
