pub mod config;
pub mod grading;
pub mod output;
pub mod scores;

pub use grading::{
    grader_from_conf, validate_policy, AssignmentFormatGrader, ConfigError, CourseGradeResult,
    CourseGrader, GraderConf,
};
pub use scores::{aggregate_scores, AggregatedScore, GradeSheet, ProblemScore, ScoredSection};
