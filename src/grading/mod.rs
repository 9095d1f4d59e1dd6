pub mod assignment;
pub mod builder;
pub mod course;
pub mod validation;

pub use assignment::{AssignmentFormatGrader, CategoryGradeResult, SectionEntry};
pub use builder::{grader_from_conf, ConfigError, GraderConf, GraderSpec};
pub use course::{CategoryBreakdown, CourseGradeResult, CourseGrader};
pub use validation::validate_policy;
