mod formatter;

pub use formatter::{format_percent, format_report, format_tsv, should_use_colors};
