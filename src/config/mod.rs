mod schema;

pub use schema::PolicyFile;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scores::SectionRecord;

/// Get the config directory path (~/.config/markbook/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("markbook")
}

/// Get the default policy file path (~/.config/markbook/policy.yaml)
pub fn get_policy_path() -> PathBuf {
    get_config_dir().join("policy.yaml")
}

/// Load a course policy from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to the policy file. If None, uses the
///   default path (~/.config/markbook/policy.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The policy file does not exist
/// - The policy file cannot be read
/// - The YAML cannot be parsed
pub fn load_policy(path: Option<PathBuf>) -> Result<PolicyFile> {
    let policy_path = path.unwrap_or_else(get_policy_path);

    if !policy_path.exists() {
        anyhow::bail!(
            "Policy file not found at {}. Create ~/.config/markbook/policy.yaml",
            policy_path.display()
        );
    }

    let policy_content = fs::read_to_string(&policy_path)
        .with_context(|| format!("Failed to read policy file at {}", policy_path.display()))?;

    let policy: PolicyFile = serde_saphyr::from_str(&policy_content)
        .with_context(|| format!("Failed to parse policy: invalid YAML in {}", policy_path.display()))?;

    Ok(policy)
}

/// Load a student's grade sheet from a JSON file: a map from category
/// name to that category's section records, in course order.
pub fn load_grade_sheet(path: &Path) -> Result<crate::scores::GradeSheet<SectionRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read grade sheet at {}", path.display()))?;

    let sheet = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse grade sheet: invalid JSON in {}", path.display()))?;

    Ok(sheet)
}
