use super::course::CourseGrader;

/// Validate a built course policy at load time.
/// Returns all problems at once (not just the first), so a policy
/// author can fix everything in one pass.
pub fn validate_policy(grader: &CourseGrader) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, (subgrader, category_name, weight)) in grader.subgraders.iter().enumerate() {
        if *weight < 0.0 {
            errors.push(format!(
                "graders[{}] ({}): weight must be non-negative, got {}",
                i, category_name, weight
            ));
        }

        if subgrader.min_count == 0 {
            errors.push(format!(
                "graders[{}] ({}): min_count must be at least 1",
                i, category_name
            ));
        }

        if subgrader.show_only_average && subgrader.hide_average {
            errors.push(format!(
                "graders[{}] ({}): show_only_average and hide_average are both set; \
                 pick one or the breakdown shows individual entries with no summary",
                i, category_name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
