//! CLI argument validation functions
//!
//! Checks that go beyond what clap can validate automatically.

/// Validate that `--wait` is a finite number of seconds
///
/// Zero and negative values are accepted; they skip the confirmation wait.
pub fn validate_wait(wait_str: &str) -> Result<f64, String> {
    let wait: f64 = wait_str
        .trim()
        .parse()
        .map_err(|_| format!("Wait must be a number of seconds, got: '{}'", wait_str))?;

    if !wait.is_finite() {
        return Err(format!("Wait must be a finite number of seconds, got: '{}'", wait_str));
    }

    Ok(wait)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_validation_valid() {
        let valid = [("5", 5.0), ("0", 0.0), ("2.5", 2.5), ("-1", -1.0), (" 10 ", 10.0)];

        for (input, expected) in valid {
            assert_eq!(validate_wait(input), Ok(expected), "Wait '{}' should be valid", input);
        }
    }

    #[test]
    fn test_wait_validation_invalid() {
        let invalid = ["", "soon", "inf", "NaN", "5s"];

        for input in invalid {
            assert!(validate_wait(input).is_err(), "Wait '{}' should be invalid", input);
        }
    }
}
