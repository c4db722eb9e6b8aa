//! Version metadata checks for definitions.
//!
//! A definition may be pinned by an explicit `spec.version` or by a
//! revision-name annotation, never both. When a version is given it must be
//! three dot-separated integers; no further semver ordering or pre-release
//! rules apply here.

/// Errors from version metadata checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Not a valid version")]
    InvalidFormat { version: String },

    #[error("{object_type} has both spec.version and revision name annotation. Only one can be present")]
    ConflictingPins { object_type: String },
}

/// Validate that a non-empty version has major, minor and patch parts.
///
/// Each part only has to parse as an `i64`, so signs and leading zeros are
/// accepted. An empty version is valid (the field is optional).
pub fn validate_semantic_version(version: &str) -> Result<(), VersionError> {
    if version.is_empty() {
        return Ok(());
    }

    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|part| part.parse::<i64>().is_err()) {
        return Err(VersionError::InvalidFormat {
            version: version.to_string(),
        });
    }
    Ok(())
}

/// Validate that `spec.version` and the revision-name annotation are not
/// both present.
pub fn validate_single_version_pin(
    version: &str,
    revision_name: &str,
    object_type: &str,
) -> Result<(), VersionError> {
    if !version.is_empty() && !revision_name.is_empty() {
        return Err(VersionError::ConflictingPins {
            object_type: object_type.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_version_is_optional() {
        assert!(validate_semantic_version("").is_ok());
    }

    #[test]
    fn three_integer_parts_pass() {
        assert!(validate_semantic_version("1.2.3").is_ok());
        assert!(validate_semantic_version("01.002.0").is_ok());
        assert!(validate_semantic_version("1.-2.+3").is_ok());
    }

    #[test]
    fn wrong_part_count_fails() {
        for version in ["1", "1.2", "1.2.3.4", "1..2.3"] {
            let err = validate_semantic_version(version).unwrap_err();
            assert_eq!(err.to_string(), "Not a valid version", "{version}");
        }
    }

    #[test]
    fn non_integer_part_fails() {
        for version in ["1.a.3", "1.2.", ".1.2", "v1.2.3", "1.2.3-rc1", "1. 2.3"] {
            assert!(validate_semantic_version(version).is_err(), "{version}");
        }
    }

    #[test]
    fn overflowing_part_fails() {
        assert!(validate_semantic_version("1.2.99999999999999999999").is_err());
    }

    #[test]
    fn both_pins_rejected() {
        let err = validate_single_version_pin("1.0.0", "rev-1", "Trait").unwrap_err();
        assert_eq!(
            err,
            VersionError::ConflictingPins {
                object_type: "Trait".to_string()
            }
        );
        assert!(err.to_string().starts_with("Trait has both"));
    }

    #[test]
    fn single_or_no_pin_accepted() {
        assert!(validate_single_version_pin("1.0.0", "", "Trait").is_ok());
        assert!(validate_single_version_pin("", "rev-1", "Trait").is_ok());
        assert!(validate_single_version_pin("", "", "Trait").is_ok());
    }
}
