//! Strict-mode validation: detect undeclared sections and keys in a source.
//!
//! Compares a [`RawSource`] against one environment and reports every section
//! or key the environment does not declare, with the line it appears on.

use crate::error::DoconfError;
use crate::ini::RawSource;
use crate::schema::Environment;

/// Fail with [`DoconfError::UnknownKeys`] if `raw` contains anything `env`
/// does not declare.
pub fn validate_unknown_keys(env: &Environment, raw: &RawSource) -> Result<(), DoconfError> {
    let mut errors = Vec::new();

    for raw_section in raw.sections() {
        let Some(section) = env.section(raw_section.name()) else {
            errors.push(DoconfError::UnknownSection {
                section: raw_section.name().to_string(),
                line: raw_section.line(),
            });
            continue;
        };
        for entry in raw_section.entries() {
            if section.variable(&entry.key).is_none() {
                errors.push(DoconfError::UnknownKey {
                    section: raw_section.name().to_string(),
                    key: entry.key.clone(),
                    line: entry.line,
                });
            }
        }
    }

    if errors.is_empty() {
        return Ok(());
    }
    Err(DoconfError::UnknownKeys(errors))
}
