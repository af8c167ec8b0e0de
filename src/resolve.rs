//! Core validation: apply a raw source to one environment of a schema.
//!
//! Operates on pre-loaded data (a [`Schema`] and a [`RawSource`]) with no I/O,
//! so the whole pipeline is testable with synthetic inputs. Steps:
//!
//! 1. Resolve the environment (ignoring case)
//! 2. Reject undeclared keys and sections (if strict)
//! 3. For each declared section, in order:
//!    - a missing section is fatal only if it declares required variables
//!    - each variable, in declaration order, takes the coerced source value,
//!      else its pre-coerced default, else fails as missing
//!
//! Environments are self-contained: nothing from `default` is inherited by
//! other environments.

use crate::coerce;
use crate::config::{Configuration, SectionValues};
use crate::error::DoconfError;
use crate::ini::RawSource;
use crate::schema::{Schema, Section};
use crate::validate;

/// Validate `raw` against `environment` of `schema` and produce typed values.
pub fn resolve(
    schema: &Schema,
    environment: &str,
    raw: &RawSource,
    strict: bool,
) -> Result<Configuration, DoconfError> {
    let env = schema
        .environment(environment)
        .ok_or_else(|| DoconfError::UndefinedEnvironment {
            name: environment.to_string(),
            available: schema.environment_names(),
        })?;
    tracing::debug!(environment = env.name(), strict, "validating config source");

    if strict {
        validate::validate_unknown_keys(env, raw)?;
    }

    let mut config = Configuration::new(env.name());
    for section in env.sections() {
        config.push_section(resolve_section(section, raw)?);
    }
    Ok(config)
}

fn resolve_section(section: &Section, raw: &RawSource) -> Result<SectionValues, DoconfError> {
    let raw_section = raw.section(section.name());
    if raw_section.is_none() {
        if section.has_required() {
            let required: Vec<&str> = section
                .variables()
                .filter(|v| v.is_required())
                .map(|v| v.name())
                .collect();
            return Err(DoconfError::bad_config(
                section.name(),
                None,
                None,
                format!(
                    "section is missing but declares required variables: {}",
                    required.join(", ")
                ),
            ));
        }
        tracing::trace!(section = section.name(), "optional section absent, using defaults");
    }

    let mut values = SectionValues::new(section.name());
    for var in section.variables() {
        match (raw_section.and_then(|s| s.get(var.ident())), var.default()) {
            (Some(entry), _) => {
                let value = coerce::coerce(&entry.value, var.var_type()).map_err(|e| {
                    DoconfError::bad_config(
                        section.name(),
                        Some(var.name()),
                        Some(&entry.value),
                        format!("{} = {:?} (line {}): {e}", var.name(), entry.value, entry.line),
                    )
                })?;
                values.set_keyed(var.ident(), var.name(), value);
            }
            (None, Some(default)) => values.set_keyed(var.ident(), var.name(), default.clone()),
            (None, None) => {
                return Err(DoconfError::bad_config(
                    section.name(),
                    Some(var.name()),
                    None,
                    format!("missing required variable {}", var.name()),
                ));
            }
        }
    }
    Ok(values)
}
