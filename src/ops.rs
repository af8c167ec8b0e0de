//! Config operations: template generation, key lookup, listing, and result types.
//!
//! Provides the logic behind `config find`, `config validate`, `config gen`,
//! `config list` and `config get`, and the `ConfigResult` enum that callers
//! use to display results.

use std::fmt;
use std::path::PathBuf;

use crate::config::Configuration;
use crate::error::DoconfError;
use crate::schema::{DEFAULT_ENVIRONMENT, Schema, Variable};

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// The config file discovery settled on.
    Found { path: PathBuf },
    /// A source validated cleanly. `path` is `None` for in-memory text.
    Valid {
        path: Option<PathBuf>,
        environment: String,
    },
    /// A generated INI template string.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// A key's resolved value and its description.
    KeyValue {
        key: String,
        value: String,
        doc: Vec<String>,
    },
    /// All resolved `section.KEY` value pairs.
    Listing { entries: Vec<(String, String)> },
    /// The resolved configuration as JSON.
    Json(String),
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Found { path } => write!(f, "{}", path.display()),
            ConfigResult::Valid {
                path: Some(path),
                environment,
            } => write!(f, "{} is valid for environment '{environment}'", path.display()),
            ConfigResult::Valid {
                path: None,
                environment,
            } => write!(f, "Config is valid for environment '{environment}'"),
            ConfigResult::Template(t) => write!(f, "{t}"),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Config template written to {}", path.display())
            }
            ConfigResult::KeyValue { key, value, doc } => {
                for line in doc {
                    writeln!(f, "# {line}")?;
                }
                write!(f, "{key} = {value}")
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::Json(json) => write!(f, "{json}"),
        }
    }
}

/// Generate a commented INI template for one environment.
///
/// Variables with a default are written out with that default; required
/// variables are commented out so the template still needs editing before it
/// validates.
pub fn generate_template(schema: &Schema, environment: Option<&str>) -> Result<String, DoconfError> {
    let name = environment.unwrap_or(DEFAULT_ENVIRONMENT);
    let env = schema
        .environment(name)
        .ok_or_else(|| DoconfError::UndefinedEnvironment {
            name: name.to_string(),
            available: schema.environment_names(),
        })?;

    let mut out = format!(
        "# {} configuration ({} environment)\n",
        schema.app_name(),
        env.name()
    );
    for section in env.sections() {
        out.push_str(&format!("\n[{}]\n", section.name()));
        for var in section.variables() {
            out.push_str(&template_entry(var));
        }
    }
    Ok(out)
}

fn template_entry(var: &Variable) -> String {
    let note = match var.default() {
        Some(_) => var.var_type().to_string(),
        None => format!("{}, required", var.var_type()),
    };
    let comment = if var.description().is_empty() {
        format!("# ({note})\n")
    } else {
        format!("# {} ({note})\n", var.description())
    };
    match var.default() {
        Some(default) => format!("{comment}{} = {default}\n", var.ident()),
        None => format!("{comment}# {} =\n", var.ident()),
    }
}

/// Get a resolved value by `section.KEY`, with the variable's description.
pub fn get_value(
    schema: &Schema,
    config: &Configuration,
    key: &str,
) -> Result<ConfigResult, DoconfError> {
    let not_found = || DoconfError::KeyNotFound(key.to_string());
    let (section, variable) = key.split_once('.').ok_or_else(not_found)?;
    let values = config.get(section).ok_or_else(not_found)?;
    let value = values.get(variable).ok_or_else(not_found)?;

    let doc = schema
        .environment(config.environment())
        .and_then(|env| env.section(section))
        .and_then(|s| s.variable(variable))
        .map(|v| v.description())
        .filter(|d| !d.is_empty())
        .map(|d| vec![d.to_string()])
        .unwrap_or_default();

    let canonical = values.name_of(variable).unwrap_or(variable);

    Ok(ConfigResult::KeyValue {
        key: format!("{}.{canonical}", values.name()),
        value: value.to_string(),
        doc,
    })
}

/// List all resolved values as `section.KEY` pairs, in declaration order.
pub fn list_values(config: &Configuration) -> ConfigResult {
    let entries = config
        .sections()
        .flat_map(|section| {
            section
                .iter()
                .map(move |(name, value)| (format!("{}.{name}", section.name()), value.to_string()))
        })
        .collect();
    ConfigResult::Listing { entries }
}

/// Render the resolved configuration as pretty-printed JSON.
pub fn list_json(config: &Configuration) -> Result<ConfigResult, DoconfError> {
    Ok(ConfigResult::Json(serde_json::to_string_pretty(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{BASIC_DOCS, BASIC_SOURCE, MULTI_ENV_DOCS, SIMPLE_DOCS};
    use crate::ini::RawSource;
    use crate::types::Value;

    fn basic() -> (Schema, Configuration) {
        let schema = Schema::parse(BASIC_DOCS).unwrap();
        let raw = RawSource::parse(BASIC_SOURCE, None).unwrap();
        let config = schema.validate("default", &raw).unwrap();
        (schema, config)
    }

    #[test]
    fn template_lists_sections_in_order() {
        let schema = Schema::parse(BASIC_DOCS).unwrap();
        let template = generate_template(&schema, None).unwrap();
        let first = template.find("[section1]").unwrap();
        let second = template.find("[second_section]").unwrap();
        assert!(first < second);
        assert!(template.starts_with("# doconf_unittest configuration (DEFAULT environment)"));
    }

    #[test]
    fn template_writes_defaults_and_comments_required() {
        let schema = Schema::parse(BASIC_DOCS).unwrap();
        let template = generate_template(&schema, None).unwrap();
        assert!(template.contains("# person's age (int, required)\n# AGE =\n"));
        assert!(template.contains("# person's age (int)\nAGE2 = 333\n"));
        assert!(template.contains("IDEA = fizz buzz bar\n"));
        assert!(template.contains("SUCCESS2 = 1.0\n"));
    }

    #[test]
    fn template_null_default() {
        let schema = Schema::parse(SIMPLE_DOCS).unwrap();
        let template = generate_template(&schema, Some("default")).unwrap();
        assert!(template.contains("MILES_PER_HOUR = null\n"));
    }

    #[test]
    fn template_for_other_environment_validates_as_is() {
        let schema = Schema::parse(MULTI_ENV_DOCS).unwrap();
        let template = generate_template(&schema, Some("production")).unwrap();
        assert!(template.contains("HOSTNAME = production.example.org"));
        let raw = RawSource::parse(&template, None).unwrap();
        let config = schema.validate("production", &raw).unwrap();
        assert_eq!(config.value("server", "PORT").unwrap().as_integer(), Some(8082));
    }

    #[test]
    fn template_string_defaults_read_back_unchanged() {
        let docs = r#"
            name: quoting
            {default}
            [q]
            A (str:"null"): the word null
            B (str:'"q"'): already quoted
            C (str:" x "): padded
            D (str:""): empty
            E (str:plain): plain
        "#;
        let schema = Schema::parse(docs).unwrap();
        let template = generate_template(&schema, None).unwrap();
        let raw = RawSource::parse(&template, None).unwrap();
        let config = schema.validate("default", &raw).unwrap();
        for (name, expected) in [("A", "null"), ("B", "\"q\""), ("C", " x "), ("D", ""), ("E", "plain")] {
            assert_eq!(config["q"][name], Value::from(expected), "{name} in:\n{template}");
        }
    }

    #[test]
    fn template_keys_use_declared_identifier() {
        let schema = Schema::parse("name: app\n{default}\n[s]\nstraße (int:3): street\n").unwrap();
        let template = generate_template(&schema, None).unwrap();
        assert!(template.contains("straße = 3\n"));
        let raw = RawSource::parse(&template, None).unwrap();
        let config = schema.validate("default", &raw).unwrap();
        assert_eq!(config["s"]["straße"], Value::Integer(3));
    }

    #[test]
    fn template_unknown_environment() {
        let schema = Schema::parse(BASIC_DOCS).unwrap();
        let err = generate_template(&schema, Some("nope")).unwrap_err();
        assert!(matches!(err, DoconfError::UndefinedEnvironment { .. }));
    }

    #[test]
    fn get_key_with_doc() {
        let (schema, config) = basic();
        match get_value(&schema, &config, "section1.age").unwrap() {
            ConfigResult::KeyValue { key, value, doc } => {
                assert_eq!(key, "section1.AGE");
                assert_eq!(value, "30");
                assert_eq!(doc, vec!["person's age".to_string()]);
            }
            other => panic!("Expected KeyValue, got {other:?}"),
        }
    }

    #[test]
    fn get_defaulted_key() {
        let (schema, config) = basic();
        match get_value(&schema, &config, "second_section.NAME2").unwrap() {
            ConfigResult::KeyValue { value, .. } => assert_eq!(value, "guydude"),
            other => panic!("Expected KeyValue, got {other:?}"),
        }
    }

    #[test]
    fn get_missing_key() {
        let (schema, config) = basic();
        for key in ["section1", "section1.NOPE", "nope.AGE"] {
            let result = get_value(&schema, &config, key);
            assert!(
                matches!(result, Err(DoconfError::KeyNotFound(ref k)) if k == key),
                "{key}: {result:?}"
            );
        }
    }

    #[test]
    fn list_values_in_declaration_order() {
        let (_, config) = basic();
        match list_values(&config) {
            ConfigResult::Listing { entries } => {
                assert_eq!(entries.len(), 10);
                assert_eq!(entries[0], ("section1.DEBUG".into(), "true".into()));
                assert_eq!(entries[1], ("section1.AGE".into(), "30".into()));
                assert_eq!(entries[9], ("second_section.IDEA2".into(), "fazz bazz".into()));
            }
            other => panic!("Expected Listing, got {other:?}"),
        }
    }

    #[test]
    fn list_json_nests_sections() {
        let (_, config) = basic();
        let ConfigResult::Json(json) = list_json(&config).unwrap() else {
            panic!("Expected Json");
        };
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["section1"]["AGE"], 30);
        assert_eq!(parsed["section1"]["DEBUG"], true);
        assert_eq!(parsed["second_section"]["IDEA2"], "fazz bazz");
    }

    #[test]
    fn listing_display_format() {
        let result = ConfigResult::Listing {
            entries: vec![
                ("server.HOST".into(), "localhost".into()),
                ("server.PORT".into(), "8080".into()),
            ],
        };
        assert_eq!(format!("{result}"), "server.HOST = localhost\nserver.PORT = 8080");
    }

    #[test]
    fn valid_display_names_path_and_environment() {
        let result = ConfigResult::Valid {
            path: Some("/etc/app.cfg".into()),
            environment: "production".into(),
        };
        assert_eq!(
            format!("{result}"),
            "/etc/app.cfg is valid for environment 'production'"
        );
    }
}
