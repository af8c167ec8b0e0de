use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DoconfError {
    #[error("Invalid schema declaration{}: {reason}", locate(.line_no, .line))]
    SchemaDeclaration {
        line_no: usize,
        line: String,
        reason: String,
    },

    #[error("Cannot read {value:?} as {target}: {reason}")]
    TypeCoercion {
        value: String,
        target: String,
        reason: String,
    },

    #[error("No config file at {path}")]
    SourceMissing { path: PathBuf },

    #[error("No config path discovered for '{app_name}', checked:\n - {}", format_candidates(.candidates))]
    SourceNotDiscovered {
        app_name: String,
        candidates: Vec<PathBuf>,
    },

    #[error("Environment '{name}' is not defined (available: {})", .available.join(", "))]
    UndefinedEnvironment {
        name: String,
        available: Vec<String>,
    },

    #[error("Bad config in [{section}]: {reason}")]
    BadConfig {
        section: String,
        variable: Option<String>,
        value: Option<String>,
        reason: String,
    },

    #[error("Unknown key '{key}' in [{section}] (line {line})")]
    UnknownKey {
        section: String,
        key: String,
        line: usize,
    },

    #[error("Unknown section [{section}] (line {line})")]
    UnknownSection { section: String, line: usize },

    #[error("Unknown keys in config source:\n - {}", format_unknown(.0))]
    UnknownKeys(Vec<DoconfError>),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse {path} (line {line}): {reason}")]
    IniSyntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DoconfError {
    pub(crate) fn declaration(line_no: usize, line: &str, reason: impl Into<String>) -> Self {
        DoconfError::SchemaDeclaration {
            line_no,
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_config(
        section: &str,
        variable: Option<&str>,
        value: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        DoconfError::BadConfig {
            section: section.to_string(),
            variable: variable.map(str::to_string),
            value: value.map(str::to_string),
            reason: reason.into(),
        }
    }

    /// True for both "explicit path missing" and "nothing discovered".
    pub fn is_source_unavailable(&self) -> bool {
        matches!(
            self,
            DoconfError::SourceMissing { .. } | DoconfError::SourceNotDiscovered { .. }
        )
    }
}

/// Document-level problems (no line to blame) use line number 0.
fn locate(line_no: &usize, line: &str) -> String {
    if *line_no == 0 {
        String::new()
    } else {
        format!(" on line {line_no} ({line:?})")
    }
}

fn format_unknown(errors: &[DoconfError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n - ")
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n - ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_names_line() {
        let err = DoconfError::declaration(7, "[server]", "declare {default} first");
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("[server]"));
        assert!(msg.contains("{default}"));
    }

    #[test]
    fn document_level_declaration_has_no_line() {
        let err = DoconfError::declaration(0, "", "no {default} environment declared");
        assert_eq!(
            err.to_string(),
            "Invalid schema declaration: no {default} environment declared"
        );
    }

    #[test]
    fn not_discovered_lists_candidates() {
        let err = DoconfError::SourceNotDiscovered {
            app_name: "myapp".into(),
            candidates: vec!["./myapp.cfg".into(), "/etc/myapp.conf".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("myapp"));
        assert!(msg.contains("./myapp.cfg"));
        assert!(msg.contains("/etc/myapp.conf"));
        assert!(err.is_source_unavailable());
    }

    #[test]
    fn undefined_environment_lists_available() {
        let err = DoconfError::UndefinedEnvironment {
            name: "production".into(),
            available: vec!["default".into(), "staging".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("production"));
        assert!(msg.contains("default, staging"));
        assert!(!err.is_source_unavailable());
    }

    #[test]
    fn bad_config_names_section() {
        let err =
            DoconfError::bad_config("section1", Some("AGE"), None, "missing required variable AGE");
        let msg = err.to_string();
        assert!(msg.contains("[section1]"));
        assert!(msg.contains("AGE"));
    }

    #[test]
    fn unknown_keys_lists_each() {
        let err = DoconfError::UnknownKeys(vec![
            DoconfError::UnknownKey {
                section: "server".into(),
                key: "PROT".into(),
                line: 3,
            },
            DoconfError::UnknownSection {
                section: "sever".into(),
                line: 5,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Unknown key 'PROT' in [server] (line 3)"));
        assert!(msg.contains("Unknown section [sever] (line 5)"));
    }
}
