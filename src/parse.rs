//! The schema DSL compiler.
//!
//! Documentation text is read line by line. Blank lines and `#` comments are
//! dropped, the rest are trimmed and classified as one of:
//!
//! ```text
//! name: my_app                          application name, exactly once, first
//! {production}                          open an environment
//! [server]                              open a section in the current environment
//! PORT (int:8080): listening port       declare a variable
//!     > more description                continue the previous description
//! ```
//!
//! Anything else is prose and is skipped, so a schema can live inside a
//! larger block of documentation.
//!
//! Ordering rules: the name comes before every environment and section;
//! `{default}` must be declared before any section (of any environment);
//! variables need a name, `{default}` and an open section. Opening an
//! environment closes the current section. Duplicates are compared ignoring
//! case at every level.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::coerce;
use crate::error::DoconfError;
use crate::schema::{self, DEFAULT_ENVIRONMENT, Environment, Schema, Section, Variable};
use crate::types::VarType;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:name)\s*:\s*(?P<name>\S+)$").expect("valid regex"));

static ENV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\s*(?P<env>[^}]+?)\s*\}$").expect("valid regex"));

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*(?P<section>[^\]]+?)\s*\]$").expect("valid regex"));

// The parenthesized group may hold quoted defaults containing `)` or `:`.
static VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<id>\w+)\s*(?:\((?P<decl>(?:"[^"]*"|'[^']*'|[^)"'])+)\))?\s*:\s*(?P<desc>.*)$"#,
    )
    .expect("valid regex")
});

// Starts like a typed declaration but VAR_RE rejected it.
static MALFORMED_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\s*\(.*:").expect("valid regex"));

/// One classified documentation line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Name(&'a str),
    Environment(&'a str),
    Section(&'a str),
    Variable {
        id: &'a str,
        decl: Option<&'a str>,
        desc: &'a str,
    },
    MalformedVariable,
    Continuation(&'a str),
    Prose,
}

fn classify(line: &str, section_open: bool) -> Line<'_> {
    if let Some(rest) = line.strip_prefix('>') {
        return Line::Continuation(rest.trim());
    }
    // Once a section is open, `name: x` is an untyped variable called NAME.
    if !section_open && let Some(caps) = NAME_RE.captures(line) {
        return Line::Name(caps.name("name").map_or("", |m| m.as_str()));
    }
    if let Some(caps) = ENV_RE.captures(line) {
        return Line::Environment(caps.name("env").map_or("", |m| m.as_str()));
    }
    if let Some(caps) = SECTION_RE.captures(line) {
        return Line::Section(caps.name("section").map_or("", |m| m.as_str()));
    }
    if let Some(caps) = VAR_RE.captures(line) {
        return Line::Variable {
            id: caps.name("id").map_or("", |m| m.as_str()),
            decl: caps.name("decl").map(|m| m.as_str()),
            desc: caps.name("desc").map_or("", |m| m.as_str().trim()),
        };
    }
    if MALFORMED_VAR_RE.is_match(line) {
        return Line::MalformedVariable;
    }
    Line::Prose
}

#[derive(Default)]
struct Parser {
    app_name: Option<String>,
    environments: IndexMap<String, Environment>,
    current_env: Option<String>,
    current_section: Option<String>,
    last_variable: Option<String>,
}

/// Compile documentation text into a [`Schema`].
pub fn parse_docs(docs: &str) -> Result<Schema, DoconfError> {
    let mut parser = Parser::default();

    for (idx, raw) in docs.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        parser.feed(idx + 1, line)?;
    }

    parser.finish()
}

impl Parser {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), DoconfError> {
        match classify(line, self.current_section.is_some()) {
            Line::Name(name) => self.declare_name(line_no, line, name),
            Line::Environment(name) => self.open_environment(line_no, line, name),
            Line::Section(name) => self.open_section(line_no, line, name),
            Line::Variable { id, decl, desc } => self.declare_variable(line_no, line, id, decl, desc),
            Line::MalformedVariable => {
                self.require_variable_context(line_no, line)?;
                Err(DoconfError::declaration(
                    line_no,
                    line,
                    "malformed variable declaration, expected `NAME (type:default): description`",
                ))
            }
            Line::Continuation(text) => {
                self.continue_description(text);
                Ok(())
            }
            Line::Prose => {
                tracing::trace!(line_no, line, "skipping unrecognized documentation line");
                Ok(())
            }
        }
    }

    fn declare_name(&mut self, line_no: usize, line: &str, name: &str) -> Result<(), DoconfError> {
        if self.app_name.is_some() {
            return Err(DoconfError::declaration(
                line_no,
                line,
                "duplicate `name: <name>` declaration",
            ));
        }
        self.app_name = Some(name.to_string());
        Ok(())
    }

    fn open_environment(&mut self, line_no: usize, line: &str, name: &str) -> Result<(), DoconfError> {
        if self.app_name.is_none() {
            return Err(DoconfError::declaration(
                line_no,
                line,
                "specify `name: <name>` before environments",
            ));
        }
        let key = schema::normalize(name);
        if self.environments.contains_key(&key) {
            return Err(DoconfError::declaration(
                line_no,
                line,
                format!("environment '{name}' is already declared"),
            ));
        }
        self.environments.insert(key.clone(), Environment::new(name));
        self.current_env = Some(key);
        self.current_section = None;
        self.last_variable = None;
        Ok(())
    }

    fn open_section(&mut self, line_no: usize, line: &str, name: &str) -> Result<(), DoconfError> {
        if self.app_name.is_none() {
            return Err(DoconfError::declaration(
                line_no,
                line,
                "specify `name: <name>` before sections",
            ));
        }
        if !self.environments.contains_key(DEFAULT_ENVIRONMENT) {
            return Err(DoconfError::declaration(
                line_no,
                line,
                "declare the {default} environment before any section",
            ));
        }
        let env = self.current_environment_mut();
        let key = schema::normalize(name);
        if env.sections.contains_key(&key) {
            let reason = format!(
                "section [{name}] is already declared in environment '{}'",
                env.name
            );
            return Err(DoconfError::declaration(line_no, line, reason));
        }
        env.sections.insert(key.clone(), Section::new(name));
        self.current_section = Some(key);
        self.last_variable = None;
        Ok(())
    }

    /// Checks shared by well-formed and malformed variable lines, each with
    /// its own message.
    fn require_variable_context(&self, line_no: usize, line: &str) -> Result<(), DoconfError> {
        if self.app_name.is_none() {
            return Err(DoconfError::declaration(
                line_no,
                line,
                "specify `name: <name>` before variables",
            ));
        }
        if !self.environments.contains_key(DEFAULT_ENVIRONMENT) {
            return Err(DoconfError::declaration(
                line_no,
                line,
                "declare the {default} environment before variables",
            ));
        }
        if self.current_section.is_none() {
            return Err(DoconfError::declaration(
                line_no,
                line,
                "declare a [section] before variables",
            ));
        }
        Ok(())
    }

    fn declare_variable(
        &mut self,
        line_no: usize,
        line: &str,
        id: &str,
        decl: Option<&str>,
        desc: &str,
    ) -> Result<(), DoconfError> {
        self.require_variable_context(line_no, line)?;

        let name = id.to_uppercase();
        let (var_type, default) = match decl {
            None => (VarType::String, None),
            Some(decl) => {
                // Everything after the first colon is the default's raw text.
                let (type_str, default_raw) = match decl.split_once(':') {
                    Some((t, d)) => (t, Some(d)),
                    None => (decl, None),
                };
                let var_type: VarType = type_str.parse().map_err(|e| at_line(e, line_no))?;
                let default = default_raw
                    .map(|raw| coerce::coerce(raw, var_type))
                    .transpose()
                    .map_err(|e| at_line(e, line_no))?;
                (var_type, default)
            }
        };

        let section = self.current_section_mut();
        // Keyed by the identifier as written: upper-casing does not round-trip
        // for every script (`ß` becomes `SS`).
        let key = schema::normalize(id);
        if section.variables.contains_key(&key) {
            let reason = format!("{name} is already declared in [{}]", section.name);
            return Err(DoconfError::declaration(line_no, line, reason));
        }
        section.variables.insert(
            key.clone(),
            Variable {
                name,
                ident: id.to_string(),
                var_type,
                default,
                description: desc.to_string(),
            },
        );
        self.last_variable = Some(key);
        Ok(())
    }

    fn continue_description(&mut self, text: &str) {
        let Some(var_key) = self.last_variable.clone() else {
            tracing::trace!(text, "continuation line without a variable, skipping");
            return;
        };
        let section = self.current_section_mut();
        if let Some(var) = section.variables.get_mut(&var_key) {
            if !var.description.is_empty() && !text.is_empty() {
                var.description.push(' ');
            }
            var.description.push_str(text);
        }
    }

    // Only called once an environment is known to be open.
    fn current_environment_mut(&mut self) -> &mut Environment {
        let key = self.current_env.as_deref().unwrap_or(DEFAULT_ENVIRONMENT);
        &mut self.environments[key]
    }

    // Only called once a section is known to be open.
    fn current_section_mut(&mut self) -> &mut Section {
        let key = self.current_section.clone().unwrap_or_default();
        &mut self.current_environment_mut().sections[&key]
    }

    fn finish(self) -> Result<Schema, DoconfError> {
        let has_default_sections = self
            .environments
            .get(DEFAULT_ENVIRONMENT)
            .is_some_and(|env| !env.sections.is_empty());
        if !has_default_sections {
            return Err(DoconfError::declaration(
                0,
                "",
                "the {default} environment must be declared with at least one section",
            ));
        }
        // The default environment can only exist after a name was declared.
        let app_name = self.app_name.unwrap_or_default();
        tracing::debug!(
            app_name = %app_name,
            environments = self.environments.len(),
            "compiled config schema"
        );
        Ok(Schema {
            app_name,
            environments: self.environments,
        })
    }
}

/// Attach the documentation line to a coercion failure.
fn at_line(err: DoconfError, line_no: usize) -> DoconfError {
    match err {
        DoconfError::TypeCoercion {
            value,
            target,
            reason,
        } => DoconfError::TypeCoercion {
            value,
            target,
            reason: format!("{reason} (schema line {line_no})"),
        },
        other => other,
    }
}
