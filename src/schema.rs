//! The compiled schema: environments → sections → variables.
//!
//! A [`Schema`] is produced once by [`Schema::parse`] and never mutated
//! afterwards. Every level is an ordered map keyed by the lower-cased name, so
//! declaration order survives (for templates and listings) while lookups are
//! case-insensitive. Each item keeps the name as it was declared for messages.

use std::str::FromStr;

use indexmap::IndexMap;

use crate::config::Configuration;
use crate::error::DoconfError;
use crate::ini::RawSource;
use crate::builder::Loader;
use crate::parse;
use crate::resolve;
use crate::types::{Value, VarType};

/// The reserved, mandatory environment.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Normalized lookup key for environment, section and variable names.
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Every environment, section and variable declared for one application.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) app_name: String,
    pub(crate) environments: IndexMap<String, Environment>,
}

impl Schema {
    /// Compile documentation text into a schema.
    ///
    /// Fails with [`DoconfError::SchemaDeclaration`] on ordering or duplication
    /// problems, and with [`DoconfError::TypeCoercion`] when a declared default
    /// does not match its type.
    pub fn parse(docs: &str) -> Result<Self, DoconfError> {
        parse::parse_docs(docs)
    }

    /// The application name from the `name:` declaration.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Look up an environment by name, ignoring case.
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.get(&normalize(name))
    }

    /// The mandatory `default` environment.
    pub fn default_environment(&self) -> &Environment {
        // Parsing rejects schemas without it.
        &self.environments[DEFAULT_ENVIRONMENT]
    }

    /// Environments in declaration order.
    pub fn environments(&self) -> impl Iterator<Item = &Environment> {
        self.environments.values()
    }

    /// Declared environment names, in declaration order.
    pub fn environment_names(&self) -> Vec<String> {
        self.environments.values().map(|e| e.name.clone()).collect()
    }

    /// Validate an already-read source against one environment.
    pub fn validate(&self, environment: &str, raw: &RawSource) -> Result<Configuration, DoconfError> {
        resolve::resolve(self, environment, raw, false)
    }

    /// Start building a load: pick the environment, the source, strictness.
    pub fn loader(&self) -> Loader<'_> {
        Loader::new(self)
    }
}

impl FromStr for Schema {
    type Err = DoconfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schema::parse(s)
    }
}

/// A named deployment profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub(crate) name: String,
    pub(crate) sections: IndexMap<String, Section>,
}

impl Environment {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sections: IndexMap::new(),
        }
    }

    /// The name as declared (e.g. `PRODUCTION` for `{PRODUCTION}`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        normalize(&self.name) == DEFAULT_ENVIRONMENT
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(&normalize(name))
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }
}

/// A named group of variables, matching one `[section]` of the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub(crate) name: String,
    pub(crate) variables: IndexMap<String, Variable>,
}

impl Section {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variables: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(&normalize(name))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Whether any variable lacks a default. If so, a config source that
    /// omits this section is rejected.
    pub fn has_required(&self) -> bool {
        self.variables.values().any(Variable::is_required)
    }
}

/// One declared configuration key.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub(crate) name: String,
    pub(crate) ident: String,
    pub(crate) var_type: VarType,
    pub(crate) default: Option<Value>,
    pub(crate) description: String,
}

impl Variable {
    /// Upper-cased canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identifier exactly as declared, used for lookups.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    /// The declared default, already coerced. `Some(Value::Null)` for
    /// `null`/`none` defaults.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
