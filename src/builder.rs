use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::error::DoconfError;
use crate::file::{self, DiscoveryEnv};
use crate::ini::RawSource;
use crate::ops::{self, ConfigResult};
use crate::resolve;
use crate::schema::{DEFAULT_ENVIRONMENT, Schema};
use crate::types::ConfigAction;

/// Builder for loading a config source against a compiled [`Schema`].
///
/// Controls three independent choices:
///
/// - **Environment**: [`environment()`](Self::environment), `default` unless set.
/// - **Source**: [`text()`](Self::text) wins over [`path()`](Self::path), which
///   wins over discovery by the schema's app name.
/// - **Strictness**: [`strict()`](Self::strict), off unless set.
pub struct Loader<'a> {
    schema: &'a Schema,
    environment: Option<String>,
    path: Option<PathBuf>,
    text: Option<String>,
    discovery: Option<DiscoveryEnv>,
    strict: bool,
}

impl<'a> Loader<'a> {
    pub(crate) fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            environment: None,
            path: None,
            text: None,
            discovery: None,
            strict: false,
        }
    }

    /// Select the environment to validate against (default: `default`).
    pub fn environment(mut self, name: &str) -> Self {
        self.environment = Some(name.to_string());
        self
    }

    /// Read this file instead of discovering one. It must exist.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validate this INI text directly. Takes precedence over [`path()`](Self::path).
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Replace the process environment used for discovery.
    pub fn discovery_env(mut self, env: DiscoveryEnv) -> Self {
        self.discovery = Some(env);
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, undeclared sections and keys produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn effective_environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    fn effective_discovery(&self) -> DiscoveryEnv {
        self.discovery.clone().unwrap_or_else(DiscoveryEnv::from_process)
    }

    /// Apply per-action overrides from a [`ConfigAction`].
    fn with_overrides(mut self, path: Option<&PathBuf>, env: Option<&String>) -> Self {
        if let Some(path) = path {
            self.path = Some(path.clone());
        }
        if let Some(env) = env {
            self.environment = Some(env.clone());
        }
        self
    }

    /// The config file a load would read: the explicit path if it exists,
    /// otherwise the first discovered candidate.
    pub fn find(&self) -> Result<PathBuf, DoconfError> {
        file::resolve_source_path(
            self.path.as_deref(),
            self.schema.app_name(),
            &self.effective_discovery(),
        )
    }

    fn read_source(&self) -> Result<RawSource, DoconfError> {
        if let Some(text) = &self.text {
            return RawSource::parse(text, None);
        }
        let path = self.find()?;
        tracing::debug!(path = %path.display(), "reading config source");
        RawSource::read(&path)
    }

    /// Read the source and validate it against the selected environment.
    pub fn load(&self) -> Result<Configuration, DoconfError> {
        let raw = self.read_source()?;
        resolve::resolve(self.schema, self.effective_environment(), &raw, self.strict)
    }

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(self, action: &ConfigAction) -> Result<(), DoconfError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `ConfigAction` (find / validate / gen / list / get).
    pub fn handle(self, action: &ConfigAction) -> Result<ConfigResult, DoconfError> {
        match action {
            ConfigAction::Find => Ok(ConfigResult::Found { path: self.find()? }),
            ConfigAction::Validate { path, env } => {
                let loader = self.with_overrides(path.as_ref(), env.as_ref());
                let raw = loader.read_source()?;
                let config = resolve::resolve(
                    loader.schema,
                    loader.effective_environment(),
                    &raw,
                    loader.strict,
                )?;
                Ok(ConfigResult::Valid {
                    path: raw.path().map(Path::to_path_buf),
                    environment: config.environment().to_string(),
                })
            }
            ConfigAction::Gen { output, env } => {
                let loader = self.with_overrides(None, env.as_ref());
                let template =
                    ops::generate_template(loader.schema, Some(loader.effective_environment()))?;
                match output {
                    Some(path) => {
                        if let Some(parent) = path.parent()
                            && !parent.as_os_str().is_empty()
                        {
                            std::fs::create_dir_all(parent).map_err(|e| DoconfError::IoError {
                                path: parent.to_path_buf(),
                                source: e,
                            })?;
                        }
                        std::fs::write(path, &template).map_err(|e| DoconfError::IoError {
                            path: path.clone(),
                            source: e,
                        })?;
                        Ok(ConfigResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(ConfigResult::Template(template)),
                }
            }
            ConfigAction::List { path, env, json } => {
                let loader = self.with_overrides(path.as_ref(), env.as_ref());
                let config = loader.load()?;
                if *json {
                    ops::list_json(&config)
                } else {
                    Ok(ops::list_values(&config))
                }
            }
            ConfigAction::Get { key, path, env } => {
                let loader = self.with_overrides(path.as_ref(), env.as_ref());
                let config = loader.load()?;
                ops::get_value(loader.schema, &config, key)
            }
        }
    }
}
