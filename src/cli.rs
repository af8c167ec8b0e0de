//! Clap adapter for doconf.
//!
//! This module is the **optional integration layer** between doconf's
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! [`ConfigArgs`] and [`ConfigSubcommand`] embed into an application's own
//! `#[derive(Parser)]` struct to give it `config find|validate|gen|list|get`
//! subcommands. [`ConfigArgs::into_action()`] converts the parsed arguments
//! into a [`ConfigAction`](crate::ConfigAction), which
//! [`Loader::handle()`](crate::Loader::handle) runs.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::types::ConfigAction;

/// Clap-derived args for the `config` subcommand group.
///
/// Embed this into your app's clap derive:
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
///
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Environment to validate against (e.g. "production"). Defaults to "default".
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Print the config file that would be loaded.
    Find,
    /// Check a config file against the schema.
    Validate {
        /// Config file to check instead of discovering one.
        path: Option<PathBuf>,
    },
    /// Generate a commented sample configuration file.
    Gen {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show all resolved configuration values.
    List {
        /// Config file to read instead of discovering one.
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the resolved value and description for a config key.
    Get {
        /// Key as "section.NAME" (e.g. "server.port").
        key: String,
        /// Config file to read instead of discovering one.
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl ConfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// Bare `config` (no subcommand) validates the discovered file. The `--env`
    /// flag is threaded through to every variant except `Find`.
    pub fn into_action(self) -> ConfigAction {
        let env = self.env;
        match self.action {
            None => ConfigAction::Validate { path: None, env },
            Some(ConfigSubcommand::Find) => ConfigAction::Find,
            Some(ConfigSubcommand::Validate { path }) => ConfigAction::Validate { path, env },
            Some(ConfigSubcommand::Gen { output }) => ConfigAction::Gen { output, env },
            Some(ConfigSubcommand::List { path, json }) => ConfigAction::List { path, env, json },
            Some(ConfigSubcommand::Get { key, path }) => ConfigAction::Get { key, path, env },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Wrapper so we can use `try_parse_from` on the subcommand.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> ConfigAction {
        TestCli::try_parse_from(args).unwrap().config.into_action()
    }

    #[test]
    fn parse_find() {
        assert_eq!(parse(&["test", "find"]), ConfigAction::Find);
    }

    #[test]
    fn parse_bare_config_is_validate() {
        assert_eq!(
            parse(&["test"]),
            ConfigAction::Validate {
                path: None,
                env: None
            }
        );
    }

    #[test]
    fn parse_validate_with_path() {
        assert_eq!(
            parse(&["test", "validate", "/etc/myapp.cfg"]),
            ConfigAction::Validate {
                path: Some(PathBuf::from("/etc/myapp.cfg")),
                env: None,
            }
        );
    }

    #[test]
    fn parse_gen_with_output() {
        assert_eq!(
            parse(&["test", "gen", "-o", "out.cfg"]),
            ConfigAction::Gen {
                output: Some(PathBuf::from("out.cfg")),
                env: None,
            }
        );
    }

    #[test]
    fn parse_list_json() {
        assert_eq!(
            parse(&["test", "list", "--json"]),
            ConfigAction::List {
                path: None,
                env: None,
                json: true,
            }
        );
    }

    #[test]
    fn parse_list_with_path() {
        assert_eq!(
            parse(&["test", "list", "--path", "app.cfg"]),
            ConfigAction::List {
                path: Some(PathBuf::from("app.cfg")),
                env: None,
                json: false,
            }
        );
    }

    #[test]
    fn parse_get() {
        assert_eq!(
            parse(&["test", "get", "server.port"]),
            ConfigAction::Get {
                key: "server.port".into(),
                path: None,
                env: None,
            }
        );
    }

    #[test]
    fn invalid_subcommand_errors() {
        assert!(TestCli::try_parse_from(["test", "nope"]).is_err());
    }

    #[test]
    fn get_requires_key() {
        assert!(TestCli::try_parse_from(["test", "get"]).is_err());
    }

    // --- env flag tests ---

    #[test]
    fn parse_env_before_subcommand() {
        assert_eq!(
            parse(&["test", "--env", "production", "get", "server.port"]),
            ConfigAction::Get {
                key: "server.port".into(),
                path: None,
                env: Some("production".into()),
            }
        );
    }

    #[test]
    fn parse_env_after_subcommand() {
        assert_eq!(
            parse(&["test", "gen", "-e", "staging"]),
            ConfigAction::Gen {
                output: None,
                env: Some("staging".into()),
            }
        );
    }

    #[test]
    fn parse_bare_config_with_env() {
        assert_eq!(
            parse(&["test", "--env", "production"]),
            ConfigAction::Validate {
                path: None,
                env: Some("production".into()),
            }
        );
    }
}
