//! Configuration schemas written as documentation. Describe your config in
//! prose, get typed, validated values back.
//!
//! Doconf compiles a small documentation DSL into a [`Schema`], then checks
//! INI config files against it: required keys, declared types, defaults, and
//! per-environment variants of every section.
//!
//! ```ignore
//! const DOCS: &str = r#"
//!     name: myapp
//!
//!     {default}
//!     [server]
//!     HOST (str:"127.0.0.1"): address to bind
//!     PORT (int:8080): port to listen on
//!     TOKEN (str): API token, required
//! "#;
//!
//! let schema = Schema::parse(DOCS)?;
//! let config = schema.loader().load()?;
//! let port = config["server"]["port"].as_integer();
//! ```
//!
//! That `load()` call finds `myapp.cfg` (or `.config`, `.conf`) in the usual
//! places, checks that `TOKEN` is present, coerces `PORT` to an integer, fills
//! in `HOST`, and hands you a [`Configuration`].
//!
//! # The documentation DSL
//!
//! The same text that explains your configuration to a reader is the schema.
//! Each meaningful line is one of:
//!
//! ```text
//! name: myapp                          application name, once, first
//! {default}                            start an environment
//! [server]                             start a section in that environment
//! PORT (int:8080): port to listen on   declare a variable
//!     > more description               continue the previous description
//! ```
//!
//! A variable is `NAME (type:default): description`. The type is one of
//! `str`, `int`, `float`, `bool` and defaults to `str`. A variable without a
//! default is required. `null` or `none` as a default makes it optional with
//! no value. Blank lines, `#` comments and free prose are ignored, so the
//! schema can live inside a larger help text or README.
//!
//! # Environments
//!
//! `{default}` is mandatory and must come first. Other environments
//! (`{production}`, `{staging}`, ...) are complete, independent schemas: they
//! declare their own sections, variables and defaults, and inherit nothing
//! from `default`. Pick one with [`Loader::environment`]; names ignore case.
//!
//! # Loading
//!
//! [`Schema::loader`] returns a [`Loader`] that picks the source:
//!
//! - [`text()`](Loader::text): INI text you already hold (wins over the rest)
//! - [`path()`](Loader::path): an explicit file, which must exist
//! - otherwise discovery, the first existing `{app}.cfg|.config|.conf` in
//!   `.`, `$HOME`, `~/.config[/{app}]`, `$XDG_CONFIG_HOME[/{app}]`, each
//!   `$XDG_CONFIG_DIRS` entry, `/etc/{app}`, `/etc`
//!
//! Section and key lookups ignore case everywhere. Values that fail to coerce,
//! missing required keys and missing sections that declare required keys all
//! fail with [`DoconfError::BadConfig`], naming the section, variable and
//! value. With [`strict(true)`](Loader::strict), keys and sections the schema
//! does not declare are rejected too.
//!
//! # Core library, no CLI framework required
//!
//! Everything works through [`Loader`] and [`ConfigAction`]. For
//! [clap](https://docs.rs/clap) users, the `clap` Cargo feature (on by
//! default) adds [`ConfigArgs`] / [`ConfigSubcommand`], which give your app
//! `config find|validate|gen|list|get` subcommands:
//!
//! ```ignore
//! #[derive(Subcommand)]
//! enum Commands {
//!     Config(ConfigArgs),
//! }
//!
//! // in main:
//! Commands::Config(args) => schema.loader().handle_and_print(&args.into_action())?,
//! ```
//!
//! To use doconf without clap:
//!
//! ```toml
//! doconf = { version = "...", default-features = false }
//! ```
//!
//! # Logging
//!
//! Doconf emits [`tracing`](https://docs.rs/tracing) events (discovery results,
//! the file read, the environment validated) and never installs a subscriber.

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod coerce;
mod config;
mod file;
mod ini;
mod ops;
mod parse;
mod resolve;
mod schema;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::Loader;
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use coerce::{coerce, is_null_literal};
pub use config::{Configuration, SectionValues};
pub use error::DoconfError;
pub use file::{DiscoveryEnv, discover, possible_paths};
pub use ini::{RawEntry, RawSection, RawSource};
pub use ops::{ConfigResult, generate_template};
pub use schema::{DEFAULT_ENVIRONMENT, Environment, Schema, Section, Variable};
pub use types::{ConfigAction, Value, VarType};
