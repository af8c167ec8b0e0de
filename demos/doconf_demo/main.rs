//! # doconf demo application
//!
//! A sample CLI tool whose `--help` text doubles as its config schema. It
//! exists to demonstrate and manually verify doconf's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example doconf_demo -- config gen -o doconf-demo.cfg
//! cargo run --example doconf_demo -- serve
//! cargo run --example doconf_demo -- config list --json
//! cargo run --example doconf_demo -- serve --env production
//! ```
//!
//! | Feature              | How to exercise it                                          |
//! |----------------------|-------------------------------------------------------------|
//! | Discovery            | Put `doconf-demo.cfg` in cwd, `~/.config` or `/etc`         |
//! | `config find`        | `cargo run --example doconf_demo -- config find`            |
//! | `config validate`    | `cargo run --example doconf_demo -- config validate x.cfg`  |
//! | `config get`         | `cargo run --example doconf_demo -- config get server.port` |
//! | Environments         | `serve --env production` uses the `{production}` schema      |
//! | Strict mode          | `--strict` rejects keys the schema does not declare         |

use clap::{Parser, Subcommand};

use doconf::{ConfigArgs, DoconfError, Schema};

const DOCS: &str = r#"
Configuration for doconf-demo.

name: doconf-demo

{default}

[server]
HOST (str:"127.0.0.1"): address to bind
PORT (int:8080): port to listen on
WORKERS (int:2): number of worker threads

[auth]
TOKEN (str): shared secret clients must send
    > (required, there is no safe default)

{production}

[server]
HOST (str:"0.0.0.0"): address to bind
PORT (int:80): port to listen on
WORKERS (int:16): number of worker threads

[auth]
TOKEN (str): shared secret clients must send
"#;

/// doconf demo, a pretend server configured through its own documentation.
#[derive(Parser, Debug)]
#[command(name = "doconf-demo", after_help = DOCS)]
struct Cli {
    /// Reject config keys the schema does not declare.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print what the server would start with.
    Serve {
        /// Environment to run in.
        #[arg(short, long)]
        env: Option<String>,
    },
    /// Manage the configuration file (find, validate, gen, list, get).
    Config(ConfigArgs),
}

fn run(cli: Cli, schema: &Schema) -> Result<(), DoconfError> {
    let loader = schema.loader().strict(cli.strict);
    match cli.command {
        Commands::Serve { env } => {
            let loader = match &env {
                Some(env) => loader.environment(env),
                None => loader,
            };
            let config = loader.load()?;
            let server = &config["server"];
            println!(
                "[{}] listening on {}:{} with {} workers",
                config.environment(),
                server["host"],
                server["port"],
                server["workers"],
            );
            Ok(())
        }
        Commands::Config(args) => loader.handle_and_print(&args.into_action()),
    }
}

fn main() {
    let cli = Cli::parse();
    let result = Schema::parse(DOCS).and_then(|schema| run(cli, &schema));
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
