//! Command-line entry point for the EduForge catalog.
//!
//! - `serve`: run the HTTP API.
//! - `ping`: print a linkage/version probe.
//! - `seed-institution`: insert one institution for local setups.

use catalog_api::config::{resolve_db_path, DEFAULT_BIND_ADDR};
use catalog_api::ServerConfig;
use catalog_core::db::open_db;
use catalog_core::{
    default_log_level, init_logging, InstitutionRepository, InstitutionType, LogSettings,
    NewInstitution, SqliteInstitutionRepository,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use std::net::SocketAddr;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "eduforge-catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Academic catalog service (programs, levels, subjects)", long_about = None)]
struct Cli {
    /// SQLite database file (defaults to a file in the temp directory)
    #[arg(long, global = true, env = "EDUFORGE_DB_PATH")]
    db_path: Option<String>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "EDUFORGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset
    #[arg(long, global = true, env = "EDUFORGE_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Socket address to listen on
        #[arg(long, env = "EDUFORGE_BIND", default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
    },

    /// Print core linkage and version
    Ping,

    /// Insert an institution and print its id
    SeedInstitution {
        /// Institution name
        #[arg(long)]
        name: String,

        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Universite,
    Ecole,
    Lycee,
    College,
}

impl From<KindArg> for InstitutionType {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Universite => Self::Universite,
            KindArg::Ecole => Self::Ecole,
            KindArg::Lycee => Self::Lycee,
            KindArg::College => Self::College,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = LogSettings {
        level: cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string()),
        log_dir: cli.log_dir.clone(),
    };
    if let Err(err) = init_logging(&settings) {
        eprintln!("logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    let db_path = resolve_db_path(cli.db_path.as_deref());
    match cli.command {
        Commands::Ping => {
            println!("catalog_core ping={}", catalog_core::ping());
            println!("catalog_core version={}", catalog_core::core_version());
            ExitCode::SUCCESS
        }
        Commands::Serve { bind } => {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("event=server_start module=cli status=error error={err}");
                    eprintln!("failed to start runtime: {err}");
                    return ExitCode::FAILURE;
                }
            };
            match runtime.block_on(catalog_api::serve(ServerConfig::new(bind, db_path))) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    error!("event=server_stop module=cli status=error error={err}");
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::SeedInstitution {
            name,
            kind,
            city,
            country,
        } => {
            let seeded = open_db(&db_path).map_err(|err| err.to_string()).and_then(|conn| {
                SqliteInstitutionRepository::new(&conn)
                    .create_institution(&NewInstitution {
                        name: name.trim().to_string(),
                        kind: kind.map(InstitutionType::from),
                        city,
                        country,
                    })
                    .map_err(|err| err.to_string())
            });
            match seeded {
                Ok(institution) => {
                    println!("{}", institution.id);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!("event=seed_institution module=cli status=error error={err}");
                    eprintln!("seed failed: {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
