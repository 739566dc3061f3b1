//! `clinic` command-line entry point.
//!
//! # Responsibility
//! - Assemble `ApiConfig` from flags and environment variables.
//! - Run the HTTP server, apply migrations, provision accounts, or mint
//!   tokens for local testing.
//!
//! # Invariants
//! - Logging is initialized before any other subcommand work.
//! - Failures print one line to stderr and exit with status 1.

use clap::{Parser, Subcommand};
use clinic_api::{ApiConfig, Hs256Gate, Role};
use clinic_core::db::migrations::{latest_version, schema_version};
use clinic_core::{
    default_log_level, init_logging, open_db, AccountFields, AccountService, SqliteAccountRepository,
};
use log::error;
use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic booking backend: practitioners, weekly slots and bookings")]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(
        long,
        global = true,
        env = "CLINIC_DB_PATH",
        default_value = clinic_api::config::DEFAULT_DB_PATH
    )]
    db_path: PathBuf,

    /// Address the HTTP server listens on
    #[arg(
        long,
        global = true,
        env = "CLINIC_BIND",
        default_value = clinic_api::config::DEFAULT_BIND
    )]
    bind: SocketAddr,

    /// HS256 secret used to verify bearer tokens
    #[arg(long, global = true, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Origin admitted by CORS
    #[arg(
        long,
        global = true,
        env = "BASE_URL",
        default_value = clinic_api::config::DEFAULT_ALLOWED_ORIGIN
    )]
    allowed_origin: String,

    /// Upper bound on concurrently open SQLite connections
    #[arg(
        long,
        global = true,
        env = "CLINIC_DB_MAX_CONNECTIONS",
        default_value_t = clinic_api::config::DEFAULT_MAX_CONNECTIONS
    )]
    max_connections: usize,

    /// Lifetime of tokens minted by `issue-token`, in seconds
    #[arg(
        long,
        global = true,
        env = "JWT_EXPIRATION_SECS",
        default_value_t = clinic_api::config::DEFAULT_TOKEN_TTL_SECS,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    token_ttl_secs: i64,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "CLINIC_LOG_LEVEL", default_value = default_log_level())]
    log_level: String,

    /// Write rotating log files here instead of stderr
    #[arg(long, global = true, env = "CLINIC_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API until Ctrl+C
    Serve,
    /// Create or upgrade the database schema, then exit
    Migrate,
    /// Provision an account; its id is the subject for `issue-token`
    AddAccount {
        #[arg(long)]
        username: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// admin|patient
        #[arg(long, default_value = "patient")]
        role: Role,
    },
    /// Print a signed bearer token
    IssueToken {
        /// Account id placed in the `sub` claim
        #[arg(long)]
        subject: i64,
        /// admin|patient
        #[arg(long, default_value = "patient")]
        role: Role,
    },
}

impl Cli {
    fn api_config(&self) -> ApiConfig {
        ApiConfig {
            db_path: self.db_path.clone(),
            bind: self.bind,
            jwt_secret: self.jwt_secret.clone(),
            allowed_origin: self.allowed_origin.clone(),
            max_connections: self.max_connections,
            token_ttl_secs: self.token_ttl_secs,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.log_level, cli.log_dir.as_deref()) {
        eprintln!("clinic: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("clinic: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.api_config();
    match cli.command {
        Command::Serve => clinic_api::serve(config).await?,
        Command::Migrate => {
            let conn = open_db(&config.db_path)?;
            println!(
                "schema_version={} latest={} path={}",
                schema_version(&conn)?,
                latest_version(),
                config.db_path.display()
            );
        }
        Command::AddAccount {
            username,
            name,
            role,
        } => {
            let conn = open_db(&config.db_path)?;
            let account = AccountService::new(SqliteAccountRepository::try_new(&conn)?)
                .create_account(&AccountFields {
                    username,
                    name,
                    role: role.to_string(),
                })?;
            println!(
                "account_id={} username={} role={}",
                account.id, account.username, account.role
            );
        }
        Command::IssueToken { subject, role } => {
            let secret = config
                .jwt_secret
                .as_deref()
                .map(str::trim)
                .filter(|secret| !secret.is_empty())
                .ok_or("JWT_SECRET is not set; pass --jwt-secret or export it")?;
            let gate = Hs256Gate::new(secret, config.token_ttl_secs)?;
            println!("{}", gate.issue(subject, role)?);
        }
    }
    Ok(())
}
