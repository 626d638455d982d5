//! Top-level argument parsing and the invocation lifecycle

use crate::audit::AuditRecorder;
use crate::batch::BatchReport;
use crate::commands::{self, Commands};
use crate::config::{Config, ConfigPaths};
use crate::context::{raw_command, GlobalOptions, Invocation};
use crate::error::{CliError, CliResult};
use crate::logging::{init_tracing, Console, LogLevel};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// kc - batch administration for Keycloak realms
#[derive(Parser, Debug)]
#[command(name = "kc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config.json
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Default target realm for every command
    #[arg(long)]
    pub realm: Option<String>,

    /// Ticket reference shown in the summary and recorded in the audit
    #[arg(long)]
    pub jira: Option<String>,

    /// Execution log file (appended)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Audit CSV file (appended)
    #[arg(long, value_name = "PATH")]
    pub audit_file: Option<PathBuf>,

    /// Log each applied change
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log HTTP requests and responses
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log everything
    #[arg(long, global = true)]
    pub trace: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override the command deadline (milliseconds)
    #[arg(long, value_name = "MS", hide = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_flags(self.verbose, self.debug, self.trace, self.quiet)
    }

    /// Deadline for the whole command, per group unless overridden
    pub fn deadline(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.command.timeout())
    }
}

/// Run one invocation and return the process exit code
///
/// `args` are the raw arguments after the program name, used to rebuild the
/// invocation for the log and audit trail.
pub async fn run<S: AsRef<str>>(cli: Cli, args: &[S]) -> i32 {
    let (config, paths) = match load(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            e.print(&Console::terminal_only());
            return e.exit_code();
        }
    };

    let console = match Console::open(&paths.log_file) {
        Ok(console) => console,
        Err(e) => {
            tracing::warn!(path = %paths.log_file.display(), error = %e, "execution log unavailable");
            Console::terminal_only()
        }
    };

    let global = GlobalOptions {
        realm: cli.realm.clone(),
        jira: cli.jira.clone(),
    };
    let deadline = cli.deadline();
    let command = cli.command;
    let recorder = AuditRecorder::new(&paths.audit_file);

    let mut inv = match Invocation::new(config, global, console, command.path(), raw_command(args)) {
        Ok(inv) => inv,
        Err(e) => {
            e.print(&Console::terminal_only());
            return e.exit_code();
        }
    };
    inv.begin();

    let mut report = BatchReport::new();
    let result = match tokio::time::timeout(
        deadline,
        commands::execute(command, &mut inv, &mut report),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(CliError::Timeout(deadline)),
    };

    if !report.lines().is_empty() {
        inv.render(&report);
    }
    inv.finish(result, &report, &recorder)
}

fn load(cli: &Cli) -> CliResult<(Config, ConfigPaths)> {
    let paths = ConfigPaths::resolve(
        cli.config.as_deref(),
        cli.log_file.as_deref(),
        cli.audit_file.as_deref(),
    )?;
    tracing::debug!(config = %paths.config_file.display(), "loading configuration");
    let config = Config::load(&paths.config_file)?;
    Ok((config, paths))
}

/// Parse arguments, set up diagnostics and run
pub async fn main_entry() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = Cli::parse();
    init_tracing(cli.log_level());
    run(cli, &args).await
}
