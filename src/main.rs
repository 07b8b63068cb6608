//! Binary entry point for the raidctl CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use raidctl::{
    AlwaysConfirm, Confirm, ConfigError, ConsoleConfirm, DeleteError, DeleteOrchestrator,
    DeleteOutcome, DeletionRequest, DriveError, HttpStore, LoginOverrides, ManagementConfig,
    StoreError,
};

mod cli;

use cli::{Cli, DeleteLogicalDriveCommand, LoginArgs};

const LOG_ENV: &str = "RAIDCTL_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    InvalidCommandLine(String),
    #[error("{0}")]
    NoContentsFound(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("management processor error: {0}")]
    Store(String),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidCommandLine(_) => 2,
            Self::NoContentsFound(_) => 3,
            Self::Config(_) | Self::Store(_) | Self::Output(_) => 1,
        }
    }
}

impl From<DriveError> for CliError {
    fn from(value: DriveError) -> Self {
        match value {
            DriveError::DriveNotFound { .. } => Self::NoContentsFound(value.to_string()),
            DriveError::MissingArgument(_) | DriveError::ControllerNotFound { .. } => {
                Self::InvalidCommandLine(value.to_string())
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Config(message) => Self::Config(message),
            other => Self::Store(other.to_string()),
        }
    }
}

impl From<DeleteError<StoreError>> for CliError {
    fn from(value: DeleteError<StoreError>) -> Self {
        match value {
            DeleteError::Selection(err) => err.into(),
            DeleteError::Output(err) => err.into(),
            other => Self::Store(other.to_string()),
        }
    }
}

impl From<LoginArgs> for LoginOverrides {
    fn from(value: LoginArgs) -> Self {
        Self {
            url: value.url,
            username: value.username,
            password: value.password,
            session_key: value.session_key,
            insecure: value.insecure,
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            err.exit_code()
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli {
        Cli::DeleteLogicalDrive(command) => delete_logical_drive(command).await,
    }
}

async fn delete_logical_drive(args: DeleteLogicalDriveCommand) -> Result<(), CliError> {
    let request = DeletionRequest::from_args(
        args.controller.as_deref(),
        &args.drives,
        args.all,
        args.force,
    )?;

    let config =
        ManagementConfig::load_without_cli_args()?.with_login_overrides(args.login.into());
    let store = HttpStore::new(&config)?;

    let outcome = if request.force {
        run_delete(store, AlwaysConfirm, &request).await?
    } else {
        run_delete(store, ConsoleConfirm::stdio(), &request).await?
    };
    tracing::debug!(
        committed = outcome.committed_paths().len(),
        declined = outcome.declined(),
        "deletelogicaldrive finished"
    );
    Ok(())
}

async fn run_delete<C: Confirm>(
    store: HttpStore,
    confirm: C,
    request: &DeletionRequest,
) -> Result<DeleteOutcome, CliError> {
    let mut orchestrator = DeleteOrchestrator::new(store, confirm, io::stdout());
    Ok(orchestrator.execute(request).await?)
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
