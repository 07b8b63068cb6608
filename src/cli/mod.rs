//! Command-line interface definitions for the `raidctl` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser};

/// Top-level CLI for the `raidctl` binary.
#[derive(Debug, Parser)]
#[command(
    name = "raidctl",
    about = "Manage logical drives on HPE smart storage controllers",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Delete logical drives from a controller.
    #[command(
        name = "deletelogicaldrive",
        about = "Delete logical drives from a controller",
        after_help = DELETE_EXAMPLES
    )]
    DeleteLogicalDrive(DeleteLogicalDriveCommand),
}

const DELETE_EXAMPLES: &str = "\
Examples:
  Delete the first logical drive on the controller in slot 1:
    raidctl deletelogicaldrive 1 --controller=1
  Delete several logical drives by position:
    raidctl deletelogicaldrive 1,2,3 --controller=\"Slot1\"
  Delete every logical drive on a controller:
    raidctl deletelogicaldrive --controller=\"Slot 1\" --all
  Delete by unique identifier or by name:
    raidctl deletelogicaldrive 600508B1001C1A2B --controller=1
    raidctl deletelogicaldrive boot-volume --controller=1 --force";

/// Arguments for the `raidctl deletelogicaldrive` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DeleteLogicalDriveCommand {
    /// Drives to delete: a comma separated list of positions, unique
    /// identifiers, or names.
    ///
    /// Positions are 1-based. All-digit tokens always select by position.
    #[arg(value_name = "DRIVES", conflicts_with = "all")]
    pub(crate) drives: Vec<String>,
    /// Controller to act on, by index or slot label (for example `1`,
    /// `"Slot1"` or `"Slot 1"`).
    #[arg(long, value_name = "CONTROLLER")]
    pub(crate) controller: Option<String>,
    /// Delete every logical drive on the controller.
    #[arg(long)]
    pub(crate) all: bool,
    /// Skip the confirmation prompt for each drive.
    #[arg(long)]
    pub(crate) force: bool,
    /// Management processor login options.
    #[command(flatten)]
    pub(crate) login: LoginArgs,
}

/// Login options shared by subcommands; each overrides configuration.
#[derive(Debug, Default, Args)]
pub(crate) struct LoginArgs {
    /// Management processor URL, for example `https://10.0.0.100`.
    #[arg(long, value_name = "URL")]
    pub(crate) url: Option<String>,
    /// Account name for HTTP Basic authentication.
    #[arg(long = "user", short = 'u', value_name = "USER")]
    pub(crate) username: Option<String>,
    /// Account password.
    #[arg(long, short = 'p', value_name = "PASSWORD")]
    pub(crate) password: Option<String>,
    /// Existing session key, sent instead of the account credentials.
    #[arg(long = "sessionid", value_name = "KEY")]
    pub(crate) session_key: Option<String>,
    /// Accept self-signed management processor certificates.
    #[arg(long)]
    pub(crate) insecure: bool,
}
