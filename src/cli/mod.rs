use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod drill;

pub(crate) use drill::drill;

#[derive(Parser)]
#[command(
    name = "hookdrill",
    version,
    about = "Exercise a pre-commit configuration against fixture files in a throwaway git repository"
)]
pub(crate) struct Cli {
    /// Change to the given directory before doing anything else.
    #[arg(long, value_name = "DIR")]
    pub(crate) cd: Option<PathBuf>,

    /// Use verbose output.
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub(crate) verbose: u8,

    /// Suppress progress output.
    #[arg(short, long)]
    pub(crate) quiet: bool,

    /// Whether to use color in output.
    #[arg(long, value_enum, value_name = "WHEN", default_value_t = ColorChoice::Auto)]
    pub(crate) color: ColorChoice,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(value: ColorChoice) -> Self {
        match value {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitStatus {
    Success,
    Failure,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => Self::from(0),
            ExitStatus::Failure => Self::from(1),
        }
    }
}
