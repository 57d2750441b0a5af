use std::process::ExitCode;

use anstream::eprintln;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ExitStatus};
use crate::printer::Printer;

mod archive;
mod cleanup;
mod cli;
mod constants;
mod fs;
mod git;
mod macros;
mod pre_commit;
mod printer;
mod process;
mod workspace;

fn setup_logging(verbosity: u8) {
    let directive = match verbosity {
        0 => "off",
        1 => "hookdrill=info",
        2 => "hookdrill=debug",
        _ => "hookdrill=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Scoped drops never run on Ctrl-C, so workspace directories are tracked
    // and removed by hand before exiting.
    if let Err(err) = ctrlc::set_handler(|| {
        cleanup::cleanup();

        #[allow(clippy::exit)]
        std::process::exit(if cfg!(windows) {
            0xC000_013A_u32 as i32
        } else {
            130
        });
    }) {
        warn_user!("Failed to set Ctrl-C handler: {err}");
    }

    anstream::ColorChoice::write_global(cli.color.into());
    setup_logging(if cli.quiet { 0 } else { cli.verbose });

    if let Some(cd) = &cli.cd {
        if let Err(err) = std::env::set_current_dir(cd) {
            eprintln!(
                "{}: Failed to change directory to `{}`: {}",
                "error".red().bold(),
                cd.display(),
                err
            );
            return ExitStatus::Failure.into();
        }
    }

    let printer = if cli.quiet {
        Printer::Quiet
    } else if cli.verbose > 0 {
        Printer::Verbose
    } else {
        Printer::Default
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{}: Failed to start the runtime: {}", "error".red().bold(), err);
            return ExitStatus::Failure.into();
        }
    };
    let result = runtime.block_on(cli::drill(printer));
    drop(runtime);

    match result {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{}: {}", "error".red().bold(), err);
            for cause in err.chain().skip(1) {
                eprintln!("  {}: {}", "caused by".red().bold(), cause);
            }
            ExitStatus::Failure.into()
        }
    }
}
