//! pvelist CLI Binary
//!
//! Command-line interface for listing Proxmox VE inventories.

use clap::Parser;
use pvelist::cli::{map_error, normalize_args, Cli, Command, RunContext, EXIT_FATAL};
use pvelist::logging::init_logging;
use std::io::Write;
use std::path::Path;
use std::process;
use tracing::info;

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    // Configuration errors surface before logging exists
    let context = match RunContext::new(&cli) {
        Ok(ctx) => ctx.with_program(program_name()),
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FATAL);
        }
    };

    if let Err(e) = init_logging(Some(context.logging())) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(EXIT_FATAL);
    }

    info!("pvelist starting");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            process::exit(EXIT_FATAL);
        }
    };

    let command = Command::from_cli(&cli);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match runtime.block_on(context.execute(&command, &mut out)) {
        Ok(code) => {
            // process::exit skips destructors
            if let Err(e) = out.flush() {
                eprintln!("Failed to write output: {}", e);
                process::exit(EXIT_FATAL);
            }
            info!(code, "Command completed");
            process::exit(code);
        }
        Err(e) => {
            let _ = out.flush();
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FATAL);
        }
    }
}

/// Name the program was invoked as, for usage text.
fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pvelist".to_string())
}
