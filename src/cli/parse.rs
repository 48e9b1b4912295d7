//! CLI parse: clap types for pvelist, plus the argument rewrite that lets
//! single-dash long flags (`-username ops`) through.

use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// pvelist - inventory of Proxmox VE nodes, storage pools and virtual machines
#[derive(Parser, Debug)]
#[command(name = "pvelist")]
#[command(about = "Print inventories of a Proxmox VE cluster")]
pub struct Cli {
    /// Command: help [command] | list <object type> | login
    pub command: Option<String>,

    /// Command arguments
    pub args: Vec<String>,

    /// Username; a bare name is qualified with --realm [default: root]
    #[arg(long)]
    pub username: Option<String>,

    /// Password
    #[arg(long)]
    pub password: Option<String>,

    /// One-time passcode for two-factor logins
    #[arg(long, default_value = "")]
    pub otp: String,

    /// Proxmox API URL [default: https://localhost:8006/api2/json]
    #[arg(long)]
    pub server: Option<String>,

    /// Skip TLS certificate verification. Avoid this whenever possible.
    #[arg(long)]
    pub skiptls: bool,

    /// Debug mode: log connection details and API calls
    #[arg(long)]
    pub debug: bool,

    /// Authentication realm [default: pam]
    #[arg(long)]
    pub realm: Option<String>,

    /// Per-call timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file path (layered over the user config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Rewrite single-dash long flags (`-username`, `-skiptls=true`) to their
/// double-dash form so older scripts keep working. Only names `Cli` defines
/// are rewritten; everything after a bare `--` is left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let longs: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .chain(std::iter::once("help"))
        .collect();

    let mut positional_only = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if positional_only {
                return arg;
            }
            if arg.to_str() == Some("--") {
                positional_only = true;
                return arg;
            }
            let rewritten = arg.to_str().and_then(|text| {
                let flag = text.strip_prefix('-')?;
                if flag.starts_with('-') {
                    return None;
                }
                let name = flag.split_once('=').map_or(flag, |(name, _)| name);
                longs
                    .contains(&name)
                    .then(|| OsString::from(format!("-{}", text)))
            });
            rewritten.unwrap_or(arg)
        })
        .collect()
}
