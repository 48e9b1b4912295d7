//! CLI route: command table and run context. Dispatches to the session
//! establisher and the inventory enumerator.

use crate::cli::help::{command_help, usage};
use crate::cli::output::{EXIT_SUCCESS, EXIT_USAGE};
use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, PvelistConfig};
use crate::credentials::Principal;
use crate::error::ApiError;
use crate::inventory;
use crate::logging::LoggingConfig;
use crate::provider::ClientSettings;
use crate::resource::ListTarget;
use crate::session;
use std::io::Write;
use tracing::{debug, info};

/// A classified command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// No command given
    Missing,
    Help { topic: Option<String> },
    /// `list` with no or an unknown object type shows the list help
    List { target: Option<ListTarget> },
    Login,
    Unknown(String),
}

impl Command {
    /// Classify the positional command and its arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        let Some(command) = cli.command.as_deref() else {
            return Command::Missing;
        };
        match command {
            "" => Command::Missing,
            "h" | "help" => Command::Help {
                topic: cli.args.first().cloned(),
            },
            "l" | "ls" | "list" => Command::List {
                target: cli.args.first().and_then(|t| ListTarget::parse(t)),
            },
            "login" => Command::Login,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Runtime context for CLI execution: merged settings and credentials.
/// Built from the command line layered over `ConfigLoader`.
pub struct RunContext {
    program: String,
    settings: ClientSettings,
    principal: Principal,
    password: String,
    otp: String,
    logging: LoggingConfig,
}

impl RunContext {
    /// Load configuration and apply command-line overrides.
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let config = match cli.config {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Self::from_config(cli, config)
    }

    /// Apply command-line overrides to an already loaded configuration.
    ///
    /// The merged connection settings are validated again, so a flag cannot
    /// smuggle in a value the config file would have rejected.
    pub fn from_config(cli: &Cli, config: PvelistConfig) -> Result<Self, ApiError> {
        let mut connection = config.connection;
        if let Some(ref server) = cli.server {
            connection.server = server.clone();
        }
        if let Some(ref username) = cli.username {
            connection.username = username.clone();
        }
        if let Some(ref realm) = cli.realm {
            connection.realm = realm.clone();
        }
        if cli.password.is_some() {
            connection.password = cli.password.clone();
        }
        if cli.skiptls {
            connection.skip_tls_verify = true;
        }
        if let Some(secs) = cli.timeout {
            connection.timeout_secs = secs;
        }
        connection
            .validate()
            .map_err(|e| ApiError::ConfigError(format!("Invalid connection settings: {}", e)))?;

        let mut logging = config.logging;
        if cli.debug {
            logging.level = "debug".to_string();
        }
        if let Some(ref level) = cli.log_level {
            logging.level = level.clone();
        }
        if let Some(ref format) = cli.log_format {
            logging.format = format.clone();
        }
        if let Some(ref file) = cli.log_file {
            logging.output = "file".to_string();
            logging.file = Some(file.clone());
        }

        Ok(Self {
            program: "pvelist".to_string(),
            settings: connection.client_settings(),
            principal: Principal::normalize(&connection.username, &connection.realm),
            password: connection.password.unwrap_or_default(),
            otp: cli.otp.clone(),
            logging,
        })
    }

    /// Program name shown in usage text.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Execute a command, writing user-facing output to `out`. Returns the exit code.
    pub async fn execute<W: Write>(&self, command: &Command, out: &mut W) -> Result<i32, ApiError> {
        match command {
            Command::Missing => {
                write!(out, "{}", usage(&self.program))?;
                Ok(EXIT_USAGE)
            }
            Command::Help { topic: None } | Command::Unknown(_) => {
                write!(out, "{}", usage(&self.program))?;
                Ok(EXIT_SUCCESS)
            }
            Command::Help { topic: Some(topic) } => {
                write!(out, "{}", command_help(topic, &self.program))?;
                Ok(EXIT_SUCCESS)
            }
            Command::List { target: None } => {
                write!(out, "{}", command_help("list", &self.program))?;
                Ok(EXIT_SUCCESS)
            }
            Command::List {
                target: Some(target),
            } => {
                // Unsupported object types fail here, before any network call.
                inventory::ensure_listable(*target)?;
                let client = self.open_session().await?;
                inventory::list(*target, &client, out).await?;
                Ok(EXIT_SUCCESS)
            }
            Command::Login => {
                let client = self.open_session().await?;
                writeln!(
                    out,
                    "Logged in to {} as {}",
                    client.base_url(),
                    client.session_user().unwrap_or(self.principal.as_str())
                )?;
                Ok(EXIT_SUCCESS)
            }
        }
    }

    async fn open_session(&self) -> Result<crate::provider::PveClient, ApiError> {
        debug!(
            server = %self.settings.server_url,
            principal = %self.principal,
            skip_tls_verify = self.settings.skip_tls_verify,
            "Connecting"
        );
        let mut client = session::connect(&self.settings)?;
        session::establish(&mut client, &self.principal, &self.password, &self.otp).await?;
        info!(server = %self.settings.server_url, "Connected");
        Ok(client)
    }
}
