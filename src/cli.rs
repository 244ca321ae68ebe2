//! Command-line interface parsing for footydata
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `ClientConfig` plus the API call to perform.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use thiserror::Error;

use crate::client::FootballDataClient;
use crate::config::{ClientConfig, AUTH_TOKEN_ENV, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use crate::error::FootballDataError;

/// Error types for the command-line front end
#[derive(Debug, Error)]
pub enum CliError {
    /// The standings group argument is empty
    #[error("Invalid group: '{0}'. Expected a standings key such as GROUP_A")]
    InvalidGroup(String),

    /// The API call failed
    #[error(transparent)]
    Client(#[from] FootballDataError),
}

/// footydata - query the football-data.org API
#[derive(Parser, Debug)]
#[command(name = "footydata")]
#[command(about = "Query seasons, teams, league tables and fixtures from football-data.org")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// API token sent as X-Auth-Token
    #[arg(long, global = true, env = AUTH_TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// API host
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API version path segment
    #[arg(long, global = true, default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Maximum number of cached responses
    #[arg(long, global = true, default_value_t = 1000)]
    pub cache_max_len: usize,

    /// Maximum age of a cached response, in seconds
    #[arg(long, global = true, default_value_t = 600)]
    pub cache_max_age: u64,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// API call to perform
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all seasons
    Seasons,
    /// Show one season
    Season { season_id: u64 },
    /// List the teams of a season
    Teams { season_id: u64 },
    /// Show the league table of a season
    Table { season_id: u64 },
    /// Show one standings group of a season's league table
    Group { season_id: u64, group: String },
    /// List the fixtures of a season
    Fixtures {
        season_id: u64,
        /// Only fixtures of this matchday
        #[arg(long)]
        matchday: Option<u32>,
    },
    /// Show one fixture
    Fixture { season_id: u64, fixture_id: u64 },
    /// Show one team
    Team { team_id: u64 },
}

impl ConnectionArgs {
    /// Builds the client configuration from parsed arguments
    ///
    /// An empty token is treated as no token.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .with_base_url(self.base_url.clone())
            .with_api_version(self.api_version.clone())
            .with_cache_max_len(self.cache_max_len)
            .with_cache_max_age(Duration::from_secs(self.cache_max_age));

        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_auth_token(token);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        config
    }
}

/// Validates a standings group argument
///
/// # Returns
/// * `Ok(&str)` - the trimmed group name
/// * `Err(CliError::InvalidGroup)` - if the name is blank
pub fn parse_group_arg(s: &str) -> Result<&str, CliError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(CliError::InvalidGroup(s.to_string()));
    }
    Ok(trimmed)
}

/// Executes a subcommand against the client and returns the JSON body
pub async fn run(client: &FootballDataClient, command: &Command) -> Result<Value, CliError> {
    let value = match command {
        Command::Seasons => client.get_seasons().await?,
        Command::Season { season_id } => client.get_season(*season_id).await?,
        Command::Teams { season_id } => client.get_teams(*season_id).await?,
        Command::Table { season_id } => client.get_league_table(*season_id).await?,
        Command::Group { season_id, group } => {
            let group = parse_group_arg(group)?;
            client.season(*season_id).get_group(group).await?
        }
        Command::Fixtures {
            season_id,
            matchday,
        } => client.get_fixtures(*season_id, *matchday).await?,
        Command::Fixture {
            season_id,
            fixture_id,
        } => client.get_fixture(*season_id, *fixture_id).await?,
        Command::Team { team_id } => client.get_team(*team_id).await?,
    };
    Ok(value)
}
