//! Season-scoped view of a `FootballDataClient`

use serde_json::Value;

use super::FootballDataClient;
use crate::error::Result;

/// A client bound to one season
///
/// Borrows the parent client, so calls share its HTTP client and cache.
#[derive(Debug, Clone, Copy)]
pub struct SeasonClient<'a> {
    client: &'a FootballDataClient,
    season_id: u64,
}

impl<'a> SeasonClient<'a> {
    pub fn new(client: &'a FootballDataClient, season_id: u64) -> Self {
        Self { client, season_id }
    }

    pub fn season_id(&self) -> u64 {
        self.season_id
    }

    pub async fn get_season(&self) -> Result<Value> {
        self.client.get_season(self.season_id).await
    }

    pub async fn get_teams(&self) -> Result<Value> {
        self.client.get_teams(self.season_id).await
    }

    pub async fn get_league_table(&self) -> Result<Value> {
        self.client.get_league_table(self.season_id).await
    }

    pub async fn get_group(&self, group: &str) -> Result<Value> {
        self.client.get_group(self.season_id, group).await
    }

    pub async fn get_fixtures(&self, matchday: Option<u32>) -> Result<Value> {
        self.client.get_fixtures(self.season_id, matchday).await
    }

    pub async fn get_fixture(&self, fixture_id: u64) -> Result<Value> {
        self.client.get_fixture(self.season_id, fixture_id).await
    }
}
