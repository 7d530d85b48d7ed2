//! YAML team directory.
//!
//! ```yaml
//! teams:
//!   - name: Lions
//!     color: "#FFEB3B"
//!     crest: crests/lions
//! players:
//!   Lions:
//!     - { number: 10, name: Ana Ruiz }
//!   away:
//!     - { number: 1, name: Keeper }
//! ```
//!
//! Player lists are keyed by team name (case-insensitive) with the side key
//! (`home`/`away`) as a fallback for teams without their own list.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use scorebug_core::roster::{Roster, RosterError};
use scorebug_types::{Side, Team};

use crate::error::StoreError;

/// One team entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TeamEntry {
    /// Display name.
    pub name: String,
    /// Background color (hex).
    #[serde(default)]
    pub color: String,
    /// Crest image reference.
    #[serde(default)]
    pub crest: String,
}

/// One player entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerEntry {
    /// Shirt number.
    #[serde(default)]
    pub number: Option<u32>,
    /// Player name.
    pub name: String,
}

impl PlayerEntry {
    /// Picker label: `"<number> <name>"`, or the bare name.
    pub fn label(&self) -> String {
        match self.number {
            Some(number) => format!("{number} {}", self.name.trim()),
            None => self.name.trim().to_owned(),
        }
    }
}

/// Team directory loaded from a YAML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileRoster {
    /// Teams in directory order.
    #[serde(default)]
    pub teams: Vec<TeamEntry>,
    /// Player lists keyed by team name or side key.
    #[serde(default)]
    pub players: BTreeMap<String, Vec<PlayerEntry>>,
}

impl FileRoster {
    /// Load the directory from `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::parse(&raw)?;
        info!(
            path = %path.display(),
            teams = roster.teams.len(),
            squads = roster.players.len(),
            "Team directory loaded"
        );
        Ok(roster)
    }

    /// Parse a directory from YAML. Empty input is an empty directory.
    pub fn parse(yaml: &str) -> Result<Self, StoreError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    fn squad(&self, key: &str) -> Option<&Vec<PlayerEntry>> {
        let key = key.trim();
        self.players
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(key))
            .map(|(_, squad)| squad)
    }
}

impl Roster for FileRoster {
    fn team(&self, name: &str) -> Option<Team> {
        let name = name.trim();
        self.teams
            .iter()
            .find(|entry| entry.name.trim().eq_ignore_ascii_case(name))
            .map(|entry| Team {
                name: entry.name.trim().to_owned(),
                display_color: entry.color.trim().to_owned(),
                crest_ref: Some(entry.crest.trim())
                    .filter(|crest| !crest.is_empty())
                    .map(str::to_owned),
            })
    }

    fn team_names(&self) -> Vec<String> {
        self.teams
            .iter()
            .map(|entry| entry.name.trim().to_owned())
            .collect()
    }

    fn players(&self, team: &str, side: Side) -> Result<Vec<String>, RosterError> {
        let squad = self
            .squad(team)
            .filter(|squad| !squad.is_empty())
            .or_else(|| self.squad(side.key()));
        Ok(squad
            .map(|squad| squad.iter().map(PlayerEntry::label).collect())
            .unwrap_or_default())
    }
}
