//! Read-only team and player directory used by the match state.
//!
//! The engine only needs two lookups: team name to color/crest, and the
//! player list of a team for the operator's pickers and for resolving a
//! goal scorer. Player labels have the form `"<number> <name>"`.

use scorebug_types::{Side, Team};

/// Errors raised by a roster backend.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// The backing data could not be read.
    #[error("roster unavailable: {0}")]
    Unavailable(String),
}

/// Team and player lookups.
pub trait Roster: Send {
    /// Resolve a team by name. `None` when the directory does not know it.
    fn team(&self, name: &str) -> Option<Team>;

    /// All known team names, in directory order.
    fn team_names(&self) -> Vec<String>;

    /// Player labels for `team`. Backends fall back to the list registered
    /// under the side key (`home`/`away`) when the team has none.
    fn players(&self, team: &str, side: Side) -> Result<Vec<String>, RosterError>;
}

/// A directory that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRoster;

impl Roster for EmptyRoster {
    fn team(&self, _name: &str) -> Option<Team> {
        None
    }

    fn team_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn players(&self, _team: &str, _side: Side) -> Result<Vec<String>, RosterError> {
        Ok(Vec::new())
    }
}

/// A player label split into shirt number and name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerLabel {
    /// Leading numeric token, if the label has one.
    pub number: Option<String>,
    /// Remainder of the label.
    pub name: String,
}

/// Split `"10 Lionel Messi"` into `("10", "Lionel Messi")`.
///
/// A label whose first token is not numeric is all name.
pub fn split_player_label(label: &str) -> PlayerLabel {
    let label = label.trim();
    let (first, rest) = label.split_once(char::is_whitespace).unwrap_or((label, ""));
    if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
        PlayerLabel {
            number: Some(first.to_owned()),
            name: rest.trim().to_owned(),
        }
    } else {
        PlayerLabel {
            number: None,
            name: label.to_owned(),
        }
    }
}

/// Match a scorer hint against a player list.
///
/// Exact label first, then shirt number; an unmatched hint is used as given.
/// A blank hint resolves to nobody.
pub fn resolve_scorer(players: &[String], hint: &str) -> Option<PlayerLabel> {
    let hint = hint.trim();
    if hint.is_empty() {
        return None;
    }
    if let Some(label) = players.iter().find(|label| label.trim() == hint) {
        return Some(split_player_label(label));
    }
    let by_number = players
        .iter()
        .map(|label| split_player_label(label))
        .find(|label| label.number.as_deref() == Some(hint));
    Some(by_number.unwrap_or_else(|| split_player_label(hint)))
}
