//! DTOs for REST API requests/responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Pairing, Roster, RosterError};
use crate::generator::DEFAULT_MAX_ATTEMPTS;

/// One pairing rule row as edited in the form; either slot may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingDto {
    #[serde(default)]
    pub p1: String,
    #[serde(default)]
    pub p2: String,
}

impl PairingDto {
    pub fn new(p1: impl Into<String>, p2: impl Into<String>) -> Self {
        Self {
            p1: p1.into(),
            p2: p2.into(),
        }
    }
}

/// Request body for `POST /team-draws`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub players: Vec<String>,
    pub team_size: usize,
    #[serde(default)]
    pub same_team: Vec<PairingDto>,
    #[serde(default)]
    pub diff_team: Vec<PairingDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

impl DrawRequest {
    /// Validates the player list into a [`Roster`].
    pub fn roster(&self) -> Result<Roster, RosterError> {
        Roster::from_entries(&self.players, self.team_size)
    }

    /// Merges both rule lists into domain pairings.
    pub fn pairings(&self) -> Vec<Pairing> {
        self.same_team
            .iter()
            .map(|p| Pairing::same(&p.p1, &p.p2))
            .chain(self.diff_team.iter().map(|p| Pairing::different(&p.p1, &p.p2)))
            .collect()
    }

    /// The attempt budget, defaulting to [`DEFAULT_MAX_ATTEMPTS`].
    pub fn budget(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Response body for a successful draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    pub draw_id: Uuid,
    pub team_blue: Vec<String>,
    pub team_red: Vec<String>,
}

/// Request body for `POST /log-result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResultRequest {
    pub players: Vec<String>,
    pub team_blue: Vec<String>,
    pub team_red: Vec<String>,
}

/// Positive status indicator.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Error payload with a user-facing message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
