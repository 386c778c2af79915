//! Domain model for team drawing.
//!
//! # Overview
//!
//! - [`Roster`]: the full player list for one draw, validated on construction
//! - [`Pairing`]: a same-team or different-team rule between two named players
//! - [`TeamDraw`]: the blue/red partition produced by a successful draw
//!
//! A `Roster` value is proof that its invariants hold: every name is
//! non-empty after trimming, all names are pairwise distinct, and the name
//! count is exactly twice the team size.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A name occurring more than once in the roster entries, with every
/// 1-based slot position at which it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
    pub name: String,
    pub positions: Vec<usize>,
}

impl fmt::Display for DuplicateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<String> = self.positions.iter().map(|p| p.to_string()).collect();
        write!(f, "\"{}\" in slots {}", self.name, slots.join(", "))
    }
}

fn list_duplicates(duplicates: &[DuplicateName]) -> String {
    let parts: Vec<String> = duplicates.iter().map(DuplicateName::to_string).collect();
    parts.join("; ")
}

/// Why a roster could not be built from raw entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("team size must be at least 1")]
    TeamSizeZero,

    #[error("expected {expected} non-empty player names, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("duplicate player names: {}", list_duplicates(.0))]
    DuplicateNames(Vec<DuplicateName>),
}

/// The full player list for one draw.
///
/// Holds 2·k trimmed, unique, non-empty names in the order they were
/// entered.
///
/// # Examples
///
/// ```
/// use team_draw::domain::Roster;
///
/// let roster = Roster::from_entries(&["Amy", "Beth", "Carl", "Dan"], 2).unwrap();
/// assert_eq!(roster.len(), 4);
/// assert_eq!(roster.team_size(), 2);
///
/// let err = Roster::from_entries(&["Alice", "Alice", "Bob", "Carol"], 2).unwrap_err();
/// assert!(err.to_string().contains("\"Alice\" in slots 1, 2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
    team_size: usize,
}

impl Roster {
    /// Builds a roster from raw form entries.
    ///
    /// Entries are trimmed; empty ones are skipped but keep their slot in
    /// position numbering, so reported duplicate positions match the form
    /// the user filled in. The non-empty count is checked before
    /// duplicates.
    pub fn from_entries<S: AsRef<str>>(
        entries: &[S],
        team_size: usize,
    ) -> Result<Self, RosterError> {
        if team_size == 0 {
            return Err(RosterError::TeamSizeZero);
        }

        let mut names = Vec::new();
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for (slot, entry) in entries.iter().enumerate() {
            let name = entry.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let occurrences = positions.entry(name.to_string()).or_default();
            if occurrences.is_empty() {
                first_seen.push(name.to_string());
            }
            occurrences.push(slot + 1);
            names.push(name.to_string());
        }

        let expected = team_size * 2;
        if names.len() != expected {
            return Err(RosterError::WrongCount {
                expected,
                actual: names.len(),
            });
        }

        let duplicates: Vec<DuplicateName> = first_seen
            .into_iter()
            .filter_map(|name| {
                let occurrences = &positions[&name];
                (occurrences.len() > 1).then(|| DuplicateName {
                    name,
                    positions: occurrences.clone(),
                })
            })
            .collect();

        if !duplicates.is_empty() {
            return Err(RosterError::DuplicateNames(duplicates));
        }

        Ok(Self { names, team_size })
    }

    /// All names, in entry order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Players per team.
    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// Total player count (2 · team size).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// A roster is never empty; kept for completeness.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Which side relation a pairing demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingKind {
    /// Both players must land on the same side.
    SameTeam,
    /// The players must land on opposite sides.
    DifferentTeam,
}

/// A pairwise rule between two named players.
///
/// A pairing is *inert* when either slot is empty, both slots name the
/// same player, or a named player is absent from the roster. Inert
/// pairings never reject a draw, regardless of kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub kind: PairingKind,
    pub first: String,
    pub second: String,
}

impl Pairing {
    /// A rule keeping two players together.
    pub fn same(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            kind: PairingKind::SameTeam,
            first: first.into(),
            second: second.into(),
        }
    }

    /// A rule keeping two players apart.
    pub fn different(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            kind: PairingKind::DifferentTeam,
            first: first.into(),
            second: second.into(),
        }
    }
}

/// The two disjoint, equal-size teams produced by a successful draw.
///
/// Order within a team carries no meaning but is preserved from the
/// sampled permutation so repeated renders of one draw are stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraw {
    pub blue: Vec<String>,
    pub red: Vec<String>,
}
