//! Demo data generators for team drawing.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::dto::{DrawRequest, PairingDto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn team_size(&self) -> usize {
        match self {
            DemoData::Small => 2,
            DemoData::Large => 5,
        }
    }
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

const FIRST_NAMES: &[&str] = &[
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay",
];
const LAST_NAMES: &[&str] = &[
    "Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt",
];

/// Generates a ready-to-post draw request for the given size.
///
/// Uses a fixed seed so the same request comes back on every call. Each
/// set carries one rule of each kind, chosen so the rule set is jointly
/// satisfiable.
pub fn generate(demo: DemoData) -> DrawRequest {
    let mut rng = StdRng::seed_from_u64(0);

    let team_size = demo.team_size();
    let players = pick_names(&mut rng, team_size * 2);

    // Keep the first two together and split the first and third; a blue
    // side of {players[0], players[1], ...} satisfies both.
    let same_team = vec![PairingDto::new(players[0].clone(), players[1].clone())];
    let diff_team = vec![PairingDto::new(players[0].clone(), players[2].clone())];

    DrawRequest {
        players,
        team_size,
        same_team,
        diff_team,
        max_attempts: None,
    }
}

fn pick_names(rng: &mut StdRng, count: usize) -> Vec<String> {
    let mut pool = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            pool.push(format!("{} {}", first, last));
        }
    }
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
