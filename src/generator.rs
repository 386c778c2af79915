//! Team draw generator.
//!
//! Bounded rejection sampling: shuffle the roster, split it down the
//! middle, and accept the first permutation that satisfies every active
//! pairing. Pairing rules only ever concern which *side* two names fall
//! on, never the order within a side, so each attempt is checked in
//! O(|pairings|) against a boolean side table.
//!
//! Sampling is kept over a constructive solver on purpose: rule sets are
//! small and typically easy, every accepted draw is uniform over the
//! satisfying permutations, and contradictory rule sets surface naturally
//! as an exhausted budget instead of needing a satisfiability proof.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Pairing, PairingKind, Roster, TeamDraw};

/// Attempt budget used when the caller does not supply one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Draws two equal teams from the roster, honoring every active pairing.
///
/// Returns `None` when no sampled permutation satisfies the pairings
/// within `max_attempts`: the rules may conflict, or the budget may be
/// too small for a rare satisfying split. `None` is an outcome, not a
/// fault; a fresh call redraws with new randomness.
///
/// Pairings that fail to bind two distinct roster members (empty slot,
/// `first == second`, unknown name) are inert and never reject.
///
/// The RNG is injected so seeded tests are deterministic; production
/// callers pass [`rand::thread_rng`].
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use team_draw::domain::{Pairing, Roster};
/// use team_draw::generator::{draw_teams, DEFAULT_MAX_ATTEMPTS};
///
/// let roster = Roster::from_entries(&["Amy", "Beth", "Carl", "Dan"], 2).unwrap();
/// let rules = vec![Pairing::same("Amy", "Beth")];
/// let mut rng = StdRng::seed_from_u64(0);
///
/// let draw = draw_teams(&roster, &rules, DEFAULT_MAX_ATTEMPTS, &mut rng).unwrap();
/// let amy_blue = draw.blue.iter().any(|n| n == "Amy");
/// let beth_blue = draw.blue.iter().any(|n| n == "Beth");
/// assert_eq!(amy_blue, beth_blue);
/// ```
pub fn draw_teams<R: Rng + ?Sized>(
    roster: &Roster,
    pairings: &[Pairing],
    max_attempts: u32,
    rng: &mut R,
) -> Option<TeamDraw> {
    let names = roster.names();
    let team_size = roster.team_size();

    let index_of: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    // Resolve rules to index pairs once; anything that does not bind two
    // distinct roster members is inert and dropped here.
    let active: Vec<(PairingKind, usize, usize)> = pairings
        .iter()
        .filter_map(|pairing| {
            let first = *index_of.get(pairing.first.trim())?;
            let second = *index_of.get(pairing.second.trim())?;
            (first != second).then_some((pairing.kind, first, second))
        })
        .collect();

    let mut order: Vec<usize> = (0..names.len()).collect();
    let mut on_blue = vec![false; names.len()];

    for _ in 0..max_attempts {
        // Fisher-Yates, every permutation equally likely.
        order.shuffle(rng);

        on_blue.fill(false);
        for &idx in &order[..team_size] {
            on_blue[idx] = true;
        }

        let satisfied = active.iter().all(|&(kind, first, second)| match kind {
            PairingKind::SameTeam => on_blue[first] == on_blue[second],
            PairingKind::DifferentTeam => on_blue[first] != on_blue[second],
        });

        if satisfied {
            return Some(TeamDraw {
                blue: order[..team_size].iter().map(|&i| names[i].clone()).collect(),
                red: order[team_size..].iter().map(|&i| names[i].clone()).collect(),
            });
        }
    }

    None
}
