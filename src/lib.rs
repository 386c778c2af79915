//! Team Draw - constraint-aware random team partitioning.
//!
//! Splits a roster of 2·k unique player names into two equal teams while
//! honoring pairwise rules ("keep these two together", "keep these two
//! apart"), using bounded rejection sampling over unbiased shuffles.
//!
//! # Domain Model
//!
//! - [`Roster`](domain::Roster): validated list of 2·k unique, non-empty names
//! - [`Pairing`](domain::Pairing): a same-team or different-team rule between two names
//! - [`TeamDraw`](domain::TeamDraw): the resulting blue/red partition
//!
//! # Generator
//!
//! [`draw_teams`](generator::draw_teams) samples random permutations until one
//! satisfies every active pairing or the attempt budget runs out. Rules that
//! name an unknown player, or name the same player twice, are inert and never
//! reject a sample.

pub mod api;
pub mod audit;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod generator;
pub mod prefs;
