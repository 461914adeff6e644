//! Pure scoring rules: best-two-of-four hole aggregation, team totals, holes through,
//! leaderboard assembly and display formatting.
//!
//! Nothing in here touches storage or async code; services feed in snapshots read from
//! the store and turn the results into DTOs.

/// Hole and team aggregation over a score card.
pub mod aggregate;
/// Display helpers for totals and progress.
pub mod display;
/// Ranking of teams across games.
pub mod leaderboard;

pub use aggregate::{
    HoleScores, ScoreCard, game_through, hole_aggregate, hole_aggregates, holes_through,
    MAX_STROKES, parse_strokes, score_card, team_total,
};
pub use display::{format_score, format_through};
pub use leaderboard::{LeaderboardRow, assemble_leaderboard};
