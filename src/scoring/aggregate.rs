use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::dao::models::{GameEntity, PlayerScoreEntity};

/// Strokes entered by each player of a team on one hole, keyed by player id.
pub type HoleScores = IndexMap<String, Option<u32>>;

/// Every recorded hole of a team's game, keyed by 1-based hole number.
pub type ScoreCard = BTreeMap<u8, HoleScores>;

/// Number of player scores that count towards a hole aggregate.
const COUNTED_SCORES: usize = 2;

/// Highest stroke count accepted for a single hole.
pub const MAX_STROKES: u32 = u8::MAX as u32;

/// Leniently parse a stroke count coming from a client payload.
///
/// Integers in `1..=MAX_STROKES` and strings holding one are accepted. Anything else
/// (null, empty strings, zero, negatives, fractions, booleans, oversized counts) means
/// "unset".
pub fn parse_strokes(value: &Value) -> Option<u32> {
    let strokes = match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    };
    strokes.filter(|n| (1..=MAX_STROKES).contains(n))
}

/// Sum of the two lowest valid strokes on a hole, or `None` when fewer than two players
/// have a score yet.
pub fn hole_aggregate(scores: &HoleScores) -> Option<u32> {
    let mut valid = scores
        .values()
        .filter_map(|strokes| strokes.filter(|n| *n > 0))
        .collect::<Vec<_>>();

    if valid.len() < COUNTED_SCORES {
        return None;
    }

    valid.sort_unstable();
    Some(
        valid
            .iter()
            .take(COUNTED_SCORES)
            .copied()
            .fold(0, u32::saturating_add),
    )
}

/// Hole aggregates for holes `1..=holes`, `None` where a hole has no counted score.
pub fn hole_aggregates(card: &ScoreCard, holes: u8) -> Vec<Option<u32>> {
    (1..=holes)
        .map(|hole| card.get(&hole).and_then(hole_aggregate))
        .collect()
}

/// Team total over holes `1..=holes`. Undefined holes contribute nothing.
pub fn team_total(card: &ScoreCard, holes: u8) -> u32 {
    hole_aggregates(card, holes)
        .into_iter()
        .flatten()
        .fold(0, u32::saturating_add)
}

/// Highest hole on which at least one player has a valid score, 0 when none.
pub fn holes_through(card: &ScoreCard) -> u8 {
    card.iter()
        .rev()
        .find(|(_, scores)| scores.values().any(|strokes| matches!(strokes, Some(n) if *n > 0)))
        .map(|(hole, _)| *hole)
        .unwrap_or(0)
}

/// Holes completed by a game's team.
///
/// The persisted current-hole pointer wins when present; the derived value from the
/// card only covers game documents written before the pointer existed.
pub fn game_through(game: &GameEntity, card: &ScoreCard) -> u8 {
    let through = match game.current_hole {
        Some(pointer) => pointer.saturating_sub(1),
        None => holes_through(card),
    };
    through.min(game.holes)
}

/// Pivot per-player records into a hole-indexed score card.
pub fn score_card(records: &[PlayerScoreEntity]) -> ScoreCard {
    let mut card = ScoreCard::new();
    for record in records {
        for (hole, strokes) in &record.hole_scores {
            card.entry(*hole)
                .or_default()
                .insert(record.player_id.clone(), Some(*strokes));
        }
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::SystemTime;
    use uuid::Uuid;

    fn hole(entries: &[(&str, Option<u32>)]) -> HoleScores {
        entries
            .iter()
            .map(|(player, strokes)| (player.to_string(), *strokes))
            .collect()
    }

    fn full_hole(a: u32, b: u32, c: u32, d: u32) -> HoleScores {
        hole(&[("A", Some(a)), ("B", Some(b)), ("C", Some(c)), ("D", Some(d))])
    }

    #[test]
    fn aggregate_requires_two_scores() {
        let scores = hole(&[("A", Some(4)), ("B", None), ("C", None), ("D", None)]);
        assert_eq!(hole_aggregate(&scores), None);
        assert_eq!(hole_aggregate(&HoleScores::new()), None);
    }

    #[test]
    fn aggregate_sums_two_lowest() {
        assert_eq!(hole_aggregate(&full_hole(4, 5, 6, 7)), Some(9));
        assert_eq!(hole_aggregate(&full_hole(7, 6, 5, 4)), Some(9));
    }

    #[test]
    fn aggregate_counts_tied_lowest_normally() {
        assert_eq!(hole_aggregate(&full_hole(4, 4, 9, 9)), Some(8));
    }

    #[test]
    fn aggregate_ignores_zero_strokes() {
        let scores = hole(&[("A", Some(0)), ("B", Some(5)), ("C", None), ("D", Some(6))]);
        assert_eq!(hole_aggregate(&scores), Some(11));
    }

    #[test]
    fn empty_card_totals_zero() {
        assert_eq!(team_total(&ScoreCard::new(), 18), 0);
        assert_eq!(holes_through(&ScoreCard::new()), 0);
    }

    #[test]
    fn total_sums_defined_holes() {
        let card = ScoreCard::from([(1, full_hole(4, 5, 6, 7)), (2, full_hole(3, 3, 3, 3))]);
        assert_eq!(team_total(&card, 2), 15);
        // idempotent on the same card
        assert_eq!(team_total(&card, 2), 15);
    }

    #[test]
    fn total_skips_undefined_and_out_of_range_holes() {
        let card = ScoreCard::from([
            (1, full_hole(4, 5, 6, 7)),
            (2, hole(&[("A", Some(3))])),
            (10, full_hole(2, 2, 2, 2)),
        ]);
        assert_eq!(team_total(&card, 9), 9);
        assert_eq!(hole_aggregates(&card, 3), vec![Some(9), None, None]);
    }

    #[test]
    fn through_is_highest_hole_with_a_score() {
        let card = ScoreCard::from([
            (1, full_hole(4, 5, 6, 7)),
            (3, hole(&[("A", Some(5))])),
            (4, hole(&[("A", None)])),
        ]);
        assert_eq!(holes_through(&card), 3);
    }

    #[test]
    fn parse_strokes_is_lenient() {
        assert_eq!(parse_strokes(&json!(4)), Some(4));
        assert_eq!(parse_strokes(&json!(" 5 ")), Some(5));
        assert_eq!(parse_strokes(&json!(0)), None);
        assert_eq!(parse_strokes(&json!(-3)), None);
        assert_eq!(parse_strokes(&json!(4.5)), None);
        assert_eq!(parse_strokes(&json!("")), None);
        assert_eq!(parse_strokes(&json!("abc")), None);
        assert_eq!(parse_strokes(&json!(null)), None);
        assert_eq!(parse_strokes(&json!(true)), None);
        assert_eq!(parse_strokes(&json!(255)), Some(255));
        assert_eq!(parse_strokes(&json!(256)), None);
        assert_eq!(parse_strokes(&json!(3_000_000_000u64)), None);
        assert_eq!(parse_strokes(&json!("4000000000")), None);
    }

    #[test]
    fn sums_saturate_on_stored_outliers() {
        let huge = hole(&[("A", Some(u32::MAX)), ("B", Some(u32::MAX))]);
        assert_eq!(hole_aggregate(&huge), Some(u32::MAX));

        let card = ScoreCard::from([(1, huge), (2, full_hole(4, 5, 6, 7))]);
        assert_eq!(team_total(&card, 2), u32::MAX);
    }

    #[test]
    fn card_pivots_player_records() {
        let game_id = Uuid::new_v4();
        let mut first = PlayerScoreEntity::new(game_id, "player1".into(), "Ada".into());
        first.set_hole(1, Some(4), SystemTime::now());
        first.set_hole(2, Some(3), SystemTime::now());
        let mut second = PlayerScoreEntity::new(game_id, "player2".into(), "Bo".into());
        second.set_hole(1, Some(5), SystemTime::now());

        let card = score_card(&[first, second]);
        assert_eq!(card.len(), 2);
        assert_eq!(card[&1]["player1"], Some(4));
        assert_eq!(card[&1]["player2"], Some(5));
        assert_eq!(hole_aggregate(&card[&1]), Some(9));
        assert_eq!(hole_aggregate(&card[&2]), None);
    }

    #[test]
    fn game_through_prefers_pointer() {
        let mut game = GameEntity::new(Uuid::new_v4(), 9, SystemTime::now());
        let card = ScoreCard::from([(5, full_hole(4, 4, 4, 4))]);

        game.current_hole = Some(3);
        assert_eq!(game_through(&game, &card), 2);

        game.current_hole = Some(10);
        assert_eq!(game_through(&game, &card), 9);

        game.current_hole = None;
        assert_eq!(game_through(&game, &card), 5);
    }

    #[test]
    fn nine_hole_round_after_three_holes() {
        let card = ScoreCard::from([
            (1, full_hole(4, 5, 6, 7)),
            (2, full_hole(3, 4, 3, 5)),
            (3, full_hole(6, 6, 5, 6)),
        ]);
        assert_eq!(holes_through(&card), 3);
        assert_eq!(team_total(&card, 9), 26);
        assert_eq!(crate::scoring::format_score(team_total(&card, 9).into()), "+26");
    }
}
