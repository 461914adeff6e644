use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, PlayerScoreEntity, TeamEntity},
    scoring::aggregate::{game_through, score_card, team_total},
};

/// One ranked line of the leaderboard, rebuilt on every snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based position after sorting; ties still get distinct ranks.
    pub rank: usize,
    /// Game the row was computed from.
    pub game_id: Uuid,
    /// Team playing the game.
    pub team_id: Uuid,
    /// Team display name.
    pub team_name: String,
    /// Best-two-of-four total over the holes played so far.
    pub total: u32,
    /// Holes completed.
    pub through: u8,
    /// Configured game length.
    pub holes: u8,
    /// Player names in roster order.
    pub roster: Vec<String>,
    /// Whether another row shares the same total.
    pub tied: bool,
}

/// Build the ranked leaderboard for `games`.
///
/// Games whose team cannot be resolved are skipped. A game with no score records yet
/// still gets a row with a zero total. Sorting is stable, so equal totals keep the
/// order in which `games` was given.
pub fn assemble_leaderboard(
    games: &[GameEntity],
    teams: &HashMap<Uuid, TeamEntity>,
    scores: &HashMap<Uuid, Vec<PlayerScoreEntity>>,
) -> Vec<LeaderboardRow> {
    let mut rows = games
        .iter()
        .filter_map(|game| {
            let Some(team) = teams.get(&game.team_id) else {
                warn!(
                    game_id = %game.id,
                    team_id = %game.team_id,
                    "team not found for game; skipping leaderboard row"
                );
                return None;
            };

            let records = scores.get(&game.id).map(Vec::as_slice).unwrap_or_default();
            let card = score_card(records);

            Some(LeaderboardRow {
                rank: 0,
                game_id: game.id,
                team_id: team.id,
                team_name: team.name.clone(),
                total: team_total(&card, game.holes),
                through: game_through(game, &card),
                holes: game.holes,
                roster: team.players.clone(),
                tied: false,
            })
        })
        .collect::<Vec<_>>();

    rows.sort_by_key(|row| row.total);

    let mut occurrences: HashMap<u32, usize> = HashMap::new();
    for row in &rows {
        *occurrences.entry(row.total).or_default() += 1;
    }

    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
        row.tied = occurrences.get(&row.total).is_some_and(|count| *count > 1);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    struct Fixture {
        games: Vec<GameEntity>,
        teams: HashMap<Uuid, TeamEntity>,
        scores: HashMap<Uuid, Vec<PlayerScoreEntity>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                games: Vec::new(),
                teams: HashMap::new(),
                scores: HashMap::new(),
            }
        }

        /// Add a 9-hole game whose only hole produces `hole_total` (two players shoot
        /// half of it each, the others shoot more).
        fn team_with_total(&mut self, name: &str, hole_total: u32) -> Uuid {
            let team = TeamEntity::new(
                name.to_string(),
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                format!("{name}-keeper"),
                SystemTime::now(),
            );
            let game = GameEntity::new(team.id, 9, SystemTime::now());
            let half = hole_total / 2;
            let records = team
                .roster()
                .enumerate()
                .map(|(index, (player_id, player_name))| {
                    let mut record =
                        PlayerScoreEntity::new(game.id, player_id, player_name.to_string());
                    let strokes = match index {
                        0 => half,
                        1 => hole_total - half,
                        _ => hole_total,
                    };
                    record.set_hole(1, Some(strokes), SystemTime::now());
                    record
                })
                .collect();

            let team_id = team.id;
            self.scores.insert(game.id, records);
            self.teams.insert(team.id, team);
            self.games.push(game);
            team_id
        }

        fn assemble(&self) -> Vec<LeaderboardRow> {
            assemble_leaderboard(&self.games, &self.teams, &self.scores)
        }
    }

    #[test]
    fn sorts_ascending_and_ranks_sequentially() {
        let mut fixture = Fixture::new();
        fixture.team_with_total("Fifteen", 15);
        fixture.team_with_total("Nine", 9);
        fixture.team_with_total("TwentyTwo", 22);

        let rows = fixture.assemble();
        let totals = rows.iter().map(|row| row.total).collect::<Vec<_>>();
        let ranks = rows.iter().map(|row| row.rank).collect::<Vec<_>>();
        assert_eq!(totals, vec![9, 15, 22]);
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(rows.iter().all(|row| !row.tied));
        assert_eq!(rows[0].team_name, "Nine");
        assert_eq!(rows[0].roster.len(), 4);
    }

    #[test]
    fn ties_keep_encounter_order_and_are_flagged() {
        let mut fixture = Fixture::new();
        let first = fixture.team_with_total("First", 10);
        let second = fixture.team_with_total("Second", 10);
        fixture.team_with_total("Leader", 8);

        let rows = fixture.assemble();
        assert_eq!(rows[1].team_id, first);
        assert_eq!(rows[2].team_id, second);
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[2].rank, 3);
        assert!(rows[1].tied && rows[2].tied);
        assert!(!rows[0].tied);
    }

    #[test]
    fn missing_team_is_skipped() {
        let mut fixture = Fixture::new();
        fixture.team_with_total("Kept", 12);
        fixture
            .games
            .push(GameEntity::new(Uuid::new_v4(), 18, SystemTime::now()));

        let rows = fixture.assemble();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_name, "Kept");
    }

    #[test]
    fn team_without_records_gets_empty_row() {
        let mut fixture = Fixture::new();
        let team = TeamEntity::new(
            "Fresh".into(),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            "keeper".into(),
            SystemTime::now(),
        );
        fixture
            .games
            .push(GameEntity::new(team.id, 18, SystemTime::now()));
        fixture.teams.insert(team.id, team);

        let rows = fixture.assemble();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 0);
        assert_eq!(rows[0].through, 0);
        assert_eq!(rows[0].rank, 1);
    }
}
