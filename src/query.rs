// src/query.rs
//
// Read-only query resolvers over the enriched dataset. The table is built
// once (normally from `elements_prepped.json` at startup) and never mutated;
// a new dataset means a new table.

use crate::error::{QueryError, SnapshotError};
use crate::models::{Player, PlayerSummary, Position, SortField};
use crate::snapshot::{self, SnapshotStore};
use log::info;
use std::cmp::Ordering;
use std::path::Path;

/// Label that disables position filtering in the sorted queries.
pub const ALL_POSITIONS: &str = "All";

/// Resolved position filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionFilter {
    /// Every record.
    All,
    /// Records with exactly this position.
    Only(Position),
    /// Unknown or absent label: matches nothing.
    Nothing,
}

impl PositionFilter {
    /// Exact-match filter: only a real position label matches anything.
    /// `"All"` is not a wildcard here.
    pub fn exact(label: Option<&str>) -> Self {
        match label.map(str::parse::<Position>) {
            Some(Ok(position)) => PositionFilter::Only(position),
            _ => PositionFilter::Nothing,
        }
    }

    /// Like [`PositionFilter::exact`], but `"All"` selects every record.
    pub fn with_all(label: Option<&str>) -> Self {
        match label {
            Some(ALL_POSITIONS) => PositionFilter::All,
            other => Self::exact(other),
        }
    }

    pub fn matches(&self, player: &Player) -> bool {
        match self {
            PositionFilter::All => true,
            PositionFilter::Only(position) => player.position == *position,
            PositionFilter::Nothing => false,
        }
    }
}

/// Exclusive bounds on `now_cost`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceRange {
    min: i64,
    max: i64,
}

impl PriceRange {
    /// Both bounds are exclusive, so `min` must be strictly below `max`.
    pub fn new(min: i64, max: i64) -> Result<Self, QueryError> {
        if min >= max {
            return Err(QueryError::InvalidPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, now_cost: i64) -> bool {
        now_cost > self.min && now_cost < self.max
    }
}

/// Resolves a sort field name, separating unknown names from known fields
/// that cannot be compared numerically.
pub fn parse_sort_field(name: &str) -> Result<SortField, QueryError> {
    if let Some(field) = SortField::from_name(name) {
        return Ok(field);
    }
    if SortField::is_non_numeric_field(name) {
        Err(QueryError::NonNumericSortField(name.to_string()))
    } else {
        Err(QueryError::UnknownSortField(name.to_string()))
    }
}

/// Sorts descending by `field`. Ties keep their dataset order, and `-0.0`
/// ties with `0.0`.
fn sort_descending(players: &mut [&Player], field: SortField) {
    // values are finite after enrichment; NaN would only compare equal
    players.sort_by(|a, b| {
        b.numeric(field)
            .partial_cmp(&a.numeric(field))
            .unwrap_or(Ordering::Equal)
    });
}

/// Immutable in-memory player table.
#[derive(Debug, Clone, Default)]
pub struct PlayerTable {
    players: Vec<Player>,
}

impl PlayerTable {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Loads an enriched snapshot file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let players: Vec<Player> = snapshot::read_json(path)?;
        info!("QueryServer: Loaded {} players from {}", players.len(), path.display());
        Ok(Self::new(players))
    }

    /// Loads the canonical enriched snapshot of a data directory.
    pub fn from_store(store: &SnapshotStore) -> Result<Self, SnapshotError> {
        Self::load(&store.enriched_path())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// `getPlayer`: the first record, projected. `None` on an empty table.
    pub fn player(&self) -> Option<PlayerSummary> {
        self.players.first().map(Player::summary)
    }

    /// `getPlayers`: every record whose position equals `filter` exactly.
    pub fn players_by_position(&self, filter: Option<&str>) -> Vec<&Player> {
        self.select(PositionFilter::exact(filter), None)
    }

    /// `getPlayersSorted`: filtered (`"All"` bypasses), then sorted
    /// descending by `sort`.
    pub fn players_sorted(&self, filter: Option<&str>, sort: &str) -> Result<Vec<&Player>, QueryError> {
        let field = parse_sort_field(sort)?;
        let mut selected = self.select(PositionFilter::with_all(filter), None);
        sort_descending(&mut selected, field);
        Ok(selected)
    }

    /// `getPlayersSorted2`: as [`PlayerTable::players_sorted`], keeping only
    /// `min_price < now_cost < max_price`.
    pub fn players_sorted_in_price_range(
        &self,
        filter: Option<&str>,
        sort: &str,
        max_price: i64,
        min_price: i64,
    ) -> Result<Vec<&Player>, QueryError> {
        let field = parse_sort_field(sort)?;
        let range = PriceRange::new(min_price, max_price)?;
        let mut selected = self.select(PositionFilter::with_all(filter), Some(range));
        sort_descending(&mut selected, field);
        Ok(selected)
    }

    fn select(&self, filter: PositionFilter, range: Option<PriceRange>) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| filter.matches(p))
            .filter(|p| range.map_or(true, |r| r.contains(p.base.now_cost)))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::enriched_player;

    fn table() -> PlayerTable {
        PlayerTable::new(vec![
            enriched_player(1, Position::Goalkeeper, 45, 90, 2.0),
            enriched_player(2, Position::Midfielder, 80, 150, 7.0),
            enriched_player(3, Position::Midfielder, 40, 60, 9.0),
            enriched_player(4, Position::Midfielder, 65, 120, 5.5),
            enriched_player(5, Position::Attacker, 110, 180, 6.0),
            enriched_player(6, Position::Midfielder, 55, 120, 8.1),
            enriched_player(7, Position::Defence, 50, 100, 4.0),
        ])
    }

    fn ids(players: &[&Player]) -> Vec<i64> {
        players.iter().map(|p| p.base.id).collect()
    }

    #[test]
    fn test_player_returns_first_record_summary() {
        let summary = table().player().unwrap();
        assert_eq!(summary.name, "Player1");
        assert_eq!(summary.points, 90);
        assert_eq!(summary.position, Position::Goalkeeper);

        assert!(PlayerTable::default().player().is_none());
    }

    #[test]
    fn test_players_by_position_exact_match() {
        let table = table();
        let mids = table.players_by_position(Some("Midfielder"));
        assert_eq!(ids(&mids), vec![2, 3, 4, 6]);
        assert!(mids.iter().all(|p| p.position == Position::Midfielder));

        let expected = table
            .players()
            .iter()
            .filter(|p| p.position == Position::Midfielder)
            .count();
        assert_eq!(mids.len(), expected);
    }

    #[test]
    fn test_players_by_position_has_no_wildcard() {
        let table = table();
        assert!(table.players_by_position(Some("All")).is_empty());
        assert!(table.players_by_position(None).is_empty());
    }

    #[test]
    fn test_unknown_label_yields_empty_not_error() {
        let table = table();
        assert!(table.players_by_position(Some("Striker")).is_empty());
        assert!(table.players_by_position(Some("midfielder")).is_empty());
        assert!(table
            .players_sorted(Some("Striker"), "total_points")
            .unwrap()
            .is_empty());
        assert!(table
            .players_sorted_in_price_range(Some("Striker"), "form", 200, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_sorted_all_returns_everything_descending() {
        let table = table();
        let sorted = table.players_sorted(Some("All"), "total_points").unwrap();

        assert_eq!(sorted.len(), table.len());
        for pair in sorted.windows(2) {
            assert!(pair[0].base.total_points >= pair[1].base.total_points);
        }
        // 4 and 6 tie on 120 points and keep dataset order
        assert_eq!(ids(&sorted), vec![5, 2, 4, 6, 7, 1, 3]);
    }

    #[test]
    fn test_sorted_with_position_filter() {
        let table = table();
        let sorted = table.players_sorted(Some("Midfielder"), "form").unwrap();
        assert_eq!(ids(&sorted), vec![3, 6, 2, 4]);
    }

    #[test]
    fn test_sorted_by_derived_field() {
        let table = table();
        let sorted = table
            .players_sorted(Some("All"), "points_pr_game_pr_mill")
            .unwrap();
        assert_eq!(sorted.len(), 7);
    }

    #[test]
    fn test_sort_field_errors() {
        let table = table();
        assert_eq!(
            table.players_sorted(Some("All"), "web_name").unwrap_err(),
            QueryError::NonNumericSortField("web_name".to_string())
        );
        assert_eq!(
            table.players_sorted(Some("All"), "penalties_order").unwrap_err(),
            QueryError::NonNumericSortField("penalties_order".to_string())
        );
        assert_eq!(
            table.players_sorted(Some("All"), "goals").unwrap_err(),
            QueryError::UnknownSortField("goals".to_string())
        );
        assert!(table
            .players_sorted_in_price_range(Some("All"), "position", 100, 0)
            .is_err());
    }

    #[test]
    fn test_price_bounds_are_exclusive() {
        let table = table();
        let result = table
            .players_sorted_in_price_range(Some("Midfielder"), "form", 80, 40)
            .unwrap();

        // player 2 costs exactly 80, player 3 exactly 40
        assert_eq!(ids(&result), vec![6, 4]);
        for player in &result {
            assert_eq!(player.position, Position::Midfielder);
            assert!(player.base.now_cost > 40 && player.base.now_cost < 80);
        }
        for pair in result.windows(2) {
            assert!(pair[0].metrics.form >= pair[1].metrics.form);
        }
    }

    #[test]
    fn test_price_range_with_all() {
        let table = table();
        let result = table
            .players_sorted_in_price_range(Some("All"), "now_cost", 100, 44)
            .unwrap();
        assert_eq!(ids(&result), vec![2, 4, 6, 7, 1]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let players = vec![
            enriched_player(1, Position::Midfielder, 50, 10, 3.0),
            enriched_player(2, Position::Midfielder, 50, 10, -0.0),
            enriched_player(3, Position::Midfielder, 50, 10, 0.0),
        ];
        let table = PlayerTable::new(players);

        let sorted = table.players_sorted(Some("All"), "form").unwrap();
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_price_range() {
        let table = table();
        assert_eq!(
            table
                .players_sorted_in_price_range(Some("All"), "form", 40, 80)
                .unwrap_err(),
            QueryError::InvalidPriceRange { min: 80, max: 40 }
        );
        assert!(table
            .players_sorted_in_price_range(Some("All"), "form", 50, 50)
            .is_err());
    }

    #[test]
    fn test_load_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store
            .write_json(&store.enriched_path(), table().players())
            .unwrap();

        let loaded = PlayerTable::from_store(&store).unwrap();
        assert_eq!(loaded.len(), 7);
        assert_eq!(loaded.players(), table().players());
    }
}
