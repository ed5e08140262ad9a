// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Positions
// =============================================================================

/// Playing position, resolved from the source's numeric `element_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defence,
    Midfielder,
    Attacker,
}

/// Static code -> position table used by the enricher.
pub const POSITION_MAP: [(i64, Position); 4] = [
    (1, Position::Goalkeeper),
    (2, Position::Defence),
    (3, Position::Midfielder),
    (4, Position::Attacker),
];

impl Position {
    /// Looks up a position by its `element_type` code.
    pub fn from_code(code: i64) -> Option<Position> {
        POSITION_MAP
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, position)| *position)
    }

    pub fn code(&self) -> i64 {
        match self {
            Position::Goalkeeper => 1,
            Position::Defence => 2,
            Position::Midfielder => 3,
            Position::Attacker => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defence => "Defence",
            Position::Midfielder => "Midfielder",
            Position::Attacker => "Attacker",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Position {
    type Err = String;

    /// Labels are matched exactly (case-sensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        POSITION_MAP
            .iter()
            .map(|(_, position)| *position)
            .find(|position| position.label() == s)
            .ok_or_else(|| format!("Unknown position label: {}", s))
    }
}

// =============================================================================
// Source Records
// =============================================================================

/// Team record from the source. Only `code` and `name` matter for enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub code: i64,
    pub name: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub short_name: Option<String>,
}

/// Fields shared verbatim between the raw and the enriched player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBase {
    pub code: i64,
    pub cost_change_event: i64,
    pub cost_change_start: i64,
    pub element_type: i64,
    pub event_points: i64,
    pub first_name: String,
    pub id: i64,
    pub news: String,
    #[serde(default)]
    pub news_added: Option<String>,
    pub now_cost: i64,
    pub photo: String,
    pub second_name: String,
    pub special: bool,
    pub status: String,
    pub team: i64,
    pub team_code: i64,
    pub total_points: i64,
    pub transfers_in: i64,
    pub transfers_in_event: i64,
    pub transfers_out: i64,
    pub transfers_out_event: i64,
    pub web_name: String,
    pub minutes: i64,
    pub goals_scored: i64,
    pub assists: i64,
    pub clean_sheets: i64,
    pub goals_conceded: i64,
    pub own_goals: i64,
    pub penalties_saved: i64,
    pub penalties_missed: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub saves: i64,
    pub bonus: i64,
    pub bps: i64,
    pub influence_rank: i64,
    pub influence_rank_type: i64,
    pub creativity_rank: i64,
    pub creativity_rank_type: i64,
    pub threat_rank: i64,
    pub threat_rank_type: i64,
    pub ict_index_rank: i64,
    pub ict_index_rank_type: i64,
    #[serde(default)]
    pub corners_and_indirect_freekicks_order: Option<i64>,
    #[serde(default)]
    pub direct_freekicks_order: Option<i64>,
    #[serde(default)]
    pub penalties_order: Option<i64>,
    #[serde(default)]
    pub extra: Option<String>,
}

/// Metric fields as the source delivers them: decimal numbers encoded as text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMetrics {
    #[serde(default)]
    pub ep_next: Option<String>,
    #[serde(default)]
    pub ep_this: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub points_per_game: Option<String>,
    #[serde(default)]
    pub selected_by_percent: Option<String>,
    #[serde(default)]
    pub value_form: Option<String>,
    #[serde(default)]
    pub value_season: Option<String>,
    #[serde(default)]
    pub influence: Option<String>,
    #[serde(default)]
    pub creativity: Option<String>,
    #[serde(default)]
    pub threat: Option<String>,
    #[serde(default)]
    pub ict_index: Option<String>,
}

impl RawMetrics {
    /// Field names paired with their raw text, in output order.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 11] {
        [
            ("ep_next", self.ep_next.as_deref()),
            ("ep_this", self.ep_this.as_deref()),
            ("form", self.form.as_deref()),
            ("points_per_game", self.points_per_game.as_deref()),
            ("selected_by_percent", self.selected_by_percent.as_deref()),
            ("value_form", self.value_form.as_deref()),
            ("value_season", self.value_season.as_deref()),
            ("influence", self.influence.as_deref()),
            ("creativity", self.creativity.as_deref()),
            ("threat", self.threat.as_deref()),
            ("ict_index", self.ict_index.as_deref()),
        ]
    }
}

/// A player record exactly as it appears in `elements.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlayer {
    #[serde(flatten)]
    pub base: PlayerBase,
    #[serde(flatten)]
    pub metrics: RawMetrics,
}

// =============================================================================
// Enriched Records
// =============================================================================

/// Metric fields after coercion to floating point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub ep_next: f64,
    pub ep_this: f64,
    pub form: f64,
    pub points_per_game: f64,
    pub selected_by_percent: f64,
    pub value_form: f64,
    pub value_season: f64,
    pub influence: f64,
    pub creativity: f64,
    pub threat: f64,
    pub ict_index: f64,
}

/// The enriched player record served by the query API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(flatten)]
    pub base: PlayerBase,
    #[serde(flatten)]
    pub metrics: Metrics,
    pub points_pr_mill: f64,
    pub points_pr_game_pr_mill: f64,
    pub team_name: String,
    pub position: Position,
}

impl Player {
    /// Returns the value of a numeric field, widened to `f64`.
    pub fn numeric(&self, field: SortField) -> f64 {
        let b = &self.base;
        let m = &self.metrics;
        match field {
            SortField::Code => b.code as f64,
            SortField::CostChangeEvent => b.cost_change_event as f64,
            SortField::CostChangeStart => b.cost_change_start as f64,
            SortField::ElementType => b.element_type as f64,
            SortField::EventPoints => b.event_points as f64,
            SortField::Id => b.id as f64,
            SortField::NowCost => b.now_cost as f64,
            SortField::Team => b.team as f64,
            SortField::TeamCode => b.team_code as f64,
            SortField::TotalPoints => b.total_points as f64,
            SortField::TransfersIn => b.transfers_in as f64,
            SortField::TransfersInEvent => b.transfers_in_event as f64,
            SortField::TransfersOut => b.transfers_out as f64,
            SortField::TransfersOutEvent => b.transfers_out_event as f64,
            SortField::Minutes => b.minutes as f64,
            SortField::GoalsScored => b.goals_scored as f64,
            SortField::Assists => b.assists as f64,
            SortField::CleanSheets => b.clean_sheets as f64,
            SortField::GoalsConceded => b.goals_conceded as f64,
            SortField::OwnGoals => b.own_goals as f64,
            SortField::PenaltiesSaved => b.penalties_saved as f64,
            SortField::PenaltiesMissed => b.penalties_missed as f64,
            SortField::YellowCards => b.yellow_cards as f64,
            SortField::RedCards => b.red_cards as f64,
            SortField::Saves => b.saves as f64,
            SortField::Bonus => b.bonus as f64,
            SortField::Bps => b.bps as f64,
            SortField::InfluenceRank => b.influence_rank as f64,
            SortField::InfluenceRankType => b.influence_rank_type as f64,
            SortField::CreativityRank => b.creativity_rank as f64,
            SortField::CreativityRankType => b.creativity_rank_type as f64,
            SortField::ThreatRank => b.threat_rank as f64,
            SortField::ThreatRankType => b.threat_rank_type as f64,
            SortField::IctIndexRank => b.ict_index_rank as f64,
            SortField::IctIndexRankType => b.ict_index_rank_type as f64,
            SortField::EpNext => m.ep_next,
            SortField::EpThis => m.ep_this,
            SortField::Form => m.form,
            SortField::PointsPerGame => m.points_per_game,
            SortField::SelectedByPercent => m.selected_by_percent,
            SortField::ValueForm => m.value_form,
            SortField::ValueSeason => m.value_season,
            SortField::Influence => m.influence,
            SortField::Creativity => m.creativity,
            SortField::Threat => m.threat,
            SortField::IctIndex => m.ict_index,
            SortField::PointsPrMill => self.points_pr_mill,
            SortField::PointsPrGamePrMill => self.points_pr_game_pr_mill,
        }
    }

    /// Projection returned by the `getPlayer` smoke-test query.
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            name: self.base.web_name.clone(),
            points: self.base.total_points,
            position: self.position,
        }
    }
}

/// Display name, total points and position of a single player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub points: i64,
    pub position: Position,
}

// =============================================================================
// Sortable Fields
// =============================================================================

/// Every numeric, non-nullable player field a query may sort by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    Code,
    CostChangeEvent,
    CostChangeStart,
    ElementType,
    EventPoints,
    Id,
    NowCost,
    Team,
    TeamCode,
    TotalPoints,
    TransfersIn,
    TransfersInEvent,
    TransfersOut,
    TransfersOutEvent,
    Minutes,
    GoalsScored,
    Assists,
    CleanSheets,
    GoalsConceded,
    OwnGoals,
    PenaltiesSaved,
    PenaltiesMissed,
    YellowCards,
    RedCards,
    Saves,
    Bonus,
    Bps,
    InfluenceRank,
    InfluenceRankType,
    CreativityRank,
    CreativityRankType,
    ThreatRank,
    ThreatRankType,
    IctIndexRank,
    IctIndexRankType,
    EpNext,
    EpThis,
    Form,
    PointsPerGame,
    SelectedByPercent,
    ValueForm,
    ValueSeason,
    Influence,
    Creativity,
    Threat,
    IctIndex,
    PointsPrMill,
    PointsPrGamePrMill,
}

impl SortField {
    pub const ALL: [SortField; 48] = [
        SortField::Code,
        SortField::CostChangeEvent,
        SortField::CostChangeStart,
        SortField::ElementType,
        SortField::EventPoints,
        SortField::Id,
        SortField::NowCost,
        SortField::Team,
        SortField::TeamCode,
        SortField::TotalPoints,
        SortField::TransfersIn,
        SortField::TransfersInEvent,
        SortField::TransfersOut,
        SortField::TransfersOutEvent,
        SortField::Minutes,
        SortField::GoalsScored,
        SortField::Assists,
        SortField::CleanSheets,
        SortField::GoalsConceded,
        SortField::OwnGoals,
        SortField::PenaltiesSaved,
        SortField::PenaltiesMissed,
        SortField::YellowCards,
        SortField::RedCards,
        SortField::Saves,
        SortField::Bonus,
        SortField::Bps,
        SortField::InfluenceRank,
        SortField::InfluenceRankType,
        SortField::CreativityRank,
        SortField::CreativityRankType,
        SortField::ThreatRank,
        SortField::ThreatRankType,
        SortField::IctIndexRank,
        SortField::IctIndexRankType,
        SortField::EpNext,
        SortField::EpThis,
        SortField::Form,
        SortField::PointsPerGame,
        SortField::SelectedByPercent,
        SortField::ValueForm,
        SortField::ValueSeason,
        SortField::Influence,
        SortField::Creativity,
        SortField::Threat,
        SortField::IctIndex,
        SortField::PointsPrMill,
        SortField::PointsPrGamePrMill,
    ];

    /// Player fields that exist but cannot be sorted numerically
    /// (text, boolean, or nullable).
    pub const NON_NUMERIC: [&'static str; 14] = [
        "first_name",
        "second_name",
        "web_name",
        "news",
        "news_added",
        "photo",
        "status",
        "special",
        "extra",
        "team_name",
        "position",
        "corners_and_indirect_freekicks_order",
        "direct_freekicks_order",
        "penalties_order",
    ];

    /// Wire name of the field, as it appears in the enriched JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Code => "code",
            SortField::CostChangeEvent => "cost_change_event",
            SortField::CostChangeStart => "cost_change_start",
            SortField::ElementType => "element_type",
            SortField::EventPoints => "event_points",
            SortField::Id => "id",
            SortField::NowCost => "now_cost",
            SortField::Team => "team",
            SortField::TeamCode => "team_code",
            SortField::TotalPoints => "total_points",
            SortField::TransfersIn => "transfers_in",
            SortField::TransfersInEvent => "transfers_in_event",
            SortField::TransfersOut => "transfers_out",
            SortField::TransfersOutEvent => "transfers_out_event",
            SortField::Minutes => "minutes",
            SortField::GoalsScored => "goals_scored",
            SortField::Assists => "assists",
            SortField::CleanSheets => "clean_sheets",
            SortField::GoalsConceded => "goals_conceded",
            SortField::OwnGoals => "own_goals",
            SortField::PenaltiesSaved => "penalties_saved",
            SortField::PenaltiesMissed => "penalties_missed",
            SortField::YellowCards => "yellow_cards",
            SortField::RedCards => "red_cards",
            SortField::Saves => "saves",
            SortField::Bonus => "bonus",
            SortField::Bps => "bps",
            SortField::InfluenceRank => "influence_rank",
            SortField::InfluenceRankType => "influence_rank_type",
            SortField::CreativityRank => "creativity_rank",
            SortField::CreativityRankType => "creativity_rank_type",
            SortField::ThreatRank => "threat_rank",
            SortField::ThreatRankType => "threat_rank_type",
            SortField::IctIndexRank => "ict_index_rank",
            SortField::IctIndexRankType => "ict_index_rank_type",
            SortField::EpNext => "ep_next",
            SortField::EpThis => "ep_this",
            SortField::Form => "form",
            SortField::PointsPerGame => "points_per_game",
            SortField::SelectedByPercent => "selected_by_percent",
            SortField::ValueForm => "value_form",
            SortField::ValueSeason => "value_season",
            SortField::Influence => "influence",
            SortField::Creativity => "creativity",
            SortField::Threat => "threat",
            SortField::IctIndex => "ict_index",
            SortField::PointsPrMill => "points_pr_mill",
            SortField::PointsPrGamePrMill => "points_pr_game_pr_mill",
        }
    }

    /// Looks up a sort field by its wire name.
    pub fn from_name(name: &str) -> Option<SortField> {
        SortField::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    /// True if `name` is a real player field that is not numeric.
    pub fn is_non_numeric_field(name: &str) -> bool {
        SortField::NON_NUMERIC.contains(&name)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{enriched_player, raw_player_json};

    #[test]
    fn test_position_codes() {
        assert_eq!(Position::from_code(1), Some(Position::Goalkeeper));
        assert_eq!(Position::from_code(2), Some(Position::Defence));
        assert_eq!(Position::from_code(3), Some(Position::Midfielder));
        assert_eq!(Position::from_code(4), Some(Position::Attacker));
        assert_eq!(Position::from_code(0), None);
        assert_eq!(Position::from_code(5), None);

        for (code, position) in POSITION_MAP {
            assert_eq!(position.code(), code);
        }
    }

    #[test]
    fn test_position_labels_are_exact() {
        assert_eq!("Midfielder".parse::<Position>(), Ok(Position::Midfielder));
        assert!("midfielder".parse::<Position>().is_err());
        assert!("All".parse::<Position>().is_err());
        assert_eq!(Position::Defence.to_string(), "Defence");
    }

    #[test]
    fn test_position_serializes_as_label() {
        let json = serde_json::to_string(&Position::Attacker).unwrap();
        assert_eq!(json, "\"Attacker\"");
    }

    #[test]
    fn test_sort_field_names_round_trip() {
        for field in SortField::ALL {
            assert_eq!(SortField::from_name(field.as_str()), Some(field));
            assert!(!SortField::is_non_numeric_field(field.as_str()));
        }
        assert_eq!(SortField::from_name("web_name"), None);
        assert!(SortField::is_non_numeric_field("web_name"));
        assert!(!SortField::is_non_numeric_field("nonsense"));
    }

    #[test]
    fn test_raw_player_parses_source_record() {
        let json = raw_player_json(7, 3, 14, 65, 120, "5.5");
        let raw: RawPlayer = serde_json::from_value(json).unwrap();
        assert_eq!(raw.base.id, 7);
        assert_eq!(raw.base.element_type, 3);
        assert_eq!(raw.base.now_cost, 65);
        assert_eq!(raw.metrics.form.as_deref(), Some("5.5"));
        assert_eq!(raw.base.penalties_order, Some(1));
    }

    #[test]
    fn test_raw_player_accepts_null_set_piece_order() {
        let mut json = raw_player_json(8, 2, 14, 45, 60, "1.0");
        json["penalties_order"] = serde_json::Value::Null;
        let raw: RawPlayer = serde_json::from_value(json).unwrap();
        assert_eq!(raw.base.penalties_order, None);
        assert_eq!(raw.base.direct_freekicks_order, None);
    }

    #[test]
    fn test_player_numeric_accessor() {
        let player = enriched_player(1, Position::Midfielder, 65, 120, 5.5);
        assert_eq!(player.numeric(SortField::TotalPoints), 120.0);
        assert_eq!(player.numeric(SortField::NowCost), 65.0);
        assert_eq!(player.numeric(SortField::Form), 5.5);
    }

    #[test]
    fn test_enriched_player_serializes_flat() {
        let player = enriched_player(1, Position::Goalkeeper, 45, 90, 2.0);
        let value = serde_json::to_value(&player).unwrap();
        assert_eq!(value["web_name"], "Player1");
        assert_eq!(value["form"], 2.0);
        assert_eq!(value["position"], "Goalkeeper");
        assert!(value.get("base").is_none());

        let back: Player = serde_json::from_value(value).unwrap();
        assert_eq!(back, player);
    }
}
