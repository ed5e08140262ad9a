//! Fixtures shared by the unit tests.
//!
//! Source records are built as JSON so tests go through the same
//! deserialization path as real `elements.json` / `teams.json` files.

use serde_json::{json, Value};

use crate::models::{Metrics, Player, PlayerBase, Position};

/// A source player record with every field the API serves.
pub fn raw_player_json(
    id: i64,
    element_type: i64,
    team_code: i64,
    now_cost: i64,
    total_points: i64,
    form: &str,
) -> Value {
    json!({
        "chance_of_playing_next_round": null,
        "code": 10_000 + id,
        "cost_change_event": 0,
        "cost_change_start": 1,
        "element_type": element_type,
        "ep_next": "4.5",
        "ep_this": "4.0",
        "event_points": 6,
        "first_name": format!("First{}", id),
        "form": form,
        "id": id,
        "news": "",
        "news_added": null,
        "now_cost": now_cost,
        "photo": format!("{}.jpg", 10_000 + id),
        "points_per_game": "5.2",
        "second_name": format!("Second{}", id),
        "selected_by_percent": "12.3",
        "special": false,
        "status": "a",
        "team": 1,
        "team_code": team_code,
        "total_points": total_points,
        "transfers_in": 1000,
        "transfers_in_event": 10,
        "transfers_out": 500,
        "transfers_out_event": 5,
        "value_form": "0.8",
        "value_season": "18.5",
        "web_name": format!("Player{}", id),
        "minutes": 1800,
        "goals_scored": 5,
        "assists": 3,
        "clean_sheets": 4,
        "goals_conceded": 20,
        "own_goals": 0,
        "penalties_saved": 0,
        "penalties_missed": 0,
        "yellow_cards": 2,
        "red_cards": 0,
        "saves": 0,
        "bonus": 7,
        "bps": 300,
        "influence": "400.2",
        "creativity": "350.0",
        "threat": "280.0",
        "ict_index": "103.1",
        "influence_rank": 20,
        "influence_rank_type": 5,
        "creativity_rank": 30,
        "creativity_rank_type": 8,
        "threat_rank": 40,
        "threat_rank_type": 12,
        "ict_index_rank": 25,
        "ict_index_rank_type": 7,
        "corners_and_indirect_freekicks_order": null,
        "direct_freekicks_order": null,
        "penalties_order": 1
    })
}

/// A source team record.
pub fn team_json(code: i64, name: &str) -> Value {
    json!({
        "code": code,
        "id": code,
        "name": name,
        "short_name": name.chars().take(3).collect::<String>().to_uppercase(),
        "strength": 3
    })
}

/// An already enriched player, for query tests.
pub fn enriched_player(
    id: i64,
    position: Position,
    now_cost: i64,
    total_points: i64,
    form: f64,
) -> Player {
    let raw = raw_player_json(id, position.code(), 3, now_cost, total_points, "0.0");
    let base: PlayerBase = serde_json::from_value(raw).expect("fixture is a valid player");
    Player {
        base,
        metrics: Metrics {
            form,
            points_per_game: 5.2,
            ..Metrics::default()
        },
        points_pr_mill: 0.0,
        points_pr_game_pr_mill: 0.0,
        team_name: "Arsenal".to_string(),
        position,
    }
}
