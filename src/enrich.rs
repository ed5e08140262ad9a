// src/enrich.rs
//
// One-shot enrichment pass: raw players + teams -> enriched players.
// The whole collection is enriched in memory first; the output file is only
// written when every record succeeded.

use crate::error::EnrichError;
use crate::models::{Metrics, Player, Position, RawMetrics, RawPlayer, Team};
use crate::snapshot::SnapshotStore;
use log::info;
use std::collections::HashMap;

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `(numerator / now_cost) * 10`, rounded to two decimals.
/// Costs of zero or below have no defined ratio.
pub fn per_mill(player_id: i64, numerator: f64, now_cost: i64) -> Result<f64, EnrichError> {
    if now_cost <= 0 {
        return Err(EnrichError::NonPositiveCost { player_id, now_cost });
    }
    Ok(round2((numerator / now_cost as f64) * 10.0))
}

/// Parses one metric text field. Missing, unparseable or non-finite values
/// are errors.
pub fn parse_metric(
    player_id: i64,
    field: &'static str,
    text: Option<&str>,
) -> Result<f64, EnrichError> {
    let text = text.ok_or(EnrichError::MissingMetric { player_id, field })?;
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EnrichError::NonNumeric {
            player_id,
            field,
            value: text.to_string(),
        }),
    }
}

/// Coerces all metric fields of a player.
pub fn parse_metrics(player_id: i64, raw: &RawMetrics) -> Result<Metrics, EnrichError> {
    let [ep_next, ep_this, form, points_per_game, selected_by_percent, value_form, value_season, influence, creativity, threat, ict_index] =
        raw.fields();

    Ok(Metrics {
        ep_next: parse_metric(player_id, ep_next.0, ep_next.1)?,
        ep_this: parse_metric(player_id, ep_this.0, ep_this.1)?,
        form: parse_metric(player_id, form.0, form.1)?,
        points_per_game: parse_metric(player_id, points_per_game.0, points_per_game.1)?,
        selected_by_percent: parse_metric(player_id, selected_by_percent.0, selected_by_percent.1)?,
        value_form: parse_metric(player_id, value_form.0, value_form.1)?,
        value_season: parse_metric(player_id, value_season.0, value_season.1)?,
        influence: parse_metric(player_id, influence.0, influence.1)?,
        creativity: parse_metric(player_id, creativity.0, creativity.1)?,
        threat: parse_metric(player_id, threat.0, threat.1)?,
        ict_index: parse_metric(player_id, ict_index.0, ict_index.1)?,
    })
}

/// Team code -> team name. Codes must be unique.
pub fn team_lookup(teams: &[Team]) -> Result<HashMap<i64, &str>, EnrichError> {
    let mut lookup = HashMap::with_capacity(teams.len());
    for team in teams {
        if lookup.insert(team.code, team.name.as_str()).is_some() {
            return Err(EnrichError::DuplicateTeam(team.code));
        }
    }
    Ok(lookup)
}

/// Enriches a single player.
pub fn enrich_player(raw: RawPlayer, teams: &HashMap<i64, &str>) -> Result<Player, EnrichError> {
    let player_id = raw.base.id;
    let metrics = parse_metrics(player_id, &raw.metrics)?;

    let points_pr_mill = per_mill(player_id, raw.base.total_points as f64, raw.base.now_cost)?;
    let points_pr_game_pr_mill = per_mill(player_id, metrics.points_per_game, raw.base.now_cost)?;

    let team_name = teams
        .get(&raw.base.team_code)
        .map(|name| name.to_string())
        .ok_or(EnrichError::UnknownTeam {
            player_id,
            team_code: raw.base.team_code,
        })?;

    let position = Position::from_code(raw.base.element_type).ok_or(EnrichError::UnknownPosition {
        player_id,
        element_type: raw.base.element_type,
    })?;

    Ok(Player {
        base: raw.base,
        metrics,
        points_pr_mill,
        points_pr_game_pr_mill,
        team_name,
        position,
    })
}

/// Enriches every player, preserving input order. Stops at the first
/// integrity error.
pub fn enrich_players(players: Vec<RawPlayer>, teams: &[Team]) -> Result<Vec<Player>, EnrichError> {
    let lookup = team_lookup(teams)?;
    players
        .into_iter()
        .map(|raw| enrich_player(raw, &lookup))
        .collect()
}

/// Reads the canonical raw snapshots, enriches them and overwrites the
/// enriched snapshot. Returns the number of players written.
pub fn run(store: &SnapshotStore) -> Result<usize, EnrichError> {
    let players: Vec<RawPlayer> = store.read_json(&store.players_path())?;
    let teams: Vec<Team> = store.read_json(&store.teams_path())?;
    info!(
        "Enricher: Loaded {} players and {} teams from {}",
        players.len(),
        teams.len(),
        store.data_dir().display()
    );

    let enriched = enrich_players(players, &teams)?;

    let path = store.enriched_path();
    store.write_json(&path, &enriched)?;
    info!("Enricher: Wrote {} players to {}", enriched.len(), path.display());

    Ok(enriched.len())
}

// =============================================================================
// Tests
// =============================================================================
