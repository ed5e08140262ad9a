// src/server.rs

//! Query server.
//!
//! Exposes the player table over HTTP:
//! - `POST /query` answers one named query per request
//! - `GET /health` reports liveness and dataset size
//!
//! Cross-origin requests are allowed from any origin.

use crate::error::QueryError;
use crate::models::{Player, PlayerSummary};
use crate::query::PlayerTable;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// A query request. The `query` tag names the operation; the remaining
/// keys are its arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "query")]
pub enum QueryRequest {
    #[serde(rename = "getPlayer")]
    GetPlayer,
    #[serde(rename = "getPlayers")]
    GetPlayers { filter: Option<String> },
    #[serde(rename = "getPlayersSorted")]
    GetPlayersSorted { filter: Option<String>, sort: String },
    #[serde(rename = "getPlayersSorted2")]
    GetPlayersSorted2 {
        filter: Option<String>,
        sort: String,
        #[serde(rename = "maxPrice")]
        max_price: i64,
        #[serde(rename = "minPrice")]
        min_price: i64,
    },
}

impl QueryRequest {
    /// Operation name, used as the key in the response `data` object.
    pub fn name(&self) -> &'static str {
        match self {
            QueryRequest::GetPlayer => "getPlayer",
            QueryRequest::GetPlayers { .. } => "getPlayers",
            QueryRequest::GetPlayersSorted { .. } => "getPlayersSorted",
            QueryRequest::GetPlayersSorted2 { .. } => "getPlayersSorted2",
        }
    }
}

/// Result of a single query.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QueryResult<'a> {
    Summary(Option<PlayerSummary>),
    Players(Vec<&'a Player>),
}

/// Resolves a request against the table.
pub fn resolve<'a>(table: &'a PlayerTable, request: &QueryRequest) -> Result<QueryResult<'a>, QueryError> {
    match request {
        QueryRequest::GetPlayer => Ok(QueryResult::Summary(table.player())),
        QueryRequest::GetPlayers { filter } => Ok(QueryResult::Players(
            table.players_by_position(filter.as_deref()),
        )),
        QueryRequest::GetPlayersSorted { filter, sort } => table
            .players_sorted(filter.as_deref(), sort)
            .map(QueryResult::Players),
        QueryRequest::GetPlayersSorted2 {
            filter,
            sort,
            max_price,
            min_price,
        } => table
            .players_sorted_in_price_range(filter.as_deref(), sort, *max_price, *min_price)
            .map(QueryResult::Players),
    }
}

#[derive(Serialize)]
struct DataResponse<'a> {
    data: BTreeMap<&'static str, QueryResult<'a>>,
}

#[derive(Serialize)]
struct ErrorMessage {
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    errors: Vec<ErrorMessage>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    players: usize,
}

/// The HTTP server in front of a loaded player table. The table is the
/// router state; handlers only read it.
pub struct QueryServer {
    table: Arc<PlayerTable>,
    port: u16,
}

impl QueryServer {
    pub fn new(table: Arc<PlayerTable>, port: u16) -> Self {
        Self { table, port }
    }

    /// Builds the router with CORS applied.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/query", post(query_handler))
            .route("/health", get(health_handler))
            .layer(cors)
            .with_state(self.table.clone())
    }

    /// Starts the server. Runs until the listener fails.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = self.router();

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(
            "QueryServer: Serving {} players on http://{}/query",
            self.table.len(),
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// POST /query - Resolves one named query
async fn query_handler(
    State(table): State<Arc<PlayerTable>>,
    Json(request): Json<QueryRequest>,
) -> Response {
    debug!("QueryServer: {:?}", request);

    match resolve(&table, &request) {
        Ok(result) => {
            let mut data = BTreeMap::new();
            data.insert(request.name(), result);
            Json(DataResponse { data }).into_response()
        }
        Err(e) => {
            warn!("QueryServer: Rejected {}: {}", request.name(), e);
            let body = ErrorResponse {
                errors: vec![ErrorMessage {
                    message: e.to_string(),
                }],
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}

/// GET /health - Liveness and dataset size
async fn health_handler(State(table): State<Arc<PlayerTable>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        players: table.len(),
    })
}

// =============================================================================
// Tests
// =============================================================================
