//! REST API handlers for team drawing.
//!
//! Provides endpoints for:
//! - Demo data retrieval
//! - Team draw generation
//! - Result logging (append-only usage log)
//! - Saved form state (preferences)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, warn};

use crate::audit::{self, AuditLog, DrawRecord};
use crate::demo_data::{self, DemoData};
use crate::dto::{DrawRequest, DrawResponse, ErrorResponse, LogResultRequest, StatusResponse};
use crate::generator::draw_teams;
use crate::prefs::{PrefStore, Preferences};

/// Application state shared across handlers.
pub struct AppState {
    /// Usage log receiving best-effort draw records.
    pub audit: Arc<AuditLog>,
    /// Saved form state.
    pub prefs: PrefStore,
}

impl AppState {
    pub fn new(audit: AuditLog, prefs: PrefStore) -> Self {
        Self {
            audit: Arc::new(audit),
            prefs,
        }
    }
}

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info_endpoint))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{name}", get(get_demo_data))
        // Draws
        .route("/team-draws", post(create_team_draw))
        .route("/log-result", post(log_result))
        // Saved form state
        .route("/preferences", get(get_preferences))
        .route("/preferences", put(put_preferences))
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn conflict(message: impl Into<String>) -> ApiError {
    (StatusCode::CONFLICT, Json(ErrorResponse::new(message)))
}

fn server_fault(message: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
}

/// Resolves the client address, preferring `x-forwarded-for` over the
/// socket peer so proxied deployments log the real origin.
fn client_address(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}

// ============================================================================
// Health & Info
// ============================================================================

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub generator: &'static str,
}

/// GET /info - Application info endpoint.
async fn info_endpoint() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Team Draw",
        version: env!("CARGO_PKG_VERSION"),
        generator: "bounded rejection sampling",
    })
}

// ============================================================================
// Demo data
// ============================================================================

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{name} - Get a ready-to-post demo draw request.
async fn get_demo_data(Path(name): Path<String>) -> Result<Json<DrawRequest>, StatusCode> {
    match name.parse::<DemoData>() {
        Ok(demo) => Ok(Json(demo_data::generate(demo))),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// Draws
// ============================================================================

/// POST /team-draws - Validate the roster and draw two teams.
///
/// A successful draw also dispatches a fire-and-forget record to the
/// usage log; a failing log never affects the response.
async fn create_team_draw(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<DrawRequest>,
) -> Result<Json<DrawResponse>, ApiError> {
    let roster = request.roster().map_err(|err| bad_request(err.to_string()))?;
    let pairings = request.pairings();

    let draw = draw_teams(&roster, &pairings, request.budget(), &mut rand::thread_rng())
        .ok_or_else(|| {
            conflict(
                "No team assignment satisfies the pairing rules within the attempt budget; \
                 check the rules for conflicts.",
            )
        })?;

    let draw_id = uuid::Uuid::new_v4();
    info!(
        draw_id = %draw_id,
        players = roster.len(),
        rules = pairings.len(),
        "team draw generated"
    );

    let record = DrawRecord::now(
        client_address(&headers, peer),
        roster.names().to_vec(),
        draw.blue.clone(),
        draw.red.clone(),
    );
    audit::append_detached(state.audit.clone(), record);

    Ok(Json(DrawResponse {
        draw_id,
        team_blue: draw.blue,
        team_red: draw.red,
    }))
}

/// POST /log-result - External notification channel for draw results.
///
/// Unlike the fire-and-forget path inside draw creation, this endpoint
/// reports the recording outcome: a sink fault answers 500 without any
/// further effect.
async fn log_result(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<LogResultRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let record = DrawRecord::now(
        client_address(&headers, peer),
        request.players,
        request.team_blue,
        request.team_red,
    );

    let audit = state.audit.clone();
    match tokio::task::spawn_blocking(move || audit.append(&record)).await {
        Ok(Ok(())) => Ok(Json(StatusResponse::success())),
        Ok(Err(err)) => {
            warn!(error = %err, "failed to log draw result");
            Err(server_fault("Failed to log result"))
        }
        Err(err) => {
            warn!(error = %err, "log task did not complete");
            Err(server_fault("Failed to log result"))
        }
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// GET /preferences - Current saved form state.
async fn get_preferences(State(state): State<Arc<AppState>>) -> Json<Preferences> {
    Json(state.prefs.get())
}

/// PUT /preferences - Persist new form state and echo it back.
async fn put_preferences(
    State(state): State<Arc<AppState>>,
    Json(prefs): Json<Preferences>,
) -> Result<Json<Preferences>, ApiError> {
    state.prefs.set(prefs.clone()).map_err(|err| {
        warn!(error = %err, "failed to save preferences");
        server_fault("Failed to save preferences")
    })?;
    Ok(Json(prefs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state() -> (Arc<AppState>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path().join("logs")).unwrap();
        let prefs = PrefStore::open(dir.path().join("preferences.json"));
        (Arc::new(AppState::new(audit, prefs)), dir)
    }

    fn with_peer(mut request: Request<Body>) -> Request<Body> {
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4242))));
        request
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        with_peer(request)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_up() {
        let (state, _dir) = test_state();
        let response = router(state).oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "UP");
    }

    #[tokio::test]
    async fn demo_data_round_trips_through_the_draw_endpoint() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(get_request("/demo-data/SMALL"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let demo = body_json(response).await;

        let response = app
            .oneshot(json_request(Method::POST, "/team-draws", demo))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["teamBlue"].as_array().unwrap().len(), 2);
        assert_eq!(body["teamRed"].as_array().unwrap().len(), 2);
        assert!(body["drawId"].is_string());
    }

    #[tokio::test]
    async fn unknown_demo_set_is_not_found() {
        let (state, _dir) = test_state();
        let response = router(state)
            .oneshot(get_request("/demo-data/bogus"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_names_are_a_bad_request() {
        let (state, _dir) = test_state();
        let body = serde_json::json!({
            "players": ["Alice", "Alice", "Bob", "Carol"],
            "teamSize": 2
        });

        let response = router(state)
            .oneshot(json_request(Method::POST, "/team-draws", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("Alice"));
        assert!(message.contains("1, 2"));
    }

    #[tokio::test]
    async fn conflicting_rules_are_a_conflict() {
        let (state, _dir) = test_state();
        let body = serde_json::json!({
            "players": ["Alice", "Bob", "Carol", "Dave"],
            "teamSize": 2,
            "sameTeam": [{"p1": "Alice", "p2": "Bob"}],
            "diffTeam": [{"p1": "Alice", "p2": "Bob"}],
            "maxAttempts": 200
        });

        let response = router(state)
            .oneshot(json_request(Method::POST, "/team-draws", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn log_result_appends_to_the_usage_log() {
        let (state, _dir) = test_state();
        let log_path = state.audit.path().to_path_buf();
        let body = serde_json::json!({
            "players": ["Amy", "Beth", "Carl", "Dan"],
            "teamBlue": ["Amy", "Carl"],
            "teamRed": ["Beth", "Dan"]
        });

        let mut request = json_request(Method::POST, "/log-result", body);
        request
            .headers_mut()
            .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());

        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");

        let contents = fs::read_to_string(log_path).unwrap();
        assert!(contents.contains("IP: 203.0.113.7"));
        assert!(contents.contains(r#"Input Players: ["Amy","Beth","Carl","Dan"]"#));
    }

    #[tokio::test]
    async fn preferences_default_then_round_trip() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(get_request("/preferences"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["teamSize"], 5);

        let saved = serde_json::json!({
            "teamSize": 2,
            "players": ["Amy", "Beth", "Carl", "Dan"],
            "sameTeam": [{"p1": "Amy", "p2": "Beth"}],
            "diffTeam": []
        });
        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, "/preferences", saved.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/preferences")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["teamSize"], 2);
        assert_eq!(body["players"][0], "Amy");
        assert_eq!(body["sameTeam"][0]["p2"], "Beth");
    }

    #[test]
    fn forwarded_address_wins_over_the_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        let peer = SocketAddr::from(([127, 0, 0, 1], 4242));

        assert_eq!(client_address(&headers, peer), "203.0.113.7");
        assert_eq!(client_address(&HeaderMap::new(), peer), "127.0.0.1");
    }
}
