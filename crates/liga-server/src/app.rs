use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use liga_core::LigaConfig;
use liga_live::{Notifier, Registry};
use liga_store::LeagueStore;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::http::{games, health, leaders, live, players, standings, stats, teams, tournaments};

/// Central shared state, passed as `Arc<AppState>` to all handlers.
pub struct AppState {
    pub config: LigaConfig,
    pub store: LeagueStore,
    /// Open live streams. Created here, torn down by the binary on shutdown.
    pub registry: Arc<Registry>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(config: LigaConfig, store: LeagueStore) -> Self {
        let registry = Arc::new(Registry::from_config(&config.live));
        let notifier = Notifier::new(Arc::clone(&registry));
        Self {
            config,
            store,
            registry,
            notifier,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // live updates
        .route("/api/live", get(live::subscribe))
        .route("/api/live/status", get(live::status))
        .route("/api/live/refresh", post(live::refresh))
        // tournaments
        .route(
            "/api/tournaments",
            get(tournaments::list).post(tournaments::create),
        )
        .route("/api/tournaments/current", get(tournaments::current))
        .route(
            "/api/tournaments/{id}",
            get(tournaments::get_one)
                .put(tournaments::update)
                .delete(tournaments::delete),
        )
        .route("/api/tournaments/{id}/activate", post(tournaments::activate))
        // teams
        .route("/api/teams", get(teams::list).post(teams::create))
        .route(
            "/api/teams/{id}",
            get(teams::get_one).put(teams::update).delete(teams::delete),
        )
        .route("/api/teams/{id}/players", get(teams::roster))
        // players
        .route("/api/players", get(players::list).post(players::create))
        .route(
            "/api/players/{id}",
            get(players::get_one)
                .put(players::update)
                .delete(players::delete),
        )
        .route("/api/players/{id}/stats", get(players::stats))
        // games
        .route("/api/games", get(games::list).post(games::create))
        .route(
            "/api/games/{id}",
            get(games::get_one).put(games::update).delete(games::delete),
        )
        // stat lines
        .route("/api/stats/{kind}", get(stats::list).put(stats::upsert))
        .route("/api/stats/{kind}/{jugador_id}", axum::routing::delete(stats::delete))
        // derived tables
        .route("/api/standings", get(standings::standings))
        .route("/api/leaders/{category}", get(leaders::leaders))
        .route("/health", get(health::health_handler))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            crate::auth::require_admin,
        ));

    let mut router = api.with_state(Arc::clone(&state));

    if let Some(dir) = &state.config.server.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }
    if state.config.server.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }

    router.layer(TraceLayer::new_for_http())
}
