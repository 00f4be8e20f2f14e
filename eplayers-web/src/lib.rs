//! eplayers-web library - team/player roster service
//!
//! Routes, session handling and page rendering over the file-backed team and
//! player stores from `eplayers-common`.

use axum::{extract::DefaultBodyLimit, middleware, Router};
use chrono::{DateTime, Utc};
use eplayers_common::config::Layout;
use eplayers_common::{Player, RecordStore, Team};
use std::time::Duration;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod upload;
pub mod views;

pub use crate::error::{ApiError, ApiResult};

use crate::session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Team records (`Database/equipe.csv`)
    pub teams: RecordStore<Team>,
    /// Player records (`Database/Jogador.csv`)
    pub players: RecordStore<Player>,
    pub sessions: SessionStore,
    pub layout: Layout,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Open both record stores under `layout`, creating missing folders and files
    pub async fn open(layout: Layout, session_idle: Duration) -> eplayers_common::Result<Self> {
        let teams = RecordStore::open(layout.team_file()).await?;
        let players = RecordStore::open(layout.player_file()).await?;
        tokio::fs::create_dir_all(layout.team_image_dir()).await?;

        info!("Team file: {}", teams.path().display());
        info!("Player file: {}", players.path().display());

        Ok(Self {
            teams,
            players,
            sessions: SessionStore::new(session_idle),
            layout,
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
///
/// Page routes run behind the session middleware; `/health` and `/img` do not.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .merge(api::home_routes())
        .merge(api::login_routes())
        .merge(api::team_routes())
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            session::session_middleware,
        ));

    Router::new()
        .merge(pages)
        .merge(api::health_routes())
        .nest_service("/img", ServeDir::new(state.layout.image_dir()))
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
