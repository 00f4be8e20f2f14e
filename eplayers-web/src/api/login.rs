//! Login gate
//!
//! Credentials are compared in plaintext against the player file. A match
//! stores the player's name in the session; a miss leaves a flash message for
//! the login page.

use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::session::{Session, USER_NAME_KEY};
use crate::{views, ApiResult, AppState};

/// Flash message shown after a rejected login
pub const LOGIN_FAILED_MESSAGE: &str = "Dados incorretos, tente novamente...";

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Senha", default)]
    pub password: String,
}

/// GET /Login
pub async fn login_page(Extension(session): Extension<Session>) -> Html<String> {
    let flash = session.take_flash().await;
    Html(views::login_page(flash.as_deref()))
}

/// POST /Login/Logar
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Redirect> {
    let players = state.players.read_all().await?;

    match players
        .iter()
        .find(|p| p.matches_credentials(&form.email, &form.password))
    {
        Some(player) => {
            session.insert(USER_NAME_KEY, player.name.clone()).await;
            info!("Player {} logged in", player.id);
            Ok(Redirect::to("/"))
        }
        None => {
            warn!("Rejected login for {:?}", form.email);
            session.set_flash(LOGIN_FAILED_MESSAGE).await;
            Ok(Redirect::to("/Login"))
        }
    }
}

/// GET /Login/Logout
pub async fn logout(Extension(session): Extension<Session>) -> Redirect {
    if let Some(name) = session.remove(USER_NAME_KEY).await {
        info!("{} logged out", name);
    }
    Redirect::to("/")
}

pub fn login_routes() -> Router<AppState> {
    Router::new()
        .route("/Login", get(login_page))
        .route("/Login/Logar", post(login))
        .route("/Login/Logout", get(logout))
}
