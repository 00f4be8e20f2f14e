//! Home and privacy pages

use axum::{http::Uri, response::Html, routing::get, Extension, Router};

use crate::session::{Session, USER_NAME_KEY};
use crate::{views, ApiError, AppState};

/// GET /
///
/// Shows the logged-in player's name, if any
pub async fn index(Extension(session): Extension<Session>) -> Html<String> {
    let user_name = session.get(USER_NAME_KEY).await;
    Html(views::home_page(user_name.as_deref()))
}

/// GET /Privacy
pub async fn privacy(Extension(session): Extension<Session>) -> Html<String> {
    let user_name = session.get(USER_NAME_KEY).await;
    Html(views::privacy_page(user_name.as_deref()))
}

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

pub fn home_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/Privacy", get(privacy))
}
