//! Team controller
//!
//! List, create (with optional image upload) and delete teams. The store
//! supports update but no route exposes it.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Extension, Router,
};
use eplayers_common::{row, Team};
use tracing::info;

use crate::session::{Session, USER_NAME_KEY};
use crate::{upload, views, ApiError, ApiResult, AppState};

/// Fields collected from the create form
#[derive(Debug, Default)]
struct TeamForm {
    id: Option<String>,
    name: Option<String>,
    image: Option<(String, Bytes)>,
}

impl TeamForm {
    async fn from_multipart(multipart: &mut Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let field_name = field.name().unwrap_or_default().to_string();

            // File parts: an empty filename means no file was chosen
            if let Some(file_name) = field.file_name().map(str::to_string) {
                let data = field.bytes().await.map_err(bad_multipart)?;
                if form.image.is_none() && !file_name.is_empty() {
                    form.image = Some((file_name, data));
                }
                continue;
            }

            let value = field.text().await.map_err(bad_multipart)?;
            match field_name.as_str() {
                "IdEquipe" => form.id = Some(value),
                "Nome" => form.name = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Invalid form data: {}", e))
}

/// GET /Equipe
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Html<String>> {
    let teams = state.teams.read_all().await?;
    let user_name = session.get(USER_NAME_KEY).await;
    Ok(Html(views::teams_page(&teams, user_name.as_deref())))
}

/// POST /Equipe/Cadastrar
pub async fn create_team(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Redirect> {
    let form = TeamForm::from_multipart(&mut multipart).await?;

    let raw_id = form.id.unwrap_or_default();
    let id: i32 = raw_id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("IdEquipe is not an integer: {:?}", raw_id)))?;

    let mut team = Team::new(id, form.name.unwrap_or_default(), Team::DEFAULT_IMAGE);
    if let Some((file_name, _)) = &form.image {
        team.image = upload::sanitize_filename(file_name)
            .ok_or_else(|| {
                ApiError::BadRequest(format!("Invalid upload filename: {:?}", file_name))
            })?
            .to_string();
    }

    // Reject unstorable values before anything touches the disk
    row::validate_record(&team)?;

    if let Some((_, data)) = &form.image {
        upload::save_image(&state.layout.team_image_dir(), &team.image, data).await?;
    }

    state.teams.create(&team).await?;
    info!("Created team {} ({})", team.id, team.name);

    Ok(Redirect::to("/Equipe"))
}

/// GET /Equipe/:id
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Redirect> {
    let removed = state.teams.delete(id).await?;
    info!("Deleted team {} ({} row(s))", id, removed);
    Ok(Redirect::to("/Equipe"))
}

pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/Equipe", get(list_teams))
        .route("/Equipe/Cadastrar", post(create_team))
        .route("/Equipe/:id", get(delete_team))
}
