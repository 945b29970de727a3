//! Server-rendered pages proxying the remote posts collection.
//!
//! Handlers never fail: every outcome is reported through flash messages and
//! ends on a rendered page or a redirect to one.

use axum::{
    Form,
    extract::{
        Path, State,
        rejection::{FormRejection, PathRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::debug;

use super::AppState;
use crate::models::{FormErrors, PostForm};
use crate::services::{CreateOutcome, UpdateOutcome};
use crate::web::{Flashes, SessionCsrf, delete_scope, flash, views};

const LIST_PATH: &str = "/external/posts/";

#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(rename = "_token", default)]
    pub token: String,
}

fn show_path(id: i64) -> String {
    format!("/external/posts/{id}")
}

async fn redirect_with(session: &Session, flashes: Flashes, to: &str) -> Response {
    flash::stash(session, flashes).await;
    Redirect::to(to).into_response()
}

/// Resolves the `{id}` segment, or the redirect to the list when it is not a
/// post id.
async fn post_id(
    session: &Session,
    path: Result<Path<i64>, PathRejection>,
) -> Result<i64, Response> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!("Rejected post id: {}", rejection);
            let mut flashes = Flashes::new();
            flashes.error("Invalid post id.");
            Err(redirect_with(session, flashes, LIST_PATH).await)
        }
    }
}

/// An unreadable form body is handled like an empty submission.
fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Rejected form body: {}", rejection);
            T::default()
        }
    }
}

async fn delete_token(session: &Session, id: i64) -> String {
    SessionCsrf::new(session.clone())
        .issue(&delete_scope(id))
        .await
}

/// `GET /external/posts/`
pub async fn index(State(state): State<Arc<AppState>>, session: Session) -> Html<String> {
    let mut flashes = Flashes::new();

    let slow_result = state.slow_task().result(&mut flashes).await;
    let posts = state.post_service().list(&mut flashes).await;
    flashes.warning(format!("Slow task result: {slow_result}"));

    let messages = flash::take(&session, flashes).await;
    Html(views::render_posts_index(&posts, &messages))
}

/// `GET /external/posts/{id}`
pub async fn show(
    State(state): State<Arc<AppState>>,
    session: Session,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match post_id(&session, path).await {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };
    let mut flashes = Flashes::new();

    let Some(post) = state.post_service().get(id, &mut flashes).await else {
        return redirect_with(&session, flashes, LIST_PATH).await;
    };

    let token = delete_token(&session, id).await;
    let messages = flash::take(&session, flashes).await;
    Html(views::render_post_show(id, &post, &token, &messages)).into_response()
}

/// `GET /external/posts/new`
pub async fn new_form(session: Session) -> Html<String> {
    let messages = flash::take(&session, Flashes::new()).await;
    Html(views::render_post_new(
        &PostForm::default(),
        &FormErrors::default(),
        &messages,
    ))
}

/// `POST /external/posts/new`
pub async fn create(
    State(state): State<Arc<AppState>>,
    session: Session,
    form: Result<Form<PostForm>, FormRejection>,
) -> Response {
    let mut flashes = Flashes::new();
    let form = form_or_default(form);

    match state.post_service().create(form, &mut flashes).await {
        CreateOutcome::Created { id } => redirect_with(&session, flashes, &show_path(id)).await,
        CreateOutcome::Invalid { form, errors } => {
            let messages = flash::take(&session, flashes).await;
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::render_post_new(&form, &errors, &messages)),
            )
                .into_response()
        }
        CreateOutcome::Failed { form } => {
            let messages = flash::take(&session, flashes).await;
            Html(views::render_post_new(
                &form,
                &FormErrors::default(),
                &messages,
            ))
            .into_response()
        }
    }
}

/// `GET /external/posts/{id}/edit`
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match post_id(&session, path).await {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };
    let mut flashes = Flashes::new();

    let Some(post) = state.post_service().load_for_edit(id, &mut flashes).await else {
        return redirect_with(&session, flashes, LIST_PATH).await;
    };

    let token = delete_token(&session, id).await;
    let messages = flash::take(&session, flashes).await;
    Html(views::render_post_edit(
        id,
        &PostForm::from_post(&post),
        &FormErrors::default(),
        &token,
        &messages,
    ))
    .into_response()
}

/// `POST /external/posts/{id}/edit`
pub async fn update(
    State(state): State<Arc<AppState>>,
    session: Session,
    path: Result<Path<i64>, PathRejection>,
    form: Result<Form<PostForm>, FormRejection>,
) -> Response {
    let id = match post_id(&session, path).await {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };
    let mut flashes = Flashes::new();
    let service = state.post_service();
    let form = form_or_default(form);

    let Some(current) = service.load_for_edit(id, &mut flashes).await else {
        return redirect_with(&session, flashes, LIST_PATH).await;
    };

    let (status, form, errors) = match service.update(&current, form, &mut flashes).await {
        UpdateOutcome::Updated => {
            return redirect_with(&session, flashes, &show_path(id)).await;
        }
        UpdateOutcome::Invalid { form, errors } => {
            (StatusCode::UNPROCESSABLE_ENTITY, form, errors)
        }
        UpdateOutcome::Failed { form } => (StatusCode::OK, form, FormErrors::default()),
    };

    let token = delete_token(&session, id).await;
    let messages = flash::take(&session, flashes).await;
    (
        status,
        Html(views::render_post_edit(id, &form, &errors, &token, &messages)),
    )
        .into_response()
}

/// `POST /external/posts/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    path: Result<Path<i64>, PathRejection>,
    form: Result<Form<DeleteForm>, FormRejection>,
) -> Response {
    let id = match post_id(&session, path).await {
        Ok(id) => id,
        Err(redirect) => return redirect,
    };
    let form = form_or_default(form);
    let mut flashes = Flashes::new();
    let csrf = SessionCsrf::new(session.clone());

    state
        .post_service()
        .delete(id, &form.token, &csrf, &mut flashes)
        .await;

    redirect_with(&session, flashes, LIST_PATH).await
}
