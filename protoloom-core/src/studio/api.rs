//! HTTP surface of the studio: auth, sessions, chat, preview, units.
//! Handlers are thin; the preview pipeline and the services do the work.
//! Lua execution always goes through `spawn_blocking`.

use crate::auth::{self, Claims};
use crate::cache::SessionCache;
use crate::db::account_service::AccountService;
use crate::db::message_service::{Message, MessageService};
use crate::db::session_service::{Session, SessionService};
use crate::db::unit_service::{Unit, UnitService};
use crate::error::StudioError;
use crate::extract;
use crate::llm::{ChatTurn, GeminiClient};
use crate::preview::{PreviewHub, UnitSnapshot};
use crate::viewport::ViewportPreset;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::io::Write;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;
use zip::write::SimpleFileOptions;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub llm: Arc<GeminiClient>,
    pub hub: Arc<PreviewHub>,
    pub cache: Option<Arc<SessionCache>>,
    pub jwt_secret: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route(
            "/api/sessions/:id",
            axum::routing::patch(rename_session).delete(delete_session),
        )
        .route("/api/sessions/:id/messages", get(list_messages))
        .route("/api/sessions/:id/chat", post(chat))
        .route("/api/sessions/:id/preview", get(preview_document))
        .route("/api/sessions/:id/preview/status", get(preview_status))
        .route("/api/sessions/:id/preview/refresh", post(preview_refresh))
        .route("/api/sessions/:id/preview/viewport", post(preview_viewport))
        .route("/api/sessions/:id/preview/click", post(preview_click))
        .route("/api/units/:id", axum::routing::patch(update_unit))
        .route("/api/units/:id/export", get(export_unit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── DTOs ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct CreateSessionRequest {
    name: Option<String>,
}

#[derive(Deserialize)]
struct RenameSessionRequest {
    name: String,
}

#[derive(Serialize, Deserialize)]
struct SessionDto {
    id: Uuid,
    name: String,
    current_unit_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            name: session.name,
            current_unit_id: session.current_unit_id,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Serialize)]
struct MessageDto {
    id: Uuid,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            role: message.role,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

#[derive(Serialize)]
struct UnitDto {
    id: Uuid,
    session_id: Uuid,
    name: String,
    source_text: String,
    style_text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Unit> for UnitDto {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id,
            session_id: unit.session_id,
            name: unit.name,
            source_text: unit.source_text,
            style_text: unit.style_text,
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        }
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    prompt: String,
}

#[derive(Serialize)]
struct ChatResponse {
    message: String,
    /// None when extraction found no component this turn.
    unit: Option<UnitDto>,
}

#[derive(Deserialize)]
struct ViewportRequest {
    preset: ViewportPreset,
}

#[derive(Deserialize)]
struct ClickRequest {
    handler: u64,
}

#[derive(Deserialize)]
struct UpdateUnitRequest {
    source_text: Option<String>,
    style_text: Option<String>,
}

// ─── Auth helpers ───────────────────────────────────────────────────────────

fn bearer_claims(headers: &HeaderMap, state: &AppState) -> Result<Claims, StudioError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| StudioError::Unauthorized("missing Authorization header".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| StudioError::Unauthorized("expected a Bearer token".to_string()))?;
    auth::validate_token(token, &state.jwt_secret)
        .map_err(|err| StudioError::Unauthorized(err.to_string()))
}

fn claims_account_id(claims: &Claims) -> Result<Uuid, StudioError> {
    claims
        .sub
        .parse()
        .map_err(|_| StudioError::Unauthorized("malformed token subject".to_string()))
}

/// Load a session and check it belongs to the caller.
async fn owned_session(
    state: &AppState,
    claims: &Claims,
    session_id: Uuid,
) -> Result<Session, StudioError> {
    let account_id = claims_account_id(claims)?;
    let session = SessionService::new(state.pool.clone())
        .get(session_id)
        .await?
        .ok_or_else(|| StudioError::NotFound("session not found".to_string()))?;
    if session.account_id != account_id {
        return Err(StudioError::NotFound("session not found".to_string()));
    }
    Ok(session)
}

fn snapshot(unit: &Unit) -> UnitSnapshot {
    UnitSnapshot {
        id: unit.id,
        name: unit.name.clone(),
        source_text: unit.source_text.clone(),
        style_text: unit.style_text.clone(),
    }
}

/// Fire-and-forget render; the outcome surfaces on the next preview fetch.
fn schedule_render(state: &AppState, session_id: Uuid, unit: &Unit) {
    let hub = state.hub.clone();
    let snap = snapshot(unit);
    tokio::task::spawn_blocking(move || hub.render(session_id, snap));
}

/// Load the session's current unit into the pane after a restart.
async fn hydrate_pane(state: &AppState, session: &Session) -> Result<(), StudioError> {
    if !state.hub.needs_hydration(session.id) {
        return Ok(());
    }
    let Some(unit_id) = session.current_unit_id else {
        return Ok(());
    };
    let Some(unit) = UnitService::new(state.pool.clone()).get(unit_id).await? else {
        return Ok(());
    };

    let hub = state.hub.clone();
    let snap = snapshot(&unit);
    let session_id = session.id;
    tokio::task::spawn_blocking(move || hub.render(session_id, snap))
        .await
        .map_err(|err| StudioError::Internal(format!("render task failed: {}", err)))?;
    Ok(())
}

async fn invalidate_session_cache(state: &AppState, account_id: Uuid) {
    if let Some(cache) = &state.cache {
        cache.invalidate(account_id).await;
    }
}

// ─── Auth ───────────────────────────────────────────────────────────────────

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, StudioError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(StudioError::InvalidRequest("invalid email".to_string()));
    }
    if req.password.len() < 8 {
        return Err(StudioError::InvalidRequest(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let accounts = AccountService::new(state.pool.clone());
    if accounts.find_by_email(&email).await?.is_some() {
        return Err(StudioError::InvalidRequest(
            "email already registered".to_string(),
        ));
    }
    let account = accounts.create_account(&email, &req.password).await?;
    log::info!("account created: {}", account.id);

    let token = auth::generate_token(account.id, &account.email, &state.jwt_secret)
        .map_err(|err| StudioError::Internal(err.to_string()))?;
    Ok(Json(TokenResponse { token }))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, StudioError> {
    let email = req.email.trim().to_lowercase();
    let account = AccountService::new(state.pool.clone())
        .verify_credentials(&email, &req.password)
        .await?
        .ok_or_else(|| StudioError::Unauthorized("invalid email or password".to_string()))?;

    let token = auth::generate_token(account.id, &account.email, &state.jwt_secret)
        .map_err(|err| StudioError::Internal(err.to_string()))?;
    Ok(Json(TokenResponse { token }))
}

// ─── Sessions ───────────────────────────────────────────────────────────────

async fn list_sessions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SessionDto>>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let account_id = claims_account_id(&claims)?;

    if let Some(cache) = &state.cache {
        if let Some(cached) = cache.get_session_list(account_id).await {
            if let Ok(sessions) = serde_json::from_str::<Vec<SessionDto>>(&cached) {
                return Ok(Json(sessions));
            }
        }
    }

    let sessions: Vec<SessionDto> = SessionService::new(state.pool.clone())
        .list_for_account(account_id)
        .await?
        .into_iter()
        .map(SessionDto::from)
        .collect();

    if let Some(cache) = &state.cache {
        if let Ok(json) = serde_json::to_string(&sessions) {
            cache.put_session_list(account_id, &json).await;
        }
    }

    Ok(Json(sessions))
}

async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionDto>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let account_id = claims_account_id(&claims)?;
    let name = req.name.unwrap_or_else(|| "New Session".to_string());

    let session = SessionService::new(state.pool.clone())
        .create(account_id, &name)
        .await?;
    invalidate_session_cache(&state, account_id).await;
    Ok(Json(session.into()))
}

async fn rename_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<RenameSessionRequest>,
) -> Result<Json<SessionDto>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let session = owned_session(&state, &claims, session_id).await?;

    let sessions = SessionService::new(state.pool.clone());
    sessions.rename(session_id, &req.name).await?;
    invalidate_session_cache(&state, session.account_id).await;

    let renamed = sessions
        .get(session_id)
        .await?
        .ok_or_else(|| StudioError::NotFound("session not found".to_string()))?;
    Ok(Json(renamed.into()))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let session = owned_session(&state, &claims, session_id).await?;

    SessionService::new(state.pool.clone())
        .delete(session_id)
        .await?;
    state.hub.dispose(session_id);
    invalidate_session_cache(&state, session.account_id).await;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

async fn list_messages(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Vec<MessageDto>>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    owned_session(&state, &claims, session_id).await?;

    let messages = MessageService::new(state.pool.clone())
        .list(session_id)
        .await?
        .into_iter()
        .map(MessageDto::from)
        .collect();
    Ok(Json(messages))
}

// ─── Chat ───────────────────────────────────────────────────────────────────

/// One chat turn: history + prompt to the LLM, the full response blob to
/// the extractor, both message rows persisted, and - when a unit comes
/// out - the unit stored, marked current, and scheduled for render.
/// A transport failure leaves the prior chat and preview state untouched.
async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let session = owned_session(&state, &claims, session_id).await?;

    let prompt = req.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(StudioError::InvalidRequest(
            "prompt must not be empty".to_string(),
        ));
    }

    let message_service = MessageService::new(state.pool.clone());
    let history: Vec<ChatTurn> = message_service
        .list(session_id)
        .await?
        .into_iter()
        .map(|m| ChatTurn {
            role: m.role,
            content: m.content,
        })
        .collect();

    let response_text = state.llm.generate(&history, &prompt).await?;

    message_service.append(session_id, "user", &prompt).await?;
    message_service
        .append(session_id, "assistant", &response_text)
        .await?;

    let unit = match extract::extract_unit(&response_text) {
        Some(extracted) => {
            let unit = UnitService::new(state.pool.clone())
                .create(session_id, &extracted)
                .await?;
            SessionService::new(state.pool.clone())
                .set_current_unit(session_id, Some(unit.id))
                .await?;
            schedule_render(&state, session_id, &unit);
            Some(UnitDto::from(unit))
        }
        None => {
            log::info!("no component extracted for session {}", session_id);
            None
        }
    };

    invalidate_session_cache(&state, session.account_id).await;
    Ok(Json(ChatResponse {
        message: response_text,
        unit,
    }))
}

// ─── Preview ────────────────────────────────────────────────────────────────

async fn preview_document(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Html<String>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let session = owned_session(&state, &claims, session_id).await?;
    hydrate_pane(&state, &session).await?;
    Ok(Html(state.hub.document(session_id)))
}

async fn preview_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<crate::preview::PaneStatus>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    owned_session(&state, &claims, session_id).await?;
    Ok(Json(state.hub.status(session_id)))
}

async fn preview_refresh(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let session = owned_session(&state, &claims, session_id).await?;
    hydrate_pane(&state, &session).await?;

    let hub = state.hub.clone();
    tokio::task::spawn_blocking(move || hub.refresh(session_id));
    Ok(Json(serde_json::json!({ "refreshing": true })))
}

async fn preview_viewport(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<ViewportRequest>,
) -> Result<Json<serde_json::Value>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let session = owned_session(&state, &claims, session_id).await?;
    hydrate_pane(&state, &session).await?;

    let hub = state.hub.clone();
    tokio::task::spawn_blocking(move || hub.set_preset(session_id, req.preset));
    Ok(Json(serde_json::json!({ "viewport": req.preset })))
}

async fn preview_click(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<ClickRequest>,
) -> Result<Html<String>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;
    let session = owned_session(&state, &claims, session_id).await?;
    hydrate_pane(&state, &session).await?;

    let hub = state.hub.clone();
    let outcome = tokio::task::spawn_blocking(move || hub.click(session_id, req.handler))
        .await
        .map_err(|err| StudioError::Internal(format!("click task failed: {}", err)))?;
    outcome.map_err(StudioError::InvalidRequest)?;

    Ok(Html(state.hub.document(session_id)))
}

// ─── Units ──────────────────────────────────────────────────────────────────

async fn update_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateUnitRequest>,
) -> Result<Json<UnitDto>, StudioError> {
    let claims = bearer_claims(&headers, &state)?;

    let units = UnitService::new(state.pool.clone());
    let unit = units
        .get(unit_id)
        .await?
        .ok_or_else(|| StudioError::NotFound("unit not found".to_string()))?;
    let session = owned_session(&state, &claims, unit.session_id).await?;

    if let Some(source) = &req.source_text {
        if source.trim().is_empty() {
            return Err(StudioError::InvalidRequest(
                "source_text must not be empty".to_string(),
            ));
        }
    }

    let patched = units
        .update_texts(unit_id, req.source_text.as_deref(), req.style_text.as_deref())
        .await?
        .ok_or_else(|| StudioError::NotFound("unit not found".to_string()))?;

    // A hand-edit of the current unit re-renders the pane
    if session.current_unit_id == Some(unit_id) {
        schedule_render(&state, session.id, &patched);
    }

    Ok(Json(patched.into()))
}

async fn export_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl axum::response::IntoResponse, StudioError> {
    let claims = bearer_claims(&headers, &state)?;

    let unit = UnitService::new(state.pool.clone())
        .get(unit_id)
        .await?
        .ok_or_else(|| StudioError::NotFound("unit not found".to_string()))?;
    owned_session(&state, &claims, unit.session_id).await?;

    let bytes = build_archive(&unit).map_err(|err| StudioError::Export(err.to_string()))?;

    let disposition = format!("attachment; filename=\"{}.zip\"", unit.name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// The archive carries the unit's current fields verbatim.
fn build_archive(unit: &Unit) -> zip::result::ZipResult<Vec<u8>> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut archive = zip::ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default();

        archive.start_file(format!("{}.luau", unit.name), options)?;
        archive.write_all(unit.source_text.as_bytes())?;

        archive.start_file(format!("{}.css", unit.name.to_lowercase()), options)?;
        archive.write_all(unit.style_text.as_bytes())?;

        archive.start_file("README.md", options)?;
        let readme = format!(
            "# {}\n\nGenerated with Protoloom.\n\n- `{}.luau` - component source\n- `{}.css` - stylesheet\n",
            unit.name,
            unit.name,
            unit.name.to_lowercase()
        );
        archive.write_all(readme.as_bytes())?;

        archive.finish()?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_unit() -> Unit {
        Unit {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            name: "GeneratedComponent".to_string(),
            source_text: "function GeneratedComponent() return h(\"div\", {}, {}) end"
                .to_string(),
            style_text: ".x { color: red; }".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn archive_contains_source_style_and_readme() {
        let bytes = build_archive(&sample_unit()).unwrap();

        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"GeneratedComponent.luau".to_string()));
        assert!(names.contains(&"generatedcomponent.css".to_string()));
        assert!(names.contains(&"README.md".to_string()));

        let mut source = String::new();
        std::io::Read::read_to_string(
            &mut zip.by_name("GeneratedComponent.luau").unwrap(),
            &mut source,
        )
        .unwrap();
        assert!(source.contains("function GeneratedComponent"));
    }
}
