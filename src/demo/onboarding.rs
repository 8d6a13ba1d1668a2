//! Onboarding workflow demo.
//!
//! A linear wizard (`profile → business → documents → review → complete`)
//! whose state lives in the injected [`SessionStore`]. Demo scaffolding only:
//! concurrent writers to one session race and the last write wins.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::demo::store::{SessionStore, StoreError};
use crate::http::error::ApiError;
use crate::http::request::read_body;
use crate::http::server::AppState;
use crate::validation::validate_body;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Profile,
    Business,
    Documents,
    Review,
    Complete,
}

impl OnboardingStep {
    pub fn next(self) -> Self {
        match self {
            OnboardingStep::Profile => OnboardingStep::Business,
            OnboardingStep::Business => OnboardingStep::Documents,
            OnboardingStep::Documents => OnboardingStep::Review,
            OnboardingStep::Review | OnboardingStep::Complete => OnboardingStep::Complete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStep::Profile => "profile",
            OnboardingStep::Business => "business",
            OnboardingStep::Documents => "documents",
            OnboardingStep::Review => "review",
            OnboardingStep::Complete => "complete",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("onboarding is already complete")]
    AlreadyComplete,

    #[error("expected step '{expected}', got '{submitted}'")]
    OutOfOrder { expected: &'static str, submitted: &'static str },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSession {
    pub id: Uuid,
    pub current_step: OnboardingStep,
    pub completed_steps: Vec<OnboardingStep>,
    /// Submitted data keyed by step name.
    pub data: Map<String, Value>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl OnboardingSession {
    pub fn new() -> Self {
        let now = unix_now();
        Self {
            id: Uuid::new_v4(),
            current_step: OnboardingStep::Profile,
            completed_steps: Vec::new(),
            data: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record `step` and move to the next one. Steps must be submitted in order.
    pub fn advance(&mut self, step: OnboardingStep, data: Map<String, Value>) -> Result<(), StepError> {
        if self.current_step == OnboardingStep::Complete {
            return Err(StepError::AlreadyComplete);
        }
        if step != self.current_step {
            return Err(StepError::OutOfOrder {
                expected: self.current_step.as_str(),
                submitted: step.as_str(),
            });
        }

        self.data.insert(step.as_str().to_string(), Value::Object(data));
        self.completed_steps.push(step);
        self.current_step = step.next();
        self.updated_at = unix_now();
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.current_step == OnboardingStep::Complete
    }
}

impl Default for OnboardingSession {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Body of `PUT /api/demo/onboarding/{session_id}`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct StepUpdate {
    #[validate(required(message = "Step is required."))]
    pub step: Option<OnboardingStep>,

    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

fn store_key(id: &Uuid) -> String {
    format!("onboarding:{}", id)
}

/// Ids that do not decode or parse cannot name a session.
fn session_id(path: Result<Path<String>, PathRejection>) -> Result<Uuid, ApiError> {
    let Path(raw) = path.map_err(|_| ApiError::NotFound)?;
    Uuid::parse_str(&raw).map_err(|_| ApiError::NotFound)
}

fn store_failure(e: StoreError) -> ApiError {
    match e {
        StoreError::Full { .. } => ApiError::ServiceUnavailable,
    }
}

async fn load(store: &dyn SessionStore, id: &Uuid) -> Result<OnboardingSession, ApiError> {
    let value = store
        .get(&store_key(id))
        .await
        .map_err(store_failure)?
        .ok_or(ApiError::NotFound)?;

    serde_json::from_value(value).map_err(|e| {
        tracing::error!(error = %e, session_id = %id, "Stored onboarding session is corrupt");
        ApiError::Internal
    })
}

async fn save(store: &dyn SessionStore, session: &OnboardingSession) -> Result<(), ApiError> {
    let value = serde_json::to_value(session).map_err(|_| ApiError::Internal)?;
    store
        .set(&store_key(&session.id), value)
        .await
        .map_err(store_failure)
}

pub async fn create_session(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let session = OnboardingSession::new();
    save(state.sessions.as_ref(), &session).await?;
    tracing::info!(session_id = %session.id, "Onboarding session started");
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_session(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<OnboardingSession>, ApiError> {
    let id = session_id(path)?;
    load(state.sessions.as_ref(), &id).await.map(Json)
}

pub async fn advance_session(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Body,
) -> Result<Json<OnboardingSession>, ApiError> {
    let id = session_id(path)?;
    let mut session = load(state.sessions.as_ref(), &id).await?;

    let bytes = read_body(body, state.config.security.max_body_size).await?;
    let update: StepUpdate = validate_body(&bytes).map_err(ApiError::Validation)?;
    let Some(step) = update.step else {
        return Err(ApiError::Internal);
    };
    session
        .advance(step, update.data.unwrap_or_default())
        .map_err(|e| ApiError::Conflict(e.to_string()))?;
    save(state.sessions.as_ref(), &session).await?;

    tracing::debug!(session_id = %session.id, step = step.as_str(), "Onboarding step recorded");
    Ok(Json(session))
}

pub async fn delete_session(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = session_id(path)?;
    let removed = state
        .sessions
        .delete(&store_key(&id))
        .await
        .map_err(store_failure)?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Demo routes, mounted only when `demo.onboarding_enabled` is set.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/demo/onboarding", post(create_session))
        .route(
            "/api/demo/onboarding/{session_id}",
            axum::routing::get(get_session)
                .put(advance_session)
                .delete(delete_session),
        )
}
