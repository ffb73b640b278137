//! # HTTP API
//!
//! axum router for the form and the JSON API.
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/` | GET | Input form |
//! | `/predict` | POST (form) | Form with prediction results |
//! | `/api/predict` | POST (JSON) | Prediction as JSON |
//! | `/api/model` | GET | Model info and feature order |
//! | `/health` | GET | Liveness |
//!
//! The router can only be built from a loaded [`Predictor`], so no page is
//! ever served without artifacts behind it.

use crate::page::{self, ModelPanel, Outcome};
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, Json, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use heartcheck_core::{
    ArtifactError, ClassProbabilities, Diagnosis, FeatureRecord, Prediction, Predictor,
    RawRecord, RiskTier,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

// =============================================================================
// STATE
// =============================================================================

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

impl AppState {
    fn panel(&self) -> ModelPanel<'_> {
        ModelPanel {
            kind: self.predictor.model_kind(),
            info: self.predictor.info(),
        }
    }

    fn predict(&self, record: &FeatureRecord) -> Result<Prediction, ArtifactError> {
        let prediction = self.predictor.predict(record)?;
        debug!(
            diagnosis = prediction.diagnosis.label(),
            risk = %prediction.risk,
            "prediction served"
        );
        Ok(prediction)
    }
}

/// Build the application router.
pub fn router(predictor: Arc<Predictor>) -> Router {
    let state = AppState { predictor };

    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/api/model", get(model_info))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// JSON body of `/api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub diagnosis: Diagnosis,
    pub class: u8,
    pub label: String,
    pub confidence: f64,
    pub risk_level: RiskTier,
    pub probabilities: ClassProbabilities,
    pub recommendation: String,
    pub input: FeatureRecord,
}

impl PredictionResponse {
    fn new(prediction: &Prediction, input: FeatureRecord) -> Self {
        let recommendation = prediction.diagnosis.recommendation();
        Self {
            diagnosis: prediction.diagnosis,
            class: prediction.diagnosis.class(),
            label: prediction.diagnosis.label().to_string(),
            confidence: prediction.confidence,
            risk_level: prediction.risk,
            probabilities: prediction.probabilities,
            recommendation: format!("{}: {}", recommendation.headline, recommendation.advice),
            input,
        }
    }
}

/// JSON body of `/api/model`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub kind: String,
    pub name: Option<String>,
    pub training_samples: Option<u64>,
    pub key_risk_factors: Vec<String>,
    pub feature_names: Vec<String>,
}

/// JSON body of `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by the JSON endpoints.
#[derive(Debug)]
pub enum ApiError {
    /// The request body was rejected (bad JSON, out-of-range field).
    Rejected { status: StatusCode, message: String },
    /// The artifacts could not score a validated record.
    Prediction(ArtifactError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Rejected { status, message } => (status, message),
            Self::Prediction(err) => {
                error!(error = %err, "prediction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(
        &state.panel(),
        &FeatureRecord::default(),
        Outcome::Empty,
    ))
}

async fn predict_form(
    State(state): State<AppState>,
    form: Result<Form<RawRecord>, FormRejection>,
) -> Response {
    let panel = state.panel();
    let raw = match form {
        Ok(Form(raw)) => raw,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "form rejected");
            let message = format!("{} (form reset to defaults)", rejection.body_text());
            return (
                rejection.status(),
                Html(page::render(
                    &panel,
                    &FeatureRecord::default(),
                    Outcome::Rejected(&message),
                )),
            )
                .into_response();
        }
    };

    let record = match FeatureRecord::try_from(raw) {
        Ok(record) => record,
        Err(err) => {
            debug!(reason = %err, "form rejected");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(page::render(
                    &panel,
                    &FeatureRecord::salvage(&raw),
                    Outcome::Rejected(&err.to_string()),
                )),
            )
                .into_response();
        }
    };

    match state.predict(&record) {
        Ok(prediction) => Html(page::render(
            &panel,
            &record,
            Outcome::Predicted(&prediction),
        ))
        .into_response(),
        Err(err) => {
            error!(error = %err, "prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(page::render(
                    &panel,
                    &record,
                    Outcome::Rejected(&err.to_string()),
                )),
            )
                .into_response()
        }
    }
}

async fn predict_json(
    State(state): State<AppState>,
    body: Result<Json<FeatureRecord>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(record) = body?;
    let prediction = state.predict(&record).map_err(ApiError::Prediction)?;
    Ok(Json(PredictionResponse::new(&prediction, record)))
}

async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let info = state.predictor.info();
    Json(ModelInfoResponse {
        kind: state.predictor.model_kind().to_string(),
        name: info.name.clone(),
        training_samples: info.training_samples,
        key_risk_factors: info.key_risk_factors.clone(),
        feature_names: state.predictor.layout().to_strings(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use heartcheck_core::{
        FEATURE_COUNT, FeatureLayout, LogisticRegression, Model, ModelArtifact, ModelInfo,
        StandardScaler,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let artifact = ModelArtifact {
            feature_names: FeatureLayout::canonical().to_strings(),
            model: Model::LogisticRegression(LogisticRegression::new(
                vec![0.0; FEATURE_COUNT],
                1.0,
            )),
            info: ModelInfo::default(),
        };
        let scaler = StandardScaler::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]);
        router(Arc::new(Predictor::new(artifact, scaler).unwrap()))
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn form_post_renders_result() {
        let form = "age=50&sex=1&cp=0&trestbps=120&chol=200&fbs=0&restecg=0\
                    &thalach=150&exang=0&oldpeak=1.0&slope=0&ca=0&thal=1";
        let request = Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Intercept-only model: sigmoid(1) = 0.731.
        let html = body_text(response).await;
        assert!(html.contains("DISEASE RISK"));
        assert!(html.contains("id=\"confidence\">73.1%"));
        assert!(html.contains("id=\"risk-level\">High"));
    }

    #[tokio::test]
    async fn json_rejection_is_json() {
        let request = Request::post("/api/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"age\": 50}"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("\"error\""));
    }
}
