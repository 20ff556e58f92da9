use serde::Deserialize;
use std::sync::Arc;

use crate::models::NutritionRecord;
use crate::services::{Database, RecognitionService};

/// `POST /api/recognize-food` body
#[derive(Debug, Deserialize)]
pub struct RecognizeFoodRequest {
    pub food_name: Option<String>,
    pub quantity: Option<String>,
}

/// `POST /api/recognize-food-image` body
#[derive(Debug, Deserialize)]
pub struct RecognizeImageRequest {
    pub image_data: Option<String>,
}

/// `POST /api/log-food` body
#[derive(Debug, Deserialize)]
pub struct LogFoodRequest {
    pub food_name: Option<String>,
    pub quantity: Option<String>,
    pub nutrition_data: Option<NutritionRecord>,
}

/// Treats missing and blank strings the same way.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct AppState {
    pub recognition: Arc<RecognitionService>,
    pub db: Arc<Database>,
}

pub mod server {
    use super::*;
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use tower_http::{cors::CorsLayer, services::ServeDir};

    use crate::models::default_quantity;

    pub fn create_router(state: Arc<AppState>, static_dir: Option<&str>) -> Router {
        let router = Router::new()
            .route("/api/recognize-food", post(recognize_food))
            .route("/api/recognize-food-image", post(recognize_food_image))
            .route("/api/log-food", post(log_food))
            .route("/api/food-history", get(food_history))
            .route("/health", get(health_check))
            .with_state(state)
            .layer(CorsLayer::permissive());

        match static_dir {
            Some(dir) => {
                log::info!("📁 Serving frontend from {}", dir);
                router.fallback_service(ServeDir::new(dir))
            }
            None => router,
        }
    }

    fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
        (status, Json(json!({ "error": message.into() }))).into_response()
    }

    async fn recognize_food(
        State(state): State<Arc<AppState>>,
        Json(request): Json<RecognizeFoodRequest>,
    ) -> Response {
        let food_name = match non_blank(request.food_name) {
            Some(name) => name,
            None => return error_response(StatusCode::BAD_REQUEST, "No food name provided"),
        };
        let quantity = non_blank(request.quantity).unwrap_or_else(default_quantity);

        match state
            .recognition
            .recognize_text(&food_name, &quantity)
            .await
            .into_record()
        {
            Some(record) => (StatusCode::OK, Json(record)).into_response(),
            None => error_response(StatusCode::NOT_FOUND, "Could not get nutrition information"),
        }
    }

    async fn recognize_food_image(
        State(state): State<Arc<AppState>>,
        Json(request): Json<RecognizeImageRequest>,
    ) -> Response {
        let image_data = match non_blank(request.image_data) {
            Some(data) => data,
            None => return error_response(StatusCode::BAD_REQUEST, "No image data provided"),
        };

        let result = state.recognition.recognize_image(&image_data).await;

        let status = if result.success {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(result)).into_response()
    }

    async fn log_food(
        State(state): State<Arc<AppState>>,
        Json(request): Json<LogFoodRequest>,
    ) -> Response {
        let (food_name, nutrition) = match (non_blank(request.food_name), request.nutrition_data) {
            (Some(name), Some(nutrition)) => (name, nutrition),
            _ => return error_response(StatusCode::BAD_REQUEST, "Missing required data"),
        };
        let quantity = non_blank(request.quantity).unwrap_or_else(default_quantity);

        match state.db.add_food_entry(&food_name, &quantity, &nutrition).await {
            Ok(_) => (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": format!("{} logged successfully", food_name)
                })),
            )
                .into_response(),
            Err(e) => {
                log::error!("❌ Failed to log food entry: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }

    async fn food_history(State(state): State<Arc<AppState>>) -> Response {
        match state.db.get_food_history().await {
            Ok(history) => (StatusCode::OK, Json(history)).into_response(),
            Err(e) => {
                log::error!("❌ Failed to get food history: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }

    async fn health_check() -> &'static str {
        "OK"
    }
}
