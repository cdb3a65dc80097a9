// Ingredient domain routes
use axum::{routing::get, Router};
use crate::domains::ingredient::handlers::ingredient_handler;
use crate::shared::services::AppState;

pub fn create_ingredient_router() -> Router<AppState> {
    Router::new().route("/", get(ingredient_handler::list_ingredients))
}
