// Recipe domain routes
use axum::{routing::{get, post}, Router};
use crate::domains::recipe::handlers::recipe_handler;
use crate::shared::services::AppState;

/// Create recipe router (모든 경로 인증 필요)
pub fn create_recipe_router() -> Router<AppState> {
    Router::new()
        .route("/", get(recipe_handler::list_recipes))
        .route("/generate", post(recipe_handler::generate_recipe))
        .route("/save/:recipeKey", post(recipe_handler::save_recipe))
        .route("/:recipeKey", get(recipe_handler::get_recipe))
}
