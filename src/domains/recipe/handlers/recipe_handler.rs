use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::domains::auth::models::MessageResponse;
use crate::domains::recipe::models::{
    GenerateRecipeRequest, GenerateRecipeResponse, RecipeListResponse, RecipeLookup,
};
use crate::shared::errors::{AppError, ErrorResponse};
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

// 레시피 생성 핸들러
#[utoipa::path(
    post,
    path = "/api/v1/recipe/generate",
    request_body = GenerateRecipeRequest,
    responses(
        (status = 200, description = "Recipe generated and cached", body = GenerateRecipeResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid access token", body = ErrorResponse),
        (status = 429, description = "Daily generation limit reached", body = ErrorResponse),
        (status = 500, description = "AI collaborator failure", body = ErrorResponse)
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Recipe"
)]
pub async fn generate_recipe(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    WithRejection(Json(request), _): WithRejection<Json<GenerateRecipeRequest>, AppError>,
) -> Result<Json<GenerateRecipeResponse>, AppError> {
    let response = app_state
        .recipe_state
        .recipe_service
        .generate(authenticated_user.user_id, request)
        .await?;

    Ok(Json(response))
}

// 캐시된 레시피 저장
#[utoipa::path(
    post,
    path = "/api/v1/recipe/save/{recipeKey}",
    params(
        ("recipeKey" = String, Path, description = "Cache key returned by generate")
    ),
    responses(
        (status = 200, description = "Recipe saved", body = MessageResponse),
        (status = 404, description = "Recipe not found in cache", body = ErrorResponse),
        (status = 409, description = "Recipe already saved", body = ErrorResponse)
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Recipe"
)]
pub async fn save_recipe(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(recipe_key): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .recipe_state
        .recipe_service
        .save(authenticated_user.user_id, &recipe_key)
        .await?;

    Ok(Json(MessageResponse::new("Recipe saved successfully")))
}

// 단건 조회 (캐시 -> DB)
#[utoipa::path(
    get,
    path = "/api/v1/recipe/{recipeKey}",
    params(
        ("recipeKey" = String, Path, description = "Recipe slug")
    ),
    responses(
        (status = 200, description = "Cached recipe (GeneratedRecipe) or saved recipe (StoredRecipe)"),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Recipe"
)]
pub async fn get_recipe(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(recipe_key): Path<String>,
) -> Result<Json<RecipeLookup>, AppError> {
    let recipe = app_state
        .recipe_state
        .recipe_service
        .fetch(authenticated_user.user_id, &recipe_key)
        .await?;

    Ok(Json(recipe))
}

// 저장된 레시피 목록
#[utoipa::path(
    get,
    path = "/api/v1/recipe",
    responses(
        (status = 200, description = "Saved recipes of the user", body = RecipeListResponse),
        (status = 401, description = "Invalid access token", body = ErrorResponse)
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Recipe"
)]
pub async fn list_recipes(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<RecipeListResponse>, AppError> {
    let recipes = app_state
        .recipe_state
        .recipe_service
        .list(authenticated_user.user_id)
        .await?;

    Ok(Json(recipes))
}
