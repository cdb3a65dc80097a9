use axum::{extract::State, Json};

use crate::domains::ingredient::models::IngredientListResponse;
use crate::shared::errors::{AppError, ErrorResponse};
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

// 재료 목록 조회
#[utoipa::path(
    get,
    path = "/api/v1/ingredient",
    responses(
        (status = 200, description = "Known ingredients", body = IngredientListResponse),
        (status = 401, description = "Invalid access token", body = ErrorResponse)
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Ingredient"
)]
pub async fn list_ingredients(
    State(app_state): State<AppState>,
    _authenticated_user: AuthenticatedUser,
) -> Result<Json<IngredientListResponse>, AppError> {
    let ingredients = app_state
        .ingredient_state
        .ingredient_service
        .list()
        .await?;

    Ok(Json(ingredients))
}
