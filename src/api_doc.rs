use utoipa::OpenApi;

// Import models for OpenAPI schema
use crate::domains::auth::models::*;
use crate::domains::ingredient::models::*;
use crate::domains::recipe::models::*;
use crate::shared::errors::ErrorResponse;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::domains::auth::handlers::auth_handler::register,
        crate::domains::auth::handlers::auth_handler::verify_email,
        crate::domains::auth::handlers::auth_handler::new_email_token,
        crate::domains::auth::handlers::auth_handler::login,
        crate::domains::auth::handlers::auth_handler::logout,
        crate::domains::auth::handlers::auth_handler::forget_password,
        crate::domains::auth::handlers::auth_handler::reset_password,
        crate::domains::auth::handlers::auth_handler::refresh_token,
        crate::domains::recipe::handlers::recipe_handler::generate_recipe,
        crate::domains::recipe::handlers::recipe_handler::save_recipe,
        crate::domains::recipe::handlers::recipe_handler::get_recipe,
        crate::domains::recipe::handlers::recipe_handler::list_recipes,
        crate::domains::ingredient::handlers::ingredient_handler::list_ingredients
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        SigninRequest,
        SigninResponse,
        ForgetPasswordRequest,
        ResetPasswordRequest,
        MessageResponse,
        UserResponse,
        ErrorResponse,
        Measure,
        DishType,
        RecipeIngredient,
        GenerateRecipeRequest,
        GenerateRecipeResponse,
        GeneratedRecipe,
        StoredRecipe,
        StoredRecipeIngredient,
        RecipeListResponse,
        Ingredient,
        IngredientListResponse
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Registration, email verification, login and token refresh"),
        (name = "Recipe", description = "AI recipe generation, caching and saved recipes"),
        (name = "Ingredient", description = "Ingredient catalogue")
    ),
    info(
        title = "Recipe Server",
        description = "API server for AI-assisted recipe generation",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
