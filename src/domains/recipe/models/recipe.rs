use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// 재료 단위
/// Unit of measure of an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Measure {
    Piece,
    Packet,
    Gram,
    Kilogram,
    Spoon,
    Cup,
}

impl Measure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Measure::Piece => "PIECE",
            Measure::Packet => "PACKET",
            Measure::Gram => "GRAM",
            Measure::Kilogram => "KILOGRAM",
            Measure::Spoon => "SPOON",
            Measure::Cup => "CUP",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PIECE" => Some(Measure::Piece),
            "PACKET" => Some(Measure::Packet),
            "GRAM" => Some(Measure::Gram),
            "KILOGRAM" => Some(Measure::Kilogram),
            "SPOON" => Some(Measure::Spoon),
            "CUP" => Some(Measure::Cup),
            _ => None,
        }
    }
}

/// 요리 종류
/// Dish type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DishType {
    Main,
    Dessert,
    Appetizer,
    Snack,
}

impl fmt::Display for DishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DishType::Main => "MAIN",
            DishType::Dessert => "DESSERT",
            DishType::Appetizer => "APPETIZER",
            DishType::Snack => "SNACK",
        };
        write!(f, "{}", name)
    }
}

/// 재료 + 수량 (요청 / AI 결과 공용)
/// Ingredient with quantity, used both in requests and in generated recipes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecipeIngredient {
    #[validate(length(min = 1, message = "Ingredient name is required"))]
    #[schema(example = "egg")]
    pub name: String,

    #[validate(range(exclusive_min = 0.0, message = "Quantity must be positive"))]
    #[schema(example = 2.0)]
    pub quantity: f64,

    pub measure: Measure,
}

// 레시피 생성 요청 모델
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = GenerateRecipeRequest)]
pub struct GenerateRecipeRequest {
    #[validate(nested)]
    pub ingredients: Vec<RecipeIngredient>,

    /// 자유 입력 옵션 (예: "vegetarian", "no nuts")
    /// Free-text options
    #[schema(example = json!(["quick", "no nuts"]))]
    pub options: Vec<String>,

    /// 요리 국가, "random"이면 임의 국가
    /// Target cuisine; "random" lets the model choose
    #[validate(length(min = 1, message = "Country is required"))]
    #[schema(example = "Italian")]
    pub country: String,

    pub dish_type: DishType,
}

/// AI가 생성한 레시피 (모델 출력은 저장 전에 검증)
/// Recipe as produced by the text-generation collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = GeneratedRecipe)]
pub struct GeneratedRecipe {
    #[validate(custom(function = "validate_not_blank", message = "Recipe name is required"))]
    #[schema(example = "Omelette")]
    pub recipe_name: String,

    #[schema(example = 10)]
    pub time_in_minutes: u32,

    #[validate(custom(function = "validate_steps", message = "Steps must be non-empty"))]
    pub steps: Vec<String>,

    #[validate(length(min = 1, message = "At least one ingredient is required"), nested)]
    pub ingredients: Vec<RecipeIngredient>,

    #[schema(example = "Italian")]
    pub country: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// 단계가 하나 이상이고 빈 단계가 없어야 함
fn validate_steps(steps: &[String]) -> Result<(), ValidationError> {
    if steps.is_empty() || steps.iter().any(|step| step.trim().is_empty()) {
        return Err(ValidationError::new("steps"));
    }
    Ok(())
}

/// 캐시에 저장되는 레시피 (사용자 확인 대기 중)
/// Generated recipe waiting in the cache for the user to save it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRecipe {
    pub recipe: GeneratedRecipe,
    pub user_id: Uuid,
    pub requested_at: DateTime<Utc>,
}

// 레시피 생성 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = GenerateRecipeResponse)]
pub struct GenerateRecipeResponse {
    pub final_result: GeneratedRecipe,

    /// 캐시 키 (저장 시 사용)
    /// Cache key to pass to the save endpoint
    #[schema(example = "omelette")]
    pub recipe_key: String,

    pub today_attempts: u32,

    pub remaining_attempts: u32,
}

/// 저장된 레시피의 재료
/// Ingredient association of a stored recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecipeIngredient {
    #[schema(example = "egg")]
    pub ingredient_slug: String,
    #[schema(example = "egg")]
    pub name: String,
    pub quantity: f64,
    pub measure: Measure,
}

/// 저장된 레시피 (DB)
/// Recipe persisted for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = StoredRecipe)]
pub struct StoredRecipe {
    #[schema(example = "omelette")]
    pub slug: String,
    pub name: String,
    pub country: String,
    pub time_in_minutes: u32,
    pub steps: Vec<String>,
    pub user_id: Uuid,
    pub ingredients: Vec<StoredRecipeIngredient>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 단건 조회 결과 - 캐시 우선, 없으면 DB
/// Single-recipe lookup: cache first, then durable storage
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecipeLookup {
    Cached(GeneratedRecipe),
    Stored(StoredRecipe),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RecipeListResponse)]
pub struct RecipeListResponse {
    pub count: usize,
    pub recipes: Vec<StoredRecipe>,
}
