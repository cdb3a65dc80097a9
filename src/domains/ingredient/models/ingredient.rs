use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::utils::slugify;

/// 재료 카탈로그 항목
/// Ingredient catalogue entry. Created the first time a saved recipe uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    #[schema(example = "olive-oil")]
    pub slug: String,
    #[schema(example = "Olive oil")]
    pub name: String,
}

impl Ingredient {
    pub fn from_name(name: &str) -> Self {
        Self {
            slug: ingredient_slug(name),
            name: name.trim().to_string(),
        }
    }
}

/// 재료 이름 -> 슬러그 (영숫자가 없으면 소문자 이름 그대로)
pub fn ingredient_slug(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        name.trim().to_lowercase()
    } else {
        slug
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = IngredientListResponse)]
pub struct IngredientListResponse {
    pub count: usize,
    pub ingredients: Vec<Ingredient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_from_name() {
        let ingredient = Ingredient::from_name("  Olive Oil ");
        assert_eq!(ingredient.slug, "olive-oil");
        assert_eq!(ingredient.name, "Olive Oil");
    }
}
