use std::sync::Arc;

use crate::domains::ingredient::models::IngredientListResponse;
use crate::shared::database::IngredientStore;
use crate::shared::errors::AppError;

// 재료 카탈로그 서비스
#[derive(Clone)]
pub struct IngredientService {
    ingredients: Arc<dyn IngredientStore>,
}

impl IngredientService {
    pub fn new(ingredients: Arc<dyn IngredientStore>) -> Self {
        Self { ingredients }
    }

    pub async fn list(&self) -> Result<IngredientListResponse, AppError> {
        let ingredients = self.ingredients.find_all().await?;
        Ok(IngredientListResponse {
            count: ingredients.len(),
            ingredients,
        })
    }
}
