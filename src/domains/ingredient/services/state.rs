// Ingredient domain state
use crate::domains::ingredient::services::IngredientService;

#[derive(Clone)]
pub struct IngredientState {
    pub ingredient_service: IngredientService,
}

impl IngredientState {
    pub fn new(ingredient_service: IngredientService) -> Self {
        Self { ingredient_service }
    }
}
