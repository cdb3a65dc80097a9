// Recipe domain state
use crate::domains::recipe::services::RecipeService;

#[derive(Clone)]
pub struct RecipeState {
    pub recipe_service: RecipeService,
}

impl RecipeState {
    pub fn new(recipe_service: RecipeService) -> Self {
        Self { recipe_service }
    }
}
