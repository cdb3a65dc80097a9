// Recipe repositories
pub mod ingredient_repository;
pub mod recipe_repository;

pub use ingredient_repository::*;
pub use recipe_repository::*;
