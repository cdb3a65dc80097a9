// Recipe domain services
pub mod prompt_builder;
pub mod recipe_service;
pub mod state;

pub use prompt_builder::*;
pub use recipe_service::*;
pub use state::*;
