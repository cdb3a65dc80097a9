pub mod ingredient_service;
pub mod state;

pub use ingredient_service::*;
pub use state::*;
