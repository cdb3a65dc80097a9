// Recipe domain models
pub mod recipe;

pub use recipe::*;
