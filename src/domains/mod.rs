// Domain modules
pub mod auth;
pub mod ingredient;
pub mod recipe;
