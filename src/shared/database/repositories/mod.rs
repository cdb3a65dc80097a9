// All repositories module
pub mod auth;
pub mod memory;
pub mod recipe;

// Re-export all repositories for convenience
pub use auth::*;
pub use memory::*;
pub use recipe::*;
