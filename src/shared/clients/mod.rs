// External clients
pub mod gemini;
pub mod mailer;
pub mod mock;
pub mod smtp_mailer;

pub use gemini::*;
pub use mailer::*;
pub use mock::*;
pub use smtp_mailer::*;
