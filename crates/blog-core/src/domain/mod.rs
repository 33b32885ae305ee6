//! Domain entities - the core business objects.

mod blog;
mod session;
mod user;
mod validation;

pub use blog::{Blog, validate_content};
pub use session::AuthSession;
pub use user::{User, UserRef, display_name_for, validate_registration};
pub use validation::ValidationErrors;
