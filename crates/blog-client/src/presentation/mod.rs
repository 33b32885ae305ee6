//! View-models for a terminal or GUI front end.
//!
//! Nothing here renders pixels; each type holds the state and the rules a
//! screen needs and leaves layout to the caller.

mod card;
mod feed;
mod forms;
mod nav;

pub use card::{ANONYMOUS, PostCard, avatar_initial, format_timestamp};
pub use feed::{Feed, LOAD_FAILED, PUBLISH_FAILED, Publish};
pub use forms::{FieldErrors, LoginForm, SignupForm};
pub use nav::{APP_TITLE, Header, NavItem, Sidebar};
