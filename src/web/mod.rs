//! Browser-facing plumbing: session flash messages, CSRF tokens and HTML views.

pub mod csrf;
pub mod flash;
pub mod views;

pub use csrf::{CsrfValidator, SessionCsrf, delete_scope};
pub use flash::{Flash, FlashLevel, Flashes};
