//! API Middleware
//!
//! Session cookie handling and the token gate for mutating routes.

pub mod session;

pub use session::{require_session, session_cookie, session_token, SESSION_COOKIE};
