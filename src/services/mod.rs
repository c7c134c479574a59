//! Domain helpers used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules hold the pure pieces of the auth flow (tag dispatch,
//! slugging, cookie construction) so route handlers stay focused on
//! provider calls and redirects.

pub mod cookies;
pub mod discovery;
