//! Stytch B2B — client for the hosted identity provider.
//!
//! DESIGN
//! ======
//! Route handlers talk to the provider only through the
//! [`IdentityProvider`] trait so tests can swap in a mock. [`StytchClient`]
//! is the reqwest-backed implementation used in production.

pub mod client;
pub mod config;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use client::StytchClient;
pub use types::{IdentityProvider, OAuthProvider, ProviderError};
