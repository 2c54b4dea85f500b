//! OAuth credential lifecycle
//!
//! This module owns the one piece of persistent state in the system: the
//! per-provider token triple. [`TokenManager`] hands out a currently-valid
//! access token, transparently refreshing and re-persisting it when it is
//! near expiry. It is the only component allowed to mutate stored
//! credentials.

mod manager;
mod token;

pub use manager::{EXPIRATION_BUFFER, TokenEndpoint, TokenManager};
pub use token::{TokenResponse, TokenSet};
