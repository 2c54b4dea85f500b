//! # ani2mal
//!
//! Core library for the AniList to MyAnimeList synchronizer.
//!
//! This library keeps a MyAnimeList account converged toward an AniList
//! account: it fetches both lists, classifies every entry into
//! added/updated/removed/unchanged, and applies the resulting changeset
//! against the MyAnimeList API. AniList is always authoritative; nothing
//! is ever written back to it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod providers;
pub mod reconcile;
pub mod sync;
