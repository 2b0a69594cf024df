//! # Juicebox Core
//!
//! The domain layer of the Juicebox blogging backend.
//! This crate contains users, posts and tags plus the ports the
//! infrastructure has to implement. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
