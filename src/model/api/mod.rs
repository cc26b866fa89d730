//! API-compatible types: request bodies, response shapes, and the auth token.

pub mod auth;
pub mod candidate;
pub mod partylist;
pub mod position;
pub mod settings;
pub mod stats;
pub mod student;
pub mod user;
pub mod vote;
