//! Handlers for the JSON API.

pub mod gallery;
pub mod machine;
pub mod minting;
