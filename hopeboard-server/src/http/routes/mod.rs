//! Route handlers organized by resource

pub mod auth;
pub mod boards;
pub mod health;
pub mod letters;
pub mod resources;
