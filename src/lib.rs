pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod phone;
pub mod session;
pub mod submit;
pub mod summary;
pub mod voting;
