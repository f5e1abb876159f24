// src/lib.rs

//! garden-watch library
//!
//! Polls game-world feeds (stock, weather, restock, item catalog), detects
//! changes against a persisted snapshot and sends one notification per change.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
