//! Contest Hub
//!
//! Aggregates programming contest listings from a fixed set of platforms
//! into one normalized schema, classifies each contest against the clock,
//! and pairs finished contests with solution videos from configured
//! playlists. Served over a small HTTP API and refreshed on a cron
//! schedule.

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod matcher;
pub mod models;
pub mod services;
pub mod sources;
pub mod store;
pub mod utils;
pub mod videos;
pub mod web;
