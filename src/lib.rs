//! Event check-in server.
//!
//! Scans arrive as raw QR payloads, get appended to a local ticket log and
//! mark the matching attendee present in the attendance store.

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
