//! Jadwal - session status service for a production scheduling dashboard
//!
//! This library derives the status of photo/video sessions from their date
//! and time window, and serves it to the admin dashboard over HTTP.

pub mod api;
pub mod config;
pub mod models;
pub mod services;
