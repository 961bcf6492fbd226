//! Countries CLI Library
//!
//! This module exposes the search service, its cache and the CLI model for use
//! in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod data;
pub mod service;
pub mod ui;
