//! Cypress Teams reporter library.
//!
//! Summarizes a Cypress Mochawesome report and posts it to a Microsoft Teams
//! incoming webhook, linking the CI artifacts of the run.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
