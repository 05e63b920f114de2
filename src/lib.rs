//! Organic storefront: a terminal client for a product catalog and
//! customer-feedback REST API.
//!
//! The controllers ([`catalog`], [`detail`]) hold view state and are usable
//! without the TUI; [`events`] runs their network work on the tokio runtime.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod events;
pub mod fallback;
pub mod format;
pub mod logging;
pub mod model;
pub mod ui;
