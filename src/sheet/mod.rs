//! # Sheet Module
//!
//! This module provides label-sheet geometry configurations.
//!
//! ## Modules
//!
//! - [`config`]: Page and label dimensions

pub mod config;

pub use config::SheetConfig;
