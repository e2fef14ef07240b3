//! Utility modules for common functionality
//!
//! This module provides logging, progress reporting and path helpers used by
//! the commands.

pub mod logger;
pub mod progress;
pub mod path_utils;
