//! Shared utilities for the census preprocessing crates.
//!
//! This crate provides Polars `AnyValue` conversions and column helpers used
//! across the workspace.

pub mod polars;

pub use polars::{
    any_to_string, any_to_string_non_empty, column_string_values, format_numeric, string_column,
};
