//! # propstats
//!
//! Property listing store with price analytics.
//!
//! The crate keeps real-estate listings in a repository, exposes CRUD
//! operations over them, and computes summary statistics, IQR price
//! outliers and month-by-month historical insights for any filtered subset.
//! A REST API is provided via Axum when the `http-server` feature is on.
//!
//! ## Architecture
//!
//! - [`api`]: Domain types shared by every layer (records, filters, results)
//! - [`config`]: Server configuration from TOML and environment
//! - [`db`]: Repository pattern, storage backends and validation services
//! - [`services`]: Filtering, statistics, outlier and history computations
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
