//! Luxora Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod media;
pub mod middleware;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod session_store;
pub mod state;
