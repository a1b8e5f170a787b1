//! Cloud export core: directory picker, create form and export flow.
//!
//! Screens live on an explicit navigation stack owned by a `Session`; remote
//! storage is reached through the `CloudClient` trait. The HTTP API in
//! `routes` exposes the session to a front-end.

pub mod cloud;
pub mod config;
pub mod error;
pub mod local;
pub mod models;
pub mod navigation;
pub mod path;
pub mod routes;
