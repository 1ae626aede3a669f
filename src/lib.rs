//! Mintari - upload an image, stylize it, publish it and mint it
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod http;
pub mod publish;
pub mod records;
pub mod server;
pub mod stylize;
pub mod workflow;
