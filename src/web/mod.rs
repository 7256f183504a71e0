//! Web UI module for colloquy
//!
//! A small axum app: an upload form, a processing endpoint, and stateless
//! plain-text downloads.

mod handlers;
mod server;
mod templates;

pub use server::{router, serve};
