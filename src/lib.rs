pub mod auth_form;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod summarize;
pub mod views;

pub use server::{app, AppState};

#[cfg(test)]
pub mod testing;
