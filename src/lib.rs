//! Personal-training booking client: a date-indexed calendar over
//! appointments held by a remote REST backend, the trainer and client
//! portals that drive it, and a stub backend for local development.

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod portal;
pub mod session;
pub mod store;
pub mod stub;

#[cfg(test)]
mod test_support;
