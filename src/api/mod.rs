//! Client side of the booking backend's REST contract.

mod backend;
mod client;
mod error;

pub use backend::BookingBackend;
pub use client::ApiClient;
pub use error::ApiError;
