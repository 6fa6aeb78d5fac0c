// HTTP-facing services
pub mod signal_service;

pub use signal_service::{router, SignalEngine};
