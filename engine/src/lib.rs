// Engine library root
// Indicator math, model-output validation and the signal service built on them.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod llm;
pub mod services;
pub mod signal;
