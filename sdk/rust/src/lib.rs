//! Client SDK for the wake signal relay.

pub mod client;
pub mod idle;

pub use client::{decode_result, HealthStatus, WakerClient, WakerError};
pub use idle::IdleWaker;
