//! Wake signal relay subsystem.
//!
//! # Data Flow
//! ```text
//! signal request
//!     → engine.rs (SignalRelay::signal)
//!     → store.rs (set event flag, TTL starts)
//!
//! wait request
//!     → engine.rs (SignalRelay::wait, bounded poll loop)
//!         → store.rs (flag present?)
//!         → token.rs (take exclusion token, bounded)
//!         → store.rs (re-check, clear)
//!         → delay.rs (sleep one poll interval)
//! ```
//!
//! # Design Decisions
//! - Store, token and delay are injected, never ambient globals
//! - One event key per relay: a single logical channel

pub mod delay;
pub mod engine;
pub mod store;
pub mod token;

pub use delay::{Delay, TokioDelay};
pub use engine::{RelayError, SignalRelay};
pub use store::{FlagStore, MemoryStore, StoreError};
pub use token::{ExclusionToken, TokenGuard};
