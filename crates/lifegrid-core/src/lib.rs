//! Core domain model for the lifegrid evolution service.
//!
//! This crate holds the pure, synchronous heart of the system:
//!
//! - **Cell / Dimensions**: coordinate identity and the bounding rectangle
//! - **Rules**: the Conway transition function
//! - **Board**: the sparse live-cell set with an O(L) `next_generation`
//!   step and a canonical fingerprint for state comparison
//!
//! Everything here is an immutable value; a board is never mutated after
//! construction, which makes the engine thread-safe by construction. The
//! drivers, stores and transports live in the sibling crates.

mod board;
mod cell;
mod error;
mod rules;

pub use board::Board;
pub use cell::{Cell, Dimensions, NEIGHBOUR_OFFSETS};
pub use error::{CoreError, CoreResult};
pub use rules::next_alive;
