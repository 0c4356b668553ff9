//! Mesh processing algorithms.
//!
//! - **Unwrap**: pixel-scaled per-face UV projection, fixed-footprint reset
//!   and face packing ([`unwrap`])
//! - **Progress**: callback-based progress reporting for batch operations

mod progress;
pub mod unwrap;

pub use progress::Progress;
