//! Shared synchronization re-exports.
//!
//! Role state sits behind `parking_lot` locks; everything a property setter
//! touches is a plain atomic.

pub use parking_lot::Mutex;

pub use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
    Arc,
};
