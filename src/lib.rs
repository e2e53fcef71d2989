//! Farkle scoring (workspace facade crate).
//!
//! Re-exports `farkle::{core,adapter,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use farkle_adapter as adapter;
pub use farkle_core as core;
pub use farkle_types as types;
