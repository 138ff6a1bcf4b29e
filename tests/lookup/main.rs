//! Lookup integration tests for `uoanim-rs`
//!
//! Every test writes a small client directory to the temp dir and loads it
//! the way an application would, through [`ClientFiles`](uoanim_rs::ClientFiles).

mod fixtures;
mod legacy;
mod remap;
mod uop;
