//! Forces dynamic linking of `uoanim-rs` for faster incremental builds.

#![allow(clippy::single_component_path_imports)]

#[allow(unused_imports)]
use uoanim_internal;
