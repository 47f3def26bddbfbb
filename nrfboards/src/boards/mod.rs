//! Board sources.
//!
//! Every `*.rs` file in this directory is a board. Its `// BOARD-ID:` header
//! setting names it; `build.rs` generates the module list and registry.

include!(concat!(env!("OUT_DIR"), "/board_mods.rs"));
