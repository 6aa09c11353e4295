//! Link bus segment hierarchy.
//!
//! This crate indexes the routed segments of a link bus as a forest and
//! answers the parent, child, lookup and sibling queries a link-path
//! optimizer needs. It also ranks landing pads for link endpoints and loads
//! bus documents from JSON.
//!
//! The binary `linkbus` runs the queries against a bus document and prints JSON.

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod loader;
pub mod model;
pub mod pad_rank;
