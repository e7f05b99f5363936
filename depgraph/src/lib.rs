//! Dependency graph analysis over compiled class artifacts.
//!
//! The overall analysis proceeds as follows:
//!
//! 1. The classpath is split into containers, which are enumerated by the
//!    `classpath` crate.
//! 2. Each class artifact's symbolic references are extracted by the
//!    `classfile` crate.
//! 3. The artifacts populate a single-rooted hierarchy of containers,
//!    packages, and class leaves; the raw reference names resolve to
//!    leaf-to-leaf arcs.
//! 4. Collapse state on any node projects the raw arcs onto the currently
//!    visible granularity. An indexed snapshot of that projection feeds the
//!    graph algorithms: strongly connected components, transitive closure,
//!    reachability, and edge density.
//!
//! The hierarchy is built once per analysis; afterwards only collapse state
//! mutates. Collapse mutations and projection reads must be serialized by
//! the caller; the engine provides no internal locking.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(clippy::unwrap_used)]

pub mod algo;
mod analyze;
mod check;
mod error;
mod filter;
pub mod name;
mod tree;
mod view;

pub use analyze::*;
pub use check::*;
pub use error::*;
pub use filter::*;
pub use tree::*;
pub use view::*;
