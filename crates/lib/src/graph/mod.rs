//! Resource graph.
//!
//! The graph is an explicit DAG of typed node records. Nodes are added through
//! a [`GraphBuilder`], adjusted in place (overrides, tags, policies), and then
//! frozen into a [`StackGraph`] once every reference has been resolved and the
//! graph has been checked for cycles.
//!
//! # Submodules
//!
//! - `types` - Node records, references and property expressions
//! - `builder` - Construction, validation and the finished graph

mod builder;
mod types;

pub use builder::*;
pub use types::*;
