//! webstack-lib: resource graph and template synthesis for a static web stack
//!
//! This crate provides the pieces used by the `webstack` CLI:
//! - `StackOptions`: the options record every environment varies
//! - `BuildSpec`: the opaque build-step document, loaded and re-encoded
//! - `GraphBuilder` / `StackGraph`: a validated DAG of typed resource records
//! - `assemble`: the one parametrized template wiring the stack together
//! - `synthesize`: rendering a graph as a CloudFormation template

pub mod buildspec;
pub mod config;
pub mod consts;
pub mod graph;
pub mod init;
pub mod paths;
pub mod resource;
pub mod stack;
pub mod synth;
pub mod util;
