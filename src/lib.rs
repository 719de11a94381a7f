//! Graphfrag - Cypher fragment compiler
//!
//! Turns tagged records into parameterized Cypher statements:
//! - Record extraction over per-type field tables
//! - Match-clause templates with prefix-scoped parameters
//! - Node statements (literal, MATCH, CREATE, MERGE ... SET, DELETE)
//! - Relationship statements joining two independently matched nodes

pub mod compiler;
pub mod config;
pub mod query_builder;
pub mod record;
pub mod render;

pub use compiler::FragmentCompiler;
pub use config::{CompilerConfig, ConfigError};
pub use query_builder::{
    Direction, EdgeSpec, Endpoint, Fragment, Label, MatchClause, MatchOverride, Params,
};
pub use record::{Entity, EntitySchema, ExtractError, JsonRecord, Record};
