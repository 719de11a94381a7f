//! Cypher fragment composition.
//!
//! Data flows one way: record -> [`FragmentAssembler`] -> [`NodeComposer`]
//! -> (optionally) [`EdgeComposer`]. Every composer is configured once and
//! is read-only afterwards, so a single instance can be shared across
//! threads. Each call builds a fresh [`Fragment`].

pub mod edge;
pub mod fragment;
pub mod match_clause;
pub mod node;

pub use edge::{Direction, EdgeComposer, EdgeSpec, Endpoint};
pub use fragment::{Fragment, FragmentAssembler, Params};
pub use match_clause::{MatchClause, MatchEntry, NATIVE_ID_MARKER, VARIABLE_PLACEHOLDER};
pub use node::NodeComposer;

/// Label for a node or relationship
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Label {
    /// Use the record's entity name
    #[default]
    Entity,
    Named(String),
}

impl Label {
    pub fn resolve<'a>(&'a self, entity_name: &'a str) -> &'a str {
        match self {
            Label::Entity => entity_name,
            Label::Named(name) => name,
        }
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::Named(name.to_string())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label::Named(name)
    }
}

impl From<Option<String>> for Label {
    fn from(name: Option<String>) -> Self {
        name.map_or(Label::Entity, Label::Named)
    }
}

/// Per-call choice of match clause
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchOverride {
    /// Use the composer's configured clause
    #[default]
    Default,
    Custom(MatchClause),
}

impl MatchOverride {
    pub fn resolve<'a>(&'a self, default: &'a MatchClause) -> &'a MatchClause {
        match self {
            MatchOverride::Default => default,
            MatchOverride::Custom(clause) => clause,
        }
    }
}

impl From<MatchClause> for MatchOverride {
    fn from(clause: MatchClause) -> Self {
        MatchOverride::Custom(clause)
    }
}

/// Appends ` RETURN a, b, ...` when `with_return` is set
pub(crate) fn with_return(query: String, with_return: bool, aliases: &[&str]) -> String {
    if with_return {
        format!("{} RETURN {}", query, aliases.join(", "))
    } else {
        query
    }
}
