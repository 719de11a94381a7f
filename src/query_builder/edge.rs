//! Relationship statements.
//!
//! Each endpoint is matched by its own [`NodeComposer`] with a dedicated
//! parameter prefix (`start_` / `end_`), so both endpoints can share field
//! names without their parameters colliding:
//!
//! ```text
//! MATCH (start:User) WHERE id(start) = $start_id
//! MATCH (end:User) WHERE id(end) = $end_id
//! CREATE (start)-[rel:Follows {since: $since}]->(end)
//! ```

use super::{
    fragment::{Fragment, FragmentAssembler},
    match_clause::{where_clause, MatchClause},
    node::NodeComposer,
    with_return, Label, MatchOverride,
};
use crate::record::{ExtractError, Record};
use std::fmt;

pub const START_PARAM_PREFIX: &str = "start_";
pub const END_PARAM_PREFIX: &str = "end_";

static ENTITY_LABEL: Label = Label::Entity;
static DEFAULT_MATCH: MatchOverride = MatchOverride::Default;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// `<-[...]-`
    In,
    /// `-[...]->`
    Out,
    /// `-[...]-`
    #[default]
    Undirected,
}

impl Direction {
    /// `"in"` and `"out"` are directed, anything else is undirected
    pub fn parse(direction: &str) -> Self {
        match direction {
            "in" => Direction::In,
            "out" => Direction::Out,
            _ => Direction::Undirected,
        }
    }

    /// Tokens placed before and after the relationship brackets
    pub fn tokens(self) -> (&'static str, &'static str) {
        match self {
            Direction::In => ("<-", "-"),
            Direction::Out => ("-", "->"),
            Direction::Undirected => ("-", "-"),
        }
    }
}

impl From<&str> for Direction {
    fn from(direction: &str) -> Self {
        Direction::parse(direction)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
            Direction::Undirected => write!(f, "undirected"),
        }
    }
}

/// One side of a relationship
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    pub record: &'a dyn Record,
    pub label: &'a Label,
    pub match_clause: &'a MatchOverride,
}

impl<'a> Endpoint<'a> {
    /// Endpoint labelled by its entity name and matched by the default clause
    pub fn new(record: &'a dyn Record) -> Self {
        Endpoint {
            record,
            label: &ENTITY_LABEL,
            match_clause: &DEFAULT_MATCH,
        }
    }

    pub fn labelled(mut self, label: &'a Label) -> Self {
        self.label = label;
        self
    }

    pub fn matched_by(mut self, match_clause: &'a MatchOverride) -> Self {
        self.match_clause = match_clause;
        self
    }
}

/// Everything needed to build one relationship statement
#[derive(Clone, Copy)]
pub struct EdgeSpec<'a> {
    pub start: Endpoint<'a>,
    pub end: Endpoint<'a>,
    pub edge: &'a dyn Record,
    pub label: &'a Label,
    pub direction: Direction,
    pub return_all: bool,
    pub excludes: &'a [&'a str],
}

impl<'a> EdgeSpec<'a> {
    pub fn new(start: Endpoint<'a>, end: Endpoint<'a>, edge: &'a dyn Record) -> Self {
        EdgeSpec {
            start,
            end,
            edge,
            label: &ENTITY_LABEL,
            direction: Direction::Undirected,
            return_all: false,
            excludes: &[],
        }
    }
}

/// Composes relationship statements between two matched nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeComposer {
    tag_name: String,
    start_variable: String,
    end_variable: String,
    match_clause: MatchClause,
    assembler: FragmentAssembler,
}

impl EdgeComposer {
    pub fn new(
        tag_name: impl Into<String>,
        variable: impl Into<String>,
        param_prefix: impl Into<String>,
        start_variable: impl Into<String>,
        end_variable: impl Into<String>,
        match_clause: MatchClause,
    ) -> Self {
        let tag_name = tag_name.into();
        EdgeComposer {
            assembler: FragmentAssembler::new(tag_name.clone(), variable, param_prefix),
            tag_name,
            start_variable: start_variable.into(),
            end_variable: end_variable.into(),
            match_clause,
        }
    }

    /// `<start match> <end match> CREATE (s)-[e:Label {k: $k}]->(t) [RETURN s, e, t]`
    pub fn create_edge(&self, spec: &EdgeSpec<'_>) -> Result<Fragment, ExtractError> {
        let (start, end) = self.match_endpoints(spec)?;
        let mut fragment = self.assembler.assemble(spec.edge, spec.excludes)?;
        let (dir_start, dir_end) = spec.direction.tokens();

        let query = format!(
            "{} {} CREATE ({}){}[{}:{} {}]{}({})",
            start.query,
            end.query,
            start.variable,
            dir_start,
            fragment.variable,
            spec.label.resolve(&fragment.entity_name),
            fragment.create_literal,
            dir_end,
            end.variable,
        );
        fragment.query = with_return(
            query,
            spec.return_all,
            &[
                start.variable.as_str(),
                fragment.variable.as_str(),
                end.variable.as_str(),
            ],
        );
        fragment.merge_params(start.params);
        fragment.merge_params(end.params);

        log::debug!("composed edge create ({}): {}", spec.direction, fragment.query);
        Ok(fragment)
    }

    /// `<start match> <end match> MERGE (s)-[e:Label]->(t) WHERE <edge predicate> SET e.k = $k`
    ///
    /// `edge_match` identifies the relationship itself and is independent of
    /// the endpoints' clauses.
    pub fn update_edge(
        &self,
        spec: &EdgeSpec<'_>,
        edge_match: &MatchOverride,
    ) -> Result<Fragment, ExtractError> {
        let (start, end) = self.match_endpoints(spec)?;
        let clause = edge_match.resolve(&self.match_clause);
        let mut fragment = self
            .assembler
            .assemble_with_match(spec.edge, spec.excludes, clause)?;
        let (dir_start, dir_end) = spec.direction.tokens();

        let mut query = format!(
            "{} {} MERGE ({}){}[{}:{}]{}({}){}",
            start.query,
            end.query,
            start.variable,
            dir_start,
            fragment.variable,
            spec.label.resolve(&fragment.entity_name),
            dir_end,
            end.variable,
            where_clause(&fragment.match_predicate),
        );
        if !fragment.set_list.is_empty() {
            query.push_str(" SET ");
            query.push_str(&fragment.set_list);
        }
        fragment.query = with_return(
            query,
            spec.return_all,
            &[
                start.variable.as_str(),
                fragment.variable.as_str(),
                end.variable.as_str(),
            ],
        );
        fragment.merge_params(start.params);
        fragment.merge_params(end.params);

        log::debug!("composed edge update ({}): {}", spec.direction, fragment.query);
        Ok(fragment)
    }

    fn match_endpoints(&self, spec: &EdgeSpec<'_>) -> Result<(Fragment, Fragment), ExtractError> {
        let start = self.endpoint_composer(
            &self.start_variable,
            START_PARAM_PREFIX,
            spec.start.match_clause,
        );
        let end = self.endpoint_composer(
            &self.end_variable,
            END_PARAM_PREFIX,
            spec.end.match_clause,
        );

        let start_match = start.match_node(
            spec.start.record,
            spec.start.label,
            &MatchOverride::Default,
            false,
        )?;
        let end_match = end.match_node(
            spec.end.record,
            spec.end.label,
            &MatchOverride::Default,
            false,
        )?;
        Ok((start_match, end_match))
    }

    fn endpoint_composer(
        &self,
        variable: &str,
        param_prefix: &str,
        match_clause: &MatchOverride,
    ) -> NodeComposer {
        NodeComposer::new(
            self.tag_name.as_str(),
            variable,
            param_prefix,
            match_clause.resolve(&self.match_clause).clone(),
        )
    }
}
