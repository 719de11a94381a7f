//! Entry point tying a [`CompilerConfig`] to the node and edge composers.
//!
//! ```ignore
//! let compiler = FragmentCompiler::new(CompilerConfig::default())?;
//! let create = compiler.create_node(&user, &Label::from("User"), true, &[])?;
//! // CREATE (flava:User {id: $id, name: $name}) RETURN flava
//! ```

use crate::config::{CompilerConfig, ConfigError};
use crate::query_builder::{
    EdgeComposer, EdgeSpec, Fragment, Label, MatchClause, MatchOverride, NodeComposer,
};
use crate::record::{ExtractError, Record};
use validator::Validate;

static DEFAULT_MATCH: MatchOverride = MatchOverride::Default;

#[derive(Debug, Clone)]
pub struct FragmentCompiler {
    config: CompilerConfig,
    nodes: NodeComposer,
    edges: EdgeComposer,
}

impl FragmentCompiler {
    pub fn new(config: CompilerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let nodes = NodeComposer::new(
            config.tag_name.as_str(),
            config.variable.as_str(),
            config.param_prefix.as_str(),
            config.match_clause.clone(),
        );
        let edges = EdgeComposer::new(
            config.tag_name.as_str(),
            config.variable.as_str(),
            config.param_prefix.as_str(),
            config.start_variable.as_str(),
            config.end_variable.as_str(),
            config.match_clause.clone(),
        );

        Ok(FragmentCompiler {
            config,
            nodes,
            edges,
        })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn node_with_properties<R>(&self, record: &R, label: &Label) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.nodes.node_with_properties(record, label)
    }

    pub fn match_node<R>(&self, record: &R, label: &Label, with_return: bool) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.nodes
            .match_node(record, label, &MatchOverride::Default, with_return)
    }

    pub fn match_node_with<R>(
        &self,
        record: &R,
        label: &Label,
        match_clause: &MatchClause,
        with_return: bool,
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.nodes.match_node(
            record,
            label,
            &MatchOverride::Custom(match_clause.clone()),
            with_return,
        )
    }

    pub fn create_node<R>(
        &self,
        record: &R,
        label: &Label,
        with_return: bool,
        excludes: &[&str],
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.nodes.create_node(record, label, with_return, excludes)
    }

    /// Update matched by the configured clause
    pub fn update_node<R>(
        &self,
        record: &R,
        label: &Label,
        with_return: bool,
        excludes: &[&str],
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.nodes
            .update_node(record, label, &MatchOverride::Default, with_return, excludes)
    }

    pub fn update_node_with_match<R>(
        &self,
        record: &R,
        label: &Label,
        match_clause: &MatchClause,
        with_return: bool,
        excludes: &[&str],
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.nodes.update_node(
            record,
            label,
            &MatchOverride::Custom(match_clause.clone()),
            with_return,
            excludes,
        )
    }

    pub fn delete_node<R>(&self, record: &R, detach: bool) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.nodes.delete_node(record, &MatchOverride::Default, detach)
    }

    pub fn delete_node_with_match<R>(
        &self,
        record: &R,
        detach: bool,
        match_clause: &MatchClause,
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.nodes
            .delete_node(record, &MatchOverride::Custom(match_clause.clone()), detach)
    }

    pub fn detach_delete_node<R>(&self, record: &R) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.delete_node(record, true)
    }

    pub fn detach_delete_node_with_match<R>(
        &self,
        record: &R,
        match_clause: &MatchClause,
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        self.delete_node_with_match(record, true, match_clause)
    }

    /// Relationship between endpoints matched by the configured clause.
    /// Endpoint overrides on `spec` are ignored.
    pub fn create_edge(&self, spec: &EdgeSpec<'_>) -> Result<Fragment, ExtractError> {
        self.edges.create_edge(&with_default_endpoints(spec))
    }

    /// Relationship between endpoints matched by their own clauses
    pub fn create_edge_with_matches(&self, spec: &EdgeSpec<'_>) -> Result<Fragment, ExtractError> {
        self.edges.create_edge(spec)
    }

    /// Merge-and-set of a relationship, with endpoints and the relationship
    /// all matched by the configured clause
    pub fn update_edge(&self, spec: &EdgeSpec<'_>) -> Result<Fragment, ExtractError> {
        self.edges
            .update_edge(&with_default_endpoints(spec), &MatchOverride::Default)
    }

    pub fn update_edge_with_matches(
        &self,
        spec: &EdgeSpec<'_>,
        edge_match: &MatchClause,
    ) -> Result<Fragment, ExtractError> {
        self.edges
            .update_edge(spec, &MatchOverride::Custom(edge_match.clone()))
    }
}

fn with_default_endpoints<'a>(spec: &EdgeSpec<'a>) -> EdgeSpec<'a> {
    let mut spec = *spec;
    spec.start.match_clause = &DEFAULT_MATCH;
    spec.end.match_clause = &DEFAULT_MATCH;
    spec
}
