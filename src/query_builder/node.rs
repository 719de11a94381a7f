use super::{
    fragment::{Fragment, FragmentAssembler},
    match_clause::{where_clause, MatchClause},
    with_return, Label, MatchOverride,
};
use crate::record::{ExtractError, Record};

/// Single-node statements for one variable and parameter prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeComposer {
    assembler: FragmentAssembler,
    match_clause: MatchClause,
}

impl NodeComposer {
    pub fn new(
        tag_name: impl Into<String>,
        variable: impl Into<String>,
        param_prefix: impl Into<String>,
        match_clause: MatchClause,
    ) -> Self {
        NodeComposer {
            assembler: FragmentAssembler::new(tag_name, variable, param_prefix),
            match_clause,
        }
    }

    pub fn variable(&self) -> &str {
        self.assembler.variable()
    }

    pub fn default_match_clause(&self) -> &MatchClause {
        &self.match_clause
    }

    /// `(v:Label {k: $k, ...})`
    pub fn node_with_properties<R>(&self, record: &R, label: &Label) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        let mut fragment = self.assembler.assemble(record, &[])?;
        fragment.query = format!(
            "({}:{} {})",
            fragment.variable,
            label.resolve(&fragment.entity_name),
            fragment.create_literal
        );
        Ok(fragment)
    }

    /// `MATCH (v:Label) WHERE <predicate> [RETURN v]`
    pub fn match_node<R>(
        &self,
        record: &R,
        label: &Label,
        match_clause: &MatchOverride,
        return_node: bool,
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        let clause = match_clause.resolve(&self.match_clause);
        let mut fragment = self.assembler.assemble_with_match(record, &[], clause)?;
        let query = format!(
            "MATCH ({}:{}){}",
            fragment.variable,
            label.resolve(&fragment.entity_name),
            where_clause(&fragment.match_predicate)
        );
        fragment.query = with_return(query, return_node, &[fragment.variable.as_str()]);
        log::debug!("composed match: {}", fragment.query);
        Ok(fragment)
    }

    /// `CREATE (v:Label {k: $k, ...}) [RETURN v]`
    pub fn create_node<R>(
        &self,
        record: &R,
        label: &Label,
        return_node: bool,
        excludes: &[&str],
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        let mut fragment = self.assembler.assemble(record, excludes)?;
        let query = format!(
            "CREATE ({}:{} {})",
            fragment.variable,
            label.resolve(&fragment.entity_name),
            fragment.create_literal
        );
        fragment.query = with_return(query, return_node, &[fragment.variable.as_str()]);
        log::debug!("composed create: {}", fragment.query);
        Ok(fragment)
    }

    /// `MERGE (v:Label) WHERE <predicate> SET v.k = $k, ... [RETURN v]`
    pub fn update_node<R>(
        &self,
        record: &R,
        label: &Label,
        match_clause: &MatchOverride,
        return_node: bool,
        excludes: &[&str],
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        let clause = match_clause.resolve(&self.match_clause);
        let mut fragment = self.assembler.assemble_with_match(record, excludes, clause)?;
        let mut query = format!(
            "MERGE ({}:{}){}",
            fragment.variable,
            label.resolve(&fragment.entity_name),
            where_clause(&fragment.match_predicate)
        );
        if !fragment.set_list.is_empty() {
            query.push_str(" SET ");
            query.push_str(&fragment.set_list);
        }
        fragment.query = with_return(query, return_node, &[fragment.variable.as_str()]);
        log::debug!("composed update: {}", fragment.query);
        Ok(fragment)
    }

    /// `MATCH (v) WHERE <predicate> [DETACH ]DELETE v`
    pub fn delete_node<R>(
        &self,
        record: &R,
        match_clause: &MatchOverride,
        detach: bool,
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        let clause = match_clause.resolve(&self.match_clause);
        let mut fragment = self.assembler.assemble_with_match(record, &[], clause)?;
        fragment.query = format!(
            "MATCH ({var}){} {}DELETE {var}",
            where_clause(&fragment.match_predicate),
            if detach { "DETACH " } else { "" },
            var = fragment.variable,
        );
        log::debug!("composed delete: {}", fragment.query);
        Ok(fragment)
    }
}
