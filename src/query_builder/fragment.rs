use super::match_clause::MatchClause;
use crate::record::{extract, EntityDescriptor, ExtractError, Record};
use serde::Serialize;
use serde_json::Value;

/// Parameter bindings, in insertion order
pub type Params = serde_json::Map<String, Value>;

/// Generated query text plus everything it was built from.
///
/// Example for a `User` record with `id` and `name` under variable `u`:
///
/// ```text
/// create_literal: {id: $id, name: $name}
/// set_list:       u.id = $id, u.name = $name
/// params:         {"id": "...", "name": "..."}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// Final statement text, filled in by the composers
    pub query: String,
    /// `{k: $k, ...}`, or empty when no field qualifies
    pub create_literal: String,
    /// `var.k = $k, ...`
    pub set_list: String,
    pub match_predicate: String,
    pub params: Params,
    pub variable: String,
    pub param_prefix: String,
    /// Record type name, used when no label is given
    pub entity_name: String,
}

impl Fragment {
    pub fn param_name(&self, tag: &str) -> String {
        format!("{}{}", self.param_prefix, tag)
    }

    /// Folds `other`'s parameters into this fragment. Existing keys are
    /// overwritten.
    pub fn merge_params(&mut self, other: Params) {
        for (key, value) in other {
            self.params.insert(key, value);
        }
    }
}

/// Builds fragments for one tag family, variable and parameter prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentAssembler {
    tag_name: String,
    variable: String,
    param_prefix: String,
}

impl FragmentAssembler {
    pub fn new(
        tag_name: impl Into<String>,
        variable: impl Into<String>,
        param_prefix: impl Into<String>,
    ) -> Self {
        FragmentAssembler {
            tag_name: tag_name.into(),
            variable: variable.into(),
            param_prefix: param_prefix.into(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn param_prefix(&self) -> &str {
        &self.param_prefix
    }

    /// Create literal, set list and parameters for `record`
    pub fn assemble<R>(&self, record: &R, excludes: &[&str]) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        let descriptor = extract(record, &self.tag_name, excludes)?;
        Ok(self.fragment_from(&descriptor))
    }

    /// Like [`assemble`](Self::assemble), and also expands `match_clause`
    /// against this assembler's variable. Match parameters backed by a
    /// record field are bound even when that field is excluded.
    pub fn assemble_with_match<R>(
        &self,
        record: &R,
        excludes: &[&str],
        match_clause: &MatchClause,
    ) -> Result<Fragment, ExtractError>
    where
        R: Record + ?Sized,
    {
        let descriptor = extract(record, &self.tag_name, excludes)?;
        let mut fragment = self.fragment_from(&descriptor);
        fragment.match_predicate = match_clause.predicate(&self.variable, &self.param_prefix);

        for entry in match_clause.entries() {
            if let Some(value) = descriptor.value_for_tag(&entry.param) {
                fragment
                    .params
                    .insert(entry.prefixed_param(&self.param_prefix), value.clone());
            }
        }

        Ok(fragment)
    }

    fn fragment_from(&self, descriptor: &EntityDescriptor) -> Fragment {
        let mut fragment = Fragment {
            variable: self.variable.clone(),
            param_prefix: self.param_prefix.clone(),
            entity_name: descriptor.entity_name.clone(),
            ..Default::default()
        };

        let mut create_items = Vec::with_capacity(descriptor.fields.len());
        let mut set_items = Vec::with_capacity(descriptor.fields.len());

        for field in &descriptor.fields {
            let param = fragment.param_name(&field.tag);
            create_items.push(format!("{}: ${}", field.tag, param));
            set_items.push(format!("{}.{} = ${}", self.variable, field.tag, param));
            fragment.params.insert(param, field.value.clone());
        }

        if !create_items.is_empty() {
            fragment.create_literal = format!("{{{}}}", create_items.join(", "));
        }
        fragment.set_list = set_items.join(", ");

        fragment
    }
}
