//! Match-clause templates.
//!
//! A [`MatchClause`] is an ordered list of `template => parameter` entries.
//! Each entry expands to `<lhs> = $<prefix><parameter>` and the entries are
//! joined with ` AND `:
//!
//! | template    | variable | prefix   | predicate                |
//! |-------------|----------|----------|--------------------------|
//! | `id(+v+)`   | `u`      | (none)   | `id(u) = $id`            |
//! | `+v+.email` | `u`      | `start_` | `u.email = $start_email` |
//! | `name`      | `u`      | (none)   | `name = $name`           |

use serde::{Deserialize, Serialize};

/// Stands for the current variable inside a template
pub const VARIABLE_PLACEHOLDER: &str = "+v+";

/// Graph-native identifier template
pub const NATIVE_ID_MARKER: &str = "id(+v+)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub template: String,
    pub param: String,
}

impl MatchEntry {
    pub fn is_native_id(&self) -> bool {
        self.template.contains(NATIVE_ID_MARKER)
    }

    /// Left-hand side of the predicate for `variable`. Native-id templates
    /// always compare the variable itself; templates without a placeholder
    /// are literal property paths.
    pub fn operand(&self, variable: &str) -> String {
        self.template.replace(VARIABLE_PLACEHOLDER, variable)
    }

    pub fn prefixed_param(&self, param_prefix: &str) -> String {
        format!("{}{}", param_prefix, self.param)
    }

    pub fn to_predicate(&self, variable: &str, param_prefix: &str) -> String {
        format!(
            "{} = ${}",
            self.operand(variable),
            self.prefixed_param(param_prefix)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchClause {
    entries: Vec<MatchEntry>,
}

impl MatchClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// `id(+v+) = $<param>`
    pub fn native_id(param: impl Into<String>) -> Self {
        Self::new().with(NATIVE_ID_MARKER, param)
    }

    pub fn with(mut self, template: impl Into<String>, param: impl Into<String>) -> Self {
        self.insert(template, param);
        self
    }

    /// Adds an entry. A template that is already present keeps its position
    /// and takes the new parameter.
    pub fn insert(&mut self, template: impl Into<String>, param: impl Into<String>) {
        let template = template.into();
        let param = param.into();
        match self.entries.iter_mut().find(|e| e.template == template) {
            Some(entry) => entry.param = param,
            None => self.entries.push(MatchEntry { template, param }),
        }
    }

    pub fn entries(&self) -> &[MatchEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Boolean expression for `variable`, empty when there are no entries.
    /// Callers must drop the `WHERE` keyword for an empty predicate.
    pub fn predicate(&self, variable: &str, param_prefix: &str) -> String {
        self.entries
            .iter()
            .map(|entry| entry.to_predicate(variable, param_prefix))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

impl<T, P> FromIterator<(T, P)> for MatchClause
where
    T: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, P)>>(iter: I) -> Self {
        let mut clause = MatchClause::new();
        for (template, param) in iter {
            clause.insert(template, param);
        }
        clause
    }
}

/// Prefixes `predicate` with ` WHERE ` unless it is empty
pub(crate) fn where_clause(predicate: &str) -> String {
    if predicate.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", predicate)
    }
}
