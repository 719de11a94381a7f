/// Inline parameter rendering for previews
///
/// Replaces `$paramName` placeholders in generated Cypher with literal values.
/// The result is meant for logs and the CLI preview; statements sent to a
/// database should keep their parameters.
use crate::query_builder::Params;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
}

/// Escape a string for a single-quoted Cypher literal
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\") // Must be first!
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Property keys that are not plain identifiers need backticks
fn format_key(key: &str) -> String {
    let plain = key
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_alphanumeric() || c == '_');
    if plain {
        key.to_string()
    } else {
        format!("`{}`", key.replace('`', "``"))
    }
}

fn format_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", escape_string(s)),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(format_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", format_key(k), format_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Substitute every `$name` placeholder in `query` with its value from
/// `params`.
///
/// # Errors
/// `MissingParameter` if a placeholder has no value
pub fn inline_parameters(query: &str, params: &Params) -> Result<String, RenderError> {
    let mut result = String::with_capacity(query.len() * 2);
    let mut chars = query.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let mut param_name = String::new();
        while let Some(&next_ch) = chars.peek() {
            if next_ch.is_alphanumeric() || next_ch == '_' {
                param_name.push(next_ch);
                chars.next();
            } else {
                break;
            }
        }

        if param_name.is_empty() {
            // Just a lone $ character
            result.push('$');
            continue;
        }

        match params.get(&param_name) {
            Some(value) => result.push_str(&format_literal(value)),
            None => return Err(RenderError::MissingParameter(param_name)),
        }
    }

    Ok(result)
}
