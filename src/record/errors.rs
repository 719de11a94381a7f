use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractError {
    #[error("Unsupported entity kind `{kind}` (records must be struct-shaped)")]
    UnsupportedEntityKind { kind: String },
}

impl ExtractError {
    /// Create an UnsupportedEntityKind error naming the record it was raised for
    pub fn unsupported_kind_with_context(
        kind: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        let kind = kind.into();
        let ctx = context.into();
        ExtractError::UnsupportedEntityKind {
            kind: format!("{}\n  Context: {}", kind, ctx),
        }
    }
}
