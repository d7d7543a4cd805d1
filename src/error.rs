use thiserror::Error;

/// Failures raised while reading a report or resolving a module in it.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Module '{module}' not found in '{document}'")]
    NotFound { module: String, document: String },

    #[error("Module '{module}' has no lineCoverage entry")]
    MissingCoverage { module: String },

    #[error("malformed coverage report: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::MalformedInput(err.to_string())
        }
    }
}

/// Error surfaced to the process boundary; `main` prints it and exits with `code`.
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub kind: &'static str,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub const NOT_FOUND: i32 = 1;
    pub const MALFORMED: i32 = 2;
    pub const IO: i32 = 3;

    pub fn io(err: anyhow::Error) -> Self {
        Self {
            code: Self::IO,
            kind: "io",
            message: format!("{err:#}"),
            hint: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.code,
                "kind": self.kind,
                "message": self.message,
                "hint": self.hint,
            }
        })
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<LookupError> for CliError {
    fn from(err: LookupError) -> Self {
        let message = err.to_string();
        match err {
            LookupError::NotFound { .. } => Self {
                code: Self::NOT_FOUND,
                kind: "not-found",
                message,
                hint: Some("check the module name against the report's \"name\" fields".into()),
            },
            LookupError::MissingCoverage { .. } => Self {
                code: Self::MALFORMED,
                kind: "missing-coverage",
                message,
                hint: None,
            },
            LookupError::MalformedInput(_) => Self {
                code: Self::MALFORMED,
                kind: "malformed-input",
                message,
                hint: Some(
                    "expected a JSON array of objects with \"name\" and \"lineCoverage\"".into(),
                ),
            },
            LookupError::Io(_) => Self {
                code: Self::IO,
                kind: "io",
                message,
                hint: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_matches_diagnostic_format() {
        let err = LookupError::NotFound {
            module: "missing".into(),
            document: r#"[{"name":"core"}]"#.into(),
        };
        assert_eq!(
            err.to_string(),
            r#"Module 'missing' not found in '[{"name":"core"}]'"#
        );
        let cli: CliError = err.into();
        assert_eq!(cli.code, 1);
        assert_eq!(cli.kind, "not-found");
    }

    #[test]
    fn malformed_input_exits_with_distinct_code() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
        let cli: CliError = LookupError::from(parse_err).into();
        assert_eq!(cli.code, CliError::MALFORMED);
        assert_ne!(cli.code, CliError::NOT_FOUND);
        assert_eq!(cli.to_json()["error"]["kind"], "malformed-input");
    }
}
