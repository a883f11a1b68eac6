use super::ToolError;

/// Outcome of invoking one operation on the tool provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocationOutcome {
    /// The provider returned a result, already reduced to text.
    Success { text: String },
    /// The call could not be completed or the provider flagged an error.
    Failure { message: String },
}

impl ToolInvocationOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Content of the tool message handed back to the model.
    pub fn into_content(self) -> String {
        match self {
            Self::Success { text } => text,
            Self::Failure { message } => format!("error: {message}"),
        }
    }
}

impl From<ToolError> for ToolInvocationOutcome {
    fn from(err: ToolError) -> Self {
        Self::failure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_of_each_variant() {
        assert_eq!(ToolInvocationOutcome::success("22C").into_content(), "22C");

        let failure = ToolInvocationOutcome::from(ToolError::NotFound("get_time".into()));
        assert!(failure.is_failure());
        assert_eq!(failure.into_content(), "error: tool not found: get_time");
    }
}
