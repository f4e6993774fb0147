//! Operation request and outcome values.

use serde_json::{Map, Value, json};

use crate::{ClientError, OperationKind};

#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub code: String,
    pub language: String,
    pub instruction: Option<String>,
    pub file_name: Option<String>,
}

impl OperationRequest {
    pub fn new(
        kind: OperationKind,
        code: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            language: language.into(),
            instruction: None,
            file_name: None,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.code.trim().is_empty() {
            return Err(ClientError::invalid_request("code must not be empty"));
        }

        if self.language.trim().is_empty() {
            return Err(ClientError::invalid_request("language must not be empty"));
        }

        Ok(())
    }

    pub(crate) fn to_payload(&self) -> Value {
        let mut payload = json!({
            "operation": self.kind.to_string(),
            "code": self.code,
            "language": self.language,
        });

        if let Some(instruction) = &self.instruction {
            payload["instruction"] = json!(instruction);
        }

        if let Some(file_name) = &self.file_name {
            payload["fileName"] = json!(file_name);
        }

        payload
    }
}

/// Result of a settled operation.
///
/// `text` is the concatenation of chunk contents in arrival order and is
/// the authoritative result. `metadata` supplements it with producer side
/// information (diff, line counts, summary statistics) and is absent when
/// the producer closed without a `done` event or the run was cancelled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationOutcome {
    pub text: String,
    pub metadata: Option<Map<String, Value>>,
}
