//! Catalog of long-running backend operations.
//!
//! ```rust
//! use mclient::OperationKind;
//!
//! assert_eq!(OperationKind::GenerateTests.to_string(), "generate-tests");
//! assert_eq!(OperationKind::GenerateTests.endpoint_path(), "v1/generate-tests");
//! ```

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    EditCode,
    GenerateTests,
    GenerateDocs,
    SuggestRefactors,
    ReviewCode,
}

impl OperationKind {
    pub const ALL: [Self; 5] = [
        Self::EditCode,
        Self::GenerateTests,
        Self::GenerateDocs,
        Self::SuggestRefactors,
        Self::ReviewCode,
    ];

    /// Path under the backend base URL that serves this operation's stream.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            Self::EditCode => "v1/edit-code",
            Self::GenerateTests => "v1/generate-tests",
            Self::GenerateDocs => "v1/generate-docs",
            Self::SuggestRefactors => "v1/suggest-refactors",
            Self::ReviewCode => "v1/review-code",
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::EditCode => "edit-code",
            Self::GenerateTests => "generate-tests",
            Self::GenerateDocs => "generate-docs",
            Self::SuggestRefactors => "suggest-refactors",
            Self::ReviewCode => "review-code",
        };

        f.write_str(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_stable() {
        assert_eq!(OperationKind::EditCode.to_string(), "edit-code");
        assert_eq!(OperationKind::GenerateTests.to_string(), "generate-tests");
        assert_eq!(OperationKind::GenerateDocs.to_string(), "generate-docs");
        assert_eq!(OperationKind::SuggestRefactors.to_string(), "suggest-refactors");
        assert_eq!(OperationKind::ReviewCode.to_string(), "review-code");
    }

    #[test]
    fn every_operation_has_a_versioned_endpoint() {
        for kind in OperationKind::ALL {
            let path = kind.endpoint_path();
            assert!(path.starts_with("v1/"), "{kind} path {path}");
            assert_eq!(path.trim_start_matches("v1/"), kind.to_string());
        }
    }
}
