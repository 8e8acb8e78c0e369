//! Authorization decisions

use crate::domain::DomainError;

/// Why a request was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialKind {
    BadRequest,
    Forbidden,
    NotFound,
    Conflict,
}

impl DenialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
        }
    }
}

impl std::fmt::Display for DenialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A denial with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
}

impl Denial {
    pub fn new(kind: DenialKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(DenialKind::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(DenialKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(DenialKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(DenialKind::Conflict, message)
    }
}

impl From<Denial> for DomainError {
    fn from(denial: Denial) -> Self {
        match denial.kind {
            DenialKind::BadRequest => DomainError::validation(denial.message),
            DenialKind::Forbidden => DomainError::forbidden(denial.message),
            DenialKind::NotFound => DomainError::not_found(denial.message),
            DenialKind::Conflict => DomainError::conflict(denial.message),
        }
    }
}

/// Outcome of one authorization check
///
/// `Permitted` carries what the caller is allowed to act on: a scope for
/// listings, the resolved entity for identifier-addressed operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision<T> {
    Permitted(T),
    Denied(Denial),
}

impl<T> Decision<T> {
    pub fn is_permitted(&self) -> bool {
        matches!(self, Self::Permitted(_))
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Permitted(_) => None,
            Self::Denied(denial) => Some(denial),
        }
    }

    pub fn kind(&self) -> Option<DenialKind> {
        self.denial().map(|d| d.kind)
    }

    /// Label used for logs and metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Permitted(_) => "permitted",
            Self::Denied(denial) => denial.kind.as_str(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decision<U> {
        match self {
            Self::Permitted(value) => Decision::Permitted(f(value)),
            Self::Denied(denial) => Decision::Denied(denial),
        }
    }

    /// Turn a denial into the matching [`DomainError`]
    pub fn into_result(self) -> Result<T, DomainError> {
        match self {
            Self::Permitted(value) => Ok(value),
            Self::Denied(denial) => Err(denial.into()),
        }
    }
}

impl<T> From<Denial> for Decision<T> {
    fn from(denial: Denial) -> Self {
        Self::Denied(denial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_kinds_map_to_distinct_errors() {
        let not_found: DomainError = Denial::not_found("Task not found").into();
        let forbidden: DomainError = Denial::forbidden("nope").into();
        let conflict: DomainError = Denial::conflict("dup").into();
        let bad_request: DomainError = Denial::bad_request("empty").into();

        assert!(matches!(not_found, DomainError::NotFound { .. }));
        assert!(matches!(forbidden, DomainError::Forbidden { .. }));
        assert!(matches!(conflict, DomainError::Conflict { .. }));
        assert!(matches!(bad_request, DomainError::Validation { .. }));
    }

    #[test]
    fn test_into_result_keeps_message() {
        let decision: Decision<()> = Denial::forbidden("Only the team admin can add members").into();
        let err = decision.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Forbidden: Only the team admin can add members"
        );
    }

    #[test]
    fn test_outcome_and_map() {
        let permitted = Decision::Permitted(2).map(|n| n * 2);
        assert_eq!(permitted, Decision::Permitted(4));
        assert_eq!(permitted.outcome(), "permitted");
        assert!(permitted.denial().is_none());

        let denied: Decision<i32> = Denial::conflict("already").into();
        assert_eq!(denied.outcome(), "conflict");
        assert_eq!(denied.kind(), Some(DenialKind::Conflict));
        assert!(!denied.is_permitted());
    }
}
