use std::time::Duration;

use serde::Serialize;

/// Why a relay query did not produce a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Query cancelled")]
    Cancelled,

    #[error("Relay error: {0}")]
    Relay(String),

    #[error("Malformed input: {0}")]
    Malformed(String),
}

/// Result of a best-effort query.
///
/// Queries never fail outward. On error the value is the degraded default
/// (or the last cached value) and `failure` carries the reason, so callers
/// can tell "nothing there" from "could not ask".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<QueryError>,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            failure: None,
        }
    }

    pub fn degraded(value: T, failure: QueryError) -> Self {
        Self {
            value,
            failure: Some(failure),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default> Outcome<T> {
    /// Degrade to `T::default()`.
    pub fn fallback(failure: QueryError) -> Self {
        Self::degraded(T::default(), failure)
    }
}

impl<T: Default> From<Result<T, QueryError>> for Outcome<T> {
    fn from(result: Result<T, QueryError>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::fallback(e),
        }
    }
}

fn serialize_failure<S>(failure: &Option<QueryError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match failure {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_uses_default_value() {
        let outcome: Outcome<Vec<String>> = Outcome::fallback(QueryError::Cancelled);
        assert!(outcome.is_degraded());
        assert!(outcome.value.is_empty());
    }

    #[test]
    fn test_from_result() {
        let ok: Outcome<u64> = Ok(3).into();
        assert_eq!(ok, Outcome::ok(3));

        let err: Outcome<u64> = Err(QueryError::Relay("closed".to_string())).into();
        assert_eq!(err.value, 0);
        assert_eq!(err.failure, Some(QueryError::Relay("closed".to_string())));
    }

    #[test]
    fn test_failure_serializes_as_message() {
        let outcome: Outcome<u64> = Outcome::fallback(QueryError::Timeout(Duration::from_millis(3000)));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["value"], 0);
        assert_eq!(json["failure"], "Query timed out after 3s");
    }
}
