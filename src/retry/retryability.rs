//! Per-status-code retryability of remote failures.

use super::error::OperationError;
use regex::Regex;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// RemoteError is a failed remote call as the transport reports it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote call failed with status {code}: {message}")]
pub struct RemoteError {
    pub code: u16,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        RemoteError {
            code,
            message: message.into(),
        }
    }
}

/// Retryability is the retry policy for one status code.
///
/// A failure is retried only while all three hold: the code is marked
/// retryable, the message matches the pattern, and less than `timeout` has
/// passed since the first attempt.
#[derive(Debug, Clone)]
pub struct Retryability {
    pub retryable: bool,
    /// `None` matches every message.
    pub pattern: Option<Regex>,
    pub timeout: Duration,
}

impl Retryability {
    /// An empty pattern matches every message.
    pub fn new(retryable: bool, pattern: &str, timeout: Duration) -> Result<Self, regex::Error> {
        let pattern = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern)?)
        };
        Ok(Retryability {
            retryable,
            pattern,
            timeout,
        })
    }

    /// Retries any message for up to `timeout`.
    pub fn always(timeout: Duration) -> Self {
        Retryability {
            retryable: true,
            pattern: None,
            timeout,
        }
    }

    pub fn never() -> Self {
        Retryability {
            retryable: false,
            pattern: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn allows(&self, message: &str, elapsed: Duration) -> bool {
        self.retryable
            && self.pattern.as_ref().map_or(true, |p| p.is_match(message))
            && elapsed < self.timeout
    }
}

/// RetryabilityTable maps status codes to their [`Retryability`]. Codes not
/// in the table are never retried.
#[derive(Debug, Clone)]
pub struct RetryabilityTable {
    codes: BTreeMap<u16, Retryability>,
}

impl RetryabilityTable {
    /// An empty table; nothing is retried.
    pub fn new() -> Self {
        RetryabilityTable {
            codes: BTreeMap::new(),
        }
    }

    pub fn with(mut self, code: u16, retryability: Retryability) -> Self {
        self.codes.insert(code, retryability);
        self
    }

    pub fn insert(&mut self, code: u16, retryability: Retryability) {
        self.codes.insert(code, retryability);
    }

    pub fn get(&self, code: u16) -> Option<&Retryability> {
        self.codes.get(&code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn is_retryable(&self, code: u16, message: &str, elapsed: Duration) -> bool {
        self.get(code).is_some_and(|r| r.allows(message, elapsed))
    }

    /// Turns a remote failure into the matching operation outcome: not done
    /// when it may be retried, failed otherwise.
    pub fn classify(&self, err: RemoteError, elapsed: Duration) -> OperationError {
        if self.is_retryable(err.code, &err.message, elapsed) {
            OperationError::not_done_with(err)
        } else {
            OperationError::failed(err)
        }
    }
}

/// The default table retries throttling and transient server errors.
impl Default for RetryabilityTable {
    fn default() -> Self {
        let transient = Retryability::always(Duration::from_secs(5 * 60));
        RetryabilityTable::new()
            .with(429, Retryability::always(Duration::from_secs(10 * 60)))
            .with(500, transient.clone())
            .with(502, transient.clone())
            .with(503, transient.clone())
            .with(504, transient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_all_conditions_required() {
        let r = Retryability::new(true, "^operation in progress", secs(60)).unwrap();
        assert!(r.allows("operation in progress on instance i", secs(10)));
        assert!(!r.allows("quota exceeded", secs(10)));
        assert!(!r.allows("operation in progress", secs(60)));

        let off = Retryability::new(false, "", secs(60)).unwrap();
        assert!(!off.allows("anything", Duration::ZERO));
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let r = Retryability::new(true, "", secs(1)).unwrap();
        assert!(r.pattern.is_none());
        assert!(r.allows("", Duration::ZERO));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Retryability::new(true, "(", secs(1)).is_err());
    }

    #[test]
    fn test_unknown_codes_are_not_retried() {
        let table = RetryabilityTable::new().with(409, Retryability::always(secs(30)));
        assert!(table.is_retryable(409, "conflict", secs(1)));
        assert!(!table.is_retryable(404, "not found", secs(1)));
    }

    #[test]
    fn test_default_table() {
        let table = RetryabilityTable::default();
        assert_eq!(table.len(), 5);
        assert!(table.is_retryable(503, "unavailable", secs(10)));
        assert!(!table.is_retryable(503, "unavailable", secs(301)));
        assert!(table.is_retryable(429, "rate limited", secs(301)));
        assert!(!table.is_retryable(400, "bad request", Duration::ZERO));
    }

    #[test]
    fn test_classify() {
        let table = RetryabilityTable::default();
        let outcome = table.classify(RemoteError::new(503, "backend unavailable"), secs(1));
        assert!(outcome.is_not_done());
        assert_eq!(
            outcome.to_string(),
            "operation not done: remote call failed with status 503: backend unavailable"
        );

        let outcome = table.classify(RemoteError::new(404, "not found"), secs(1));
        assert!(!outcome.is_not_done());
    }
}
