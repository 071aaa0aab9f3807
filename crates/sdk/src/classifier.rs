//! Response classification.
//!
//! Maps a precheck status to what the engine does next. The mapping is a fixed table: any status
//! not listed, including codes this client does not recognize, is fatal.

use std::fmt;

use hiero_types::Status;

/// What the engine does with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Terminal; decode the payload.
    Success,
    /// Node-local congestion. Back off and retry the same node.
    RetryableSameNode,
    /// The node cannot serve this request soon. Rotate to another node without sleeping.
    RetryableDifferentNode,
    /// The request is invalid. Never retried.
    Fatal,
}

impl Outcome {
    /// Returns true for either retryable outcome.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::RetryableSameNode | Self::RetryableDifferentNode)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::RetryableSameNode => write!(f, "retry_same_node"),
            Self::RetryableDifferentNode => write!(f, "retry_different_node"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Classifies a precheck status.
#[must_use]
pub const fn classify(status: Status) -> Outcome {
    match status.normalized() {
        Status::Ok | Status::Success => Outcome::Success,

        Status::Busy | Status::PlatformTransactionNotCreated | Status::ThrottledAtConsensus => {
            Outcome::RetryableSameNode
        },

        Status::PlatformNotActive | Status::InvalidNodeAccount => Outcome::RetryableDifferentNode,

        _ => Outcome::Fatal,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_success_statuses() {
        assert_eq!(classify(Status::Ok), Outcome::Success);
        assert_eq!(classify(Status::Success), Outcome::Success);
    }

    #[test]
    fn test_same_node_statuses() {
        for status in
            [Status::Busy, Status::PlatformTransactionNotCreated, Status::ThrottledAtConsensus]
        {
            assert_eq!(classify(status), Outcome::RetryableSameNode, "{status}");
        }
    }

    #[test]
    fn test_different_node_statuses() {
        assert_eq!(classify(Status::PlatformNotActive), Outcome::RetryableDifferentNode);
        assert_eq!(classify(Status::InvalidNodeAccount), Outcome::RetryableDifferentNode);
    }

    #[test]
    fn test_fatal_statuses() {
        for status in [
            Status::InvalidSignature,
            Status::InsufficientPayerBalance,
            Status::DuplicateTransaction,
            Status::PayerAccountNotFound,
            Status::TransactionExpired,
            Status::Unknown,
            Status::ReceiptNotFound,
        ] {
            assert_eq!(classify(status), Outcome::Fatal, "{status}");
        }
    }

    #[test]
    fn test_unrecognized_fails_closed() {
        assert_eq!(classify(Status::from_code(99_999)), Outcome::Fatal);
        assert_eq!(classify(Status::from_code(-1)), Outcome::Fatal);
    }

    #[test]
    fn test_raw_known_code_classifies_like_named_variant() {
        assert_eq!(classify(Status::Unrecognized(12)), Outcome::RetryableSameNode);
        assert_eq!(classify(Status::Unrecognized(3)), Outcome::RetryableDifferentNode);
        assert_eq!(classify(Status::Unrecognized(22)), Outcome::Success);
    }

    #[test]
    fn test_table_is_total_over_known_statuses() {
        let retryable = Status::ALL.iter().filter(|s| classify(**s).is_retryable()).count();
        let success = Status::ALL.iter().filter(|s| classify(**s) == Outcome::Success).count();
        assert_eq!(retryable, 5);
        assert_eq!(success, 2);
    }

    proptest! {
        #[test]
        fn prop_unknown_codes_are_fatal(code in any::<i32>()) {
            let status = Status::from_code(code);
            if matches!(status, Status::Unrecognized(_)) {
                prop_assert_eq!(classify(status), Outcome::Fatal);
            }
        }
    }
}
