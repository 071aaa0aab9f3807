//! SDK error taxonomy.
//!
//! Two failure shapes matter most to callers:
//! - [`SdkError::PrecheckStatus`]: a node rejected the request before the ledger executed it.
//! - [`SdkError::ReceiptStatus`]: the ledger executed the transaction and its receipt reports a
//!   failure.
//!
//! Transient node trouble never reaches the caller directly. The engine absorbs it until the
//! attempt budget or deadline runs out, then reports [`SdkError::MaxAttemptsExceeded`] or
//! [`SdkError::Timeout`] with the last node and status seen.

use hiero_types::{AccountId, ChecksumError, IdError, Status, TransactionId};
use serde::Serialize;
use snafu::{Location, Snafu};

use crate::connection::TransportError;

/// Result type alias for SDK operations.
pub type Result<T, E = SdkError> = std::result::Result<T, E>;

/// SDK error types with context-rich error messages.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SdkError {
    /// An id string or byte form could not be parsed.
    #[snafu(display("Malformed id: {source}"))]
    MalformedId {
        /// Parse failure.
        source: IdError,
    },

    /// An id carries a checksum for a different ledger.
    #[snafu(display("Checksum validation failed: {source}"))]
    Checksum {
        /// Mismatch details.
        source: ChecksumError,
    },

    /// A node rejected the request during precheck.
    #[snafu(display(
        "transaction {} failed precheck with status {status} against node account id {node}",
        display_transaction_id(transaction_id.as_ref())
    ))]
    PrecheckStatus {
        /// Precheck status returned by the node.
        status: Status,
        /// Transaction the request was about, if any.
        transaction_id: Option<TransactionId>,
        /// Node that answered.
        node: AccountId,
    },

    /// The ledger executed the transaction and it failed.
    #[snafu(display(
        "receipt for transaction {} contained error status {status}",
        display_transaction_id(transaction_id.as_ref())
    ))]
    ReceiptStatus {
        /// Terminal receipt status.
        status: Status,
        /// Transaction the receipt belongs to.
        transaction_id: Option<TransactionId>,
    },

    /// Dispatch to a node failed at the transport level.
    #[snafu(display("Connectivity error with node {node}: {source}"))]
    Connectivity {
        /// Node that could not be reached.
        node: AccountId,
        /// Transport failure.
        source: TransportError,
    },

    /// The attempt budget ran out.
    #[snafu(display(
        "Max attempts ({attempts}) exceeded for {operation}; last node {}, last status {}",
        display_node(node.as_ref()),
        display_status(*status)
    ))]
    MaxAttemptsExceeded {
        /// Operation that was executing.
        operation: &'static str,
        /// Attempts made.
        attempts: u32,
        /// Last node tried.
        node: Option<AccountId>,
        /// Last classified status, absent when the last attempt never got an answer.
        status: Option<Status>,
        /// Transaction the request was about, if any.
        transaction_id: Option<TransactionId>,
        /// Message of the last absorbed error.
        last_error: Option<String>,
    },

    /// The execution deadline passed.
    #[snafu(display(
        "{operation} timed out after {elapsed_ms}ms ({attempts} attempts); last node {}, last status {}",
        display_node(node.as_ref()),
        display_status(*status)
    ))]
    Timeout {
        /// Operation that was executing.
        operation: &'static str,
        /// Time spent before giving up.
        elapsed_ms: u64,
        /// Attempts made.
        attempts: u32,
        /// Last node tried.
        node: Option<AccountId>,
        /// Last classified status.
        status: Option<Status>,
        /// Transaction the request was about, if any.
        transaction_id: Option<TransactionId>,
    },

    /// The caller cancelled the execution.
    #[snafu(display("Operation cancelled"))]
    Cancelled,

    /// The signer failed to produce a signature.
    #[snafu(display("Signing with key {key} failed: {message}"))]
    Signing {
        /// Hex public key that was asked to sign.
        key: String,
        /// Signer failure description.
        message: String,
    },

    /// A required signature could not be produced.
    #[snafu(display("{operation} requires a signature from {key} but no signer holds it"))]
    MissingSignature {
        /// Operation being executed.
        operation: &'static str,
        /// Hex public key of the missing signer, or a description of what is missing.
        key: String,
    },

    /// The request could not be frozen.
    #[snafu(display("Freeze failed at {location}: {message}"))]
    Freeze {
        /// Error description.
        message: String,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// A response could not be decoded.
    #[snafu(display("Decode error at {location}: {message}"))]
    Decode {
        /// Error description.
        message: String,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// Configuration validation error.
    #[snafu(display("Configuration error: {message}"))]
    Config {
        /// Error description.
        message: String,
    },
}

fn display_transaction_id(id: Option<&TransactionId>) -> String {
    id.map_or_else(|| "<none>".to_owned(), ToString::to_string)
}

fn display_node(node: Option<&AccountId>) -> String {
    node.map_or_else(|| "<none>".to_owned(), ToString::to_string)
}

fn display_status(status: Option<Status>) -> String {
    status.map_or_else(|| "<none>".to_owned(), |s| s.to_string())
}

impl SdkError {
    /// Returns true if the error is transient.
    ///
    /// Only transport failures are retryable; the engine rotates nodes on them and never
    /// surfaces them directly. Everything else requires caller action.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connectivity { .. } => true,
            Self::MalformedId { .. }
            | Self::Checksum { .. }
            | Self::PrecheckStatus { .. }
            | Self::ReceiptStatus { .. }
            | Self::MaxAttemptsExceeded { .. }
            | Self::Timeout { .. }
            | Self::Cancelled
            | Self::Signing { .. }
            | Self::MissingSignature { .. }
            | Self::Freeze { .. }
            | Self::Decode { .. }
            | Self::Config { .. } => false,
        }
    }

    /// Returns a stable label for metrics.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MalformedId { .. } => "malformed_id",
            Self::Checksum { .. } => "checksum",
            Self::PrecheckStatus { .. } => "precheck_status",
            Self::ReceiptStatus { .. } => "receipt_status",
            Self::Connectivity { .. } => "connectivity",
            Self::MaxAttemptsExceeded { .. } => "max_attempts_exceeded",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Signing { .. } => "signing",
            Self::MissingSignature { .. } => "missing_signature",
            Self::Freeze { .. } => "freeze",
            Self::Decode { .. } => "decode",
            Self::Config { .. } => "config",
        }
    }

    /// Returns the status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::PrecheckStatus { status, .. } | Self::ReceiptStatus { status, .. } => Some(*status),
            Self::MaxAttemptsExceeded { status, .. } | Self::Timeout { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the transaction id carried by the error, if any.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        match self {
            Self::PrecheckStatus { transaction_id, .. }
            | Self::ReceiptStatus { transaction_id, .. }
            | Self::MaxAttemptsExceeded { transaction_id, .. }
            | Self::Timeout { transaction_id, .. } => transaction_id.as_ref(),
            _ => None,
        }
    }

    /// Returns the node the error is attributed to, if any.
    #[must_use]
    pub fn node(&self) -> Option<AccountId> {
        match self {
            Self::PrecheckStatus { node, .. } | Self::Connectivity { node, .. } => Some(*node),
            Self::MaxAttemptsExceeded { node, .. } | Self::Timeout { node, .. } => *node,
            _ => None,
        }
    }

    /// Renders the error as a serializable report.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        let name = match self {
            Self::PrecheckStatus { .. } => "StatusError",
            Self::ReceiptStatus { .. } => "ReceiptStatusError",
            Self::MaxAttemptsExceeded { .. } => "MaxAttemptsExceededError",
            Self::Timeout { .. } => "TimeoutError",
            Self::MalformedId { .. } => "MalformedIdError",
            Self::Checksum { .. } => "ChecksumError",
            _ => "SdkError",
        };

        ErrorReport {
            name,
            status: self.status().map(|s| s.to_string()),
            transaction_id: self.transaction_id().map(ToString::to_string),
            node_id: self.node().map(|n| n.to_string()),
            message: self.to_string(),
        }
    }
}

/// Serializable summary of an [`SdkError`] for logs and API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Error kind.
    pub name: &'static str,
    /// Status name, if the error carries one.
    pub status: Option<String>,
    /// Transaction id text, if the error carries one.
    pub transaction_id: Option<String>,
    /// Node account id text, if the error carries one.
    pub node_id: Option<String>,
    /// Display message.
    pub message: String,
}

impl From<IdError> for SdkError {
    fn from(source: IdError) -> Self {
        Self::MalformedId { source }
    }
}

impl From<ChecksumError> for SdkError {
    fn from(source: ChecksumError) -> Self {
        Self::Checksum { source }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use hiero_types::{LedgerId, Timestamp};

    use super::*;

    fn tx_id() -> TransactionId {
        TransactionId::with_valid_start(AccountId::new(0, 0, 1001), Timestamp::new(1_700_000_000, 5))
    }

    #[test]
    fn test_precheck_message_names_transaction_status_and_node() {
        let err = SdkError::PrecheckStatus {
            status: Status::InsufficientPayerBalance,
            transaction_id: Some(tx_id()),
            node: AccountId::new(0, 0, 3),
        };
        assert_eq!(
            err.to_string(),
            "transaction 0.0.1001@1700000000.000000005 failed precheck with status \
             INSUFFICIENT_PAYER_BALANCE against node account id 0.0.3"
        );
    }

    #[test]
    fn test_only_connectivity_is_retryable() {
        let connectivity = SdkError::Connectivity {
            node: AccountId::new(0, 0, 3),
            source: TransportError::Dispatch { message: "reset".to_owned() },
        };
        assert!(connectivity.is_retryable());

        let precheck = SdkError::PrecheckStatus {
            status: Status::InvalidSignature,
            transaction_id: None,
            node: AccountId::new(0, 0, 3),
        };
        assert!(!precheck.is_retryable());
        assert!(!SdkError::Cancelled.is_retryable());
        assert!(!SdkError::Config { message: "x".to_owned() }.is_retryable());
    }

    #[test]
    fn test_error_type_labels() {
        assert_eq!(SdkError::Cancelled.error_type(), "cancelled");
        let receipt = SdkError::ReceiptStatus { status: Status::FailFee, transaction_id: None };
        assert_eq!(receipt.error_type(), "receipt_status");
        assert_eq!(receipt.status(), Some(Status::FailFee));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let err = SdkError::PrecheckStatus {
            status: Status::Busy,
            transaction_id: Some(tx_id()),
            node: AccountId::new(0, 0, 4),
        };
        let json = serde_json::to_value(err.report()).unwrap();
        assert_eq!(json["name"], "StatusError");
        assert_eq!(json["status"], "BUSY");
        assert_eq!(json["transactionId"], "0.0.1001@1700000000.000000005");
        assert_eq!(json["nodeId"], "0.0.4");
    }

    #[test]
    fn test_timeout_reports_last_node() {
        let err = SdkError::Timeout {
            operation: "TransactionReceiptQuery",
            elapsed_ms: 1000,
            attempts: 3,
            node: Some(AccountId::new(0, 0, 5)),
            status: Some(Status::Busy),
            transaction_id: None,
        };
        assert_eq!(err.node(), Some(AccountId::new(0, 0, 5)));
        assert!(err.to_string().contains("last node 0.0.5"));
        assert!(err.to_string().contains("last status BUSY"));
    }

    #[test]
    fn test_from_checksum_error() {
        let id: AccountId = "0.0.123-vfmkw".parse().unwrap();
        let err: SdkError = id.validate_checksum(&LedgerId::testnet()).unwrap_err().into();
        assert_eq!(err.error_type(), "checksum");
    }
}
