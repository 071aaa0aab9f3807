//! Protobuf types and conversions for Hiero ledger clients.
//!
//! This crate provides:
//! - Protobuf message types for the transaction and receipt/record query path ([`proto`])
//! - Bidirectional conversions between domain types and proto types ([`convert`])
//! - [`ProtobufBytes`], the byte-level encoding of ids and transaction ids

/// Protobuf message types.
pub mod proto {
    #![allow(clippy::all)]
    #![allow(missing_docs)]

    include!("generated/proto.rs");

    impl response::Response {
        /// Returns the header of whichever response variant is present.
        #[must_use]
        pub fn header(&self) -> Option<&ResponseHeader> {
            match self {
                Self::TransactionGetReceipt(r) => r.header.as_ref(),
                Self::TransactionGetRecord(r) => r.header.as_ref(),
            }
        }
    }

    impl query::Query {
        /// Returns the header of whichever query variant is present.
        #[must_use]
        pub fn header(&self) -> Option<&QueryHeader> {
            match self {
                Self::TransactionGetReceipt(q) => q.header.as_ref(),
                Self::TransactionGetRecord(q) => q.header.as_ref(),
            }
        }
    }
}

/// Bidirectional conversions between domain and protobuf types.
pub mod convert;

pub use convert::{ConvertError, ProtobufBytes};
