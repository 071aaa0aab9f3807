//! Identifier and value types for Hiero ledger clients.
//!
//! This crate provides the leaf types every request and response revolves around:
//! - Checksummed entity ids (`shard.realm.num[-checksum]`) and their typed variants
//! - Ledger identities used for checksum computation
//! - Transaction ids (`payer@seconds.nanos[?scheduled][/nonce]`)
//! - Timestamps, clocks, and valid-start generation
//! - The response status table
//! - Error types using snafu

pub mod checksum;
pub mod clock;
pub mod entity_id;
pub mod error;
pub mod status;
pub mod timestamp;
pub mod transaction_id;

// Re-export commonly used types at crate root
pub use checksum::{Checksum, LedgerId};
pub use clock::{Clock, FixedClock, MAX_VALID_START_JITTER, SystemClock, generate_valid_start};
pub use entity_id::{AccountId, ContractId, EntityId, FileId, ScheduleId, TokenId, TopicId};
pub use error::{ChecksumError, IdError};
pub use status::Status;
pub use timestamp::Timestamp;
pub use transaction_id::TransactionId;
