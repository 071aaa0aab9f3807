// Protobuf messages for the Hiero client request/response path.
//
// Field numbers and types follow the network's HAPI definitions. Only the messages and fields
// the client execution path reads or writes are declared; prost skips unknown fields on decode.

/// An instant in time since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

/// A length of time in whole seconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Duration {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct AccountId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "account_id::Account", tags = "3, 4")]
    pub account: ::core::option::Option<account_id::Account>,
}

/// Nested message and enum types in `AccountId`.
pub mod account_id {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Account {
        #[prost(int64, tag = "3")]
        AccountNum(i64),
        #[prost(bytes, tag = "4")]
        Alias(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TokenId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub token_num: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct FileId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub file_num: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TopicId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub topic_num: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ScheduleId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub schedule_num: i64,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ContractId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "contract_id::Contract", tags = "3, 4")]
    pub contract: ::core::option::Option<contract_id::Contract>,
}

/// Nested message and enum types in `ContractId`.
pub mod contract_id {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Contract {
        #[prost(int64, tag = "3")]
        ContractNum(i64),
        #[prost(bytes, tag = "4")]
        EvmAddress(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionId {
    #[prost(message, optional, tag = "1")]
    pub transaction_valid_start: ::core::option::Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(bool, tag = "3")]
    pub scheduled: bool,
    #[prost(int32, tag = "4")]
    pub nonce: i32,
}

// --- Signatures and the transaction envelope ---

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SignaturePair {
    #[prost(bytes = "vec", tag = "1")]
    pub pub_key_prefix: ::prost::alloc::vec::Vec<u8>,
    #[prost(oneof = "signature_pair::Signature", tags = "2, 3, 4, 5, 6")]
    pub signature: ::core::option::Option<signature_pair::Signature>,
}

/// Nested message and enum types in `SignaturePair`.
pub mod signature_pair {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Signature {
        #[prost(bytes, tag = "2")]
        Contract(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes, tag = "3")]
        Ed25519(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes, tag = "4")]
        Rsa3072(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes, tag = "5")]
        Ecdsa384(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes, tag = "6")]
        EcdsaSecp256k1(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SignatureMap {
    #[prost(message, repeated, tag = "1")]
    pub sig_pair: ::prost::alloc::vec::Vec<SignaturePair>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SignedTransaction {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub sig_map: ::core::option::Option<SignatureMap>,
}

/// The outer transaction envelope sent to a node.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Transaction {
    #[prost(bytes = "vec", tag = "5")]
    pub signed_transaction_bytes: ::prost::alloc::vec::Vec<u8>,
}

/// Fields common to every transaction body.
///
/// The operation-specific field is appended by the transaction's encoder as a raw protobuf
/// field; decoding this message skips it.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(message, optional, tag = "2")]
    pub node_account_id: ::core::option::Option<AccountId>,
    #[prost(uint64, tag = "3")]
    pub transaction_fee: u64,
    #[prost(message, optional, tag = "4")]
    pub transaction_valid_duration: ::core::option::Option<Duration>,
    #[prost(string, tag = "6")]
    pub memo: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct AccountAmount {
    #[prost(message, optional, tag = "1")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(sint64, tag = "2")]
    pub amount: i64,
    #[prost(bool, tag = "3")]
    pub is_approval: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransferList {
    #[prost(message, repeated, tag = "1")]
    pub account_amounts: ::prost::alloc::vec::Vec<AccountAmount>,
}

/// Body of a hbar transfer; field 14 of `TransactionBody`.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct CryptoTransferTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transfers: ::core::option::Option<TransferList>,
}

/// Field number of `CryptoTransferTransactionBody` within `TransactionBody`.
pub const TRANSACTION_BODY_CRYPTO_TRANSFER_TAG: u32 = 14;

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionResponse {
    #[prost(int32, tag = "1")]
    pub node_transaction_precheck_code: i32,
    #[prost(uint64, tag = "2")]
    pub cost: u64,
}

// --- Queries ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ResponseType {
    AnswerOnly = 0,
    AnswerStateProof = 1,
    CostAnswer = 2,
    CostAnswerStateProof = 3,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct QueryHeader {
    #[prost(message, optional, tag = "1")]
    pub payment: ::core::option::Option<Transaction>,
    #[prost(enumeration = "ResponseType", tag = "2")]
    pub response_type: i32,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ResponseHeader {
    #[prost(int32, tag = "1")]
    pub node_transaction_precheck_code: i32,
    #[prost(enumeration = "ResponseType", tag = "2")]
    pub response_type: i32,
    #[prost(uint64, tag = "3")]
    pub cost: u64,
    #[prost(bytes = "vec", tag = "4")]
    pub state_proof: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionGetReceiptQuery {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(bool, tag = "3")]
    pub include_duplicates: bool,
    #[prost(bool, tag = "4")]
    pub include_child_receipts: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionGetRecordQuery {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(bool, tag = "3")]
    pub include_duplicates: bool,
    #[prost(bool, tag = "4")]
    pub include_child_records: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Query {
    #[prost(oneof = "query::Query", tags = "14, 15")]
    pub query: ::core::option::Option<query::Query>,
}

/// Nested message and enum types in `Query`.
pub mod query {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Query {
        #[prost(message, tag = "14")]
        TransactionGetReceipt(super::TransactionGetReceiptQuery),
        #[prost(message, tag = "15")]
        TransactionGetRecord(super::TransactionGetRecordQuery),
    }
}

// --- Receipts and records ---

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionReceipt {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(message, optional, tag = "2")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(message, optional, tag = "3")]
    pub file_id: ::core::option::Option<FileId>,
    #[prost(message, optional, tag = "4")]
    pub contract_id: ::core::option::Option<ContractId>,
    #[prost(message, optional, tag = "6")]
    pub topic_id: ::core::option::Option<TopicId>,
    #[prost(uint64, tag = "7")]
    pub topic_sequence_number: u64,
    #[prost(bytes = "vec", tag = "8")]
    pub topic_running_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "10")]
    pub token_id: ::core::option::Option<TokenId>,
    #[prost(uint64, tag = "11")]
    pub new_total_supply: u64,
    #[prost(message, optional, tag = "12")]
    pub schedule_id: ::core::option::Option<ScheduleId>,
    #[prost(message, optional, tag = "13")]
    pub scheduled_transaction_id: ::core::option::Option<TransactionId>,
    #[prost(int64, repeated, tag = "14")]
    pub serial_numbers: ::prost::alloc::vec::Vec<i64>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionGetReceiptResponse {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ResponseHeader>,
    #[prost(message, optional, tag = "2")]
    pub receipt: ::core::option::Option<TransactionReceipt>,
    #[prost(message, repeated, tag = "4")]
    pub duplicate_transaction_receipts: ::prost::alloc::vec::Vec<TransactionReceipt>,
    #[prost(message, repeated, tag = "5")]
    pub child_transaction_receipts: ::prost::alloc::vec::Vec<TransactionReceipt>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionRecord {
    #[prost(message, optional, tag = "1")]
    pub receipt: ::core::option::Option<TransactionReceipt>,
    #[prost(bytes = "vec", tag = "2")]
    pub transaction_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub consensus_timestamp: ::core::option::Option<Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(string, tag = "5")]
    pub memo: ::prost::alloc::string::String,
    #[prost(uint64, tag = "6")]
    pub transaction_fee: u64,
    #[prost(message, optional, tag = "10")]
    pub transfer_list: ::core::option::Option<TransferList>,
    #[prost(message, optional, tag = "12")]
    pub schedule_ref: ::core::option::Option<ScheduleId>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionGetRecordResponse {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ResponseHeader>,
    #[prost(message, optional, tag = "3")]
    pub transaction_record: ::core::option::Option<TransactionRecord>,
    #[prost(message, repeated, tag = "4")]
    pub duplicate_transaction_records: ::prost::alloc::vec::Vec<TransactionRecord>,
    #[prost(message, repeated, tag = "5")]
    pub child_transaction_records: ::prost::alloc::vec::Vec<TransactionRecord>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Response {
    #[prost(oneof = "response::Response", tags = "14, 15")]
    pub response: ::core::option::Option<response::Response>,
}

/// Nested message and enum types in `Response`.
pub mod response {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Response {
        #[prost(message, tag = "14")]
        TransactionGetReceipt(super::TransactionGetReceiptResponse),
        #[prost(message, tag = "15")]
        TransactionGetRecord(super::TransactionGetRecordResponse),
    }
}
