//! Fuzz target for decoding node responses and serialized queries.
//!
//! Bytes from a node are untrusted. Decoding them as any response the engine reads, or as a
//! serialized query, must never panic.

#![no_main]

use hiero_proto::{ProtobufBytes, proto};
use hiero_sdk::AnyQuery;
use hiero_types::TransactionId;
use libfuzzer_sys::fuzz_target;
use prost::Message;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    match selector % 6 {
        0 => {
            let _ = proto::TransactionResponse::decode(payload);
        },
        1 => {
            if let Ok(response) = proto::Response::decode(payload)
                && let Some(variant) = response.response
            {
                let _ = variant.header().map(proto::ResponseHeader::status);
            }
        },
        2 => {
            let _ = proto::TransactionReceipt::decode(payload).map(|r| r.receipt_status());
        },
        3 => {
            let _ = proto::TransactionRecord::decode(payload);
        },
        4 => {
            if let Ok(query) = AnyQuery::from_bytes(payload) {
                let again = AnyQuery::from_bytes(&query.to_bytes()).unwrap();
                assert_eq!(again, query);
            }
        },
        _ => {
            if let Ok(id) = TransactionId::from_bytes(payload) {
                assert_eq!(TransactionId::from_bytes(&id.to_bytes()).unwrap(), id);
            }
        },
    }
});
