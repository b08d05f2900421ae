//! Four SDK Error Types
//!
//! This module defines the custom error types used throughout the SDK.
//! It leverages the `thiserror` crate for deriving the `Error` trait and
//! providing formatted error messages.

use alloy::primitives::{TxHash, B256};
use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Enumerates the various error types that can occur during SDK operations
#[derive(Error, Debug)]
pub enum FourError {
    /// Represents errors that occur when interacting with the blockchain provider
    #[error("Provider error: {0}")]
    Provider(#[from] RpcError<TransportErrorKind>),

    /// Represents errors raised by contract calls (reverts, return decoding)
    #[error("Contract error: {0}")]
    Contract(#[from] alloy::contract::Error),

    /// Represents errors raised while constructing a local signer
    #[error("Signer error: {0}")]
    Signer(#[from] alloy::signers::local::LocalSignerError),

    /// Unable to parse endpoint
    #[error("Failed to parse endpoint into URL")]
    ParseEndpoint,

    /// Websocket endpoint is not set
    #[error("Websocket endpoint not set")]
    WsEndpointNotSet,

    /// A log scan could not make progress even at the minimum chunk size
    #[error("Log scan failed at block {block}: {source}")]
    ScanFailed {
        block: u64,
        #[source]
        source: RpcError<TransportErrorKind>,
    },

    /// A block range whose start exceeds its end
    #[error("Invalid block range: {from} > {to}")]
    InvalidRange { from: u64, to: u64 },

    /// Slippage tolerance outside 0..=100
    #[error("Slippage percent must be at most 100, got {0}")]
    InvalidSlippage(u8),

    /// Unit conversion failures when parsing decimal amounts
    #[error("Amount parse error: {0}")]
    ParseAmount(#[from] alloy::primitives::utils::UnitsError),

    /// The transaction was not mined within the polling window
    #[error("Transaction {0} not mined within the timeout")]
    ReceiptTimeout(TxHash),

    /// A raw log could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Failures while decoding a raw log into a typed event.
///
/// These are soft errors: scanners and streams drop the offending log and
/// keep going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// topic0 does not match any known event signature
    #[error("Unrecognized event topic {0}")]
    UnrecognizedTopic(B256),

    /// The log carries no topics at all
    #[error("Log has no topics")]
    NoTopics,

    /// An indexed parameter the schema requires is absent
    #[error("Missing indexed topic at position {0}")]
    MissingTopic(usize),

    /// The data payload ends before the schema's last word
    #[error("Payload too short: needed {needed} bytes, have {have}")]
    ShortPayload { needed: usize, have: usize },

    /// A string field holds bytes that are not valid UTF-8
    #[error("Field `{0}` is not valid UTF-8")]
    InvalidUtf8(&'static str),

    /// A numeric field does not fit its target type
    #[error("Field `{0}` exceeds its numeric range")]
    ValueOverflow(&'static str),

    /// Pending logs carry no block number or transaction hash
    #[error("Log is missing block number or transaction hash")]
    MissingMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_fold_into_the_sdk_error() {
        let err = FourError::from(DecodeError::NoTopics);
        assert!(matches!(err, FourError::Decode(DecodeError::NoTopics)));
        assert_eq!(err.to_string(), "Decode error: Log has no topics");
    }
}
