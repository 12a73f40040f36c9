//! Messaging transport seam for the omnioft simulator.
//!
//! Token endpoints never talk to each other directly: they hand an opaque
//! payload to a [`Transport`] and receive inbound payloads through
//! [`MessageReceiver`]. The trait is the boundary between endpoint logic
//! and delivery timing: the in-process [`MockEndpoint`] delivers
//! synchronously, a production transport would deliver asynchronously
//! behind the same interface.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use omnioft_types::{CodecError, EndpointId, MessageReceipt, MessagingFee};

mod mock;

pub use mock::{FeeConfig, MockEndpoint};

/// Errors raised by a messaging endpoint.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("no destination endpoint configured for eid {eid}")]
    ChannelUnconfigured { eid: EndpointId },
    #[error("attached value {provided} is below the required native fee {required}")]
    InsufficientFee { required: U256, provided: U256 },
    #[error("fee-token payment is not supported by this endpoint")]
    ZroPaymentUnsupported,
    #[error("no receiver registered at {addr}")]
    ReceiverNotRegistered { addr: Address },
    #[error("out-of-order delivery: expected nonce {expected}, got {got}")]
    OutOfOrder { expected: u64, got: u64 },
    #[error("malformed remote path")]
    InvalidPath(#[from] CodecError),
    #[error("delivery to {addr} failed")]
    Delivery {
        addr: Address,
        #[source]
        source: anyhow::Error,
    },
}

/// Destination-side handler for inbound payloads.
///
/// Implemented by token endpoints and registered with their local
/// messaging endpoint. `src_path` is the sender-side path seen from the
/// receiver's perspective (source endpoint first).
#[async_trait]
pub trait MessageReceiver: Send + Sync {
    /// Address this receiver is reachable at on its own chain.
    fn local_address(&self) -> Address;

    async fn on_receive(
        &self,
        src_eid: EndpointId,
        src_path: &[u8],
        nonce: u64,
        payload: &[u8],
    ) -> anyhow::Result<()>;
}

/// Source-side message delivery.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Endpoint id of the chain this transport sends from.
    fn eid(&self) -> EndpointId;

    /// Quotes the cost of relaying a payload of `payload_len` bytes.
    fn estimate_fee(
        &self,
        dst_eid: EndpointId,
        payload_len: usize,
        pay_in_zro: bool,
        adapter_params: &[u8],
    ) -> Result<MessagingFee, EndpointError>;

    /// Delivers `payload` to the remote endpoint named by `path`.
    ///
    /// `value` is the native currency attached by the caller; anything
    /// above the quoted fee is reported back as a refund.
    async fn send(
        &self,
        from: Address,
        dst_eid: EndpointId,
        path: &[u8],
        payload: Vec<u8>,
        refund_address: Address,
        value: U256,
    ) -> Result<MessageReceipt, EndpointError>;
}
