use alloy_primitives::{Address, U256};
use omnioft_endpoint::EndpointError;
use omnioft_types::{CodecError, EndpointId};

/// Errors raised by a token endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("no trusted remote configured for eid {eid}")]
    NoTrustedRemote { eid: EndpointId },
    #[error("inbound message from untrusted source path on eid {eid}")]
    UntrustedSource { eid: EndpointId },
    #[error("deposit value {provided} does not match amount {expected}")]
    PaymentMismatch { expected: U256, provided: U256 },
    #[error("account {account} holds {balance}, needs {needed}")]
    InsufficientBalance {
        account: Address,
        balance: U256,
        needed: U256,
    },
    #[error("amount truncates to zero at the shared-decimal rate")]
    AmountTooSmall,
    #[error("escrow does not hold the inbound amount")]
    EscrowUnderflow,
    #[error("supply arithmetic overflow")]
    Overflow,
    #[error("shared decimals ({shared}) exceed local decimals ({local})")]
    InvalidDecimals { local: u8, shared: u8 },
    #[error("malformed transfer packet: {0}")]
    InvalidPacket(#[from] CodecError),
    #[error("malformed trusted path: {0}")]
    InvalidPath(CodecError),
    #[error(transparent)]
    Transport(#[from] EndpointError),
}
