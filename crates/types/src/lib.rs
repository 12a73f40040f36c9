//! Shared primitives for the omnioft bridged-token simulator.
//!
//! Everything that crosses a crate boundary lives here: endpoint ids, the
//! wire packet codec, the trusted-path codec, fee/receipt structs and the
//! shared-decimal conversion helpers.

use alloy_primitives::{Address, U256};

mod packet;
mod path;

pub use packet::{TransferPacket, PACKET_LEN, PT_SEND};
pub use path::{TrustedPath, PATH_LEN};

/// Chain identifier of a messaging endpoint.
pub type EndpointId = u32;

/// Fee quote for relaying one message to a destination chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagingFee {
    /// Cost in the source chain's native currency.
    pub native_fee: U256,
    /// Cost in the fee token, if the caller elected to pay in it.
    pub zro_fee: U256,
}

/// Receipt returned by a successful cross-chain send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageReceipt {
    /// Outbound nonce assigned to the message on its channel.
    pub nonce: u64,
    /// Native fee actually charged.
    pub native_fee: U256,
    /// Excess attached value returned to the refund address.
    pub refund: U256,
}

/// Caller-supplied relay parameters for a send, mirroring the
/// `[refundAddress, zroPaymentAddress, adapterParams]` tuple of the
/// original call surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParams {
    /// Where excess attached value is returned.
    pub refund_address: Address,
    /// Fee-token payer, if paying fees in the fee token. Unsupported by
    /// the mock transport; `None` pays in native currency.
    pub zro_payment_address: Option<Address>,
    /// Opaque relayer parameters, forwarded untouched.
    pub adapter_params: Vec<u8>,
}

impl CallParams {
    /// Plain native-fee parameters with no adapter configuration.
    pub fn native(refund_address: Address) -> Self {
        Self {
            refund_address,
            zro_payment_address: None,
            adapter_params: Vec::new(),
        }
    }
}

/// Errors produced when encoding or decoding wire data.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("packet must be {PACKET_LEN} bytes, got {got}")]
    PacketLength { got: usize },
    #[error("unknown packet type {0:#04x}")]
    UnknownPacketType(u8),
    #[error("trusted path must be {PATH_LEN} bytes, got {got}")]
    PathLength { got: usize },
    #[error("amount does not fit the shared-decimal wire representation")]
    AmountOverflow,
}

/// Conversion rate between local-decimal and shared-decimal units.
///
/// Amounts travel the wire in shared-decimal units; anything below the
/// rate is dust that cannot be represented remotely.
///
/// Callers must pass `shared_decimals <= local_decimals` with a spread
/// that keeps `10^spread` inside `U256` (spread <= 77); token
/// constructors reject inverted pairs before reaching this.
pub fn conversion_rate(local_decimals: u8, shared_decimals: u8) -> U256 {
    debug_assert!(
        shared_decimals <= local_decimals,
        "shared decimals exceed local decimals"
    );
    let spread = local_decimals - shared_decimals;
    debug_assert!(spread <= 77, "decimal spread overflows U256");
    U256::from(10u64).pow(U256::from(spread))
}

/// Truncates an amount down to a multiple of the conversion rate.
pub fn remove_dust(amount: U256, rate: U256) -> U256 {
    amount - amount % rate
}

/// Converts a dust-free local amount into shared-decimal wire units.
pub fn to_shared(amount: U256, rate: U256) -> Result<u64, CodecError> {
    u64::try_from(amount / rate).map_err(|_| CodecError::AmountOverflow)
}

/// Converts shared-decimal wire units back into a local amount.
pub fn from_shared(amount_sd: u64, rate: U256) -> U256 {
    U256::from(amount_sd) * rate
}
