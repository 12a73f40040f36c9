//! Wire codec for the cross-chain transfer packet.
//!
//! Layout (big-endian, 41 bytes):
//! `packet_type u8 ++ to_address bytes32 ++ amount_sd u64`
//! The recipient is a left-padded 20-byte account address; the amount is
//! expressed in shared-decimal units.

use alloy_primitives::{Address, B256};

use crate::CodecError;

/// Packet type tag for a token transfer.
pub const PT_SEND: u8 = 0;

/// Encoded length of a transfer packet.
pub const PACKET_LEN: usize = 1 + 32 + 8;

/// A token transfer in flight between two endpoints.
///
/// Created at send time, consumed exactly once at the destination, never
/// persisted after delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPacket {
    /// Destination account, left-padded to 32 bytes.
    pub to: B256,
    /// Amount in shared-decimal units.
    pub amount_sd: u64,
}

impl TransferPacket {
    pub fn new(to: Address, amount_sd: u64) -> Self {
        Self {
            to: to.into_word(),
            amount_sd,
        }
    }

    /// Destination account as a 20-byte address.
    pub fn recipient(&self) -> Address {
        Address::from_word(self.to)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PACKET_LEN);
        out.push(PT_SEND);
        out.extend_from_slice(self.to.as_slice());
        out.extend_from_slice(&self.amount_sd.to_be_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != PACKET_LEN {
            return Err(CodecError::PacketLength { got: bytes.len() });
        }
        if bytes[0] != PT_SEND {
            return Err(CodecError::UnknownPacketType(bytes[0]));
        }
        let to = B256::from_slice(&bytes[1..33]);
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&bytes[33..41]);
        Ok(Self {
            to,
            amount_sd: u64::from_be_bytes(amount),
        })
    }
}
