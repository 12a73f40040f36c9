//! Trusted remote path codec.
//!
//! A path is the byte-packed pair `remote_endpoint ++ local_endpoint`
//! (20 + 20 bytes). An endpoint only sends along, and only accepts inbound
//! traffic matching, a configured path.

use alloy_primitives::Address;

use crate::CodecError;

/// Encoded length of a trusted path.
pub const PATH_LEN: usize = 20 + 20;

/// An authorized (remote, local) endpoint address pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustedPath {
    /// Token endpoint on the other chain.
    pub remote: Address,
    /// Token endpoint on this chain.
    pub local: Address,
}

impl TrustedPath {
    pub fn new(remote: Address, local: Address) -> Self {
        Self { remote, local }
    }

    /// The same channel seen from the other side.
    pub fn flipped(&self) -> Self {
        Self {
            remote: self.local,
            local: self.remote,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PATH_LEN);
        out.extend_from_slice(self.remote.as_slice());
        out.extend_from_slice(self.local.as_slice());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != PATH_LEN {
            return Err(CodecError::PathLength { got: bytes.len() });
        }
        Ok(Self {
            remote: Address::from_slice(&bytes[..20]),
            local: Address::from_slice(&bytes[20..]),
        })
    }
}

impl std::fmt::Display for TrustedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.encode()))
    }
}
