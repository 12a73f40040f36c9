//! Omnichain fungible token endpoints.
//!
//! Two flavors share one core:
//! - [`ProxyToken`] wraps a base asset on the "home" chain: deposits are
//!   paid 1:1 in native value, outbound sends lock tokens in the proxy's
//!   own escrow, inbound messages release them.
//! - [`OmniToken`] lives on every other chain: inbound messages mint
//!   bridged supply, outbound sends burn it.
//!
//! Supply is conserved across a full round trip: whatever is escrowed at
//! home equals whatever is minted remotely.

mod core;
mod error;
mod ledger;
mod omni;
mod proxy;

pub use crate::core::OftCore;
pub use error::TokenError;
pub use ledger::Ledger;
pub use omni::OmniToken;
pub use proxy::ProxyToken;
