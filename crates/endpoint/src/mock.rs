//! In-process mock endpoint.
//!
//! Stands in for the production messaging infrastructure during tests and
//! demos: delivery happens synchronously within the caller's execution
//! context, in order, with per-channel nonce bookkeeping. A channel is
//! unconfigured until [`MockEndpoint::set_dest_endpoint`] registers the
//! destination; sends to an unconfigured channel are rejected.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use omnioft_types::{EndpointId, MessageReceipt, MessagingFee, TrustedPath};

use crate::{EndpointError, MessageReceiver, Transport};

/// Relayer fee schedule used for fee quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeConfig {
    pub base_fee: U256,
    pub per_byte_fee: U256,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            base_fee: U256::from(250_000_000_000_000u64),
            per_byte_fee: U256::from(10_000_000_000u64),
        }
    }
}

#[derive(Default)]
struct EndpointState {
    /// Remote token endpoint address -> endpoint instance on that chain.
    dest_endpoints: HashMap<Address, Arc<MockEndpoint>>,
    /// Local token endpoint address -> inbound handler. Held weakly so the
    /// endpoint does not keep dropped tokens alive.
    receivers: HashMap<Address, Weak<dyn MessageReceiver>>,
    /// Next-minus-one outbound nonce per (dst_eid, sender).
    outbound_nonce: HashMap<(EndpointId, Address), u64>,
    /// Last delivered inbound nonce per (src_eid, src_path).
    inbound_nonce: HashMap<(EndpointId, Vec<u8>), u64>,
}

/// Synchronous, in-order messaging endpoint for a single simulated chain.
pub struct MockEndpoint {
    eid: EndpointId,
    fees: FeeConfig,
    state: RwLock<EndpointState>,
}

impl MockEndpoint {
    pub fn new(eid: EndpointId) -> Arc<Self> {
        Self::with_fees(eid, FeeConfig::default())
    }

    pub fn with_fees(eid: EndpointId, fees: FeeConfig) -> Arc<Self> {
        Arc::new(Self {
            eid,
            fees,
            state: RwLock::new(EndpointState::default()),
        })
    }

    /// Moves the channel towards `remote_addr` from unconfigured to
    /// configured by registering the endpoint that serves it.
    pub async fn set_dest_endpoint(&self, remote_addr: Address, endpoint: Arc<MockEndpoint>) {
        debug!(
            eid = self.eid,
            dst_eid = endpoint.eid,
            remote = %remote_addr,
            "configuring destination endpoint"
        );
        self.state
            .write()
            .await
            .dest_endpoints
            .insert(remote_addr, endpoint);
    }

    /// Registers the inbound handler for a local token endpoint.
    pub async fn register_receiver(&self, receiver: Arc<dyn MessageReceiver>) {
        let addr = receiver.local_address();
        debug!(eid = self.eid, addr = %addr, "registering receiver");
        self.state
            .write()
            .await
            .receivers
            .insert(addr, Arc::downgrade(&receiver));
    }

    /// Destination-side half of a delivery: resolves the receiver, checks
    /// ordering and hands over the payload.
    async fn receive_payload(
        &self,
        src_eid: EndpointId,
        src_path: Vec<u8>,
        dst_addr: Address,
        nonce: u64,
        payload: Vec<u8>,
    ) -> Result<(), EndpointError> {
        let receiver = {
            let mut state = self.state.write().await;

            let expected = state
                .inbound_nonce
                .get(&(src_eid, src_path.clone()))
                .copied()
                .unwrap_or(0)
                + 1;
            if nonce != expected {
                return Err(EndpointError::OutOfOrder { expected, got: nonce });
            }
            state.inbound_nonce.insert((src_eid, src_path.clone()), nonce);

            state
                .receivers
                .get(&dst_addr)
                .and_then(Weak::upgrade)
                .ok_or(EndpointError::ReceiverNotRegistered { addr: dst_addr })?
        };

        receiver
            .on_receive(src_eid, &src_path, nonce, &payload)
            .await
            .map_err(|source| EndpointError::Delivery {
                addr: dst_addr,
                source,
            })
    }
}

#[async_trait]
impl Transport for MockEndpoint {
    fn eid(&self) -> EndpointId {
        self.eid
    }

    fn estimate_fee(
        &self,
        _dst_eid: EndpointId,
        payload_len: usize,
        pay_in_zro: bool,
        _adapter_params: &[u8],
    ) -> Result<MessagingFee, EndpointError> {
        if pay_in_zro {
            return Err(EndpointError::ZroPaymentUnsupported);
        }
        let native_fee = self.fees.base_fee + self.fees.per_byte_fee * U256::from(payload_len);
        Ok(MessagingFee {
            native_fee,
            zro_fee: U256::ZERO,
        })
    }

    async fn send(
        &self,
        from: Address,
        dst_eid: EndpointId,
        path: &[u8],
        payload: Vec<u8>,
        refund_address: Address,
        value: U256,
    ) -> Result<MessageReceipt, EndpointError> {
        let fee = self.estimate_fee(dst_eid, payload.len(), false, &[])?;
        if value < fee.native_fee {
            return Err(EndpointError::InsufficientFee {
                required: fee.native_fee,
                provided: value,
            });
        }

        let path = TrustedPath::decode(path)?;

        let (dest, nonce) = {
            let mut state = self.state.write().await;
            let dest = state
                .dest_endpoints
                .get(&path.remote)
                .cloned()
                .ok_or(EndpointError::ChannelUnconfigured { eid: dst_eid })?;
            let nonce = state
                .outbound_nonce
                .entry((dst_eid, from))
                .and_modify(|n| *n += 1)
                .or_insert(1);
            (dest, *nonce)
        };

        info!(
            src_eid = self.eid,
            dst_eid,
            nonce,
            from = %from,
            to = %path.remote,
            bytes = payload.len(),
            "relaying message"
        );

        // The receiver validates the channel from its own perspective, so
        // the delivered path lists the source endpoint first.
        let delivered_path = path.flipped().encode();
        dest.receive_payload(self.eid, delivered_path, path.remote, nonce, payload)
            .await?;

        Ok(MessageReceipt {
            nonce,
            native_fee: fee.native_fee,
            refund: value - fee.native_fee,
        })
    }
}
