//! Plumbing shared by both token flavors: trusted-remote configuration,
//! fee estimation, packet encode/decode and the transport hand-off.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use tokio::sync::RwLock;
use tracing::debug;

use omnioft_endpoint::{EndpointError, Transport};
use omnioft_types::{
    conversion_rate, from_shared, remove_dust, to_shared, CallParams, EndpointId, MessageReceipt,
    MessagingFee, TransferPacket, TrustedPath, PACKET_LEN,
};

use crate::TokenError;

pub struct OftCore {
    transport: Arc<dyn Transport>,
    address: Address,
    rate: U256,
    trusted_remotes: RwLock<HashMap<EndpointId, TrustedPath>>,
}

impl OftCore {
    pub fn new(
        transport: Arc<dyn Transport>,
        address: Address,
        local_decimals: u8,
        shared_decimals: u8,
    ) -> Result<Self, TokenError> {
        if shared_decimals > local_decimals {
            return Err(TokenError::InvalidDecimals {
                local: local_decimals,
                shared: shared_decimals,
            });
        }
        Ok(Self {
            transport,
            address,
            rate: conversion_rate(local_decimals, shared_decimals),
            trusted_remotes: RwLock::new(HashMap::new()),
        })
    }

    /// Address this endpoint is reachable at on its own chain.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Authorizes the byte-packed (remote, local) path for `eid`.
    pub async fn set_trusted_remote(&self, eid: EndpointId, path: &[u8]) -> Result<(), TokenError> {
        let path = TrustedPath::decode(path).map_err(TokenError::InvalidPath)?;
        debug!(eid, %path, endpoint = %self.address, "trusted remote set");
        self.trusted_remotes.write().await.insert(eid, path);
        Ok(())
    }

    pub async fn trusted_path(&self, eid: EndpointId) -> Result<TrustedPath, TokenError> {
        self.trusted_remotes
            .read()
            .await
            .get(&eid)
            .copied()
            .ok_or(TokenError::NoTrustedRemote { eid })
    }

    /// Truncates dust and converts to wire units. Rejects amounts that
    /// vanish entirely at the shared-decimal rate.
    pub fn prepare_amount(&self, amount: U256) -> Result<(U256, u64), TokenError> {
        let dusted = remove_dust(amount, self.rate);
        if dusted.is_zero() {
            return Err(TokenError::AmountTooSmall);
        }
        let amount_sd = to_shared(dusted, self.rate)?;
        Ok((dusted, amount_sd))
    }

    pub fn estimate_send_fee(
        &self,
        dst_eid: EndpointId,
        _to: B256,
        _amount: U256,
        pay_in_zro: bool,
        adapter_params: &[u8],
    ) -> Result<MessagingFee, TokenError> {
        Ok(self
            .transport
            .estimate_fee(dst_eid, PACKET_LEN, pay_in_zro, adapter_params)?)
    }

    /// Encodes a transfer packet and hands it to the transport along the
    /// trusted path for `dst_eid`.
    pub async fn send_packet(
        &self,
        dst_eid: EndpointId,
        to: B256,
        amount_sd: u64,
        params: &CallParams,
        value: U256,
    ) -> Result<MessageReceipt, TokenError> {
        if params.zro_payment_address.is_some() {
            return Err(EndpointError::ZroPaymentUnsupported.into());
        }
        let path = self.trusted_path(dst_eid).await?;
        let payload = TransferPacket { to, amount_sd }.encode();
        let receipt = self
            .transport
            .send(
                self.address,
                dst_eid,
                &path.encode(),
                payload,
                params.refund_address,
                value,
            )
            .await?;
        Ok(receipt)
    }

    /// Validates that an inbound message arrived along the configured
    /// trusted path for its source chain.
    pub async fn verify_inbound(
        &self,
        src_eid: EndpointId,
        src_path: &[u8],
    ) -> Result<(), TokenError> {
        let configured = self
            .trusted_path(src_eid)
            .await
            .map_err(|_| TokenError::UntrustedSource { eid: src_eid })?;
        let delivered = TrustedPath::decode(src_path).map_err(TokenError::InvalidPath)?;
        if delivered != configured {
            return Err(TokenError::UntrustedSource { eid: src_eid });
        }
        Ok(())
    }

    /// Decodes an inbound packet into its recipient and local-unit amount.
    pub fn decode_inbound(&self, payload: &[u8]) -> Result<(Address, U256), TokenError> {
        let packet = TransferPacket::decode(payload)?;
        Ok((packet.recipient(), from_shared(packet.amount_sd, self.rate)))
    }
}
