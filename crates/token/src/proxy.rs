//! Home-chain token endpoint: wraps the base asset 1:1 and escrows
//! outbound transfers in its own ledger entry instead of burning them.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use omnioft_endpoint::{MessageReceiver, Transport};
use omnioft_types::{CallParams, EndpointId, MessageReceipt, MessagingFee};

use crate::{Ledger, OftCore, TokenError};

pub struct ProxyToken {
    core: OftCore,
    ledger: RwLock<Ledger>,
}

impl ProxyToken {
    pub fn new(
        address: Address,
        local_decimals: u8,
        shared_decimals: u8,
        transport: Arc<dyn Transport>,
    ) -> Result<Arc<Self>, TokenError> {
        Ok(Arc::new(Self {
            core: OftCore::new(transport, address, local_decimals, shared_decimals)?,
            ledger: RwLock::new(Ledger::default()),
        }))
    }

    pub fn address(&self) -> Address {
        self.core.address()
    }

    pub async fn balance_of(&self, account: Address) -> U256 {
        self.ledger.read().await.balance_of(&account)
    }

    pub async fn total_supply(&self) -> U256 {
        self.ledger.read().await.total_supply()
    }

    /// Tokens currently locked against bridged supply on other chains.
    pub async fn escrow(&self) -> U256 {
        self.balance_of(self.core.address()).await
    }

    /// Wraps the base asset: `value` is the attached native payment and
    /// must match `amount` exactly (1:1 accounting).
    pub async fn deposit(
        &self,
        amount: U256,
        recipient: Address,
        value: U256,
    ) -> Result<(), TokenError> {
        if value != amount {
            return Err(TokenError::PaymentMismatch {
                expected: amount,
                provided: value,
            });
        }
        self.ledger.write().await.mint(recipient, amount)?;
        info!(%recipient, %amount, "deposit wrapped");
        Ok(())
    }

    pub async fn set_trusted_remote(&self, eid: EndpointId, path: &[u8]) -> Result<(), TokenError> {
        self.core.set_trusted_remote(eid, path).await
    }

    pub fn estimate_send_fee(
        &self,
        dst_eid: EndpointId,
        to: B256,
        amount: U256,
        pay_in_zro: bool,
        adapter_params: &[u8],
    ) -> Result<MessagingFee, TokenError> {
        self.core
            .estimate_send_fee(dst_eid, to, amount, pay_in_zro, adapter_params)
    }

    /// Locks `amount` from `from` into the proxy's escrow and forwards a
    /// transfer packet to the trusted remote for `dst_eid`.
    pub async fn send_from(
        &self,
        from: Address,
        dst_eid: EndpointId,
        to: B256,
        amount: U256,
        params: CallParams,
        value: U256,
    ) -> Result<MessageReceipt, TokenError> {
        let (dusted, amount_sd) = self.core.prepare_amount(amount)?;
        let escrow = self.core.address();
        self.ledger.write().await.transfer(from, escrow, dusted)?;

        match self
            .core
            .send_packet(dst_eid, to, amount_sd, &params, value)
            .await
        {
            Ok(receipt) => {
                info!(
                    %from, dst_eid, amount = %dusted, nonce = receipt.nonce,
                    "escrowed and sent"
                );
                Ok(receipt)
            }
            Err(e) => {
                // The message never left; release the escrow back.
                // Returning what was just locked cannot fail.
                self.ledger.write().await.transfer(escrow, from, dusted).ok();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl MessageReceiver for ProxyToken {
    fn local_address(&self) -> Address {
        self.core.address()
    }

    async fn on_receive(
        &self,
        src_eid: EndpointId,
        src_path: &[u8],
        nonce: u64,
        payload: &[u8],
    ) -> anyhow::Result<()> {
        self.core.verify_inbound(src_eid, src_path).await?;
        let (recipient, amount) = self.core.decode_inbound(payload)?;
        let escrow = self.core.address();
        self.ledger
            .write()
            .await
            .transfer(escrow, recipient, amount)
            .map_err(|e| match e {
                TokenError::InsufficientBalance { .. } => TokenError::EscrowUnderflow,
                other => other,
            })?;
        info!(src_eid, nonce, %recipient, %amount, "released from escrow");
        Ok(())
    }
}
