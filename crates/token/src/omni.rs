//! Remote-chain token endpoint: mints bridged supply on inbound transfers
//! and burns it on the way back.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use omnioft_endpoint::{MessageReceiver, Transport};
use omnioft_types::{CallParams, EndpointId, MessageReceipt, MessagingFee};

use crate::{Ledger, OftCore, TokenError};

pub struct OmniToken {
    name: String,
    symbol: String,
    core: OftCore,
    ledger: RwLock<Ledger>,
}

impl OmniToken {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        local_decimals: u8,
        shared_decimals: u8,
        address: Address,
        transport: Arc<dyn Transport>,
    ) -> Result<Arc<Self>, TokenError> {
        Ok(Arc::new(Self {
            name: name.into(),
            symbol: symbol.into(),
            core: OftCore::new(transport, address, local_decimals, shared_decimals)?,
            ledger: RwLock::new(Ledger::default()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
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

    /// Burns `amount` from `from` and forwards a transfer packet to the
    /// trusted remote for `dst_eid`.
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
        self.ledger.write().await.burn(from, dusted)?;

        match self
            .core
            .send_packet(dst_eid, to, amount_sd, &params, value)
            .await
        {
            Ok(receipt) => {
                info!(
                    token = self.symbol.as_str(),
                    %from, dst_eid, amount = %dusted, nonce = receipt.nonce,
                    "burned and sent"
                );
                Ok(receipt)
            }
            Err(e) => {
                // The message never left; restore the burned tokens.
                // Re-minting the amount just burned cannot overflow.
                self.ledger.write().await.mint(from, dusted).ok();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl MessageReceiver for OmniToken {
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
        self.ledger.write().await.mint(recipient, amount)?;
        info!(
            token = self.symbol.as_str(),
            src_eid, nonce, %recipient, %amount,
            "minted inbound transfer"
        );
        Ok(())
    }
}
