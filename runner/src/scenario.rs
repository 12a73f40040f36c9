//! The demo scenario: deposit at home, bridge out, bridge back, and check
//! supply conservation at every step.

use alloy_primitives::{Address, U256};
use anyhow::{ensure, Result};
use tracing::info;

use omnioft_endpoint::{FeeConfig, MockEndpoint};
use omnioft_token::{OmniToken, ProxyToken};
use omnioft_types::{CallParams, TrustedPath};

use crate::config::RunnerConfig;

pub async fn run(config: &RunnerConfig) -> Result<()> {
    let local_eid = config.chains.local_eid;
    let remote_eid = config.chains.remote_eid;
    let fees = FeeConfig {
        base_fee: U256::from(config.fees.base_fee_wei),
        per_byte_fee: U256::from(config.fees.per_byte_fee_wei),
    };

    let local_endpoint = MockEndpoint::with_fees(local_eid, fees);
    let remote_endpoint = MockEndpoint::with_fees(remote_eid, fees);

    let proxy_addr = Address::repeat_byte(0xa0);
    let oft_addr = Address::repeat_byte(0xb0);
    let alice = Address::repeat_byte(0x01);
    let bob = Address::repeat_byte(0x02);

    let proxy = ProxyToken::new(
        proxy_addr,
        config.token.local_decimals,
        config.token.shared_decimals,
        local_endpoint.clone(),
    )?;
    let oft = OmniToken::new(
        config.token.name.clone(),
        config.token.symbol.clone(),
        config.token.local_decimals,
        config.token.shared_decimals,
        oft_addr,
        remote_endpoint.clone(),
    )?;

    // Endpoint bookkeeping plus bidirectional trusted paths.
    local_endpoint
        .set_dest_endpoint(oft_addr, remote_endpoint.clone())
        .await;
    remote_endpoint
        .set_dest_endpoint(proxy_addr, local_endpoint.clone())
        .await;
    local_endpoint.register_receiver(proxy.clone()).await;
    remote_endpoint.register_receiver(oft.clone()).await;
    proxy
        .set_trusted_remote(remote_eid, &TrustedPath::new(oft_addr, proxy_addr).encode())
        .await?;
    oft.set_trusted_remote(local_eid, &TrustedPath::new(proxy_addr, oft_addr).encode())
        .await?;

    let amount = U256::from(config.scenario.amount_wei);
    info!(%amount, "topology wired, depositing at home");

    proxy.deposit(amount, alice, amount).await?;
    ensure!(proxy.balance_of(alice).await == amount, "deposit not credited");

    let bob32 = bob.into_word();
    let fee = proxy
        .estimate_send_fee(remote_eid, bob32, amount, false, &[])?
        .native_fee;
    info!(%fee, "bridging out alice -> bob");
    let receipt = proxy
        .send_from(alice, remote_eid, bob32, amount, CallParams::native(alice), fee)
        .await?;
    info!(nonce = receipt.nonce, "outbound delivered");

    ensure!(oft.total_supply().await == amount, "remote supply mismatch");
    ensure!(oft.balance_of(bob).await == amount, "bob not credited");
    ensure!(proxy.escrow().await == amount, "escrow mismatch");

    let alice32 = alice.into_word();
    let fee = oft
        .estimate_send_fee(local_eid, alice32, amount, false, &[])?
        .native_fee;
    info!(%fee, "bridging back bob -> alice");
    let receipt = oft
        .send_from(bob, local_eid, alice32, amount, CallParams::native(bob), fee)
        .await?;
    info!(nonce = receipt.nonce, "return delivered");

    ensure!(oft.total_supply().await.is_zero(), "remote supply not burned");
    ensure!(proxy.balance_of(alice).await == amount, "alice not restored");
    ensure!(proxy.escrow().await.is_zero(), "escrow not released");

    info!("round trip complete, supply conserved");
    Ok(())
}
