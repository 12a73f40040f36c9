//! Two-chain round trip through the mock transport, mirroring the bridged
//! token flow: deposit at home, send out, send back.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use omnioft_endpoint::{EndpointError, MockEndpoint};
use omnioft_token::{OmniToken, ProxyToken, TokenError};
use omnioft_types::{CallParams, TrustedPath};

const LOCAL_EID: u32 = 1;
const REMOTE_EID: u32 = 2;
const DECIMALS: u8 = 18;
const SHARED_DECIMALS: u8 = 8;

fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18))
}

struct Harness {
    local_endpoint: Arc<MockEndpoint>,
    remote_endpoint: Arc<MockEndpoint>,
    proxy: Arc<ProxyToken>,
    oft: Arc<OmniToken>,
    alice: Address,
    bob: Address,
}

/// Wires two chains together without configuring trusted remotes.
async fn setup_unconfigured() -> Harness {
    let local_endpoint = MockEndpoint::new(LOCAL_EID);
    let remote_endpoint = MockEndpoint::new(REMOTE_EID);

    let proxy_addr = Address::repeat_byte(0xa0);
    let oft_addr = Address::repeat_byte(0xb0);

    let proxy = ProxyToken::new(
        proxy_addr,
        DECIMALS,
        SHARED_DECIMALS,
        local_endpoint.clone(),
    )
    .unwrap();
    let oft = OmniToken::new(
        "OmnichainFungibleToken",
        "OFT",
        DECIMALS,
        SHARED_DECIMALS,
        oft_addr,
        remote_endpoint.clone(),
    )
    .unwrap();

    local_endpoint
        .set_dest_endpoint(oft_addr, remote_endpoint.clone())
        .await;
    remote_endpoint
        .set_dest_endpoint(proxy_addr, local_endpoint.clone())
        .await;
    local_endpoint.register_receiver(proxy.clone()).await;
    remote_endpoint.register_receiver(oft.clone()).await;

    Harness {
        local_endpoint,
        remote_endpoint,
        proxy,
        oft,
        alice: Address::repeat_byte(0x01),
        bob: Address::repeat_byte(0x02),
    }
}

/// Full wiring with trusted remotes set on both sides.
async fn setup() -> Harness {
    let h = setup_unconfigured().await;
    let remote_path = TrustedPath::new(h.oft.address(), h.proxy.address());
    let local_path = TrustedPath::new(h.proxy.address(), h.oft.address());
    h.proxy
        .set_trusted_remote(REMOTE_EID, &remote_path.encode())
        .await
        .unwrap();
    h.oft
        .set_trusted_remote(LOCAL_EID, &local_path.encode())
        .await
        .unwrap();
    h
}

#[tokio::test]
async fn send_tokens_out_and_receive_them_back() {
    let h = setup().await;
    let amount = ether(1);

    h.proxy.deposit(amount, h.alice, amount).await.unwrap();
    assert_eq!(h.proxy.balance_of(h.alice).await, amount);
    assert_eq!(h.oft.balance_of(h.bob).await, U256::ZERO);

    // Alice sends to Bob on the remote chain.
    let bob32 = h.bob.into_word();
    let fee = h
        .proxy
        .estimate_send_fee(REMOTE_EID, bob32, amount, false, &[])
        .unwrap()
        .native_fee;
    h.proxy
        .send_from(
            h.alice,
            REMOTE_EID,
            bob32,
            amount,
            CallParams::native(h.alice),
            fee,
        )
        .await
        .unwrap();

    assert_eq!(h.oft.total_supply().await, amount);
    assert_eq!(h.oft.balance_of(h.bob).await, amount);
    assert_eq!(h.proxy.balance_of(h.alice).await, U256::ZERO);
    assert_eq!(h.proxy.escrow().await, amount);

    // Bob sends everything back to Alice.
    let alice32 = h.alice.into_word();
    let fee = h
        .oft
        .estimate_send_fee(LOCAL_EID, alice32, amount, false, &[])
        .unwrap()
        .native_fee;
    h.oft
        .send_from(
            h.bob,
            LOCAL_EID,
            alice32,
            amount,
            CallParams::native(h.bob),
            fee,
        )
        .await
        .unwrap();

    assert_eq!(h.oft.total_supply().await, U256::ZERO);
    assert_eq!(h.oft.balance_of(h.bob).await, U256::ZERO);
    assert_eq!(h.proxy.balance_of(h.alice).await, amount);
    assert_eq!(h.proxy.escrow().await, U256::ZERO);
}

#[tokio::test]
async fn partial_send_conserves_supply() {
    let h = setup().await;
    let deposit = ether(1);
    let sent = ether(2) / U256::from(5); // 0.4 ether, dust-free at rate 1e10

    h.proxy.deposit(deposit, h.alice, deposit).await.unwrap();

    let bob32 = h.bob.into_word();
    let fee = h
        .proxy
        .estimate_send_fee(REMOTE_EID, bob32, sent, false, &[])
        .unwrap()
        .native_fee;
    h.proxy
        .send_from(
            h.alice,
            REMOTE_EID,
            bob32,
            sent,
            CallParams::native(h.alice),
            fee,
        )
        .await
        .unwrap();

    assert_eq!(h.proxy.balance_of(h.alice).await, deposit - sent);
    assert_eq!(h.proxy.escrow().await, sent);
    assert_eq!(h.oft.total_supply().await, sent);
    assert_eq!(h.oft.balance_of(h.bob).await, sent);
}

#[tokio::test]
async fn send_without_trusted_remote_fails() {
    let h = setup_unconfigured().await;
    let amount = ether(1);
    h.proxy.deposit(amount, h.alice, amount).await.unwrap();

    let err = h
        .proxy
        .send_from(
            h.alice,
            REMOTE_EID,
            h.bob.into_word(),
            amount,
            CallParams::native(h.alice),
            ether(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TokenError::NoTrustedRemote { eid: REMOTE_EID }));

    // Nothing moved.
    assert_eq!(h.proxy.balance_of(h.alice).await, amount);
    assert_eq!(h.proxy.escrow().await, U256::ZERO);
    assert_eq!(h.oft.total_supply().await, U256::ZERO);
}

#[tokio::test]
async fn deposit_with_mismatched_value_fails() {
    let h = setup().await;
    let amount = ether(1);

    let err = h
        .proxy
        .deposit(amount, h.alice, amount - U256::from(1))
        .await
        .unwrap_err();
    assert!(matches!(err, TokenError::PaymentMismatch { .. }));
    assert_eq!(h.proxy.balance_of(h.alice).await, U256::ZERO);
    assert_eq!(h.proxy.total_supply().await, U256::ZERO);
}

#[tokio::test]
async fn underpaid_fee_fails_and_rolls_back() {
    let h = setup().await;
    let amount = ether(1);
    h.proxy.deposit(amount, h.alice, amount).await.unwrap();

    let bob32 = h.bob.into_word();
    let fee = h
        .proxy
        .estimate_send_fee(REMOTE_EID, bob32, amount, false, &[])
        .unwrap()
        .native_fee;
    let err = h
        .proxy
        .send_from(
            h.alice,
            REMOTE_EID,
            bob32,
            amount,
            CallParams::native(h.alice),
            fee - U256::from(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TokenError::Transport(EndpointError::InsufficientFee { .. })
    ));

    // The escrow was released back to the sender.
    assert_eq!(h.proxy.balance_of(h.alice).await, amount);
    assert_eq!(h.proxy.escrow().await, U256::ZERO);
    assert_eq!(h.oft.total_supply().await, U256::ZERO);
}

#[tokio::test]
async fn inbound_from_untrusted_path_rejected() {
    let h = setup().await;
    let amount = ether(1);
    h.proxy.deposit(amount, h.alice, amount).await.unwrap();

    // The remote token trusts a different local endpoint than ours.
    let wrong = TrustedPath::new(Address::repeat_byte(0xee), h.oft.address());
    h.oft
        .set_trusted_remote(LOCAL_EID, &wrong.encode())
        .await
        .unwrap();

    let bob32 = h.bob.into_word();
    let fee = h
        .proxy
        .estimate_send_fee(REMOTE_EID, bob32, amount, false, &[])
        .unwrap()
        .native_fee;
    let err = h
        .proxy
        .send_from(
            h.alice,
            REMOTE_EID,
            bob32,
            amount,
            CallParams::native(h.alice),
            fee,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TokenError::Transport(EndpointError::Delivery { .. })
    ));

    // Rejected delivery rolled the escrow back; nothing was minted.
    assert_eq!(h.proxy.balance_of(h.alice).await, amount);
    assert_eq!(h.oft.total_supply().await, U256::ZERO);
}

#[tokio::test]
async fn dust_only_amount_rejected() {
    let h = setup().await;
    let amount = ether(1);
    h.proxy.deposit(amount, h.alice, amount).await.unwrap();

    // Below the 10^(18-8) conversion rate, the amount vanishes on the wire.
    let dust = U256::from(9_999_999_999u64);
    let err = h
        .proxy
        .send_from(
            h.alice,
            REMOTE_EID,
            h.bob.into_word(),
            dust,
            CallParams::native(h.alice),
            ether(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TokenError::AmountTooSmall));
    assert_eq!(h.proxy.balance_of(h.alice).await, amount);
}

#[tokio::test]
async fn fee_payment_in_fee_token_unsupported() {
    let h = setup().await;
    let amount = ether(1);
    h.proxy.deposit(amount, h.alice, amount).await.unwrap();

    let params = CallParams {
        refund_address: h.alice,
        zro_payment_address: Some(Address::repeat_byte(0x33)),
        adapter_params: Vec::new(),
    };
    let err = h
        .proxy
        .send_from(h.alice, REMOTE_EID, h.bob.into_word(), amount, params, ether(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TokenError::Transport(EndpointError::ZroPaymentUnsupported)
    ));
    assert_eq!(h.proxy.balance_of(h.alice).await, amount);
}

#[tokio::test]
async fn malformed_trusted_path_rejected() {
    let h = setup_unconfigured().await;

    // One byte short of a packed (remote, local) address pair.
    let err = h
        .proxy
        .set_trusted_remote(REMOTE_EID, &[0u8; 39])
        .await
        .unwrap_err();
    assert!(matches!(err, TokenError::InvalidPath(_)));
    assert!(err.to_string().contains("trusted path"));
}

#[tokio::test]
async fn inverted_decimals_rejected_at_construction() {
    let endpoint = MockEndpoint::new(LOCAL_EID);
    let result = ProxyToken::new(Address::repeat_byte(0xa0), 8, 18, endpoint);
    assert!(matches!(
        result,
        Err(TokenError::InvalidDecimals { local: 8, shared: 18 })
    ));
}

#[tokio::test]
async fn endpoints_keep_their_eids() {
    let h = setup().await;
    use omnioft_endpoint::Transport;
    assert_eq!(h.local_endpoint.eid(), LOCAL_EID);
    assert_eq!(h.remote_endpoint.eid(), REMOTE_EID);
}
