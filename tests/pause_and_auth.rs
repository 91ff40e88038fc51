//! Authorization, pause gating, and registry edge cases.

use nanofund::mock::MockGateway;
use nanofund::{Address, Error, Fund, FundParams, NoopExecutor, TokenId, MAX_TOKENS};

const OWNER: Address = Address(1);
const FUND: Address = Address(0xF0);
const ALICE: Address = Address(7);
const GOLD_ASSET: Address = Address(0x10);

fn gold() -> TokenId {
    TokenId::new("GOLD")
}

fn new_fund() -> Fund<MockGateway> {
    let assets = MockGateway::builder().with_accepting(GOLD_ASSET).build();
    Fund::new(FundParams::new(OWNER, FUND), assets, Box::new(NoopExecutor))
}

#[test]
fn owner_check_precedes_pause_check() {
    let mut fund = new_fund();
    fund.pause(OWNER).unwrap();

    // A non-owner rebalance on a paused fund reports NotAuthorized, not Paused.
    assert!(matches!(
        fund.rebalance(ALICE),
        Err(Error::NotAuthorized(ALICE))
    ));
}

#[test]
fn paused_fund_rejects_balance_ops_for_everyone() {
    let mut fund = new_fund();
    fund.add_token(OWNER, gold(), 2500, GOLD_ASSET).unwrap();
    fund.pause(OWNER).unwrap();

    assert!(matches!(
        fund.deposit(OWNER, gold(), GOLD_ASSET, 100),
        Err(Error::Paused)
    ));
    assert!(matches!(
        fund.deposit(ALICE, gold(), GOLD_ASSET, 100),
        Err(Error::Paused)
    ));
    assert!(matches!(fund.rebalance(OWNER), Err(Error::Paused)));
}

#[test]
fn registry_stays_writable_while_paused() {
    let mut fund = new_fund();
    fund.pause(OWNER).unwrap();

    fund.add_token(OWNER, gold(), 2500, GOLD_ASSET).unwrap();
    fund.update_price(OWNER, gold(), 1800).unwrap();

    assert!(fund.is_supported(gold()));
    assert_eq!(fund.price(gold()), 1800);
}

#[test]
fn roster_is_bounded() {
    let mut fund = new_fund();
    for i in 0..MAX_TOKENS {
        let token = TokenId::new(&format!("TOK{i}"));
        fund.add_token(OWNER, token, 100, Address(0x20 + i as u64))
            .unwrap();
    }
    assert_eq!(fund.supported_tokens().len(), MAX_TOKENS);

    let err = fund
        .add_token(OWNER, TokenId::new("ONEMORE"), 100, Address(0x99))
        .unwrap_err();
    assert!(matches!(err, Error::TooManyTokens { max: MAX_TOKENS }));
}

#[test]
fn duplicate_registration_rejected() {
    let mut fund = new_fund();
    fund.add_token(OWNER, gold(), 2500, GOLD_ASSET).unwrap();

    // Same identifier, even with a different weight or binding.
    let err = fund.add_token(OWNER, gold(), 1000, Address(0x11)).unwrap_err();
    assert!(matches!(err, Error::DuplicateToken(t) if t == gold()));
    assert_eq!(fund.token_weight(gold()), 2500);
}

#[test]
fn zero_weight_rejected() {
    let mut fund = new_fund();
    assert!(matches!(
        fund.add_token(OWNER, gold(), 0, GOLD_ASSET),
        Err(Error::InvalidWeight)
    ));
    // 10000 exactly is a legal (single-token) allocation.
    fund.add_token(OWNER, gold(), 10_000, GOLD_ASSET).unwrap();
}

#[test]
fn fund_cannot_bind_itself_as_an_asset() {
    let mut fund = new_fund();
    assert!(matches!(
        fund.add_token(OWNER, gold(), 2500, FUND),
        Err(Error::SelfReference)
    ));
    assert!(!fund.is_supported(gold()));
}

#[test]
fn price_updates_require_registration() {
    let mut fund = new_fund();
    assert!(matches!(
        fund.update_price(OWNER, gold(), 1800),
        Err(Error::UnsupportedToken(_))
    ));

    fund.add_token(OWNER, gold(), 2500, GOLD_ASSET).unwrap();
    assert!(matches!(
        fund.update_price(OWNER, gold(), 0),
        Err(Error::InvalidPrice)
    ));
    fund.update_price(OWNER, gold(), 1800).unwrap();
    fund.update_price(OWNER, gold(), 1900).unwrap();
    assert_eq!(fund.price(gold()), 1900);
}

#[test]
fn unknown_token_reported_before_asset_mismatch() {
    let mut fund = new_fund();
    // Token unknown: UnsupportedToken even though the asset would also be wrong.
    assert!(matches!(
        fund.withdraw(ALICE, gold(), Address(0x99), 100),
        Err(Error::UnsupportedToken(_))
    ));
}

#[test]
fn threshold_boundary_is_exclusive() {
    let mut fund = new_fund();
    // No prices posted, so drift equals the summed target weights.
    fund.add_token(OWNER, gold(), 500, GOLD_ASSET).unwrap();
    fund.deposit(ALICE, gold(), GOLD_ASSET, 1_000).unwrap();

    assert!(matches!(
        fund.rebalance(OWNER),
        Err(Error::ThresholdNotMet {
            deviation_bps: 500,
            threshold_bps: 500,
        })
    ));

    // One more basis point of target drift crosses the line.
    fund.add_token(OWNER, TokenId::new("SILVER"), 1, Address(0x11))
        .unwrap();
    let report = fund.rebalance(OWNER).unwrap();
    assert_eq!(report.total_bps, 501);
}

#[test]
fn empty_roster_never_rebalances() {
    let mut fund = new_fund();
    assert!(matches!(
        fund.rebalance(OWNER),
        Err(Error::ThresholdNotMet {
            deviation_bps: 0,
            ..
        })
    ));
}
