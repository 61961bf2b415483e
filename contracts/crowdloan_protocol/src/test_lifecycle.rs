extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env,
};

use crate::invariants;
use crate::types::DAY_IN_SECONDS;
use crate::{CampaignStatus, CrowdloanProtocol, CrowdloanProtocolClient, Error, Role};

const PRICE: i128 = 50;
const UNITS: u32 = 20;
const YIELD_10PCT: i128 = 10_000_000;
const RATIO: u32 = 5;
const FUNDING_DAYS: u32 = 30;
const INSTALLMENTS: u32 = 4;

fn setup() -> (Env, CrowdloanProtocolClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CrowdloanProtocol, ());
    let client = CrowdloanProtocolClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.init(&admin);
    (env, client, admin)
}

fn create_token<'a>(
    env: &Env,
    admin: &Address,
) -> (token::Client<'a>, token::StellarAssetClient<'a>) {
    let sac = env.register_stellar_asset_contract_v2(admin.clone());
    (
        token::Client::new(env, &sac.address()),
        token::StellarAssetClient::new(env, &sac.address()),
    )
}

/// Mint `amount` to `who` and approve the contract to pull it.
fn bankroll(
    token: &token::Client,
    sac: &token::StellarAssetClient,
    who: &Address,
    contract: &Address,
    amount: i128,
) {
    sac.mint(who, &amount);
    token.approve(who, contract, &amount, &1_000);
}

/// Register a sponsor and propose the standard campaign:
/// 20 units at 50, 10% yield, 30-day window, 4 monthly installments.
fn propose_default(
    env: &Env,
    client: &CrowdloanProtocolClient,
    admin: &Address,
    token: &token::Client,
    sac: &token::StellarAssetClient,
) -> (Address, Address, u64) {
    let sponsor = Address::generate(env);
    let borrower = Address::generate(env);
    client.register_sponsor(admin, &sponsor, &RATIO);

    // Deposit is 50 * 20 / 5 = 200.
    bankroll(token, sac, &sponsor, &client.address, 200);
    let campaign = client.propose(
        &sponsor,
        &borrower,
        &token.address,
        &PRICE,
        &UNITS,
        &YIELD_10PCT,
        &FUNDING_DAYS,
        &30,
        &30,
        &INSTALLMENTS,
    );
    (sponsor, borrower, campaign.id)
}

/// Fund the whole cap from a single funder and draw the loan.
fn fund_and_draw(
    env: &Env,
    client: &CrowdloanProtocolClient,
    token: &token::Client,
    sac: &token::StellarAssetClient,
    borrower: &Address,
    id: u64,
) -> Address {
    let funder = Address::generate(env);
    bankroll(token, sac, &funder, &client.address, 1_000);
    client.fund(&funder, &id, &UNITS);
    client.draw_loan(borrower, &id);
    funder
}

// ─────────────────────────────────────────────────────────
// Proposal
// ─────────────────────────────────────────────────────────

#[test]
fn test_propose_escrows_collateral_and_grants_champion() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);

    let (sponsor, borrower, id) = propose_default(&env, &client, &admin, &token, &sac);

    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.status, CampaignStatus::Proposed);
    assert_eq!(campaign.sponsor, sponsor);
    assert_eq!(campaign.borrower, borrower);
    assert_eq!(campaign.unit_price, PRICE);
    assert_eq!(campaign.max_units, UNITS);
    assert_eq!(campaign.collateral_ratio, RATIO);
    assert_eq!(campaign.deposit_amount, 200);
    assert_eq!(campaign.installments_paid, 0);

    // Collateral moved from the sponsor into escrow.
    assert_eq!(token.balance(&sponsor), 0);
    assert_eq!(token.balance(&client.address), 200);

    // Delegation rule: the sponsor vouched the borrower in.
    assert!(client.has_role(&borrower, &Role::Champion));

    invariants::assert_all_campaign_invariants(&campaign);
}

#[test]
fn test_propose_requires_sponsor_role() {
    let (env, client, _admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, _sac) = create_token(&env, &token_admin);

    let outsider = Address::generate(&env);
    let borrower = Address::generate(&env);
    let result = client.try_propose(
        &outsider,
        &borrower,
        &token.address,
        &PRICE,
        &UNITS,
        &YIELD_10PCT,
        &FUNDING_DAYS,
        &30,
        &30,
        &INSTALLMENTS,
    );
    assert_eq!(result, Err(Ok(Error::NotAuthorized.into())));
}

#[test]
fn test_propose_rejects_degenerate_terms() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);

    let sponsor = Address::generate(&env);
    let borrower = Address::generate(&env);
    client.register_sponsor(&admin, &sponsor, &RATIO);
    bankroll(&token, &sac, &sponsor, &client.address, 200);

    let result = client.try_propose(
        &sponsor,
        &borrower,
        &token.address,
        &PRICE,
        &0, // no units to sell
        &YIELD_10PCT,
        &FUNDING_DAYS,
        &30,
        &30,
        &INSTALLMENTS,
    );
    assert_eq!(result, Err(Ok(Error::InvalidParams.into())));

    let result = client.try_propose(
        &sponsor,
        &borrower,
        &token.address,
        &PRICE,
        &UNITS,
        &YIELD_10PCT,
        &FUNDING_DAYS,
        &30,
        &30,
        &0, // no installments
    );
    assert_eq!(result, Err(Ok(Error::InvalidParams.into())));
}

#[test]
fn test_propose_without_allowance_fails() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);

    let sponsor = Address::generate(&env);
    let borrower = Address::generate(&env);
    client.register_sponsor(&admin, &sponsor, &RATIO);
    // Funds exist but the contract was never approved to pull them.
    sac.mint(&sponsor, &200);

    let result = client.try_propose(
        &sponsor,
        &borrower,
        &token.address,
        &PRICE,
        &UNITS,
        &YIELD_10PCT,
        &FUNDING_DAYS,
        &30,
        &30,
        &INSTALLMENTS,
    );
    assert_eq!(result, Err(Ok(Error::InsufficientAllowance.into())));
}

// ─────────────────────────────────────────────────────────
// Funding window
// ─────────────────────────────────────────────────────────

#[test]
fn test_open_funding_starts_the_window() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);

    client.open_funding(&sponsor, &id);

    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.status, CampaignStatus::MintOpen);
    assert_eq!(campaign.funding_start, env.ledger().timestamp());
}

#[test]
fn test_open_funding_rejects_non_sponsor() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (_sponsor, borrower, id) = propose_default(&env, &client, &admin, &token, &sac);

    assert_eq!(
        client.try_open_funding(&borrower, &id),
        Err(Ok(Error::NotAuthorized.into()))
    );
}

#[test]
fn test_open_funding_twice_rejected() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);

    client.open_funding(&sponsor, &id);
    assert_eq!(
        client.try_open_funding(&sponsor, &id),
        Err(Ok(Error::StateMismatch.into()))
    );
}

#[test]
fn test_cancel_before_any_funding_refunds_deposit() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);

    client.open_funding(&sponsor, &id);
    client.cancel(&sponsor, &id);

    assert_eq!(client.get_campaign(&id).status, CampaignStatus::Canceled);
    assert_eq!(token.balance(&sponsor), 200);
    assert_eq!(token.balance(&client.address), 0);
}

#[test]
fn test_cancel_after_funding_rejected() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);

    let funder = Address::generate(&env);
    bankroll(&token, &sac, &funder, &client.address, 50);
    client.fund(&funder, &id, &1);

    assert_eq!(
        client.try_cancel(&sponsor, &id),
        Err(Ok(Error::StateMismatch.into()))
    );
}

#[test]
fn test_fund_mints_units_and_escrows_payment() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);

    let funder_a = Address::generate(&env);
    let funder_b = Address::generate(&env);
    bankroll(&token, &sac, &funder_a, &client.address, 500);
    bankroll(&token, &sac, &funder_b, &client.address, 500);

    client.fund(&funder_a, &id, &10);
    assert_eq!(client.balance_of(&funder_a, &id), 10);
    assert_eq!(client.total_supply(&id), 10);
    assert_eq!(client.get_campaign(&id).status, CampaignStatus::MintOpen);

    client.fund(&funder_b, &id, &10);
    assert_eq!(client.total_supply(&id), 20);
    assert_eq!(
        client.get_campaign(&id).status,
        CampaignStatus::ThresholdMet
    );

    // 200 collateral + 1000 funding now in escrow.
    assert_eq!(token.balance(&client.address), 1_200);

    let campaign = client.get_campaign(&id);
    invariants::assert_supply_capped(&campaign, client.total_supply(&id));
    invariants::assert_valid_status_transition(
        &CampaignStatus::MintOpen,
        &CampaignStatus::ThresholdMet,
    );
}

#[test]
fn test_fund_over_cap_rejected_supply_unchanged() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);

    let funder = Address::generate(&env);
    bankroll(&token, &sac, &funder, &client.address, 2_000);
    client.fund(&funder, &id, &15);

    // 15 + 6 would push past the 20-unit cap.
    assert_eq!(
        client.try_fund(&funder, &id, &6),
        Err(Ok(Error::CapacityExceeded.into()))
    );
    assert_eq!(client.total_supply(&id), 15);
    assert_eq!(client.balance_of(&funder, &id), 15);
}

#[test]
fn test_fund_zero_units_rejected() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);

    let funder = Address::generate(&env);
    assert_eq!(
        client.try_fund(&funder, &id, &0),
        Err(Ok(Error::InvalidParams.into()))
    );
}

#[test]
fn test_fund_after_window_rejected() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);

    env.ledger()
        .with_mut(|li| li.timestamp += u64::from(FUNDING_DAYS) * DAY_IN_SECONDS);

    let funder = Address::generate(&env);
    bankroll(&token, &sac, &funder, &client.address, 500);
    assert_eq!(
        client.try_fund(&funder, &id, &10),
        Err(Ok(Error::WindowExpired.into()))
    );
}

#[test]
fn test_fund_requires_open_window() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (_sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);

    // Still Proposed — funding was never opened.
    let funder = Address::generate(&env);
    bankroll(&token, &sac, &funder, &client.address, 500);
    assert_eq!(
        client.try_fund(&funder, &id, &10),
        Err(Ok(Error::StateMismatch.into()))
    );
}

// ─────────────────────────────────────────────────────────
// Loan draw & repayment
// ─────────────────────────────────────────────────────────

#[test]
fn test_draw_loan_disburses_principal() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);

    let funder = Address::generate(&env);
    bankroll(&token, &sac, &funder, &client.address, 1_000);
    client.fund(&funder, &id, &UNITS);

    client.draw_loan(&borrower, &id);

    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.status, CampaignStatus::Loaned);
    assert_eq!(campaign.loan_drawn_at, env.ledger().timestamp());
    assert_eq!(token.balance(&borrower), 1_000);
    // Only the collateral remains in escrow.
    assert_eq!(token.balance(&client.address), 200);
}

#[test]
fn test_draw_loan_rejects_wrong_borrower() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, _borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);

    let funder = Address::generate(&env);
    bankroll(&token, &sac, &funder, &client.address, 1_000);
    client.fund(&funder, &id, &UNITS);

    assert_eq!(
        client.try_draw_loan(&sponsor, &id),
        Err(Ok(Error::NotAuthorized.into()))
    );
}

#[test]
fn test_draw_loan_requires_threshold() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);

    let funder = Address::generate(&env);
    bankroll(&token, &sac, &funder, &client.address, 500);
    client.fund(&funder, &id, &10);

    assert_eq!(
        client.try_draw_loan(&borrower, &id),
        Err(Ok(Error::StateMismatch.into()))
    );
}

/// Scenario: 20 units at 50, four installments. Each on-time payment
/// transfers the nominal 250 plus 10% yield; the fourth retires the debt
/// and opens settlement.
#[test]
fn test_scenario_four_installments_reach_burn_open() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);
    fund_and_draw(&env, &client, &token, &sac, &borrower, id);

    // Loan paid out 1000; top up for the yield and approve the whole plan.
    sac.mint(&borrower, &100);
    token.approve(&borrower, &client.address, &1_100, &1_000);

    let mut paid_before = 0u32;
    for round in 1..=INSTALLMENTS {
        let balance_before = token.balance(&borrower);
        client.pay_installment(&borrower, &id);
        let campaign = client.get_campaign(&id);

        // 250 base + 25 yield per round.
        assert_eq!(balance_before - token.balance(&borrower), 275);
        assert_eq!(campaign.installments_paid, round);
        invariants::assert_installments_monotonic(paid_before, campaign.installments_paid);
        invariants::assert_all_campaign_invariants(&campaign);
        paid_before = campaign.installments_paid;

        if round < INSTALLMENTS {
            assert_eq!(campaign.status, CampaignStatus::Loaned);
        } else {
            assert_eq!(campaign.status, CampaignStatus::BurnOpen);
        }
    }

    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.principal_returned, 1_100);
    assert_eq!(campaign.yield_accrued, 0);
}

#[test]
fn test_pay_installment_rejects_wrong_caller() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);
    fund_and_draw(&env, &client, &token, &sac, &borrower, id);

    assert_eq!(
        client.try_pay_installment(&sponsor, &id),
        Err(Ok(Error::NotAuthorized.into()))
    );
}

/// Finalization happens on the paying call that retires the debt — a
/// follow-up call finds the campaign already out of `Loaned` and is
/// rejected rather than silently absorbed.
#[test]
fn test_pay_installment_after_finalization_rejected() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);
    let (sponsor, borrower, id) = propose_default(&env, &client, &admin, &token, &sac);
    client.open_funding(&sponsor, &id);
    fund_and_draw(&env, &client, &token, &sac, &borrower, id);

    sac.mint(&borrower, &100);
    token.approve(&borrower, &client.address, &1_100, &1_000);
    for _ in 0..INSTALLMENTS {
        client.pay_installment(&borrower, &id);
    }
    assert_eq!(client.get_campaign(&id).status, CampaignStatus::BurnOpen);

    assert_eq!(
        client.try_pay_installment(&borrower, &id),
        Err(Ok(Error::StateMismatch.into()))
    );
}

/// The rounding remainder of an uneven schedule lands in the final
/// installment, so cumulative repayment covers the debt exactly.
#[test]
fn test_uneven_schedule_remainder_in_final_installment() {
    let (env, client, admin) = setup();
    let token_admin = Address::generate(&env);
    let (token, sac) = create_token(&env, &token_admin);

    let sponsor = Address::generate(&env);
    let borrower = Address::generate(&env);
    client.register_sponsor(&admin, &sponsor, &RATIO);
    bankroll(&token, &sac, &sponsor, &client.address, 19);

    // 33 * 3 = 99 over 2 installments, zero yield: 49 then 50.
    let campaign = client.propose(
        &sponsor,
        &borrower,
        &token.address,
        &33,
        &3,
        &0,
        &FUNDING_DAYS,
        &30,
        &30,
        &2,
    );
    let id = campaign.id;
    client.open_funding(&sponsor, &id);

    let funder = Address::generate(&env);
    bankroll(&token, &sac, &funder, &client.address, 99);
    client.fund(&funder, &id, &3);
    client.draw_loan(&borrower, &id);

    token.approve(&borrower, &client.address, &99, &1_000);

    let before = token.balance(&borrower);
    client.pay_installment(&borrower, &id);
    assert_eq!(before - token.balance(&borrower), 49);
    assert_eq!(client.get_campaign(&id).status, CampaignStatus::Loaned);

    let before = token.balance(&borrower);
    client.pay_installment(&borrower, &id);
    assert_eq!(before - token.balance(&borrower), 50);

    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.status, CampaignStatus::BurnOpen);
    assert_eq!(campaign.principal_returned, 99);
}
