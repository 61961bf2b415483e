//! # Crowdloan Protocol Contract
//!
//! Root crate of the sponsor-collateralized crowdloan protocol: a sponsor
//! vouches for a borrower by escrowing collateral, the public funds the
//! campaign by buying fractional claim units, and the borrower repays the
//! pooled loan in scheduled installments plus yield which claim holders
//! redeem pro-rata.
//!
//! The single Soroban contract `CrowdloanProtocol` exposes entry points for
//! the full campaign lifecycle:
//!
//! | Phase        | Entry Point(s)                                         |
//! |--------------|--------------------------------------------------------|
//! | Bootstrap    | [`CrowdloanProtocol::init`]                            |
//! | Role admin   | `grant_role`, `revoke_role`, `register_sponsor`        |
//! | Settings     | `set_default_late_fee`, `set_penalty_enabled`, `set_metadata_uri` |
//! | Proposal     | [`CrowdloanProtocol::propose`]                         |
//! | Funding      | `open_funding`, `fund`, `cancel`                       |
//! | Expiry sweep | `check_expiry`, `perform_expiry`                       |
//! | Repayment    | `draw_loan`, `pay_installment`                         |
//! | Settlement   | `burn_for_settlement`, `burn_for_recovery`, `claim_collateral`, `claim_residual` |
//! | Queries      | `get_campaign`, `balance_of`, `total_supply`, `role_of`, `has_role`, `metadata_uri` |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`rbac`], amortization pricing to
//! [`math`], claim-unit accounting to [`claims`], the expiry index to
//! [`expiry`], funds movement to [`settlement`], and storage access to
//! [`storage`]. This file contains **only** the entry points, their
//! precondition checks, and event emissions.
//!
//! Every entry point takes the acting identity as an explicit `Address`
//! parameter and calls `require_auth` on it. Failures abort the whole
//! invocation — Soroban reverts all storage writes and token transfers on
//! panic, so each operation either fully commits or changes nothing.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, Address, Env, String,
};

mod claims;
mod events;
mod expiry;
mod math;
pub mod rbac;
mod settlement;
mod storage;
mod types;

#[cfg(test)]
mod test_lifecycle;

use storage::{
    get_and_increment_campaign_id, load_campaign, load_campaign_config, load_campaign_state,
    save_campaign, save_campaign_state,
};
use types::{DAY_IN_SECONDS, PRECISION};

pub use rbac::Role;
pub use types::{Campaign, CampaignConfig, CampaignState, CampaignStatus};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized    = 1,
    NotAuthorized         = 2,
    RoleNotFound          = 3,
    CampaignNotFound      = 4,
    InvalidParams         = 5,
    StateMismatch         = 6,
    WindowExpired         = 7,
    CapacityExceeded      = 8,
    InsufficientAllowance = 9,
    InsufficientRepaid    = 10,
    AlreadyClaimed        = 11,
    NothingToClaim        = 12,
}

#[contract]
pub struct CrowdloanProtocol;

#[contractimpl]
impl CrowdloanProtocol {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract and set the first admin.
    ///
    /// Must be called exactly once after deployment. Subsequent calls panic
    /// with `Error::AlreadyInitialized`.
    pub fn init(env: Env, admin: Address) {
        admin.require_auth();
        rbac::init_admin(&env, &admin);
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Grant `role` to `target`.
    ///
    /// - Admins grant any role.
    /// - Sponsors may grant `Champion` only (the delegation rule).
    pub fn grant_role(env: Env, caller: Address, target: Address, role: Role) {
        caller.require_auth();
        rbac::grant_role(&env, &caller, &target, role);
    }

    /// Revoke any role from `target`. Admin only.
    pub fn revoke_role(env: Env, caller: Address, target: Address) {
        caller.require_auth();
        rbac::revoke_role(&env, &caller, &target);
    }

    /// Return the role held by `address`, or `None`.
    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::role_of(&env, &address)
    }

    /// Return `true` if `address` holds `role`.
    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        rbac::has_role(&env, &address, role)
    }

    /// Register `sponsor` with its under-collateralization ratio and grant
    /// it the `Sponsor` role. Admin only.
    ///
    /// The ratio divides the campaign size to size the collateral deposit:
    /// a ratio of 5 escrows one fifth of `unit_price * max_units`.
    pub fn register_sponsor(env: Env, caller: Address, sponsor: Address, collateral_ratio: u32) {
        caller.require_auth();
        rbac::require_admin(&env, &caller);
        if collateral_ratio == 0 {
            panic_with_error!(&env, Error::InvalidParams);
        }
        rbac::set_sponsor_ratio(&env, &sponsor, collateral_ratio);
        rbac::grant_role(&env, &caller, &sponsor, Role::Sponsor);
    }

    // ─────────────────────────────────────────────────────────
    // Protocol settings
    // ─────────────────────────────────────────────────────────

    /// Set the global default late-fee proportion (fraction of the yield
    /// applied per late day, fixed-point 1e8). Snapshotted into campaigns
    /// at proposal. Admin only.
    pub fn set_default_late_fee(env: Env, caller: Address, proportion: i128) {
        caller.require_auth();
        rbac::require_admin(&env, &caller);
        if !(0..=PRECISION).contains(&proportion) {
            panic_with_error!(&env, Error::InvalidParams);
        }
        storage::set_default_late_fee(&env, &proportion);
    }

    /// Toggle late-penalty accrual. Disabled until an admin opts in.
    /// Admin only.
    pub fn set_penalty_enabled(env: Env, caller: Address, enabled: bool) {
        caller.require_auth();
        rbac::require_admin(&env, &caller);
        storage::set_penalty_enabled(&env, enabled);
    }

    /// Set the claim-ledger metadata URI. Admin only.
    pub fn set_metadata_uri(env: Env, caller: Address, uri: String) {
        caller.require_auth();
        rbac::require_admin(&env, &caller);
        claims::set_metadata_uri(&env, &uri);
        events::metadata_updated(&env, &uri);
    }

    // ─────────────────────────────────────────────────────────
    // Proposal & funding
    // ─────────────────────────────────────────────────────────

    /// Propose a new campaign vouching for `borrower`.
    ///
    /// `sponsor` must hold the `Sponsor` role. Escrows `unit_price *
    /// max_units / collateral_ratio` from the sponsor and grants `borrower`
    /// the `Champion` role through the sponsor's delegation capability.
    /// The sponsor's registered collateral ratio and the global default
    /// late-fee proportion are snapshotted into the record.
    #[allow(clippy::too_many_arguments)]
    pub fn propose(
        env: Env,
        sponsor: Address,
        borrower: Address,
        asset: Address,
        unit_price: i128,
        max_units: u32,
        yield_rate: i128,
        max_funding_days: u32,
        days_to_first_installment: u32,
        installment_frequency_days: u32,
        number_of_installments: u32,
    ) -> Campaign {
        sponsor.require_auth();
        rbac::require_sponsor(&env, &sponsor);

        if unit_price <= 0
            || max_units == 0
            || yield_rate < 0
            || max_funding_days == 0
            || installment_frequency_days == 0
            || number_of_installments == 0
        {
            panic_with_error!(&env, Error::InvalidParams);
        }

        let collateral_ratio = rbac::sponsor_ratio(&env, &sponsor);
        let deposit_amount = unit_price * i128::from(max_units) / i128::from(collateral_ratio);

        settlement::pull(&env, &asset, &sponsor, deposit_amount);

        // Vouch the borrower in via the sponsor's delegation capability.
        rbac::grant_role(&env, &sponsor, &borrower, Role::Champion);

        let id = get_and_increment_campaign_id(&env);
        let config = CampaignConfig {
            id,
            borrower: borrower.clone(),
            sponsor: sponsor.clone(),
            asset: asset.clone(),
            unit_price,
            max_units,
            yield_rate,
            collateral_ratio,
            late_fee_proportion: storage::default_late_fee(&env),
            max_funding_days,
            days_to_first_installment,
            installment_frequency_days,
            number_of_installments,
            deposit_amount,
        };
        let state = CampaignState {
            status: CampaignStatus::Proposed,
            funding_start: 0,
            loan_drawn_at: 0,
            installments_paid: 0,
            principal_returned: 0,
            yield_accrued: 0,
            amount_claimed_by_holders: 0,
            collateral_claimed: false,
        };
        save_campaign(&env, &config, &state);

        events::campaign_proposed(
            &env,
            events::CampaignProposed {
                campaign_id: id,
                borrower,
                sponsor,
                asset,
                unit_price,
                max_units,
                deposit_amount,
            },
        );

        load_campaign(&env, id)
    }

    /// Open the funding window of a `Proposed` campaign.
    ///
    /// Only the record's sponsor may open. Registers the campaign in the
    /// expiry bucket for `now / DAY + max_funding_days`.
    pub fn open_funding(env: Env, sponsor: Address, id: u64) {
        sponsor.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if config.sponsor != sponsor {
            panic_with_error!(&env, Error::NotAuthorized);
        }
        if state.status != CampaignStatus::Proposed {
            panic_with_error!(&env, Error::StateMismatch);
        }

        let now = env.ledger().timestamp();
        let expiry_day = now / DAY_IN_SECONDS + u64::from(config.max_funding_days);

        state.status = CampaignStatus::MintOpen;
        state.funding_start = now;
        save_campaign_state(&env, id, &state);
        expiry::register(&env, expiry_day, id);

        events::funding_opened(
            &env,
            events::FundingOpened {
                campaign_id: id,
                funding_start: now,
                expiry_day,
            },
        );
    }

    /// Withdraw a campaign nobody has funded yet.
    ///
    /// Only the record's sponsor, only while `MintOpen`, and only while
    /// zero units are sold. The escrowed collateral is returned
    /// immediately — `Canceled` is terminal and has no later claim path.
    pub fn cancel(env: Env, sponsor: Address, id: u64) {
        sponsor.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if config.sponsor != sponsor {
            panic_with_error!(&env, Error::NotAuthorized);
        }
        if state.status != CampaignStatus::MintOpen || claims::total_supply(&env, id) > 0 {
            panic_with_error!(&env, Error::StateMismatch);
        }

        state.status = CampaignStatus::Canceled;
        state.collateral_claimed = true;
        save_campaign_state(&env, id, &state);
        settlement::push(&env, &config.asset, &sponsor, config.deposit_amount);

        events::campaign_canceled(&env, events::CampaignCanceled { campaign_id: id });
    }

    /// Buy `units` claim units of a `MintOpen` campaign.
    ///
    /// Pulls `unit_price * units` from the funder and mints the units.
    /// Reaching the cap flips the campaign to `ThresholdMet`.
    pub fn fund(env: Env, funder: Address, id: u64, units: u32) {
        funder.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if state.status != CampaignStatus::MintOpen {
            panic_with_error!(&env, Error::StateMismatch);
        }
        let now = env.ledger().timestamp();
        if now >= state.funding_start + u64::from(config.max_funding_days) * DAY_IN_SECONDS {
            panic_with_error!(&env, Error::WindowExpired);
        }
        if units == 0 {
            panic_with_error!(&env, Error::InvalidParams);
        }

        let supply = claims::total_supply(&env, id);
        let new_supply = supply + i128::from(units);
        if new_supply > i128::from(config.max_units) {
            panic_with_error!(&env, Error::CapacityExceeded);
        }

        let amount = config.unit_price * i128::from(units);
        settlement::pull(&env, &config.asset, &funder, amount);
        claims::mint(&env, &funder, id, i128::from(units));

        let threshold_met = new_supply == i128::from(config.max_units);
        if threshold_met {
            state.status = CampaignStatus::ThresholdMet;
            save_campaign_state(&env, id, &state);
        }

        events::units_funded(
            &env,
            events::UnitsFunded {
                campaign_id: id,
                funder,
                units,
                amount,
                threshold_met,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Expiry sweep (two-phase, externally triggered)
    // ─────────────────────────────────────────────────────────

    /// Check phase of the expiry sweep: `true` iff the current day's bucket
    /// has campaigns to process. The returned day number is the payload for
    /// [`CrowdloanProtocol::perform_expiry`].
    pub fn check_expiry(env: Env) -> (bool, u64) {
        let today = env.ledger().timestamp() / DAY_IN_SECONDS;
        (!expiry::peek(&env, today).is_empty(), today)
    }

    /// Perform phase of the expiry sweep: drain the bucket for `day` and
    /// force every campaign still `MintOpen` to `ThresholdUnmet`.
    ///
    /// The bucket is deleted after processing, so repeat calls for the same
    /// day are no-ops. Sweeping a future day is rejected.
    pub fn perform_expiry(env: Env, day: u64) {
        let today = env.ledger().timestamp() / DAY_IN_SECONDS;
        if day > today {
            panic_with_error!(&env, Error::InvalidParams);
        }

        for id in expiry::drain(&env, day).iter() {
            let mut state = load_campaign_state(&env, id);
            if state.status != CampaignStatus::MintOpen {
                continue;
            }
            state.status = CampaignStatus::ThresholdUnmet;
            save_campaign_state(&env, id, &state);
            events::campaign_expired(&env, events::CampaignExpired { campaign_id: id, day });
        }
    }

    // ─────────────────────────────────────────────────────────
    // Repayment
    // ─────────────────────────────────────────────────────────

    /// Disburse the pooled funds of a `ThresholdMet` campaign to its
    /// borrower as the loan principal.
    pub fn draw_loan(env: Env, borrower: Address, id: u64) {
        borrower.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if config.borrower != borrower {
            panic_with_error!(&env, Error::NotAuthorized);
        }
        if state.status != CampaignStatus::ThresholdMet {
            panic_with_error!(&env, Error::StateMismatch);
        }

        let amount = config.unit_price * i128::from(config.max_units);
        state.status = CampaignStatus::Loaned;
        state.loan_drawn_at = env.ledger().timestamp();
        save_campaign_state(&env, id, &state);
        settlement::push(&env, &config.asset, &borrower, amount);

        events::loan_drawn(
            &env,
            events::LoanDrawn {
                campaign_id: id,
                borrower,
                amount,
            },
        );
    }

    /// Pay the next installment (`installments_paid + 1`) of a `Loaned`
    /// campaign. Strictly sequential.
    ///
    /// Pulls the yield-adjusted installment plus any late-payment penalty
    /// from the borrower. Once the cumulative repayment covers the
    /// outstanding principal the campaign flips to `BurnOpen` — the check
    /// runs even when the computed installment owes nothing, so a campaign
    /// whose debt is already retired finalizes on the next call without
    /// moving money. A zero-owed call below that bar is a no-op.
    pub fn pay_installment(env: Env, borrower: Address, id: u64) {
        borrower.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if config.borrower != borrower {
            panic_with_error!(&env, Error::NotAuthorized);
        }
        if state.status != CampaignStatus::Loaned {
            panic_with_error!(&env, Error::StateMismatch);
        }

        let supply = claims::total_supply(&env, id);
        let outstanding_principal = supply * config.unit_price;

        let base = math::base_installment_owed(
            config.unit_price,
            config.max_units,
            state.installments_paid,
            config.number_of_installments,
            supply,
        );

        let mut owed = 0i128;
        let mut penalty = 0i128;
        if base > 0 {
            let index = state.installments_paid + 1;
            owed = math::yield_adjusted(base, config.yield_rate);
            if storage::penalty_enabled(&env) && config.late_fee_proportion > 0 {
                let factor =
                    math::daily_penalty_factor(config.yield_rate, config.late_fee_proportion);
                penalty = math::late_penalty(
                    owed,
                    env.ledger().timestamp(),
                    state.loan_drawn_at,
                    factor,
                    index,
                    config.days_to_first_installment,
                    config.installment_frequency_days,
                );
            }

            settlement::pull(&env, &config.asset, &borrower, owed + penalty);
            state.installments_paid = index;
            state.principal_returned += owed;
            state.yield_accrued += penalty;
        }

        let finalized = state.principal_returned >= outstanding_principal;
        if finalized {
            state.status = CampaignStatus::BurnOpen;
        }
        if owed == 0 && !finalized {
            // Nothing owed, debt not yet retired: explicit no-op.
            return;
        }
        save_campaign_state(&env, id, &state);

        events::installment_paid(
            &env,
            events::InstallmentPaid {
                campaign_id: id,
                index: state.installments_paid,
                amount: owed,
                penalty,
                finalized,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Settlement & claims
    // ─────────────────────────────────────────────────────────

    /// Return the escrowed collateral to the record's sponsor. One-shot;
    /// only once the campaign has reached `BurnOpen` or `ThresholdUnmet`.
    pub fn claim_collateral(env: Env, sponsor: Address, id: u64) {
        sponsor.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if config.sponsor != sponsor {
            panic_with_error!(&env, Error::NotAuthorized);
        }
        if !matches!(
            state.status,
            CampaignStatus::BurnOpen | CampaignStatus::ThresholdUnmet
        ) {
            panic_with_error!(&env, Error::StateMismatch);
        }
        if state.collateral_claimed {
            panic_with_error!(&env, Error::AlreadyClaimed);
        }

        state.collateral_claimed = true;
        save_campaign_state(&env, id, &state);
        settlement::push(&env, &config.asset, &sponsor, config.deposit_amount);

        events::collateral_claimed(
            &env,
            events::CollateralClaimed {
                campaign_id: id,
                sponsor,
                amount: config.deposit_amount,
            },
        );
    }

    /// Burn the holder's full claim balance of a `BurnOpen` campaign and
    /// pay out its share of principal, yield, and penalty pot.
    ///
    /// The base claim is `(unit_price + yield) * balance` and must be
    /// covered by repaid principal — early claimants wait until enough
    /// installments have been collected. The penalty pot is split
    /// pro-rata; the last holder takes the exact remainder and flips the
    /// campaign to `Finished`.
    pub fn burn_for_settlement(env: Env, holder: Address, id: u64) {
        holder.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if state.status != CampaignStatus::BurnOpen {
            panic_with_error!(&env, Error::StateMismatch);
        }
        let balance = claims::balance_of(&env, &holder, id);
        if balance <= 0 {
            panic_with_error!(&env, Error::NothingToClaim);
        }

        let supply = claims::total_supply(&env, id);
        let base_claim = math::yield_adjusted(config.unit_price, config.yield_rate) * balance;
        if state.principal_returned < state.amount_claimed_by_holders + base_claim {
            panic_with_error!(&env, Error::InsufficientRepaid);
        }

        let yield_claim = if balance == supply {
            state.yield_accrued
        } else {
            state.yield_accrued * balance / supply
        };

        claims::burn_from_holder(&env, &holder, id, balance);
        state.amount_claimed_by_holders += base_claim;
        state.yield_accrued -= yield_claim;
        if balance == supply {
            state.status = CampaignStatus::Finished;
        }
        save_campaign_state(&env, id, &state);
        settlement::push(&env, &config.asset, &holder, base_claim + yield_claim);

        events::claim_settled(
            &env,
            events::ClaimSettled {
                campaign_id: id,
                holder,
                units_burned: balance,
                base_amount: base_claim,
                yield_amount: yield_claim,
            },
        );
    }

    /// Burn the holder's full claim balance of a `ThresholdUnmet` campaign
    /// and refund its principal — `unit_price * balance`, no yield.
    ///
    /// The last holder flips the campaign to `Finished`.
    pub fn burn_for_recovery(env: Env, holder: Address, id: u64) {
        holder.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if state.status != CampaignStatus::ThresholdUnmet {
            panic_with_error!(&env, Error::StateMismatch);
        }
        let balance = claims::balance_of(&env, &holder, id);
        if balance <= 0 {
            panic_with_error!(&env, Error::NothingToClaim);
        }

        let supply = claims::total_supply(&env, id);
        let amount = config.unit_price * balance;

        claims::burn_from_holder(&env, &holder, id, balance);
        if balance == supply {
            state.status = CampaignStatus::Finished;
        }
        save_campaign_state(&env, id, &state);
        settlement::push(&env, &config.asset, &holder, amount);

        events::claim_recovered(
            &env,
            events::ClaimRecovered {
                campaign_id: id,
                holder,
                units_burned: balance,
                amount,
            },
        );
    }

    /// Sweep the residual of a `Finished` campaign to its borrower:
    /// repaid principal nobody claimed (rounding dust) plus any penalty pot
    /// left over. Zeroes both.
    pub fn claim_residual(env: Env, borrower: Address, id: u64) {
        borrower.require_auth();
        let config = load_campaign_config(&env, id);
        let mut state = load_campaign_state(&env, id);

        if config.borrower != borrower {
            panic_with_error!(&env, Error::NotAuthorized);
        }
        if state.status != CampaignStatus::Finished {
            panic_with_error!(&env, Error::StateMismatch);
        }

        let residual =
            (state.principal_returned - state.amount_claimed_by_holders) + state.yield_accrued;
        if residual <= 0 {
            panic_with_error!(&env, Error::NothingToClaim);
        }

        state.principal_returned = state.amount_claimed_by_holders;
        state.yield_accrued = 0;
        save_campaign_state(&env, id, &state);
        settlement::push(&env, &config.asset, &borrower, residual);

        events::residual_claimed(
            &env,
            events::ResidualClaimed {
                campaign_id: id,
                borrower,
                amount: residual,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Retrieve a campaign by its ID.
    pub fn get_campaign(env: Env, id: u64) -> Campaign {
        load_campaign(&env, id)
    }

    /// Claim units held by `holder` for campaign `id`.
    pub fn balance_of(env: Env, holder: Address, id: u64) -> i128 {
        claims::balance_of(&env, &holder, id)
    }

    /// Total outstanding claim units for campaign `id`.
    pub fn total_supply(env: Env, id: u64) -> i128 {
        claims::total_supply(&env, id)
    }

    /// Current claim-ledger metadata URI, if set.
    pub fn metadata_uri(env: Env) -> Option<String> {
        claims::metadata_uri(&env)
    }
}
