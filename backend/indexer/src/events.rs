//! Canonical event types emitted by the crowdloan protocol contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdloan_protocol/src/events.rs` and the `role_set` /
//! `role_del` events from its `rbac` module.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdloan contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A sponsor proposed a campaign and escrowed collateral (`proposed`).
    CampaignProposed,
    /// The funding window was opened (`opened`).
    FundingOpened,
    /// An unfunded campaign was withdrawn by its sponsor (`canceled`).
    CampaignCanceled,
    /// Claim units were purchased (`funded`).
    UnitsFunded,
    /// The expiry sweep closed a lapsed funding window (`expired`).
    CampaignExpired,
    /// The borrower drew the pooled loan principal (`drawn`).
    LoanDrawn,
    /// An installment was collected (`repaid`).
    InstallmentPaid,
    /// The sponsor reclaimed its collateral (`collat`).
    CollateralClaimed,
    /// A holder burned claim units for principal plus yield (`settled`).
    ClaimSettled,
    /// A holder recovered principal from an unmet campaign (`recovered`).
    ClaimRecovered,
    /// The borrower swept the residual of a finished campaign (`residual`).
    ResidualClaimed,
    /// A role was granted or replaced (`role_set`).
    RoleSet,
    /// A role was revoked (`role_del`).
    RoleDel,
    /// The claim-ledger metadata URI changed (`meta`).
    MetadataUpdated,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an
    /// [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "proposed" => Self::CampaignProposed,
            "opened" => Self::FundingOpened,
            "canceled" => Self::CampaignCanceled,
            "funded" => Self::UnitsFunded,
            "expired" => Self::CampaignExpired,
            "drawn" => Self::LoanDrawn,
            "repaid" => Self::InstallmentPaid,
            "collat" => Self::CollateralClaimed,
            "settled" => Self::ClaimSettled,
            "recovered" => Self::ClaimRecovered,
            "residual" => Self::ResidualClaimed,
            "role_set" => Self::RoleSet,
            "role_del" => Self::RoleDel,
            "meta" => Self::MetadataUpdated,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignProposed => "campaign_proposed",
            Self::FundingOpened => "funding_opened",
            Self::CampaignCanceled => "campaign_canceled",
            Self::UnitsFunded => "units_funded",
            Self::CampaignExpired => "campaign_expired",
            Self::LoanDrawn => "loan_drawn",
            Self::InstallmentPaid => "installment_paid",
            Self::CollateralClaimed => "collateral_claimed",
            Self::ClaimSettled => "claim_settled",
            Self::ClaimRecovered => "claim_recovered",
            Self::ResidualClaimed => "residual_claimed",
            Self::RoleSet => "role_set",
            Self::RoleDel => "role_del",
            Self::MetadataUpdated => "metadata_updated",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded crowdloan event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
