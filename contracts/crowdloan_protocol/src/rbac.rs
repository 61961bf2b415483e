//! # Role-Based Access Control
//!
//! Capability substrate for the protocol. Three roles exist:
//!
//! | Role       | Capability                                            |
//! |------------|-------------------------------------------------------|
//! | `Admin`    | Protocol settings, sponsor registry, any role grant   |
//! | `Sponsor`  | Propose campaigns; may grant `Champion` (delegation)  |
//! | `Champion` | Borrower identity vouched for by a sponsor            |
//!
//! An address holds at most one role. The grant rule table:
//!
//! - `Admin` grants any role.
//! - `Sponsor` grants `Champion` only — the delegation rule exercised by
//!   `propose`, which vouches the borrower in.
//! - Nobody else grants anything.
//!
//! Sponsors additionally carry a registered collateral ratio (set by the
//! admin alongside the role) that `propose` snapshots into each campaign.
//!
//! Role storage lives in [`RbacKey`], separate from campaign storage.

use soroban_sdk::{contracttype, panic_with_error, symbol_short, Address, Env, Symbol};

use crate::storage::bump_instance;
use crate::Error;

/// Protocol roles.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Admin,
    Sponsor,
    Champion,
}

impl Role {
    fn as_symbol(&self) -> Symbol {
        match self {
            Role::Admin => symbol_short!("admin"),
            Role::Sponsor => symbol_short!("sponsor"),
            Role::Champion => symbol_short!("champion"),
        }
    }
}

/// RBAC storage keys (Instance tier — role data lives as long as the
/// contract).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RbacKey {
    /// One-shot bootstrap guard.
    Initialized,
    /// Role held by an address, if any.
    Role(Address),
    /// Registered under-collateralization ratio of a sponsor.
    SponsorRatio(Address),
}

/// Bootstrap the role registry with the first admin.
///
/// Panics with [`Error::AlreadyInitialized`] on any call after the first.
pub fn init_admin(env: &Env, admin: &Address) {
    if env.storage().instance().has(&RbacKey::Initialized) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
    env.storage().instance().set(&RbacKey::Initialized, &true);
    set_role(env, admin, Role::Admin);
    bump_instance(env);

    env.events().publish(
        (symbol_short!("role_set"), admin.clone(), Role::Admin.as_symbol()),
        admin.clone(),
    );
}

/// Grant `role` to `target` on behalf of `caller`, enforcing the grant rule
/// table. The caller's authorization must already be required by the entry
/// point.
pub fn grant_role(env: &Env, caller: &Address, target: &Address, role: Role) {
    let allowed = match role_of(env, caller) {
        Some(Role::Admin) => true,
        Some(Role::Sponsor) => role == Role::Champion,
        _ => false,
    };
    if !allowed {
        panic_with_error!(env, Error::NotAuthorized);
    }

    set_role(env, target, role);
    env.events().publish(
        (symbol_short!("role_set"), target.clone(), role.as_symbol()),
        caller.clone(),
    );
}

/// Revoke whatever role `target` holds. Admin only.
pub fn revoke_role(env: &Env, caller: &Address, target: &Address) {
    require_admin(env, caller);
    let role = role_of(env, target).unwrap_or_else(|| panic_with_error!(env, Error::RoleNotFound));
    env.storage().instance().remove(&RbacKey::Role(target.clone()));
    bump_instance(env);

    env.events().publish(
        (symbol_short!("role_del"), target.clone(), role.as_symbol()),
        caller.clone(),
    );
}

/// Return the role held by `address`, or `None`.
pub fn role_of(env: &Env, address: &Address) -> Option<Role> {
    bump_instance(env);
    env.storage().instance().get(&RbacKey::Role(address.clone()))
}

/// Return `true` if `address` holds `role`.
pub fn has_role(env: &Env, address: &Address, role: Role) -> bool {
    role_of(env, address) == Some(role)
}

/// Panic with [`Error::NotAuthorized`] unless `address` holds `Admin`.
pub fn require_admin(env: &Env, address: &Address) {
    if !has_role(env, address, Role::Admin) {
        panic_with_error!(env, Error::NotAuthorized);
    }
}

/// Panic with [`Error::NotAuthorized`] unless `address` holds `Sponsor`.
pub fn require_sponsor(env: &Env, address: &Address) {
    if !has_role(env, address, Role::Sponsor) {
        panic_with_error!(env, Error::NotAuthorized);
    }
}

/// Record a sponsor's collateral ratio alongside the role grant.
pub fn set_sponsor_ratio(env: &Env, sponsor: &Address, ratio: u32) {
    env.storage()
        .instance()
        .set(&RbacKey::SponsorRatio(sponsor.clone()), &ratio);
    bump_instance(env);
}

/// Registered collateral ratio of a sponsor.
///
/// Panics with [`Error::NotAuthorized`] for addresses never registered
/// through the admin surface.
pub fn sponsor_ratio(env: &Env, sponsor: &Address) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&RbacKey::SponsorRatio(sponsor.clone()))
        .unwrap_or_else(|| panic_with_error!(env, Error::NotAuthorized))
}

fn set_role(env: &Env, address: &Address, role: Role) {
    env.storage()
        .instance()
        .set(&RbacKey::Role(address.clone()), &role);
    bump_instance(env);
}
