//! Typed client for the BitLend lending canister.
//!
//! The canister owns all balance accounting, collateral ratios, interest,
//! and liquidation. This module only shapes the calls: it does not validate
//! arguments or interpret results, and it signs with whatever agent the
//! session manager produced.
use crate::error::lending::CallError;
use candid::{CandidType, Nat, Principal};
use ic_agent::Agent;
use ic_utils::call::{AsyncCall, SyncCall};
use ic_utils::Canister;
use serde::Deserialize;

const BORROW_METHOD: &str = "borrow";
const DEPOSIT_COLLATERAL_METHOD: &str = "deposit_collateral";
const GET_BALANCES_METHOD: &str = "get_balances";
const GET_BALANCE_OF_METHOD: &str = "get_balance_of";
const LIQUIDATE_METHOD: &str = "liquidate";
const REPAY_LOAN_METHOD: &str = "repay_loan";
const SET_PRICE_METHOD: &str = "set_price";
const WITHDRAW_METHOD: &str = "withdraw";

/// One account's position: collateral locked and debt drawn against it,
/// both in base units.
#[derive(CandidType, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoanInfo {
    pub collateral: u64,
    pub debt: u64,
}

/// ICRC-1 account of the collateral token ledger.
#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub owner: Principal,
    pub subaccount: Option<serde_bytes::ByteBuf>,
}

impl Account {
    pub fn of(owner: Principal) -> Self {
        Self {
            owner,
            subaccount: None,
        }
    }
}

fn lending_canister(agent: &Agent, canister_id: Principal) -> Result<Canister<'_>, CallError> {
    Canister::builder()
        .with_agent(agent)
        .with_canister_id(canister_id)
        .build()
        .map_err(CallError::Build)
}

pub async fn borrow(
    agent: &Agent,
    canister_id: Principal,
    amount: u64,
) -> Result<(), CallError> {
    let canister = lending_canister(agent, canister_id)?;
    canister
        .update(BORROW_METHOD)
        .with_arg(amount)
        .build()
        .call_and_wait()
        .await
        .map_err(CallError::Agent)
}

pub async fn deposit_collateral(
    agent: &Agent,
    canister_id: Principal,
    amount: u64,
) -> Result<(), CallError> {
    let canister = lending_canister(agent, canister_id)?;
    canister
        .update(DEPOSIT_COLLATERAL_METHOD)
        .with_arg(amount)
        .build()
        .call_and_wait()
        .await
        .map_err(CallError::Agent)
}

/// Every open position, keyed by owner.
pub async fn get_balances(
    agent: &Agent,
    canister_id: Principal,
) -> Result<Vec<(Principal, LoanInfo)>, CallError> {
    let canister = lending_canister(agent, canister_id)?;
    let (balances,) = canister
        .query(GET_BALANCES_METHOD)
        .build()
        .call()
        .await
        .map_err(CallError::Agent)?;
    Ok(balances)
}

/// Collateral-token balance of an account, as reported by the canister's
/// own ledger lookup.
pub async fn get_balance_of(
    agent: &Agent,
    canister_id: Principal,
    account: Account,
) -> Result<Nat, CallError> {
    let canister = lending_canister(agent, canister_id)?;
    let (result,): (Result<Nat, String>,) = canister
        .update(GET_BALANCE_OF_METHOD)
        .with_arg(account)
        .build()
        .call_and_wait()
        .await
        .map_err(CallError::Agent)?;
    result.map_err(CallError::Rejected)
}

pub async fn liquidate(
    agent: &Agent,
    canister_id: Principal,
    owner: Principal,
) -> Result<(), CallError> {
    let canister = lending_canister(agent, canister_id)?;
    canister
        .update(LIQUIDATE_METHOD)
        .with_arg(owner)
        .build()
        .call_and_wait()
        .await
        .map_err(CallError::Agent)
}

pub async fn repay_loan(agent: &Agent, canister_id: Principal) -> Result<(), CallError> {
    let canister = lending_canister(agent, canister_id)?;
    canister
        .update(REPAY_LOAN_METHOD)
        .build()
        .call_and_wait()
        .await
        .map_err(CallError::Agent)
}

pub async fn set_price(
    agent: &Agent,
    canister_id: Principal,
    price: u64,
) -> Result<(), CallError> {
    let canister = lending_canister(agent, canister_id)?;
    canister
        .update(SET_PRICE_METHOD)
        .with_arg(price)
        .build()
        .call_and_wait()
        .await
        .map_err(CallError::Agent)
}

/// Transfer `amount` of the collateral token to `owner`. Resolves to the
/// ledger block index on success.
pub async fn withdraw(
    agent: &Agent,
    canister_id: Principal,
    owner: Principal,
    amount: Nat,
) -> Result<Nat, CallError> {
    let canister = lending_canister(agent, canister_id)?;
    let (result,): (Result<Nat, String>,) = canister
        .update(WITHDRAW_METHOD)
        .with_arg(owner)
        .with_arg(amount)
        .build()
        .call_and_wait()
        .await
        .map_err(CallError::Agent)?;
    result.map_err(CallError::Rejected)
}
