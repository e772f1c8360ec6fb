//! Per-network account balances and their table ordering
//!
//! Monetary columns rank rows before comparing amounts: positive balances
//! with a known USD rate, then positive balances without a rate, then rows
//! whose balance failed to load, then zero balances. Rows without any
//! balance come last regardless of direction.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::sort::{SortOrder, SortProperty, SortValue};
use crate::domain::table::ItemsTable;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceNetwork {
    pub name: String,
    pub display_name: String,
    pub prefix: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Balance {
    pub free: f64,
    pub reserved: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub network: BalanceNetwork,
    pub encoded_address: Option<String>,
    pub balance: Option<Balance>,
    pub usd_rate: Option<f64>,
    pub error: Option<String>,
    pub balance_supported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceColumn {
    Total,
    Free,
    Reserved,
}

impl Balance {
    pub fn amount(&self, column: BalanceColumn) -> f64 {
        match column {
            BalanceColumn::Total => self.total,
            BalanceColumn::Free => self.free,
            BalanceColumn::Reserved => self.reserved,
        }
    }
}

const RANK_POSITIVE_WITH_RATE: i64 = 4;
const RANK_POSITIVE: i64 = 3;
const RANK_ERROR: i64 = 2;
const RANK_ZERO: i64 = 1;

fn balance_key(row: &AccountBalance, column: BalanceColumn) -> SortValue {
    if row.error.is_some() {
        return SortValue::Tuple(vec![SortValue::Int(RANK_ERROR)]);
    }
    let Some(balance) = row.balance else {
        return SortValue::Absent;
    };

    let amount = balance.amount(column);
    let rank = match (amount > 0.0, row.usd_rate) {
        (true, Some(_)) => RANK_POSITIVE_WITH_RATE,
        (true, None) => RANK_POSITIVE,
        (false, _) => RANK_ZERO,
    };
    let usd_value = amount * row.usd_rate.unwrap_or(0.0);
    SortValue::Tuple(vec![SortValue::Int(rank), SortValue::Float(usd_value)])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSortProperty {
    Name,
    Prefix,
    Total,
    Free,
    Reserved,
}

impl SortProperty<AccountBalance> for BalanceSortProperty {
    fn key(&self, row: &AccountBalance) -> SortValue {
        match self {
            BalanceSortProperty::Name => row.network.display_name.as_str().into(),
            BalanceSortProperty::Prefix => SortValue::Int(i64::from(row.network.prefix)),
            BalanceSortProperty::Total => balance_key(row, BalanceColumn::Total),
            BalanceSortProperty::Free => balance_key(row, BalanceColumn::Free),
            BalanceSortProperty::Reserved => balance_key(row, BalanceColumn::Reserved),
        }
    }
}

/// Attach USD rates keyed by network name
pub fn with_usd_rates(
    balances: Vec<AccountBalance>,
    rates: &HashMap<String, f64>,
) -> Vec<AccountBalance> {
    balances
        .into_iter()
        .map(|mut row| {
            row.usd_rate = rates.get(&row.network.name).copied();
            row
        })
        .collect()
}

pub type BalancesTable = ItemsTable<AccountBalance, BalanceSortProperty>;

/// Balances table ordered by total descending, ties by network name
pub fn balances_table(
    balances: Vec<AccountBalance>,
    page_size: usize,
) -> Result<BalancesTable, ValidationError> {
    ItemsTable::new(
        balances,
        SortOrder::desc(BalanceSortProperty::Total),
        SortOrder::asc(BalanceSortProperty::Name),
        page_size,
    )
}
