use super::merchant::{CardDetails, CardTransaction, MerchantApp};
use crate::error::{ProvisioningError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw catalog contents as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    pub merchants: Vec<MerchantApp>,
    pub card: CardDetails,
    #[serde(default)]
    pub transactions: Vec<CardTransaction>,
}

/// Immutable reference dataset: known merchant apps, the card profile and its
/// transaction history.
///
/// Built once at startup and shared behind an `Arc`; there are no mutating
/// operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCatalog {
    merchants: Vec<MerchantApp>,
    card: CardDetails,
    transactions: Vec<CardTransaction>,
}

/// A window over the transaction history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage<'a> {
    pub transactions: &'a [CardTransaction],
    pub total_count: usize,
}

impl ReferenceCatalog {
    /// Builds a catalog, rejecting duplicate merchant ids, merchant names or
    /// transaction ids. Names must be unique because the token gateway
    /// addresses merchants by name.
    pub fn new(data: CatalogData) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = data.merchants.iter().find(|m| !seen.insert(m.id)) {
            return Err(ProvisioningError::InvalidRequest(format!(
                "duplicate merchant app id {} in catalog",
                dup.id
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = data.merchants.iter().find(|m| !seen.insert(m.name.as_str())) {
            return Err(ProvisioningError::InvalidRequest(format!(
                "duplicate merchant name {:?} in catalog",
                dup.name
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = data.transactions.iter().find(|t| !seen.insert(t.id.as_str())) {
            return Err(ProvisioningError::InvalidRequest(format!(
                "duplicate transaction id {} in catalog",
                dup.id
            )));
        }
        Ok(Self {
            merchants: data.merchants,
            card: data.card,
            transactions: data.transactions,
        })
    }

    /// Replaces the transaction history, keeping merchants and card.
    pub fn with_transactions(self, transactions: Vec<CardTransaction>) -> Result<Self> {
        Self::new(CatalogData {
            merchants: self.merchants,
            card: self.card,
            transactions,
        })
    }

    pub fn find_merchant_by_id(&self, id: u32) -> Option<&MerchantApp> {
        self.merchants.iter().find(|m| m.id == id)
    }

    pub fn find_merchant_by_name(&self, name: &str) -> Option<&MerchantApp> {
        self.merchants.iter().find(|m| m.name == name)
    }

    pub fn all_merchants(&self) -> &[MerchantApp] {
        &self.merchants
    }

    pub fn card_profile(&self) -> &CardDetails {
        &self.card
    }

    /// Returns up to `limit` transactions starting at `offset`.
    ///
    /// Out-of-range values are clamped; the result is empty rather than an
    /// error.
    pub fn transaction_page(&self, offset: usize, limit: usize) -> TransactionPage<'_> {
        let total_count = self.transactions.len();
        let start = offset.min(total_count);
        let end = start.saturating_add(limit).min(total_count);
        TransactionPage {
            transactions: &self.transactions[start..end],
            total_count,
        }
    }

    pub fn find_transaction(&self, id: &str) -> Result<&CardTransaction> {
        self.transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ProvisioningError::TransactionNotFound(id.to_string()))
    }
}

impl Default for ReferenceCatalog {
    /// The built-in demo dataset.
    fn default() -> Self {
        Self {
            merchants: default_merchants(),
            card: default_card(),
            transactions: default_transactions(),
        }
    }
}

fn merchant(id: u32, name: &str, category: &str, description: &str) -> MerchantApp {
    MerchantApp {
        id,
        name: name.to_string(),
        external_merchant_id: format!("VISA_MERCHANT_{id:03}"),
        category: category.to_string(),
        description: description.to_string(),
    }
}

fn default_merchants() -> Vec<MerchantApp> {
    vec![
        merchant(1, "Myntra", "Fashion", "Fashion & Lifestyle"),
        merchant(2, "Uber", "Transportation", "Ride & Delivery"),
        merchant(3, "Zepto", "Grocery", "10-minute grocery delivery"),
        merchant(4, "Playo", "Sports", "Sports & Fitness"),
        merchant(5, "Bigbasket", "Grocery", "Online grocery shopping"),
        merchant(6, "Flipkart", "E-commerce", "Online shopping"),
        merchant(7, "Swiggy", "Food", "Food delivery"),
    ]
}

fn default_card() -> CardDetails {
    CardDetails {
        card_number: "4532123456789012".to_string(),
        card_holder_name: "RAKESH VERMA".to_string(),
        expiry_date: "12/28".to_string(),
        cvv: "123".to_string(),
        card_type: "visa".to_string(),
        issuer_bank_id: "HDFC_BANK_001".to_string(),
        available_limit: Decimal::from(65000),
        total_outstanding: Decimal::ZERO,
        next_statement_date: NaiveDate::from_ymd_opt(2024, 2, 25).unwrap_or_default(),
        unspent_amount: Decimal::ZERO,
    }
}

fn transaction(
    id: &str,
    merchant: &str,
    amount: i64,
    day: u32,
    kind: &str,
    token: Option<&str>,
) -> CardTransaction {
    CardTransaction {
        id: id.to_string(),
        merchant: merchant.to_string(),
        amount: Decimal::from(amount),
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap_or_default(),
        r#type: kind.to_string(),
        status: "completed".to_string(),
        token_used: token.is_some(),
        token_reference_id: token.map(str::to_string),
    }
}

fn default_transactions() -> Vec<CardTransaction> {
    vec![
        transaction("TXN_001", "Uber", 100, 15, "ride", Some("TKN_UBER_001")),
        transaction("TXN_002", "Amazon", 250, 14, "shopping", None),
        transaction(
            "TXN_003",
            "Airtel Payment on PayZapp",
            450,
            13,
            "recharge",
            None,
        ),
        transaction("TXN_004", "Zepto", 300, 12, "grocery", Some("TKN_ZEPTO_001")),
    ]
}
