use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A wallet or merchant eligible to receive a provisioned token.
///
/// Catalog entries are immutable once loaded; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantApp {
    pub id: u32,
    pub name: String,
    /// Merchant identifier known to the token gateway.
    #[serde(alias = "merchant_id")]
    pub external_merchant_id: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// The single card profile served to the client and sent to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub card_holder_name: String,
    /// `MM/YY`
    pub expiry_date: String,
    pub cvv: String,
    pub card_type: String,
    pub issuer_bank_id: String,
    pub available_limit: Decimal,
    pub total_outstanding: Decimal,
    pub next_statement_date: NaiveDate,
    pub unspent_amount: Decimal,
}

impl CardDetails {
    /// Card number with everything but the last four digits masked.
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().collect();
        let visible = digits.len().saturating_sub(4);
        digits
            .iter()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { *c })
            .collect()
    }
}

/// One entry of the card's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTransaction {
    pub id: String,
    pub merchant: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub r#type: String,
    pub status: String,
    #[serde(default)]
    pub token_used: bool,
    #[serde(default)]
    pub token_reference_id: Option<String>,
}
