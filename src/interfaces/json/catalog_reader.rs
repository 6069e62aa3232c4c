use crate::domain::catalog::{CatalogData, ReferenceCatalog};
use crate::error::Result;
use std::io::Read;

/// Loads a `ReferenceCatalog` from a JSON document of the form
/// `{"merchants": [...], "card": {...}, "transactions": [...]}`.
pub struct CatalogReader<R: Read> {
    source: R,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<ReferenceCatalog> {
        let data: CatalogData = serde_json::from_reader(self.source)?;
        ReferenceCatalog::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvisioningError;

    const CARD: &str = r#"{
        "cardNumber": "4111111111111111",
        "cardHolderName": "A N OTHER",
        "expiryDate": "01/30",
        "cvv": "999",
        "cardType": "visa",
        "issuerBankId": "TEST_BANK",
        "availableLimit": 1000,
        "totalOutstanding": "12.50",
        "nextStatementDate": "2030-01-01",
        "unspentAmount": 0
    }"#;

    #[test]
    fn test_read_catalog() {
        let json = format!(
            r#"{{"merchants": [
                {{"id": 10, "name": "Cafe", "externalMerchantId": "EXT_10", "category": "Food"}}
            ], "card": {CARD}}}"#
        );
        let catalog = CatalogReader::new(json.as_bytes()).read().unwrap();
        assert_eq!(catalog.find_merchant_by_id(10).unwrap().name, "Cafe");
        assert_eq!(catalog.card_profile().card_holder_name, "A N OTHER");
        assert_eq!(catalog.transaction_page(0, 10).total_count, 0);
    }

    #[test]
    fn test_read_catalog_rejects_shared_merchant_names() {
        let json = format!(
            r#"{{"merchants": [
                {{"id": 1, "name": "Myntra", "externalMerchantId": "VISA_MERCHANT_001", "category": "Fashion"}},
                {{"id": 50, "name": "Myntra", "externalMerchantId": "EXT_50", "category": "Fashion"}}
            ], "card": {CARD}}}"#
        );
        let result = CatalogReader::new(json.as_bytes()).read();
        assert!(matches!(result, Err(ProvisioningError::InvalidRequest(_))));
    }

    #[test]
    fn test_read_catalog_rejects_garbage() {
        let result = CatalogReader::new("{\"merchants\": 3}".as_bytes()).read();
        assert!(matches!(result, Err(ProvisioningError::JsonError(_))));
    }
}
