use crate::domain::merchant::CardTransaction;
use crate::error::{ProvisioningError, Result};
use std::io::Read;

/// Reads card transaction history from a CSV source.
///
/// Expects a header row using the wire field names
/// (`id,merchant,amount,date,type,status,tokenUsed,tokenReferenceId`).
/// Whitespace around fields is trimmed and an empty `tokenReferenceId` reads
/// as absent.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    /// Creates a new `TransactionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes transactions.
    pub fn transactions(self) -> impl Iterator<Item = Result<CardTransaction>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ProvisioningError::from))
    }

    /// Reads the whole source, failing on the first malformed row.
    pub fn read_all(self) -> Result<Vec<CardTransaction>> {
        self.transactions().collect()
    }
}
