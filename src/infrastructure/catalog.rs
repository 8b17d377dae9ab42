use crate::core::models::LoanOffer;
use std::io::Read;

/// Reads catalog rows from CSV. The header must name the `LoanOffer` fields;
/// extra columns are ignored and surrounding whitespace is trimmed.
pub fn read_loan_offers<R: Read>(reader: R) -> Result<Vec<LoanOffer>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<LoanOffer>().collect()
}
