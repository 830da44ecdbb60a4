use std::io::Read;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::{CatalogError, RateKey};

#[derive(Debug, Deserialize)]
struct RateRow {
    category: String,
    key: String,
    rate: String,
}

pub(super) fn parse_rate_sheet<R: Read>(reader: R) -> Result<Vec<(RateKey, Decimal)>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut overrides = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: RateRow = record.deserialize(Some(&headers))?;

        let key = RateKey::parse(&row.category, &row.key).ok_or_else(|| {
            CatalogError::UnknownRate {
                line,
                category: row.category.clone(),
                key: row.key.clone(),
            }
        })?;

        let rate = Decimal::from_str(&row.rate)
            .ok()
            .filter(|rate| !rate.is_sign_negative() && *rate <= key.ceiling())
            .ok_or_else(|| CatalogError::InvalidRate {
                line,
                value: row.rate.clone(),
            })?;

        overrides.push((key, rate));
    }

    Ok(overrides)
}
