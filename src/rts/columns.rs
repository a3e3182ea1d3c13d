//! Header normalization for the RTS-GMLC CSV tables.
//!
//! `"Fuel Price $/MMBTU"` becomes `fuel_price_dollar_per_mmbtu`,
//! `"Bus ID"` becomes `bus_id`.

use csv::StringRecord;

pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('$', "dollar")
        .replace('/', "_per_")
}

pub fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers.iter().map(normalize_header).collect()
}
