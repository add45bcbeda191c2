//! Functions for writing CSV format.
pub use csv::Error;
use csv::Writer;
use serde::Serialize;

/// Dump CSV to string.
pub fn dump_csv<S>(rows: impl IntoIterator<Item = S>) -> Result<String, Box<dyn std::error::Error>>
where
    S: Serialize,
{
    let mut w = Writer::from_writer(Vec::new());
    rows.into_iter().try_for_each(|row| w.serialize(row))?;
    Ok(String::from_utf8(w.into_inner()?)?)
}
