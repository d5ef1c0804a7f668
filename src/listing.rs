//! The `alias key = 'value'` listing format.
//!
//! Listings are written for people, but they are also meant to be pasted
//! back: [`replay`] rebuilds a table from one without resolving the values a
//! second time.

use std::io::{self, Write};

use crate::error::{AliasError, AliasResult};
use crate::table::AliasTable;

const PREFIX: &str = "alias ";
const SEPARATOR: &str = " = '";

pub fn format_entry(key: &str, value: &str) -> String {
    format!("alias {} = '{}'", key, value)
}

pub fn print_aliases<W: Write>(table: &AliasTable, out: &mut W) -> io::Result<()> {
    for (key, value) in table.list_all() {
        writeln!(out, "{}", format_entry(key, value))?;
    }
    Ok(())
}

/// Splits a listing line into its key and value.
///
/// The value is taken verbatim between the first `= '` and the final quote,
/// so values that contain quotes survive.
pub fn parse_line(line: &str) -> AliasResult<(&str, &str)> {
    let malformed = || AliasError::MalformedListing(line.to_string());

    let rest = line.strip_prefix(PREFIX).ok_or_else(malformed)?;
    let (key, quoted) = rest.split_once(SEPARATOR).ok_or_else(malformed)?;
    let value = quoted.strip_suffix('\'').ok_or_else(malformed)?;

    if key.is_empty() {
        return Err(malformed());
    }
    Ok((key, value))
}

/// Blank lines are skipped. Values are stored without being resolved again.
pub fn replay(table: &mut AliasTable, listing: &str) -> AliasResult<usize> {
    let mut restored = 0;
    for line in listing.lines().filter(|line| !line.trim().is_empty()) {
        let (key, value) = parse_line(line)?;
        table.restore(key, value)?;
        restored += 1;
    }
    Ok(restored)
}
