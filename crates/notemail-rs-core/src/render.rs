//! Shared pieces of the textual output format.

use std::fmt;

/// Line printed after every listed message.
pub const SEPARATOR: &str = "----------------------------------------";

pub(crate) fn write_separator(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{SEPARATOR}")
}
