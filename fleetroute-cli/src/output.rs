//! Writing command results to stdout.

use std::io::Write;

use serde::Serialize;

use crate::CliError;

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    write_line(writer, &payload)
}

/// Write `line` followed by a newline.
pub(crate) fn write_line(writer: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writer
        .write_all(line.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
