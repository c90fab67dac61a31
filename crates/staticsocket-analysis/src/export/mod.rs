//! Exporters for [`AnalysisResult`]: JSON, YAML and CSV.
//!
//! Field names follow the record model (`listen_port`, `destination_host`,
//! ...) in every format.

mod csv;

use std::io::Write;

use staticsocket_core::config::OutputFormat;
use staticsocket_core::errors::ExportError;

use crate::sockets::AnalysisResult;

pub use self::csv::CSV_HEADER;

/// Write `result` to `writer` in `format`.
pub fn export<W: Write>(
    result: &AnalysisResult,
    format: OutputFormat,
    writer: &mut W,
) -> Result<(), ExportError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, result).map_err(|e| ExportError::Encode {
                format: "json",
                message: e.to_string(),
            })?;
            writeln!(writer)?;
        }
        OutputFormat::Yaml => {
            serde_yaml::to_writer(&mut *writer, result).map_err(|e| ExportError::Encode {
                format: "yaml",
                message: e.to_string(),
            })?;
        }
        OutputFormat::Csv => csv::write_csv(result, writer)?,
    }
    writer.flush()?;
    Ok(())
}

pub fn export_to_string(result: &AnalysisResult, format: OutputFormat) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    export(result, format, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::Encode {
        format: format.as_str(),
        message: e.to_string(),
    })
}
