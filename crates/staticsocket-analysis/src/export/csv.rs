//! Hand-written CSV: one header row, one row per record.

use std::borrow::Cow;
use std::io::Write;

use crate::sockets::{AnalysisResult, SocketRecord};

pub const CSV_HEADER: &[&str] = &[
    "direction",
    "protocol",
    "owner_name",
    "source_file",
    "source_line",
    "function_name",
    "listen_port",
    "listen_interface",
    "destination_host",
    "destination_port",
    "resolved",
    "raw_value",
    "pattern_id",
];

pub(super) fn write_csv<W: Write>(result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;
    for record in result.records() {
        writeln!(writer, "{}", row(record).join(","))?;
    }
    Ok(())
}

fn row(record: &SocketRecord) -> Vec<Cow<'_, str>> {
    let source_file = record.source_file.to_string_lossy();
    vec![
        Cow::Borrowed(record.direction.as_str()),
        Cow::Borrowed(record.protocol.as_str()),
        escape_csv_field(&record.owner_name),
        escape_owned(source_file.into_owned()),
        Cow::Owned(record.source_line.to_string()),
        escape_csv_field(record.function_name.as_deref().unwrap_or("")),
        optional(record.listen_port),
        escape_csv_field(record.listen_interface.as_deref().unwrap_or("")),
        escape_csv_field(record.destination_host.as_deref().unwrap_or("")),
        optional(record.destination_port),
        Cow::Borrowed(if record.resolved { "true" } else { "false" }),
        escape_csv_field(&record.raw_value),
        escape_csv_field(&record.pattern_id),
    ]
}

fn optional(port: Option<u16>) -> Cow<'static, str> {
    port.map_or(Cow::Borrowed(""), |p| Cow::Owned(p.to_string()))
}

fn escape_owned(s: String) -> Cow<'static, str> {
    Cow::Owned(escape_csv_field(&s).into_owned())
}

fn escape_csv_field(s: &str) -> Cow<'_, str> {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use staticsocket_core::types::Protocol;

    use super::*;
    use crate::catalog::PatternDescriptor;

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_rows_follow_header() {
        let mut dial = SocketRecord::new("net.Dial", &PatternDescriptor::egress(Protocol::Tcp, 1));
        dial.apply_address("db:5432", false);
        dial.raw_value = "db:5432".into();
        dial.source_file = "main.go".into();
        dial.source_line = 7;
        dial.owner_name = "store".into();

        let mut out = Vec::new();
        write_csv(&AnalysisResult::from_records(vec![dial]), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(',').count(), CSV_HEADER.len());
        assert_eq!(lines[1], "egress,tcp,store,main.go,7,,,,db,5432,true,db:5432,net.Dial");
    }
}
