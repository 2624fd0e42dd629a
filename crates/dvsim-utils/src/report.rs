//! Rendering of converged routing tables into human-readable text and JSON.

use std::collections::BTreeMap;
use std::path::Path;

use dvsim_core::{NodeId, RoutingTables};

use crate::{NameTable, SpecError};

/// The output shape of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Aligned, human-readable text with a generation timestamp header.
    Text,
    /// Pretty-printed JSON keyed by node name.
    Json,
}

/// Renders `tables` in `format` and writes the result to `output`, or to stdout when no
/// output path is given.
pub fn write_report(
    tables: &RoutingTables,
    names: &NameTable,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<(), SpecError> {
    let rendered = match format {
        ReportFormat::Text => text_report(tables, names),
        ReportFormat::Json => json_report(tables, names)?,
    };
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            log::info!("report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Renders every node's table as text rows, one router per block. Unreachable
/// destinations are flagged with `inf` and carry no next hop.
pub fn text_report(tables: &RoutingTables, names: &NameTable) -> String {
    let mut lines = vec![
        format!(
            "dvsim routing report (generated {})",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        String::new(),
    ];
    lines.extend(table_lines(tables, names));
    lines.join("\n")
}

/// Renders the tables as pretty-printed JSON keyed by node name.
pub fn json_report(tables: &RoutingTables, names: &NameTable) -> Result<String, SpecError> {
    #[derive(serde::Serialize)]
    struct Row<'a> {
        distance: Option<u64>,
        next_hop: Option<&'a str>,
    }

    let report = tables
        .iter()
        .map(|(id, vector)| {
            let rows = vector
                .iter()
                .map(|(dest, entry)| {
                    let row = Row {
                        distance: entry.distance.cost().map(|c| c.into_u64()),
                        next_hop: entry.next_hop.and_then(|hop| names.name_of(hop)),
                    };
                    (display_name(names, dest), row)
                })
                .collect::<BTreeMap<_, _>>();
            (display_name(names, id), rows)
        })
        .collect::<BTreeMap<_, _>>();
    Ok(serde_json::to_string_pretty(&report)?)
}

fn table_lines(tables: &RoutingTables, names: &NameTable) -> Vec<String> {
    let mut lines = Vec::new();
    for (id, vector) in tables.iter() {
        lines.push(format!("Router {}", display_name(names, id)));
        for (dest, entry) in vector.iter() {
            let via = match entry.next_hop {
                Some(hop) => display_name(names, hop),
                None => "-".to_owned(),
            };
            lines.push(format!(
                "  {} -> {} (cost: {})",
                display_name(names, dest),
                via,
                entry.distance
            ));
        }
        lines.push(String::new());
    }
    lines
}

fn display_name(names: &NameTable, id: NodeId) -> String {
    names
        .name_of(id)
        .map(str::to_owned)
        .unwrap_or_else(|| id.to_string())
}
