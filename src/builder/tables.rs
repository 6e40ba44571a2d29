//! TABLES section → [`SymbolTables`]

use tracing::{trace, warn};

use crate::io::{CodeLookup, Record};
use crate::notification::{NotificationCollection, NotificationType};
use crate::tables::{
    AppId, BlockRecord, DimStyle, Layer, LineType, MLeaderStyle, MLineStyle, Scale, SymbolTables,
    Table, TableEntry, TableStyle, TextStyle, Ucs, VPort, View, VisualStyle,
};
use crate::types::Handle;

/// Framing state while walking `TABLE` ... `ENDTAB` runs
#[derive(Debug, Clone, PartialEq, Eq)]
enum TableScanState {
    /// Between tables
    Idle,
    /// Inside the table opened at `line`
    InTable { name: String, line: u32 },
}

/// What happened to one table record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordOutcome {
    Inserted,
    /// Inserted, replacing a record with the same handle
    DuplicateHandle,
    /// No name code carried a value
    Unnamed,
    /// Record type the extractor does not know
    Ignored,
}

/// Decode every table record of the TABLES section.
///
/// Records are dispatched on their own type name, so a record outside its
/// `TABLE` wrapper still lands in the right table.
pub(crate) fn extract_tables(
    records: &[Record<'_>],
    notifications: &mut NotificationCollection,
) -> SymbolTables {
    let mut tables = SymbolTables::default();
    let mut state = TableScanState::Idle;

    for record in records {
        match record.kind {
            "TABLE" => {
                if let TableScanState::InTable { name, line } = &state {
                    notifications.notify_at(
                        NotificationType::StructureMismatch,
                        *line,
                        format!("TABLE {name} not closed by ENDTAB"),
                    );
                }
                let lookup = CodeLookup::new(record.tags);
                let name = lookup.string(2).unwrap_or_default().trim().to_uppercase();
                set_table_handle(&mut tables, &name, lookup.handle(5));
                state = TableScanState::InTable {
                    name,
                    line: record.line,
                };
            }
            "ENDTAB" => {
                if state == TableScanState::Idle {
                    notifications.notify_at(
                        NotificationType::StructureMismatch,
                        record.line,
                        "ENDTAB without open TABLE",
                    );
                }
                state = TableScanState::Idle;
            }
            kind => {
                if state == TableScanState::Idle {
                    trace!(kind, line = record.line, "table record outside TABLE");
                }
                let lookup = CodeLookup::new(record.tags);
                match insert_record(&mut tables, kind, &lookup, record.line) {
                    RecordOutcome::Inserted | RecordOutcome::Ignored => {}
                    RecordOutcome::DuplicateHandle => {
                        warn!(kind, line = record.line, "duplicate table record handle");
                        notifications.notify_at(
                            NotificationType::Warning,
                            record.line,
                            format!("{kind} record reuses an existing handle"),
                        );
                    }
                    RecordOutcome::Unnamed => {
                        notifications.notify_at(
                            NotificationType::Warning,
                            record.line,
                            format!("{kind} record without a name skipped"),
                        );
                    }
                }
            }
        }
    }

    if let TableScanState::InTable { name, line } = state {
        notifications.notify_at(
            NotificationType::StructureMismatch,
            line,
            format!("TABLE {name} not closed by ENDTAB"),
        );
    }
    tables
}

/// Decode one record by type name and insert it into its table
pub(crate) fn insert_record(
    tables: &mut SymbolTables,
    kind: &str,
    lookup: &CodeLookup<'_>,
    line: u32,
) -> RecordOutcome {
    match kind.to_uppercase().as_str() {
        "LAYER" => push(&mut tables.layers, Layer::decode(lookup, line)),
        "LTYPE" => push(&mut tables.linetypes, LineType::decode(lookup, line)),
        "STYLE" => push(&mut tables.text_styles, TextStyle::decode(lookup, line)),
        "BLOCK_RECORD" => push(&mut tables.block_records, BlockRecord::decode(lookup, line)),
        "VISUALSTYLE" => push(&mut tables.visual_styles, VisualStyle::decode(lookup, line)),
        "MULTILEADERSTYLE" | "MLEADERSTYLE" => {
            push(&mut tables.mleader_styles, MLeaderStyle::decode(lookup, line))
        }
        "UCS" => push(&mut tables.ucs, Ucs::decode(lookup, line)),
        "VPORT" => push(&mut tables.vports, VPort::decode(lookup, line)),
        "DIMSTYLE" => push(&mut tables.dim_styles, DimStyle::decode(lookup, line)),
        "TABLESTYLE" => push(&mut tables.table_styles, TableStyle::decode(lookup, line)),
        "MLINESTYLE" => push(&mut tables.mline_styles, MLineStyle::decode(lookup, line)),
        "SCALE" => push(&mut tables.scales, Scale::decode(lookup, line)),
        "APPID" => push(&mut tables.app_ids, AppId::decode(lookup, line)),
        "REGAPP" => push(&mut tables.reg_apps, AppId::decode(lookup, line)),
        "VIEW" => push(&mut tables.views, View::decode(lookup, line)),
        _ => RecordOutcome::Ignored,
    }
}

fn push<T: TableEntry>(table: &mut Table<T>, record: Option<T>) -> RecordOutcome {
    let Some(record) = record else {
        return RecordOutcome::Unnamed;
    };
    let duplicate = record.handle().is_some_and(|h| table.contains_handle(h));
    table.insert(record);
    if duplicate {
        RecordOutcome::DuplicateHandle
    } else {
        RecordOutcome::Inserted
    }
}

fn set_table_handle(tables: &mut SymbolTables, name: &str, handle: Option<Handle>) {
    match name {
        "LAYER" => tables.layers.set_handle(handle),
        "LTYPE" => tables.linetypes.set_handle(handle),
        "STYLE" => tables.text_styles.set_handle(handle),
        "BLOCK_RECORD" => tables.block_records.set_handle(handle),
        "VISUALSTYLE" => tables.visual_styles.set_handle(handle),
        "MULTILEADERSTYLE" | "MLEADERSTYLE" => tables.mleader_styles.set_handle(handle),
        "UCS" => tables.ucs.set_handle(handle),
        "VPORT" => tables.vports.set_handle(handle),
        "DIMSTYLE" => tables.dim_styles.set_handle(handle),
        "TABLESTYLE" => tables.table_styles.set_handle(handle),
        "MLINESTYLE" => tables.mline_styles.set_handle(handle),
        "SCALE" => tables.scales.set_handle(handle),
        "APPID" => tables.app_ids.set_handle(handle),
        "REGAPP" => tables.reg_apps.set_handle(handle),
        "VIEW" => tables.views.set_handle(handle),
        other => trace!(table = other, "unknown table"),
    }
}
