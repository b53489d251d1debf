use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::Result;
use crate::store::model::StoredResult;
use crate::store::storage::ResultStore;

/// 以表格打印最近的结果
pub fn list_results(store: &ResultStore, limit: usize) -> Result<()> {
    let entries = store.tail(limit)?;
    if entries.is_empty() {
        println!("No stored results in {}", store.path().display());
        return Ok(());
    }

    println!("{}", build_table(&entries));
    Ok(())
}

fn build_table(entries: &[StoredResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Run", "Time", "Num", "Method", "URI", "Status", "Duration", "Result",
    ]);

    for entry in entries {
        let (verdict, color) = if entry.probe {
            ("RUN", Color::Blue)
        } else if entry.output.pass {
            ("PASS", Color::Green)
        } else {
            ("FAIL", Color::Red)
        };

        table.add_row(vec![
            Cell::new(&entry.run_id[..8]),
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&entry.num),
            Cell::new(&entry.method),
            Cell::new(&entry.uri).add_attribute(Attribute::Dim),
            Cell::new(entry.status),
            Cell::new(format!("{}ms", entry.request_time)),
            Cell::new(verdict).fg(color),
        ]);
    }

    table
}
