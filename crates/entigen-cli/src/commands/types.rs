//! `entigen types`: print the field type mapping.

use serde::Serialize;

use entigen_core::domain::type_mapper::{FALLBACK, TYPE_TABLE, TypeDef};

use crate::{error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct TypeRow {
    names: Vec<&'static str>,
    java: &'static str,
    sql: &'static str,
    import: Option<&'static str>,
}

impl From<&TypeDef> for TypeRow {
    fn from(def: &TypeDef) -> Self {
        Self {
            names: def.names.to_vec(),
            java: def.target,
            sql: def.sql,
            import: def.import,
        }
    }
}

pub fn execute(output: OutputManager) -> CliResult<()> {
    if output.is_json() {
        let rows: Vec<TypeRow> = TYPE_TABLE.iter().map(TypeRow::from).collect();
        output.json(&rows)?;
        return Ok(());
    }

    output.header("Supported field types:")?;
    output.print(&format!("  {:<18} {:<15} {}", "TYPE", "JAVA", "SQL"))?;
    for def in TYPE_TABLE {
        output.print(&format!(
            "  {:<18} {:<15} {}",
            def.names.join(", "),
            def.target,
            def.sql
        ))?;
    }
    output.print("")?;
    output.info(&format!(
        "Names are case-insensitive; unknown types map to {} / {}",
        FALLBACK.target, FALLBACK.sql
    ))?;
    Ok(())
}
