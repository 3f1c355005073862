//! The canonical lineage document
//!
//! `GraphDocument` is the single source of truth for tables, columns and
//! lineage edges. It offers lookups and field-level mutation primitives only;
//! history and projection are layered on top. Lookups return `None` on a miss
//! and mutations report whether anything was changed, leaving it to the caller
//! to decide whether a miss is an error. Callers supply ids; uniqueness is the
//! job of the id allocator.

use crate::models::{Column, EdgePatch, LayoutConfig, LineageEdge, Position, Table};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub lineage: Vec<LineageEdge>,
    #[serde(default)]
    pub config: LayoutConfig,
}

/// A node id resolved against the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    Table { table_id: String },
    Column { table_id: String, column_id: String },
}

impl GraphDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Structural deep copy of the whole document. History entries and the
    /// live document never share storage.
    pub fn snapshot(&self) -> GraphDocument {
        GraphDocument {
            tables: self.tables.clone(),
            lineage: self.lineage.clone(),
            config: self.config.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.lineage.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    // ==================== Lookups ====================

    pub fn find_table(&self, table_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    pub fn find_table_mut(&mut self, table_id: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == table_id)
    }

    pub fn find_column(&self, table_id: &str, column_id: &str) -> Option<&Column> {
        self.find_table(table_id)?.column(column_id)
    }

    /// Find a column by id alone, returning it with its owning table.
    pub fn locate_column(&self, column_id: &str) -> Option<(&Table, &Column)> {
        self.tables
            .iter()
            .find_map(|t| t.column(column_id).map(|c| (t, c)))
    }

    pub fn find_edge(&self, edge_id: &str) -> Option<&LineageEdge> {
        self.lineage.iter().find(|e| e.id == edge_id)
    }

    /// Resolve a renderer node id to a table or a column.
    pub fn resolve_node(&self, node_id: &str) -> Option<NodeRef> {
        if self.find_table(node_id).is_some() {
            return Some(NodeRef::Table {
                table_id: node_id.to_string(),
            });
        }
        self.locate_column(node_id).map(|(table, column)| NodeRef::Column {
            table_id: table.id.clone(),
            column_id: column.id.clone(),
        })
    }

    // ==================== Structural mutations ====================

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Remove a table together with its columns. Edges touching those columns
    /// are left in place.
    pub fn remove_table(&mut self, table_id: &str) -> Option<Table> {
        let index = self.tables.iter().position(|t| t.id == table_id)?;
        Some(self.tables.remove(index))
    }

    pub fn add_column(&mut self, table_id: &str, column: Column) -> bool {
        match self.find_table_mut(table_id) {
            Some(table) => {
                table.columns.push(column);
                true
            }
            None => false,
        }
    }

    /// Remove a column. Edges referencing it become dangling and are kept.
    pub fn remove_column(&mut self, table_id: &str, column_id: &str) -> Option<Column> {
        let table = self.find_table_mut(table_id)?;
        let index = table.columns.iter().position(|c| c.id == column_id)?;
        Some(table.columns.remove(index))
    }

    pub fn add_edge(&mut self, edge: LineageEdge) {
        self.lineage.push(edge);
    }

    pub fn remove_edge(&mut self, edge_id: &str) -> Option<LineageEdge> {
        let index = self.lineage.iter().position(|e| e.id == edge_id)?;
        Some(self.lineage.remove(index))
    }

    // ==================== Field mutations ====================

    pub fn update_table_position(&mut self, table_id: &str, position: Position) -> bool {
        match self.find_table_mut(table_id) {
            Some(table) => {
                table.position = Some(position);
                true
            }
            None => false,
        }
    }

    pub fn update_column_position(&mut self, table_id: &str, column_id: &str, position: Position) -> bool {
        match self.find_table_mut(table_id).and_then(|t| t.column_mut(column_id)) {
            Some(column) => {
                column.position = Some(position);
                true
            }
            None => false,
        }
    }

    pub fn rename_table(&mut self, table_id: &str, name: impl Into<String>) -> bool {
        match self.find_table_mut(table_id) {
            Some(table) => {
                table.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn rename_column(&mut self, table_id: &str, column_id: &str, name: impl Into<String>) -> bool {
        match self.find_table_mut(table_id).and_then(|t| t.column_mut(column_id)) {
            Some(column) => {
                column.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn update_edge_properties(&mut self, edge_id: &str, patch: EdgePatch) -> bool {
        match self.lineage.iter_mut().find(|e| e.id == edge_id) {
            Some(edge) => {
                edge.apply(patch);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> GraphDocument {
        let mut doc = GraphDocument::new();
        doc.add_table(
            Table::new("T1", "orders")
                .with_column(Column::new("C1", "id"))
                .with_column(Column::new("C2", "customer_id")),
        );
        doc.add_table(Table::new("T2", "customers").with_column(Column::new("C3", "id")));
        doc.add_edge(LineageEdge::new("E1", "C3", "C2"));
        doc
    }

    #[test]
    fn test_lookups_return_none_on_miss() {
        let doc = sample();
        assert!(doc.find_table("T9").is_none());
        assert!(doc.find_column("T1", "C3").is_none());
        assert!(doc.find_edge("E9").is_none());
        assert!(doc.resolve_node("nope").is_none());
    }

    #[test]
    fn test_resolve_node_distinguishes_tables_and_columns() {
        let doc = sample();
        assert_eq!(
            doc.resolve_node("T2"),
            Some(NodeRef::Table { table_id: "T2".to_string() })
        );
        assert_eq!(
            doc.resolve_node("C2"),
            Some(NodeRef::Column {
                table_id: "T1".to_string(),
                column_id: "C2".to_string()
            })
        );
    }

    #[test]
    fn test_remove_column_keeps_edges() {
        let mut doc = sample();
        let removed = doc.remove_column("T2", "C3");

        assert!(removed.is_some());
        assert_eq!(doc.lineage.len(), 1);
        assert!(doc.locate_column("C3").is_none());
    }

    #[test]
    fn test_remove_table_takes_columns_and_keeps_edges() {
        let mut doc = sample();
        let removed = doc.remove_table("T1").unwrap();

        assert_eq!(removed.columns.len(), 2);
        assert_eq!(doc.tables.len(), 1);
        assert_eq!(doc.lineage.len(), 1);
    }

    #[test]
    fn test_field_mutations_report_misses() {
        let mut doc = sample();
        assert!(doc.rename_table("T1", "order_items"));
        assert!(!doc.rename_table("T9", "x"));
        assert!(doc.rename_column("T1", "C1", "order_id"));
        assert!(!doc.rename_column("T2", "C1", "x"));
        assert!(doc.update_column_position("T1", "C2", Position::new(1.0, 2.0)));
        assert!(!doc.update_table_position("T9", Position::default()));
        assert!(!doc.add_column("T9", Column::new("C9", "x")));

        assert_eq!(doc.find_table("T1").unwrap().name, "order_items");
        assert_eq!(doc.find_column("T1", "C1").unwrap().name, "order_id");
        assert_eq!(
            doc.find_column("T1", "C2").unwrap().position,
            Some(Position::new(1.0, 2.0))
        );
    }

    #[test]
    fn test_snapshot_does_not_alias() {
        let mut doc = sample();
        let snapshot = doc.snapshot();
        doc.rename_table("T1", "changed");
        doc.remove_edge("E1");

        assert_eq!(snapshot.find_table("T1").unwrap().name, "orders");
        assert_eq!(snapshot.lineage.len(), 1);
        assert_ne!(snapshot, doc);
    }

    #[test]
    fn test_document_json_shape() {
        let doc = sample();
        let value = serde_json::to_value(&doc).unwrap();

        assert!(value.get("tables").is_some());
        assert!(value.get("lineage").is_some());
        assert_eq!(value["config"]["layout_version"], "1.0");

        let parsed: GraphDocument = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, doc);
    }
}
