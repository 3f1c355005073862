//! Synchronization controller
//!
//! The only writer of the live lineage document. Every edit intent coming from
//! the renderer or the host is validated here, applied through the graph model,
//! recorded as exactly one history entry and followed by a full view push.
//!
//! Intents take `&mut self`, so a host that shares the controller must put it
//! behind a lock held for the whole intent (prompt included). That keeps one
//! intent equal to one history entry.

use crate::error::{validation_error, AppError};
use crate::history::HistoryManager;
use crate::ids::{IdAllocator, IdKind, UuidIds};
use crate::models::{GraphDocument, LineageEdge, NodeRef, Position};
use crate::projection::{project, ViewModel};
use crate::sync::csv_import::{CsvImporter, DEFAULT_IMPORT_SPACING};
use crate::sync::export::ImageExporter;
use crate::sync::host::{LabelPrompt, RendererSink};
use crate::sync::persistence;
use crate::sync::protocol::{
    EdgeUpdate, IntentOutcome, NewEdge, NodeGroup, NoticeLevel, OutboundMessage, RendererMessage,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DESC_MOVE_NODES: &str = "Move nodes";
pub const DESC_RENAME_TABLE: &str = "Rename table";
pub const DESC_RENAME_COLUMN: &str = "Rename column";
pub const DESC_ADD_EDGE: &str = "Add lineage";
pub const DESC_DELETE_EDGE: &str = "Delete lineage";
pub const DESC_UPDATE_EDGE: &str = "Update lineage";
pub const DESC_DELETE_TABLE: &str = "Delete table";
pub const DESC_IMPORT_CSV: &str = "Import CSV data";
pub const DESC_LOAD_DOCUMENT: &str = "Load lineage data";

pub struct SyncController<R: RendererSink> {
    document: GraphDocument,
    history: HistoryManager,
    ids: Arc<dyn IdAllocator>,
    renderer: R,
    import_spacing: f64,
    document_path: Option<PathBuf>,
    dirty: bool,
}

impl<R: RendererSink> SyncController<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            document: GraphDocument::new(),
            history: HistoryManager::new(),
            ids: Arc::new(UuidIds),
            renderer,
            import_spacing: DEFAULT_IMPORT_SPACING,
            document_path: None,
            dirty: false,
        }
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdAllocator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = HistoryManager::with_capacity(capacity);
        self
    }

    pub fn with_import_spacing(mut self, spacing: f64) -> Self {
        self.import_spacing = spacing;
        self
    }

    /// Start from an already-loaded document without recording history.
    pub fn with_document(mut self, document: GraphDocument, path: Option<PathBuf>) -> Self {
        self.document = document;
        self.document_path = path;
        self
    }

    /// Set the default save target without touching the document.
    pub fn remember_document_path(&mut self, path: &Path) {
        self.document_path = Some(path.to_path_buf());
    }

    // ==================== Accessors ====================

    pub fn document(&self) -> &GraphDocument {
        &self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document_path.as_deref()
    }

    pub fn view(&self) -> ViewModel {
        project(&self.document)
    }

    // ==================== Dispatch ====================

    /// Handle one renderer message. `prompt` answers label edits.
    pub async fn handle_message<P: LabelPrompt + ?Sized>(
        &mut self,
        message: RendererMessage,
        prompt: &P,
    ) -> Result<IntentOutcome, AppError> {
        debug!("Renderer intent: {}", message.kind());
        match message {
            RendererMessage::Ready => {
                self.publish();
                Ok(IntentOutcome::Published)
            }
            RendererMessage::NodePositionChanged { positions } => Ok(self.move_nodes(&positions)),
            RendererMessage::EditNodeLabel {
                node_id,
                current_label,
                group,
            } => self.edit_label(&node_id, group, &current_label, prompt).await,
            RendererMessage::EdgeAdded { edge } => self.add_edge(edge),
            RendererMessage::EdgeDeleted { edge } => Ok(self.delete_edge(&edge.id)),
            RendererMessage::EdgeUpdated { edge } => Ok(self.update_edge(&edge)),
            RendererMessage::TableDeleted { table_id } => Ok(self.delete_table(&table_id)),
            RendererMessage::ExportImage { image_data, path } => {
                self.export_image(&image_data, &path).await
            }
            RendererMessage::Undo => Ok(self.undo()),
            RendererMessage::Redo => Ok(self.redo()),
        }
    }

    // ==================== Intents ====================

    /// Persist final positions reported at the end of a drag.
    ///
    /// A moved table carries its explicitly placed columns along by the same
    /// offset, unless the batch reports a position for that column too.
    pub fn move_nodes(&mut self, positions: &HashMap<String, Position>) -> IntentOutcome {
        let mut moved = 0usize;
        let mut column_moves = Vec::new();

        for (node_id, &position) in positions {
            match self.document.resolve_node(node_id) {
                Some(NodeRef::Table { table_id }) => {
                    self.move_table(&table_id, position, positions);
                    moved += 1;
                }
                Some(NodeRef::Column { table_id, column_id }) => {
                    column_moves.push((table_id, column_id, position));
                }
                None => debug!("Ignoring position for unknown node {}", node_id),
            }
        }

        for (table_id, column_id, position) in column_moves {
            if self.document.update_column_position(&table_id, &column_id, position) {
                moved += 1;
            }
        }

        if moved == 0 {
            return IntentOutcome::Ignored;
        }
        self.commit(DESC_MOVE_NODES)
    }

    fn move_table(&mut self, table_id: &str, position: Position, batch: &HashMap<String, Position>) {
        let Some(table) = self.document.find_table_mut(table_id) else {
            return;
        };
        if let Some(previous) = table.position {
            for column in table.columns.iter_mut() {
                if batch.contains_key(&column.id) {
                    continue;
                }
                if let Some(offset) = column.position {
                    column.position = Some(offset.translated(previous, position));
                }
            }
        }
        table.position = Some(position);
    }

    /// Rename a table or column after prompting for the new name.
    pub async fn edit_label<P: LabelPrompt + ?Sized>(
        &mut self,
        node_id: &str,
        group: NodeGroup,
        current_label: &str,
        prompt: &P,
    ) -> Result<IntentOutcome, AppError> {
        let target = match (group, self.document.resolve_node(node_id)) {
            (NodeGroup::Table, Some(target @ NodeRef::Table { .. })) => target,
            (NodeGroup::Column, Some(target @ NodeRef::Column { .. })) => target,
            _ => {
                debug!("Ignoring label edit for unknown {} {}", group.as_str(), node_id);
                return Ok(IntentOutcome::Ignored);
            }
        };

        let Some(answer) = prompt.prompt_label(group, current_label).await else {
            debug!("Label edit for {} dismissed", node_id);
            return Ok(IntentOutcome::Abandoned);
        };

        let new_label = answer.trim();
        if new_label.is_empty() {
            let message = format!("{} name cannot be empty", capitalize(group.as_str()));
            warn!("Rejected label edit for {}: {}", node_id, message);
            self.notify(NoticeLevel::Warning, &message);
            return Err(validation_error(message));
        }

        let description = match &target {
            NodeRef::Table { table_id } => {
                self.document.rename_table(table_id, new_label);
                DESC_RENAME_TABLE
            }
            NodeRef::Column { table_id, column_id } => {
                self.document.rename_column(table_id, column_id, new_label);
                DESC_RENAME_COLUMN
            }
        };

        self.renderer.send(OutboundMessage::LabelUpdated {
            node_id: node_id.to_string(),
            new_label: new_label.to_string(),
        });
        Ok(self.commit(description))
    }

    /// Append a new lineage edge between two columns under a fresh id.
    pub fn add_edge(&mut self, edge: NewEdge) -> Result<IntentOutcome, AppError> {
        let source = self.document.resolve_node(&edge.from);
        let target = self.document.resolve_node(&edge.to);
        let (Some(NodeRef::Column { .. }), Some(NodeRef::Column { .. })) = (&source, &target) else {
            let message = "Lineage can only connect two columns".to_string();
            warn!("Rejected edge {} -> {}: {}", edge.from, edge.to, message);
            self.notify(NoticeLevel::Warning, &message);
            return Err(validation_error(message));
        };

        let mut lineage = LineageEdge::new(self.ids.allocate(IdKind::Edge), edge.from, edge.to);
        lineage.description = edge
            .label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        lineage.arrows = edge.arrows;

        info!("Adding lineage {} ({} -> {})", lineage.id, lineage.source, lineage.target);
        self.document.add_edge(lineage);
        Ok(self.commit(DESC_ADD_EDGE))
    }

    pub fn delete_edge(&mut self, edge_id: &str) -> IntentOutcome {
        if self.document.remove_edge(edge_id).is_none() {
            debug!("Ignoring delete of unknown edge {}", edge_id);
            return IntentOutcome::Ignored;
        }
        self.commit(DESC_DELETE_EDGE)
    }

    pub fn update_edge(&mut self, update: &EdgeUpdate) -> IntentOutcome {
        let patch = update.patch();
        if patch.is_empty() || !self.document.update_edge_properties(&update.id, patch) {
            debug!("Ignoring update of edge {}", update.id);
            return IntentOutcome::Ignored;
        }
        self.commit(DESC_UPDATE_EDGE)
    }

    /// Delete a table and its columns. Lineage touching those columns stays in
    /// the document as dangling edges.
    pub fn delete_table(&mut self, table_id: &str) -> IntentOutcome {
        match self.document.remove_table(table_id) {
            Some(table) => {
                info!("Deleted table {} with {} columns", table.name, table.columns.len());
                self.commit(DESC_DELETE_TABLE)
            }
            None => {
                debug!("Ignoring delete of unknown table {}", table_id);
                IntentOutcome::Ignored
            }
        }
    }

    pub fn undo(&mut self) -> IntentOutcome {
        if !self.history.undo(&mut self.document) {
            return IntentOutcome::Ignored;
        }
        self.dirty = true;
        self.publish();
        IntentOutcome::applied("Undo")
    }

    pub fn redo(&mut self) -> IntentOutcome {
        if !self.history.redo(&mut self.document) {
            return IntentOutcome::Ignored;
        }
        self.dirty = true;
        self.publish();
        IntentOutcome::applied("Redo")
    }

    /// Merge CSV table/column definitions as new tables. All or nothing.
    pub fn import_csv(&mut self, content: &str) -> Result<IntentOutcome, AppError> {
        let records = CsvImporter::parse(content)?;
        if records.is_empty() {
            info!("CSV import contained no usable rows");
            self.notify(NoticeLevel::Info, "No rows imported");
            return Ok(IntentOutcome::NothingImported);
        }

        let start_x = self
            .document
            .tables
            .iter()
            .filter_map(|t| t.position)
            .map(|p| p.x + self.import_spacing)
            .reduce(f64::max)
            .unwrap_or(0.0);
        let tables =
            CsvImporter::build_tables(&records, self.ids.as_ref(), start_x, self.import_spacing);

        info!(
            "Importing {} tables with {} columns from CSV",
            tables.len(),
            records.len()
        );
        for table in tables {
            self.document.add_table(table);
        }
        Ok(self.commit(DESC_IMPORT_CSV))
    }

    pub async fn import_csv_file(&mut self, path: &Path) -> Result<IntentOutcome, AppError> {
        let content = persistence::read_text(path).await?;
        self.import_csv(&content)
    }

    /// Write a renderer snapshot to disk. Not a mutation.
    pub async fn export_image(&mut self, image_data: &str, path: &Path) -> Result<IntentOutcome, AppError> {
        let bytes = ImageExporter::export(image_data, path).await?;
        Ok(IntentOutcome::Exported {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// Save the live document to `path`, or to the remembered document path.
    pub async fn save_document(&mut self, path: Option<&Path>) -> Result<PathBuf, AppError> {
        let target = path
            .map(Path::to_path_buf)
            .or_else(|| self.document_path.clone())
            .ok_or_else(|| validation_error("No file chosen to save lineage data"))?;

        persistence::write_document(&target, &self.document).await?;
        self.document_path = Some(target.clone());
        self.dirty = false;
        Ok(target)
    }

    /// Replace the live document with the one stored at `path`.
    pub async fn load_document(&mut self, path: &Path) -> Result<IntentOutcome, AppError> {
        let document = persistence::read_document(path).await?;
        self.document = document;
        self.document_path = Some(path.to_path_buf());
        let outcome = self.commit(DESC_LOAD_DOCUMENT);
        self.dirty = false;
        Ok(outcome)
    }

    // ==================== Internals ====================

    fn commit(&mut self, description: &str) -> IntentOutcome {
        let index = self.history.record(&self.document, description);
        self.dirty = true;
        info!(
            "{} (history entry {}, {} tables, {} edges)",
            description,
            index,
            self.document.tables.len(),
            self.document.lineage.len()
        );
        self.publish();
        IntentOutcome::applied(description)
    }

    fn publish(&mut self) {
        self.renderer.send(OutboundMessage::UpdateData(project(&self.document)));
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.renderer.send(OutboundMessage::Notice {
            level,
            message: message.to_string(),
        });
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::models::{Column, Table};
    use crate::projection::ViewNode;
    use crate::sync::host::{Outbox, ProvidedLabel};
    use pretty_assertions::assert_eq;

    fn controller() -> SyncController<Outbox> {
        SyncController::new(Outbox::new()).with_ids(Arc::new(SequentialIds::new()))
    }

    /// Two tables with placed columns and one edge, loaded without history.
    fn seeded() -> SyncController<Outbox> {
        let mut doc = GraphDocument::new();
        doc.add_table(
            Table::new("T1", "orders")
                .with_position(Position::new(0.0, 0.0))
                .with_column(Column::new("C1", "id").with_position(Position::new(0.0, 40.0)))
                .with_column(Column::new("C2", "total").with_position(Position::new(0.0, 80.0))),
        );
        doc.add_table(
            Table::new("T2", "revenue")
                .with_position(Position::new(300.0, 0.0))
                .with_column(Column::new("C3", "amount")),
        );
        doc.add_edge(LineageEdge::new("E1", "C2", "C3"));
        controller().with_document(doc, None)
    }

    fn last_view(outbox: &Outbox) -> Option<&ViewModel> {
        outbox.messages().iter().rev().find_map(|m| match m {
            OutboundMessage::UpdateData(view) => Some(view),
            _ => None,
        })
    }

    fn positions(entries: &[(&str, f64, f64)]) -> HashMap<String, Position> {
        entries
            .iter()
            .map(|(id, x, y)| (id.to_string(), Position::new(*x, *y)))
            .collect()
    }

    #[test]
    fn test_csv_import_merge_determinism() {
        let mut ctl = controller();
        let outcome = ctl
            .import_csv("table_name,column_name\nOrders,id\nOrders,total\nCustomers,id\n")
            .unwrap();

        assert_eq!(outcome, IntentOutcome::applied(DESC_IMPORT_CSV));
        let doc = ctl.document();
        assert_eq!(doc.tables.len(), 2);
        assert_eq!(doc.tables[0].name, "Orders");
        assert_eq!(doc.tables[0].position, Some(Position::new(0.0, 0.0)));
        let orders: Vec<&str> = doc.tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(orders, vec!["id", "total"]);
        assert_eq!(doc.tables[1].name, "Customers");
        assert_eq!(doc.tables[1].position, Some(Position::new(300.0, 0.0)));
        assert_eq!(doc.tables[1].columns.len(), 1);

        assert_eq!(ctl.history().len(), 1);
        assert_eq!(ctl.history().current().unwrap().description, DESC_IMPORT_CSV);
        assert!(ctl.is_dirty());
    }

    #[test]
    fn test_second_import_is_placed_after_existing_tables() {
        let mut ctl = seeded();
        ctl.import_csv("table_name,column_name\nAudit,id\n").unwrap();

        let audit = ctl.document().tables.last().unwrap();
        assert_eq!(audit.position, Some(Position::new(600.0, 0.0)));
    }

    #[test]
    fn test_empty_import_signals_nothing_imported() {
        let mut ctl = controller();
        let outcome = ctl.import_csv("table_name,column_name\n,\n").unwrap();

        assert_eq!(outcome, IntentOutcome::NothingImported);
        assert!(ctl.history().is_empty());
        assert!(ctl.document().is_empty());
        assert!(matches!(
            ctl.renderer().messages(),
            [OutboundMessage::Notice { level: NoticeLevel::Info, .. }]
        ));
    }

    #[test]
    fn test_malformed_import_commits_nothing() {
        let mut ctl = seeded();
        let before = ctl.document().clone();

        let result = ctl.import_csv("name,column\nOrders,id\n");
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(ctl.document(), &before);
        assert!(ctl.history().is_empty());
    }

    #[test]
    fn test_table_move_carries_columns() {
        let mut ctl = seeded();
        let outcome = ctl.move_nodes(&positions(&[("T1", 50.0, 10.0)]));

        assert!(outcome.is_applied());
        let table = ctl.document().find_table("T1").unwrap();
        assert_eq!(table.position, Some(Position::new(50.0, 10.0)));
        assert_eq!(table.columns[0].position, Some(Position::new(50.0, 50.0)));
        assert_eq!(table.columns[1].position, Some(Position::new(50.0, 90.0)));
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn test_reported_column_position_wins_over_carry() {
        let mut ctl = seeded();
        ctl.move_nodes(&positions(&[("T1", 50.0, 10.0), ("C2", -5.0, -5.0)]));

        let table = ctl.document().find_table("T1").unwrap();
        assert_eq!(table.columns[0].position, Some(Position::new(50.0, 50.0)));
        assert_eq!(table.columns[1].position, Some(Position::new(-5.0, -5.0)));
    }

    #[test]
    fn test_unknown_positions_are_ignored() {
        let mut ctl = seeded();
        let outcome = ctl.move_nodes(&positions(&[("ghost", 1.0, 1.0)]));

        assert_eq!(outcome, IntentOutcome::Ignored);
        assert!(ctl.history().is_empty());
        assert!(ctl.renderer().messages().is_empty());
    }

    #[tokio::test]
    async fn test_rename_table_and_column() {
        let mut ctl = seeded();
        let outcome = ctl
            .edit_label("T1", NodeGroup::Table, "orders", &ProvidedLabel(Some("  sales ".into())))
            .await
            .unwrap();
        assert_eq!(outcome, IntentOutcome::applied(DESC_RENAME_TABLE));
        assert_eq!(ctl.document().find_table("T1").unwrap().name, "sales");

        ctl.edit_label("C3", NodeGroup::Column, "amount", &ProvidedLabel(Some("net".into())))
            .await
            .unwrap();
        assert_eq!(ctl.document().find_column("T2", "C3").unwrap().name, "net");
        assert_eq!(ctl.history().len(), 2);

        let messages = ctl.renderer().messages();
        assert!(messages.contains(&OutboundMessage::LabelUpdated {
            node_id: "C3".to_string(),
            new_label: "net".to_string(),
        }));
        let view = last_view(ctl.renderer()).unwrap();
        assert_eq!(view.node("C3").unwrap().label(), "net");
    }

    #[tokio::test]
    async fn test_blank_label_is_rejected() {
        let mut ctl = seeded();
        let result = ctl
            .edit_label("T1", NodeGroup::Table, "orders", &ProvidedLabel(Some("   ".into())))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(ctl.document().find_table("T1").unwrap().name, "orders");
        assert!(ctl.history().is_empty());
        assert!(last_view(ctl.renderer()).is_none());
    }

    #[tokio::test]
    async fn test_dismissed_prompt_is_abandoned() {
        let mut ctl = seeded();
        let outcome = ctl
            .edit_label("C1", NodeGroup::Column, "id", &ProvidedLabel(None))
            .await
            .unwrap();

        assert_eq!(outcome, IntentOutcome::Abandoned);
        assert!(ctl.history().is_empty());
    }

    #[tokio::test]
    async fn test_label_edit_with_mismatched_group_is_ignored() {
        let mut ctl = seeded();
        let outcome = ctl
            .edit_label("T1", NodeGroup::Column, "orders", &ProvidedLabel(Some("x".into())))
            .await
            .unwrap();

        assert_eq!(outcome, IntentOutcome::Ignored);
        assert_eq!(ctl.document().find_table("T1").unwrap().name, "orders");
    }

    #[test]
    fn test_add_edge_gets_fresh_id() {
        let mut ctl = seeded();
        let outcome = ctl
            .add_edge(NewEdge {
                id: Some("renderer-temp".into()),
                from: "C1".into(),
                to: "C3".into(),
                label: Some(" copy ".into()),
                arrows: None,
            })
            .unwrap();

        assert!(outcome.is_applied());
        let edge = ctl.document().lineage.last().unwrap();
        assert_ne!(edge.id, "renderer-temp");
        assert!(edge.id.starts_with('E'));
        assert_eq!(edge.description.as_deref(), Some("copy"));
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn test_edges_touching_tables_are_refused() {
        let mut ctl = seeded();
        for (from, to) in [("T1", "C3"), ("C1", "T2"), ("T1", "T2"), ("C1", "missing")] {
            let result = ctl.add_edge(NewEdge {
                id: None,
                from: from.into(),
                to: to.into(),
                label: None,
                arrows: None,
            });
            assert!(matches!(result, Err(AppError::Validation(_))), "{} -> {}", from, to);
        }
        assert_eq!(ctl.document().lineage.len(), 1);
        assert!(ctl.history().is_empty());
    }

    #[test]
    fn test_deleting_unknown_edge_is_noop() {
        let mut ctl = seeded();
        let before = ctl.view();

        assert_eq!(ctl.delete_edge("E404"), IntentOutcome::Ignored);
        assert_eq!(ctl.view(), before);
        assert!(ctl.history().is_empty());

        assert!(ctl.delete_edge("E1").is_applied());
        assert!(ctl.document().lineage.is_empty());
    }

    #[test]
    fn test_update_edge_properties() {
        let mut ctl = seeded();
        let outcome = ctl.update_edge(&EdgeUpdate {
            id: "E1".into(),
            label: Some("sum(total)".into()),
            color: Some("#ff0000".into()),
            style: None,
            arrows: None,
        });

        assert!(outcome.is_applied());
        let edge = ctl.document().find_edge("E1").unwrap();
        assert_eq!(edge.description.as_deref(), Some("sum(total)"));
        assert_eq!(edge.color.as_deref(), Some("#ff0000"));
        assert_eq!(
            ctl.update_edge(&EdgeUpdate {
                id: "E9".into(),
                label: Some("x".into()),
                color: None,
                style: None,
                arrows: None,
            }),
            IntentOutcome::Ignored
        );
    }

    #[test]
    fn test_deleted_table_leaves_dangling_edge() {
        let mut ctl = seeded();
        assert!(ctl.delete_table("T2").is_applied());

        assert_eq!(ctl.document().lineage.len(), 1);
        let view = last_view(ctl.renderer()).unwrap();
        assert!(view.node("C3").is_none());
        assert!(view.edge("E1").is_none());
        assert_eq!(ctl.delete_table("T2"), IntentOutcome::Ignored);
    }

    #[test]
    fn test_undo_redo_through_controller() {
        let mut ctl = seeded();
        ctl.move_nodes(&positions(&[("T2", 400.0, 0.0)]));
        ctl.delete_edge("E1");
        let final_doc = ctl.document().clone();

        assert!(ctl.undo().is_applied());
        assert_eq!(ctl.document().lineage.len(), 1);
        assert_eq!(ctl.undo(), IntentOutcome::Ignored);

        assert!(ctl.redo().is_applied());
        assert_eq!(ctl.document(), &final_doc);
        assert_eq!(ctl.redo(), IntentOutcome::Ignored);
    }

    #[test]
    fn test_mutation_after_undo_truncates_redo() {
        let mut ctl = seeded();
        ctl.move_nodes(&positions(&[("T2", 400.0, 0.0)]));
        ctl.move_nodes(&positions(&[("T2", 500.0, 0.0)]));
        ctl.undo();
        assert!(ctl.history().can_redo());

        ctl.delete_edge("E1");
        assert!(!ctl.history().can_redo());
    }

    #[tokio::test]
    async fn test_handle_message_dispatch() {
        let mut ctl = seeded();
        let prompt = ProvidedLabel(None);

        let outcome = ctl.handle_message(RendererMessage::Ready, &prompt).await.unwrap();
        assert_eq!(outcome, IntentOutcome::Published);
        assert!(ctl.history().is_empty());

        let outcome = ctl
            .handle_message(
                RendererMessage::EdgeDeleted {
                    edge: crate::sync::protocol::EdgeRef { id: "E1".into() },
                },
                &prompt,
            )
            .await
            .unwrap();
        assert!(outcome.is_applied());

        let view = last_view(ctl.renderer()).unwrap();
        assert!(matches!(view.nodes[0], ViewNode::Table(_)));
        assert!(view.edges.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineage.json");
        let mut ctl = seeded();
        ctl.delete_edge("E1");

        let saved = ctl.save_document(Some(&path)).await.unwrap();
        assert_eq!(saved, path);
        assert!(!ctl.is_dirty());

        let mut other = controller();
        let outcome = other.load_document(&path).await.unwrap();
        assert_eq!(outcome, IntentOutcome::applied(DESC_LOAD_DOCUMENT));
        assert_eq!(other.document(), ctl.document());
        assert_eq!(other.document_path(), Some(path.as_path()));
        assert!(!other.is_dirty());
        assert_eq!(other.history().len(), 1);
    }

    #[tokio::test]
    async fn test_save_without_path_is_rejected() {
        let mut ctl = controller();
        let result = ctl.save_document(None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_save_uses_remembered_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineage.json");
        let mut ctl = seeded();
        ctl.remember_document_path(&path);

        let saved = ctl.save_document(None).await.unwrap();
        assert_eq!(saved, path);
        assert!(path.exists());
        assert!(!ctl.is_dirty());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let mut ctl = seeded();
        let before = ctl.document().clone();

        assert!(ctl.load_document(&path).await.is_err());
        assert_eq!(ctl.document(), &before);
        assert!(ctl.history().is_empty());
    }
}
