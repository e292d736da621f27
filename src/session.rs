//! Session store and the per-file state machine
//!
//! A [`Session`] owns one [`FileState`] per uploaded file name. Each user action
//! is a transition on that state:
//!
//! ```text
//! Loaded ──clean──▶ Cleaned ──select──▶ Projected ──export──▶ Exported
//!    └──────────────── any state accepts any action ──────────────┘
//! ```
//!
//! Cleaning always works on the full-column session table; the column
//! selection is kept separately and applied on top.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::chart::{bar_chart, BarChart};
use crate::clean::{CleanOp, CleanOutcome};
use crate::error::{SweepError, SweepResult};
use crate::export::{export, ExportArtifact, ExportFormat};
use crate::inspect::{preview, FileInfo};
use crate::loader::{Loader, UploadedFile};
use crate::model::Table;
use crate::project::{project, resolve_selection};

/// Where a file is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Loaded,
    Cleaned,
    Projected,
    Exported,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Loaded => write!(f, "loaded"),
            Stage::Cleaned => write!(f, "cleaned"),
            Stage::Projected => write!(f, "projected"),
            Stage::Exported => write!(f, "exported"),
        }
    }
}

/// State of one uploaded file within a session
#[derive(Debug, Clone)]
pub struct FileState {
    name: String,
    size_bytes: usize,
    table: Table,
    selection: Vec<String>,
    stage: Stage,
}

impl FileState {
    /// Load an upload into a fresh state with every column selected
    pub fn load(loader: &Loader, file: &UploadedFile) -> SweepResult<Self> {
        let table = loader.load(file)?;
        Ok(Self::from_table(&file.name, file.size(), table))
    }

    pub fn from_table(name: &str, size_bytes: usize, table: Table) -> Self {
        Self {
            name: name.to_string(),
            size_bytes,
            selection: table.column_names(),
            table,
            stage: Stage::Loaded,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The session table: cleaned, all columns
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn info(&self) -> FileInfo {
        FileInfo::from_parts(&self.name, self.size_bytes, &self.table)
    }

    /// Leading rows of the session table
    pub fn preview(&self, rows: usize) -> Table {
        preview(&self.table, rows)
    }

    /// Apply a cleaning step to the session table
    pub fn clean(&mut self, op: CleanOp) -> CleanOutcome {
        let outcome = op.apply(&mut self.table);
        self.stage = Stage::Cleaned;
        info!(file = %self.name, %op, "{}", outcome);
        outcome
    }

    /// Choose the columns carried into charts and exports
    pub fn select(&mut self, columns: &[String]) -> SweepResult<()> {
        self.selection = resolve_selection(&self.table, &self.name, columns)?;
        self.stage = Stage::Projected;
        debug!(file = %self.name, columns = ?self.selection, "selected columns");
        Ok(())
    }

    /// The session table restricted to the current selection
    pub fn projected(&self) -> Table {
        project(&self.table, &self.selection)
    }

    /// Bar chart of the projected table, if it has numeric columns
    pub fn chart(&self) -> Option<BarChart> {
        bar_chart(&self.projected())
    }

    /// Serialize the projected table; the session table is left untouched
    pub fn export(&mut self, format: ExportFormat) -> SweepResult<ExportArtifact> {
        let artifact = export(&self.projected(), &self.name, format)?;
        self.stage = Stage::Exported;
        Ok(artifact)
    }
}

/// Per-user store of file states, keyed by file name in upload order
#[derive(Default)]
pub struct Session {
    loader: Loader,
    files: IndexMap<String, FileState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an upload.
    ///
    /// A name already in the session keeps its stored state, so cleaning done
    /// earlier survives the file being handed in again.
    pub fn upload(&mut self, file: &UploadedFile) -> SweepResult<&mut FileState> {
        if !self.files.contains_key(&file.name) {
            let state = FileState::load(&self.loader, file)?;
            self.files.insert(file.name.clone(), state);
        } else {
            debug!(file = %file.name, "reusing stored table");
        }
        self.file_mut(&file.name)
    }

    pub fn get(&self, name: &str) -> Option<&FileState> {
        self.files.get(name)
    }

    pub fn file_mut(&mut self, name: &str) -> SweepResult<&mut FileState> {
        self.files
            .get_mut(name)
            .ok_or_else(|| SweepError::UnknownFile(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    const DATA: &str = "id,name,score\n1,a,10\n2,b,\n1,a,10\n";

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transitions() {
        let mut session = Session::new();
        let state = session.upload(&UploadedFile::new("data.csv", DATA)).unwrap();
        assert_eq!(state.stage(), Stage::Loaded);
        assert_eq!(state.selection(), names(&["id", "name", "score"]).as_slice());

        state.clean(CleanOp::Dedup);
        assert_eq!(state.stage(), Stage::Cleaned);

        state.select(&names(&["name", "score"])).unwrap();
        assert_eq!(state.stage(), Stage::Projected);
        assert_eq!(state.projected().column_names(), names(&["name", "score"]));
        assert_eq!(state.table().column_count(), 3);

        let artifact = state.export(ExportFormat::Csv).unwrap();
        assert_eq!(state.stage(), Stage::Exported);
        assert_eq!(artifact.file_name, "data.csv");
        assert_eq!(
            String::from_utf8(artifact.data).unwrap(),
            "name,score\na,10\nb,\n"
        );
    }

    #[test]
    fn test_cleaned_state_survives_reupload() {
        let mut session = Session::new();
        let file = UploadedFile::new("data.csv", DATA);

        session.upload(&file).unwrap().clean(CleanOp::Dedup);
        let state = session.upload(&file).unwrap();
        assert_eq!(state.table().row_count(), 2);
        assert_eq!(state.stage(), Stage::Cleaned);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_clean_after_select_keeps_selection() {
        let mut session = Session::new();
        let state = session.upload(&UploadedFile::new("data.csv", DATA)).unwrap();
        state.select(&names(&["score"])).unwrap();
        state.clean(CleanOp::Impute);

        let projected = state.projected();
        assert_eq!(projected.column_names(), names(&["score"]));
        assert_eq!(projected.rows[1].cells[0], CellValue::Float(10.0));
    }

    #[test]
    fn test_failed_upload_is_not_stored() {
        let mut session = Session::new();
        assert!(session.upload(&UploadedFile::new("notes.txt", "x")).is_err());
        assert!(session.is_empty());
        assert!(matches!(
            session.file_mut("notes.txt"),
            Err(SweepError::UnknownFile(_))
        ));
    }

    #[test]
    fn test_export_is_repeatable() {
        let mut session = Session::new();
        let state = session.upload(&UploadedFile::new("data.csv", DATA)).unwrap();
        let first = state.export(ExportFormat::Csv).unwrap();
        let second = state.export(ExportFormat::Csv).unwrap();
        assert_eq!(first, second);
        assert_eq!(state.table().row_count(), 3);
    }

    #[test]
    fn test_files_are_kept_apart() {
        let mut session = Session::new();
        session.upload(&UploadedFile::new("a.csv", "x\n1\n")).unwrap();
        session.upload(&UploadedFile::new("b.csv", "y\n2\n3\n")).unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.get("a.csv").unwrap().table().column_names(), vec!["x"]);
        assert_eq!(session.get("b.csv").unwrap().table().row_count(), 2);
        assert!(session.get("c.csv").is_none());
    }
}
