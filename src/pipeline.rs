//! Batch driver: runs every uploaded file through the stages in order
//!
//! Files are handled one at a time in upload order. A failure in one file is
//! recorded on that file's report and the batch moves on.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{info, warn};

use crate::chart::BarChart;
use crate::clean::CleanOutcome;
use crate::config::Config;
use crate::error::{SweepError, SweepResult};
use crate::export::{file_stem, output_file_name, ExportArtifact};
use crate::inspect::FileInfo;
use crate::loader::UploadedFile;
use crate::model::Table;
use crate::session::{Session, Stage};

/// Severity of a user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// A line shown to the user about one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }
}

/// Everything that happened to one file
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub name: String,
    pub info: Option<FileInfo>,
    pub stage: Option<Stage>,
    /// Leading rows as loaded (or as stored from earlier in the session)
    pub preview: Option<Table>,
    pub outcomes: Vec<CleanOutcome>,
    /// Leading rows after cleaning, when any cleaning ran
    pub cleaned_preview: Option<Table>,
    pub columns: Vec<String>,
    pub chart: Option<BarChart>,
    pub artifact: Option<ExportArtifact>,
    /// Files written to the output directory
    pub written: Vec<PathBuf>,
    pub messages: Vec<Message>,
    pub error: Option<String>,
}

impl FileReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn fail(&mut self, err: SweepError) {
        warn!(file = %self.name, "{}", err);
        self.messages.push(Message::error(err.to_string()));
        self.error = Some(err.to_string());
    }
}

/// Reports for a whole batch, in upload order
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub files: Vec<FileReport>,
}

impl SweepReport {
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_ok()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

/// Read a file from disk as an upload named after its final path component
pub fn read_upload(path: &Path) -> SweepResult<UploadedFile> {
    let bytes = fs::read(path).map_err(|source| SweepError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile::new(name, bytes).with_path(path.to_path_buf()))
}

/// Sweep the files named in `config.files`.
///
/// Uploads are keyed by file name, so a second path with an already seen
/// name is rejected rather than merged with the first.
pub fn process_paths(session: &mut Session, config: &Config) -> SweepReport {
    let mut report = SweepReport::default();
    let mut seen = FxHashSet::default();

    for path in &config.files {
        let file_report = match read_upload(path) {
            Ok(upload) => sweep_file(session, &upload, config, &mut seen),
            Err(err) => {
                let mut r = FileReport::new(&path.display().to_string());
                r.fail(err);
                r
            }
        };
        report.files.push(file_report);
    }

    report
}

/// Sweep in-memory uploads
pub fn process_batch(session: &mut Session, uploads: &[UploadedFile], config: &Config) -> SweepReport {
    let mut seen = FxHashSet::default();
    SweepReport {
        files: uploads
            .iter()
            .map(|upload| sweep_file(session, upload, config, &mut seen))
            .collect(),
    }
}

fn sweep_file(
    session: &mut Session,
    upload: &UploadedFile,
    config: &Config,
    seen: &mut FxHashSet<String>,
) -> FileReport {
    let mut report = FileReport::new(&upload.name);
    let result = if seen.insert(upload.name.clone()) {
        run_stages(session, upload, config, &mut report)
    } else {
        Err(SweepError::DuplicateName(upload.name.clone()))
    };
    if let Err(err) = result {
        report.fail(err);
    }
    report
}

fn run_stages(
    session: &mut Session,
    upload: &UploadedFile,
    config: &Config,
    report: &mut FileReport,
) -> SweepResult<()> {
    if config.export {
        if let Some(ref source) = upload.path {
            let target = config
                .output_dir
                .join(output_file_name(&upload.name, config.export_format));
            if same_file(source, &target) {
                return Err(SweepError::export(
                    &upload.name,
                    format!("output would overwrite input {}", source.display()),
                ));
            }
        }
    }

    let state = session.upload(upload)?;

    // Inspector
    let file_info = state.info();
    report
        .messages
        .push(Message::info(format!("File Name: {}", file_info.name)));
    report
        .messages
        .push(Message::info(format!("File Size: {:.2} KiB", file_info.size_kib())));
    report.info = Some(file_info);
    report.preview = Some(state.preview(config.preview_rows));

    // Cleaner
    for op in &config.clean_ops {
        let outcome = state.clean(*op);
        report.messages.push(Message::info(outcome.to_string()));
        report.outcomes.push(outcome);
    }
    if !config.clean_ops.is_empty() {
        report.cleaned_preview = Some(state.preview(config.preview_rows));
    }

    // Projector
    let columns = config
        .columns
        .clone()
        .unwrap_or_else(|| state.table().column_names());
    state.select(&columns)?;
    report.columns = state.selection().to_vec();

    // Visualizer
    if config.show_chart {
        match state.chart() {
            Some(chart) => {
                if config.export {
                    let path = config.output_dir.join(chart_file_name(state.name()));
                    write_file(&path, |w| chart.write_svg(w))?;
                    report.written.push(path);
                }
                report.chart = Some(chart);
            }
            None => report
                .messages
                .push(Message::info("No numeric columns to chart")),
        }
    }

    // Exporter
    let artifact = state.export(config.export_format)?;
    if config.export {
        let path = config.output_dir.join(&artifact.file_name);
        write_file(&path, |w| Ok(w.write_all(&artifact.data)?))?;
        report.messages.push(Message::info(format!(
            "Converted to {}: {}",
            artifact.format,
            path.display()
        )));
        report.written.push(path);
    }
    report.artifact = Some(artifact);
    report.stage = Some(state.stage());

    info!(file = %upload.name, stage = %state.stage(), "file processed");
    Ok(())
}

/// Both paths exist and resolve to the same file
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn chart_file_name(source: &str) -> String {
    format!("{}_chart.svg", file_stem(source))
}

fn write_file(
    path: &Path,
    body: impl FnOnce(&mut dyn Write) -> anyhow::Result<()>,
) -> SweepResult<()> {
    let io_err = |source: std::io::Error| SweepError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file = BufWriter::new(fs::File::create(path).map_err(io_err)?);
    body(&mut file).map_err(|e| SweepError::export(path.display().to_string(), format!("{:#}", e)))?;
    file.flush().map_err(io_err)?;
    Ok(())
}
