//! Report export: fetch the bundle, render it, write it atomically
//!
//! Progress is published on a `ProgressBus` at fixed milestones
//! (10, 40, 60, 100) followed by `Completed`. Any failure publishes a
//! single `Failed` and leaves no partial file behind.

pub mod bundle;
pub mod csv;
pub mod html;

pub use bundle::{fetch_bundle, ReportBundle};

use crate::client::ApiClient;
use crate::error::{CoreError, FetchReport};
use crate::event::{ExportEvent, ExportStage, ProgressBus};
use crate::filters::FilterState;
use chrono::{NaiveDate, Utc};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{error, info};

/// Output format of a report export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Plain sectioned CSV
    #[default]
    Csv,
    /// CSV with a report header and derived columns
    RichCsv,
    /// Printable HTML page
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv | ExportFormat::RichCsv => "csv",
            ExportFormat::Html => "html",
        }
    }

    /// Filename prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            ExportFormat::Csv | ExportFormat::Html => "full_report",
            ExportFormat::RichCsv => "full_report_detailed",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "rich-csv" | "rich" => Ok(Self::RichCsv),
            "html" | "pdf" => Ok(Self::Html),
            other => Err(format!(
                "unknown export format '{}' (csv, excel, html)",
                other
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::RichCsv => "rich-csv",
            ExportFormat::Html => "html",
        })
    }
}

/// `<prefix>_<period>_<YYYY-MM-DD>.<ext>`
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use dineboard_core::export::{export_filename, ExportFormat};
/// use dineboard_core::filters::FilterState;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let name = export_filename(ExportFormat::Csv, &FilterState::for_period("7"), date);
/// assert_eq!(name, "full_report_7_2024-03-15.csv");
/// ```
pub fn export_filename(format: ExportFormat, filters: &FilterState, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.{}",
        format.prefix(),
        filters.period_label(),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Write a file through a temporary sibling and a rename
///
/// Parent directories are created. On failure the temporary file is
/// removed and `path` is left untouched.
pub fn write_atomic<F>(path: &Path, render: F) -> Result<u64, CoreError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file_error = |source| CoreError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(file_error)?;
        }
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    let result = (|| -> io::Result<u64> {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        render(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        fs::rename(&tmp, path)?;
        Ok(fs::metadata(path)?.len())
    })();

    result.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        file_error(e)
    })
}

/// Result of a finished export
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub bytes: u64,
    pub format: ExportFormat,
    /// Optional sections that could not be fetched
    pub report: FetchReport,
}

/// One-shot export of the full report
pub struct ExportPipeline {
    client: ApiClient,
    output_dir: PathBuf,
    bus: ProgressBus,
}

impl ExportPipeline {
    pub fn new(client: ApiClient, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            bus: ProgressBus::default(),
        }
    }

    /// Publish progress on an existing bus
    pub fn with_bus(mut self, bus: ProgressBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn bus(&self) -> &ProgressBus {
        &self.bus
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run the export; publishes `Completed` or exactly one `Failed`
    pub async fn run(
        &self,
        format: ExportFormat,
        filters: &FilterState,
    ) -> Result<ExportOutcome, CoreError> {
        match self.execute(format, filters).await {
            Ok(outcome) => {
                info!(
                    path = %outcome.path.display(),
                    bytes = outcome.bytes,
                    format = %format,
                    "report exported"
                );
                self.bus.publish(ExportEvent::Completed {
                    path: outcome.path.clone(),
                });
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, format = %format, "report export failed");
                self.bus.publish(ExportEvent::Failed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        format: ExportFormat,
        filters: &FilterState,
    ) -> Result<ExportOutcome, CoreError> {
        self.bus.stage(ExportStage::FetchStarted);

        let mut report = FetchReport::new();
        let bundle = fetch_bundle(&self.client, filters, &mut report, Utc::now()).await?;
        self.bus.stage(ExportStage::FetchCompleted);

        let filename = export_filename(format, filters, bundle.generated_at.date_naive());
        let path = self.output_dir.join(filename);
        self.bus.stage(ExportStage::Assembled);

        let bytes = write_atomic(&path, |writer| match format {
            ExportFormat::Csv => csv::write_report(writer, &bundle, false),
            ExportFormat::RichCsv => csv::write_report(writer, &bundle, true),
            ExportFormat::Html => html::write_report(writer, &bundle),
        })?;
        self.bus.stage(ExportStage::Serialized);

        Ok(ExportOutcome {
            path,
            bytes,
            format,
            report,
        })
    }
}
