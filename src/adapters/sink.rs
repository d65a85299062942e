use crate::core::{ReportSink, Relation};
use crate::utils::error::{AnalysisError, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use zip::write::{FileOptions, ZipWriter};

/// Turns a block label into a file stem. Letters, digits, `-` and `_` are kept
/// (including non-ASCII letters); everything else becomes `_`.
pub fn file_stem(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "block".to_string()
    } else {
        stem
    }
}

/// Fails when two labels would write to the same report files.
pub fn ensure_distinct_stems<'a, I>(labels: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stems: HashMap<String, &str> = HashMap::new();
    for label in labels {
        let stem = file_stem(label);
        if let Some(other) = stems.insert(stem.clone(), label) {
            return Err(AnalysisError::InvalidConfigValueError {
                field: "blocks.label".to_string(),
                value: label.to_string(),
                reason: format!(
                    "Writes to the same report files ('{}') as block '{}'",
                    stem, other
                ),
            });
        }
    }
    Ok(())
}

fn table_path(block: &str) -> String {
    format!("tables/{}_tables.html", file_stem(block))
}

fn plot_path(block: &str, relation: Relation) -> String {
    format!("figs/{}_{}.html", file_stem(block), relation.as_str())
}

fn data_path(file_name: &str) -> String {
    format!("data/{}", file_name)
}

/// Writes artifacts under `tables/`, `figs/` and `data/` of a base directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    base_path: PathBuf,
}

impl DirectorySink {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    async fn write(&self, relative: &str, data: &[u8]) -> Result<String> {
        let full_path = self.base_path.join(relative);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(full_path.display().to_string())
    }
}

impl ReportSink for DirectorySink {
    async fn accept_table(&self, block: &str, html: &str) -> Result<String> {
        self.write(&table_path(block), html.as_bytes()).await
    }

    async fn accept_plot(&self, block: &str, relation: Relation, html: &str) -> Result<String> {
        self.write(&plot_path(block, relation), html.as_bytes()).await
    }

    async fn accept_data(&self, file_name: &str, data: &[u8]) -> Result<String> {
        self.write(&data_path(file_name), data).await
    }
}

/// Keeps artifacts in memory, keyed by their relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        let files = self.files.lock().await;
        files.keys().cloned().collect()
    }

    async fn store(&self, relative: String, data: &[u8]) -> Result<String> {
        let mut files = self.files.lock().await;
        let location = format!("memory://{}", relative);
        files.insert(relative, data.to_vec());
        Ok(location)
    }
}

impl ReportSink for MemorySink {
    async fn accept_table(&self, block: &str, html: &str) -> Result<String> {
        self.store(table_path(block), html.as_bytes()).await
    }

    async fn accept_plot(&self, block: &str, relation: Relation, html: &str) -> Result<String> {
        self.store(plot_path(block, relation), html.as_bytes()).await
    }

    async fn accept_data(&self, file_name: &str, data: &[u8]) -> Result<String> {
        self.store(data_path(file_name), data).await
    }
}

/// Buffers artifacts and writes them as one zip archive on `finish`.
#[derive(Debug)]
pub struct ArchiveSink {
    archive_path: PathBuf,
    entries: Mutex<Vec<(String, Vec<u8>)>>,
}

impl ArchiveSink {
    pub const DEFAULT_FILE_NAME: &'static str = "report.zip";

    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self::with_file_name(output_dir, Self::DEFAULT_FILE_NAME)
    }

    pub fn with_file_name(output_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            archive_path: output_dir.as_ref().join(file_name),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    async fn push(&self, relative: String, data: &[u8]) -> Result<String> {
        let location = format!("{}!/{}", self.archive_path.display(), relative);
        self.entries.lock().await.push((relative, data.to_vec()));
        Ok(location)
    }
}

impl ReportSink for ArchiveSink {
    async fn accept_table(&self, block: &str, html: &str) -> Result<String> {
        self.push(table_path(block), html.as_bytes()).await
    }

    async fn accept_plot(&self, block: &str, relation: Relation, html: &str) -> Result<String> {
        self.push(plot_path(block, relation), html.as_bytes()).await
    }

    async fn accept_data(&self, file_name: &str, data: &[u8]) -> Result<String> {
        self.push(data_path(file_name), data).await
    }

    async fn finish(&self) -> Result<Option<String>> {
        let entries = std::mem::take(&mut *self.entries.lock().await);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &entries {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        if let Some(parent) = self.archive_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.archive_path, &zip_data).await?;
        tracing::debug!(
            "Wrote {} entries ({} bytes) to {}",
            entries.len(),
            zip_data.len(),
            self.archive_path.display()
        );

        Ok(Some(self.archive_path.display().to_string()))
    }
}
