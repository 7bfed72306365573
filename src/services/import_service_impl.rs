//! Filesystem-backed implementation of the `ImportService` trait.

use crate::constants::IMAGE_EXTENSIONS;
use crate::db::{ImageRecord, Store};
use crate::parser::csv::{CsvTable, parse_bytes, sample_lines};
use crate::services::import_service::{FailedImport, ImportError, ImportReport, ImportService};
use crate::services::validation::validate_csv;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

const EMPTY_CSV_WARNING: &str = "CSV file contained no valid data";

pub struct DefaultImportService {
    store: Store,
}

impl DefaultImportService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Whether `path` has one of the supported image extensions.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// Reads and encodes every supported image directly inside `folder`.
///
/// Symlinks are followed; a supported file that cannot be read is reported
/// in the failure list instead of aborting the batch.
fn read_images(folder: &Path) -> (Vec<ImageRecord>, Vec<FailedImport>) {
    let mut records = Vec::new();
    let mut failed = Vec::new();

    let entries = WalkDir::new(folder)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Broken symlinks surface here once links are followed.
                let Some(path) = e.path().filter(|p| is_supported_image(p)) else {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                };
                let filename = path
                    .file_name()
                    .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
                warn!(file = %filename, error = %e, "Failed to read image");
                failed.push(FailedImport {
                    filename,
                    error: e.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_supported_image(entry.path()) {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        match std::fs::read(entry.path()) {
            Ok(bytes) => records.push(ImageRecord {
                filename,
                data: STANDARD.encode(bytes),
            }),
            Err(e) => {
                warn!(file = %filename, error = %e, "Failed to read image");
                failed.push(FailedImport {
                    filename,
                    error: e.to_string(),
                });
            }
        }
    }

    (records, failed)
}

fn read_csv(path: &Path) -> Result<CsvTable, ImportError> {
    validate_csv(path)?;

    let bytes = std::fs::read(path).map_err(|e| ImportError::Parse {
        message: e.to_string(),
        sample: None,
    })?;

    parse_bytes(&bytes).map_err(|e| ImportError::Parse {
        message: e.to_string(),
        sample: sample_lines(path),
    })
}

#[async_trait]
impl ImportService for DefaultImportService {
    async fn import_images(&self, folder: &Path) -> Result<ImportReport, ImportError> {
        if !folder.is_dir() {
            return Err(ImportError::NotFound(folder.display().to_string()));
        }

        let folder_buf: PathBuf = folder.to_path_buf();
        let (records, failed) = tokio::task::spawn_blocking(move || read_images(&folder_buf)).await?;

        let outcome = self.store.replace_images(records).await?;

        metrics::counter!("import_records_total", "collection" => "images")
            .increment(u64::try_from(outcome.inserted).unwrap_or(u64::MAX));
        info!(
            folder = %folder.display(),
            imported = outcome.inserted,
            replaced = outcome.deleted,
            failed = failed.len(),
            "Images imported"
        );

        Ok(ImportReport {
            imported: outcome.inserted,
            failed,
            replaced: outcome.deleted,
            warning: None,
        })
    }

    async fn import_csv(&self, file: &Path) -> Result<ImportReport, ImportError> {
        let file_buf = file.to_path_buf();
        let table = tokio::task::spawn_blocking(move || read_csv(&file_buf))
            .await?
            .inspect_err(|e| warn!(file = %file.display(), error = %e, "CSV import rejected"))?;

        if table.tolerant {
            warn!(file = %file.display(), "CSV had ragged rows, imported in tolerant mode");
        }

        let outcome = self.store.replace_csv_records(&table.rows).await?;

        metrics::counter!("import_records_total", "collection" => "csv")
            .increment(u64::try_from(outcome.inserted).unwrap_or(u64::MAX));
        info!(
            file = %file.display(),
            imported = outcome.inserted,
            replaced = outcome.deleted,
            encoding = ?table.encoding,
            "CSV imported"
        );

        Ok(ImportReport {
            imported: outcome.inserted,
            failed: Vec::new(),
            replaced: outcome.deleted,
            warning: (outcome.inserted == 0).then(|| EMPTY_CSV_WARNING.to_string()),
        })
    }

    async fn clear_images(&self) -> Result<u64, ImportError> {
        let deleted = self.store.clear_images().await?;
        info!(deleted, "Image collection cleared");
        Ok(deleted)
    }

    async fn clear_csv(&self) -> Result<u64, ImportError> {
        let deleted = self.store.clear_csv_records().await?;
        info!(deleted, "CSV collection cleared");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("b.JPG")));
        assert!(is_supported_image(Path::new("dir/c.Jpeg")));
        assert!(!is_supported_image(Path::new("d.gif")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("png")));
    }

    #[test]
    fn test_read_images_skips_unsupported_and_subdirs() {
        let dir = std::env::temp_dir().join(format!("portal-images-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("b.png"), [1u8, 2, 3]).unwrap();
        std::fs::write(dir.join("a.jpg"), b"hi").unwrap();
        std::fs::write(dir.join("readme.txt"), b"skip").unwrap();
        std::fs::write(dir.join("nested").join("c.png"), b"deep").unwrap();

        let (records, failed) = read_images(&dir);

        assert!(failed.is_empty());
        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert_eq!(records[0].data, "aGk=");
        assert_eq!(records[1].data, "AQID");

        std::fs::remove_dir_all(dir).ok();
    }

    #[cfg(unix)]
    #[test]
    fn test_read_images_follows_symlinks() {
        let dir = std::env::temp_dir().join(format!("portal-links-{}", uuid::Uuid::new_v4()));
        let target = std::env::temp_dir().join(format!("portal-target-{}.png", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.png"), b"a").unwrap();
        std::fs::write(&target, b"linked").unwrap();
        std::os::unix::fs::symlink(&target, dir.join("linked.png")).unwrap();
        std::os::unix::fs::symlink(dir.join("gone.png"), dir.join("dangling.png")).unwrap();
        std::os::unix::fs::symlink(dir.join("gone.txt"), dir.join("dangling.txt")).unwrap();

        let (records, failed) = read_images(&dir);

        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a.png", "linked.png"]);
        assert_eq!(records[1].data, STANDARD.encode(b"linked"));
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].filename, "dangling.png");

        std::fs::remove_dir_all(dir).ok();
        std::fs::remove_file(target).ok();
    }
}
