use anyhow::Result;
use log::warn;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Recursively collects the Rust source files of the documented project.
///
/// Skips `target` and hidden directories. The result is sorted by path so that
/// every later pass (and therefore the rendered output) is deterministic
/// regardless of filesystem iteration order.
pub struct SourceScanner {
    root_path: PathBuf,
}

/// Outcome of a scan: the discovered `.rs` files plus warnings for paths that
/// could not be accessed (scanning continues past those).
pub struct ScanReport {
    pub source_files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl SourceScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walks the directory tree and collects all `.rs` files.
    ///
    /// # Errors
    ///
    /// Returns an error only if the root directory itself cannot be accessed;
    /// unreadable entries below it become warnings in the report.
    pub fn scan(&self) -> Result<ScanReport> {
        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path).into_iter().filter_entry(|e| {
            if e.path() == self.root_path {
                return true;
            }
            let file_name = e.file_name().to_string_lossy();
            !file_name.starts_with('.') && file_name != "target"
        }) {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        source_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        source_files.sort();

        Ok(ScanReport {
            source_files,
            warnings,
        })
    }
}
