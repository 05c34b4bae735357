use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for the documented project's Rust source files.
///
/// Uses `syn` to turn each scanned file into a syntax tree. The trees are the
/// only source of metadata for the whole run: controller structs, impl blocks,
/// value objects and their attributes are all read from here.
pub struct AstParser;

/// A parsed source file together with its origin path.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single source file.
    ///
    /// # Errors
    ///
    /// Returns `Error::IoError` if the file cannot be read and
    /// `Error::ParseError` for invalid Rust syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path)?;
        let syntax_tree = syn::parse_file(&content).map_err(|e| Error::ParseError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parses all scanned files, failing on the first unparseable one.
    ///
    /// A file that does not parse would silently drop metadata and skew the
    /// coverage verdict, so unlike lenient doc generators this pipeline treats
    /// it as fatal.
    pub fn parse_files(paths: &[PathBuf]) -> Result<Vec<ParsedFile>> {
        debug!("Parsing {} files", paths.len());
        let mut parsed = Vec::with_capacity(paths.len());
        for path in paths {
            parsed.push(Self::parse_file(path)?);
        }
        debug!("Parsed {} files", parsed.len());
        Ok(parsed)
    }
}
