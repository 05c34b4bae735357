//! API Doc Extractor - API documentation from annotated Rust sources.
//!
//! This library extracts a complete API documentation model by statically
//! analyzing Rust source code. Controllers, operations, parameters, payload
//! types and error handling are described with declarative attributes in the
//! documented project; this crate parses the sources, aggregates the metadata
//! and reports on documentation coverage.
//!
//! # Architecture
//!
//! The extraction pipeline is a sequence of modules:
//!
//! 1. [`scanner`] - Recursively scans project directories for Rust files
//! 2. [`parser`] - Parses Rust source files into Abstract Syntax Trees (AST)
//! 3. [`index`] - Builds one-pass lookup tables over the parsed items
//! 4. [`metadata`] - Reads the declarative documentation attributes
//! 5. [`inspector`] - Classifies Rust types into documentation shapes
//! 6. [`extractor`] - Scans controllers and assembles domains and operations
//! 7. [`registry`] - Introspects and memoizes the referenced data types
//! 8. [`reporter`] - Tracks documentation coverage and renders the reports
//! 9. [`renderer`] - Serializes the finished model to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_source::{
//!     config::Config,
//!     extractor::MetadataExtractor,
//!     index::SourceIndex,
//!     parser::AstParser,
//!     renderer::{Renderer, YamlRenderer},
//!     reporter::CoverageReporter,
//!     scanner::SourceScanner,
//! };
//! use std::path::PathBuf;
//!
//! // Scan and parse the project
//! let scanner = SourceScanner::new(PathBuf::from("./my-project"));
//! let scan_report = scanner.scan().unwrap();
//! let parsed_files = AstParser::parse_files(&scan_report.source_files).unwrap();
//!
//! // Extract the documentation model
//! let index = SourceIndex::new(parsed_files);
//! let config = Config::default();
//! let extractor = MetadataExtractor::new(&index, &config);
//! let mut reporter = CoverageReporter::new();
//! let model = extractor.extract(&mut reporter).unwrap();
//!
//! // Render and report
//! let yaml = YamlRenderer.render(&model).unwrap();
//! println!("{}", yaml);
//! reporter.print_overall_progress_report();
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod extractor;
pub mod index;
pub mod inspector;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod registry;
pub mod renderer;
pub mod reporter;
pub mod scanner;
