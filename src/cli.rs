use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// API Doc Extractor - Generate API documentation from annotated Rust sources
#[derive(Parser, Debug)]
#[command(name = "apidoc-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Path to a YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Fail with a non-zero exit status when undocumented items remain
    #[arg(long = "break-on-undocumented")]
    pub break_on_undocumented: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }
    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }
    if let Some(config_path) = &args.config_path {
        if !config_path.is_file() {
            anyhow::bail!("Config file does not exist: {}", config_path.display());
        }
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::config::Config;
    use crate::error::Error;
    use crate::extractor::MetadataExtractor;
    use crate::index::SourceIndex;
    use crate::parser::AstParser;
    use crate::renderer::{JsonRenderer, Renderer, YamlRenderer};
    use crate::reporter::CoverageReporter;
    use crate::scanner::SourceScanner;

    info!("Starting API documentation extraction...");

    // Step 1: Load configuration and merge CLI flags
    let mut config = match &args.config_path {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    };
    config.break_on_undocumented |= args.break_on_undocumented;

    // Step 2: Scan directory for Rust files
    info!("Scanning project directory...");
    let scanner = SourceScanner::new(args.project_path.clone());
    let scan_report = scanner.scan()?;

    info!("Found {} Rust files", scan_report.source_files.len());
    for warning in &scan_report.warnings {
        log::warn!("{}", warning);
    }
    if scan_report.source_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    // Step 3: Parse files into AST
    info!("Parsing Rust files...");
    let parsed_files = AstParser::parse_files(&scan_report.source_files)?;
    info!("Parsed {} files", parsed_files.len());

    // Step 4: Build the source index and resolve configured type names
    let index = SourceIndex::new(parsed_files);
    for (value, key) in [
        (&config.base_type_name, "base_type_name"),
        (&config.common_error_controller, "common_error_controller"),
        (&config.stop_error_inspection_at, "stop_error_inspection_at"),
    ] {
        if !value.is_empty() && index.struct_def(value).is_none() {
            return Err(Error::Config(format!(
                "configured {} '{}' not found in the scanned sources",
                key, value
            ))
            .into());
        }
    }

    // Step 5: Extract the documentation model
    info!("Extracting documentation metadata...");
    let extractor = MetadataExtractor::new(&index, &config);
    let mut reporter = CoverageReporter::new();
    let model = extractor.extract(&mut reporter)?;
    info!(
        "Extracted {} domains and {} data types",
        model.domains.len(),
        model.data_types.len()
    );

    // Step 6: Render to the requested format
    info!("Rendering to {:?} format...", args.output_format);
    let renderer: Box<dyn Renderer> = match args.output_format {
        OutputFormat::Yaml => Box::new(YamlRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    };
    if let Some(output_path) = &args.output_path {
        crate::renderer::write_to_file(renderer.as_ref(), &model, output_path)?;
    } else {
        println!("{}", renderer.render(&model)?);
    }

    // Step 7: Coverage report and verdict
    reporter.print_overall_progress_report();
    let undocumented = reporter.undocumented_count();
    if config.break_on_undocumented && undocumented > 0 {
        return Err(Error::UndocumentedGate(undocumented).into());
    }

    info!("Extraction complete");
    Ok(())
}
