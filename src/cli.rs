use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{HeaderLanguage, OutputFormat};
use crate::workflow::{self, ProcessSummary};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command-line definition.
///
/// - `upload <FILE>`: stage a `.zip`/`.xml` file and print its identifier
/// - `process <UPLOAD_ID>`: extract a staged upload and write the invoice table
/// - `run <FILE>`: both steps at once
pub fn build_command() -> Command<'static> {
    Command::new("hoadon-cli")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("upload")
                .about("Stage a .zip or .xml file in the upload folder")
                .arg(
                    Arg::new("file")
                        .help("ZIP archive or XML document to stage")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("process")
                .about("Extract a staged upload and write the invoice table")
                .after_help("Example:\n  hoadon-cli process invoices_march.zip --format csv")
                .arg(
                    Arg::new("upload_id")
                        .help("Identifier printed by the upload command")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .args(processing_args()),
        )
        .subcommand(
            Command::new("run")
                .about("Stage a file and process it in one step")
                .arg(
                    Arg::new("file")
                        .help("ZIP archive or XML document to convert")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .args(processing_args()),
        )
}

fn config_arg() -> Arg<'static> {
    Arg::new("config")
        .short('c')
        .long("config")
        .help("Path to a TOML config file")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn processing_args() -> Vec<Arg<'static>> {
    vec![
        config_arg(),
        Arg::new("output")
            .short('o')
            .long("output")
            .help("Where to write the table (defaults to <upload_dir>/output.<ext>)")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("format")
            .short('f')
            .long("format")
            .help("Output format")
            .value_parser(PossibleValuesParser::new(["xlsx", "csv", "parquet"]))
            .action(ArgAction::Set),
        Arg::new("lang")
            .short('l')
            .long("lang")
            .help("Column header language")
            .value_parser(PossibleValuesParser::new(["en", "vi"]))
            .action(ArgAction::Set),
        Arg::new("threads")
            .short('j')
            .long("threads")
            .help("Parser threads (0 = all cores)")
            .value_parser(clap::value_parser!(usize))
            .action(ArgAction::Set),
        Arg::new("skip_invalid")
            .long("skip-invalid")
            .help("Skip documents that fail to parse instead of aborting")
            .action(ArgAction::SetTrue),
        Arg::new("cleanup")
            .long("cleanup")
            .help("Remove the extraction folder after writing the table")
            .action(ArgAction::SetTrue),
    ]
}

/// Parses command-line arguments and executes the selected subcommand.
///
/// # Errors
///
/// Returns an error if the config file is invalid or the selected step fails.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    match matches.subcommand() {
        Some(("upload", sub)) => {
            let config = load_config(sub)?;
            let file = sub.get_one::<PathBuf>("file").expect("file is required");
            let upload_id = workflow::upload(file, &config)?;
            println!("{upload_id}");
        }
        Some(("process", sub)) => {
            let config = resolve_config(sub)?;
            let upload_id = sub
                .get_one::<String>("upload_id")
                .expect("upload_id is required");
            let output = sub.get_one::<PathBuf>("output").map(PathBuf::as_path);
            let summary = workflow::process_upload(upload_id, &config, output).await?;
            report(&summary);
        }
        Some(("run", sub)) => {
            let config = resolve_config(sub)?;
            let file = sub.get_one::<PathBuf>("file").expect("file is required");
            let output = sub.get_one::<PathBuf>("output").map(PathBuf::as_path);
            let summary = workflow::run(file, &config, output).await?;
            report(&summary);
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

fn report(summary: &ProcessSummary) {
    info!(
        invoices = summary.invoices,
        output = %summary.output_path.display(),
        "All operations completed successfully"
    );
    println!("{}", summary.output_path.display());
}

fn load_config(sub: &ArgMatches) -> AppResult<ResolvedConfig> {
    match sub.get_one::<PathBuf>("config") {
        Some(path) => ResolvedConfig::from_toml_file(path),
        None => Ok(ResolvedConfig::default()),
    }
}

/// Loads the config file (if any) and applies command-line overrides on top.
fn resolve_config(sub: &ArgMatches) -> AppResult<ResolvedConfig> {
    let mut config = load_config(sub)?;

    match sub.get_one::<String>("format") {
        Some(format) => config.output_format = format.parse().map_err(AppError::InvalidInput)?,
        None => {
            // An explicit output path with a known extension picks the format
            if let Some(format) = sub
                .get_one::<PathBuf>("output")
                .and_then(|p| format_from_extension(p))
            {
                config.output_format = format;
            }
        }
    }
    if let Some(lang) = sub.get_one::<String>("lang") {
        config.header_language = lang
            .parse::<HeaderLanguage>()
            .map_err(AppError::InvalidInput)?;
    }
    if let Some(&threads) = sub.get_one::<usize>("threads") {
        config.parser_threads = threads;
    }
    if sub.get_flag("skip_invalid") {
        config.skip_invalid_documents = true;
    }
    if sub.get_flag("cleanup") {
        config.cleanup = true;
    }

    config.validate()?;
    Ok(config)
}

fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
}
