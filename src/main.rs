//! pokladna-xml CLI
//!
//! ワークブックを会計システム取り込み用XMLに変換するコマンドラインツール。

use clap::{Parser, ValueEnum};
use log::{LevelFilter, Log, Metadata, Record};
use pokladna_xml::{ConverterBuilder, OutputFormat, PokladnaError, SheetSelector};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fmt {
    Xml,
    Json,
}

impl From<Fmt> for OutputFormat {
    fn from(fmt: Fmt) -> Self {
        match fmt {
            Fmt::Xml => OutputFormat::Xml,
            Fmt::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pokladna-xml",
    version,
    about = "Convert cash-register spreadsheets (pokladničné doklady) to accounting XML"
)]
struct Cli {
    /// Input workbook (.xlsx)
    input: PathBuf,

    /// Output file (default: input path with .xml extension)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Worksheet index (0-based) or name
    #[arg(short = 's', long = "sheet", default_value = "0")]
    sheet: SheetSelector,

    /// Mandant ID stamped on the export
    #[arg(short = 'm', long = "mandant", default_value = "1")]
    mandant: String,

    /// Output format
    #[arg(long = "format", value_enum, default_value_t = Fmt::Xml)]
    format: Fmt,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

/// 標準エラー出力へのロガー
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn default_output(input: &Path, format: Fmt) -> PathBuf {
    let extension = match format {
        Fmt::Xml => "xml",
        Fmt::Json => "json",
    };
    input.with_extension(extension)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input, cli.format));

    log::debug!(
        "input: {}, output: {}, sheet: {}, mandant: {}",
        cli.input.display(),
        output.display(),
        cli.sheet,
        cli.mandant
    );

    let result = ConverterBuilder::new()
        .with_sheet_selector(cli.sheet.clone())
        .with_mandant_id(&cli.mandant)
        .with_output_format(cli.format.into())
        .build()
        .and_then(|converter| converter.convert_file(&cli.input, &output));

    match result {
        Ok(summary) => {
            println!(
                "Done: {} -> {} (documents: {}, items: {})",
                cli.input.display(),
                output.display(),
                summary.documents,
                summary.items
            );
        }
        Err(e) => {
            handle_error(&e);
            process::exit(1);
        }
    }
}

fn handle_error(error: &PokladnaError) {
    eprintln!("Error: {}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }

    match error {
        PokladnaError::HeaderNotFound { .. } | PokladnaError::MissingColumns { .. } => {
            eprintln!("Check that the selected sheet contains the cash-register header row.");
        }
        PokladnaError::DanglingItem { .. } => {
            eprintln!("Fill in the document header (Skratka pokladne, Druh PD, ...) above the item rows.");
        }
        PokladnaError::Config(_) => {
            eprintln!("Check the sheet index or name.");
        }
        _ => {}
    }
}
