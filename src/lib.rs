//! pokladna-xml - Cash-register spreadsheet to accounting XML converter
//!
//! このクレートは、Excelワークシートに入力されたレジ取引（pokladničné doklady）を読み込み、
//! 伝票と明細の階層に再構築して、会計システム取り込み用のXML（windows-1250）に変換します。
//!
//! # Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 最初のシートを変換し、マンダントID "1" を付与
//!     let (documents, items) =
//!         pokladna_xml::convert_file("pokladna.xlsx", "pokladna.xml", 0usize, "1")?;
//!     println!("{} documents, {} items", documents, items);
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use pokladna_xml::{ConverterBuilder, OutputFormat, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Name("Január".to_string()))
//!         .with_mandant_id("12")
//!         .with_output_format(OutputFormat::Json) // グルーピング結果のプレビュー
//!         .build()?;
//!
//!     let input = File::open("pokladna.xlsx")?;
//!     let output = File::create("preview.json")?;
//!     converter.convert(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Worksheet Layout
//!
//! ヘッダー行は「Skratka pokladne」セルを含む最初の行として内容で検出されます。
//! 必須列は「Skratka pokladne」「Druh PD」「Dátum PD」「Účel PD」「Skratka typu PPD」
//! 「Názov」「Suma」「OŠ」、任意列は「Komu/od」（別名「Komu od」「Komu_od」）と「EO」です。

mod api;
mod builder;
mod documents;
mod error;
mod formatter;
mod header;
mod model;
mod output;
mod parser;
mod security;
mod types;

// 公開API
pub use api::{OutputFormat, SheetSelector};
pub use builder::{convert_file, Converter, ConverterBuilder};
pub use documents::reconstruct_documents;
pub use error::{PokladnaError, Result};
pub use formatter::{format_date, normalize_code, to_numeric_text, to_text};
pub use header::{find_header_row, locate_header, ColumnLayout, HeaderRow, HEADER_MARKER, REQUIRED_COLUMNS};
pub use model::{ConversionSummary, Document, DocumentKey, Item};
pub use output::{documents_to_xml, DEFAULT_MANDANT_ID, XML_ENCODING};
pub use types::{CellCoord, CellValue, Worksheet};
