//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。
//! `Converter`はワークブックの読み込みから出力までの変換処理全体のファサードです。

use crate::api::{OutputFormat, SheetSelector};
use crate::documents::reconstruct_documents;
use crate::error::PokladnaError;
use crate::header::locate_header;
use crate::model::{ConversionSummary, Document};
use crate::output::{OutputFormatter, DEFAULT_MANDANT_ID};
use crate::parser::WorkbookParser;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// マンダントID
    pub mandant_id: String,

    /// 出力フォーマット
    pub output_format: OutputFormat,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::Index(0),
            mandant_id: DEFAULT_MANDANT_ID.to_string(),
            output_format: OutputFormat::Xml,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use pokladna_xml::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), pokladna_xml::PokladnaError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Name("Pokladňa".to_string()))
///     .with_mandant_id("12")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: 最初のシート
    /// - マンダントID: `"1"`
    /// - 出力フォーマット: XML（windows-1250）
    pub fn new() -> Self {
        Self::default()
    }

    /// 変換対象のシートを選択する
    pub fn with_sheet_selector(mut self, selector: impl Into<SheetSelector>) -> Self {
        self.config.sheet_selector = selector.into();
        self
    }

    /// 出力全体に付与するマンダントIDを指定する
    ///
    /// 前後の空白は除去されます。空の場合はデフォルト値`"1"`が使用されます。
    pub fn with_mandant_id(mut self, mandant_id: impl AsRef<str>) -> Self {
        let trimmed = mandant_id.as_ref().trim();
        self.config.mandant_id = if trimmed.is_empty() {
            DEFAULT_MANDANT_ID.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    /// 出力フォーマットを指定する
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)` - 設定が有効な場合
    /// * `Err(PokladnaError::Config)` - シート名が空の場合
    pub fn build(self) -> Result<Converter, PokladnaError> {
        if let SheetSelector::Name(ref name) = self.config.sheet_selector {
            if name.trim().is_empty() {
                return Err(PokladnaError::Config(
                    "Sheet name must not be empty".to_string(),
                ));
            }
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// 1回の変換は1つのワークシートに対する逐次処理で、状態はすべて呼び出しの中に閉じています。
/// そのため、異なる入出力の組に対して複数スレッドから同時に呼び出すことができます。
///
/// # 使用例
///
/// ```rust,no_run
/// use pokladna_xml::ConverterBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), pokladna_xml::PokladnaError> {
/// let converter = ConverterBuilder::new().build()?;
/// let input = File::open("pokladna.xlsx")?;
/// let mut output = Vec::new();
/// let summary = converter.convert(input, &mut output)?;
/// println!("{} documents, {} items", summary.documents, summary.items);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// ワークブックを読み込み、伝票リストを再構築する
    ///
    /// # 処理フロー
    ///
    /// 1. ワークブックを開く
    /// 2. シート選択
    /// 3. ヘッダー行の検出と列の配置の解決
    /// 4. 伝票の再構築
    pub fn read_documents<R: Read>(&self, input: R) -> Result<Vec<Document>, PokladnaError> {
        let mut parser = WorkbookParser::open(input)?;
        let sheet_name = parser.select_sheet(&self.config.sheet_selector)?;
        let sheet = parser.read_sheet(&sheet_name)?;

        let layout = locate_header(&sheet)?;
        reconstruct_documents(&sheet, &layout)
    }

    /// ワークブックを変換し、結果をライターへ書き出す
    ///
    /// 出力は伝票リスト全体をメモリ上でシリアライズした後に一度だけ書き込まれます。
    /// エラーが発生した場合、ライターには何も書き込まれません。
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionSummary)` - 伝票数と明細数
    /// * `Err(PokladnaError)` - エラーが発生した場合
    pub fn convert<R: Read, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<ConversionSummary, PokladnaError> {
        let (bytes, summary) = self.render(input)?;
        output.write_all(&bytes)?;
        output.flush()?;
        Ok(summary)
    }

    /// ワークブックを変換し、出力バイト列を返す
    pub fn convert_to_bytes<R: Read>(&self, input: R) -> Result<Vec<u8>, PokladnaError> {
        self.render(input).map(|(bytes, _)| bytes)
    }

    /// ファイルを変換し、出力ファイルへ書き込む
    ///
    /// 出力ファイルは変換がすべて成功した後にのみ作成（既存の場合は切り詰め）されます。
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        destination: Q,
    ) -> Result<ConversionSummary, PokladnaError> {
        let input = fs::File::open(source.as_ref())?;
        let (bytes, summary) = self.render(input)?;
        fs::write(destination.as_ref(), bytes)?;

        log::info!(
            "{} -> {}: {} documents, {} items",
            source.as_ref().display(),
            destination.as_ref().display(),
            summary.documents,
            summary.items
        );
        Ok(summary)
    }

    fn render<R: Read>(&self, input: R) -> Result<(Vec<u8>, ConversionSummary), PokladnaError> {
        let documents = self.read_documents(input)?;
        let summary = ConversionSummary::from_documents(&documents);

        let mut bytes = Vec::new();
        OutputFormatter::from_format(self.config.output_format).render(
            &documents,
            &self.config.mandant_id,
            &mut bytes,
        )?;
        Ok((bytes, summary))
    }
}

/// ワークブックを会計システム取り込み用XMLファイルに変換する
///
/// # 引数
///
/// * `source` - 入力ワークブックのパス
/// * `destination` - 出力XMLのパス
/// * `sheet` - シート選択（インデックスまたはシート名）
/// * `mandant_id` - マンダントID（空の場合は`"1"`）
///
/// # 戻り値
///
/// * `Ok((documents, items))` - 伝票数と全明細数
///
/// # 使用例
///
/// ```rust,no_run
/// # fn main() -> Result<(), pokladna_xml::PokladnaError> {
/// let (documents, items) = pokladna_xml::convert_file("pokladna.xlsx", "pokladna.xml", 0usize, "1")?;
/// # Ok(())
/// # }
/// ```
pub fn convert_file<P, Q, S>(
    source: P,
    destination: Q,
    sheet: S,
    mandant_id: &str,
) -> Result<(usize, usize), PokladnaError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: Into<SheetSelector>,
{
    let summary = ConverterBuilder::new()
        .with_sheet_selector(sheet)
        .with_mandant_id(mandant_id)
        .build()?
        .convert_file(source, destination)?;
    Ok((summary.documents, summary.items))
}
