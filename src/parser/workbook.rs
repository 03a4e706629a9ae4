//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックを開き、シートを選択し、
//! セル値を`Worksheet`へ展開する処理を提供します。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{Cursor, Read};

use crate::api::SheetSelector;
use crate::error::PokladnaError;
use crate::security::SecurityConfig;
use crate::types::{CellCoord, CellValue, Worksheet};

/// ワークブックパーサー
///
/// 入力全体をメモリに読み込んでから、calamineで開きます（XLSX形式のみサポート）。
/// calamineは数式ではなくキャッシュされた計算結果を返すため、
/// 数式セルは計算済みの値として扱われます。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `reader` - Excelファイルを読み込むためのリーダー
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(PokladnaError::SecurityViolation)` - 入力サイズが上限を超えた場合
    /// * `Err(PokladnaError::Parse)` - ワークブックとして解析できない場合
    /// * `Err(PokladnaError::Config)` - XLSX以外の形式の場合
    pub fn open<R: Read>(mut reader: R) -> Result<Self, PokladnaError> {
        // セキュリティ: ファイルサイズ制限を適用
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;
        SecurityConfig::default().check_input_size(bytes_read as u64)?;

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(PokladnaError::Parse)?;
        match sheets {
            Sheets::Xlsx(workbook) => Ok(Self { workbook }),
            _ => Err(PokladnaError::Config(
                "Only XLSX format is supported".to_string(),
            )),
        }
    }

    /// すべてのシート名を取得
    pub fn get_sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シート選択方式に基づいてシート名を解決
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 選択されたシート名
    /// * `Err(PokladnaError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String, PokladnaError> {
        let all_sheet_names = self.get_sheet_names();

        match selector {
            SheetSelector::Index(index) => {
                all_sheet_names.get(*index).cloned().ok_or_else(|| {
                    PokladnaError::Config(format!(
                        "Sheet index {} is out of range (total: {})",
                        index,
                        all_sheet_names.len()
                    ))
                })
            }

            SheetSelector::Name(name) => {
                if !all_sheet_names.contains(name) {
                    return Err(PokladnaError::Config(format!("Sheet '{}' not found", name)));
                }
                Ok(name.clone())
            }
        }
    }

    /// シートを読み込み、セル値をワークシートとして展開する
    pub fn read_sheet(&mut self, sheet_name: &str) -> Result<Worksheet, PokladnaError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| PokladnaError::Parse(e.into()))?;

        let worksheet = worksheet_from_range(sheet_name, &range);
        log::debug!(
            "sheet '{}': rows {}..{}",
            sheet_name,
            worksheet.first_row() + 1,
            worksheet.end_row()
        );
        Ok(worksheet)
    }
}

/// calamineの`Range`を`Worksheet`へ変換
fn worksheet_from_range(sheet_name: &str, range: &Range<Data>) -> Worksheet {
    let origin = range
        .start()
        .map(|(row, col)| CellCoord::new(row, col))
        .unwrap_or_default();

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Worksheet::new(sheet_name, origin, rows)
}

/// calamineのセル値を`CellValue`へ変換
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                CellValue::Number(dt.as_f64())
            } else {
                dt.as_datetime()
                    .map(CellValue::DateTime)
                    .unwrap_or(CellValue::Number(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// ISO 8601形式の日時（または日付）文字列を解析
fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| s.parse::<NaiveDate>().ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
}


// 実ファイルを使うテストは統合テスト（tests/）で実装します。
