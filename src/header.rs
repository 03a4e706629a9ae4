//! Header Locator Module
//!
//! ワークシートからヘッダー行を内容で検出し、列名から列番号への対応表を構築する。
//! ヘッダー行の位置は固定ではなく、マーカー列「Skratka pokladne」を含む最初の行を
//! ヘッダー行とみなします。

use std::collections::HashMap;

use crate::error::PokladnaError;
use crate::types::{CellValue, Worksheet};

/// レジ略称（ヘッダー行のマーカーを兼ねる）
pub const REGISTER_CODE: &str = "Skratka pokladne";
/// 伝票種別
pub const DOCUMENT_KIND: &str = "Druh PD";
/// 伝票日付
pub const DOCUMENT_DATE: &str = "Dátum PD";
/// 目的
pub const PURPOSE: &str = "Účel PD";
/// PPD種別略称
pub const PPD_TYPE: &str = "Skratka typu PPD";
/// 名称（明細の摘要）
pub const NAME: &str = "Názov";
/// 金額
pub const AMOUNT: &str = "Suma";
/// 原価センター
pub const COST_CENTER: &str = "OŠ";
/// 経費対象（任意列）
pub const EXPENSE_OBJECT: &str = "EO";

/// 相手先列の別名（先に見つかったものを使用）
pub const COUNTERPARTY_ALIASES: [&str; 3] = ["Komu/od", "Komu od", "Komu_od"];

/// ヘッダー行を示すマーカー
pub const HEADER_MARKER: &str = REGISTER_CODE;

/// 必須列（エラーメッセージはこの順序で列挙）
pub const REQUIRED_COLUMNS: [&str; 8] = [
    REGISTER_CODE,
    DOCUMENT_KIND,
    DOCUMENT_DATE,
    PURPOSE,
    PPD_TYPE,
    NAME,
    AMOUNT,
    COST_CENTER,
];

/// 検出されたヘッダー行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    /// ヘッダー行の位置（0始まり）
    row: u32,

    /// 列名（トリム済み） → 列番号（1始まり）
    columns: HashMap<String, u32>,
}

impl HeaderRow {
    /// ヘッダー行の位置（0始まり）
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 列名に対応する列番号（1始まり）
    pub fn column(&self, label: &str) -> Option<u32> {
        self.columns.get(label).copied()
    }

    /// 列名の数
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// 列名が1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// マーカーを含む最初の行を探し、列名の対応表を構築する
///
/// 上から順に走査し、トリム後の値が`marker`と一致する文字列セルを含む最初の行で
/// 走査を打ち切ります。その行の空でない文字列セルをすべて列名として登録します。
/// 同じ列名が複数ある場合は、後に出現した列が優先されます。
///
/// # 戻り値
///
/// * `Ok(HeaderRow)` - ヘッダー行が見つかった場合
/// * `Err(PokladnaError::HeaderNotFound)` - どの行にもマーカーがない場合
pub fn find_header_row(sheet: &Worksheet, marker: &str) -> Result<HeaderRow, PokladnaError> {
    let row = (sheet.first_row()..sheet.end_row())
        .find(|&row| {
            sheet
                .row(row)
                .iter()
                .any(|cell| cell.as_str().is_some_and(|s| s.trim() == marker))
        })
        .ok_or_else(|| PokladnaError::HeaderNotFound {
            marker: marker.to_string(),
        })?;

    let mut columns = HashMap::new();
    for (col, cell) in sheet.row_cells(row) {
        if let CellValue::String(s) = cell {
            let label = s.trim();
            if !label.is_empty() {
                columns.insert(label.to_string(), col + 1);
            }
        }
    }

    Ok(HeaderRow { row, columns })
}

/// 変換に使用する列の配置
///
/// 変換処理ごとに一度だけ構築され、以降は変更されません。
/// 列番号はすべて1始まりです。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// ヘッダー行の位置（0始まり）
    pub header_row: u32,
    pub register_code: u32,
    pub document_kind: u32,
    pub document_date: u32,
    pub purpose: u32,
    pub ppd_type: u32,
    pub name: u32,
    pub amount: u32,
    pub cost_center: u32,
    /// 相手先列（存在しない場合は全行で空）
    pub counterparty: Option<u32>,
    /// 経費対象列（存在しない場合は全行で空）
    pub expense_object: Option<u32>,
}

impl ColumnLayout {
    /// ヘッダー行から列の配置を解決する
    ///
    /// # 戻り値
    ///
    /// * `Ok(ColumnLayout)` - 必須列がすべて揃っている場合
    /// * `Err(PokladnaError::MissingColumns)` - 欠けている必須列をすべて列挙したエラー
    pub fn resolve(header: &HeaderRow) -> Result<Self, PokladnaError> {
        let mut resolved = [0u32; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, label) in resolved.iter_mut().zip(REQUIRED_COLUMNS) {
            match header.column(label) {
                Some(col) => *slot = col,
                None => missing.push(label.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(PokladnaError::MissingColumns { columns: missing });
        }

        let [register_code, document_kind, document_date, purpose, ppd_type, name, amount, cost_center] =
            resolved;

        Ok(Self {
            header_row: header.row(),
            register_code,
            document_kind,
            document_date,
            purpose,
            ppd_type,
            name,
            amount,
            cost_center,
            counterparty: COUNTERPARTY_ALIASES
                .iter()
                .find_map(|alias| header.column(alias)),
            expense_object: header.column(EXPENSE_OBJECT),
        })
    }
}

/// ヘッダー行を検出し、列の配置を解決する
pub fn locate_header(sheet: &Worksheet) -> Result<ColumnLayout, PokladnaError> {
    let header = find_header_row(sheet, HEADER_MARKER)?;
    log::debug!(
        "header row found at row {} ({} labels)",
        header.row() + 1,
        header.len()
    );
    ColumnLayout::resolve(&header)
}
