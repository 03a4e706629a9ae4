//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::NaiveDateTime;

/// セルの値を表す列挙型
///
/// calamineのセル値（計算済みのキャッシュ値）を、正規化関数が扱う最小限の
/// 種類に畳み込んだものです。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 空セル
    Empty,

    /// 文字列
    String(String),

    /// 数値（整数セルもf64として保持）
    Number(f64),

    /// 論理値
    Bool(bool),

    /// 日付・日時（日付書式のセル）
    DateTime(NaiveDateTime),

    /// エラー値（例: #DIV/0!）
    Error(String),
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 文字列セルの場合のみ、その値を返す
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// セル座標（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// メモリ上に展開したワークシート
///
/// calamineの`Range`と同様に、最初の非空セルを原点とする矩形グリッドとして
/// 保持します。座標はすべてワークシート上の絶対位置（0始まり）で指定し、
/// グリッド外のセルは空セルとして扱います。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Worksheet {
    /// シート名
    name: String,

    /// グリッドの原点（左上セル）
    origin: CellCoord,

    /// 行ごとのセル値
    rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    /// 原点とセル値から新しいワークシートを生成
    pub fn new(name: impl Into<String>, origin: CellCoord, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            origin,
            rows,
        }
    }

    /// A1を原点とするワークシートを生成
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self::new(String::new(), CellCoord::default(), rows)
    }

    /// シート名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// データを含む最初の行（0始まり）
    pub fn first_row(&self) -> u32 {
        self.origin.row
    }

    /// データを含む最後の行の次の行（0始まり、排他的）
    pub fn end_row(&self) -> u32 {
        self.origin.row + self.rows.len() as u32
    }

    /// 行のセル値（グリッド外の行は空スライス）
    ///
    /// 返されるスライスの先頭は`origin.col`列目に対応します。
    pub fn row(&self, row: u32) -> &[CellValue] {
        row.checked_sub(self.origin.row)
            .and_then(|offset| self.rows.get(offset as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 行内のセルを、ワークシート上の列番号（0始まり）と組にして列挙
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = (u32, &CellValue)> + '_ {
        let first_col = self.origin.col;
        self.row(row)
            .iter()
            .enumerate()
            .map(move |(offset, cell)| (first_col + offset as u32, cell))
    }

    /// 指定座標のセル値（グリッド外は空セル）
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        col.checked_sub(self.origin.col)
            .and_then(|offset| self.row(row).get(offset as usize))
            .unwrap_or(&EMPTY_CELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Worksheet {
        Worksheet::new(
            "Sheet1",
            CellCoord::new(2, 1),
            vec![
                vec![CellValue::from("B3"), CellValue::from("C3")],
                vec![CellValue::Empty, CellValue::Number(1.0)],
            ],
        )
    }

    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::from("").is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_cell_value_from_option() {
        assert_eq!(CellValue::from(None::<&str>), CellValue::Empty);
        assert_eq!(CellValue::from(Some(2.5)), CellValue::Number(2.5));
    }

    #[test]
    fn test_worksheet_bounds() {
        let sheet = sample();
        assert_eq!(sheet.name(), "Sheet1");
        assert_eq!(sheet.first_row(), 2);
        assert_eq!(sheet.end_row(), 4);
    }

    #[test]
    fn test_worksheet_cell_uses_absolute_coordinates() {
        let sheet = sample();
        assert_eq!(sheet.cell(2, 1), &CellValue::from("B3"));
        assert_eq!(sheet.cell(3, 2), &CellValue::Number(1.0));
        // グリッド外
        assert_eq!(sheet.cell(0, 0), &CellValue::Empty);
        assert_eq!(sheet.cell(2, 0), &CellValue::Empty);
        assert_eq!(sheet.cell(2, 5), &CellValue::Empty);
        assert_eq!(sheet.cell(9, 1), &CellValue::Empty);
    }

    #[test]
    fn test_worksheet_row_cells_reports_sheet_columns() {
        let sheet = sample();
        let cols: Vec<u32> = sheet.row_cells(2).map(|(col, _)| col).collect();
        assert_eq!(cols, vec![1, 2]);
        assert_eq!(sheet.row_cells(7).count(), 0);
    }
}
