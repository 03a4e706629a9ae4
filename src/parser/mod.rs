//! Parser Module
//!
//! calamineを使用したワークブック読み込みの実装。
//! 選択したワークシートの計算済みセル値を`Worksheet`として展開します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
