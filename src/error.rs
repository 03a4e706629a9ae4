//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// pokladna-xmlクレート全体で使用するエラー型
///
/// ワークブックの読み込み、ヘッダー行の検出、伝票の再構築、XML出力の
/// すべての段階で発生するエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `Io` / `Parse`: 下位レイヤー（ファイル、calamine）のエラー。変換せずにそのまま伝播
/// - `HeaderNotFound`: マーカー列「Skratka pokladne」を含む行が存在しない
/// - `MissingColumns`: 必須列が欠けている（欠けている列をすべて列挙）
/// - `DanglingItem`: 伝票ヘッダーより前に明細行が現れた
/// - `Config`: シート選択などの設定エラー
#[derive(Error, Debug)]
pub enum PokladnaError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// XMLの書き出し中に発生したエラー
    #[error("XML error: {0}")]
    Xml(String),

    /// JSONプレビューの書き出し中に発生したエラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// 存在しないシート名、範囲外のシートインデックス、XLSX以外の形式など。
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー（入力ファイルサイズの上限など）
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// ヘッダー行が見つからない
    ///
    /// どの行にもトリム後の値がマーカーと一致するセルがない場合に発生します。
    #[error("Header row not found: no row contains a \"{marker}\" cell")]
    HeaderNotFound {
        /// 検索したマーカー列名
        marker: String,
    },

    /// 必須列が欠けている
    ///
    /// ヘッダー行は見つかったが、必須列のいずれかが存在しない場合に発生します。
    /// 欠けている列はまとめて報告されます。
    #[error("Missing columns: {}", .columns.join(", "))]
    MissingColumns {
        /// 欠けている列名（必須列の定義順）
        columns: Vec<String>,
    },

    /// 伝票ヘッダーのない明細行
    #[error("Row {row}: item row without a preceding document header")]
    DanglingItem {
        /// ワークシート上の行番号（1始まり）
        row: u32,
    },
}

/// クレート共通の`Result`型
pub type Result<T> = std::result::Result<T, PokladnaError>;
