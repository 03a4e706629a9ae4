//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// シート選択方式
///
/// 変換対象のワークシートを1つ選択します。デフォルトは最初のシートです。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(0)` は最初のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Pokladna".to_string())`
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl From<usize> for SheetSelector {
    fn from(index: usize) -> Self {
        SheetSelector::Index(index)
    }
}

impl From<&str> for SheetSelector {
    fn from(name: &str) -> Self {
        SheetSelector::Name(name.to_string())
    }
}

impl From<String> for SheetSelector {
    fn from(name: String) -> Self {
        SheetSelector::Name(name)
    }
}

/// 入力欄の文字列からシート選択方式を解釈する
///
/// - 空文字列（トリム後）: 最初のシート
/// - 0以上の整数: インデックス指定
/// - それ以外: シート名指定（トリム後の文字列）
impl FromStr for SheetSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(SheetSelector::Index(0));
        }
        Ok(match trimmed.parse::<usize>() {
            Ok(index) => SheetSelector::Index(index),
            Err(_) => SheetSelector::Name(trimmed.to_string()),
        })
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(index) => write!(f, "#{}", index),
            SheetSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// 出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// 会計システム取り込み用XML（windows-1250、デフォルト）
    ///
    /// ```xml
    /// <?xml version="1.0" encoding="windows-1250" standalone="yes"?>
    /// <pokladnicne_doklady>
    ///   <mandant mandant_id="1" />
    ///   <pokladnicny_doklad skratka_pk="P1" druh_pd="V" datum_pd="05.01.2024" ucel_pd="Nákup" komu_od="">
    ///     <polozka_pd skratka_typu_ppd="2610020" suma_ppd="12.5" />
    ///   </pokladnicny_doklad>
    /// </pokladnicne_doklady>
    /// ```
    #[default]
    Xml,

    /// 伝票ツリーのJSONプレビュー（UTF-8）
    ///
    /// グルーピング結果の確認用です。会計システムへの取り込みには使用しません。
    Json,
}
