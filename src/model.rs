//! Document Model
//!
//! 会計システムへ出力する伝票（pokladničný doklad）と明細（položka）のモデル。

use serde::Serialize;

/// 伝票明細（1行の取引）
///
/// 明細は必ずいずれかの伝票に属し、伝票内の位置以外の識別子は持ちません。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Item {
    /// PPD種別コード（数字のみに正規化済み、例: `2610020`）
    pub ppd_type_code: String,

    /// 金額（正規の数値文字列）
    pub amount: String,

    /// 摘要（「Názov」列）
    pub note: String,

    /// 原価センターコード（「OŠ」列）
    pub cost_center_code: String,

    /// 経費対象コード（「EO」列）
    pub expense_object_code: String,
}

impl Item {
    /// すべての項目が空かどうか
    pub fn is_empty(&self) -> bool {
        self.ppd_type_code.is_empty()
            && self.amount.is_empty()
            && self.note.is_empty()
            && self.cost_center_code.is_empty()
            && self.expense_object_code.is_empty()
    }
}

/// 伝票
///
/// 明細はワークシートの行順に保持されます。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Document {
    /// レジ略称（「Skratka pokladne」列）
    pub register_code: String,

    /// 伝票種別（「Druh PD」列）
    pub document_kind: String,

    /// 伝票日付（`dd.mm.yyyy`、日付として解釈できない場合は元の文字列）
    pub document_date: String,

    /// 目的（「Účel PD」列）
    pub purpose_text: String,

    /// 相手先（「Komu/od」列、任意）
    pub counterparty_text: String,

    /// 明細（行順）
    pub items: Vec<Item>,
}

/// 伝票のグルーピングキー
///
/// 連続する行のキーが一致する場合のみ、同じ伝票として扱われます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentKey<'a> {
    pub register_code: &'a str,
    pub document_kind: &'a str,
    pub document_date: &'a str,
    pub purpose_text: &'a str,
    pub counterparty_text: &'a str,
}

impl Document {
    /// 伝票のグルーピングキーを取得
    pub fn key(&self) -> DocumentKey<'_> {
        DocumentKey {
            register_code: &self.register_code,
            document_kind: &self.document_kind,
            document_date: &self.document_date,
            purpose_text: &self.purpose_text,
            counterparty_text: &self.counterparty_text,
        }
    }

    /// ヘッダー項目がすべて空かどうか
    pub fn has_empty_header(&self) -> bool {
        self.register_code.is_empty()
            && self.document_kind.is_empty()
            && self.document_date.is_empty()
            && self.purpose_text.is_empty()
            && self.counterparty_text.is_empty()
    }
}

/// 変換結果の件数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConversionSummary {
    /// 伝票数
    pub documents: usize,

    /// 全伝票の明細数の合計
    pub items: usize,
}

impl ConversionSummary {
    /// 伝票リストから件数を集計
    pub fn from_documents(documents: &[Document]) -> Self {
        Self {
            documents: documents.len(),
            items: documents.iter().map(|d| d.items.len()).sum(),
        }
    }
}
