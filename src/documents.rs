//! Document Reconstructor Module
//!
//! ヘッダー行以降のデータ行を走査し、伝票と明細の階層を再構築するモジュール。
//!
//! 各行は「伝票ヘッダー項目を持つ行」「明細項目を持つ行」またはその両方に分類されます。
//! ヘッダー項目を持つ行は、直前の伝票とグルーピングキーが一致すれば同じ伝票の続きとして、
//! 一致しなければ新しい伝票として扱います。キーの比較は直前の伝票とのみ行うため、
//! 別の伝票を挟んで同じキーが再び現れた場合は新しい伝票になります。

use crate::error::PokladnaError;
use crate::formatter::{format_date, normalize_code, to_numeric_text, to_text};
use crate::header::ColumnLayout;
use crate::model::{Document, Item};
use crate::types::Worksheet;

/// 1行分の正規化済みフィールド
#[derive(Debug)]
struct RowFields {
    header: Document,
    item: Item,
}

impl RowFields {
    /// 行のフィールドを読み取り、正規化する
    fn read(sheet: &Worksheet, row: u32, layout: &ColumnLayout) -> Self {
        let cell = |column: u32| sheet.cell(row, column - 1);
        let optional = |column: Option<u32>| column.map(|c| to_text(cell(c))).unwrap_or_default();

        let header = Document {
            register_code: to_text(cell(layout.register_code)),
            document_kind: to_text(cell(layout.document_kind)),
            document_date: format_date(cell(layout.document_date)),
            purpose_text: to_text(cell(layout.purpose)),
            counterparty_text: optional(layout.counterparty),
            items: Vec::new(),
        };

        let item = Item {
            ppd_type_code: normalize_code(cell(layout.ppd_type)),
            amount: to_numeric_text(cell(layout.amount)),
            note: to_text(cell(layout.name)),
            cost_center_code: to_text(cell(layout.cost_center)),
            expense_object_code: optional(layout.expense_object),
        };

        Self { header, item }
    }
}

/// データ行から伝票リストを再構築する
///
/// # 引数
///
/// * `sheet` - ワークシート
/// * `layout` - ヘッダー行から解決した列の配置
///
/// # 戻り値
///
/// * `Ok(Vec<Document>)` - 初出順の伝票リスト（各伝票の明細は行順）
/// * `Err(PokladnaError::DanglingItem)` - 伝票ヘッダーより前に明細行が現れた場合
///
/// # 処理フロー
///
/// 1. 10個のフィールドをすべて正規化
/// 2. すべて空の行（区切り行）はスキップ
/// 3. ヘッダー項目があれば、直前の伝票とキーを比較し、異なれば新しい伝票を開始
/// 4. ヘッダー項目がなく明細項目のみの行は、直前の伝票の続きとして扱う
/// 5. 明細項目があれば、現在の伝票に明細を追加
pub fn reconstruct_documents(
    sheet: &Worksheet,
    layout: &ColumnLayout,
) -> Result<Vec<Document>, PokladnaError> {
    let mut documents: Vec<Document> = Vec::new();

    for row in (layout.header_row + 1)..sheet.end_row() {
        let RowFields { header, item } = RowFields::read(sheet, row, layout);

        let has_header_data = !header.has_empty_header();
        let has_item_data = !item.is_empty();

        if !has_header_data && !has_item_data {
            log::trace!("row {}: blank, skipped", row + 1);
            continue;
        }

        // 現在の伝票は常に`documents`の末尾
        if has_header_data {
            let continues_current = documents
                .last()
                .is_some_and(|current| current.key() == header.key());
            if !continues_current {
                log::debug!(
                    "row {}: new document {} / {} / {}",
                    row + 1,
                    header.register_code,
                    header.document_kind,
                    header.document_date
                );
                documents.push(header);
            }
        } else if documents.is_empty() {
            return Err(PokladnaError::DanglingItem { row: row + 1 });
        }

        if has_item_data {
            if let Some(current) = documents.last_mut() {
                current.items.push(item);
            }
        }
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::locate_header;
    use crate::types::CellValue;
    use chrono::NaiveDate;

    const HEADER: [&str; 10] = [
        "Skratka pokladne",
        "Druh PD",
        "Dátum PD",
        "Účel PD",
        "Komu/od",
        "Skratka typu PPD",
        "Názov",
        "Suma",
        "OŠ",
        "EO",
    ];

    fn cell(s: &str) -> CellValue {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::from(s)
        }
    }

    /// ヘッダー項目と明細項目から1行を生成
    fn row(header: [&str; 5], item: [&str; 5]) -> Vec<CellValue> {
        header.iter().chain(item.iter()).map(|s| cell(s)).collect()
    }

    fn doc_a() -> [&'static str; 5] {
        ["P1", "V", "05.01.2024", "Nákup", ""]
    }

    fn doc_b() -> [&'static str; 5] {
        ["P1", "P", "05.01.2024", "Tržba", "Firma s.r.o."]
    }

    fn item(code: &str, amount: &str) -> [String; 5] {
        [
            code.to_string(),
            "Kancelárske potreby".to_string(),
            amount.to_string(),
            "100".to_string(),
            String::new(),
        ]
    }

    fn item_row(header: [&str; 5], item: &[String; 5]) -> Vec<CellValue> {
        // 列順: 種別, 名称, 金額, OŠ, EO
        let item_cells = [
            item[0].as_str(),
            item[1].as_str(),
            item[2].as_str(),
            item[3].as_str(),
            item[4].as_str(),
        ];
        row(header, item_cells)
    }

    fn blank_header() -> [&'static str; 5] {
        ["", "", "", "", ""]
    }

    /// 1行目にタイトル、2行目に空行、3行目にヘッダー行を置いたシート
    fn sheet_with(data_rows: Vec<Vec<CellValue>>) -> Worksheet {
        let mut rows = vec![
            vec![cell("Pokladničné doklady")],
            vec![],
            HEADER.iter().map(|s| cell(s)).collect(),
        ];
        rows.extend(data_rows);
        Worksheet::from_rows(rows)
    }

    fn reconstruct(sheet: &Worksheet) -> Result<Vec<Document>, PokladnaError> {
        let layout = locate_header(sheet)?;
        reconstruct_documents(sheet, &layout)
    }

    #[test]
    fn test_item_only_row_continues_document() {
        let sheet = sheet_with(vec![
            item_row(doc_a(), &item("261-0020", "10")),
            item_row(blank_header(), &item("261-0030", "2.5")),
        ]);

        let documents = reconstruct(&sheet).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].items.len(), 2);
        assert_eq!(documents[0].items[0].ppd_type_code, "2610020");
        assert_eq!(documents[0].items[1].ppd_type_code, "2610030");
        assert_eq!(documents[0].items[1].amount, "2.5");
    }

    #[test]
    fn test_consecutive_identical_headers_merge() {
        let sheet = sheet_with(vec![
            item_row(doc_a(), &item("1", "10")),
            item_row(doc_a(), &item("2", "20")),
        ]);

        let documents = reconstruct(&sheet).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].items.len(), 2);
    }

    #[test]
    fn test_interrupted_header_starts_new_document() {
        let sheet = sheet_with(vec![
            item_row(doc_a(), &item("1", "10")),
            item_row(doc_b(), &item("2", "20")),
            item_row(doc_a(), &item("3", "30")),
        ]);

        let documents = reconstruct(&sheet).unwrap();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].key(), documents[2].key());
        assert_eq!(documents[1].counterparty_text, "Firma s.r.o.");
        let codes: Vec<&str> = documents
            .iter()
            .map(|d| d.items[0].ppd_type_code.as_str())
            .collect();
        assert_eq!(codes, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_item_before_any_header_is_dangling() {
        let sheet = sheet_with(vec![item_row(blank_header(), &item("1", "10"))]);

        match reconstruct(&sheet) {
            Err(PokladnaError::DanglingItem { row }) => assert_eq!(row, 4),
            other => panic!("Expected DanglingItem, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let sheet = sheet_with(vec![
            vec![],
            row(blank_header(), ["", "  ", "", "", ""]),
            item_row(doc_a(), &item("1", "10")),
            vec![],
            item_row(blank_header(), &item("2", "20")),
        ]);

        let documents = reconstruct(&sheet).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].items.len(), 2);
    }

    #[test]
    fn test_header_only_row_opens_document_without_items() {
        let sheet = sheet_with(vec![
            row(doc_a(), ["", "", "", "", ""]),
            item_row(blank_header(), &item("1", "10")),
            row(doc_b(), ["", "", "", "", ""]),
        ]);

        let documents = reconstruct(&sheet).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].items.len(), 1);
        assert!(documents[1].items.is_empty());
    }

    #[test]
    fn test_field_normalization() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut data = row(
            ["  P1 ", "V", "", "Nákup", ""],
            ["ABC-12", " Papier ", "", "100", "E7"],
        );
        data[2] = CellValue::DateTime(date);
        data[7] = CellValue::Number(12.0);

        let documents = reconstruct(&sheet_with(vec![data])).unwrap();
        let document = &documents[0];
        assert_eq!(document.register_code, "P1");
        assert_eq!(document.document_date, "05.01.2024");
        assert_eq!(
            document.items[0],
            Item {
                ppd_type_code: "12".to_string(),
                amount: "12".to_string(),
                note: "Papier".to_string(),
                cost_center_code: "100".to_string(),
                expense_object_code: "E7".to_string(),
            }
        );
    }

    #[test]
    fn test_counterparty_only_row_counts_as_header() {
        let sheet = sheet_with(vec![
            item_row(doc_a(), &item("1", "10")),
            item_row(["", "", "", "", "Iná firma"], &item("2", "20")),
        ]);

        let documents = reconstruct(&sheet).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].register_code, "");
        assert_eq!(documents[1].counterparty_text, "Iná firma");
    }

    #[test]
    fn test_missing_optional_columns_default_to_empty() {
        let rows = vec![
            [
                "Skratka pokladne",
                "Druh PD",
                "Dátum PD",
                "Účel PD",
                "Skratka typu PPD",
                "Názov",
                "Suma",
                "OŠ",
            ]
            .iter()
            .map(|s| cell(s))
            .collect(),
            ["P1", "V", "05.01.2024", "Nákup", "1", "Papier", "10", "100"]
                .iter()
                .map(|s| cell(s))
                .collect(),
        ];
        let documents = reconstruct(&Worksheet::from_rows(rows)).unwrap();
        assert_eq!(documents[0].counterparty_text, "");
        assert_eq!(documents[0].items[0].expense_object_code, "");
    }

    #[test]
    fn test_no_data_rows() {
        let documents = reconstruct(&sheet_with(vec![])).unwrap();
        assert!(documents.is_empty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// 連続する同一キーのまとまりの数
        fn run_count(keys: &[u8]) -> usize {
            keys.iter()
                .enumerate()
                .filter(|(i, k)| *i == 0 || keys[i - 1] != **k)
                .count()
        }

        proptest! {
            #[test]
            fn test_document_count_equals_runs_of_identical_headers(
                keys in prop::collection::vec(0u8..3, 0..40)
            ) {
                let data: Vec<Vec<CellValue>> = keys
                    .iter()
                    .map(|k| {
                        let register = format!("P{}", k);
                        row(
                            [register.as_str(), "V", "05.01.2024", "Nákup", ""],
                            ["1", "Papier", "10", "100", ""],
                        )
                    })
                    .collect();

                let documents = reconstruct(&sheet_with(data)).unwrap();
                prop_assert_eq!(documents.len(), run_count(&keys));
                let items: usize = documents.iter().map(|d| d.items.len()).sum();
                prop_assert_eq!(items, keys.len());
            }

            #[test]
            fn test_item_only_rows_append_in_order(count in 1usize..20) {
                let mut data = vec![row(doc_a(), ["", "", "", "", ""])];
                for i in 0..count {
                    let amount = i.to_string();
                    data.push(row(blank_header(), ["1", "Papier", amount.as_str(), "", ""]));
                }

                let documents = reconstruct(&sheet_with(data)).unwrap();
                prop_assert_eq!(documents.len(), 1);
                let amounts: Vec<String> = documents[0].items.iter().map(|i| i.amount.clone()).collect();
                let expected: Vec<String> = (0..count).map(|i| i.to_string()).collect();
                prop_assert_eq!(amounts, expected);
            }
        }
    }
}
