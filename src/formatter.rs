//! Formatter Module
//!
//! セル値を正規化された文字列に変換するフィールド正規化関数を提供するモジュール。
//! すべての関数は純粋かつ全域的で、どのセル値に対してもエラーを返しません。

use crate::types::CellValue;

/// 伝票日付の出力形式（dd.mm.yyyy）
const DOCUMENT_DATE_FORMAT: &str = "%d.%m.%Y";

/// 日時セルを文字列として扱う場合の形式
const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 整数として出力する数値の上限（f64で正確に表現できる範囲）
const MAX_EXACT_INTEGER: f64 = 1e15;

/// これより絶対値の小さい非整数は指数表記で出力（`1e-05`）
const SCIENTIFIC_THRESHOLD: f64 = 1e-4;

/// セル値をトリム済みの文字列に変換する
///
/// # 変換規則
///
/// - 空セル: `""`
/// - 文字列: 前後の空白を除去
/// - 数値: [`to_numeric_text`]と同じ規則（整数値は小数点なし）
/// - 論理値: `True` / `False`
/// - 日時: `yyyy-mm-dd HH:MM:SS`
/// - エラー値: エラーコード（例: `#DIV/0!`）
pub fn to_text(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::String(s) => s.trim().to_string(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        CellValue::DateTime(dt) => dt.format(DATETIME_TEXT_FORMAT).to_string(),
        CellValue::Error(e) => e.trim().to_string(),
    }
}

/// セル値を金額などの数値文字列に変換する
///
/// 整数値の数値は小数点・末尾のゼロなしで出力し（`5.0` → `"5"`）、
/// それ以外の数値は自然な10進表記で出力します（`5.5` → `"5.5"`）。
/// 数値以外の値はトリム済みの文字列になります。
pub fn to_numeric_text(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format_number(*n),
        other => to_text(other),
    }
}

/// セル値から数字以外の文字をすべて取り除く
///
/// PPD種別コードの正規化に使用します（`"261-0020"` → `"2610020"`）。
pub fn normalize_code(value: &CellValue) -> String {
    to_text(value)
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// セル値を伝票日付の文字列に変換する
///
/// 日付・日時セルはゼロ埋めの`dd.mm.yyyy`形式に変換します。
/// それ以外（文字列として入力された日付など）はトリム済みの文字列をそのまま返します。
pub fn format_date(value: &CellValue) -> String {
    match value {
        CellValue::DateTime(dt) => dt.format(DOCUMENT_DATE_FORMAT).to_string(),
        other => to_text(other),
    }
}

/// 数値を正規の文字列表現に変換する
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        // -0.0も"0"として出力
        format!("{}", n as i64)
    } else if n.is_finite() && n != 0.0 && n.abs() < SCIENTIFIC_THRESHOLD {
        format_scientific(n)
    } else {
        n.to_string()
    }
}

/// 最短表現の仮数部と、符号付き2桁以上の指数部で出力する（`1.5e-07`）
fn format_scientific(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}
