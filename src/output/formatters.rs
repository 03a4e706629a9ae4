//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use encoding_rs::WINDOWS_1250;
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Display;
use std::io::Write;

use crate::error::PokladnaError;
use crate::model::{Document, Item};

/// XML宣言に記載するエンコーディング名
pub const XML_ENCODING: &str = "windows-1250";

/// マンダントIDのデフォルト値
pub const DEFAULT_MANDANT_ID: &str = "1";

const ROOT_ELEMENT: &str = "pokladnicne_doklady";
const MANDANT_ELEMENT: &str = "mandant";
const DOCUMENT_ELEMENT: &str = "pokladnicny_doklad";
const ITEM_ELEMENT: &str = "polozka_pd";

/// インデント幅（スペース数）
const INDENT_SIZE: usize = 2;

/// 会計システム取り込み用XMLのフォーマッター
///
/// 属性のみを持つ要素ツリーを2スペースのインデントで出力し、
/// 宣言を含むバイト列全体をwindows-1250でエンコードします。
/// windows-1250で表現できない文字は数値文字参照（`&#NNNN;`）に置き換えます。
pub struct XmlFormatter;

impl XmlFormatter {
    pub fn render<W: Write>(
        &self,
        documents: &[Document],
        mandant_id: &str,
        writer: &mut W,
    ) -> Result<(), PokladnaError> {
        let bytes = documents_to_xml(documents, mandant_id)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// 伝票リストをwindows-1250エンコードのXMLバイト列に変換する
///
/// # 出力例
///
/// ```xml
/// <?xml version="1.0" encoding="windows-1250" standalone="yes"?>
/// <pokladnicne_doklady>
///   <mandant mandant_id="1" />
///   <pokladnicny_doklad skratka_pk="P1" druh_pd="V" datum_pd="05.01.2024" ucel_pd="Nákup" komu_od="">
///     <polozka_pd skratka_typu_ppd="2610020" suma_ppd="10" poznamka_ppd="Papier" skratka_os="100" />
///   </pokladnicny_doklad>
/// </pokladnicne_doklady>
/// ```
///
/// 伝票の属性は空でも常に出力し、明細の属性は空でない場合のみ出力します。
pub fn documents_to_xml(documents: &[Document], mandant_id: &str) -> Result<Vec<u8>, PokladnaError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some(XML_ENCODING), Some("yes"))))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
        .map_err(xml_error)?;

    let mut mandant = BytesStart::new(MANDANT_ELEMENT);
    push_escaped(&mut mandant, "mandant_id", mandant_id);
    writer
        .write_event(Event::Empty(self_closing(&mandant)?))
        .map_err(xml_error)?;

    for document in documents {
        write_document(&mut writer, document)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(xml_error)?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');

    let xml = String::from_utf8(xml).map_err(|e| PokladnaError::Xml(e.to_string()))?;
    let (encoded, _, unmappable) = WINDOWS_1250.encode(&xml);
    if unmappable {
        log::debug!("characters outside {} written as numeric character references", XML_ENCODING);
    }
    Ok(encoded.into_owned())
}

fn write_document(writer: &mut Writer<Vec<u8>>, document: &Document) -> Result<(), PokladnaError> {
    let mut element = BytesStart::new(DOCUMENT_ELEMENT);
    push_escaped(&mut element, "skratka_pk", &document.register_code);
    push_escaped(&mut element, "druh_pd", &document.document_kind);
    push_escaped(&mut element, "datum_pd", &document.document_date);
    push_escaped(&mut element, "ucel_pd", &document.purpose_text);
    push_escaped(&mut element, "komu_od", &document.counterparty_text);

    if document.items.is_empty() {
        writer
            .write_event(Event::Empty(self_closing(&element)?))
            .map_err(xml_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(element)).map_err(xml_error)?;
    for item in &document.items {
        writer
            .write_event(Event::Empty(self_closing(&item_element(item))?))
            .map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(DOCUMENT_ELEMENT)))
        .map_err(xml_error)?;
    Ok(())
}

fn item_element(item: &Item) -> BytesStart<'_> {
    let mut element = BytesStart::new(ITEM_ELEMENT);
    let attributes = [
        ("skratka_typu_ppd", &item.ppd_type_code),
        ("suma_ppd", &item.amount),
        ("poznamka_ppd", &item.note),
        ("skratka_os", &item.cost_center_code),
        ("skratka_eo", &item.expense_object_code),
    ];
    for (name, value) in attributes {
        // 空の属性は出力しない
        if !value.is_empty() {
            push_escaped(&mut element, name, value);
        }
    }
    element
}

/// 属性値をエスケープして追加する
///
/// `< > & "`に加え、改行・復帰・タブも文字参照（`&#10;` `&#13;` `&#09;`）にします。
fn push_escaped(element: &mut BytesStart<'_>, name: &str, value: &str) {
    let escaped = escape_attribute(value);
    element.push_attribute(Attribute {
        key: QName(name.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    });
}

fn escape_attribute(value: &str) -> String {
    let escaped = partial_escape(value);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#09;"),
            other => out.push(other),
        }
    }
    out
}

/// 空要素を`<name attr="..." />`の形で書き出すため、末尾に空白を付けた要素を返す
fn self_closing(element: &BytesStart<'_>) -> Result<BytesStart<'static>, PokladnaError> {
    let name_len = element.name().as_ref().len();
    let mut content = std::str::from_utf8(element).map_err(xml_error)?.to_string();
    content.push(' ');
    Ok(BytesStart::from_content(content, name_len))
}

fn xml_error<E: Display>(error: E) -> PokladnaError {
    PokladnaError::Xml(error.to_string())
}

/// JSONプレビュー用の出力構造
#[derive(Serialize)]
struct JsonExport<'a> {
    mandant_id: &'a str,
    documents: &'a [Document],
}

/// JSON形式のフォーマッター（UTF-8）
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(
        &self,
        documents: &[Document],
        mandant_id: &str,
        writer: &mut W,
    ) -> Result<(), PokladnaError> {
        let export = JsonExport {
            mandant_id,
            documents,
        };
        serde_json::to_writer_pretty(&mut *writer, &export)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
