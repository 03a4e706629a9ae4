//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use crate::api::OutputFormat;
use crate::error::PokladnaError;
use crate::model::Document;
use std::io::Write;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormatter {
    Xml,
    Json,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xml => OutputFormatter::Xml,
            OutputFormat::Json => OutputFormatter::Json,
        }
    }

    /// 伝票リストを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `documents` - 出力する伝票リスト
    /// * `mandant_id` - マンダントID
    /// * `writer` - 出力先のライター
    pub fn render<W: Write>(
        &self,
        documents: &[Document],
        mandant_id: &str,
        writer: &mut W,
    ) -> Result<(), PokladnaError> {
        match self {
            OutputFormatter::Xml => XmlFormatter.render(documents, mandant_id, writer),
            OutputFormatter::Json => JsonFormatter.render(documents, mandant_id, writer),
        }
    }
}
