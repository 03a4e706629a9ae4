//! Security Module
//!
//! 入力ファイルに対するセキュリティ制限を実装するモジュール。
//! ワークシート全体をメモリに展開するため、入力サイズに上限を設けます。

use crate::error::PokladnaError;

/// セキュリティ設定
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 読み込んだ入力サイズを検証する
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 上限以内の場合
    /// * `Err(PokladnaError::SecurityViolation)` - 上限を超えた場合
    pub fn check_input_size(&self, bytes_read: u64) -> Result<(), PokladnaError> {
        if bytes_read > self.max_input_file_size {
            return Err(PokladnaError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, self.max_input_file_size
            )));
        }
        Ok(())
    }
}
