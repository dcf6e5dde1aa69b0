//! # エラーレスポンスボディ
//!
//! 全エンドポイント共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - 通常のエラーは `{ "message": "..." }` 形式
//! - フィールド単位のバリデーション失敗は
//!   `{ "errors": [{ "field": "...", "message": "..." }] }` 形式で、
//!   違反したすべてのフィールドを列挙する
//! - `ErrorBody` / `ValidationBody` は純粋なデータ構造（`Serialize` /
//!   `Deserialize` のみ）。axum の `IntoResponse` 変換は api クレートの責務

use serde::{Deserialize, Serialize};

/// 単一メッセージのエラーボディ
///
/// 404 / 403 / 401 / 500 など、フィールドに紐付かないエラーで使用する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// フィールド単位のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// 違反したフィールド名（リクエストボディのキー）
    pub field:   String,
    /// 人間可読なエラーメッセージ
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field:   field.into(),
            message: message.into(),
        }
    }
}

/// バリデーション失敗のエラーボディ
///
/// 違反したフィールドをすべて含む（最初の 1 件だけではない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationBody {
    pub errors: Vec<FieldError>,
}

impl ValidationBody {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}
