//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗（全違反フィールドを列挙） |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `Conflict` | 400 Bad Request | 重複レビュー |
//! | `Forbidden` | 403 Forbidden | 所有者以外による変更・削除 |
//!
//! 実際の HTTP レスポンスへの変換は api クレートの責務。

use thiserror::Error;

/// フィールド単位のバリデーション違反
///
/// `field` はリクエストボディのキー名（camelCase）をそのまま使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field:   &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// ドメイン層で発生するエラー
///
/// ビジネスロジックの実行中に発生する例外状態を表現する。
/// api 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 違反したフィールドを **すべて** 保持する。
    /// 最初の違反で打ち切らないことで、クライアントは一度の送信で
    /// 全指摘を受け取れる。
    #[error("バリデーションエラー（{} 件）", .0.len())]
    Validation(Vec<FieldViolation>),

    /// エンティティが見つからない
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類（"Book", "Review" など）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 競合エラー（重複レビューなど）
    ///
    /// 一意制約違反として表面化した二重送信もここに変換される。
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// 権限エラー
    ///
    /// 認証（401）ではなく認可（403）の失敗。ユーザーは特定できたが、
    /// 対象リソースの所有者ではない。
    #[error("権限がありません: {0}")]
    Forbidden(String),
}
