//! # API エラー定義
//!
//! ドメイン・インフラのエラーを HTTP レスポンスへ変換する。
//!
//! ## ステータスコードの対応
//!
//! | エラー | ステータス | ボディ |
//! |--------|-----------|--------|
//! | `Validation` | 400 | `{ errors: [{field, message}] }` |
//! | `Conflict` | 400 | `{ message }` |
//! | `Unauthorized` | 401 | `{ message }` |
//! | `Forbidden` | 403 | `{ message }` |
//! | `NotFound` | 404 | `{ message }` |
//! | `Database` / `Internal` | 500 | `{ message }`（詳細はログのみ） |
//!
//! 500 系はクライアントに内部事情を漏らさない。元のエラーは
//! `tracing::error!` で記録し、ボディは汎用メッセージに固定する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shohyo_domain::{DomainError, FieldViolation};
use shohyo_infra::InfraError;
use shohyo_shared::{ErrorBody, FieldError, ValidationBody};
use thiserror::Error;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// バリデーションエラー（違反フィールドを全件保持）
    #[error("バリデーションエラー（{} 件）", .0.len())]
    Validation(Vec<FieldViolation>),

    /// 認証失敗（トークン欠落・無効・ユーザー不明）
    #[error("認証エラー: {0}")]
    Unauthorized(String),

    /// 認可失敗（所有者以外による変更・削除）
    #[error("権限がありません: {0}")]
    Forbidden(String),

    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 競合（重複レビュー）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(violations) => Self::Validation(violations),
            DomainError::NotFound { entity_type, id } => {
                Self::NotFound(format!("{entity_type} が見つかりません: {id}"))
            }
            DomainError::Conflict(msg) => Self::Conflict(msg),
            DomainError::Forbidden(msg) => Self::Forbidden(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(violations) => {
                let errors = violations
                    .into_iter()
                    .map(|v| FieldError::new(v.field, v.message))
                    .collect();
                (StatusCode::BAD_REQUEST, Json(ValidationBody::new(errors))).into_response()
            }
            Self::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(msg))).into_response()
            }
            Self::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, Json(ErrorBody::new(msg))).into_response()
            }
            Self::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody::new(msg))).into_response()
            }
            // 重複レビューは 404 系ではなく入力起因の 400 として返す
            Self::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(msg))).into_response()
            }
            Self::Database(e) => {
                tracing::error!("データベースエラー: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("内部エラーが発生しました")),
                )
                    .into_response()
            }
        }
    }
}
