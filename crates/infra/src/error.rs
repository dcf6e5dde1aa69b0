//! # インフラ層エラー定義
//!
//! データベースとの通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: `sqlx::Error` をラップし、`?` で伝播可能にする
//! - **一意制約違反の識別**: 重複レビューはアプリケーション側の事前チェック
//!   ではなくデータベースの一意制約で検出する。ユースケース層が
//!   [`unique_constraint`](InfraError::unique_constraint) で制約名を調べ、
//!   ドメインの Conflict に変換する

use thiserror::Error;

/// インフラ層で発生するエラー
#[derive(Debug, Error)]
pub enum InfraError {
    /// データベースエラー
    ///
    /// SQL クエリの実行失敗、接続エラー、制約違反など。
    #[error("データベースエラー: {0}")]
    Database(#[from] sqlx::Error),

    /// マイグレーションエラー
    #[error("マイグレーションエラー: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// 一意制約違反
    ///
    /// PostgreSQL からは `Database` 経由で届くため、この variant は
    /// インメモリ実装（テスト用）が制約違反を表現するのに使う。
    #[error("一意制約違反: {constraint}")]
    UniqueViolation {
        /// 違反した制約名
        constraint: String,
    },
}

impl InfraError {
    /// 一意制約違反なら、その制約名を返す
    ///
    /// 制約違反以外のエラー（接続断など）では `None`。
    pub fn unique_constraint(&self) -> Option<&str> {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                db_err.constraint()
            }
            Self::UniqueViolation { constraint } => Some(constraint),
            _ => None,
        }
    }
}
