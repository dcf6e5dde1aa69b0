//! # UserRepository
//!
//! ユーザー情報の読み取りを担当するリポジトリ。
//!
//! アカウントの発行・更新は外部コラボレータの責務のため、
//! このリポジトリは認可ゲートのユーザー解決に必要な読み取りのみ提供する。

use async_trait::async_trait;
use shohyo_domain::user::{User, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ID でユーザーを検索する
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id:    Uuid,
    name:  String,
    email: String,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, name, email FROM users WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| User::from_db(UserId::from_uuid(r.id), r.name, r.email)))
    }
}
