//! # ReviewRepository
//!
//! レビューの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **投稿者・書籍情報の結合**: 画面表示に必要な投稿者名（`users.name`）と
//!   書籍タイトル・著者（`books`）は JOIN で取得する
//! - **重複防止は一意制約任せ**: `(book_id, user_id)` の一意制約違反を
//!   [`InfraError::unique_constraint`] 経由でユースケース層が Conflict に
//!   変換する。事前の存在チェックでは競合する二重送信を防げない

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shohyo_domain::{
    book::BookId,
    review::{Review, ReviewId},
    user::UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// 投稿者名付きのレビュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithAuthor {
    pub review:      Review,
    pub author_name: String,
}

/// 書籍情報付きのレビュー（マイレビュー一覧用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithBook {
    pub review:      Review,
    pub book_title:  String,
    pub book_author: String,
}

/// レビューリポジトリトレイト
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// 書籍のレビューを新しい順に取得する（投稿者名付き）
    async fn find_by_book(&self, book_id: &BookId) -> Result<Vec<ReviewWithAuthor>, InfraError>;

    /// ユーザーのレビューを新しい順に取得する（書籍情報付き）
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<ReviewWithBook>, InfraError>;

    /// ID でレビューを検索する
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, InfraError>;

    /// ID でレビューを投稿者名付きで検索する
    async fn find_with_author(&self, id: &ReviewId)
    -> Result<Option<ReviewWithAuthor>, InfraError>;

    /// レビューを挿入する
    ///
    /// 同一 `(book_id, user_id)` の組が既に存在する場合、一意制約違反の
    /// [`InfraError`] を返す。
    async fn insert(&self, review: &Review) -> Result<(), InfraError>;

    /// レビューを更新する
    async fn update(&self, review: &Review) -> Result<(), InfraError>;

    /// レビューを削除する
    async fn delete(&self, id: &ReviewId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の ReviewRepository
#[derive(Debug, Clone)]
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id:          Uuid,
    book_id:     Uuid,
    user_id:     Uuid,
    rating:      i32,
    review_text: String,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review::from_db(
            ReviewId::from_uuid(row.id),
            BookId::from_uuid(row.book_id),
            UserId::from_uuid(row.user_id),
            row.rating,
            row.review_text,
            row.created_at,
            row.updated_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct ReviewWithAuthorRow {
    id:          Uuid,
    book_id:     Uuid,
    user_id:     Uuid,
    rating:      i32,
    review_text: String,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
    author_name: String,
}

impl From<ReviewWithAuthorRow> for ReviewWithAuthor {
    fn from(row: ReviewWithAuthorRow) -> Self {
        let review = Review::from_db(
            ReviewId::from_uuid(row.id),
            BookId::from_uuid(row.book_id),
            UserId::from_uuid(row.user_id),
            row.rating,
            row.review_text,
            row.created_at,
            row.updated_at,
        );
        Self {
            review,
            author_name: row.author_name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewWithBookRow {
    id:          Uuid,
    book_id:     Uuid,
    user_id:     Uuid,
    rating:      i32,
    review_text: String,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
    book_title:  String,
    book_author: String,
}

impl From<ReviewWithBookRow> for ReviewWithBook {
    fn from(row: ReviewWithBookRow) -> Self {
        let review = Review::from_db(
            ReviewId::from_uuid(row.id),
            BookId::from_uuid(row.book_id),
            UserId::from_uuid(row.user_id),
            row.rating,
            row.review_text,
            row.created_at,
            row.updated_at,
        );
        Self {
            review,
            book_title: row.book_title,
            book_author: row.book_author,
        }
    }
}

const SELECT_WITH_AUTHOR: &str = "SELECT r.id, r.book_id, r.user_id, r.rating, r.review_text, \
     r.created_at, r.updated_at, u.name AS author_name \
     FROM reviews r JOIN users u ON u.id = r.user_id";

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%book_id))]
    async fn find_by_book(&self, book_id: &BookId) -> Result<Vec<ReviewWithAuthor>, InfraError> {
        let sql = format!("{SELECT_WITH_AUTHOR} WHERE r.book_id = $1 ORDER BY r.created_at DESC");
        let rows: Vec<ReviewWithAuthorRow> = sqlx::query_as(&sql)
            .bind(book_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ReviewWithAuthor::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<ReviewWithBook>, InfraError> {
        let rows: Vec<ReviewWithBookRow> = sqlx::query_as(
            "SELECT r.id, r.book_id, r.user_id, r.rating, r.review_text, \
             r.created_at, r.updated_at, \
             b.title AS book_title, b.author AS book_author \
             FROM reviews r JOIN books b ON b.id = r.book_id \
             WHERE r.user_id = $1 ORDER BY r.created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReviewWithBook::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, InfraError> {
        let row: Option<ReviewRow> = sqlx::query_as(
            "SELECT id, book_id, user_id, rating, review_text, created_at, updated_at \
             FROM reviews WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Review::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_with_author(
        &self,
        id: &ReviewId,
    ) -> Result<Option<ReviewWithAuthor>, InfraError> {
        let sql = format!("{SELECT_WITH_AUTHOR} WHERE r.id = $1");
        let row: Option<ReviewWithAuthorRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ReviewWithAuthor::from))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, review: &Review) -> Result<(), InfraError> {
        sqlx::query(
            "INSERT INTO reviews \
             (id, book_id, user_id, rating, review_text, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(review.id().as_uuid())
        .bind(review.book_id().as_uuid())
        .bind(review.user_id().as_uuid())
        .bind(review.rating())
        .bind(review.review_text())
        .bind(review.created_at())
        .bind(review.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn update(&self, review: &Review) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE reviews SET rating = $2, review_text = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(review.id().as_uuid())
        .bind(review.rating())
        .bind(review.review_text())
        .bind(review.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &ReviewId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
