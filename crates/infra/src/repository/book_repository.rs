//! # BookRepository
//!
//! 書籍の永続化と検索を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **動的クエリ**: 検索・ジャンル絞り込みは `QueryBuilder` で合成する。
//!   ソートカラムはドメインの [`BookSortKey`] ホワイトリスト経由でのみ
//!   埋め込まれ、クライアント入力が SQL に直接届くことはない
//! - **所有者の結合**: 一覧・単体取得とも `users` と JOIN し、
//!   所有者の name / email を一度のクエリで取得する
//! - **カスケード削除**: 書籍削除はレビュー削除と同一トランザクションで行い、
//!   孤児レビューを残さない

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shohyo_domain::{
    book::{Book, BookId, BookQuery, PAGE_SIZE, SortOrder},
    user::{User, UserId},
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::InfraError;

/// 所有者情報付きの書籍
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithOwner {
    pub book:  Book,
    pub owner: User,
}

/// 書籍リポジトリトレイト
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// クエリ条件に一致する書籍を 1 ページ分（最大 [`PAGE_SIZE`] 件）取得する
    async fn search(&self, query: &BookQuery) -> Result<Vec<BookWithOwner>, InfraError>;

    /// クエリ条件に一致する総件数を取得する
    ///
    /// ページネーションメタデータの計算に使う。[`search`](Self::search) と
    /// 同じフィルタを適用する。
    async fn count(&self, query: &BookQuery) -> Result<i64, InfraError>;

    /// ID で書籍を検索する（所有者情報なし）
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError>;

    /// ID で書籍を所有者情報付きで検索する
    async fn find_with_owner(&self, id: &BookId) -> Result<Option<BookWithOwner>, InfraError>;

    /// 書籍を挿入する
    async fn insert(&self, book: &Book) -> Result<(), InfraError>;

    /// 書籍を更新する
    async fn update(&self, book: &Book) -> Result<(), InfraError>;

    /// 書籍と、その書籍を参照するすべてのレビューを削除する
    ///
    /// レビュー削除 → 書籍削除を単一トランザクションで実行する。
    async fn delete_with_reviews(&self, id: &BookId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の BookRepository
#[derive(Debug, Clone)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `LIKE` / `ILIKE` パターンのメタ文字をエスケープする
///
/// 検索語は部分一致の「リテラル」として扱う。`%` や `_` を
/// ワイルドカードとして解釈させない。
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// 検索・ジャンル条件を WHERE 句として追加する
///
/// `search` と `count` で同一のフィルタを共有するための共通化。
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    qb.push(" WHERE TRUE");

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (b.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR b.author ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR b.description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(genre) = query.genre.as_deref().filter(|g| !g.is_empty()) {
        qb.push(" AND b.genre ILIKE ");
        qb.push_bind(format!("%{}%", escape_like(genre)));
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id:          Uuid,
    title:       String,
    author:      String,
    description: String,
    genre:       String,
    year:        i32,
    added_by:    Uuid,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book::from_db(
            BookId::from_uuid(row.id),
            row.title,
            row.author,
            row.description,
            row.genre,
            row.year,
            UserId::from_uuid(row.added_by),
            row.created_at,
            row.updated_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct BookWithOwnerRow {
    id:          Uuid,
    title:       String,
    author:      String,
    description: String,
    genre:       String,
    year:        i32,
    added_by:    Uuid,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
    owner_name:  String,
    owner_email: String,
}

impl From<BookWithOwnerRow> for BookWithOwner {
    fn from(row: BookWithOwnerRow) -> Self {
        let owner = User::from_db(
            UserId::from_uuid(row.added_by),
            row.owner_name,
            row.owner_email,
        );
        let book = Book::from_db(
            BookId::from_uuid(row.id),
            row.title,
            row.author,
            row.description,
            row.genre,
            row.year,
            UserId::from_uuid(row.added_by),
            row.created_at,
            row.updated_at,
        );
        Self { book, owner }
    }
}

const SELECT_WITH_OWNER: &str = "SELECT b.id, b.title, b.author, b.description, b.genre, \
     b.year, b.added_by, b.created_at, b.updated_at, \
     u.name AS owner_name, u.email AS owner_email \
     FROM books b JOIN users u ON u.id = b.added_by";

#[async_trait]
impl BookRepository for PostgresBookRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn search(&self, query: &BookQuery) -> Result<Vec<BookWithOwner>, InfraError> {
        let mut qb = QueryBuilder::new(SELECT_WITH_OWNER);
        push_filters(&mut qb, query);

        // カラム名はホワイトリスト由来の &'static str のみ
        qb.push(" ORDER BY b.");
        qb.push(query.sort_by.column());
        qb.push(match query.sort_order {
            SortOrder::Asc => " ASC",
            SortOrder::Desc => " DESC",
        });
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(PAGE_SIZE));
        qb.push(" OFFSET ");
        qb.push_bind(query.offset());

        let rows: Vec<BookWithOwnerRow> =
            qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(BookWithOwner::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn count(&self, query: &BookQuery) -> Result<i64, InfraError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM books b");
        push_filters(&mut qb, query);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(count)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError> {
        let row: Option<BookRow> = sqlx::query_as(
            "SELECT id, title, author, description, genre, year, added_by, \
             created_at, updated_at FROM books WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_with_owner(&self, id: &BookId) -> Result<Option<BookWithOwner>, InfraError> {
        let sql = format!("{SELECT_WITH_OWNER} WHERE b.id = $1");
        let row: Option<BookWithOwnerRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BookWithOwner::from))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, book: &Book) -> Result<(), InfraError> {
        sqlx::query(
            "INSERT INTO books \
             (id, title, author, description, genre, year, added_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(book.id().as_uuid())
        .bind(book.title())
        .bind(book.author())
        .bind(book.description())
        .bind(book.genre())
        .bind(book.year())
        .bind(book.added_by().as_uuid())
        .bind(book.created_at())
        .bind(book.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn update(&self, book: &Book) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE books SET title = $2, author = $3, description = $4, genre = $5, \
             year = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(book.id().as_uuid())
        .bind(book.title())
        .bind(book.author())
        .bind(book.description())
        .bind(book.genre())
        .bind(book.year())
        .bind(book.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete_with_reviews(&self, id: &BookId) -> Result<(), InfraError> {
        let mut tx = self.pool.begin().await?;

        // 孤児レビューを残さないため、レビュー → 書籍の順で削除する
        sqlx::query("DELETE FROM reviews WHERE book_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
