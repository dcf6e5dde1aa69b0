//! # 書籍
//!
//! 書評プラットフォームの書籍エンティティと、一覧取得クエリの値オブジェクト。
//!
//! ## 不変条件
//!
//! - `title` / `author` / `genre` は空文字列ではない（前後の空白は除去）
//! - `description` は 10 文字以上
//! - `year` は 1000 以上、現在年 + 2 以下
//! - `added_by` は作成時に確定し、以後変更されない
//!
//! ## 部分更新
//!
//! 更新は [`BookPatch`] による明示的なパッチで表現する。
//! 各フィールドは `Some(値)` = 更新、`None` = 現状維持。
//! `Some("")` のような空値は「維持」ではなくバリデーションエラーになる
//! （truthiness による暗黙のスキップは行わない）。

use chrono::{DateTime, Datelike, Utc};

use crate::{DomainError, FieldViolation, user::UserId};

define_uuid_id! {
    /// 書籍の一意識別子
    pub struct BookId;
}

/// 一覧の固定ページサイズ
pub const PAGE_SIZE: u32 = 5;

/// 説明文の最小文字数
pub const MIN_DESCRIPTION_LENGTH: usize = 10;

/// 出版年の下限
pub const MIN_YEAR: i32 = 1000;

/// 出版年の上限マージン（現在年 + この値まで許容）
pub const YEAR_FUTURE_MARGIN: i32 = 2;

// =========================================================================
// Book（書籍エンティティ）
// =========================================================================

/// 書籍の新規作成入力
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title:       String,
    pub author:      String,
    pub description: String,
    pub genre:       String,
    pub year:        i32,
}

/// 書籍の部分更新パッチ
///
/// `None` のフィールドは現状維持。`Some` のフィールドは
/// 新規作成と同じルールでバリデーションされる。
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title:       Option<String>,
    pub author:      Option<String>,
    pub description: Option<String>,
    pub genre:       Option<String>,
    pub year:        Option<i32>,
}

/// 書籍エンティティ
///
/// `average_rating` などの派生値は保持しない。レビューとの結合は
/// クエリ時にユースケース層が明示的に行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id:          BookId,
    title:       String,
    author:      String,
    description: String,
    genre:       String,
    year:        i32,
    added_by:    UserId,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl Book {
    /// 新しい書籍を作成する
    ///
    /// `added_by` は呼び出し側（ユースケース層）が認証済みユーザーの ID を
    /// 渡す。クライアント入力から所有者を受け取ることはない。
    /// バリデーション違反はすべて収集して一度に返す。
    pub fn new(
        id: BookId,
        input: NewBook,
        added_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = input.title.trim().to_string();
        let author = input.author.trim().to_string();
        let description = input.description.trim().to_string();
        let genre = input.genre.trim().to_string();

        let violations = validate_fields(&title, &author, &description, &genre, input.year, now);
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        Ok(Self {
            id,
            title,
            author,
            description,
            genre,
            year: input.year,
            added_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// データベースから書籍を復元する
    #[allow(clippy::too_many_arguments)]
    pub fn from_db(
        id: BookId,
        title: String,
        author: String,
        description: String,
        genre: String,
        year: i32,
        added_by: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            description,
            genre,
            year,
            added_by,
            created_at,
            updated_at,
        }
    }

    /// パッチを適用した新しい書籍を返す
    ///
    /// 指定されたフィールドのみ差し替え、`updated_at` を更新する。
    /// `id` / `added_by` / `created_at` は変更不可。
    pub fn apply_patch(self, patch: BookPatch, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let title = match patch.title {
            Some(t) => t.trim().to_string(),
            None => self.title,
        };
        let author = match patch.author {
            Some(a) => a.trim().to_string(),
            None => self.author,
        };
        let description = match patch.description {
            Some(d) => d.trim().to_string(),
            None => self.description,
        };
        let genre = match patch.genre {
            Some(g) => g.trim().to_string(),
            None => self.genre,
        };
        let year = patch.year.unwrap_or(self.year);

        let violations = validate_fields(&title, &author, &description, &genre, year, now);
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        Ok(Self {
            id: self.id,
            title,
            author,
            description,
            genre,
            year,
            added_by: self.added_by,
            created_at: self.created_at,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn added_by(&self) -> &UserId {
        &self.added_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// 書籍フィールドのバリデーション
///
/// 新規作成とパッチ適用の双方から呼ばれる。違反は打ち切らず全件収集する。
fn validate_fields(
    title: &str,
    author: &str,
    description: &str,
    genre: &str,
    year: i32,
    now: DateTime<Utc>,
) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if title.is_empty() {
        violations.push(FieldViolation::new("title", "タイトルは必須です"));
    }
    if author.is_empty() {
        violations.push(FieldViolation::new("author", "著者は必須です"));
    }
    if description.chars().count() < MIN_DESCRIPTION_LENGTH {
        violations.push(FieldViolation::new(
            "description",
            format!("説明は {MIN_DESCRIPTION_LENGTH} 文字以上で入力してください"),
        ));
    }
    if genre.is_empty() {
        violations.push(FieldViolation::new("genre", "ジャンルは必須です"));
    }
    let max_year = now.year() + YEAR_FUTURE_MARGIN;
    if year < MIN_YEAR || year > max_year {
        violations.push(FieldViolation::new(
            "year",
            format!("出版年は {MIN_YEAR} 〜 {max_year} の範囲で入力してください"),
        ));
    }

    violations
}

// =========================================================================
// BookQuery（一覧取得クエリ）
// =========================================================================

/// 一覧のソートキー
///
/// クライアント入力はこのホワイトリストに限定され、
/// 未知の値はデフォルト（`CreatedAt`）にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSortKey {
    Title,
    Author,
    Genre,
    Year,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl BookSortKey {
    /// クエリパラメータの値（camelCase）をパースする
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "genre" => Some(Self::Genre),
            "year" => Some(Self::Year),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// 対応するカラム名
    pub fn column(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::Year => "year",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// ソート順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// クエリパラメータの値をパースする
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// 書籍一覧のクエリ条件
///
/// - `search`: title / author / description への大文字小文字を無視した
///   部分一致（OR）
/// - `genre`: genre への大文字小文字を無視した部分一致
/// - 両方指定時は AND で結合
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    /// 1 始まりのページ番号
    pub page:       u32,
    pub search:     Option<String>,
    pub genre:      Option<String>,
    pub sort_by:    BookSortKey,
    pub sort_order: SortOrder,
}

impl BookQuery {
    /// SQL の OFFSET 値（`(page - 1) × PAGE_SIZE`）
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(PAGE_SIZE)
    }
}
