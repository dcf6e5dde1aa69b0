//! # 書籍 API ハンドラ
//!
//! 一覧・詳細は認証不要。作成・更新・削除は認証必須で、
//! 更新・削除はさらに所有者チェックを通る。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use shohyo_domain::book::{BookId, BookPatch, BookQuery, BookSortKey, NewBook, SortOrder};
use shohyo_infra::repository::BookWithOwner;
use shohyo_shared::Pagination;
use uuid::Uuid;

use crate::{auth::CurrentUser, error::ApiError, handler::review::ReviewDto, state::AppState};

/// 所有者の参照 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDto {
    pub id:    String,
    pub name:  String,
    pub email: String,
}

/// 書籍 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id:          String,
    pub title:       String,
    pub author:      String,
    pub description: String,
    pub genre:       String,
    pub year:        i32,
    pub added_by:    OwnerDto,
    pub created_at:  String,
    pub updated_at:  String,
}

impl BookDto {
    fn from_book(b: &BookWithOwner) -> Self {
        Self {
            id:          b.book.id().to_string(),
            title:       b.book.title().to_string(),
            author:      b.book.author().to_string(),
            description: b.book.description().to_string(),
            genre:       b.book.genre().to_string(),
            year:        b.book.year(),
            added_by:    OwnerDto {
                id:    b.owner.id().to_string(),
                name:  b.owner.name().to_string(),
                email: b.owner.email().to_string(),
            },
            created_at:  b.book.created_at().to_rfc3339(),
            updated_at:  b.book.updated_at().to_rfc3339(),
        }
    }
}

/// 一覧クエリパラメータ
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksParams {
    pub page:       Option<u32>,
    pub search:     Option<String>,
    pub genre:      Option<String>,
    pub sort_by:    Option<String>,
    pub sort_order: Option<String>,
}

impl ListBooksParams {
    /// クエリパラメータをドメインのクエリ条件に変換する
    ///
    /// 未知の `sortBy` / `sortOrder` はエラーにせずデフォルト
    /// （作成日時の降順）にフォールバックする。
    fn into_query(self) -> BookQuery {
        BookQuery {
            page:       self.page.unwrap_or(1),
            search:     self.search,
            genre:      self.genre,
            sort_by:    self
                .sort_by
                .as_deref()
                .and_then(BookSortKey::parse)
                .unwrap_or_default(),
            sort_order: self
                .sort_order
                .as_deref()
                .and_then(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

/// 書籍作成リクエスト
///
/// 欠落フィールドはデフォルト値（空文字・0）になり、
/// ドメインのバリデーションで違反として列挙される。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[serde(default)]
    pub title:       String,
    #[serde(default)]
    pub author:      String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre:       String,
    #[serde(default)]
    pub year:        i32,
}

/// 書籍更新リクエスト（部分更新）
///
/// `null` や欠落は「現状維持」。`""` のような空値は維持ではなく
/// バリデーションエラーになる。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title:       Option<String>,
    pub author:      Option<String>,
    pub description: Option<String>,
    pub genre:       Option<String>,
    pub year:        Option<i32>,
}

/// 書籍一覧レスポンス
#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub success:    bool,
    pub books:      Vec<BookDto>,
    pub pagination: Pagination,
}

/// 書籍詳細レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailResponse {
    pub success:        bool,
    pub book:           BookDto,
    pub reviews:        Vec<ReviewDto>,
    pub average_rating: f64,
    pub total_reviews:  usize,
}

/// 書籍単体レスポンス（作成・更新）
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub success: bool,
    pub book:    BookDto,
}

/// メッセージレスポンス（削除）
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// 書籍一覧を取得する
///
/// ## エンドポイント
/// GET /books?page&search&genre&sortBy&sortOrder
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<ListBooksParams>,
) -> Result<Response, ApiError> {
    let (books, pagination) = state.book_usecase.list(params.into_query()).await?;

    let response = BookListResponse {
        success: true,
        books: books.iter().map(BookDto::from_book).collect(),
        pagination,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 書籍詳細を取得する
///
/// ## エンドポイント
/// GET /books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let detail = state.book_usecase.get(BookId::from_uuid(id)).await?;

    let response = BookDetailResponse {
        success:        true,
        book:           BookDto::from_book(&detail.book),
        reviews:        detail.reviews.iter().map(ReviewDto::from_review).collect(),
        average_rating: detail.average_rating,
        total_reviews:  detail.total_reviews,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 書籍を登録する
///
/// ## エンドポイント
/// POST /books（認証必須）
pub async fn create_book(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(request): Json<CreateBookRequest>,
) -> Result<Response, ApiError> {
    let input = NewBook {
        title:       request.title,
        author:      request.author,
        description: request.description,
        genre:       request.genre,
        year:        request.year,
    };

    let created = state.book_usecase.add(input, &actor).await?;

    let response = BookResponse {
        success: true,
        book:    BookDto::from_book(&created),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// 書籍を部分更新する
///
/// ## エンドポイント
/// PUT /books/{id}（所有者のみ）
pub async fn update_book(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookRequest>,
) -> Result<Response, ApiError> {
    let patch = BookPatch {
        title:       request.title,
        author:      request.author,
        description: request.description,
        genre:       request.genre,
        year:        request.year,
    };

    let updated = state
        .book_usecase
        .update(BookId::from_uuid(id), patch, &actor)
        .await?;

    let response = BookResponse {
        success: true,
        book:    BookDto::from_book(&updated),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 書籍を削除する
///
/// ## エンドポイント
/// DELETE /books/{id}（所有者のみ）
pub async fn delete_book(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state
        .book_usecase
        .delete(BookId::from_uuid(id), &actor)
        .await?;

    let response = MessageResponse {
        success: true,
        message: "書籍を削除しました".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
