//! # レビュー API ハンドラ
//!
//! 書籍別のレビュー一覧は認証不要。自分のレビュー一覧・投稿・更新・
//! 削除は認証必須で、更新・削除は投稿者本人チェックを通る。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use shohyo_domain::{book::BookId, review::ReviewId};
use shohyo_infra::repository::{ReviewWithAuthor, ReviewWithBook};
use uuid::Uuid;

use crate::{auth::CurrentUser, error::ApiError, handler::book::MessageResponse, state::AppState};

/// 投稿者の参照 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerDto {
    pub id:   String,
    pub name: String,
}

/// レビュー DTO（書籍詳細・書籍別一覧用）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id:          String,
    pub book_id:     String,
    pub user:        ReviewerDto,
    pub rating:      i32,
    pub review_text: String,
    pub created_at:  String,
    pub updated_at:  String,
}

impl ReviewDto {
    pub(crate) fn from_review(r: &ReviewWithAuthor) -> Self {
        Self {
            id:          r.review.id().to_string(),
            book_id:     r.review.book_id().to_string(),
            user:        ReviewerDto {
                id:   r.review.user_id().to_string(),
                name: r.author_name.clone(),
            },
            rating:      r.review.rating(),
            review_text: r.review.review_text().to_string(),
            created_at:  r.review.created_at().to_rfc3339(),
            updated_at:  r.review.updated_at().to_rfc3339(),
        }
    }
}

/// 書籍の参照 DTO（マイレビュー一覧用）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRefDto {
    pub id:     String,
    pub title:  String,
    pub author: String,
}

/// 書籍情報付きレビュー DTO（マイレビュー一覧用）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyReviewDto {
    pub id:          String,
    pub book:        BookRefDto,
    pub rating:      i32,
    pub review_text: String,
    pub created_at:  String,
    pub updated_at:  String,
}

impl MyReviewDto {
    fn from_review(r: &ReviewWithBook) -> Self {
        Self {
            id:          r.review.id().to_string(),
            book:        BookRefDto {
                id:     r.review.book_id().to_string(),
                title:  r.book_title.clone(),
                author: r.book_author.clone(),
            },
            rating:      r.review.rating(),
            review_text: r.review.review_text().to_string(),
            created_at:  r.review.created_at().to_rfc3339(),
            updated_at:  r.review.updated_at().to_rfc3339(),
        }
    }
}

/// レビュー投稿・更新リクエスト
///
/// 欠落フィールドはデフォルト値（0・空文字）になり、
/// ドメインのバリデーションで違反として列挙される。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(default)]
    pub rating:      i32,
    #[serde(default)]
    pub review_text: String,
}

/// レビュー一覧レスポンス
#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub success: bool,
    pub reviews: Vec<ReviewDto>,
}

/// マイレビュー一覧レスポンス
#[derive(Debug, Serialize)]
pub struct MyReviewListResponse {
    pub success: bool,
    pub reviews: Vec<MyReviewDto>,
}

/// レビュー単体レスポンス（投稿・更新）
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub review:  ReviewDto,
}

/// 書籍のレビュー一覧を取得する
///
/// ## エンドポイント
/// GET /reviews/book/{bookId}
pub async fn list_book_reviews(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let reviews = state
        .review_usecase
        .list_for_book(BookId::from_uuid(book_id))
        .await?;

    let response = ReviewListResponse {
        success: true,
        reviews: reviews.iter().map(ReviewDto::from_review).collect(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 自分のレビュー一覧を取得する
///
/// ## エンドポイント
/// GET /reviews/user（認証必須）
pub async fn list_my_reviews(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Response, ApiError> {
    let reviews = state.review_usecase.list_for_user(&actor).await?;

    let response = MyReviewListResponse {
        success: true,
        reviews: reviews.iter().map(MyReviewDto::from_review).collect(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// レビューを投稿する
///
/// ## エンドポイント
/// POST /reviews/book/{bookId}（認証必須）
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(book_id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Response, ApiError> {
    let created = state
        .review_usecase
        .add(
            BookId::from_uuid(book_id),
            request.rating,
            request.review_text,
            &actor,
        )
        .await?;

    let response = ReviewResponse {
        success: true,
        review:  ReviewDto::from_review(&created),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// レビューを更新する
///
/// ## エンドポイント
/// PUT /reviews/{id}（投稿者のみ）
pub async fn update_review(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Response, ApiError> {
    let updated = state
        .review_usecase
        .update(
            ReviewId::from_uuid(id),
            request.rating,
            request.review_text,
            &actor,
        )
        .await?;

    let response = ReviewResponse {
        success: true,
        review:  ReviewDto::from_review(&updated),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// レビューを削除する
///
/// ## エンドポイント
/// DELETE /reviews/{id}（投稿者のみ）
pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state
        .review_usecase
        .delete(ReviewId::from_uuid(id), &actor)
        .await?;

    let response = MessageResponse {
        success: true,
        message: "レビューを削除しました".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
