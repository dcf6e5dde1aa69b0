//! # 書評プラットフォーム API
//!
//! 書籍とレビューの REST API を提供する axum アプリケーション。
//!
//! ## 構成
//!
//! - [`config`]: 環境変数からの設定読み込み
//! - [`auth`]: Bearer トークンの認可ゲート
//! - [`usecase`]: ビジネスロジック
//! - [`handler`]: HTTP ハンドラと DTO
//! - [`error`]: エラーから HTTP レスポンスへの変換

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod state;
pub mod usecase;

#[cfg(test)]
mod test_support;

use axum::{
    Router,
    routing::{get, put},
};
use handler::{
    create_book,
    create_review,
    delete_book,
    delete_review,
    get_book,
    health_check,
    list_book_reviews,
    list_books,
    list_my_reviews,
    update_book,
    update_review,
};
use state::AppState;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// ルーターを構築する
///
/// 一覧・詳細・書籍別レビューは認証不要。それ以外の操作はハンドラの
/// [`auth::CurrentUser`] エクストラクタが認証を要求する。
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route(
            "/reviews/book/{book_id}",
            get(list_book_reviews).post(create_review),
        )
        .route("/reviews/user", get(list_my_reviews))
        .route("/reviews/{id}", put(update_review).delete(delete_review))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
