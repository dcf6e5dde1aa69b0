//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保ち、ビジネスロジックはユースケース層に委譲
//! - レスポンスはすべて camelCase の JSON。成功時は `success: true` を
//!   含むエンベロープで返す

pub mod book;
pub mod health;
pub mod review;

pub use book::{create_book, delete_book, get_book, list_books, update_book};
pub use health::health_check;
pub use review::{
    create_review,
    delete_review,
    list_book_reviews,
    list_my_reviews,
    update_review,
};
