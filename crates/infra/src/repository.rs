//! # リポジトリ実装
//!
//! ユースケース層が利用するリポジトリトレイトと、その PostgreSQL 実装を
//! 提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: トレイトをここで定義し、ユースケースは `Arc<dyn Trait>`
//!   で受け取る（テストではインメモリスタブに差し替え）
//! - **明示的な結合**: 所有者名やレビュー投稿者名は SQL の JOIN で取得する。
//!   ORM の仮想フィールドのような暗黙の解決は行わない

pub mod book_repository;
pub mod review_repository;
pub mod user_repository;

pub use book_repository::{BookRepository, BookWithOwner, PostgresBookRepository};
pub use review_repository::{
    PostgresReviewRepository,
    ReviewRepository,
    ReviewWithAuthor,
    ReviewWithBook,
};
pub use user_repository::{PostgresUserRepository, UserRepository};
