//! # ユースケース
//!
//! ハンドラとリポジトリの間でビジネスロジックを実行する層。
//!
//! ## 設計方針
//!
//! - リポジトリは `Arc<dyn Trait>` で受け取る（テストではインメモリ実装に
//!   差し替え）
//! - 所有者チェックは `domain::policy::ensure_owner` に集約
//! - 時刻は `Clock` 経由で取得し、テストで固定可能にする

pub mod book;
pub mod review;

pub use book::{BookDetail, BookUseCaseImpl};
pub use review::ReviewUseCaseImpl;
