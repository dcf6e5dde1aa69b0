//! # Shohyo 共有ユーティリティ
//!
//! このクレートは、Shohyo プロジェクト全体で使用される
//! 共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, api）から依存される
//! - ビジネスロジックを含まない純粋なデータ型のみを配置
//! - axum への依存を持たない（HTTP 変換は api クレートの責務）

pub mod error_body;
pub mod observability;
pub mod pagination;

pub use error_body::{ErrorBody, FieldError, ValidationBody};
pub use pagination::Pagination;
