//! # Shohyo ドメイン層
//!
//! 書評プラットフォームのビジネスロジックの中核を担うドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）には一切依存しない。
//! 永続化はインフラ層のリポジトリトレイト実装に委譲される。
//!
//! ## モジュール構成
//!
//! - [`book`] - 書籍エンティティと一覧クエリの値オブジェクト
//! - [`review`] - レビューエンティティと評価の集計
//! - [`user`] - 認可ゲートが解決するユーザー識別情報
//! - [`policy`] - 所有者チェックの共通認可ポリシー
//! - [`clock`] - テスト可能な時刻プロバイダ
//! - [`error`] - ドメイン層で発生するエラーの定義

#[macro_use]
mod macros;

pub mod book;
pub mod clock;
pub mod error;
pub mod policy;
pub mod review;
pub mod user;

pub use error::{DomainError, FieldViolation};
