//! # Shohyo インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理とマイグレーション
//! - **リポジトリ実装**: リポジトリトレイトの sqlx 実装
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//! ユースケース層はリポジトリトレイト経由でこのクレートを利用するため、
//! テストではインメモリのスタブに差し替えられる。

pub mod db;
pub mod error;
pub mod repository;

pub use error::InfraError;
