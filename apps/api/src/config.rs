//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//!
//! `JWT_SECRET` と `DATABASE_URL` にはフォールバック値を持たせない。
//! 設定漏れのまま起動してデフォルトの秘密鍵で署名検証してしまうことを
//! 防ぐため、欠落時は起動そのものを失敗させる。

use std::env;

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// データベース接続 URL
    pub database_url: String,
    /// Bearer トークンの署名検証に使う秘密鍵
    pub jwt_secret: String,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    ///
    /// 必須変数（`PORT`, `DATABASE_URL`, `JWT_SECRET`）の欠落は
    /// panic で即座に起動を失敗させる。
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .expect("PORT が設定されていません")
                .parse()
                .expect("PORT は有効なポート番号である必要があります"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL が設定されていません"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET が設定されていません"),
        }
    }
}
