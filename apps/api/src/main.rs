//! # API サーバー
//!
//! 書評プラットフォームの REST API サーバー。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `JWT_SECRET` | **Yes** | トークン署名検証の秘密鍵 |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! `JWT_SECRET` にフォールバック値はない。未設定なら起動に失敗する。
//!
//! ## 起動方法
//!
//! ```bash
//! PORT=3000 DATABASE_URL=postgres://... JWT_SECRET=... cargo run -p shohyo-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use shohyo_api::{
    config::ApiConfig,
    state::AppState,
    usecase::{BookUseCaseImpl, ReviewUseCaseImpl},
};
use shohyo_domain::clock::SystemClock;
use shohyo_infra::{
    db,
    repository::{PostgresBookRepository, PostgresReviewRepository, PostgresUserRepository},
};
use shohyo_shared::observability::{LogFormat, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(LogFormat::from_env());

    let config = ApiConfig::from_env();

    tracing::info!("API サーバーを起動します: {}:{}", config.host, config.port);

    // データベース接続とマイグレーション
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    db::run_migrations(&pool)
        .await
        .expect("マイグレーションに失敗しました");
    tracing::info!("データベースに接続しました");

    // 依存コンポーネントを初期化
    let book_repo = Arc::new(PostgresBookRepository::new(pool.clone()));
    let review_repo = Arc::new(PostgresReviewRepository::new(pool.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let clock = Arc::new(SystemClock);

    let state = AppState {
        book_usecase:    Arc::new(BookUseCaseImpl::new(
            book_repo.clone(),
            review_repo.clone(),
            clock.clone(),
        )),
        review_usecase:  Arc::new(ReviewUseCaseImpl::new(review_repo, book_repo, clock)),
        user_repository: user_repo,
        jwt_secret:      config.jwt_secret.clone(),
    };

    let app = shohyo_api::app(state);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
