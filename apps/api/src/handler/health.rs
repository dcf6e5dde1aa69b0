//! # ヘルスチェックハンドラ

use axum::Json;
use serde::Serialize;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: String,
}

/// ヘルスチェック
///
/// ## エンドポイント
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "書評プラットフォーム API は稼働しています".to_string(),
    })
}
