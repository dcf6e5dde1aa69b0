//! # 認可ゲート
//!
//! `Authorization: Bearer <JWT>` ヘッダを検証し、トークンの `sub` を
//! ユーザー行へ解決するエクストラクタ。
//!
//! トークンの **発行** はこのサービスの責務ではない（外部の認証基盤が
//! 発行する）。ここでは署名検証とユーザー解決のみ行う。
//! ヘッダ欠落・署名不正・期限切れ・未知のユーザーはすべて 401。

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use shohyo_domain::user::{User, UserId};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// JWT クレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// ユーザー ID（subject）
    pub sub: Uuid,
    /// 有効期限（unix タイムスタンプ）
    pub exp: usize,
    /// 発行時刻（unix タイムスタンプ）
    pub iat: usize,
}

/// 認証済みユーザー
///
/// ハンドラの引数に置くだけで、そのルートは認証必須になる。
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// トークンを検証してクレームを取り出す
fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| ApiError::Unauthorized(format!("トークンが無効です: {e}")))?;

    Ok(token_data.claims)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("Authorization ヘッダがありません".to_string())
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Authorization ヘッダは Bearer 形式で指定してください".to_string())
        })?;

        let claims = validate_token(token, &state.jwt_secret)?;

        let user = state
            .user_repository
            .find_by_id(&UserId::from_uuid(claims.sub))
            .await?
            .ok_or_else(|| ApiError::Unauthorized("ユーザーが見つかりません".to_string()))?;

        Ok(CurrentUser(user))
    }
}
