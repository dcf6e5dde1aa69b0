//! # アプリケーション状態
//!
//! ルーター全体で共有する依存コンポーネント。
//!
//! 認可ゲート（[`crate::auth::CurrentUser`]）が `FromRequestParts` で
//! この型を参照するため、ルーターは単一の State を共有する。

use std::sync::Arc;

use shohyo_infra::repository::UserRepository;

use crate::usecase::{BookUseCaseImpl, ReviewUseCaseImpl};

/// ルーター全体で共有するアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub book_usecase:    Arc<BookUseCaseImpl>,
    pub review_usecase:  Arc<ReviewUseCaseImpl>,
    /// 認可ゲートが Bearer トークンの `sub` をユーザー行へ解決するのに使う
    pub user_repository: Arc<dyn UserRepository>,
    /// トークン署名検証の秘密鍵
    pub jwt_secret:      String,
}
