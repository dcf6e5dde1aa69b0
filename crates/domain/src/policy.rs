//! # 認可ポリシー
//!
//! 所有者チェックを一箇所に集約する。
//! 書籍（`added_by`）とレビュー（`user_id`）の双方がこの関数を通る。

use crate::{DomainError, user::UserId};

/// リソースの所有者と操作主体が一致することを確認する
///
/// 一致しない場合は [`DomainError::Forbidden`] を返す。
/// 認証済みかどうかの判定（401）は api 層の認可ゲートの責務で、
/// ここでは扱わない。
pub fn ensure_owner(owner: &UserId, actor: &UserId) -> Result<(), DomainError> {
    if owner == actor {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "このリソースを変更できるのは所有者のみです".to_string(),
        ))
    }
}
