//! # ユーザー
//!
//! 認可ゲートが Bearer トークンから解決するユーザー識別情報。
//!
//! アカウントの発行・認証情報の管理は外部コラボレータの責務であり、
//! このドメインではユーザーは読み取り専用の参照データとして扱う。
//! 書籍の所有者表示（name / email）とレビューの投稿者表示（name）に使う。

define_uuid_id! {
    /// ユーザーの一意識別子
    pub struct UserId;
}

/// ユーザー（読み取り専用の参照データ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:    UserId,
    name:  String,
    email: String,
}

impl User {
    /// データベースからユーザーを復元する
    pub fn from_db(id: UserId, name: String, email: String) -> Self {
        Self { id, name, email }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
