//! # レビュー
//!
//! 書籍に対するレビューのエンティティと評価の集計。
//!
//! ## 不変条件
//!
//! - `rating` は 1 以上 5 以下の整数
//! - `review_text` は 10 文字以上 1000 文字以下
//! - `user_id` は作成時に確定し、以後変更されない
//! - 同一ユーザーは同一書籍に 1 件しかレビューできない。この制約は
//!   データベースの一意制約 `(book_id, user_id)` が担保し、
//!   競合する二重送信も制約違反として表面化する

use chrono::{DateTime, Utc};

use crate::{DomainError, FieldViolation, book::BookId, user::UserId};

define_uuid_id! {
    /// レビューの一意識別子
    pub struct ReviewId;
}

/// 評価の下限
pub const MIN_RATING: i32 = 1;

/// 評価の上限
pub const MAX_RATING: i32 = 5;

/// レビュー本文の最小文字数
pub const MIN_REVIEW_TEXT_LENGTH: usize = 10;

/// レビュー本文の最大文字数
pub const MAX_REVIEW_TEXT_LENGTH: usize = 1000;

/// レビューエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id:          ReviewId,
    book_id:     BookId,
    user_id:     UserId,
    rating:      i32,
    review_text: String,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl Review {
    /// 新しいレビューを作成する
    ///
    /// `user_id` は認証済みユーザーの ID をユースケース層が渡す。
    /// バリデーション違反は rating / reviewText とも収集して一度に返す。
    pub fn new(
        id: ReviewId,
        book_id: BookId,
        user_id: UserId,
        rating: i32,
        review_text: String,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let review_text = review_text.trim().to_string();

        let violations = validate_fields(rating, &review_text);
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        Ok(Self {
            id,
            book_id,
            user_id,
            rating,
            review_text,
            created_at: now,
            updated_at: now,
        })
    }

    /// データベースからレビューを復元する
    pub fn from_db(
        id: ReviewId,
        book_id: BookId,
        user_id: UserId,
        rating: i32,
        review_text: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            book_id,
            user_id,
            rating,
            review_text,
            created_at,
            updated_at,
        }
    }

    /// 評価と本文を書き換えた新しいレビューを返す
    ///
    /// 書籍の部分更新と異なり、レビューの更新は常に両フィールドを
    /// 上書きする（部分更新ではない）。
    pub fn revise(
        self,
        rating: i32,
        review_text: String,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let review_text = review_text.trim().to_string();

        let violations = validate_fields(rating, &review_text);
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        Ok(Self {
            rating,
            review_text,
            updated_at: now,
            ..self
        })
    }

    pub fn id(&self) -> &ReviewId {
        &self.id
    }

    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn review_text(&self) -> &str {
        &self.review_text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validate_fields(rating: i32, review_text: &str) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        violations.push(FieldViolation::new(
            "rating",
            format!("評価は {MIN_RATING} 〜 {MAX_RATING} で入力してください"),
        ));
    }

    let len = review_text.chars().count();
    if len < MIN_REVIEW_TEXT_LENGTH || len > MAX_REVIEW_TEXT_LENGTH {
        violations.push(FieldViolation::new(
            "reviewText",
            format!(
                "レビュー本文は {MIN_REVIEW_TEXT_LENGTH} 〜 {MAX_REVIEW_TEXT_LENGTH} 文字で入力してください"
            ),
        ));
    }

    violations
}

/// 評価の算術平均を小数第 1 位に丸めて返す
///
/// レビューが 0 件のときは 0.0。丸めは切り捨てではなく四捨五入
/// （`4.25 → 4.3`、`4.33… → 4.3`）。
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i32 = ratings.iter().sum();
    let mean = f64::from(sum) / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}
