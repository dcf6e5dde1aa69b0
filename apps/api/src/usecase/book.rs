//! # 書籍ユースケース
//!
//! 書籍の一覧・詳細・作成・更新・削除のビジネスロジック。

use std::sync::Arc;

use shohyo_domain::{
    DomainError,
    book::{Book, BookId, BookQuery, NewBook, PAGE_SIZE, BookPatch},
    clock::Clock,
    policy::ensure_owner,
    review::average_rating,
    user::User,
};
use shohyo_infra::repository::{BookRepository, BookWithOwner, ReviewRepository, ReviewWithAuthor};
use shohyo_shared::Pagination;

use crate::error::ApiError;

/// 書籍詳細: 書籍 + 全レビュー + 評価の集計
pub struct BookDetail {
    pub book:           BookWithOwner,
    pub reviews:        Vec<ReviewWithAuthor>,
    pub average_rating: f64,
    pub total_reviews:  usize,
}

/// 書籍ユースケース実装
pub struct BookUseCaseImpl {
    book_repo:   Arc<dyn BookRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    clock:       Arc<dyn Clock>,
}

impl BookUseCaseImpl {
    pub fn new(
        book_repo: Arc<dyn BookRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            book_repo,
            review_repo,
            clock,
        }
    }

    /// 書籍の一覧を取得する
    ///
    /// 検索・絞り込み条件に一致する 1 ページ分（最大 [`PAGE_SIZE`] 件）と
    /// ページネーションメタデータを返す。ページ番号 0 は 1 として扱う。
    pub async fn list(
        &self,
        mut query: BookQuery,
    ) -> Result<(Vec<BookWithOwner>, Pagination), ApiError> {
        query.page = query.page.max(1);

        let books = self.book_repo.search(&query).await?;
        let total = self.book_repo.count(&query).await?;
        let pagination = Pagination::build(query.page, total as u64, u64::from(PAGE_SIZE));

        Ok((books, pagination))
    }

    /// 書籍の詳細を取得する
    ///
    /// 所有者情報・全レビュー（新しい順、投稿者名付き）・評価の平均
    /// （小数第 1 位に丸め、レビュー 0 件なら 0.0）を結合して返す。
    pub async fn get(&self, id: BookId) -> Result<BookDetail, ApiError> {
        let book = self
            .book_repo
            .find_with_owner(&id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Book",
                id:          id.to_string(),
            })?;

        let reviews = self.review_repo.find_by_book(&id).await?;
        let ratings: Vec<i32> = reviews.iter().map(|r| r.review.rating()).collect();

        Ok(BookDetail {
            average_rating: average_rating(&ratings),
            total_reviews: reviews.len(),
            book,
            reviews,
        })
    }

    /// 書籍を登録する
    ///
    /// 所有者（`added_by`）はクライアント入力ではなく認証済みユーザーで
    /// 無条件に確定する。
    pub async fn add(&self, input: NewBook, actor: &User) -> Result<BookWithOwner, ApiError> {
        let book = Book::new(BookId::new(), input, *actor.id(), self.clock.now())?;
        self.book_repo.insert(&book).await?;

        Ok(BookWithOwner {
            book,
            owner: actor.clone(),
        })
    }

    /// 書籍を部分更新する
    ///
    /// 所有者のみ実行可能。パッチで指定されたフィールドだけ差し替え、
    /// 新規作成と同じルールで再バリデーションする。
    pub async fn update(
        &self,
        id: BookId,
        patch: BookPatch,
        actor: &User,
    ) -> Result<BookWithOwner, ApiError> {
        let book = self
            .book_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Book",
                id:          id.to_string(),
            })?;

        ensure_owner(book.added_by(), actor.id())?;

        let updated = book.apply_patch(patch, self.clock.now())?;
        self.book_repo.update(&updated).await?;

        Ok(BookWithOwner {
            book:  updated,
            owner: actor.clone(),
        })
    }

    /// 書籍を削除する
    ///
    /// 所有者のみ実行可能。書籍に紐づくレビューも同一トランザクションで
    /// 削除される。
    pub async fn delete(&self, id: BookId, actor: &User) -> Result<(), ApiError> {
        let book = self
            .book_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Book",
                id:          id.to_string(),
            })?;

        ensure_owner(book.added_by(), actor.id())?;

        self.book_repo.delete_with_reviews(&id).await?;

        Ok(())
    }
}
