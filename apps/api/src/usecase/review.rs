//! # レビューユースケース
//!
//! レビューの一覧・投稿・更新・削除のビジネスロジック。
//!
//! 重複レビューは事前チェックではなくデータベースの一意制約で検出する。
//! 事前の SELECT では同時送信の競合を防げないため、INSERT の制約違反を
//! Conflict に変換する方式を取る。

use std::sync::Arc;

use shohyo_domain::{
    DomainError,
    book::BookId,
    clock::Clock,
    policy::ensure_owner,
    review::{Review, ReviewId},
    user::User,
};
use shohyo_infra::repository::{
    BookRepository,
    ReviewRepository,
    ReviewWithAuthor,
    ReviewWithBook,
};

use crate::error::ApiError;

/// 重複レビューを検出する一意制約の名前（マイグレーションと一致させる）
const DUPLICATE_REVIEW_CONSTRAINT: &str = "reviews_book_id_user_id_key";

/// レビューユースケース実装
pub struct ReviewUseCaseImpl {
    review_repo: Arc<dyn ReviewRepository>,
    book_repo:   Arc<dyn BookRepository>,
    clock:       Arc<dyn Clock>,
}

impl ReviewUseCaseImpl {
    pub fn new(
        review_repo: Arc<dyn ReviewRepository>,
        book_repo: Arc<dyn BookRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            review_repo,
            book_repo,
            clock,
        }
    }

    /// 書籍のレビュー一覧を取得する（新しい順、投稿者名付き）
    ///
    /// 書籍が存在しない場合は NotFound。
    pub async fn list_for_book(&self, book_id: BookId) -> Result<Vec<ReviewWithAuthor>, ApiError> {
        self.book_repo
            .find_by_id(&book_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Book",
                id:          book_id.to_string(),
            })?;

        Ok(self.review_repo.find_by_book(&book_id).await?)
    }

    /// 認証済みユーザー自身のレビュー一覧を取得する（新しい順、書籍情報付き）
    pub async fn list_for_user(&self, actor: &User) -> Result<Vec<ReviewWithBook>, ApiError> {
        Ok(self.review_repo.find_by_user(actor.id()).await?)
    }

    /// レビューを投稿する
    ///
    /// 投稿者（`user_id`）は認証済みユーザーで無条件に確定する。
    /// 同一書籍への 2 件目は一意制約違反として Conflict になる。
    pub async fn add(
        &self,
        book_id: BookId,
        rating: i32,
        review_text: String,
        actor: &User,
    ) -> Result<ReviewWithAuthor, ApiError> {
        self.book_repo
            .find_by_id(&book_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Book",
                id:          book_id.to_string(),
            })?;

        let review = Review::new(
            ReviewId::new(),
            book_id,
            *actor.id(),
            rating,
            review_text,
            self.clock.now(),
        )?;

        match self.review_repo.insert(&review).await {
            Ok(()) => {}
            Err(e) if e.unique_constraint() == Some(DUPLICATE_REVIEW_CONSTRAINT) => {
                return Err(DomainError::Conflict(
                    "この書籍には既にレビューを投稿しています".to_string(),
                )
                .into());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(ReviewWithAuthor {
            review,
            author_name: actor.name().to_string(),
        })
    }

    /// レビューを更新する
    ///
    /// 投稿者本人のみ実行可能。評価・本文は常に両方上書きされる。
    pub async fn update(
        &self,
        review_id: ReviewId,
        rating: i32,
        review_text: String,
        actor: &User,
    ) -> Result<ReviewWithAuthor, ApiError> {
        let review = self
            .review_repo
            .find_by_id(&review_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Review",
                id:          review_id.to_string(),
            })?;

        ensure_owner(review.user_id(), actor.id())?;

        let revised = review.revise(rating, review_text, self.clock.now())?;
        self.review_repo.update(&revised).await?;

        Ok(ReviewWithAuthor {
            review:      revised,
            author_name: actor.name().to_string(),
        })
    }

    /// レビューを削除する
    ///
    /// 投稿者本人のみ実行可能。
    pub async fn delete(&self, review_id: ReviewId, actor: &User) -> Result<(), ApiError> {
        let review = self
            .review_repo
            .find_by_id(&review_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Review",
                id:          review_id.to_string(),
            })?;

        ensure_owner(review.user_id(), actor.id())?;

        self.review_repo.delete(&review_id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shohyo_domain::{
        book::{Book, NewBook},
        clock::FixedClock,
    };

    use super::*;
    use crate::test_support::{InMemoryStore, fixed_now};

    fn sut(store: &InMemoryStore) -> ReviewUseCaseImpl {
        ReviewUseCaseImpl::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(FixedClock::new(fixed_now())),
        )
    }

    fn seed_book(store: &InMemoryStore, owner: &User) -> Book {
        let book = Book::new(
            BookId::new(),
            NewBook {
                title:       "深い河".to_string(),
                author:      "遠藤周作".to_string(),
                description: "インドを舞台にした巡礼の物語。".to_string(),
                genre:       "文学".to_string(),
                year:        1993,
            },
            *owner.id(),
            fixed_now(),
        )
        .unwrap();
        store.seed_book(book.clone());
        book
    }

    const VALID_TEXT: &str = "静謐で重層的な物語だった。";

    // ===== add =====

    #[tokio::test]
    async fn test_add_user_idは認証済みユーザーで確定する() {
        // Arrange
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let reviewer = store.seed_user("読者", "reader@example.com");
        let book = seed_book(&store, &owner);

        // Act
        let created = sut(&store)
            .add(*book.id(), 4, VALID_TEXT.to_string(), &reviewer)
            .await
            .unwrap();

        // Assert
        assert_eq!(created.review.user_id(), reviewer.id());
        assert_eq!(created.author_name, "読者");
        assert_eq!(store.review_count(), 1);
    }

    #[tokio::test]
    async fn test_add_同じ書籍への2件目はconflict() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let reviewer = store.seed_user("読者", "reader@example.com");
        let book = seed_book(&store, &owner);

        let usecase = sut(&store);
        usecase
            .add(*book.id(), 4, VALID_TEXT.to_string(), &reviewer)
            .await
            .unwrap();

        // Act: 同一ユーザーが同一書籍に再投稿
        let result = usecase
            .add(*book.id(), 5, VALID_TEXT.to_string(), &reviewer)
            .await;

        // Assert
        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(store.review_count(), 1);
    }

    #[tokio::test]
    async fn test_add_別ユーザーなら同じ書籍に投稿できる() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let reviewer_a = store.seed_user("読者A", "a@example.com");
        let reviewer_b = store.seed_user("読者B", "b@example.com");
        let book = seed_book(&store, &owner);

        let usecase = sut(&store);
        usecase
            .add(*book.id(), 4, VALID_TEXT.to_string(), &reviewer_a)
            .await
            .unwrap();
        usecase
            .add(*book.id(), 5, VALID_TEXT.to_string(), &reviewer_b)
            .await
            .unwrap();

        assert_eq!(store.review_count(), 2);
    }

    #[tokio::test]
    async fn test_add_存在しない書籍はnot_found() {
        let store = InMemoryStore::new();
        let reviewer = store.seed_user("読者", "reader@example.com");

        let result = sut(&store)
            .add(BookId::new(), 4, VALID_TEXT.to_string(), &reviewer)
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_評価と本文の違反が同時に列挙される() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let reviewer = store.seed_user("読者", "reader@example.com");
        let book = seed_book(&store, &owner);

        let result = sut(&store)
            .add(*book.id(), 0, "短い".to_string(), &reviewer)
            .await;

        let Err(ApiError::Validation(violations)) = result else {
            panic!("expected Validation error");
        };
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["rating", "reviewText"]);
    }

    // ===== list_for_book / list_for_user =====

    #[tokio::test]
    async fn test_list_for_book_新しい順に返る() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let book = seed_book(&store, &owner);

        for i in 0..3 {
            let reviewer = store.seed_user(&format!("読者{i}"), &format!("r{i}@example.com"));
            let review = Review::new(
                ReviewId::new(),
                *book.id(),
                *reviewer.id(),
                4,
                VALID_TEXT.to_string(),
                fixed_now() + chrono::Duration::minutes(i),
            )
            .unwrap();
            ReviewRepository::insert(&store, &review).await.unwrap();
        }

        let reviews = sut(&store).list_for_book(*book.id()).await.unwrap();

        assert_eq!(reviews.len(), 3);
        assert_eq!(reviews[0].author_name, "読者2");
        assert_eq!(reviews[2].author_name, "読者0");
    }

    #[tokio::test]
    async fn test_list_for_book_存在しない書籍はnot_found() {
        let store = InMemoryStore::new();

        let result = sut(&store).list_for_book(BookId::new()).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_for_user_書籍情報が付いて自分の分だけ返る() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let me = store.seed_user("読者", "reader@example.com");
        let someone = store.seed_user("他人", "other@example.com");
        let book = seed_book(&store, &owner);

        let usecase = sut(&store);
        usecase
            .add(*book.id(), 4, VALID_TEXT.to_string(), &me)
            .await
            .unwrap();
        usecase
            .add(*book.id(), 2, VALID_TEXT.to_string(), &someone)
            .await
            .unwrap();

        let reviews = usecase.list_for_user(&me).await.unwrap();

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].book_title, "深い河");
        assert_eq!(reviews[0].book_author, "遠藤周作");
    }

    // ===== update =====

    #[tokio::test]
    async fn test_update_評価と本文が両方上書きされる() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let reviewer = store.seed_user("読者", "reader@example.com");
        let book = seed_book(&store, &owner);

        let usecase = sut(&store);
        let created = usecase
            .add(*book.id(), 2, VALID_TEXT.to_string(), &reviewer)
            .await
            .unwrap();

        let updated = usecase
            .update(
                *created.review.id(),
                5,
                "読み返すほどに発見のある傑作。".to_string(),
                &reviewer,
            )
            .await
            .unwrap();

        assert_eq!(updated.review.rating(), 5);
        assert_eq!(updated.review.review_text(), "読み返すほどに発見のある傑作。");
    }

    #[tokio::test]
    async fn test_update_投稿者以外はforbidden() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let reviewer = store.seed_user("読者", "reader@example.com");
        let other = store.seed_user("他人", "other@example.com");
        let book = seed_book(&store, &owner);

        let usecase = sut(&store);
        let created = usecase
            .add(*book.id(), 2, VALID_TEXT.to_string(), &reviewer)
            .await
            .unwrap();

        let result = usecase
            .update(*created.review.id(), 5, VALID_TEXT.to_string(), &other)
            .await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_存在しないレビューはnot_found() {
        let store = InMemoryStore::new();
        let reviewer = store.seed_user("読者", "reader@example.com");

        let result = sut(&store)
            .update(ReviewId::new(), 5, VALID_TEXT.to_string(), &reviewer)
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    // ===== delete =====

    #[tokio::test]
    async fn test_delete_投稿者本人なら削除できる() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let reviewer = store.seed_user("読者", "reader@example.com");
        let book = seed_book(&store, &owner);

        let usecase = sut(&store);
        let created = usecase
            .add(*book.id(), 4, VALID_TEXT.to_string(), &reviewer)
            .await
            .unwrap();

        usecase
            .delete(*created.review.id(), &reviewer)
            .await
            .unwrap();

        assert_eq!(store.review_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_投稿者以外はforbiddenで削除されない() {
        let store = InMemoryStore::new();
        let owner = store.seed_user("太郎", "taro@example.com");
        let reviewer = store.seed_user("読者", "reader@example.com");
        let other = store.seed_user("他人", "other@example.com");
        let book = seed_book(&store, &owner);

        let usecase = sut(&store);
        let created = usecase
            .add(*book.id(), 4, VALID_TEXT.to_string(), &reviewer)
            .await
            .unwrap();

        let result = usecase.delete(*created.review.id(), &other).await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
        assert_eq!(store.review_count(), 1);
    }
}
