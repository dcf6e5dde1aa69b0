//! # テスト支援
//!
//! ハンドラ・ユースケースのテストで使うインメモリリポジトリと
//! 認証トークンのヘルパー。
//!
//! [`InMemoryStore`] は 3 つのリポジトリトレイトをすべて実装し、
//! PostgreSQL 実装と同じ観測可能な振る舞い（フィルタ・ソート・
//! ページング・一意制約・カスケード削除）を再現する。

use std::{
    cmp::Ordering,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use shohyo_domain::{
    book::{Book, BookId, BookQuery, BookSortKey, PAGE_SIZE, SortOrder},
    clock::FixedClock,
    review::{Review, ReviewId},
    user::{User, UserId},
};
use shohyo_infra::{
    InfraError,
    repository::{
        BookRepository,
        BookWithOwner,
        ReviewRepository,
        ReviewWithAuthor,
        ReviewWithBook,
        UserRepository,
    },
};
use uuid::Uuid;

use crate::{
    auth::Claims,
    state::AppState,
    usecase::{BookUseCaseImpl, ReviewUseCaseImpl},
};

/// テスト用の JWT 秘密鍵
pub const TEST_SECRET: &str = "test-jwt-secret";

/// 全テストで共通の固定時刻（2024-06-01、出版年の上限は 2026）
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

/// インメモリのデータストア
///
/// `Clone` してもストレージは共有される。
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users:   Arc<Mutex<Vec<User>>>,
    books:   Arc<Mutex<Vec<Book>>>,
    reviews: Arc<Mutex<Vec<Review>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// ユーザーを登録して返す
    pub fn seed_user(&self, name: &str, email: &str) -> User {
        let user = User::from_db(UserId::new(), name.to_string(), email.to_string());
        self.users.lock().unwrap().push(user.clone());
        user
    }

    /// 書籍を直接登録する
    pub fn seed_book(&self, book: Book) {
        self.books.lock().unwrap().push(book);
    }

    pub fn book_count(&self) -> usize {
        self.books.lock().unwrap().len()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }
}

fn matches_query(book: &Book, query: &BookQuery) -> bool {
    let search_ok = match query.search.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => {
            let s = s.to_lowercase();
            book.title().to_lowercase().contains(&s)
                || book.author().to_lowercase().contains(&s)
                || book.description().to_lowercase().contains(&s)
        }
        None => true,
    };
    let genre_ok = match query.genre.as_deref().filter(|g| !g.is_empty()) {
        Some(g) => book.genre().to_lowercase().contains(&g.to_lowercase()),
        None => true,
    };

    search_ok && genre_ok
}

fn compare_books(a: &Book, b: &Book, key: BookSortKey) -> Ordering {
    match key {
        BookSortKey::Title => a.title().cmp(b.title()),
        BookSortKey::Author => a.author().cmp(b.author()),
        BookSortKey::Genre => a.genre().cmp(b.genre()),
        BookSortKey::Year => a.year().cmp(&b.year()),
        BookSortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
        BookSortKey::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn search(&self, query: &BookQuery) -> Result<Vec<BookWithOwner>, InfraError> {
        let users = self.users.lock().unwrap().clone();
        let mut books: Vec<Book> = self
            .books
            .lock()
            .unwrap()
            .iter()
            .filter(|b| matches_query(b, query))
            .cloned()
            .collect();
        books.sort_by(|a, b| compare_books(a, b, query.sort_by));
        if query.sort_order == SortOrder::Desc {
            books.reverse();
        }

        Ok(books
            .into_iter()
            .skip(query.offset() as usize)
            .take(PAGE_SIZE as usize)
            .map(|book| {
                let owner = users
                    .iter()
                    .find(|u| u.id() == book.added_by())
                    .expect("所有者ユーザーが登録されていること")
                    .clone();
                BookWithOwner { book, owner }
            })
            .collect())
    }

    async fn count(&self, query: &BookQuery) -> Result<i64, InfraError> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .filter(|b| matches_query(b, query))
            .count() as i64)
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id() == id)
            .cloned())
    }

    async fn find_with_owner(&self, id: &BookId) -> Result<Option<BookWithOwner>, InfraError> {
        let users = self.users.lock().unwrap().clone();
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id() == id)
            .map(|book| {
                let owner = users
                    .iter()
                    .find(|u| u.id() == book.added_by())
                    .expect("所有者ユーザーが登録されていること")
                    .clone();
                BookWithOwner {
                    book: book.clone(),
                    owner,
                }
            }))
    }

    async fn insert(&self, book: &Book) -> Result<(), InfraError> {
        self.books.lock().unwrap().push(book.clone());
        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<(), InfraError> {
        let mut books = self.books.lock().unwrap();
        if let Some(existing) = books.iter_mut().find(|b| b.id() == book.id()) {
            *existing = book.clone();
        }
        Ok(())
    }

    async fn delete_with_reviews(&self, id: &BookId) -> Result<(), InfraError> {
        self.reviews.lock().unwrap().retain(|r| r.book_id() != id);
        self.books.lock().unwrap().retain(|b| b.id() != id);
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn find_by_book(&self, book_id: &BookId) -> Result<Vec<ReviewWithAuthor>, InfraError> {
        let users = self.users.lock().unwrap().clone();
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.book_id() == book_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(reviews
            .into_iter()
            .map(|review| {
                let author_name = users
                    .iter()
                    .find(|u| u.id() == review.user_id())
                    .expect("投稿者ユーザーが登録されていること")
                    .name()
                    .to_string();
                ReviewWithAuthor {
                    review,
                    author_name,
                }
            })
            .collect())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<ReviewWithBook>, InfraError> {
        let books = self.books.lock().unwrap().clone();
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(reviews
            .into_iter()
            .map(|review| {
                let book = books
                    .iter()
                    .find(|b| b.id() == review.book_id())
                    .expect("レビュー対象の書籍が登録されていること");
                ReviewWithBook {
                    book_title: book.title().to_string(),
                    book_author: book.author().to_string(),
                    review,
                }
            })
            .collect())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, InfraError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn find_with_author(
        &self,
        id: &ReviewId,
    ) -> Result<Option<ReviewWithAuthor>, InfraError> {
        let users = self.users.lock().unwrap().clone();
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .map(|review| {
                let author_name = users
                    .iter()
                    .find(|u| u.id() == review.user_id())
                    .expect("投稿者ユーザーが登録されていること")
                    .name()
                    .to_string();
                ReviewWithAuthor {
                    review: review.clone(),
                    author_name,
                }
            }))
    }

    async fn insert(&self, review: &Review) -> Result<(), InfraError> {
        let mut reviews = self.reviews.lock().unwrap();
        // (book_id, user_id) の一意制約を PostgreSQL と同じ制約名で再現する
        if reviews
            .iter()
            .any(|r| r.book_id() == review.book_id() && r.user_id() == review.user_id())
        {
            return Err(InfraError::UniqueViolation {
                constraint: "reviews_book_id_user_id_key".to_string(),
            });
        }
        reviews.push(review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), InfraError> {
        let mut reviews = self.reviews.lock().unwrap();
        if let Some(existing) = reviews.iter_mut().find(|r| r.id() == review.id()) {
            *existing = review.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), InfraError> {
        self.reviews.lock().unwrap().retain(|r| r.id() != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id() == id)
            .cloned())
    }
}

/// ストアからテスト用の `AppState` を構築する
pub fn test_state(store: &InMemoryStore) -> AppState {
    let clock = Arc::new(FixedClock::new(fixed_now()));
    AppState {
        book_usecase:    Arc::new(BookUseCaseImpl::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            clock.clone(),
        )),
        review_usecase:  Arc::new(ReviewUseCaseImpl::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            clock,
        )),
        user_repository: Arc::new(store.clone()),
        jwt_secret:      TEST_SECRET.to_string(),
    }
}

/// テスト用の Bearer トークンを発行する
pub fn bearer_for(user: &User) -> String {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: *user.id().as_uuid(),
        exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

/// 登録されていないユーザーの Bearer トークンを発行する
pub fn bearer_for_unknown_user() -> String {
    let user = User::from_db(
        UserId::from_uuid(Uuid::now_v7()),
        "幽霊".to_string(),
        "ghost@example.com".to_string(),
    );
    bearer_for(&user)
}
