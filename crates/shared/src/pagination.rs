//! # ページネーションメタデータ
//!
//! オフセットベースのページネーションに対応したレスポンス型。
//!
//! ## JSON 形式
//!
//! ```json
//! {
//!   "currentPage": 2,
//!   "totalPages": 3,
//!   "totalBooks": 12,
//!   "hasNext": true,
//!   "hasPrev": true
//! }
//! ```

use serde::{Deserialize, Serialize};

/// ページネーションメタデータ
///
/// 一覧レスポンスに同梱され、クライアントのページャ描画に使われる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages:  u32,
    pub total_books:  u64,
    pub has_next:     bool,
    pub has_prev:     bool,
}

impl Pagination {
    /// 総件数とページサイズからメタデータを構築する
    ///
    /// `total_pages = ceil(total_books / page_size)`。
    /// 総件数 0 のときは `total_pages = 0` で `has_next` / `has_prev` とも false。
    pub fn build(current_page: u32, total_books: u64, page_size: u64) -> Self {
        let total_pages = total_books.div_ceil(page_size) as u32;
        Self {
            current_page,
            total_pages,
            total_books,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }
}
