use sea_orm::{ConnectionTrait, DbErr, PaginatorTrait, SelectorTrait};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// A validated `page`/`limit` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPageQuery")]
pub struct PageQuery {
    pub page: u64,
    pub limit: u64,
}

#[derive(Deserialize)]
struct RawPageQuery {
    page: Option<u64>,
    limit: Option<u64>,
}

impl TryFrom<RawPageQuery> for PageQuery {
    type Error = String;

    fn try_from(raw: RawPageQuery) -> Result<Self, Self::Error> {
        PageQuery::new(raw.page, raw.limit)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageQuery {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Result<Self, String> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if page == 0 {
            return Err("page must be at least 1".to_string());
        }
        if limit == 0 {
            return Err("limit must be at least 1".to_string());
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }
}

/// One page of results plus enough bookkeeping to walk the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: u64, query: PageQuery) -> Self {
        let total_pages = total_docs.div_ceil(query.limit);
        let has_prev_page = query.page > 1;
        let has_next_page = query.page < total_pages;
        Self {
            docs,
            total_docs,
            limit: query.limit,
            page: query.page,
            total_pages,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| query.page - 1),
            next_page: has_next_page.then(|| query.page + 1),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        self.filter_map(|doc| Some(f(doc)))
    }

    /// Like [`Page::map`], dropping docs for which `f` returns `None`. The
    /// page bookkeeping is kept as counted by the database.
    pub fn filter_map<U>(self, f: impl FnMut(T) -> Option<U>) -> Page<U> {
        Page {
            docs: self.docs.into_iter().filter_map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}

/// Runs `select` as a count plus one page fetch. The caller is responsible for
/// a total ordering on `select`, otherwise pages may overlap.
pub async fn fetch_page<'db, C, P, S>(
    db: &'db C,
    select: P,
    query: PageQuery,
) -> Result<Page<S::Item>, DbErr>
where
    C: ConnectionTrait,
    P: PaginatorTrait<'db, C, Selector = S>,
    S: SelectorTrait + Send + Sync + 'db,
{
    let paginator = select.paginate(db, query.limit);
    let total = paginator.num_items().await?;
    let docs = paginator.fetch_page(query.page - 1).await?;
    Ok(Page::new(docs, total, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, PageQuery::default());
    }

    #[test]
    fn zero_page_or_limit_is_rejected() {
        assert!(PageQuery::new(Some(0), None).is_err());
        assert!(PageQuery::new(None, Some(0)).is_err());
        assert!(serde_json::from_str::<PageQuery>(r#"{"page":0}"#).is_err());
    }

    #[test]
    fn limit_is_capped() {
        let query = PageQuery::new(Some(2), Some(10_000)).unwrap();
        assert_eq!(query.limit, MAX_LIMIT);
    }

    #[test]
    fn page_bookkeeping() {
        let query = PageQuery::new(Some(2), Some(10)).unwrap();
        let page = Page::new(vec![(); 10], 25, query);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.prev_page, Some(1));
        assert_eq!(page.next_page, Some(3));

        let last = Page::new(vec![(); 5], 25, PageQuery::new(Some(3), Some(10)).unwrap());
        assert!(!last.has_next_page);
        assert_eq!(last.next_page, None);

        let empty = Page::<()>::new(vec![], 0, PageQuery::default());
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_prev_page && !empty.has_next_page);
    }
}
