/// Page size used when a listing asks for a page without a size.
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, per_page: u64, current_page: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            items,
            total,
            per_page,
            current_page: current_page.max(1),
            last_page: total.div_ceil(per_page).max(1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
            last_page: self.last_page,
        }
    }
}

/// Result of a listing: paginated when a page was requested, plain otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Page(Page<T>),
    All(Vec<T>),
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Page(page) => &page.items,
            Listing::All(items) => items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        match self {
            Listing::Page(page) => Listing::Page(page.map(f)),
            Listing::All(items) => Listing::All(items.into_iter().map(f).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_rounds_up() {
        let page = Page::new(vec![1, 2], 25, 12, 3);
        assert_eq!(page.last_page, 3);
        assert_eq!(Page::<u8>::new(vec![], 0, 12, 1).last_page, 1);
    }

    #[test]
    fn test_map_keeps_totals() {
        let page = Page::new(vec![1, 2, 3], 3, 12, 1).map(|n| n * 2);
        assert_eq!(page.items, vec![2, 4, 6]);
        assert_eq!(page.total, 3);
        assert_eq!(page.per_page, 12);
    }
}
