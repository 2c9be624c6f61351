//! Client-side infinite scroll
//!
//! A [`Feed`] pulls pages from a [`PageSource`], using the id of the last
//! item of the previous page as the next cursor. An empty page means the end.
//! A sorted feed reorders what it holds after every page; the cursor still
//! follows server order.

use anyhow::Result;

use crate::models::Identified;

/// Something that serves cursor-paginated pages
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Page element
    type Item: Identified;

    /// Fetch the page after `cursor` (first page for `None`)
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Vec<Self::Item>>;
}

/// Accumulated pages of one collection
#[derive(Debug, Clone)]
pub struct Feed<T> {
    items: Vec<T>,
    cursor: Option<String>,
    exhausted: bool,
    order: Option<fn(&mut [T])>,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            exhausted: false,
            order: None,
        }
    }
}

impl<T: Identified> Feed<T> {
    /// Empty feed kept in server order
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty feed re-sorted with `order` after every page, e.g.
    /// `Feed::sorted(Post::sort_recent_first)`
    pub fn sorted(order: fn(&mut [T])) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    /// Items loaded so far
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether the source ran out
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Cursor for the next request: the last id the server sent
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Load the next page. Returns how many new items were appended.
    pub async fn load_more<S>(&mut self, source: &S) -> Result<usize>
    where
        S: PageSource<Item = T>,
    {
        if self.exhausted {
            return Ok(0);
        }

        let page = source.fetch_page(self.cursor()).await?;
        let Some(last) = page.last() else {
            self.exhausted = true;
            return Ok(0);
        };
        self.cursor = Some(last.id().to_string());

        let before = self.items.len();
        for item in page {
            if !self.items.iter().any(|existing| existing.id() == item.id()) {
                self.items.push(item);
            }
        }
        let added = self.items.len() - before;
        // A page of nothing but repeats would loop forever on the same cursor
        if added == 0 {
            self.exhausted = true;
        }
        if let Some(order) = self.order {
            order(&mut self.items);
        }
        tracing::debug!(added, total = self.items.len(), "Loaded page");
        Ok(added)
    }

    /// Drop everything and load the first page again
    pub async fn refresh<S>(&mut self, source: &S) -> Result<usize>
    where
        S: PageSource<Item = T>,
    {
        self.items.clear();
        self.cursor = None;
        self.exhausted = false;
        self.load_more(source).await
    }

    /// Keep loading until the source is exhausted or `limit` items are held
    pub async fn load_up_to<S>(&mut self, source: &S, limit: usize) -> Result<()>
    where
        S: PageSource<Item = T>,
    {
        while !self.exhausted && self.items.len() < limit {
            self.load_more(source).await?;
        }
        Ok(())
    }
}
