//! Paginated, queryable resource collections.
//!
//! A [`Collection`] is a live view over a server-side list of resources at
//! a given href. It never fetches eagerly:
//!
//! - [`Collection::query`] composes filters functionally, returning a new
//!   collection and leaving the original untouched
//! - [`ItemsCursor`] fetches pages on demand as the caller iterates
//! - [`Collection::len`] fetches a single count-bearing page when the total
//!   is not already known
//!
//! The wire format is a JSON object with an `items` array and
//! `offset`/`limit`/`size` pagination metadata.
//!
//! # Example
//!
//! ```rust,ignore
//! use veridian_api::resources::Account;
//!
//! let accounts = directory.accounts(&client).await?;
//! let matching = accounts.query([("username", "jlpicard")]);
//!
//! let mut items = matching.items();
//! while let Some(account) = items.next(&client).await? {
//!     println!("{}", account.href().unwrap());
//! }
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::marker::PhantomData;

use serde_json::Value;

use crate::client::ApiClient;
use crate::resources::base::ResourceModel;
use crate::resources::errors::ResourceError;
use crate::resources::href::Href;

/// A lazily paginated, queryable list of resources.
///
/// The type parameter fixes the element type; every item and every
/// [`Collection::create`] result is checked against the type registry, so a
/// collection can never silently hand out mistyped resources.
#[derive(Debug)]
pub struct Collection<T: ResourceModel> {
    href: Href,
    query: BTreeMap<String, String>,
    page_limit: Option<usize>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ResourceModel> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            href: self.href.clone(),
            query: self.query.clone(),
            page_limit: self.page_limit,
            _marker: PhantomData,
        }
    }
}

/// One fetched page of a collection.
#[derive(Debug, Clone)]
struct Page {
    size: usize,
    items: Vec<Value>,
}

impl<T: ResourceModel> Collection<T> {
    /// Creates a collection view over the list at `href`.
    #[must_use]
    pub const fn new(href: Href) -> Self {
        Self {
            href,
            query: BTreeMap::new(),
            page_limit: None,
            _marker: PhantomData,
        }
    }

    /// Returns the collection href.
    #[must_use]
    pub const fn href(&self) -> &Href {
        &self.href
    }

    /// Returns the composed query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Returns a new collection with the given filters merged in.
    ///
    /// Filters compose functionally: the receiver is never mutated, and a
    /// repeated key takes the latest value. No fetch happens here.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let admins = directory_groups.query([("name", "admin*")]);
    /// let enabled_admins = admins.query([("status", "ENABLED")]);
    /// ```
    #[must_use]
    pub fn query<K, V, I>(&self, filters: I) -> Self
    where
        K: Into<String>,
        V: ToString,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut next = self.clone();
        for (key, value) in filters {
            next.query.insert(key.into(), value.to_string());
        }
        next
    }

    /// Returns a new collection with a single filter merged in.
    #[must_use]
    pub fn filter(&self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query([(key.into(), value.to_string())])
    }

    /// Returns a new collection with a page limit override.
    ///
    /// Without an override, pages use the client configuration's default
    /// limit.
    #[must_use]
    pub fn with_page_limit(&self, limit: usize) -> Self {
        let mut next = self.clone();
        next.page_limit = Some(limit);
        next
    }

    /// Builds a typed, unfetched handle for a member href.
    ///
    /// No fetch happens; the first field access on the returned resource
    /// will load it.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResourceType`] or
    /// [`ResourceError::UnexpectedKind`] if the href does not belong to the
    /// collection's element type.
    pub fn get(&self, href: Href) -> Result<T, ResourceError> {
        T::from_href(href)
    }

    /// Creates a new resource in this collection.
    ///
    /// POSTs the payload to the collection href and returns the created
    /// resource, already loaded from the server's echo.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the service rejects the
    /// payload (e.g. a duplicate unique field), or the underlying transport
    /// error.
    pub async fn create(&self, client: &ApiClient, payload: Value) -> Result<T, ResourceError> {
        tracing::debug!(collection = %self.href, "creating resource");
        let response = client
            .http()
            .post(self.href.as_str(), payload)
            .await
            .map_err(|err| {
                ResourceError::from_http(err, T::KIND.as_str(), self.href.as_str())
            })?;

        T::materialize(&response.body)
    }

    /// Returns the total number of resources matching the collection's
    /// query.
    ///
    /// The total lives on the server, so this fetches one count-bearing
    /// page (with `limit=1`) to read it.
    ///
    /// # Errors
    ///
    /// Returns the underlying transport error, or
    /// [`ResourceError::MissingField`] if the page carries no `size`.
    pub async fn len(&self, client: &ApiClient) -> Result<usize, ResourceError> {
        let page = self.fetch_page(client, 0, 1).await?;
        Ok(page.size)
    }

    /// Returns `true` if no resources match the collection's query.
    ///
    /// # Errors
    ///
    /// Same as [`Self::len`].
    pub async fn is_empty(&self, client: &ApiClient) -> Result<bool, ResourceError> {
        Ok(self.len(client).await? == 0)
    }

    /// Returns the resource at `index`, fetching only the page that holds it.
    ///
    /// # Errors
    ///
    /// Returns the underlying transport error, or a materialization error
    /// for a malformed item.
    pub async fn nth(
        &self,
        client: &ApiClient,
        index: usize,
    ) -> Result<Option<T>, ResourceError> {
        let page = self.fetch_page(client, index, 1).await?;
        match page.items.first() {
            Some(item) => Ok(Some(T::materialize(item)?)),
            None => Ok(None),
        }
    }

    /// Returns the first matching resource.
    ///
    /// # Errors
    ///
    /// Same as [`Self::nth`].
    pub async fn first(&self, client: &ApiClient) -> Result<Option<T>, ResourceError> {
        self.nth(client, 0).await
    }

    /// Returns the only matching resource.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing matches and
    /// [`ResourceError::AmbiguousMatch`] when more than one resource does.
    pub async fn single(&self, client: &ApiClient) -> Result<T, ResourceError> {
        let page = self.fetch_page(client, 0, 2).await?;
        match page.size {
            0 => Err(ResourceError::NotFound {
                resource: T::KIND.as_str(),
                href: self.describe(),
            }),
            1 => {
                let item = page.items.first().ok_or_else(|| ResourceError::MissingField {
                    resource: T::KIND.as_str(),
                    field: "items".to_string(),
                })?;
                T::materialize(item)
            }
            count => Err(ResourceError::AmbiguousMatch {
                query: self.describe(),
                count,
            }),
        }
    }

    /// Starts iteration from offset 0.
    ///
    /// Each call returns a fresh cursor: re-iterating restarts pagination,
    /// it does not resume.
    #[must_use]
    pub fn items(&self) -> ItemsCursor<T> {
        ItemsCursor {
            collection: self.clone(),
            next_offset: 0,
            buffer: VecDeque::new(),
            total: None,
        }
    }

    /// Describes the collection and its filters for error messages.
    fn describe(&self) -> String {
        if self.query.is_empty() {
            self.href.as_str().to_string()
        } else {
            let filters: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            format!("{} [{}]", self.href, filters.join(", "))
        }
    }

    /// Fetches one page, overriding the cursor keys.
    async fn fetch_page(
        &self,
        client: &ApiClient,
        offset: usize,
        limit: usize,
    ) -> Result<Page, ResourceError> {
        let mut query: HashMap<String, String> = self
            .query
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        query.insert("offset".to_string(), offset.to_string());
        query.insert("limit".to_string(), limit.to_string());

        let response = client
            .http()
            .get(self.href.as_str(), Some(query))
            .await
            .map_err(|err| {
                ResourceError::from_http(err, T::KIND.as_str(), self.href.as_str())
            })?;

        let body = &response.body;
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| ResourceError::MissingField {
                resource: T::KIND.as_str(),
                field: "items".to_string(),
            })?;
        let size = body
            .get("size")
            .and_then(Value::as_u64)
            .ok_or_else(|| ResourceError::MissingField {
                resource: T::KIND.as_str(),
                field: "size".to_string(),
            })?;

        Ok(Page {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            items,
        })
    }
}

/// A pagination cursor over a [`Collection`].
///
/// Fetches pages transparently as the caller advances. The cursor is
/// one-shot; obtain a new one from [`Collection::items`] to restart.
#[derive(Debug)]
pub struct ItemsCursor<T: ResourceModel> {
    collection: Collection<T>,
    next_offset: usize,
    buffer: VecDeque<Value>,
    total: Option<usize>,
}

impl<T: ResourceModel> ItemsCursor<T> {
    /// Advances the cursor, fetching the next page when the buffered one is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns the underlying transport error, or a materialization error
    /// for a malformed item.
    pub async fn next(&mut self, client: &ApiClient) -> Result<Option<T>, ResourceError> {
        if self.buffer.is_empty() {
            if let Some(total) = self.total {
                if self.next_offset >= total {
                    return Ok(None);
                }
            }

            let limit = self
                .collection
                .page_limit
                .unwrap_or_else(|| client.config().page_limit());
            let page = self
                .collection
                .fetch_page(client, self.next_offset, limit)
                .await?;

            self.total = Some(page.size);
            if page.items.is_empty() {
                return Ok(None);
            }
            self.next_offset += page.items.len();
            self.buffer.extend(page.items);
        }

        match self.buffer.pop_front() {
            Some(item) => Ok(Some(T::materialize(&item)?)),
            None => Ok(None),
        }
    }

    /// Drains the cursor into a vector.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next`].
    pub async fn try_collect(mut self, client: &ApiClient) -> Result<Vec<T>, ResourceError> {
        let mut out = Vec::new();
        while let Some(item) = self.next(client).await? {
            out.push(item);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::base::Resource;
    use crate::resources::registry::ResourceKind;

    // A minimal model for exercising the generic collection machinery.
    #[derive(Debug, Clone)]
    struct TestGroup {
        inner: Resource,
    }

    impl ResourceModel for TestGroup {
        const KIND: ResourceKind = ResourceKind::Group;

        fn from_resource(resource: Resource) -> Self {
            Self { inner: resource }
        }

        fn resource(&self) -> &Resource {
            &self.inner
        }

        fn resource_mut(&mut self) -> &mut Resource {
            &mut self.inner
        }
    }

    fn groups_collection() -> Collection<TestGroup> {
        Collection::new(Href::new("https://api.veridian.io/v1/directories/d1/groups").unwrap())
    }

    #[test]
    fn test_query_returns_new_collection_without_fetching() {
        let base = groups_collection();
        let filtered = base.query([("name", "admins")]);

        assert!(base.query_params().is_empty());
        assert_eq!(
            filtered.query_params().get("name"),
            Some(&"admins".to_string())
        );
        assert_eq!(filtered.href(), base.href());
    }

    #[test]
    fn test_repeated_query_keys_take_the_latest_value() {
        let collection = groups_collection()
            .query([("name", "first")])
            .query([("name", "second"), ("status", "ENABLED")]);

        assert_eq!(
            collection.query_params().get("name"),
            Some(&"second".to_string())
        );
        assert_eq!(
            collection.query_params().get("status"),
            Some(&"ENABLED".to_string())
        );
    }

    #[test]
    fn test_filter_is_single_key_query() {
        let collection = groups_collection().filter("name", "*admin*");
        assert_eq!(
            collection.query_params().get("name"),
            Some(&"*admin*".to_string())
        );
    }

    #[test]
    fn test_with_page_limit_overrides_default() {
        let collection = groups_collection().with_page_limit(3);
        assert_eq!(collection.page_limit, Some(3));
        // The original is untouched
        assert_eq!(groups_collection().page_limit, None);
    }

    #[test]
    fn test_get_builds_unfetched_member_handle() {
        let collection = groups_collection();
        let group = collection
            .get(Href::new("https://api.veridian.io/v1/groups/g1").unwrap())
            .unwrap();

        assert!(!group.resource().is_loaded());
        assert_eq!(
            group.href().unwrap().as_str(),
            "https://api.veridian.io/v1/groups/g1"
        );
    }

    #[test]
    fn test_get_rejects_foreign_hrefs() {
        let collection = groups_collection();
        let result =
            collection.get(Href::new("https://api.veridian.io/v1/accounts/a1").unwrap());

        assert!(matches!(result, Err(ResourceError::UnexpectedKind { .. })));
    }

    #[test]
    fn test_items_cursor_starts_at_offset_zero() {
        let cursor = groups_collection().items();
        assert_eq!(cursor.next_offset, 0);
        assert!(cursor.buffer.is_empty());
        assert!(cursor.total.is_none());
    }

    #[test]
    fn test_describe_includes_filters() {
        let collection = groups_collection().filter("name", "*admin*");
        let description = collection.describe();
        assert!(description.contains("/directories/d1/groups"));
        assert!(description.contains("name=*admin*"));
    }

    #[test]
    fn test_collection_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Collection<TestGroup>>();
    }
}
