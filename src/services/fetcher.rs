//! Cached, de-duplicated fetches of the five dashboard collections.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Staleness;
use crate::errors::FetchError;
use crate::models::book::{Book, Category};
use crate::models::collection::decode_collection;
use crate::models::request::{BorrowRequest, DonationRequest};
use crate::models::user::User;
use crate::models::Resource;
use crate::services::library_api::ResourceSource;
use crate::services::query_cache::QueryCache;

/// A decoded collection as stored in the query cache.
#[derive(Debug, Clone)]
pub enum Collection {
    Users(Arc<[User]>),
    Books(Arc<[Book]>),
    Categories(Arc<[Category]>),
    BorrowRequests(Arc<[BorrowRequest]>),
    DonationRequests(Arc<[DonationRequest]>),
}

/// Entity type served by one dashboard resource.
pub trait Entity: DeserializeOwned + Send + Sync + Sized + 'static {
    const RESOURCE: Resource;

    fn into_collection(items: Arc<[Self]>) -> Collection;

    fn from_collection(collection: &Collection) -> Option<Arc<[Self]>>;
}

macro_rules! entity {
    ($entity:ty, $variant:ident) => {
        impl Entity for $entity {
            const RESOURCE: Resource = Resource::$variant;

            fn into_collection(items: Arc<[Self]>) -> Collection {
                Collection::$variant(items)
            }

            fn from_collection(collection: &Collection) -> Option<Arc<[Self]>> {
                match collection {
                    Collection::$variant(items) => Some(Arc::clone(items)),
                    _ => None,
                }
            }
        }
    };
}

entity!(User, Users);
entity!(Book, Books);
entity!(Category, Categories);
entity!(BorrowRequest, BorrowRequests);
entity!(DonationRequest, DonationRequests);

/// How a resource's data was obtained for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    /// Served from a successful fetch within its staleness window.
    Ready,
    /// Latest fetch failed; the previous cached value is shown.
    Fallback,
    /// Fetch failed and nothing was cached; aggregated as empty.
    Unavailable,
    /// No fetch has settled yet.
    Pending,
}

/// Per-resource flag exposed to the dashboard UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceStatus {
    pub resource: Resource,
    pub state: ResourceState,
    pub error: Option<String>,
    /// A fetch for this resource is currently in flight.
    pub fetching: bool,
}

/// A collection together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub items: Arc<[T]>,
    pub status: ResourceStatus,
}

impl<T: Entity> Loaded<T> {
    fn new(items: Option<Arc<[T]>>, state: ResourceState, error: Option<&FetchError>) -> Self {
        Self {
            items: items.unwrap_or_else(|| Arc::from(Vec::new())),
            status: ResourceStatus {
                resource: T::RESOURCE,
                state,
                error: error.map(ToString::to_string),
                fetching: false,
            },
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status.state != ResourceState::Pending
    }
}

#[derive(Debug)]
pub struct DashboardFetcher {
    source: Arc<dyn ResourceSource>,
    cache: QueryCache<Resource, Collection>,
    staleness: Staleness,
}

impl DashboardFetcher {
    pub fn new(source: Arc<dyn ResourceSource>, staleness: Staleness) -> Self {
        Self {
            source,
            cache: QueryCache::new(),
            staleness,
        }
    }

    pub fn stale_after(&self, resource: Resource) -> Duration {
        if resource.is_request_workflow() {
            self.staleness.requests
        } else {
            self.staleness.reference
        }
    }

    /// Fetch one collection through the cache.
    pub async fn fetch<T: Entity>(&self) -> Loaded<T> {
        let resource = T::RESOURCE;
        let source = Arc::clone(&self.source);
        let outcome = self
            .cache
            .fetch(resource, self.stale_after(resource), move || async move {
                let payload = source.fetch(resource).await?;
                let items: Vec<T> = decode_collection(resource, payload);
                Ok(T::into_collection(Arc::from(items)))
            })
            .await;

        match outcome {
            Ok(collection) => Loaded::new(T::from_collection(&collection), ResourceState::Ready, None),
            Err(e) => {
                let cached = self.cache.state(&resource).data;
                match cached.as_ref().and_then(T::from_collection) {
                    Some(items) => {
                        tracing::warn!(%resource, error = %e, "Serving cached data after fetch failure");
                        Loaded::new(Some(items), ResourceState::Fallback, Some(&e))
                    }
                    None => {
                        tracing::warn!(%resource, error = %e, "Resource unavailable, aggregating as empty");
                        Loaded::new(None, ResourceState::Unavailable, Some(&e))
                    }
                }
            }
        }
    }

    /// Read one collection from the cache without fetching.
    pub fn peek<T: Entity>(&self) -> Loaded<T> {
        let query = self.cache.state(&T::RESOURCE);
        let items = query.data.as_ref().and_then(T::from_collection);
        let state = match (query.has_settled(), &items, &query.error) {
            (false, _, _) => ResourceState::Pending,
            (true, Some(_), None) => ResourceState::Ready,
            (true, Some(_), Some(_)) => ResourceState::Fallback,
            (true, None, _) => ResourceState::Unavailable,
        };
        let mut loaded = Loaded::new(items, state, query.error.as_ref());
        loaded.status.fetching = query.is_fetching;
        loaded
    }

    pub async fn fetch_users(&self) -> Loaded<User> {
        self.fetch().await
    }

    pub async fn fetch_books(&self) -> Loaded<Book> {
        self.fetch().await
    }

    pub async fn fetch_categories(&self) -> Loaded<Category> {
        self.fetch().await
    }

    pub async fn fetch_borrow_requests(&self) -> Loaded<BorrowRequest> {
        self.fetch().await
    }

    pub async fn fetch_donation_requests(&self) -> Loaded<DonationRequest> {
        self.fetch().await
    }

    /// Mark every resource stale so the next fetch goes upstream.
    pub fn invalidate_all(&self) {
        tracing::info!("Invalidating all dashboard resources");
        self.cache.invalidate_all();
    }
}
