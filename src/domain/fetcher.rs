//! Keyed resource loading with last-key-wins settlement
//!
//! A [`ResourceFetcher`] owns one [`Resource`] and the fetch function that
//! fills it. Every change of the fetch key (network context, serialized
//! filter, skip flag) starts a new fetch generation; results from older
//! generations are dropped when they arrive late.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::domain::resource::Resource;
use crate::error::QueryError;

type FetchFn<T, F> =
    Box<dyn Fn(String, F) -> BoxFuture<'static, Result<Option<T>, QueryError>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchOptions {
    pub skip: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    context: String,
    filter: String,
    skip: bool,
}

struct Current<F> {
    key: FetchKey,
    filter: F,
}

pub struct ResourceFetcher<T, F> {
    fetch: FetchFn<T, F>,
    state: watch::Sender<Resource<T>>,
    generation: AtomicU64,
    current: Mutex<Option<Current<F>>>,
}

impl<T, F> ResourceFetcher<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Serialize + Clone + Send + Sync + 'static,
{
    pub fn new<Fut>(fetch: impl Fn(String, F) -> Fut + Send + Sync + 'static) -> Self
    where
        Fut: Future<Output = Result<Option<T>, QueryError>> + Send + 'static,
    {
        let (state, _) = watch::channel(Resource::Loading);
        Self {
            fetch: Box::new(move |context, filter| fetch(context, filter).boxed()),
            state,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Snapshot of the owned resource
    pub fn resource(&self) -> Resource<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<T>> {
        self.state.subscribe()
    }

    /// Fetch again if the key differs from the last one
    ///
    /// Without a context the resource stays loading and nothing is fetched.
    /// Data access failures settle into the resource; any other failure is
    /// returned.
    pub async fn update(
        &self,
        context: Option<&str>,
        filter: &F,
        options: FetchOptions,
    ) -> anyhow::Result<()> {
        let Some(context) = context else {
            let mut current = self.current.lock().await;
            *current = None;
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.state.send_replace(Resource::Loading);
            return Ok(());
        };

        let key = FetchKey {
            context: context.to_string(),
            filter: serde_json::to_string(filter)?,
            skip: options.skip,
        };

        {
            let mut current = self.current.lock().await;
            if current.as_ref().is_some_and(|current| current.key == key) {
                return Ok(());
            }
            *current = Some(Current {
                key: key.clone(),
                filter: filter.clone(),
            });
        }

        self.run(key, filter.clone()).await
    }

    /// Fetch again with the last key
    pub async fn refetch(&self) -> anyhow::Result<()> {
        let last = {
            let current = self.current.lock().await;
            current
                .as_ref()
                .map(|current| (current.key.clone(), current.filter.clone()))
        };
        match last {
            Some((key, filter)) => self.run(key, filter).await,
            None => Ok(()),
        }
    }

    async fn run(&self, key: FetchKey, filter: F) -> anyhow::Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if key.skip {
            self.state.send_replace(Resource::Ready(None));
            return Ok(());
        }

        self.state.send_replace(Resource::Loading);
        let outcome = (self.fetch)(key.context.clone(), filter).await;
        // a superseded fetch is dropped whatever its outcome
        if !self.is_current(generation) {
            return Ok(());
        }
        let resource = Resource::settle(outcome)?;
        self.state.send_replace(resource);
        Ok(())
    }

    fn is_current(&self, generation: u64) -> bool {
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            debug!(generation, latest, "discarding stale fetch result");
            return false;
        }
        true
    }
}
