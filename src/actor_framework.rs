use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Documents, Filters, Patches)
// =============================================================================

/// Trait that any stored document must implement to live in a [`CollectionActor`].
pub trait Document: Clone + Debug + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    /// Field-equality filter evaluated against the stored document.
    type Filter: Send + Sync + Debug;
    /// Field-set update applied to the stored document.
    type Patch: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Key that must be unique across the collection, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }

    fn matches(&self, filter: &Self::Filter) -> bool;

    fn apply(&mut self, patch: Self::Patch);
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Duplicate key in {collection}: {key}")]
    DuplicateKey { collection: &'static str, key: String },
    #[error("{collection}.{op} timed out after {after:?}")]
    Timeout {
        collection: &'static str,
        op: &'static str,
        after: Duration,
    },
    #[error("Collection unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: u64,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum CollectionRequest<T: Document> {
    Insert {
        document: T,
        respond_to: Response<T::Id>,
    },
    FindOne {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    FindMany {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        filter: Option<T::Filter>,
        patch: T::Patch,
        respond_to: Response<UpdateOutcome>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<DeleteOutcome>,
    },
}

// =============================================================================
// 3. THE GENERIC COLLECTION ACTOR
// =============================================================================

/// Owns one collection. Requests are served one at a time, so every
/// single-document operation is atomic.
pub struct CollectionActor<T: Document> {
    name: &'static str,
    receiver: mpsc::Receiver<CollectionRequest<T>>,
    documents: HashMap<T::Id, T>,
    insertion_order: Vec<T::Id>,
    unique_index: HashMap<String, T::Id>,
}

impl<T: Document> CollectionActor<T> {
    pub fn new(
        name: &'static str,
        buffer_size: usize,
        timeout: Duration,
    ) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name,
            receiver,
            documents: HashMap::new(),
            insertion_order: Vec::new(),
            unique_index: HashMap::new(),
        };
        let client = CollectionClient::new(name, sender, timeout);
        (actor, client)
    }

    #[instrument(name = "collection_actor", skip(self), fields(collection = self.name))]
    pub async fn run(mut self) {
        info!("Collection starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Insert { document, respond_to } => {
                    let _ = respond_to.send(self.insert(document));
                }
                CollectionRequest::FindOne { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.documents.get(&id).cloned()));
                }
                CollectionRequest::FindMany { respond_to } => {
                    let all = self
                        .insertion_order
                        .iter()
                        .filter_map(|id| self.documents.get(id).cloned())
                        .collect();
                    let _ = respond_to.send(Ok(all));
                }
                CollectionRequest::Update { id, filter, patch, respond_to } => {
                    let _ = respond_to.send(self.update(id, filter, patch));
                }
                CollectionRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.delete(&id)));
                }
            }
        }
        info!(documents = self.documents.len(), "Collection stopped");
    }

    fn insert(&mut self, document: T) -> Result<T::Id, StoreError> {
        let id = document.id().clone();
        if self.documents.contains_key(&id) {
            return Err(self.duplicate(id.to_string()));
        }
        let key = document.unique_key();
        if let Some(key) = &key {
            if self.unique_index.contains_key(key) {
                return Err(self.duplicate(key.clone()));
            }
        }

        if let Some(key) = key {
            self.unique_index.insert(key, id.clone());
        }
        self.insertion_order.push(id.clone());
        self.documents.insert(id.clone(), document);
        debug!(id = %id, "Document inserted");
        Ok(id)
    }

    fn update(
        &mut self,
        id: T::Id,
        filter: Option<T::Filter>,
        patch: T::Patch,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(current) = self.documents.get(&id) else {
            return Ok(UpdateOutcome { matched: 0 });
        };
        if let Some(filter) = &filter {
            if !current.matches(filter) {
                debug!(id = %id, ?filter, "Filter did not match");
                return Ok(UpdateOutcome { matched: 0 });
            }
        }

        let old_key = current.unique_key();
        let mut updated = current.clone();
        updated.apply(patch);
        let new_key = updated.unique_key();

        if new_key != old_key {
            if let Some(key) = &new_key {
                if self.unique_index.contains_key(key) {
                    return Err(self.duplicate(key.clone()));
                }
            }
            if let Some(key) = old_key {
                self.unique_index.remove(&key);
            }
            if let Some(key) = new_key {
                self.unique_index.insert(key, id.clone());
            }
        }

        self.documents.insert(id, updated);
        Ok(UpdateOutcome { matched: 1 })
    }

    fn delete(&mut self, id: &T::Id) -> DeleteOutcome {
        match self.documents.remove(id) {
            Some(document) => {
                if let Some(key) = document.unique_key() {
                    self.unique_index.remove(&key);
                }
                self.insertion_order.retain(|existing| existing != id);
                DeleteOutcome { deleted: 1 }
            }
            None => DeleteOutcome { deleted: 0 },
        }
    }

    fn duplicate(&self, key: String) -> StoreError {
        warn!(key = %key, "Duplicate key rejected");
        StoreError::DuplicateKey { collection: self.name, key }
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// Cloneable handle to a collection. Every call is bounded by `timeout`.
#[derive(Clone)]
pub struct CollectionClient<T: Document> {
    name: &'static str,
    sender: mpsc::Sender<CollectionRequest<T>>,
    timeout: Duration,
}

impl<T: Document> CollectionClient<T> {
    pub fn new(
        name: &'static str,
        sender: mpsc::Sender<CollectionRequest<T>>,
        timeout: Duration,
    ) -> Self {
        Self { name, sender, timeout }
    }

    pub async fn insert_one(&self, document: T) -> Result<T::Id, StoreError> {
        self.request("insert_one", |respond_to| CollectionRequest::Insert { document, respond_to })
            .await
    }

    pub async fn find_one(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.request("find_one", |respond_to| CollectionRequest::FindOne { id, respond_to })
            .await
    }

    pub async fn find_many(&self) -> Result<Vec<T>, StoreError> {
        self.request("find_many", |respond_to| CollectionRequest::FindMany { respond_to })
            .await
    }

    /// Applies `patch` when the document exists and matches `filter`.
    pub async fn update_one(
        &self,
        id: T::Id,
        filter: Option<T::Filter>,
        patch: T::Patch,
    ) -> Result<UpdateOutcome, StoreError> {
        self.request("update_one", |respond_to| CollectionRequest::Update {
            id,
            filter,
            patch,
            respond_to,
        })
        .await
    }

    pub async fn delete_one(&self, id: T::Id) -> Result<DeleteOutcome, StoreError> {
        self.request("delete_one", |respond_to| CollectionRequest::Delete { id, respond_to })
            .await
    }

    async fn request<R>(
        &self,
        op: &'static str,
        build: impl FnOnce(Response<R>) -> CollectionRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(build(respond_to))
                .await
                .map_err(|_| StoreError::Unavailable(format!("{} collection closed", self.name)))?;
            response
                .await
                .map_err(|_| StoreError::Unavailable(format!("{} collection dropped request", self.name)))?
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                warn!(collection = self.name, op, "Store call timed out");
                Err(StoreError::Timeout {
                    collection: self.name,
                    op,
                    after: self.timeout,
                })
            }
        }
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Ticket {
        id: u32,
        code: String,
        state: &'static str,
    }

    #[derive(Debug)]
    struct StateIs(&'static str);

    #[derive(Debug)]
    enum TicketPatch {
        State(&'static str),
        Code(String),
    }

    impl Document for Ticket {
        type Id = u32;
        type Filter = StateIs;
        type Patch = TicketPatch;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.code.clone())
        }

        fn matches(&self, filter: &StateIs) -> bool {
            self.state == filter.0
        }

        fn apply(&mut self, patch: TicketPatch) {
            match patch {
                TicketPatch::State(state) => self.state = state,
                TicketPatch::Code(code) => self.code = code,
            }
        }
    }

    fn ticket(id: u32, code: &str) -> Ticket {
        Ticket { id, code: code.into(), state: "open" }
    }

    fn start() -> CollectionClient<Ticket> {
        let (actor, client) = CollectionActor::new("tickets", 8, Duration::from_secs(1));
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_insert_find_and_list_in_insertion_order() {
        let client = start();
        client.insert_one(ticket(2, "b")).await.unwrap();
        client.insert_one(ticket(1, "a")).await.unwrap();

        assert_eq!(client.find_one(1).await.unwrap(), Some(ticket(1, "a")));
        assert_eq!(client.find_one(9).await.unwrap(), None);

        let ids: Vec<u32> = client.find_many().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_unique_key_is_enforced() {
        let client = start();
        client.insert_one(ticket(1, "a")).await.unwrap();

        let err = client.insert_one(ticket(2, "a")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { ref key, .. } if key == "a"));

        client.insert_one(ticket(3, "c")).await.unwrap();
        let err = client.update_one(3, None, TicketPatch::Code("a".into())).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert_eq!(client.find_one(3).await.unwrap().unwrap().code, "c");
    }

    #[tokio::test]
    async fn test_conditional_update_only_applies_on_match() {
        let client = start();
        client.insert_one(ticket(1, "a")).await.unwrap();

        let miss = client
            .update_one(1, Some(StateIs("closed")), TicketPatch::State("archived"))
            .await
            .unwrap();
        assert_eq!(miss.matched, 0);

        let hit = client
            .update_one(1, Some(StateIs("open")), TicketPatch::State("closed"))
            .await
            .unwrap();
        assert_eq!(hit.matched, 1);
        assert_eq!(client.find_one(1).await.unwrap().unwrap().state, "closed");

        let absent = client.update_one(7, None, TicketPatch::State("closed")).await.unwrap();
        assert_eq!(absent.matched, 0);
    }

    #[tokio::test]
    async fn test_delete_frees_unique_key() {
        let client = start();
        client.insert_one(ticket(1, "a")).await.unwrap();

        assert_eq!(client.delete_one(1).await.unwrap().deleted, 1);
        assert_eq!(client.delete_one(1).await.unwrap().deleted, 0);
        client.insert_one(ticket(2, "a")).await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_collection_is_unavailable() {
        let (actor, client) = CollectionActor::<Ticket>::new("tickets", 8, Duration::from_secs(1));
        drop(actor);

        let err = client.find_one(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
