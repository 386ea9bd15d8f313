//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_find_one`] or [`expect_update`] to assert behavior
//! and script the collection's answers, including faults and silence.

use std::time::Duration;

use crate::actor_framework::{CollectionClient, CollectionRequest, Document, Response, UpdateOutcome};
use tokio::sync::mpsc;

/// Creates a client whose requests arrive on the returned receiver instead of
/// a running [`CollectionActor`](crate::actor_framework::CollectionActor).
pub fn create_mock_client<T: Document>(
    buffer_size: usize,
    timeout: Duration,
) -> (CollectionClient<T>, mpsc::Receiver<CollectionRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new("mock", sender, timeout), receiver)
}

/// Helper to verify that the next message is an Insert request
pub async fn expect_insert<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T, Response<T::Id>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Insert { document, respond_to }) => Some((document, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a FindOne request
pub async fn expect_find_one<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::FindOne { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
#[allow(clippy::type_complexity)]
pub async fn expect_update<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Id, Option<T::Filter>, T::Patch, Response<UpdateOutcome>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Update { id, filter, patch, respond_to }) => Some((id, filter, patch, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::StoreError;
    use crate::domain::{NewUser, ObjectId, Role, User};
    use chrono::Utc;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10, Duration::from_secs(1));
        let input = NewUser {
            first_name: "Test".into(),
            last_name: "User".into(),
            email: "test@example.com".into(),
            phone: String::new(),
            address: String::new(),
            image: None,
        };
        let user = User::register(ObjectId::new(), input, Role::User, Utc::now());
        let expected_id = user.id;

        let create_task = tokio::spawn(async move { client.insert_one(user).await });

        let (document, responder) = expect_insert(&mut receiver).await.expect("Expected Insert request");
        assert_eq!(document.email, "test@example.com");
        responder.send(Ok(document.id)).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(expected_id));
    }

    #[tokio::test]
    async fn test_silent_collection_times_out() {
        let (client, mut receiver) = create_mock_client::<User>(10, Duration::from_millis(50));

        let task = tokio::spawn(async move { client.find_one(ObjectId::new()).await });
        let (_, _responder) = expect_find_one(&mut receiver).await.expect("Expected FindOne request");

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, StoreError::Timeout { op: "find_one", .. }));
    }
}
