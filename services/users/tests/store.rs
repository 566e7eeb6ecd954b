//! Behaviour of the user store over the in-memory engine

use serde_json::json;
use users::{
    MemoryUserRepository, StoreError, UserCandidate, UserChanges, UserId, UserRecord, UserStore,
    ValidationError,
};

fn store() -> UserStore<MemoryUserRepository> {
    UserStore::new(MemoryUserRepository::new())
}

#[tokio::test]
async fn test_registration_scenario() {
    let store = store();

    let alice = store
        .create_json(json!({"username": "alice", "password": "p1"}))
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&alice).unwrap(),
        json!({"id": 1, "username": "alice", "password": "p1", "phone": null, "admin": null})
    );

    let err = store
        .create_json(json!({"username": "alice", "password": "p2"}))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniquenessConflict { ref username } if username == "alice"));

    let err = store
        .create_json(json!({"username": "bob"}))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::Missing("password"))
    ));

    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_candidates_are_never_stored() {
    let store = store();

    let candidates = [
        UserCandidate::default(),
        UserCandidate {
            username: Some("bob".to_string()),
            ..Default::default()
        },
        UserCandidate {
            password: Some("p1".to_string()),
            ..Default::default()
        },
        UserCandidate::new("", "p1"),
        UserCandidate::new("bob", ""),
    ];

    for candidate in candidates {
        let err = store.create(candidate).await.unwrap_err();
        assert!(err.is_validation(), "unexpected error {err:?}");
    }

    let err = store
        .create_json(json!({"username": "bob", "password": "p1", "phone": "555"}))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.find_by_username("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_read_after_write() {
    let store = store();

    let created = store
        .create(
            UserCandidate::new("carol", "hunter2")
                .with_phone(5550100)
                .with_admin(true),
        )
        .await
        .unwrap();

    let found = store.find_by_username("carol").await.unwrap();
    assert_eq!(found.as_ref(), Some(&created));
    assert!(created.is_admin());
    assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn test_username_match_is_exact_and_case_sensitive() {
    let store = store();
    store.create(UserCandidate::new("Alice", "p1")).await.unwrap();

    assert!(store.find_by_username("alice").await.unwrap().is_none());
    assert!(store.find_by_username("Alice ").await.unwrap().is_none());

    // differently cased names are distinct users
    store.create(UserCandidate::new("alice", "p2")).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_concurrent_creates_admit_one_winner() {
    let store = store();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create(UserCandidate::new("dave", format!("p{i}")))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) if err.is_conflict() => conflicts += 1,
            Err(err) => panic!("unexpected error {err:?}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_username_uniqueness() {
    let store = store();
    let alice = store.create(UserCandidate::new("alice", "p1")).await.unwrap();
    let bob = store.create(UserCandidate::new("bob", "p2")).await.unwrap();

    let err = store
        .update(bob.id, UserChanges::default().username("alice"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(store.find_by_id(bob.id).await.unwrap(), Some(bob));

    // keeping one's own username is not a conflict
    let same = store
        .update(alice.id, UserChanges::default().username("alice"))
        .await
        .unwrap();
    assert_eq!(same, alice);
}

#[tokio::test]
async fn test_update_changes_fields_but_not_id() {
    let store = store();
    let alice = store
        .create(UserCandidate::new("alice", "p1").with_phone(5550100))
        .await
        .unwrap();

    let updated = store
        .update_json(
            alice.id,
            json!({"username": "alicia", "password": "p9", "phone": null, "admin": true}),
        )
        .await
        .unwrap();

    assert_eq!(
        updated,
        UserRecord {
            id: alice.id,
            username: "alicia".to_string(),
            password: "p9".to_string(),
            phone: None,
            admin: Some(true),
        }
    );
    assert!(store.find_by_username("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_rejects_invalid_changes() {
    let store = store();
    let alice = store.create(UserCandidate::new("alice", "p1")).await.unwrap();

    let err = store
        .update(alice.id, UserChanges::default().username(""))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = store
        .update_json(alice.id, json!({"password": null}))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = store
        .update_json(alice.id, json!({"admin": "yes"}))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(store.find_by_id(alice.id).await.unwrap(), Some(alice));
}

#[tokio::test]
async fn test_update_and_delete_unknown_id() {
    let store = store();
    let missing = UserId(42);

    let err = store
        .update(missing, UserChanges::default().password("p"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));

    let err = store
        .update(missing, UserChanges::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = store.delete(missing).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_then_lookup_is_absent() {
    let store = store();
    let erin = store.create(UserCandidate::new("erin", "p1")).await.unwrap();

    let removed = store.delete(erin.id).await.unwrap();
    assert_eq!(removed, erin);

    assert!(store.find_by_username("erin").await.unwrap().is_none());
    assert!(store.find_by_id(erin.id).await.unwrap().is_none());
    assert!(store.delete(erin.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_nul_characters_are_rejected_before_storage() {
    let store = store();

    let err = store
        .create(UserCandidate::new("a\u{0}b", "p"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::NulCharacter("username"))
    ));

    let err = store
        .create(UserCandidate::new("ab", "p\u{0}"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::NulCharacter("password"))
    ));

    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.find_by_username("a\u{0}b").await.unwrap().is_none());
    assert!(store.find_by_username("").await.unwrap().is_none());
}

#[tokio::test]
async fn test_integral_float_phone_is_stored_as_integer() {
    let store = store();

    let user = store
        .create_json(json!({"username": "frank", "password": "p1", "phone": 1.0}))
        .await
        .unwrap();
    assert_eq!(user.phone, Some(1));

    let err = store
        .create_json(json!({"username": "gina", "password": "p1", "phone": 5.5}))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}
