use action_framework::FrameworkError;
use address_book::clients::{ClientError, ResourceClient};
use address_book::lifecycle::{AppConfig, AppSystem};
use address_book::model::{AddressCreate, AddressUpdate, UserCreate, UserUpdate};
use tokio::task::JoinSet;

fn start() -> AppSystem {
    AppSystem::start(&AppConfig::in_memory("integration"))
}

fn address(user_id: &str, street: &str) -> AddressCreate {
    AddressCreate {
        user_id: user_id.to_string(),
        street: street.to_string(),
        city: "Springfield".to_string(),
        zip: "12345".to_string(),
    }
}

/// Full end-to-end test with all real actors.
#[tokio::test]
async fn test_user_round_trip() {
    let system = start();

    let ann = system
        .user_client
        .create_user(UserCreate::new("Ann", "ann@example.com", "secret1"))
        .await
        .expect("Failed to create user");
    assert!(!ann.id.is_empty());
    assert_eq!(ann.name, "Ann");
    assert_eq!(ann.email, "ann@example.com");
    assert_eq!(ann.password, "secret1");

    let fetched = system.user_client.get(&ann.id).await.expect("Failed to get user");
    assert_eq!(fetched, ann);
    assert_eq!(system.user_client.list().await.unwrap(), vec![ann]);

    system.shutdown().await.expect("Failed to shutdown system");
}

#[tokio::test]
async fn test_update_merges_only_given_fields() {
    let system = start();
    let ann = system
        .user_client
        .create_user(UserCreate::new("Ann", "ann@example.com", "secret1"))
        .await
        .unwrap();

    let renamed = system
        .user_client
        .update_user(
            &ann.id,
            UserUpdate {
                name: Some("Annie".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.id, ann.id);
    assert_eq!(renamed.name, "Annie");
    assert_eq!(renamed.email, ann.email);
    assert_eq!(renamed.password, ann.password);

    let home = system.address_client.create_address(address(&ann.id, "1 Main St")).await.unwrap();
    let moved = system
        .address_client
        .update_address(
            &home.id,
            AddressUpdate {
                zip: Some("54321".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.zip, "54321");
    assert_eq!(moved.street, home.street);
    assert_eq!(moved.city, home.city);
    assert_eq!(moved.user_id, home.user_id);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let system = start();

    assert!(system.user_client.get("missing").await.unwrap_err().is_not_found());
    assert!(system.user_client.remove("missing").await.unwrap_err().is_not_found());
    let err = system
        .user_client
        .update_user("missing", UserUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Action(FrameworkError::not_found("User", "missing")));

    assert!(system.address_client.get("missing").await.unwrap_err().is_not_found());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_create_writes_nothing() {
    let system = start();

    let mut incomplete = address("u1", "1 Main St");
    incomplete.city = String::new();
    let err = system.address_client.create_address(incomplete).await.unwrap_err();
    let ClientError::Action(FrameworkError::Validation(errors)) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.has_field("city"));
    assert!(system.address_client.list().await.unwrap().is_empty());

    let err = system
        .user_client
        .create_user(UserCreate::new("Bob", "bob-at-example", "123"))
        .await
        .unwrap_err();
    let ClientError::Action(FrameworkError::Validation(errors)) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.has_field("email"));
    assert!(errors.has_field("password"));
    assert!(system.user_client.list().await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let system = start();
    let ann = system
        .user_client
        .create_user(UserCreate::new("Ann", "ann@example.com", "secret1"))
        .await
        .unwrap();

    let err = system
        .user_client
        .create_user(UserCreate::new("Impostor", "ann@example.com", "secret2"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Action(FrameworkError::Conflict(_))), "{err:?}");
    assert_eq!(system.user_client.get(&ann.id).await.unwrap(), ann);

    // Changing another user's email to a taken one is also a conflict.
    let bob = system
        .user_client
        .create_user(UserCreate::new("Bob", "bob@example.com", "secret3"))
        .await
        .unwrap();
    let err = system
        .user_client
        .update_user(
            &bob.id,
            UserUpdate {
                email: Some("ann@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Action(FrameworkError::Conflict(_))));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_list_by_user_isolates_owners() {
    let system = start();
    let a1 = system.address_client.create_address(address("user-a", "1 A St")).await.unwrap();
    let b1 = system.address_client.create_address(address("user-b", "1 B St")).await.unwrap();
    let a2 = system.address_client.create_address(address("user-a", "2 A St")).await.unwrap();

    let owned_by_a = system.address_client.list_by_user("user-a").await.unwrap();
    assert_eq!(owned_by_a, vec![a1, a2]);
    assert_eq!(system.address_client.list_by_user("user-b").await.unwrap(), vec![b1]);
    assert!(system.address_client.list_by_user("nobody").await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_remove_twice() {
    let system = start();
    let home = system.address_client.create_address(address("u1", "1 Main St")).await.unwrap();

    let removed = system.address_client.remove(&home.id).await.unwrap();
    assert_eq!(removed, home);
    assert!(system.address_client.remove(&home.id).await.unwrap_err().is_not_found());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_partial_updates_keep_both_fields() {
    let system = start();
    let home = system.address_client.create_address(address("u1", "1 Main St")).await.unwrap();

    let mut updates = JoinSet::new();
    for round in 0..10 {
        let street_client = system.address_client.clone();
        let zip_client = system.address_client.clone();
        let id = home.id.clone();
        let id2 = home.id.clone();
        updates.spawn(async move {
            street_client
                .update_address(
                    &id,
                    AddressUpdate {
                        street: Some(format!("{round} Main St")),
                        ..Default::default()
                    },
                )
                .await
        });
        updates.spawn(async move {
            zip_client
                .update_address(
                    &id2,
                    AddressUpdate {
                        zip: Some(format!("0000{round}")),
                        ..Default::default()
                    },
                )
                .await
        });
    }
    while let Some(result) = updates.join_next().await {
        result.unwrap().unwrap();
    }

    let settled = system.address_client.get(&home.id).await.unwrap();
    assert_ne!(settled.street, home.street);
    assert_ne!(settled.zip, home.zip);
    assert_eq!(settled.city, home.city);

    system.shutdown().await.unwrap();
}
