// ABOUTME: Tests for user storage layer
// ABOUTME: Verifies signup rows, approval flag, and profile edits

use canopy_storage::connect_in_memory;

use super::storage::UserStorage;
use super::types::{UserCreateInput, UserProfileUpdate};

fn sample_input(email: &str) -> UserCreateInput {
    UserCreateInput {
        email: email.to_string(),
        password_hash: "$argon2id$stub".to_string(),
        display_name: "Test User".to_string(),
        timezone: Some("UTC".to_string()),
    }
}

#[tokio::test]
async fn test_created_user_starts_unapproved() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    let user = storage.create_user(sample_input("a@example.com")).await.unwrap();

    assert!(!user.approved);
    assert_eq!(user.email, "a@example.com");
}

#[tokio::test]
async fn test_approve_user_sets_flag() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    let user = storage.create_user(sample_input("b@example.com")).await.unwrap();
    let approved = storage.approve_user(&user.id).await.unwrap();

    assert!(approved.approved);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    storage.create_user(sample_input("dup@example.com")).await.unwrap();
    let result = storage.create_user(sample_input("dup@example.com")).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_get_user_by_email() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    storage.create_user(sample_input("find@example.com")).await.unwrap();

    let found = storage.get_user_by_email("find@example.com").await.unwrap();
    assert!(found.is_some());

    let missing = storage.get_user_by_email("nope@example.com").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_profile_update_is_partial() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    let user = storage.create_user(sample_input("c@example.com")).await.unwrap();

    let updated = storage
        .update_profile(
            &user.id,
            UserProfileUpdate {
                display_name: Some("Renamed".to_string()),
                timezone: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name, "Renamed");
    assert_eq!(updated.timezone.as_deref(), Some("UTC"));
}

#[tokio::test]
async fn test_password_hash_not_serialized() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    let user = storage.create_user(sample_input("d@example.com")).await.unwrap();
    let json = serde_json::to_string(&user).unwrap();

    assert!(!json.contains("password_hash"));
    assert!(!json.contains("argon2id"));
}
