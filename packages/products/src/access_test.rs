// ABOUTME: Tests for the Access Control Evaluator
// ABOUTME: Covers the ownership short-circuit, role ordering, and grant operations

use pretty_assertions::assert_eq;

use crate::access::{AccessEvaluator, Role};
use crate::error::ProductError;
use crate::storage::ProductStorage;
use crate::test_support::{insert_user, product_input, setup_pool};

#[tokio::test]
async fn test_owner_passes_every_required_role() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    for required in [Role::Viewer, Role::Editor, Role::Owner] {
        let granted = evaluator
            .evaluate("alice", &product.id, required)
            .await
            .unwrap();
        assert_eq!(granted.id, product.id);
    }
}

#[tokio::test]
async fn test_ownership_short_circuit_ignores_grant_rows() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool.clone());

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    // Degrade the owner's explicit grant to viewer; ownership must still win.
    sqlx::query("UPDATE product_access SET role = 'viewer' WHERE product_id = ? AND user_id = 'alice'")
        .bind(&product.id)
        .execute(&pool)
        .await
        .unwrap();

    evaluator
        .evaluate("alice", &product.id, Role::Owner)
        .await
        .unwrap();

    // Even with no grant row at all.
    sqlx::query("DELETE FROM product_access WHERE product_id = ? AND user_id = 'alice'")
        .bind(&product.id)
        .execute(&pool)
        .await
        .unwrap();

    evaluator
        .evaluate("alice", &product.id, Role::Owner)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;

    let evaluator = AccessEvaluator::new(pool);

    let result = evaluator.evaluate("alice", "no-such-id", Role::Viewer).await;
    assert!(matches!(result, Err(ProductError::NotFound)));
}

#[tokio::test]
async fn test_no_grant_is_forbidden() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;
    insert_user(&pool, "mallory").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    let result = evaluator.evaluate("mallory", &product.id, Role::Viewer).await;
    assert!(matches!(result, Err(ProductError::Forbidden(_))));
}

#[tokio::test]
async fn test_role_ordering_is_strict() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;
    insert_user(&pool, "vera").await;
    insert_user(&pool, "ed").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    evaluator
        .invite("alice", &product.id, "vera", Role::Viewer)
        .await
        .unwrap();
    evaluator
        .invite("alice", &product.id, "ed", Role::Editor)
        .await
        .unwrap();

    // viewer satisfies viewer only
    evaluator.evaluate("vera", &product.id, Role::Viewer).await.unwrap();
    assert!(matches!(
        evaluator.evaluate("vera", &product.id, Role::Editor).await,
        Err(ProductError::Forbidden(_))
    ));
    assert!(matches!(
        evaluator.evaluate("vera", &product.id, Role::Owner).await,
        Err(ProductError::Forbidden(_))
    ));

    // editor satisfies viewer and editor, never owner
    evaluator.evaluate("ed", &product.id, Role::Viewer).await.unwrap();
    evaluator.evaluate("ed", &product.id, Role::Editor).await.unwrap();
    assert!(matches!(
        evaluator.evaluate("ed", &product.id, Role::Owner).await,
        Err(ProductError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_evaluate_is_idempotent() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;
    insert_user(&pool, "vera").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();
    evaluator
        .invite("alice", &product.id, "vera", Role::Viewer)
        .await
        .unwrap();

    let first = evaluator.evaluate("vera", &product.id, Role::Editor).await;
    let second = evaluator.evaluate("vera", &product.id, Role::Editor).await;
    assert!(matches!(first, Err(ProductError::Forbidden(_))));
    assert!(matches!(second, Err(ProductError::Forbidden(_))));

    let ok_first = evaluator.evaluate("vera", &product.id, Role::Viewer).await.unwrap();
    let ok_second = evaluator.evaluate("vera", &product.id, Role::Viewer).await.unwrap();
    assert_eq!(ok_first.id, ok_second.id);
}

#[tokio::test]
async fn test_invite_requires_owner() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;
    insert_user(&pool, "ed").await;
    insert_user(&pool, "newbie").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();
    evaluator
        .invite("alice", &product.id, "ed", Role::Editor)
        .await
        .unwrap();

    // A plain editor may not hand out grants.
    let result = evaluator
        .invite("ed", &product.id, "newbie", Role::Viewer)
        .await;
    assert!(matches!(result, Err(ProductError::Forbidden(_))));
}

#[tokio::test]
async fn test_duplicate_invite_is_conflict() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;
    insert_user(&pool, "vera").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    evaluator
        .invite("alice", &product.id, "vera", Role::Viewer)
        .await
        .unwrap();

    let second = evaluator
        .invite("alice", &product.id, "vera", Role::Editor)
        .await;
    match second {
        Err(ProductError::Conflict(msg)) => assert!(msg.contains("already has access")),
        other => panic!("Expected Conflict, got {:?}", other.map(|g| g.role)),
    }

    // The original grant survives untouched.
    let grant = evaluator.get_grant(&product.id, "vera").await.unwrap().unwrap();
    assert_eq!(grant.role, Role::Viewer);
}

#[tokio::test]
async fn test_invite_unknown_user_is_not_found() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    let result = evaluator
        .invite("alice", &product.id, "ghost", Role::Viewer)
        .await;
    assert!(matches!(result, Err(ProductError::NotFound)));
}

#[tokio::test]
async fn test_self_role_change_rejected_even_for_owner() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    let result = evaluator
        .update_role("alice", &product.id, "alice", Role::Viewer)
        .await;
    assert!(matches!(result, Err(ProductError::InvalidOperation(_))));
}

#[tokio::test]
async fn test_self_revoke_rejected_even_for_owner() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    let result = evaluator.revoke("alice", &product.id, "alice").await;
    assert!(matches!(result, Err(ProductError::InvalidOperation(_))));
}

#[tokio::test]
async fn test_update_role_and_revoke_round_trip() {
    let pool = setup_pool().await;
    insert_user(&pool, "alice").await;
    insert_user(&pool, "vera").await;

    let products = ProductStorage::new(pool.clone());
    let evaluator = AccessEvaluator::new(pool);

    let product = products
        .create_product("alice", product_input("Checkout"))
        .await
        .unwrap();

    evaluator
        .invite("alice", &product.id, "vera", Role::Viewer)
        .await
        .unwrap();

    let grant = evaluator
        .update_role("alice", &product.id, "vera", Role::Editor)
        .await
        .unwrap();
    assert_eq!(grant.role, Role::Editor);

    evaluator.revoke("alice", &product.id, "vera").await.unwrap();

    assert!(matches!(
        evaluator.evaluate("vera", &product.id, Role::Viewer).await,
        Err(ProductError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_role_literal_parsing() {
    use std::str::FromStr;

    assert_eq!(Role::from_str("viewer").unwrap(), Role::Viewer);
    assert_eq!(Role::from_str("editor").unwrap(), Role::Editor);
    assert_eq!(Role::from_str("owner").unwrap(), Role::Owner);
    assert!(matches!(
        Role::from_str("admin"),
        Err(ProductError::InvalidInput(_))
    ));
}
