//! Integration tests for the account repository.

mod common;

use common::setup_db;
use mazerp_db::AccountRepository;
use mazerp_shared::AccountKind;

#[tokio::test]
async fn test_create_and_find_by_name() {
    let db = setup_db().await;
    let repo = AccountRepository::users(db);

    let account = repo
        .create("ana", "$argon2id$test_hash")
        .await
        .expect("Failed to create account");
    assert_eq!(account.kind, AccountKind::User);

    let found = repo
        .find_by_name("ana")
        .await
        .expect("Failed to query account")
        .expect("Account should exist");
    assert_eq!(found, account);
    assert!(repo.find_by_name("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let db = setup_db().await;
    let repo = AccountRepository::users(db);

    repo.create("ana", "$argon2id$test_hash").await.unwrap();
    assert!(repo.name_exists("ana").await.unwrap());
    assert!(repo.create("ana", "$argon2id$other").await.is_err());
}

#[tokio::test]
async fn test_users_and_clients_are_separate() {
    let db = setup_db().await;
    let users = AccountRepository::users(db.clone());
    let clients = AccountRepository::clients(db);

    users.create("ana", "$argon2id$test_hash").await.unwrap();

    assert!(!clients.name_exists("ana").await.unwrap());
    let client = clients.create("ana", "$argon2id$test_hash").await.unwrap();
    assert_eq!(client.kind, AccountKind::Client);
}
