//! Façade behaviour over every storage backend

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use wallet_persistence::{
    BitpayAccountData, DebitCard, FileStorage, LocalStorage, MemoryStorage, Network,
    PersistenceError, PersistenceProvider, Storage,
};

fn backends(temp_dir: &TempDir) -> Vec<Arc<dyn Storage>> {
    vec![
        Arc::new(MemoryStorage::new()),
        Arc::new(FileStorage::with_dir(temp_dir.path().join("files")).unwrap()),
        Arc::new(LocalStorage::in_memory(1024 * 1024)),
    ]
}

#[tokio::test]
async fn test_absent_reads_and_idempotent_removes() {
    let temp_dir = TempDir::new().unwrap();

    for storage in backends(&temp_dir) {
        let name = storage.backend_name();
        let provider = PersistenceProvider::new(storage);

        assert_eq!(provider.get_profile::<Value>().await.unwrap(), None, "{}", name);
        assert_eq!(provider.get_wallet_order("w1").await.unwrap(), None, "{}", name);
        assert_eq!(provider.get_gift_cards("Amazon.com", Network::Livenet).await.unwrap(), None, "{}", name);

        provider.clear_config().await.unwrap();
        provider.remove_tx_history("w1").await.unwrap();
        provider.remove_wallet_group_name("k1").await.unwrap();
        provider.remove_all_wallet_data("w1").await.unwrap();
        provider.remove_all_wallet_group_data("k1").await.unwrap();
    }
}

#[tokio::test]
async fn test_round_trips() {
    let temp_dir = TempDir::new().unwrap();

    for storage in backends(&temp_dir) {
        let name = storage.backend_name();
        let provider = PersistenceProvider::new(storage);

        let profile = json!({"version": "1.0.0", "createdOn": 1_600_000_000, "credentials": []});
        provider.store_profile(&profile).await.unwrap();
        assert_eq!(provider.get_profile::<Value>().await.unwrap(), Some(profile), "{}", name);

        provider.store_last_address("w1", "bc1qaddr").await.unwrap();
        assert_eq!(provider.get_last_address("w1").await.unwrap().as_deref(), Some("bc1qaddr"));

        provider.set_wallet_order("w1", 4).await.unwrap();
        assert_eq!(provider.get_wallet_order("w1").await.unwrap(), Some(4));

        provider.set_coinbase_token(Network::Testnet, "cb").await.unwrap();
        assert_eq!(provider.get_coinbase_token(Network::Testnet).await.unwrap().as_deref(), Some("cb"));

        provider.set_wallet_group_name("k1", "Main").await.unwrap();
        assert_eq!(provider.get_wallet_group_name("k1").await.unwrap().as_deref(), Some("Main"));

        provider.set_hide_wallet_flag("w1", true).await.unwrap();
        assert_eq!(provider.get_hide_wallet_flag("w1").await.unwrap(), Some(true));
    }
}

#[tokio::test]
async fn test_bitpay_registry_over_backends() {
    let temp_dir = TempDir::new().unwrap();

    for storage in backends(&temp_dir) {
        let provider = PersistenceProvider::new(storage);

        provider
            .set_bitpay_account(
                Network::Livenet,
                BitpayAccountData {
                    email: "a@x.io".to_string(),
                    token: "t1".to_string(),
                    family_name: None,
                    given_name: Some("Ann".to_string()),
                },
            )
            .await
            .unwrap();
        provider
            .set_bitpay_debit_cards(Network::Livenet, "a@x.io", vec![DebitCard::new("e1")])
            .await
            .unwrap();

        let err = provider
            .set_bitpay_debit_cards(Network::Livenet, "unknown@example.com", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::UnknownAccount(_)));

        let cards = provider.get_bitpay_debit_cards(Network::Livenet).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].email.as_deref(), Some("a@x.io"));
    }
}

#[tokio::test]
async fn test_file_backend_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("files");

    {
        let provider = PersistenceProvider::new(Arc::new(FileStorage::with_dir(dir.clone()).unwrap()));
        provider.set_backup_group_flag("k1", Some(1_700_000_000_000)).await.unwrap();
        provider.set_gift_cards("Some Brand", Network::Testnet, &Default::default()).await.unwrap();
    }

    let storage = Arc::new(FileStorage::with_dir(dir).unwrap());
    let provider = PersistenceProvider::new(storage.clone());

    assert_eq!(provider.get_backup_group_flag("k1").await.unwrap(), Some(1_700_000_000_000));
    assert_eq!(
        storage.list_keys("giftCards-").await.unwrap(),
        vec!["giftCards-Some Brand-testnet".to_string()]
    );
}
