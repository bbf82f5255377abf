//! End-to-end engine tests against a real (temporary) SQLite database.
use tempfile::TempDir;
use warung_common::Rupiah;
use warung_engine::{
    db_types::{FulfilmentOutcome, NewProduct, PaymentStatus},
    helpers::order_reference::OrderRef,
    traits::{AdminManagement, FulfilmentError, InventoryError, InventoryManagement},
    InventoryApi,
    ReconciliationApi,
    SqliteDatabase,
};

async fn new_db(dir: &TempDir) -> SqliteDatabase {
    let _ = env_logger::try_init().ok();
    let path = dir.path().join("store.db");
    let url = format!("sqlite://{}", path.display());
    SqliteDatabase::new_with_url(&url, 5).await.expect("Could not create test database")
}

fn do3pp() -> NewProduct {
    NewProduct {
        code: "do3pp".into(),
        name: "Dor3amon Premium".into(),
        price: Rupiah::from(10_000),
        description: "Akun premium 30 hari".into(),
    }
}

#[tokio::test]
async fn paid_order_is_fulfilled_fifo() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    let reconciliation = ReconciliationApi::new(db.clone());

    inventory.add_product(do3pp()).await.unwrap();
    assert_eq!(inventory.add_stock("do3pp", "mail: a@x pass: 1").await.unwrap(), 1);
    assert_eq!(inventory.add_stock("do3pp", "mail: b@x pass: 2").await.unwrap(), 2);

    let order = OrderRef::new("555001", "do3pp", 2);
    let reference = order.token();
    let outcome = reconciliation.reconcile(&reference, PaymentStatus::Paid).await.unwrap();
    match outcome {
        FulfilmentOutcome::Fulfilled { product_name, credentials, .. } => {
            assert_eq!(product_name, "Dor3amon Premium");
            // Oldest credential first.
            assert_eq!(credentials, vec!["mail: a@x pass: 1".to_string(), "mail: b@x pass: 2".to_string()]);
        },
        other => panic!("Expected fulfilment, got {other:?}"),
    }

    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 0);
    assert_eq!(product.sold, 2);

    let ledger = reconciliation.fulfilment(&reference).await.unwrap().unwrap();
    assert!(!ledger.delivered);
    reconciliation.mark_delivered(&reference).await.unwrap();
    let ledger = reconciliation.fulfilment(&reference).await.unwrap().unwrap();
    assert!(ledger.delivered);
}

#[tokio::test]
async fn replayed_notification_deducts_stock_once() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    let reconciliation = ReconciliationApi::new(db.clone());

    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "cred-1").await.unwrap();
    inventory.add_stock("do3pp", "cred-2").await.unwrap();

    let reference = OrderRef::new("555002", "do3pp", 1).token();
    let first = reconciliation.reconcile(&reference, PaymentStatus::Paid).await.unwrap();
    assert!(matches!(first, FulfilmentOutcome::Fulfilled { .. }));
    let replay = reconciliation.reconcile(&reference, PaymentStatus::Paid).await.unwrap();
    assert!(matches!(replay, FulfilmentOutcome::AlreadyFulfilled { .. }));

    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 1);
    assert_eq!(product.sold, 1);

    let summary = inventory.sales_summary().await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].sold, 1);
    assert_eq!(summary[0].revenue, Rupiah::from(10_000));
}

#[tokio::test]
async fn concurrent_fulfilments_never_oversell() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());

    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "the-only-one").await.unwrap();

    let ref_a = OrderRef::new("buyer-a", "do3pp", 1).token();
    let ref_b = OrderRef::new("buyer-b", "do3pp", 1).token();
    let api_a = ReconciliationApi::new(db.clone());
    let api_b = ReconciliationApi::new(db.clone());
    let (a, b) = tokio::join!(
        api_a.reconcile(&ref_a, PaymentStatus::Paid),
        api_b.reconcile(&ref_b, PaymentStatus::Paid)
    );
    let outcomes = [a.unwrap(), b.unwrap()];
    let fulfilled = outcomes.iter().filter(|o| matches!(o, FulfilmentOutcome::Fulfilled { .. })).count();
    let starved = outcomes.iter().filter(|o| matches!(o, FulfilmentOutcome::InsufficientStock { .. })).count();
    assert_eq!(fulfilled, 1, "exactly one buyer may win the last unit");
    assert_eq!(starved, 1);

    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 0);
    assert_eq!(product.sold, 1);
}

#[tokio::test]
async fn insufficient_stock_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    let reconciliation = ReconciliationApi::new(db.clone());

    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "cred-1").await.unwrap();

    let reference = OrderRef::new("555003", "do3pp", 5).token();
    let outcome = reconciliation.reconcile(&reference, PaymentStatus::Paid).await.unwrap();
    match outcome {
        FulfilmentOutcome::InsufficientStock { available, .. } => assert_eq!(available, 1),
        other => panic!("Expected insufficient stock, got {other:?}"),
    }
    // The ledger entry was rolled back with the rest of the transaction, so a restock can still
    // fulfil this reference.
    assert!(reconciliation.fulfilment(&reference).await.unwrap().is_none());
    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 1);
    assert_eq!(product.sold, 0);

    for i in 0..4 {
        inventory.add_stock("do3pp", &format!("cred-{}", i + 2)).await.unwrap();
    }
    let outcome = reconciliation.reconcile(&reference, PaymentStatus::Paid).await.unwrap();
    assert!(matches!(outcome, FulfilmentOutcome::Fulfilled { .. }));
}

#[tokio::test]
async fn non_paid_statuses_do_not_mutate() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    let reconciliation = ReconciliationApi::new(db.clone());

    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "cred-1").await.unwrap();

    let reference = OrderRef::new("555004", "do3pp", 1).token();
    for status in [PaymentStatus::Failed, PaymentStatus::Expired, PaymentStatus::Pending] {
        let outcome = reconciliation.reconcile(&reference, status).await.unwrap();
        assert!(!matches!(outcome, FulfilmentOutcome::Fulfilled { .. }));
    }
    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 1);
    assert_eq!(product.sold, 0);
}

#[tokio::test]
async fn malformed_reference_is_rejected() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let reconciliation = ReconciliationApi::new(db.clone());
    let err = reconciliation.reconcile("ORDER-1234567890", PaymentStatus::Paid).await.unwrap_err();
    assert!(matches!(err, FulfilmentError::InvalidReference(_)));
}

#[tokio::test]
async fn inventory_invariants_and_admin_set() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());

    inventory.add_product(do3pp()).await.unwrap();
    let err = inventory.add_product(do3pp()).await.unwrap_err();
    assert!(matches!(err, InventoryError::DuplicateProduct(_)));

    let err = inventory.reserve_check("do3pp", 1).await.unwrap_err();
    assert!(matches!(err, InventoryError::InsufficientStock { available: 0, .. }));
    let err = inventory.reserve_check("ghost", 1).await.unwrap_err();
    assert!(matches!(err, InventoryError::ProductNotFound(_)));

    inventory.add_stock("do3pp", "cred-1").await.unwrap();
    assert!(inventory.reserve_check("do3pp", 1).await.is_ok());

    inventory.set_price("do3pp", Rupiah::from(12_500)).await.unwrap();
    inventory.set_name("do3pp", "Dor3amon Plus").await.unwrap();
    inventory.set_description("do3pp", "Akun premium 60 hari").await.unwrap();
    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.price, Rupiah::from(12_500));
    assert_eq!(product.name, "Dor3amon Plus");
    assert_eq!(product.description, "Akun premium 60 hari");

    let err = inventory.set_price("do3pp", Rupiah::from(0)).await.unwrap_err();
    assert!(matches!(err, InventoryError::InvalidPrice));

    assert!(!db.is_admin("777").await.unwrap());
    db.add_admin("777").await.unwrap();
    db.add_admin("777").await.unwrap();
    assert!(db.is_admin("777").await.unwrap());
    assert_eq!(db.fetch_admins().await.unwrap(), vec!["777".to_string()]);
}
