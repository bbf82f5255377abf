//! Endpoint tests for the payment callback, driven through the real signature middleware and a
//! real (temporary) SQLite database.
use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use tempfile::TempDir;
use tripay_tools::signature::hmac_sha256_hex;
use warung_common::{Rupiah, Secret};
use warung_engine::{
    db_types::NewProduct,
    helpers::order_reference::OrderRef,
    InventoryApi,
    ReconciliationApi,
    SqliteDatabase,
};

use crate::{
    config::TelegramConfig,
    integrations::TelegramApi,
    middleware::CallbackSignatureFactory,
    routes::tripay_callback,
    server::CALLBACK_SIGNATURE_HEADER,
};

const PRIVATE_KEY: &str = "test-private-key";
// Nothing listens here, so deliveries fail fast and fulfilments stay undelivered.
const DEAD_TELEGRAM: &str = "http://127.0.0.1:9";

async fn new_db(dir: &TempDir) -> SqliteDatabase {
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

fn paid_notification(reference: &str) -> String {
    format!(r#"{{"reference":"T0001","merchant_ref":"{reference}","status":"PAID"}}"#)
}

async fn post_callback(db: &SqliteDatabase, body: &str, signature: Option<&str>) -> (StatusCode, String) {
    let config = TelegramConfig { bot_token: Secret::new("123:token".into()), api_base: DEAD_TELEGRAM.into() };
    let telegram = TelegramApi::new(&config).unwrap();
    let app = App::new()
        .app_data(web::Data::new(ReconciliationApi::new(db.clone())))
        .app_data(web::Data::new(telegram))
        .service(
            web::scope("/tripay-callback")
                .wrap(CallbackSignatureFactory::new(CALLBACK_SIGNATURE_HEADER, Secret::new(PRIVATE_KEY.into())))
                .route("", web::post().to(tripay_callback::<SqliteDatabase>)),
        );
    let service = test::init_service(app).await;
    let mut req = TestRequest::post()
        .uri("/tripay-callback")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string());
    if let Some(signature) = signature {
        req = req.insert_header((CALLBACK_SIGNATURE_HEADER, signature));
    }
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let (_req, res) = res.into_parts();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
        Err(e) => (e.error_response().status(), e.to_string()),
    }
}

#[actix_web::test]
async fn paid_notification_fulfils_with_delivery_pending() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "mail: a@x pass: 1").await.unwrap();

    let reference = OrderRef::new("4242", "do3pp", 1).token();
    let body = paid_notification(&reference);
    let signature = hmac_sha256_hex(PRIVATE_KEY, body.as_bytes());
    let (status, response) = post_callback(&db, &body, Some(&signature)).await;

    assert_eq!(status, StatusCode::OK);
    // The bot endpoint is unreachable, so the fulfilment is committed but not delivered.
    assert!(response.contains("Delivery pending"), "{response}");
    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 0);
    assert_eq!(product.sold, 1);
    let ledger = ReconciliationApi::new(db.clone()).fulfilment(&reference).await.unwrap().unwrap();
    assert!(!ledger.delivered);
    assert_eq!(ledger.buyer_id, "4242");
}

#[actix_web::test]
async fn replayed_notification_deducts_stock_once() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "cred-1").await.unwrap();
    inventory.add_stock("do3pp", "cred-2").await.unwrap();

    let reference = OrderRef::new("4242", "do3pp", 1).token();
    let body = paid_notification(&reference);
    let signature = hmac_sha256_hex(PRIVATE_KEY, body.as_bytes());

    let (status, _) = post_callback(&db, &body, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, response) = post_callback(&db, &body, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.contains("already processed"), "{response}");

    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 1);
    assert_eq!(product.sold, 1);
}

#[actix_web::test]
async fn forged_signature_is_rejected_without_mutation() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "cred-1").await.unwrap();

    let reference = OrderRef::new("4242", "do3pp", 1).token();
    let body = paid_notification(&reference);
    let forged = hmac_sha256_hex("some-other-key", body.as_bytes());

    let (status, _) = post_callback(&db, &body, Some(&forged)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = post_callback(&db, &body, Some("not-even-hex")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = post_callback(&db, &body, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 1);
    assert_eq!(product.sold, 0);
    assert!(ReconciliationApi::new(db.clone()).fulfilment(&reference).await.unwrap().is_none());
}

#[actix_web::test]
async fn non_paid_statuses_leave_stock_untouched() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "cred-1").await.unwrap();

    let reference = OrderRef::new("4242", "do3pp", 1).token();
    for status_name in ["EXPIRED", "FAILED", "PENDING"] {
        let body = format!(r#"{{"merchant_ref":"{reference}","status":"{status_name}"}}"#);
        let signature = hmac_sha256_hex(PRIVATE_KEY, body.as_bytes());
        let (status, _) = post_callback(&db, &body, Some(&signature)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 1);
    assert_eq!(product.sold, 0);
}

#[actix_web::test]
async fn undecodable_reference_is_acknowledged_and_dropped() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;

    let body = r#"{"merchant_ref":"not-an-order-token","status":"PAID"}"#;
    let signature = hmac_sha256_hex(PRIVATE_KEY, body.as_bytes());
    let (status, response) = post_callback(&db, body, Some(&signature)).await;

    // 200 on purpose: a retry can never make a malformed reference decodable.
    assert_eq!(status, StatusCode::OK);
    assert!(response.contains("\"success\":false"), "{response}");
    assert!(response.contains("Invalid order reference"), "{response}");
}

#[actix_web::test]
async fn paid_order_without_stock_requests_manual_refund() {
    let dir = TempDir::new().unwrap();
    let db = new_db(&dir).await;
    let inventory = InventoryApi::new(db.clone());
    inventory.add_product(do3pp()).await.unwrap();
    inventory.add_stock("do3pp", "cred-1").await.unwrap();

    let reference = OrderRef::new("4242", "do3pp", 2).token();
    let body = paid_notification(&reference);
    let signature = hmac_sha256_hex(PRIVATE_KEY, body.as_bytes());
    let (status, response) = post_callback(&db, &body, Some(&signature)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response.contains("Manual refund required"), "{response}");
    let product = inventory.product("do3pp").await.unwrap().unwrap();
    assert_eq!(product.stock, 1);
    assert_eq!(product.sold, 0);
}
