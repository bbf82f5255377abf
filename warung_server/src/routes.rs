//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Two inbound surfaces exist:
//! * `/tripay-callback` receives payment notifications from the gateway. The signature middleware
//!   has already authenticated the body by the time the handler runs, so everything here may
//!   trust the payload. The handler always acknowledges authenticated notifications with 200,
//!   even when the outcome is "nothing to do", so that the gateway stops retrying.
//! * `/telegram-update` receives chat messages from the Telegram webhook. Telegram treats any
//!   non-200 as "try again later", so command failures are answered in chat and the HTTP
//!   response stays 200.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use tripay_tools::TripayApi;
use warung_engine::{
    db_types::FulfilmentOutcome,
    traits::{AdminManagement, FulfilmentDatabase, FulfilmentError, InventoryManagement},
    AdminApi,
    InventoryApi,
    ReconciliationApi,
};

use crate::{
    commands::{self, Buyer, Reply},
    config::CheckoutUrls,
    data_objects::{JsonResponse, PaymentNotification, TelegramUpdate},
    errors::ServerError,
    integrations::TelegramApi,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//------------------------------------------   Tripay callback  ------------------------------------------------
/// Route handler for authenticated Tripay payment notifications.
///
/// Reconciliation and delivery are deliberately separate steps. The stock deduction commits
/// first; if the chat delivery then fails, the fulfilment stays in the ledger as undelivered and
/// an operator resends the credentials by hand. A replayed notification can never turn into a
/// second deduction, so acknowledging with 200 is always safe once reconciliation returns.
pub async fn tripay_callback<B: FulfilmentDatabase>(
    api: web::Data<ReconciliationApi<B>>,
    telegram: web::Data<TelegramApi>,
    body: web::Json<PaymentNotification>,
) -> Result<HttpResponse, ServerError> {
    let notification = body.into_inner();
    let reference = notification.merchant_ref;
    debug!("💻️ Payment notification for [{reference}]: {}", notification.status);
    let outcome = match api.reconcile(&reference, notification.status).await {
        Ok(outcome) => outcome,
        Err(FulfilmentError::InvalidReference(e)) => {
            // Authenticated but undecodable. Retrying cannot fix it, so acknowledge and drop.
            warn!("💻️ Notification for [{reference}] carries an invalid reference. {e}");
            return Ok(HttpResponse::Ok().json(JsonResponse::failure("Invalid order reference")));
        },
        Err(e) => return Err(e.into()),
    };
    let response = match outcome {
        FulfilmentOutcome::Fulfilled { order, product_name, credentials } => {
            match deliver(&telegram, &order.buyer_id, &product_name, &credentials).await {
                Ok(()) => {
                    api.mark_delivered(&reference).await?;
                    JsonResponse::success("Order fulfilled and delivered")
                },
                Err(e) => {
                    error!(
                        "💻️ [{reference}] is fulfilled but the credentials could not be delivered to buyer [{}]. \
                         Resend them manually. {e}",
                        order.buyer_id
                    );
                    JsonResponse::success("Order fulfilled. Delivery pending")
                },
            }
        },
        FulfilmentOutcome::AlreadyFulfilled { .. } => JsonResponse::success("Order already processed"),
        FulfilmentOutcome::InsufficientStock { order, available } => {
            warn!(
                "💻️ Paid order [{reference}] could not be fulfilled: {} in stock. Refund buyer [{}] manually.",
                available, order.buyer_id
            );
            if let Ok(buyer) = order.buyer_id.parse::<i64>() {
                // Best effort. The operator alert above is the real record.
                let _ = telegram
                    .send_message(buyer, "Maaf, stok produk habis. Pembayaran Anda akan dikembalikan oleh admin.")
                    .await;
            }
            JsonResponse::failure("Insufficient stock. Manual refund required")
        },
        FulfilmentOutcome::Cancelled { status, .. } => JsonResponse::success(format!("Order closed as {status}")),
        FulfilmentOutcome::Pending { .. } => JsonResponse::success("Acknowledged. Awaiting payment"),
    };
    Ok(HttpResponse::Ok().json(response))
}

async fn deliver(
    telegram: &TelegramApi,
    buyer_id: &str,
    product_name: &str,
    credentials: &[String],
) -> Result<(), ServerError> {
    let buyer = buyer_id
        .parse::<i64>()
        .map_err(|e| ServerError::InvalidRequestBody(format!("Buyer id [{buyer_id}] is not a chat id: {e}")))?;
    telegram.deliver(buyer, product_name, credentials).await?;
    Ok(())
}

//------------------------------------------   Telegram webhook  -----------------------------------------------
/// Route handler for the Telegram bot webhook.
///
/// Non-message updates, plain text, and unknown commands are acknowledged without action.
pub async fn telegram_update<B: InventoryManagement + AdminManagement>(
    inventory: web::Data<InventoryApi<B>>,
    admins: web::Data<AdminApi<B>>,
    tripay: web::Data<TripayApi>,
    telegram: web::Data<TelegramApi>,
    urls: web::Data<CheckoutUrls>,
    body: web::Json<TelegramUpdate>,
) -> Result<HttpResponse, ServerError> {
    let update = body.into_inner();
    let ack = || HttpResponse::Ok().json(JsonResponse::success("ok"));
    let Some(message) = update.message else {
        return Ok(ack());
    };
    let (Some(from), Some(text)) = (message.from, message.text) else {
        return Ok(ack());
    };
    let Some(command) = commands::parse(&text) else {
        return Ok(ack());
    };
    let buyer = Buyer { id: from.id, first_name: from.first_name };
    trace!("💻️ Command from buyer [{}]: {command:?}", buyer.id);
    let reply = match commands::dispatch(command, &buyer, &inventory, &admins, &tripay, &urls).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("💻️ Command from buyer [{}] failed. {e}", buyer.id);
            Reply::text(commands::BOT_ERROR)
        },
    };
    let sent = match &reply.button {
        Some(button) => telegram.send_message_with_button(message.chat.id, &reply.text, button).await,
        None => telegram.send_message(message.chat.id, &reply.text).await,
    };
    if let Err(e) = sent {
        error!("💻️ Could not send reply to chat [{}]. {e}", message.chat.id);
    }
    Ok(ack())
}
