//! Callback signature middleware for Actix Web.
//!
//! Tripay signs every payment notification with an HMAC-SHA256 over the raw request body, keyed
//! with the merchant's private key, and sends the hex digest in the `X-Callback-Signature`
//! header. This middleware verifies that signature before the notification reaches the handler.
//!
//! Verification fails closed: a missing header, an unparseable signature, or an unset private
//! key all reject the request with 403. The body bytes are consumed for verification and then
//! re-injected as the request payload so the handler can deserialize them as usual.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorForbidden},
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use tripay_tools::signature::verify_callback_signature;
use warung_common::Secret;

pub struct CallbackSignatureFactory {
    signature_header: String,
    key: Secret<String>,
}

impl CallbackSignatureFactory {
    pub fn new(signature_header: &str, key: Secret<String>) -> Self {
        CallbackSignatureFactory { signature_header: signature_header.into(), key }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CallbackSignatureFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = CallbackSignatureService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CallbackSignatureService {
            signature_header: self.signature_header.clone(),
            key: self.key.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct CallbackSignatureService<S> {
    signature_header: String,
    key: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CallbackSignatureService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.key.reveal().clone();
        let signature_header = self.signature_header.clone();
        Box::pin(async move {
            trace!("🔐️ Checking callback signature for request");
            let data = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to extract request data: {e:?}");
                ErrorBadRequest("Failed to extract request data.")
            })?;
            let provided = req
                .headers()
                .get(&signature_header)
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    warn!("🔐️ No callback signature found in request. Denying access.");
                    ErrorForbidden("No callback signature found.")
                })?
                .to_string();
            if verify_callback_signature(&secret, data.as_ref(), &provided) {
                trace!("🔐️ Callback signature check for request ✅️");
                req.set_payload(bytes_to_payload(data));
                service.call(req).await
            } else {
                warn!("🔐️ Invalid callback signature found in request. Denying access.");
                Err(ErrorForbidden("Invalid callback signature."))
            }
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
