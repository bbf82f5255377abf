mod callback_signature;

pub use callback_signature::CallbackSignatureFactory;
