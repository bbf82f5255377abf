mod telegram;

pub use telegram::{InlineButton, TelegramApi, TelegramApiError};
