//! The chat command surface.
//!
//! [`parse`] turns the text of an incoming chat message into a [`Command`], and [`dispatch`]
//! executes it against the engine APIs and produces the [`Reply`] to send back. The transport is
//! kept out of this module entirely, which is what makes the command set testable without a bot
//! token.
//!
//! Commands are split into the public set (`/start`, `/menu`, `/buy`) and the administrative set
//! (everything else). Administrative commands are gated on membership of the admin set and refuse
//! with a fixed message otherwise.

mod templates;

use log::*;
use tripay_tools::{NewTransactionRequest, OrderItem, TripayApi};
use warung_common::Rupiah;
use warung_engine::{
    db_types::NewProduct,
    helpers::order_reference::OrderRef,
    traits::{AdminManagement, InventoryError, InventoryManagement},
    AdminApi,
    InventoryApi,
};

pub use self::templates::BOT_ERROR;
use crate::{config::CheckoutUrls, errors::ServerError, integrations::InlineButton};

const PAYMENT_METHOD: &str = "QRIS";
const PAYMENT_WINDOW_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Menu,
    Buy(Vec<String>),
    Admin,
    Add(Vec<String>),
    Edit(Vec<String>),
    Harga(Vec<String>),
    Nama(Vec<String>),
    Desk(Vec<String>),
    List,
    Stats,
}

/// The identity of the message sender, as reported by the chat transport.
#[derive(Debug, Clone)]
pub struct Buyer {
    pub id: i64,
    pub first_name: String,
}

/// A reply to send back to the chat, optionally with a single url button attached.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub button: Option<InlineButton>,
}

impl Reply {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self { text: text.into(), button: None }
    }

    pub fn with_button<S: Into<String>>(text: S, button: InlineButton) -> Self {
        Self { text: text.into(), button: Some(button) }
    }
}

/// Parses a chat message into a command. Returns `None` for plain text and unknown commands, both
/// of which are ignored. A `@botname` suffix on the command word is stripped, since Telegram
/// appends one in group chats.
pub fn parse(text: &str) -> Option<Command> {
    let text = text.trim();
    let command_word = text.strip_prefix('/')?;
    let mut words = command_word.split_whitespace();
    let name = words.next()?;
    let name = name.split('@').next()?.to_ascii_lowercase();
    let args = words.map(String::from).collect::<Vec<String>>();
    let command = match name.as_str() {
        "start" => Command::Start,
        "menu" => Command::Menu,
        "buy" => Command::Buy(args),
        "admin" => Command::Admin,
        "add" => Command::Add(args),
        "edit" => Command::Edit(args),
        "harga" => Command::Harga(args),
        "nama" => Command::Nama(args),
        "desk" => Command::Desk(args),
        "list" => Command::List,
        "stats" => Command::Stats,
        _ => return None,
    };
    Some(command)
}

/// Executes a parsed command and produces the reply. Expected user mistakes (unknown product,
/// bad arguments, not enough stock) come back as `Ok` replies; only infrastructure failures
/// surface as errors.
pub async fn dispatch<B>(
    command: Command,
    buyer: &Buyer,
    inventory: &InventoryApi<B>,
    admins: &AdminApi<B>,
    tripay: &TripayApi,
    urls: &CheckoutUrls,
) -> Result<Reply, ServerError>
where
    B: InventoryManagement + AdminManagement,
{
    let is_admin_command = !matches!(command, Command::Start | Command::Menu | Command::Buy(_));
    if is_admin_command && !admins.is_admin(&buyer.id.to_string()).await? {
        debug!("👑️ Buyer [{}] tried an administrative command without access", buyer.id);
        return Ok(Reply::text(templates::NOT_ADMIN));
    }
    match command {
        Command::Start => Ok(Reply::text(templates::welcome(&buyer.first_name))),
        Command::Menu => {
            let products = inventory.products().await?;
            Ok(Reply::text(templates::menu(&products)))
        },
        Command::Buy(args) => buy(&args, buyer, inventory, tripay, urls).await,
        Command::Admin => Ok(Reply::text(templates::ADMIN_MENU)),
        Command::Add(args) => add(&args, inventory).await,
        Command::Edit(args) => {
            let [code] = args.as_slice() else {
                return Ok(Reply::text(templates::EDIT_USAGE));
            };
            match inventory.product(code).await? {
                Some(product) => Ok(Reply::text(templates::product_detail(&product))),
                None => Ok(Reply::text(templates::product_missing(code))),
            }
        },
        Command::Harga(args) => {
            let [code, price] = args.as_slice() else {
                return Ok(Reply::text(templates::HARGA_USAGE));
            };
            let Some(price) = parse_price(price) else {
                return Ok(Reply::text(templates::PRICE_NOT_POSITIVE));
            };
            match inventory.set_price(code, price).await {
                Ok(()) => Ok(Reply::text(templates::price_changed(code, price))),
                Err(InventoryError::ProductNotFound(_)) => Ok(Reply::text(templates::product_missing(code))),
                Err(e) => Err(e.into()),
            }
        },
        Command::Nama(args) => {
            if args.len() < 2 {
                return Ok(Reply::text(templates::NAMA_USAGE));
            }
            let code = &args[0];
            let name = args[1..].join(" ");
            match inventory.set_name(code, &name).await {
                Ok(()) => Ok(Reply::text(templates::name_changed(code, &name))),
                Err(InventoryError::ProductNotFound(_)) => Ok(Reply::text(templates::product_missing(code))),
                Err(e) => Err(e.into()),
            }
        },
        Command::Desk(args) => {
            if args.len() < 2 {
                return Ok(Reply::text(templates::DESK_USAGE));
            }
            let code = &args[0];
            let description = args[1..].join(" ");
            match inventory.set_description(code, &description).await {
                Ok(()) => Ok(Reply::text(templates::description_changed(code))),
                Err(InventoryError::ProductNotFound(_)) => Ok(Reply::text(templates::product_missing(code))),
                Err(e) => Err(e.into()),
            }
        },
        Command::List => {
            let products = inventory.products().await?;
            Ok(Reply::text(templates::product_list(&products)))
        },
        Command::Stats => {
            let summary = inventory.sales_summary().await?;
            Ok(Reply::text(templates::sales_stats(&summary)))
        },
    }
}

/// The purchase flow: validate the request, check stock, create the payment intent, and hand the
/// buyer a checkout link. No state is stored locally; the reference token carries everything
/// needed to fulfil the order when the payment callback arrives.
async fn buy<B>(
    args: &[String],
    buyer: &Buyer,
    inventory: &InventoryApi<B>,
    tripay: &TripayApi,
    urls: &CheckoutUrls,
) -> Result<Reply, ServerError>
where
    B: InventoryManagement,
{
    let [code, quantity] = args else {
        return Ok(Reply::text(templates::BUY_USAGE));
    };
    let Ok(quantity) = quantity.parse::<u32>() else {
        return Ok(Reply::text(templates::QUANTITY_NOT_POSITIVE));
    };
    if quantity == 0 {
        return Ok(Reply::text(templates::QUANTITY_NOT_POSITIVE));
    }
    let product = match inventory.reserve_check(code, quantity).await {
        Ok(product) => product,
        Err(InventoryError::ProductNotFound(_)) => return Ok(Reply::text(templates::PRODUCT_NOT_FOUND)),
        Err(InventoryError::InsufficientStock { available, .. }) => {
            return Ok(Reply::text(templates::insufficient_stock(available)));
        },
        Err(e) => return Err(e.into()),
    };
    let order = OrderRef::new(buyer.id.to_string(), code.clone(), quantity);
    let total = product.price * i64::from(quantity);
    let customer_name = if buyer.first_name.is_empty() { "Customer".to_string() } else { buyer.first_name.clone() };
    let request = NewTransactionRequest {
        method: PAYMENT_METHOD.to_string(),
        merchant_ref: order.token(),
        amount: total.value(),
        customer_name,
        customer_email: format!("{}@telegram.user", buyer.id),
        order_items: vec![OrderItem { name: product.name.clone(), price: product.price, quantity }],
        callback_url: urls.callback_url.clone(),
        return_url: urls.return_url.clone(),
        expired_time: order.created_at.timestamp() + PAYMENT_WINDOW_SECS,
        signature: String::new(),
    };
    match tripay.create_transaction(request).await {
        Ok(detail) => {
            info!("🛒️ Payment intent [{}] created for {order}", detail.reference);
            let button = InlineButton { text: templates::PAY_BUTTON.to_string(), url: detail.checkout_url.clone() };
            Ok(Reply::with_button(templates::order_summary(&product, quantity, total, &detail), button))
        },
        Err(e) => {
            // The buyer gets a generic apology; the operator gets the cause.
            error!("🛒️ Could not create a payment intent for {order}. {e}");
            Ok(Reply::text(templates::PAYMENT_ERROR))
        },
    }
}

/// `/add` doubles as product creation and restocking, distinguished the same way operators
/// already use it: four or more arguments without a `mail:` marker create a product, anything
/// else is treated as one credential to append.
async fn add<B>(args: &[String], inventory: &InventoryApi<B>) -> Result<Reply, ServerError>
where B: InventoryManagement {
    if args.len() < 2 {
        return Ok(Reply::text(templates::ADD_USAGE));
    }
    let code = &args[0];
    let is_new_product = args.len() >= 4 && !args.iter().any(|a| a.contains("mail:"));
    if is_new_product {
        let name = args[1].clone();
        let Some(price) = parse_price(&args[2]) else {
            return Ok(Reply::text(templates::PRICE_NOT_POSITIVE));
        };
        let description = args[3..].join(" ");
        let new_product = NewProduct { code: code.clone(), name: name.clone(), price, description };
        match inventory.add_product(new_product).await {
            Ok(product) => Ok(Reply::text(templates::product_created(&product.code, &product.name, product.price))),
            Err(InventoryError::DuplicateProduct(_)) => Ok(Reply::text(templates::product_exists(code))),
            Err(InventoryError::InvalidPrice) => Ok(Reply::text(templates::PRICE_NOT_POSITIVE)),
            Err(e) => Err(e.into()),
        }
    } else {
        let credential = args[1..].join(" ");
        match inventory.add_stock(code, &credential).await {
            Ok(stock) => Ok(Reply::text(templates::stock_added(code, stock))),
            Err(InventoryError::ProductNotFound(_)) => Ok(Reply::text(templates::product_missing_create_first(code))),
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_price(s: &str) -> Option<Rupiah> {
    let price = s.parse::<i64>().ok().map(Rupiah::from)?;
    price.is_positive().then_some(price)
}

#[cfg(test)]
mod test {
    use super::{parse, Command};

    #[test]
    fn parses_public_commands() {
        assert_eq!(parse("/start"), Some(Command::Start));
        assert_eq!(parse("/menu"), Some(Command::Menu));
        assert_eq!(parse("/buy do3pp 2"), Some(Command::Buy(vec!["do3pp".into(), "2".into()])));
    }

    #[test]
    fn parses_admin_commands() {
        assert_eq!(parse("/admin"), Some(Command::Admin));
        assert_eq!(
            parse("/add do3pp mail: a@b.c pass: hunter2"),
            Some(Command::Add(vec!["do3pp".into(), "mail:".into(), "a@b.c".into(), "pass:".into(), "hunter2".into()]))
        );
        assert_eq!(parse("/harga do3pp 15000"), Some(Command::Harga(vec!["do3pp".into(), "15000".into()])));
        assert_eq!(parse("/list"), Some(Command::List));
        assert_eq!(parse("/stats"), Some(Command::Stats));
    }

    #[test]
    fn strips_bot_name_suffix() {
        assert_eq!(parse("/menu@warung_bot"), Some(Command::Menu));
        assert_eq!(parse("/buy@warung_bot do3pp 1"), Some(Command::Buy(vec!["do3pp".into(), "1".into()])));
    }

    #[test]
    fn ignores_plain_text_and_unknown_commands() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("/frobnicate"), None);
        assert_eq!(parse("/"), None);
    }
}
