//! The Indonesian reply texts for the chat command surface.
//!
//! Customer-facing strings are kept in one place so the wording can be tuned without touching the
//! dispatch logic. Prices render through [`Rupiah`]'s `Display`, which uses the Indonesian
//! thousands separator.

use tripay_tools::TransactionDetail;
use warung_common::Rupiah;
use warung_engine::db_types::{Product, SalesSummary};

pub const NOT_ADMIN: &str = "Anda tidak memiliki akses admin.";
pub const PRODUCT_NOT_FOUND: &str = "Produk tidak ditemukan.";
pub const PAYMENT_ERROR: &str = "Terjadi kesalahan saat memproses pembayaran. Silahkan coba lagi nanti.";
pub const BOT_ERROR: &str = "Terjadi kesalahan pada bot. Silahkan coba lagi nanti.";
pub const BUY_USAGE: &str = "Format salah. Gunakan: /buy [kode] [jumlah]";
pub const QUANTITY_NOT_POSITIVE: &str = "Jumlah harus berupa angka positif.";
pub const PRICE_NOT_POSITIVE: &str = "Harga harus berupa angka positif.";
pub const ADD_USAGE: &str = "Format salah. Gunakan:\n/add [kode] [nama] [harga] [deskripsi]\nAtau untuk menambah \
                            stok:\n/add [kode] [mail: ... pass: ... 2vl: ...]";
pub const EDIT_USAGE: &str = "Format salah. Gunakan: /edit [kode]";
pub const HARGA_USAGE: &str = "Format salah. Gunakan: /harga [kode] [harga baru]";
pub const NAMA_USAGE: &str = "Format salah. Gunakan: /nama [kode] [nama baru]";
pub const DESK_USAGE: &str = "Format salah. Gunakan: /desk [kode] [deskripsi baru]";
pub const PAY_BUTTON: &str = "💳 Bayar Sekarang";

pub const ADMIN_MENU: &str = "👑 ADMIN MENU 👑\n\n\
                              📌 Perintah admin:\n\n\
                              /add [kode] [nama] [harga] [deskripsi] - Menambahkan produk baru\n\
                              /add [kode] [mail: email pass: password 2vl: kode] - Menambah stok\n\
                              /edit [kode] - Mengubah detail produk\n\
                              /harga [kode] [harga baru] - Mengubah harga produk\n\
                              /list - Melihat semua produk\n\
                              /stats - Melihat statistik penjualan";

pub fn welcome(first_name: &str) -> String {
    let name = if first_name.is_empty() { "pelanggan" } else { first_name };
    format!("Selamat datang, {name}! 👋\n\nGunakan /menu untuk melihat daftar produk yang tersedia.")
}

pub fn menu(products: &[Product]) -> String {
    let mut text = String::from(
        "【 PRODUCT LIST 📦 】━\n\
         • Cara membeli produk ketik perintah berikut\n\
         • /buy kodeproduk jumlah\n\
         • Contoh: /buy do3pp 2\n\
         • Pastikan kode dan jumlah akun sudah benar\n\
         ┗━━━━━━━━━━━━━━━━\n\n",
    );
    for product in products {
        text.push_str(&format!("━【 {} 】━\n", product.name));
        text.push_str(&format!("• 🔑| Kode: {}\n", product.code));
        text.push_str(&format!("• 💰| Harga: {}\n", product.price));
        text.push_str(&format!("• 📦| Stok Tersedia: {}\n", product.stock));
        text.push_str(&format!("• 📊| Stok Terjual: {}\n", product.sold));
        text.push_str(&format!("• 📝| Desk: {}\n", product.description));
        text.push_str(&format!("• 👉| Ketik: /buy {} 1\n", product.code));
        text.push_str("┗━━━━━━━━━━━━━━━━\n\n");
    }
    text
}

pub fn insufficient_stock(available: i64) -> String {
    format!("Stok tidak mencukupi. Stok tersedia: {available}")
}

pub fn order_summary(product: &Product, quantity: u32, total: Rupiah, detail: &TransactionDetail) -> String {
    format!(
        "🛒 Detail Pemesanan:\n\n\
         Produk: {}\n\
         Kode: {}\n\
         Jumlah: {quantity}\n\
         Harga: {}\n\
         Total: {total}\n\n\
         Silahkan scan QR code atau klik link berikut untuk melakukan pembayaran:\n{}\n\n\
         Order ID: {}\n\
         Pembayaran akan kadaluarsa dalam 24 jam.",
        product.name, product.code, product.price, detail.checkout_url, detail.merchant_ref
    )
}

pub fn product_created(code: &str, name: &str, price: Rupiah) -> String {
    format!("Produk baru berhasil ditambahkan:\nKode: {code}\nNama: {name}\nHarga: {price}")
}

pub fn product_exists(code: &str) -> String {
    format!("Produk dengan kode {code} sudah ada. Gunakan /edit untuk mengubah detail.")
}

pub fn product_missing(code: &str) -> String {
    format!("Produk dengan kode {code} tidak ditemukan.")
}

pub fn product_missing_create_first(code: &str) -> String {
    format!("Produk dengan kode {code} tidak ditemukan. Buat produk baru terlebih dahulu.")
}

pub fn stock_added(code: &str, stock: i64) -> String {
    format!("Stok berhasil ditambahkan untuk {code}. Total stok sekarang: {stock}")
}

pub fn product_detail(product: &Product) -> String {
    format!(
        "Detail produk {code}:\n\n\
         Nama: {}\n\
         Harga: {}\n\
         Deskripsi: {}\n\
         Stok: {}\n\
         Terjual: {}\n\n\
         Gunakan perintah berikut untuk mengubah:\n\
         /harga {code} [harga baru]\n\
         /nama {code} [nama baru]\n\
         /desk {code} [deskripsi baru]",
        product.name,
        product.price,
        product.description,
        product.stock,
        product.sold,
        code = product.code,
    )
}

pub fn price_changed(code: &str, price: Rupiah) -> String {
    format!("Harga produk {code} berhasil diubah menjadi {price}")
}

pub fn name_changed(code: &str, name: &str) -> String {
    format!("Nama produk {code} berhasil diubah menjadi \"{name}\"")
}

pub fn description_changed(code: &str) -> String {
    format!("Deskripsi produk {code} berhasil diubah.")
}

pub fn product_list(products: &[Product]) -> String {
    let mut text = String::from("📋 DAFTAR PRODUK 📋\n\n");
    for product in products {
        text.push_str(&format!("Kode: {}\n", product.code));
        text.push_str(&format!("Nama: {}\n", product.name));
        text.push_str(&format!("Harga: {}\n", product.price));
        text.push_str(&format!("Stok: {}\n", product.stock));
        text.push_str(&format!("Terjual: {}\n", product.sold));
        text.push_str("------------------\n");
    }
    text
}

pub fn sales_stats(summary: &[SalesSummary]) -> String {
    let mut text = String::from("📊 STATISTIK PENJUALAN 📊\n\n");
    let mut total_sold = 0;
    let mut total_revenue = Rupiah::default();
    for line in summary {
        total_sold += line.sold;
        total_revenue = total_revenue + line.revenue;
        text.push_str(&format!("{}: {} terjual ({})\n", line.code, line.sold, line.revenue));
    }
    text.push_str(&format!("\nTotal: {total_sold} produk terjual\n"));
    text.push_str(&format!("Total Pendapatan: {total_revenue}"));
    text
}
