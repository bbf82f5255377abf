mod admin_api;
mod inventory_api;
mod reconciliation_api;

pub use admin_api::AdminApi;
pub use inventory_api::InventoryApi;
pub use reconciliation_api::ReconciliationApi;
