use crate::traits::AdminApiError;

/// The `AdminManagement` trait defines behaviour for the set of identities authorised to run
/// privileged storefront commands. The set is small and flat; membership is checked on every
/// privileged operation rather than cached.
#[allow(async_fn_in_trait)]
pub trait AdminManagement: Clone {
    /// Checks whether the given identity is an administrator.
    async fn is_admin(&self, buyer_id: &str) -> Result<bool, AdminApiError>;

    /// Adds an identity to the admin set. Idempotent.
    async fn add_admin(&self, buyer_id: &str) -> Result<(), AdminApiError>;

    /// Lists all administrator identities.
    async fn fetch_admins(&self) -> Result<Vec<String>, AdminApiError>;
}
