use std::fmt::Debug;

use log::info;

use crate::traits::{AdminApiError, AdminManagement};

/// `AdminApi` answers one question per privileged command: is this identity allowed to run it?
pub struct AdminApi<B> {
    db: B,
}

impl<B> Debug for AdminApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdminApi")
    }
}

impl<B> AdminApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AdminApi<B>
where B: AdminManagement
{
    pub async fn is_admin(&self, buyer_id: &str) -> Result<bool, AdminApiError> {
        self.db.is_admin(buyer_id).await
    }

    pub async fn add_admin(&self, buyer_id: &str) -> Result<(), AdminApiError> {
        self.db.add_admin(buyer_id).await?;
        info!("👑️ [{buyer_id}] is now an administrator");
        Ok(())
    }

    pub async fn admins(&self) -> Result<Vec<String>, AdminApiError> {
        self.db.fetch_admins().await
    }
}
