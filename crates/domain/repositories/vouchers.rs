use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::vouchers::VoucherEntity;

/// Keyed voucher definitions. Seeded once before serving, read-only afterwards.
#[async_trait]
#[automock]
pub trait VoucherStore {
    async fn save(&self, voucher_id: &str, voucher: VoucherEntity) -> Result<()>;

    async fn exists(&self, voucher_id: &str) -> Result<bool>;

    async fn load(&self, voucher_id: &str) -> Result<Option<VoucherEntity>>;
}
