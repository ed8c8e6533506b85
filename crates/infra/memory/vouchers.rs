use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::{entities::vouchers::VoucherEntity, repositories::vouchers::VoucherStore};

/// Voucher store backed by a read-write lock. Readers never block each other.
#[derive(Default)]
pub struct InMemoryVoucherStore {
    vouchers: RwLock<HashMap<String, VoucherEntity>>,
}

impl InMemoryVoucherStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoucherStore for InMemoryVoucherStore {
    async fn save(&self, voucher_id: &str, voucher: VoucherEntity) -> Result<()> {
        self.vouchers
            .write()
            .await
            .insert(voucher_id.to_string(), voucher);
        Ok(())
    }

    async fn exists(&self, voucher_id: &str) -> Result<bool> {
        Ok(self.vouchers.read().await.contains_key(voucher_id))
    }

    async fn load(&self, voucher_id: &str) -> Result<Option<VoucherEntity>> {
        Ok(self.vouchers.read().await.get(voucher_id).cloned())
    }
}
