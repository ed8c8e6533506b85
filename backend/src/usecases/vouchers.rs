use std::{collections::HashSet, sync::Arc};

use anyhow::Context;
use membership_core::domain::{
    entities::vouchers::VoucherEntity,
    repositories::vouchers::VoucherStore,
    value_objects::{
        enums::voucher_types::VoucherType,
        money::{ONE_HUNDRED, parse_decimal},
        vouchers::VoucherSeed,
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::{UseCaseError, UseCaseResult};

/// Seeds the voucher store. Must run once before the server accepts traffic.
pub struct VoucherUseCase<V>
where
    V: VoucherStore + Send + Sync + 'static,
{
    voucher_store: Arc<V>,
}

impl<V> VoucherUseCase<V>
where
    V: VoucherStore + Send + Sync + 'static,
{
    pub fn new(voucher_store: Arc<V>) -> Self {
        Self { voucher_store }
    }

    /// Validates every seed before saving any, so a bad file leaves the store untouched.
    pub async fn seed(&self, seeds: Vec<VoucherSeed>) -> UseCaseResult<Vec<VoucherEntity>> {
        info!(seed_count = seeds.len(), "vouchers: seeding requested");

        let mut seen = HashSet::new();
        let mut vouchers = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let voucher = validate_seed(seed).inspect_err(|err| {
                warn!(status = err.status_code().as_u16(), error = %err, "vouchers: seed rejected");
            })?;
            if !seen.insert(voucher.id.clone()) {
                let err = UseCaseError::InvalidArgument(format!(
                    "duplicate voucher id {:?}",
                    voucher.id
                ));
                warn!(voucher_id = %voucher.id, status = err.status_code().as_u16(), "vouchers: seed rejected");
                return Err(err);
            }
            vouchers.push(voucher);
        }

        for voucher in &vouchers {
            self.voucher_store
                .save(&voucher.id, voucher.clone())
                .await
                .map_err(|err| {
                    error!(voucher_id = %voucher.id, error = ?err, "vouchers: failed to save voucher");
                    UseCaseError::Internal(err)
                })?;
            info!(
                voucher_id = %voucher.id,
                voucher_type = %voucher.voucher_type,
                discount_value = %voucher.discount_value,
                is_active = voucher.is_active,
                "vouchers: voucher seeded"
            );
        }

        Ok(vouchers)
    }
}

/// Reads seeds from a JSON file, or the default set when no path is configured.
pub fn load_seeds(path: Option<&str>) -> anyhow::Result<Vec<VoucherSeed>> {
    let Some(path) = path else {
        return Ok(VoucherSeed::defaults());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read voucher seed file {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("voucher seed file {path} is malformed"))
}

fn validate_seed(seed: VoucherSeed) -> UseCaseResult<VoucherEntity> {
    let voucher_type: VoucherType = seed
        .voucher_type
        .parse()
        .map_err(|_| UseCaseError::InvalidArgument("invalid voucher type".to_string()))?;

    let discount_value = parse_decimal(seed.discount_value.trim())?;
    if discount_value.is_sign_negative() && !discount_value.is_zero() {
        return Err(UseCaseError::InvalidArgument(
            "discount value must not be negative".to_string(),
        ));
    }
    if voucher_type == VoucherType::Percentage && discount_value > ONE_HUNDRED {
        return Err(UseCaseError::InvalidArgument(
            "percentage discount must not exceed 100".to_string(),
        ));
    }

    let id = seed
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Ok(VoucherEntity {
        id,
        voucher_type,
        discount_value: seed.discount_value.trim().to_string(),
        is_active: seed.is_active,
    })
}
