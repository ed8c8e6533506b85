use serde::{Deserialize, Serialize};

/// Voucher definition as read from a seed file. Validated before it reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoucherSeed {
    #[serde(default)]
    pub id: Option<String>,
    pub voucher_type: String,
    pub discount_value: String,
    pub is_active: bool,
}

impl VoucherSeed {
    pub fn new(voucher_type: &str, discount_value: &str, is_active: bool) -> Self {
        Self {
            id: None,
            voucher_type: voucher_type.to_string(),
            discount_value: discount_value.to_string(),
            is_active,
        }
    }

    /// Seeds used when no seed file is configured.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("fixed_amount", "5", true),
            Self::new("percentage", "10", true),
            Self::new("percentage", "10", false),
        ]
    }
}
