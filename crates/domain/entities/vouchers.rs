use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::voucher_types::VoucherType;

/// A discount instrument. Immutable once saved to the voucher store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherEntity {
    pub id: String,
    pub voucher_type: VoucherType,
    /// Currency amount for fixed vouchers, percentage points for percentage vouchers.
    pub discount_value: String,
    pub is_active: bool,
}
