use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoucherType {
    FixedAmount,
    Percentage,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid voucher type: {0:?}")]
pub struct UnknownVoucherType(pub String);

impl Display for VoucherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let voucher_type = match self {
            VoucherType::FixedAmount => "fixed_amount",
            VoucherType::Percentage => "percentage",
        };
        write!(f, "{}", voucher_type)
    }
}

impl FromStr for VoucherType {
    type Err = UnknownVoucherType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fixed_amount" | "FixedAmount" => Ok(VoucherType::FixedAmount),
            "percentage" | "Percentage" => Ok(VoucherType::Percentage),
            other => Err(UnknownVoucherType(other.to_string())),
        }
    }
}
