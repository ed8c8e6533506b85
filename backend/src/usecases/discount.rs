//! Voucher discounts on a plan's price and tax.
//!
//! A fixed-amount voucher is taken off the price directly. For the tax it is first turned
//! into the equivalent percentage of the price (rounded to two digits) so that price and tax
//! are discounted in the same proportion.

use membership_core::domain::{
    entities::vouchers::VoucherEntity,
    value_objects::{
        enums::voucher_types::VoucherType,
        money::{Amount, Money, MoneyError, ONE_HUNDRED, parse_decimal, round_to_scale},
    },
};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscountError {
    #[error(transparent)]
    Money(#[from] MoneyError),
    #[error("invalid voucher")]
    InactiveVoucher,
}

impl DiscountError {
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            DiscountError::Money(err) => err.is_invalid_argument(),
            DiscountError::InactiveVoucher => true,
        }
    }
}

pub fn apply_discount_on_price(
    price: &Money,
    voucher: Option<&VoucherEntity>,
) -> Result<Money, DiscountError> {
    let Some(voucher) = usable_voucher(voucher)? else {
        return Ok(price.clone());
    };

    let price_amount = price.to_amount()?;
    let discounted = match voucher.voucher_type {
        VoucherType::FixedAmount => {
            let discount = Amount::parse(price_amount.currency_code(), &voucher.discount_value)?;
            price_amount.sub(&discount)?
        }
        VoucherType::Percentage => {
            apply_percentage(&price_amount, parse_decimal(&voucher.discount_value)?)?
        }
    };

    Ok(discounted.to_money())
}

pub fn apply_discount_on_tax(
    price: &Money,
    tax: &Money,
    voucher: Option<&VoucherEntity>,
) -> Result<Money, DiscountError> {
    let Some(voucher) = usable_voucher(voucher)? else {
        return Ok(tax.clone());
    };

    let tax_amount = tax.to_amount()?;
    let percentage = match voucher.voucher_type {
        VoucherType::Percentage => parse_decimal(&voucher.discount_value)?,
        VoucherType::FixedAmount => {
            let price_amount = price.to_amount()?;
            if price_amount.currency_code() != tax_amount.currency_code() {
                return Err(MoneyError::CurrencyMismatch {
                    left: price_amount.currency_code().to_string(),
                    right: tax_amount.currency_code().to_string(),
                }
                .into());
            }
            fixed_to_percentage(&price_amount, &voucher.discount_value)?
        }
    };

    Ok(apply_percentage(&tax_amount, percentage)?.to_money())
}

/// `discount * 100 / price`, rounded to two digits.
pub fn fixed_to_percentage(price: &Amount, discount_value: &str) -> Result<Decimal, MoneyError> {
    let discount = parse_decimal(discount_value)?;
    if price.value().is_zero() {
        return Err(MoneyError::DivisionByZero);
    }

    let percentage = discount
        .checked_mul(ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(price.value()))
        .ok_or(MoneyError::Overflow)?;

    Ok(round_to_scale(percentage))
}

fn apply_percentage(amount: &Amount, percentage: Decimal) -> Result<Amount, MoneyError> {
    let discount = amount
        .mul_by_factor(percentage)?
        .div_by_factor(ONE_HUNDRED)?;
    amount.sub(&discount)
}

/// `None` when there is nothing to apply. An inactive voucher is an error, never a no-op.
fn usable_voucher(
    voucher: Option<&VoucherEntity>,
) -> Result<Option<&VoucherEntity>, DiscountError> {
    match voucher {
        Some(voucher) if voucher.discount_value.trim().is_empty() => Ok(None),
        Some(voucher) if !voucher.is_active => Err(DiscountError::InactiveVoucher),
        other => Ok(other),
    }
}
