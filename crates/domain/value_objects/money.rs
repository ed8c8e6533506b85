use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fractional digits kept when an amount is persisted or displayed.
pub const MONEY_SCALE: u32 = 2;

pub const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),
    #[error("currency mismatch: {left} and {right}")]
    CurrencyMismatch { left: String, right: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
}

impl MoneyError {
    /// Overflow is the only failure that is not caused by the caller's input.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, MoneyError::Overflow)
    }
}

/// Money as it is stored and exchanged: an ISO 4217 code plus a decimal string.
///
/// Arithmetic goes through [`Amount`], which holds the parsed exact decimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency_code: String,
    pub amount: String,
}

impl Money {
    pub fn new(currency_code: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            currency_code: currency_code.into(),
            amount: amount.into(),
        }
    }

    pub fn to_amount(&self) -> Result<Amount, MoneyError> {
        Amount::parse(&self.currency_code, &self.amount)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency_code)
    }
}

/// Exact decimal amount scoped to a currency. Never rounded until [`Amount::round`] or
/// [`Amount::to_money`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    currency_code: String,
    value: Decimal,
}

impl Amount {
    pub fn new(currency_code: &str, value: Decimal) -> Result<Self, MoneyError> {
        validate_currency_code(currency_code)?;
        Ok(Self {
            currency_code: currency_code.to_string(),
            value,
        })
    }

    pub fn parse(currency_code: &str, raw: &str) -> Result<Self, MoneyError> {
        Self::new(currency_code, parse_decimal(raw)?)
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    pub fn add(&self, other: &Amount) -> Result<Amount, MoneyError> {
        self.ensure_same_currency(other)?;
        let value = self
            .value
            .checked_add(other.value)
            .ok_or(MoneyError::Overflow)?;
        Ok(self.with_value(value))
    }

    pub fn sub(&self, other: &Amount) -> Result<Amount, MoneyError> {
        self.ensure_same_currency(other)?;
        let value = self
            .value
            .checked_sub(other.value)
            .ok_or(MoneyError::Overflow)?;
        Ok(self.with_value(value))
    }

    pub fn mul_by_factor(&self, factor: Decimal) -> Result<Amount, MoneyError> {
        let value = self.value.checked_mul(factor).ok_or(MoneyError::Overflow)?;
        Ok(self.with_value(value))
    }

    pub fn div_by_factor(&self, factor: Decimal) -> Result<Amount, MoneyError> {
        if factor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let value = self.value.checked_div(factor).ok_or(MoneyError::Overflow)?;
        Ok(self.with_value(value))
    }

    pub fn round(&self) -> Amount {
        self.with_value(round_to_scale(self.value))
    }

    /// Rounds once and renders the persisted representation.
    pub fn to_money(&self) -> Money {
        Money {
            currency_code: self.currency_code.clone(),
            amount: round_to_scale(self.value).to_string(),
        }
    }

    fn with_value(&self, value: Decimal) -> Amount {
        Amount {
            currency_code: self.currency_code.clone(),
            value,
        }
    }

    fn ensure_same_currency(&self, other: &Amount) -> Result<(), MoneyError> {
        if self.currency_code != other.currency_code {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency_code.clone(),
                right: other.currency_code.clone(),
            });
        }
        Ok(())
    }
}

/// Rounds half away from zero to [`MONEY_SCALE`] digits and pads to exactly that scale.
pub fn round_to_scale(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Parses a plain signed decimal literal (`-12`, `3.50`, `+0.1`).
///
/// Exponents, digit separators and surrounding whitespace are rejected.
pub fn parse_decimal(raw: &str) -> Result<Decimal, MoneyError> {
    if !is_decimal_literal(raw) {
        return Err(MoneyError::InvalidAmount(raw.to_string()));
    }
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    Decimal::from_str_exact(unsigned).map_err(|_| MoneyError::InvalidAmount(raw.to_string()))
}

fn is_decimal_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let integer_ok = !integer.is_empty() && all_digits(integer);
    match fraction {
        None => integer_ok,
        Some(fraction) => integer_ok && !fraction.is_empty() && all_digits(fraction),
    }
}

fn validate_currency_code(code: &str) -> Result<(), MoneyError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(MoneyError::InvalidCurrencyCode(code.to_string()))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parses `"<amount> <CODE>"`, the [`Display`] form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, code) = s
            .split_once(' ')
            .ok_or_else(|| MoneyError::InvalidAmount(s.to_string()))?;
        let money = Money::new(code, amount);
        money.to_amount()?;
        Ok(money)
    }
}
