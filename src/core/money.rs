use crate::core::{AppError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Number of minor units (pence) per major unit
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Converts a decimal amount into integer minor units.
///
/// Amounts are stored as pence, so anything finer than a penny is rejected
/// rather than truncated. Negative amounts are kept as negative pence.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    let normalized = amount.normalize();
    if normalized.scale() > MINOR_UNIT_SCALE {
        return Err(AppError::validation(format!(
            "Amount must have at most {} decimal places, got {}",
            MINOR_UNIT_SCALE,
            normalized.scale()
        )));
    }

    normalized
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|pence| pence.to_i64())
        .ok_or_else(|| AppError::validation(format!("Amount {} is out of range", amount)))
}

/// Converts integer minor units back into a decimal amount
pub fn from_minor_units(pence: i64) -> Decimal {
    Decimal::new(pence, MINOR_UNIT_SCALE)
}
