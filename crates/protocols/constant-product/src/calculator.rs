//! Constant-Product Calculator
//!
//! Swap math using constant product formula (x * y = k). All arithmetic is
//! exact integer arithmetic over `BigUint`, so no intermediate product can
//! overflow and results are floored exactly as the pair contract floors them.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use waypoint_core::{Amount, AssetId};

use crate::constants::fees::{FEE_DENOM, FEE_NUM};

/// Calculate swap output using constant product formula
///
/// Formula: output = (reserves_out * input * fee_num) / (reserves_in * fee_denom + input * fee_num)
pub fn calculate_output(
    reserves_in: Amount,
    reserves_out: Amount,
    input_amount: Amount,
    fee_num: u32,
    fee_denom: u32,
) -> Amount {
    if reserves_in == 0 || reserves_out == 0 || input_amount == 0 {
        return 0;
    }

    let input_with_fee = BigUint::from(input_amount) * BigUint::from(fee_num);
    let numerator = &input_with_fee * BigUint::from(reserves_out);
    let denominator = BigUint::from(reserves_in) * BigUint::from(fee_denom) + input_with_fee;

    if denominator.is_zero() {
        return 0;
    }

    (numerator / denominator).to_u128().unwrap_or(0)
}

/// Calculate required input for desired output (reverse calculation)
///
/// Formula: input = (reserves_in * output * fee_denom) / ((reserves_out - output) * fee_num) + 1
pub fn calculate_input(
    reserves_in: Amount,
    reserves_out: Amount,
    output_amount: Amount,
    fee_num: u32,
    fee_denom: u32,
) -> Option<Amount> {
    if reserves_in == 0 || reserves_out == 0 || output_amount == 0 {
        return None;
    }
    if output_amount >= reserves_out {
        return None;
    }

    let numerator =
        BigUint::from(reserves_in) * BigUint::from(output_amount) * BigUint::from(fee_denom);
    let denominator = BigUint::from(reserves_out - output_amount) * BigUint::from(fee_num);

    if denominator.is_zero() {
        return None;
    }

    ((numerator / denominator) + BigUint::from(1u8)).to_u128()
}

/// Output of a pair swap with the standard 0.3% fee.
pub fn get_amount_out(amount_in: Amount, reserve_in: Amount, reserve_out: Amount) -> Amount {
    calculate_output(reserve_in, reserve_out, amount_in, FEE_NUM, FEE_DENOM)
}

/// Input needed for `amount_out` with the standard 0.3% fee (rounded up).
pub fn get_amount_in(amount_out: Amount, reserve_in: Amount, reserve_out: Amount) -> Option<Amount> {
    calculate_input(reserve_in, reserve_out, amount_out, FEE_NUM, FEE_DENOM)
}

/// Order two assets canonically (token0 < token1).
pub fn sort_assets<'a>(a: &'a AssetId, b: &'a AssetId) -> (&'a AssetId, &'a AssetId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
