//! Concentrated-Liquidity Quoter
//!
//! Exact-input pricing for a single pool at a given fee tier, and the
//! resolver that decides which tier's pool serves a pair.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use waypoint_core::{Amount, AssetId};

use crate::constants::{FeeTier, FEE_DENOMINATOR};
use crate::state::PoolBook;

/// Output for `amount_in` against virtual reserves, fee taken from the input.
///
/// Formula: in_less_fee = amount_in * (1e6 - fee) / 1e6,
/// output = in_less_fee * reserve_out / (reserve_in + in_less_fee)
pub fn calculate_output(
    reserve_in: Amount,
    reserve_out: Amount,
    amount_in: Amount,
    fee: FeeTier,
) -> Amount {
    if reserve_in == 0 || reserve_out == 0 || amount_in == 0 {
        return 0;
    }

    let in_less_fee = BigUint::from(amount_in) * BigUint::from(FEE_DENOMINATOR - fee.amount())
        / BigUint::from(FEE_DENOMINATOR);
    let denominator = BigUint::from(reserve_in) + &in_less_fee;
    if denominator.is_zero() {
        return 0;
    }

    (in_less_fee * BigUint::from(reserve_out) / denominator)
        .to_u128()
        .unwrap_or(0)
}

/// Quote an exact-input swap through the pool at `fee`.
///
/// Returns `None` when no pool exists at that tier.
pub fn quote_exact_input_single(
    book: &PoolBook,
    token_in: &AssetId,
    token_out: &AssetId,
    fee: FeeTier,
    amount_in: Amount,
) -> Option<Amount> {
    let pool = book.get_pool(token_in, token_out, fee)?;
    let (reserve_in, reserve_out) = pool.reserves_for(token_in)?;
    Some(calculate_output(reserve_in, reserve_out, amount_in, fee))
}

/// Pick the tier whose pool for the pair has the most active liquidity.
///
/// Equal liquidity goes to the lower fee.
pub fn resolve_fee_tier(book: &PoolBook, a: &AssetId, b: &AssetId) -> Option<FeeTier> {
    let mut best: Option<(FeeTier, Amount)> = None;
    for pool in book.pools_for_pair(a, b) {
        let liquidity = pool.liquidity();
        match best {
            Some((_, best_liquidity)) if liquidity <= best_liquidity => {}
            _ => best = Some((pool.fee, liquidity)),
        }
    }
    best.map(|(fee, _)| fee)
}
