//! Route Execution
//!
//! Replays a route hop by hop against a staged copy of the chain state. The
//! copy replaces the live state only when every hop settled and the final
//! output clears the caller's minimum, so a failed execution moves nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use waypoint_core::{Address, Amount, RouteError, Timestamp};

use crate::adapter::VenueAdapter;
use crate::chain::ChainState;
use crate::registry::Registry;
use crate::search::Route;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub route: Route,
    pub amount_in: Amount,
    pub amount_out_min: Amount,
    /// Account the input is taken from
    pub sender: Address,
    pub recipient: Address,
    pub deadline: Timestamp,
    /// Native value attached to the call
    #[serde(default)]
    pub native_value: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    pub amounts: Vec<Amount>,
    pub amount_out: Amount,
}

fn check_request<'r>(
    registry: &'r Registry,
    chain: &ChainState,
    request: &SwapRequest,
) -> Result<Vec<&'r VenueAdapter>, RouteError> {
    if request.deadline < chain.block_timestamp {
        return Err(RouteError::DeadlineExpired {
            deadline: request.deadline,
            now: chain.block_timestamp,
        });
    }

    let route = &request.route;
    route.validate_shape()?;
    let last = route.path.len() - 1;
    if route.path[1..last].iter().any(|asset| asset.is_native()) {
        return Err(RouteError::InvalidRoute {
            reason: "native asset can only appear at the route boundary".to_string(),
        });
    }

    let attached = request.native_value.unwrap_or(0);
    if route.path[0].is_native() {
        if attached != request.amount_in {
            return Err(RouteError::InvalidNativeValue {
                expected: request.amount_in,
                got: attached,
            });
        }
    } else if attached != 0 {
        return Err(RouteError::InvalidNativeValue {
            expected: 0,
            got: attached,
        });
    }

    route
        .adapters
        .iter()
        .map(|venue| {
            registry
                .adapter(venue)
                .ok_or_else(|| RouteError::UnknownAdapter {
                    venue: venue.to_string(),
                })
        })
        .collect()
}

/// Execute a route all-or-nothing.
pub fn execute(
    registry: &Registry,
    chain: &mut ChainState,
    request: &SwapRequest,
) -> Result<ExecutionReceipt, RouteError> {
    let adapters = check_request(registry, chain, request).map_err(|e| {
        warn!(error = %e, "swap rejected");
        e
    })?;
    let route = &request.route;

    let mut staged = chain.clone();

    // Native input arrives as call value; either way it lands with the
    // first adapter untouched.
    staged
        .ledger
        .transfer(&request.sender, adapters[0].address(), &route.path[0], request.amount_in)?;

    let mut amounts = Vec::with_capacity(route.path.len());
    amounts.push(request.amount_in);
    let mut current = request.amount_in;

    for (hop, adapter) in adapters.iter().enumerate() {
        let recipient = adapters
            .get(hop + 1)
            .map_or(&request.recipient, |next| next.address());
        let asset_in = &route.path[hop];
        let asset_out = &route.path[hop + 1];

        current = adapter
            .execute(&mut staged, asset_in, asset_out, current, recipient)
            .map_err(|source| {
                warn!(hop, venue = %adapter.id(), error = %source, "hop failed");
                RouteError::HopFailure {
                    hop,
                    venue: adapter.id().to_string(),
                    source,
                }
            })?;
        debug!(hop, venue = %adapter.id(), %asset_in, %asset_out, amount_out = current, "hop settled");
        amounts.push(current);
    }

    if current < request.amount_out_min {
        warn!(got = current, min = request.amount_out_min, "output below minimum");
        return Err(RouteError::InsufficientOutput {
            got: current,
            min: request.amount_out_min,
        });
    }

    *chain = staged;
    info!(
        hops = adapters.len(),
        amount_in = request.amount_in,
        amount_out = current,
        recipient = %request.recipient,
        "swap executed"
    );

    Ok(ExecutionReceipt {
        amounts,
        amount_out: current,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::search::{deadline_after, min_output, search};
    use waypoint_core::{AssetId, VenueError, VenueId};

    fn make_request(route: Route, amount_in: Amount, amount_out_min: Amount, chain: &ChainState) -> SwapRequest {
        SwapRequest {
            route,
            amount_in,
            amount_out_min,
            sender: trader(),
            recipient: addr(0x20),
            deadline: deadline_after(chain.block_timestamp, 60),
            native_value: None,
        }
    }

    #[test]
    fn test_execute_matches_search_quote() {
        let registry = make_registry();
        let mut chain = make_chain();
        let cases = [
            (wbtc(), dai(), 2 * E8),
            (usdc(), steth(), 50_000 * E6),
            (weth(), wbtc(), 3 * E18),
        ];
        for (asset_in, asset_out, amount_in) in cases {
            let found = search(&registry, &chain, 4, &asset_in, &asset_out, amount_in).unwrap();
            let expected = found.quote.amount_out();
            let request = make_request(found.route.clone(), amount_in, min_output(expected, 10), &chain);

            let receipt = execute(&registry, &mut chain, &request).unwrap();
            assert_eq!(receipt.amount_out, expected);
            assert_eq!(receipt.amounts, found.quote.amounts);
        }
        assert!(chain.ledger.balance(&addr(0x20), &dai()) > 0);
        assert!(chain.ledger.balance(&addr(0x20), &steth()) > 0);
    }

    #[test]
    fn test_every_pair_executes_as_quoted() {
        let registry = make_registry();
        let mut executed = 0;
        for token_in in registry.tokens() {
            for token_out in registry.tokens() {
                for max_hop in 1..=4 {
                    let mut chain = make_chain();
                    let amount_in = 10u128.pow(u32::from(token_in.decimals));
                    let Ok(found) =
                        search(&registry, &chain, max_hop, &token_in.id, &token_out.id, amount_in)
                    else {
                        continue;
                    };
                    chain.ledger.credit(&trader(), &token_in.id, amount_in).unwrap();

                    let mut request =
                        make_request(found.route.clone(), amount_in, found.quote.amount_out(), &chain);
                    if token_in.id.is_native() {
                        request.native_value = Some(amount_in);
                    }
                    let receipt = execute(&registry, &mut chain, &request).unwrap();
                    assert_eq!(receipt.amounts, found.quote.amounts);
                    executed += 1;
                }
            }
        }
        assert!(executed > 0);
    }

    #[test]
    fn test_execute_delivers_and_debits() {
        let registry = make_registry();
        let mut chain = make_chain();
        let found = search(&registry, &chain, 3, &usdc(), &weth(), 10_000 * E6).unwrap();
        let request = make_request(found.route.clone(), 10_000 * E6, 0, &chain);
        let before = chain.ledger.balance(&trader(), &usdc());

        let receipt = execute(&registry, &mut chain, &request).unwrap();
        assert_eq!(chain.ledger.balance(&trader(), &usdc()), before - 10_000 * E6);
        assert_eq!(chain.ledger.balance(&addr(0x20), &weth()), receipt.amount_out);
        for adapter in registry.adapters() {
            assert!(chain.ledger.holdings(adapter.address()).is_empty());
        }
    }

    #[test]
    fn test_insufficient_output_moves_nothing() {
        let registry = make_registry();
        let mut chain = make_chain();
        let found = search(&registry, &chain, 3, &wbtc(), &dai(), E8).unwrap();
        let expected = found.quote.amount_out();
        let request = make_request(found.route, E8, expected + 1, &chain);
        let before = chain.clone();

        let err = execute(&registry, &mut chain, &request).unwrap_err();
        assert_eq!(
            err,
            RouteError::InsufficientOutput {
                got: expected,
                min: expected + 1
            }
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn test_deadline_expired_moves_nothing() {
        let registry = make_registry();
        let mut chain = make_chain();
        let found = search(&registry, &chain, 2, &weth(), &usdc(), E18).unwrap();
        let mut request = make_request(found.route, E18, 0, &chain);
        request.deadline = chain.block_timestamp - 1;
        let before = chain.clone();

        let err = execute(&registry, &mut chain, &request).unwrap_err();
        assert!(matches!(err, RouteError::DeadlineExpired { .. }));
        assert_eq!(chain, before);
    }

    #[test]
    fn test_deadline_checked_against_settlement_clock() {
        let registry = make_registry();
        let mut chain = make_chain();
        let found = search(&registry, &chain, 2, &weth(), &usdc(), E18).unwrap();
        let request = make_request(found.route, E18, 0, &chain);

        chain.advance_to(request.deadline);
        assert!(execute(&registry, &mut chain.clone(), &request).is_ok());

        chain.advance_to(request.deadline + 1);
        assert!(matches!(
            execute(&registry, &mut chain, &request),
            Err(RouteError::DeadlineExpired { .. })
        ));
    }

    #[test]
    fn test_malformed_route() {
        let registry = make_registry();
        let mut chain = make_chain();
        let route = Route {
            adapters: vec![VenueId::new("UNI-V2"), VenueId::new("UNI-V2")],
            path: vec![weth(), usdc()],
        };
        let request = make_request(route, E18, 0, &chain);
        let err = execute(&registry, &mut chain, &request).unwrap_err();
        assert!(matches!(err, RouteError::InvalidRoute { .. }));

        let route = Route {
            adapters: vec![VenueId::new("UNI-V2"), VenueId::new("UNI-V2")],
            path: vec![usdc(), AssetId::native(), dai()],
        };
        let request = make_request(route, E6, 0, &chain);
        let err = execute(&registry, &mut chain, &request).unwrap_err();
        assert!(matches!(err, RouteError::InvalidRoute { .. }));
    }

    #[test]
    fn test_unknown_adapter() {
        let registry = make_registry();
        let mut chain = make_chain();
        let route = Route {
            adapters: vec![VenueId::new("BALANCER")],
            path: vec![weth(), usdc()],
        };
        let request = make_request(route, E18, 0, &chain);
        let err = execute(&registry, &mut chain, &request).unwrap_err();
        assert_eq!(
            err,
            RouteError::UnknownAdapter {
                venue: "BALANCER".to_string()
            }
        );
    }

    #[test]
    fn test_native_in_and_out() {
        let registry = make_registry();
        let mut chain = make_chain();

        let found = search(&registry, &chain, 2, &AssetId::native(), &usdc(), 2 * E18).unwrap();
        let mut request = make_request(found.route.clone(), 2 * E18, 0, &chain);
        request.native_value = Some(2 * E18);
        let weth_before = chain.ledger.balance(&trader(), &weth());
        let receipt = execute(&registry, &mut chain, &request).unwrap();
        assert_eq!(receipt.amount_out, found.quote.amount_out());
        assert_eq!(chain.ledger.balance(&trader(), &AssetId::native()), 98 * E18);
        assert_eq!(chain.ledger.balance(&trader(), &weth()), weth_before);

        let back = search(&registry, &chain, 2, &usdc(), &AssetId::native(), 1_000 * E6).unwrap();
        let request = make_request(back.route.clone(), 1_000 * E6, 0, &chain);
        let receipt = execute(&registry, &mut chain, &request).unwrap();
        assert_eq!(chain.ledger.balance(&addr(0x20), &AssetId::native()), receipt.amount_out);
        assert_eq!(chain.ledger.balance(&addr(0x20), &weth()), 0);
    }

    #[test]
    fn test_native_value_must_match() {
        let registry = make_registry();
        let mut chain = make_chain();
        let found = search(&registry, &chain, 1, &AssetId::native(), &usdc(), E18).unwrap();

        let mut request = make_request(found.route.clone(), E18, 0, &chain);
        request.native_value = Some(E18 - 1);
        assert!(matches!(
            execute(&registry, &mut chain, &request),
            Err(RouteError::InvalidNativeValue { .. })
        ));

        let found = search(&registry, &chain, 1, &weth(), &usdc(), E18).unwrap();
        let mut request = make_request(found.route, E18, 0, &chain);
        request.native_value = Some(1);
        assert_eq!(
            execute(&registry, &mut chain, &request).unwrap_err(),
            RouteError::InvalidNativeValue { expected: 0, got: 1 }
        );
    }

    #[test]
    fn test_hop_failure_rolls_back_earlier_hops() {
        let registry = make_registry();
        let mut chain = make_chain();
        // second hop names a venue with no USDC/STETH pool
        let route = Route {
            adapters: vec![VenueId::new("UNI-V2"), VenueId::new("SUSHI")],
            path: vec![weth(), usdc(), steth()],
        };
        let before = chain.clone();
        let request = make_request(route, E18, 0, &chain);
        let err = execute(&registry, &mut chain, &request).unwrap_err();
        match err {
            RouteError::HopFailure { hop, venue, source } => {
                assert_eq!(hop, 1);
                assert_eq!(venue, "SUSHI");
                assert!(matches!(source, VenueError::NoPool { .. }));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(chain, before);
    }

    #[test]
    fn test_sender_without_funds() {
        let registry = make_registry();
        let mut chain = make_chain();
        let found = search(&registry, &chain, 1, &weth(), &usdc(), E18).unwrap();
        let mut request = make_request(found.route, E18, 0, &chain);
        request.sender = addr(0x44);
        assert!(matches!(
            execute(&registry, &mut chain, &request),
            Err(RouteError::TransferFailure(_))
        ));
    }
}
