//! Path Search
//!
//! Bounded exhaustive search over the bridge-asset graph. Candidate paths are
//! enumerated breadth-first (shorter paths first). Each path is quoted under
//! every adapter assignment that uses no pool twice, and the path with the
//! largest final output wins. Equal outputs keep the earlier path.

use std::collections::{HashMap, VecDeque};

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use waypoint_core::constants::{BPS_DENOMINATOR, MAX_HOP, MIN_HOP};
use waypoint_core::{Address, Amount, AssetId, RouteError, Timestamp, VenueId};

use crate::chain::ChainState;
use crate::registry::Registry;

/// Ordered adapters plus the asset path they trade along
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub adapters: Vec<VenueId>,
    pub path: Vec<AssetId>,
}

impl Route {
    /// Check `len(path) == len(adapters) + 1` with at least one hop.
    pub fn validate_shape(&self) -> Result<(), RouteError> {
        if self.adapters.is_empty() {
            return Err(RouteError::InvalidRoute {
                reason: "route has no hops".to_string(),
            });
        }
        if self.path.len() != self.adapters.len() + 1 {
            return Err(RouteError::InvalidRoute {
                reason: format!(
                    "path has {} assets for {} adapters",
                    self.path.len(),
                    self.adapters.len()
                ),
            });
        }
        Ok(())
    }

    pub fn hop_count(&self) -> usize {
        self.adapters.len()
    }
}

/// Per-hop simulated amounts; `amounts[0]` is the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub amounts: Vec<Amount>,
}

impl Quote {
    pub fn amount_out(&self) -> Amount {
        self.amounts.last().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub route: Route,
    pub quote: Quote,
}

/// Slippage-adjusted minimum: `expected - (expected * bps + 5000) / 10000`.
pub fn min_output(expected: Amount, slippage_bps: u32) -> Amount {
    let denominator = BigUint::from(BPS_DENOMINATOR);
    let half = &denominator / 2u32;
    let cut = (BigUint::from(expected) * BigUint::from(slippage_bps) + half) / denominator;
    expected.saturating_sub(cut.to_u128().unwrap_or(Amount::MAX))
}

pub fn deadline_after(now: Timestamp, seconds: u64) -> Timestamp {
    now.saturating_add(seconds)
}

/// One adapter's quote for a hop
#[derive(Debug, Clone)]
struct EdgeOption {
    adapter: usize,
    pool: Address,
    amount_out: Amount,
}

/// Search state over one registry and one chain snapshot.
///
/// Hop quotes are cached by (asset in, asset out, amount in), since the same
/// prefix is shared by many candidate paths.
struct PathSearch<'a> {
    registry: &'a Registry,
    chain: &'a ChainState,
    edges: HashMap<(AssetId, AssetId, Amount), Vec<EdgeOption>>,
}

impl<'a> PathSearch<'a> {
    fn new(registry: &'a Registry, chain: &'a ChainState) -> Self {
        Self {
            registry,
            chain,
            edges: HashMap::new(),
        }
    }

    /// Every adapter able to quote the hop, best output first. Equal outputs
    /// keep registration order.
    fn edge_options(&mut self, asset_in: &AssetId, asset_out: &AssetId, amount_in: Amount) -> Vec<EdgeOption> {
        let key = (asset_in.clone(), asset_out.clone(), amount_in);
        if let Some(cached) = self.edges.get(&key) {
            return cached.clone();
        }

        let mut options = Vec::new();
        for (index, adapter) in self.registry.adapters().iter().enumerate() {
            let quoted = adapter
                .locate_pool(self.chain, asset_in, asset_out)
                .and_then(|pool| {
                    adapter
                        .quote(self.chain, asset_in, asset_out, amount_in)
                        .map(|amount_out| (pool, amount_out))
                });
            match quoted {
                Ok((_, 0)) if amount_in > 0 => {}
                Ok((pool, amount_out)) => options.push(EdgeOption {
                    adapter: index,
                    pool: pool.address().clone(),
                    amount_out,
                }),
                Err(e) => {
                    debug!(venue = %adapter.id(), %asset_in, %asset_out, "skipping edge: {}", e);
                }
            }
        }
        options.sort_by(|a, b| b.amount_out.cmp(&a.amount_out));

        self.edges.insert(key, options.clone());
        options
    }

    /// Best adapter assignment for a vertex sequence. A pool serves at most
    /// one hop of a path, so every hop is quoted against untouched state.
    fn compose(&mut self, vertices: &[AssetId], amount_in: Amount) -> Option<SearchResult> {
        let mut chosen = Vec::with_capacity(vertices.len() - 1);
        let mut best: Option<Vec<EdgeOption>> = None;
        self.assign(vertices, amount_in, &mut chosen, &mut best);

        let hops = best?;
        let mut amounts = Vec::with_capacity(vertices.len());
        amounts.push(amount_in);
        amounts.extend(hops.iter().map(|hop| hop.amount_out));
        let adapters = hops
            .iter()
            .map(|hop| self.registry.adapters()[hop.adapter].id().clone())
            .collect();

        Some(SearchResult {
            route: Route {
                adapters,
                path: vertices.to_vec(),
            },
            quote: Quote { amounts },
        })
    }

    fn assign(
        &mut self,
        vertices: &[AssetId],
        amount: Amount,
        chosen: &mut Vec<EdgeOption>,
        best: &mut Option<Vec<EdgeOption>>,
    ) {
        let hop = chosen.len();
        if hop + 1 == vertices.len() {
            let beats = best.as_ref().map_or(true, |current| {
                let current_out = current.last().map_or(0, |h| h.amount_out);
                amount > current_out
            });
            if beats {
                *best = Some(chosen.clone());
            }
            return;
        }

        for option in self.edge_options(&vertices[hop], &vertices[hop + 1], amount) {
            let reused = chosen
                .iter()
                .any(|c| c.adapter == option.adapter && c.pool == option.pool);
            if reused {
                continue;
            }
            let amount_out = option.amount_out;
            chosen.push(option);
            self.assign(vertices, amount_out, chosen, best);
            chosen.pop();
        }
    }
}

/// Interior candidates: the bridge set at its wrapped representation, minus
/// the endpoints.
fn interior_assets(registry: &Registry, asset_in: &AssetId, asset_out: &AssetId) -> Vec<AssetId> {
    let wrapped = registry.wrapped_native();
    let mut interior: Vec<AssetId> = Vec::new();
    for bridge in registry.bridge_assets() {
        let candidate = bridge.to_wrapped(wrapped);
        if &candidate == asset_in || &candidate == asset_out || interior.contains(&candidate) {
            continue;
        }
        interior.push(candidate);
    }
    interior
}

/// Every simple path from `asset_in` to `asset_out` with 1..=`max_hop` hops
/// whose interior vertices come from `interior`, shortest first.
pub fn candidate_paths(
    asset_in: &AssetId,
    asset_out: &AssetId,
    interior: &[AssetId],
    max_hop: usize,
) -> Vec<Vec<AssetId>> {
    let mut results: Vec<Vec<AssetId>> = Vec::new();
    let mut queue: VecDeque<Vec<AssetId>> = VecDeque::new();
    queue.push_back(vec![asset_in.clone()]);

    while let Some(prefix) = queue.pop_front() {
        let hops = prefix.len() - 1;

        let mut complete = prefix.clone();
        complete.push(asset_out.clone());
        results.push(complete);

        if hops + 1 < max_hop {
            for next in interior {
                if !prefix.contains(next) {
                    let mut extended = prefix.clone();
                    extended.push(next.clone());
                    queue.push_back(extended);
                }
            }
        }
    }

    results
}

/// Find the maximum-output route from `asset_in` to `asset_out`.
pub fn search(
    registry: &Registry,
    chain: &ChainState,
    max_hop: usize,
    asset_in: &AssetId,
    asset_out: &AssetId,
    amount_in: Amount,
) -> Result<SearchResult, RouteError> {
    if !(MIN_HOP..=MAX_HOP).contains(&max_hop) {
        return Err(RouteError::InvalidHopBound {
            max_hop,
            min: MIN_HOP,
            max: MAX_HOP,
        });
    }

    let wrapped = registry.wrapped_native();
    let (venue_in, venue_out) = (asset_in.to_wrapped(wrapped), asset_out.to_wrapped(wrapped));
    if venue_in == venue_out {
        return Err(RouteError::IdenticalAssets {
            asset: venue_in.to_string(),
        });
    }

    let interior = interior_assets(registry, &venue_in, &venue_out);
    let candidates = candidate_paths(asset_in, asset_out, &interior, max_hop);
    debug!(
        %asset_in,
        %asset_out,
        max_hop,
        candidates = candidates.len(),
        "searching candidate paths"
    );

    let mut engine = PathSearch::new(registry, chain);
    let mut best: Option<SearchResult> = None;
    for vertices in &candidates {
        let Some(result) = engine.compose(vertices, amount_in) else {
            continue;
        };
        debug!(
            hops = result.route.hop_count(),
            amount_out = result.quote.amount_out(),
            "candidate path quoted"
        );
        if best
            .as_ref()
            .map_or(true, |current| result.quote.amount_out() > current.quote.amount_out())
        {
            best = Some(result);
        }
    }

    let best = best.ok_or_else(|| RouteError::NoPathFound {
        asset_in: asset_in.to_string(),
        asset_out: asset_out.to_string(),
    })?;

    info!(
        %asset_in,
        %asset_out,
        amount_in,
        amount_out = best.quote.amount_out(),
        adapters = ?best.route.adapters,
        "route selected"
    );
    Ok(best)
}

/// Quote a fixed route: each hop through its named adapter.
pub fn quote_route(
    registry: &Registry,
    chain: &ChainState,
    route: &Route,
    amount_in: Amount,
) -> Result<Quote, RouteError> {
    route.validate_shape()?;

    let mut amounts = Vec::with_capacity(route.path.len());
    amounts.push(amount_in);
    let mut current = amount_in;
    for (hop, venue) in route.adapters.iter().enumerate() {
        let adapter = registry
            .adapter(venue)
            .ok_or_else(|| RouteError::UnknownAdapter {
                venue: venue.to_string(),
            })?;
        current = adapter
            .quote(chain, &route.path[hop], &route.path[hop + 1], current)
            .map_err(|source| RouteError::HopFailure {
                hop,
                venue: venue.to_string(),
                source,
            })?;
        amounts.push(current);
    }
    Ok(Quote { amounts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::VenueBook;
    use crate::fixtures::*;
    use constant_product::PairBook;

    /// Every hop-bounded path with every adapter combination, quoted directly.
    fn brute_force_best(
        registry: &Registry,
        chain: &ChainState,
        max_hop: usize,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
    ) -> Amount {
        let wrapped = registry.wrapped_native();
        let interior = interior_assets(
            registry,
            &asset_in.to_wrapped(wrapped),
            &asset_out.to_wrapped(wrapped),
        );
        let venues: Vec<VenueId> = registry.adapters().iter().map(|a| a.id().clone()).collect();

        let mut best = 0;
        for path in candidate_paths(asset_in, asset_out, &interior, max_hop) {
            let hops = path.len() - 1;
            let combos = venues.len().pow(hops as u32);
            for mut code in 0..combos {
                let mut adapters = Vec::with_capacity(hops);
                for _ in 0..hops {
                    adapters.push(venues[code % venues.len()].clone());
                    code /= venues.len();
                }
                let route = Route {
                    adapters,
                    path: path.clone(),
                };
                let mut pools = Vec::new();
                for (hop, venue) in route.adapters.iter().enumerate() {
                    let adapter = registry.adapter(venue).unwrap();
                    if let Ok(pool) = adapter.locate_pool(chain, &route.path[hop], &route.path[hop + 1]) {
                        pools.push((venue.clone(), pool.address().clone()));
                    }
                }
                let distinct = pools
                    .iter()
                    .enumerate()
                    .all(|(k, p)| !pools[..k].contains(p));
                if !distinct {
                    continue;
                }
                if let Ok(quote) = quote_route(registry, chain, &route, amount_in) {
                    if quote.amounts.iter().skip(1).all(|a| *a > 0) {
                        best = best.max(quote.amount_out());
                    }
                }
            }
        }
        best
    }

    #[test]
    fn test_invalid_hop_bound() {
        let (registry, chain) = (make_registry(), make_chain());
        for max_hop in [0, 5] {
            let err = search(&registry, &chain, max_hop, &weth(), &usdc(), E18).unwrap_err();
            assert_eq!(
                err,
                RouteError::InvalidHopBound {
                    max_hop,
                    min: 1,
                    max: 4
                }
            );
        }
    }

    #[test]
    fn test_identical_assets_after_wrapping() {
        let (registry, chain) = (make_registry(), make_chain());
        let err = search(&registry, &chain, 2, &AssetId::native(), &weth(), E18).unwrap_err();
        assert!(matches!(err, RouteError::IdenticalAssets { .. }));
    }

    #[test]
    fn test_no_path_found() {
        let (registry, chain) = (make_registry(), make_chain());
        let err = search(&registry, &chain, 4, &lone(), &usdc(), E18).unwrap_err();
        assert!(matches!(err, RouteError::NoPathFound { .. }));
    }

    #[test]
    fn test_direct_hop_takes_best_adapter() {
        let (registry, chain) = (make_registry(), make_chain());
        let result = search(&registry, &chain, 1, &weth(), &usdc(), 10 * E18).unwrap();

        let best = registry
            .adapters()
            .iter()
            .filter_map(|a| a.quote(&chain, &weth(), &usdc(), 10 * E18).ok().map(|out| (a.id().clone(), out)))
            .fold(None::<(VenueId, Amount)>, |acc, (id, out)| match acc {
                Some((_, best)) if best >= out => acc,
                _ => Some((id, out)),
            })
            .unwrap();

        assert_eq!(result.route.adapters, vec![best.0]);
        assert_eq!(result.quote.amount_out(), best.1);
        assert_eq!(result.quote.amounts[0], 10 * E18);
    }

    #[test]
    fn test_global_maximum_over_all_paths() {
        let (registry, chain) = (make_registry(), make_chain());
        let cases = [
            (wbtc(), dai(), 2 * E8),
            (weth(), dai(), 25 * E18),
            (usdt(), weth(), 40_000 * E6),
            (steth(), usdc(), 3 * E18),
        ];
        for (asset_in, asset_out, amount_in) in cases {
            for max_hop in 1..=3 {
                let expected = brute_force_best(&registry, &chain, max_hop, &asset_in, &asset_out, amount_in);
                match search(&registry, &chain, max_hop, &asset_in, &asset_out, amount_in) {
                    Ok(result) => assert_eq!(result.quote.amount_out(), expected),
                    Err(RouteError::NoPathFound { .. }) => assert_eq!(expected, 0),
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
        }
    }

    #[test]
    fn test_route_shape_invariant() {
        let (registry, chain) = (make_registry(), make_chain());
        let result = search(&registry, &chain, 4, &wbtc(), &steth(), E8).unwrap();
        assert_eq!(result.route.path.len(), result.route.adapters.len() + 1);
        assert_eq!(result.quote.amounts.len(), result.route.path.len());
        assert!(result.route.validate_shape().is_ok());
        assert_eq!(result.route.path.first(), Some(&wbtc()));
        assert_eq!(result.route.path.last(), Some(&steth()));
    }

    #[test]
    fn test_search_matches_fixed_route_quote() {
        let (registry, chain) = (make_registry(), make_chain());
        let result = search(&registry, &chain, 3, &wbtc(), &dai(), E8).unwrap();
        let requote = quote_route(&registry, &chain, &result.route, E8).unwrap();
        assert_eq!(requote, result.quote);
    }

    #[test]
    fn test_native_endpoint_kept_in_path() {
        let (registry, chain) = (make_registry(), make_chain());
        let native = search(&registry, &chain, 2, &AssetId::native(), &usdc(), E18).unwrap();
        let wrapped = search(&registry, &chain, 2, &weth(), &usdc(), E18).unwrap();
        assert_eq!(native.route.path[0], AssetId::native());
        assert_eq!(native.quote.amount_out(), wrapped.quote.amount_out());
        assert!(native.route.path[1..].iter().all(|a| !a.is_native()));
    }

    #[test]
    fn test_equal_adapters_tie_to_first_registered() {
        let mut registry = make_registry();
        registry
            .set_bridge_assets(&owner(), vec![])
            .unwrap();
        let mut chain = make_chain();
        let mut twin = PairBook::new();
        twin.insert(make_pair(0xb1, weth(), 1_000 * E18, usdc(), 2_000_000 * E6));
        chain.insert_book(VenueId::new("UNI-V2"), VenueBook::ConstantProduct(twin.clone()));
        chain.insert_book(VenueId::new("SUSHI"), VenueBook::ConstantProduct(twin));
        chain.insert_book(VenueId::new("UNI-V3"), VenueBook::empty(crate::adapter::VenueKind::ConcentratedLiquidity));

        let result = search(&registry, &chain, 1, &weth(), &usdc(), E18).unwrap();
        assert_eq!(result.route.adapters, vec![VenueId::new("UNI-V2")]);
    }

    #[test]
    fn test_equal_paths_tie_to_first_found() {
        let mut registry = make_registry();
        registry
            .set_bridge_assets(&owner(), vec![dai(), usdc()])
            .unwrap();
        let mut chain = ChainState::new(0);
        let mut book = PairBook::new();
        book.insert(make_pair(0xf1, wbtc(), 1_000 * E18, dai(), 1_000 * E18));
        book.insert(make_pair(0xf2, dai(), 1_000 * E18, steth(), 1_000 * E18));
        book.insert(make_pair(0xf3, wbtc(), 1_000 * E18, usdc(), 1_000 * E18));
        book.insert(make_pair(0xf4, usdc(), 1_000 * E18, steth(), 1_000 * E18));
        chain.insert_book(VenueId::new("UNI-V2"), VenueBook::ConstantProduct(book));

        let result = search(&registry, &chain, 2, &wbtc(), &steth(), E18).unwrap();
        assert_eq!(result.route.path, vec![wbtc(), dai(), steth()]);
    }

    #[test]
    fn test_longer_path_wins_when_better() {
        let (registry, chain) = (make_registry(), make_chain());
        // WBTC only reaches DAI through a bridge
        assert!(search(&registry, &chain, 1, &wbtc(), &dai(), E8).is_err());
        let result = search(&registry, &chain, 3, &wbtc(), &dai(), E8).unwrap();
        assert!(result.route.hop_count() >= 2);
    }

    #[test]
    fn test_candidate_paths_shortest_first() {
        let interior = vec![asset(0x21), asset(0x22), asset(0x23)];
        let paths = candidate_paths(&asset(0x01), &asset(0x02), &interior, 3);
        assert_eq!(paths.len(), 1 + 3 + 6);
        assert_eq!(paths[0], vec![asset(0x01), asset(0x02)]);
        assert_eq!(paths[1], vec![asset(0x01), asset(0x21), asset(0x02)]);
        assert!(paths.windows(2).all(|w| w[0].len() <= w[1].len()));
        assert!(paths.iter().all(|p| p.len() <= 4));
    }

    #[test]
    fn test_min_output() {
        assert_eq!(min_output(1_000_000, 10), 999_000);
        assert_eq!(min_output(12_345, 50), 12_283);
        assert_eq!(min_output(0, 50), 0);
        assert_eq!(min_output(777, 10_000), 0);
        assert_eq!(min_output(Amount::MAX, 0), Amount::MAX);
    }

    #[test]
    fn test_deadline_after() {
        assert_eq!(deadline_after(1_700_000_000, 60), 1_700_000_060);
        assert_eq!(deadline_after(u64::MAX, 60), u64::MAX);
    }
}
