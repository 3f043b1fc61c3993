use std::collections::BTreeMap;

use crate::models::allocation::{AllocationDimension, AllocationSlice};
use crate::models::position::Position;
use crate::models::quote::PriceMap;

/// Groups position market values along a chosen dimension and expresses
/// each group as a share of total portfolio value.
pub struct AllocationService;

impl AllocationService {
    pub fn new() -> Self {
        Self
    }

    /// Build the allocation breakdown.
    ///
    /// Unpriced positions contribute zero value. Groups whose aggregate
    /// value is zero are dropped; if that would leave nothing, a single
    /// placeholder slice of value 1 is emitted so a consuming chart has
    /// something to draw. Percentages sum to 100 when total value is
    /// positive and are all 0 when it is not.
    pub fn group(
        &self,
        positions: &[Position],
        prices: &PriceMap,
        dimension: AllocationDimension,
    ) -> Vec<AllocationSlice> {
        // BTreeMap keeps group order deterministic (sorted by key)
        let mut groups: BTreeMap<String, f64> = BTreeMap::new();

        for position in positions {
            let value = prices
                .get(&position.symbol)
                .or(position.price)
                .map(|p| position.quantity * p)
                .unwrap_or(0.0);
            *groups.entry(dimension.key_of(position)).or_insert(0.0) += value;
        }

        let total: f64 = groups.values().sum();

        let slices: Vec<AllocationSlice> = groups
            .into_iter()
            .filter(|(_, value)| *value > 0.0)
            .map(|(key, value)| AllocationSlice {
                key,
                value,
                percent_of_total: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            })
            .collect();

        if slices.is_empty() {
            return vec![AllocationSlice {
                key: "other".to_string(),
                value: 1.0,
                percent_of_total: 0.0,
            }];
        }

        slices
    }
}

impl Default for AllocationService {
    fn default() -> Self {
        Self::new()
    }
}
