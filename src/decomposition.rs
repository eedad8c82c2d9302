//! Exhaustive enumeration of output decompositions.
//!
//! A round needs to answer "which multisets of standard denominations sum
//! to roughly this value?" for many clients against one denomination table,
//! so the search is precomputed once per round: all decompositions of every
//! size up to the output budget, each size class sorted descending by total.
//! Queries then reduce to binary-search pruning and sorted merges, never a
//! rescan of the full space. Contract violations such as inconsistent
//! bounds or queries outside the precomputed range panic rather than
//! degrade.

use std::cmp::Ordering;

/// A multiset of output values, stored descending, with its total cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decomposition {
    outputs: Vec<u64>,
    total: u64,
}

impl Decomposition {
    /// Creates a decomposition from descending outputs.
    ///
    /// Panics when `outputs` is empty or out of order; decompositions only
    /// ever grow by [`Decomposition::extend`], so either is a programming
    /// error.
    pub fn new(outputs: &[u64]) -> Self {
        assert!(!outputs.is_empty(), "a decomposition has at least one output");
        assert!(
            outputs.windows(2).all(|pair| pair[0] >= pair[1]),
            "outputs must be descending"
        );
        Decomposition { outputs: outputs.to_vec(), total: outputs.iter().sum() }
    }

    /// Returns this decomposition with `value` appended.
    ///
    /// Panics when `value` exceeds the smallest existing output: appending
    /// anything larger would break the descending order, and the
    /// enumeration relies on every multiset being produced exactly once, by
    /// appending its smallest element.
    pub fn extend(&self, value: u64) -> Self {
        assert!(
            value <= self.smallest(),
            "extension value larger than the smallest output"
        );
        let mut outputs = Vec::with_capacity(self.outputs.len() + 1);
        outputs.extend_from_slice(&self.outputs);
        outputs.push(value);
        Decomposition { outputs, total: self.total + value }
    }

    /// The output values, largest first.
    pub fn outputs(&self) -> &[u64] {
        &self.outputs
    }

    /// The sum of all outputs.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn largest(&self) -> u64 {
        self.outputs[0]
    }

    pub fn smallest(&self) -> u64 {
        self.outputs[self.outputs.len() - 1]
    }
}

impl Ord for Decomposition {
    /// Total value first, then lexicographically by outputs (largest
    /// element first). Size classes are stored descending under this order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.total.cmp(&other.total).then_with(|| self.outputs.cmp(&other.outputs))
    }
}

impl PartialOrd for Decomposition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every decomposition of one size, sorted descending.
struct DecompositionsOfASize {
    size: usize,
    decompositions: Vec<Decomposition>,
}

impl DecompositionsOfASize {
    /// Builds the next size class: every decomposition here, extended by
    /// every denomination it can absorb, the per-denomination sorted
    /// streams merged pairwise. Partial decompositions are kept only while
    /// they can still reach `minimum_total` within the output budget.
    fn extend(
        &self,
        denominations: &[u64],
        minimum_total: u64,
        maximum_total: u64,
        maximum_outputs: usize,
    ) -> DecompositionsOfASize {
        let child_size = self.size + 1;
        let outputs_left = (maximum_outputs - child_size) as u64;
        let mut streams = Vec::new();
        for &denomination in denominations {
            if denomination > maximum_total {
                continue;
            }
            let ceiling = maximum_total - denomination;
            let floor =
                minimum_total.saturating_sub(denomination.saturating_mul(outputs_left + 1));
            let candidates = prune_by_total(&self.decompositions, floor, ceiling);
            let candidates = prune_extendable(candidates, self.size, denomination);
            let stream: Vec<Decomposition> = candidates
                .iter()
                .filter(|parent| parent.smallest() >= denomination)
                .map(|parent| parent.extend(denomination))
                .collect();
            if !stream.is_empty() {
                streams.push(stream);
            }
        }
        DecompositionsOfASize { size: child_size, decompositions: merge_pairwise(streams) }
    }
}

/// The subrange whose totals lie in `[minimum, maximum]`, located with two
/// binary searches over the descending order.
fn prune_by_total(decompositions: &[Decomposition], minimum: u64, maximum: u64) -> &[Decomposition] {
    if minimum > maximum {
        return &[];
    }
    let from = decompositions.partition_point(|decomposition| decomposition.total() > maximum);
    let to = decompositions.partition_point(|decomposition| decomposition.total() >= minimum);
    &decompositions[from..to]
}

/// The prefix that could still legally absorb `value`. Extending keeps the
/// outputs descending, so an eligible decomposition has every output at
/// least `value` and therefore a total of at least `size·value`, which
/// turns the cut into one more binary search on total; the exact
/// smallest-output check stays with the caller.
fn prune_extendable(decompositions: &[Decomposition], size: usize, value: u64) -> &[Decomposition] {
    let floor = value.saturating_mul(size as u64);
    let to = decompositions.partition_point(|decomposition| decomposition.total() >= floor);
    &decompositions[..to]
}

/// Merges two descending vectors into one, preferring the left on ties.
fn merge_descending(left: Vec<Decomposition>, right: Vec<Decomposition>) -> Vec<Decomposition> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();
    let mut next_left = left.next();
    let mut next_right = right.next();
    loop {
        match (next_left.take(), next_right.take()) {
            (Some(a), Some(b)) => {
                if a >= b {
                    merged.push(a);
                    next_left = left.next();
                    next_right = Some(b);
                } else {
                    merged.push(b);
                    next_left = Some(a);
                    next_right = right.next();
                }
            }
            (Some(a), None) => {
                merged.push(a);
                merged.extend(left);
                break;
            }
            (None, Some(b)) => {
                merged.push(b);
                merged.extend(right);
                break;
            }
            (None, None) => break,
        }
    }
    merged
}

/// Reduces many sorted streams to one by rounds of pairwise merging.
fn merge_pairwise(mut streams: Vec<Vec<Decomposition>>) -> Vec<Decomposition> {
    while streams.len() > 1 {
        let mut round = Vec::with_capacity(streams.len().div_ceil(2));
        let mut iter = streams.into_iter();
        while let Some(first) = iter.next() {
            match iter.next() {
                Some(second) => round.push(merge_descending(first, second)),
                None => round.push(first),
            }
        }
        streams = round;
    }
    streams.pop().unwrap_or_default()
}

/// The precomputed decomposition table of a round.
///
/// Immutable once built; queries take `&self` and clients can share one
/// instance across threads without synchronization.
pub struct PossibleDecompositions {
    minimum_total_value: u64,
    maximum_total_value: u64,
    maximum_outputs: usize,
    by_size: Vec<DecompositionsOfASize>,
}

impl PossibleDecompositions {
    /// Precomputes all decompositions over `denominations` whose totals can
    /// land in `[minimum_total_value, maximum_total_value]` using at most
    /// `maximum_outputs` outputs.
    ///
    /// Panics on inconsistent bounds, an empty denomination table, or a
    /// zero denomination.
    pub fn new(
        denominations: &[u64],
        minimum_total_value: u64,
        maximum_total_value: u64,
        maximum_outputs: usize,
    ) -> Self {
        assert!(!denominations.is_empty(), "at least one denomination");
        assert!(!denominations.contains(&0), "denominations must be positive");
        assert!(
            minimum_total_value <= maximum_total_value,
            "inconsistent total value bounds"
        );
        assert!(maximum_outputs >= 1, "at least one output");

        let mut denominations = denominations.to_vec();
        denominations.sort_unstable_by(|a, b| b.cmp(a));
        denominations.dedup();

        let singletons: Vec<Decomposition> = denominations
            .iter()
            .filter(|&&denomination| {
                denomination <= maximum_total_value
                    && denomination.saturating_mul(maximum_outputs as u64) >= minimum_total_value
            })
            .map(|&denomination| Decomposition::new(&[denomination]))
            .collect();
        let mut by_size = vec![DecompositionsOfASize { size: 1, decompositions: singletons }];
        for _ in 1..maximum_outputs {
            let previous = &by_size[by_size.len() - 1];
            if previous.decompositions.is_empty() {
                break;
            }
            let next = previous.extend(
                &denominations,
                minimum_total_value,
                maximum_total_value,
                maximum_outputs,
            );
            by_size.push(next);
        }
        PossibleDecompositions {
            minimum_total_value,
            maximum_total_value,
            maximum_outputs,
            by_size,
        }
    }

    /// The decompositions whose totals fit the given budget, largest total
    /// first.
    ///
    /// Size-k candidates pay for their own outputs: `k · fee_rate ·
    /// output_virtual_size` comes off `maximum_effective_cost` before the
    /// size class is pruned. `minimum_value` is the dust floor: any
    /// decomposition whose smallest output is below it is excluded. The
    /// result is truncated to `maximum_decompositions`.
    ///
    /// Panics when the query reaches outside the precomputed range.
    #[allow(clippy::too_many_arguments)]
    pub fn by_total_value(
        &self,
        maximum_effective_cost: u64,
        minimum_total_value: u64,
        minimum_value: u64,
        maximum_outputs: usize,
        maximum_decompositions: usize,
        fee_rate: u64,
        output_virtual_size: u64,
    ) -> Vec<Decomposition> {
        assert!(
            minimum_total_value >= self.minimum_total_value
                && maximum_effective_cost <= self.maximum_total_value,
            "query outside the precomputed total value range"
        );
        assert!(
            maximum_outputs <= self.maximum_outputs,
            "query outside the precomputed output budget"
        );
        assert!(
            minimum_total_value <= maximum_effective_cost,
            "inconsistent query bounds"
        );

        let output_fee = fee_rate.saturating_mul(output_virtual_size);
        let mut streams = Vec::new();
        for size_class in self.by_size.iter().take(maximum_outputs) {
            let fees = output_fee.saturating_mul(size_class.size as u64);
            let Some(budget) = maximum_effective_cost.checked_sub(fees) else {
                break;
            };
            if budget < minimum_total_value {
                break;
            }
            let stream: Vec<Decomposition> = prune_by_total(
                &size_class.decompositions,
                minimum_total_value,
                budget,
            )
            .iter()
            .filter(|decomposition| decomposition.smallest() >= minimum_value)
            .take(maximum_decompositions)
            .cloned()
            .collect();
            if !stream.is_empty() {
                streams.push(stream);
            }
        }
        let mut merged = merge_pairwise(streams);
        merged.truncate(maximum_decompositions);
        merged
    }
}
