//! The standard output denominations of a CoinJoin round.
//!
//! Outputs are restricted to a fixed ladder of "friendly" amounts so that
//! outputs from different participants blend together. The ladder is the
//! union of three families, capped at the total money supply: powers of two,
//! powers of three and their doubles, and powers of ten times one, two, and
//! five (the preferred-value series of banknotes).

use std::collections::BTreeSet;

/// Total satoshi supply; no amount in the protocol can exceed it.
pub const MAX_MONEY: u64 = 2_099_999_997_690_000;

/// Every standard denomination not exceeding [`MAX_MONEY`], ascending and
/// deduplicated.
pub fn standard_denominations() -> Vec<u64> {
    let mut denominations = BTreeSet::new();
    for base in [2u64, 3, 10] {
        let multipliers: &[u64] = match base {
            2 => &[1],
            3 => &[1, 2],
            _ => &[1, 2, 5],
        };
        let mut power = 1u64;
        loop {
            for &multiplier in multipliers {
                match power.checked_mul(multiplier) {
                    Some(value) if value <= MAX_MONEY => {
                        denominations.insert(value);
                    }
                    _ => {}
                }
            }
            match power.checked_mul(base) {
                Some(next) if next <= MAX_MONEY => power = next,
                _ => break,
            }
        }
    }
    denominations.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_and_unique() {
        let denominations = standard_denominations();
        assert!(denominations.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(denominations.first(), Some(&1));
        assert!(denominations.last().is_some_and(|&largest| largest <= MAX_MONEY));
    }

    #[test]
    fn contains_all_three_families() {
        let denominations = standard_denominations();
        // Powers of two.
        assert!(denominations.contains(&4096));
        assert!(denominations.contains(&(1u64 << 50)));
        // Powers of three and their doubles.
        assert!(denominations.contains(&729));
        assert!(denominations.contains(&1458));
        // 1-2-5 series.
        assert!(denominations.contains(&5_000_000));
        assert!(denominations.contains(&200_000_000));
    }

    #[test]
    fn respects_the_money_cap() {
        for denomination in standard_denominations() {
            assert!(denomination <= MAX_MONEY);
        }
        // 2^51 is above MAX_MONEY and must be absent.
        assert!(!standard_denominations().contains(&(1u64 << 51)));
    }
}
