// Path: crates/types/src/app/coin.rs
//! Fee denominations attached to data sources.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A single amount of one denomination.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Coin {
    /// The denomination, e.g. `uband`.
    pub denom: String,
    /// The amount in the smallest unit of `denom`.
    pub amount: u64,
}

impl Coin {
    /// Creates a new coin.
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

/// An ordered set of coins.
///
/// A valid set has positive amounts, well-formed denominations and is sorted
/// strictly ascending by denomination, so equal fees always encode identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(pub Vec<Coin>);

impl Coins {
    /// Returns an empty fee.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Checks amounts, denominations and ordering. An empty set is valid.
    pub fn is_valid(&self) -> bool {
        let mut prev: Option<&str> = None;
        for coin in &self.0 {
            if coin.amount == 0 || !is_valid_denom(&coin.denom) {
                return false;
            }
            if let Some(p) = prev {
                if p >= coin.denom.as_str() {
                    return false;
                }
            }
            prev = Some(&coin.denom);
        }
        true
    }
}

/// Denominations are 3 to 16 characters: a lowercase letter, then lowercase
/// letters or digits.
fn is_valid_denom(denom: &str) -> bool {
    let bytes = denom.as_bytes();
    if !(3..=16).contains(&bytes.len()) {
        return false;
    }
    match bytes.split_first() {
        Some((first, rest)) => {
            first.is_ascii_lowercase()
                && rest
                    .iter()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fee_is_valid() {
        assert!(Coins::empty().is_valid());
    }

    #[test]
    fn rejects_zero_amount_and_bad_denoms() {
        assert!(!Coins(vec![Coin::new("uband", 0)]).is_valid());
        assert!(!Coins(vec![Coin::new("UB", 10)]).is_valid());
        assert!(!Coins(vec![Coin::new("1band", 10)]).is_valid());
    }

    #[test]
    fn requires_strictly_sorted_denoms() {
        let sorted = Coins(vec![Coin::new("uatom", 1), Coin::new("uband", 2)]);
        assert!(sorted.is_valid());
        let unsorted = Coins(vec![Coin::new("uband", 2), Coin::new("uatom", 1)]);
        assert!(!unsorted.is_valid());
        let dup = Coins(vec![Coin::new("uband", 2), Coin::new("uband", 1)]);
        assert!(!dup.is_valid());
    }
}
