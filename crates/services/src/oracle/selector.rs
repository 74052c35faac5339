// Path: crates/services/src/oracle/selector.rs
use zoracle_api::oracle::ValidatorSelector;
use zoracle_api::state::StateAccess;
use zoracle_types::app::{RequestId, ValAddress};
use zoracle_types::OracleError;

/// A fixed active set. Each request takes `count` consecutive validators,
/// starting at a position that rotates with the request ID so load spreads
/// across the set.
#[derive(Debug, Clone, Default)]
pub struct StaticValidatorSet {
    validators: Vec<ValAddress>,
}

impl StaticValidatorSet {
    /// Builds the set, dropping duplicates while keeping first occurrence order.
    pub fn new(validators: impl IntoIterator<Item = ValAddress>) -> Self {
        let mut unique: Vec<ValAddress> = Vec::new();
        for v in validators {
            if !unique.contains(&v) {
                unique.push(v);
            }
        }
        Self { validators: unique }
    }

    pub fn validators(&self) -> &[ValAddress] {
        &self.validators
    }
}

impl ValidatorSelector for StaticValidatorSet {
    fn select(
        &self,
        _state: &dyn StateAccess,
        request_id: RequestId,
        count: u64,
    ) -> Result<Vec<ValAddress>, OracleError> {
        let n = self.validators.len();
        if count > n as u64 {
            return Err(OracleError::BadValue(format!(
                "requested {} validators but only {} are active",
                count, n
            )));
        }
        let start = (request_id.0.saturating_sub(1) % n.max(1) as u64) as usize;
        Ok(self
            .validators
            .iter()
            .cycle()
            .skip(start)
            .take(count as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zoracle_state::prelude::InMemoryState;

    fn set() -> StaticValidatorSet {
        StaticValidatorSet::new((1u8..=4).map(|b| ValAddress(vec![b])))
    }

    #[test]
    fn selection_rotates_with_request_id() {
        let state = InMemoryState::new();
        let first = set().select(&state, RequestId(1), 2).unwrap();
        let second = set().select(&state, RequestId(2), 2).unwrap();
        assert_eq!(first, vec![ValAddress(vec![1]), ValAddress(vec![2])]);
        assert_eq!(second, vec![ValAddress(vec![2]), ValAddress(vec![3])]);
        let wrapped = set().select(&state, RequestId(4), 3).unwrap();
        assert_eq!(
            wrapped,
            vec![ValAddress(vec![4]), ValAddress(vec![1]), ValAddress(vec![2])]
        );
    }

    #[test]
    fn too_many_requested_is_rejected() {
        let state = InMemoryState::new();
        assert!(matches!(
            set().select(&state, RequestId(1), 5),
            Err(OracleError::BadValue(_))
        ));
    }

    #[test]
    fn duplicates_are_dropped() {
        let s = StaticValidatorSet::new(vec![ValAddress(vec![1]), ValAddress(vec![1])]);
        assert_eq!(s.validators().len(), 1);
    }
}
