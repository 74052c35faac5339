// Path: crates/services/src/oracle/reporter.rs
use zoracle_api::oracle::ReporterAuthorization;
use zoracle_api::state::StateAccess;
use zoracle_types::app::{AccAddress, ValAddress};
use zoracle_types::keys::reporter_key;
use zoracle_types::OracleError;

const AUTHORIZED: &[u8] = &[1];

/// Reporter delegations persisted in module state, one key per
/// (validator, reporter) pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreReporterRegistry;

impl ReporterAuthorization for StoreReporterRegistry {
    fn is_authorized(
        &self,
        state: &dyn StateAccess,
        reporter: &AccAddress,
        validator: &ValAddress,
    ) -> Result<bool, OracleError> {
        Ok(state.has(&reporter_key(validator, reporter))?)
    }

    fn add_reporter(
        &self,
        state: &mut dyn StateAccess,
        validator: &ValAddress,
        reporter: &AccAddress,
    ) -> Result<(), OracleError> {
        let key = reporter_key(validator, reporter);
        if state.has(&key)? {
            return Err(OracleError::Duplicate(format!(
                "{} is already a reporter of {}",
                reporter, validator
            )));
        }
        state.insert(&key, AUTHORIZED)?;
        tracing::info!(target: "oracle", %validator, %reporter, "reporter added");
        Ok(())
    }

    fn remove_reporter(
        &self,
        state: &mut dyn StateAccess,
        validator: &ValAddress,
        reporter: &AccAddress,
    ) -> Result<(), OracleError> {
        let key = reporter_key(validator, reporter);
        if !state.has(&key)? {
            return Err(OracleError::NotFound(format!(
                "{} is not a reporter of {}",
                reporter, validator
            )));
        }
        state.delete(&key)?;
        tracing::info!(target: "oracle", %validator, %reporter, "reporter removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zoracle_state::prelude::InMemoryState;

    #[test]
    fn add_check_remove() {
        let mut state = InMemoryState::new();
        let registry = StoreReporterRegistry;
        let validator = ValAddress(vec![1]);
        let reporter = AccAddress(vec![2]);

        assert!(!registry.is_authorized(&state, &reporter, &validator).unwrap());
        registry.add_reporter(&mut state, &validator, &reporter).unwrap();
        assert!(registry.is_authorized(&state, &reporter, &validator).unwrap());
        assert!(matches!(
            registry.add_reporter(&mut state, &validator, &reporter),
            Err(OracleError::Duplicate(_))
        ));

        registry.remove_reporter(&mut state, &validator, &reporter).unwrap();
        assert!(!registry.is_authorized(&state, &reporter, &validator).unwrap());
        assert!(matches!(
            registry.remove_reporter(&mut state, &validator, &reporter),
            Err(OracleError::NotFound(_))
        ));
    }

    #[test]
    fn authorization_is_per_validator() {
        let mut state = InMemoryState::new();
        let registry = StoreReporterRegistry;
        let reporter = AccAddress(vec![9]);
        registry
            .add_reporter(&mut state, &ValAddress(vec![1]), &reporter)
            .unwrap();
        assert!(!registry
            .is_authorized(&state, &reporter, &ValAddress(vec![2]))
            .unwrap());
    }
}
