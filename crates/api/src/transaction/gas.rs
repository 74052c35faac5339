// Path: crates/api/src/transaction/gas.rs

use zoracle_types::OracleError;

/// Accumulates gas charged to a single transaction against a fixed limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    /// A meter with the given limit.
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// A meter that never runs out. Used for block-level housekeeping.
    pub fn infinite() -> Self {
        Self::new(u64::MAX)
    }

    /// The gas limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Gas still available.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    /// Charges `amount`. Exceeding the limit is an `OutOfGas` error and leaves
    /// the meter saturated at its limit.
    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) -> Result<(), OracleError> {
        let total = self.consumed.saturating_add(amount);
        if total > self.limit {
            let remaining = self.remaining();
            self.consumed = self.limit;
            return Err(OracleError::OutOfGas(format!(
                "{}: needed {} with {} remaining",
                descriptor, amount, remaining
            )));
        }
        self.consumed = total;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_until_limit() {
        let mut meter = GasMeter::new(100);
        meter.consume_gas(60, "first").unwrap();
        assert_eq!(meter.remaining(), 40);
        let err = meter.consume_gas(41, "second").unwrap_err();
        assert!(matches!(err, OracleError::OutOfGas(_)));
        assert_eq!(meter.consumed(), 100);
    }
}
