use crate::types::MigrationOutcome;

/// Collects the outcomes of a migration.
///
/// Outcomes are appended as each phase produces them and returned phase by phase: rejected
/// requests in request order, then signature and relay results in relay order, then on-chain
/// results in execution order.
#[derive(Debug, Default)]
pub struct OutcomeLog {
    reconciliation: Vec<MigrationOutcome>,
    authorization: Vec<MigrationOutcome>,
    execution: Vec<MigrationOutcome>,
}

impl OutcomeLog {
    /// Records outcomes of rejected requests.
    pub fn rejected(&mut self, outcomes: impl IntoIterator<Item = MigrationOutcome>) {
        self.reconciliation.extend(outcomes);
    }

    /// Records outcomes of signing and relay dispatch.
    pub fn authorized(&mut self, outcomes: impl IntoIterator<Item = MigrationOutcome>) {
        self.authorization.extend(outcomes);
    }

    /// Records outcomes of on-chain execution.
    pub fn executed(&mut self, outcomes: impl IntoIterator<Item = MigrationOutcome>) {
        self.execution.extend(outcomes);
    }

    /// Returns every outcome in order.
    pub fn into_outcomes(self) -> Vec<MigrationOutcome> {
        let mut outcomes = self.reconciliation;
        outcomes.extend(self.authorization);
        outcomes.extend(self.execution);
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    #[test]
    fn phases_are_ordered() {
        let mut log = OutcomeLog::default();
        log.executed([MigrationOutcome::new(Address::with_last_byte(3), "c")]);
        log.authorized([MigrationOutcome::new(Address::with_last_byte(2), "b")]);
        log.rejected([MigrationOutcome::new(Address::with_last_byte(1), "a")]);
        log.executed([MigrationOutcome::new(Address::with_last_byte(4), "d")]);

        let messages =
            log.into_outcomes().into_iter().map(|o| o.message).collect::<Vec<_>>();
        assert_eq!(messages, ["a", "b", "c", "d"]);
    }
}
