use anchor_lang::prelude::*;

use super::MatchFacts;
use crate::events::{ResultFinalized, ResultProposed};
use crate::state::{AccessControl, FactsRecord, OracleBackend, Role};

/// Trusted-reporter backend: facts are final the moment they are accepted.
pub struct DirectOracle;

impl DirectOracle {
    pub fn propose(
        record: &mut FactsRecord,
        access: &impl AccessControl,
        reporter: &Pubkey,
        facts: MatchFacts,
        now: i64,
    ) -> Result<(ResultProposed, ResultFinalized)> {
        access.authorize(&[Role::Oracle], reporter)?;
        record.require_backend(OracleBackend::Direct)?;

        let result_hash = record.record_proposal(*reporter, facts, now)?;
        record.finalize(now)?;

        Ok((
            ResultProposed {
                market_id: record.market_id,
                proposer: *reporter,
                backend: OracleBackend::Direct,
                result_hash,
                timestamp: now,
            },
            ResultFinalized {
                market_id: record.market_id,
                result_hash,
                accepted: true,
                timestamp: now,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AccessError, OracleError};
    use crate::oracle::{ResultOracle, Scope};
    use crate::testing::{assert_err, test_config};

    const NOW: i64 = 1_700_000_000;

    fn facts() -> MatchFacts {
        MatchFacts {
            scope: Scope::FullTime,
            home_goals: 1,
            away_goals: 0,
            extra_time: false,
            penalties: None,
            reported_at: NOW,
        }
    }

    #[test]
    fn test_reporter_finalizes_immediately() {
        let reporter = Pubkey::new_unique();
        let mut config = test_config(Pubkey::new_unique());
        config.grant(Role::Oracle, reporter).unwrap();
        let mut record = FactsRecord::new(Pubkey::new_unique(), 3, OracleBackend::Direct, 255);

        let (proposed, finalized) =
            DirectOracle::propose(&mut record, &config, &reporter, facts(), NOW).unwrap();

        assert!(record.is_finalized());
        assert_eq!(proposed.result_hash, facts().result_hash(3));
        assert_eq!(finalized.result_hash, proposed.result_hash);
        assert!(finalized.accepted);
    }

    #[test]
    fn test_requires_oracle_role() {
        let mut record = FactsRecord::new(Pubkey::new_unique(), 3, OracleBackend::Direct, 255);
        let config = test_config(Pubkey::new_unique());
        assert_err(
            DirectOracle::propose(&mut record, &config, &Pubkey::new_unique(), facts(), NOW),
            AccessError::Unauthorized,
        );
    }

    #[test]
    fn test_rejects_optimistic_record() {
        let reporter = Pubkey::new_unique();
        let mut config = test_config(Pubkey::new_unique());
        config.grant(Role::Oracle, reporter).unwrap();
        let mut record =
            FactsRecord::new(Pubkey::new_unique(), 3, OracleBackend::Optimistic, 255);
        assert_err(
            DirectOracle::propose(&mut record, &config, &reporter, facts(), NOW),
            OracleError::WrongBackend,
        );
    }

    #[test]
    fn test_results_are_immutable() {
        let reporter = Pubkey::new_unique();
        let mut config = test_config(Pubkey::new_unique());
        config.grant(Role::Oracle, reporter).unwrap();
        let mut record = FactsRecord::new(Pubkey::new_unique(), 3, OracleBackend::Direct, 255);

        DirectOracle::propose(&mut record, &config, &reporter, facts(), NOW).unwrap();
        let changed = MatchFacts { home_goals: 2, ..facts() };
        assert_err(
            DirectOracle::propose(&mut record, &config, &reporter, changed, NOW),
            OracleError::AlreadySubmitted,
        );
        assert_eq!(record.get_result_hash().unwrap(), facts().result_hash(3));
    }
}
