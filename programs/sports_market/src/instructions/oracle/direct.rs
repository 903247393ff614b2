//! Direct reporting
//!
//! An account holding the oracle role submits facts; they are final at once.

use anchor_lang::prelude::*;

use crate::errors::{OracleError, ValidationError};
use crate::oracle::{DirectOracle, MatchFacts};
use crate::state::{Config, FactsRecord};

#[derive(Accounts)]
pub struct ProposeResult<'info> {
    pub reporter: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [FactsRecord::SEED, facts_record.market.as_ref()],
        bump = facts_record.bump,
    )]
    pub facts_record: Box<Account<'info, FactsRecord>>,
}

impl<'info> ProposeResult<'info> {
    pub fn propose_result(&mut self, facts: MatchFacts) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let config: &Config = &self.config;

        let (proposed, finalized) =
            DirectOracle::propose(&mut self.facts_record, config, &self.reporter.key(), facts, now)?;

        msg!("Result for market {} finalized", proposed.market_id);
        emit!(proposed);
        emit!(finalized);
        Ok(())
    }
}

/// Facts records to report on are passed as writable remaining accounts,
/// in the same order as the facts.
#[derive(Accounts)]
pub struct ProposeResultsBatch<'info> {
    pub reporter: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,
}

pub fn handle_propose_results_batch<'info>(
    ctx: Context<'_, '_, 'info, 'info, ProposeResultsBatch<'info>>,
    facts: Vec<MatchFacts>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let reporter = ctx.accounts.reporter.key();
    let config: &Config = &ctx.accounts.config;

    require!(
        !facts.is_empty() && facts.len() == ctx.remaining_accounts.len(),
        ValidationError::InvalidBatch
    );

    for (info, market_facts) in ctx.remaining_accounts.iter().zip(facts) {
        require!(info.is_writable, ValidationError::InvalidBatch);
        let mut record = Account::<FactsRecord>::try_from(info)?;
        let expected = Pubkey::create_program_address(
            &[FactsRecord::SEED, record.market.as_ref(), &[record.bump]],
            &crate::ID,
        )
        .map_err(|_| error!(OracleError::WrongMarket))?;
        require_keys_eq!(expected, info.key(), OracleError::WrongMarket);

        let (proposed, finalized) =
            DirectOracle::propose(&mut record, config, &reporter, market_facts, now)?;
        record.exit(&crate::ID)?;

        msg!("Result for market {} finalized", proposed.market_id);
        emit!(proposed);
        emit!(finalized);
    }

    Ok(())
}
