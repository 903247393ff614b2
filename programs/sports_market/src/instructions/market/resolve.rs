//! Market Resolution
//!
//! A keeper or oracle presents the raw facts bytes; they must hash to the
//! finalized content hash held by the market's facts record. The market's
//! mapper then turns the facts into winning outcomes and weights.

use anchor_lang::prelude::*;

use crate::errors::OracleError;
use crate::state::{Config, FactsRecord, Market};

#[derive(Accounts)]
pub struct ResolveMarket<'info> {
    /// Keeper or oracle
    pub resolver: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [Market::SEED, market.id.to_le_bytes().as_ref()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        seeds = [FactsRecord::SEED, market.key().as_ref()],
        bump = facts_record.bump,
        constraint = facts_record.market == market.key() @ OracleError::WrongMarket,
    )]
    pub facts_record: Box<Account<'info, FactsRecord>>,
}

impl<'info> ResolveMarket<'info> {
    pub fn resolve_market(&mut self, raw_facts: Vec<u8>) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let config: &Config = &self.config;
        let record: &FactsRecord = &self.facts_record;

        let resolved = self
            .market
            .resolve(config, &self.resolver.key(), record, &raw_facts, now)?;

        msg!(
            "Market {} resolved: outcomes {:?}, weights {:?}",
            resolved.market_id,
            resolved.winning_outcomes,
            resolved.weights
        );
        emit!(resolved);
        Ok(())
    }
}
