use anchor_lang::prelude::*;

use crate::state::{Config, Market};

#[derive(Accounts)]
pub struct LockMarket<'info> {
    /// Keeper, operator, or anyone once the lock grace has passed
    pub caller: Signer<'info>,

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
}

impl<'info> LockMarket<'info> {
    pub fn lock_market(&mut self) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let config: &Config = &self.config;

        let locked = self.market.lock(config, &self.caller.key(), now)?;

        msg!("Market {} locked by {}", locked.market_id, locked.locked_by);
        emit!(locked);
        Ok(())
    }
}
