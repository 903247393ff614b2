//! Optimistic assertions
//!
//! ```text
//! assert_result ──▶ (liveness) ──▶ settle_assertion
//!       │
//!       └──▶ dispute_assertion ──▶ arbitrate_assertion ──▶ settle_assertion
//! ```
//!
//! Both bonds are held in the config-owned bond escrow until settlement
//! releases them to the winning side.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::errors::{OracleError, ValidationError};
use crate::oracle::{MatchFacts, OptimisticOracle, ResultOracle};
use crate::state::{Assertion, Config, FactsRecord};
use crate::utils::move_collateral;

#[derive(Accounts)]
pub struct AssertResult<'info> {
    #[account(mut)]
    pub asserter: Signer<'info>,

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

    #[account(
        init,
        payer = asserter,
        space = 8 + Assertion::INIT_SPACE,
        seeds = [
            Assertion::SEED,
            facts_record.market.as_ref(),
            facts_record.assertion_count.to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub assertion: Box<Account<'info, Assertion>>,

    #[account(
        address = config.collateral_mint @ ValidationError::InvalidParameter,
    )]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = asserter,
    )]
    pub asserter_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
    )]
    pub bond_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> AssertResult<'info> {
    pub fn assert_result(&mut self, facts: MatchFacts, bumps: &AssertResultBumps) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let config: &Config = &self.config;
        let oracle = OptimisticOracle::from_config(config);

        let opened = oracle.assert_facts(
            &mut self.facts_record,
            config,
            self.assertion.key(),
            self.asserter.key(),
            self.collateral_mint.key(),
            self.asserter_collateral.amount,
            facts,
            now,
            bumps.assertion,
        )?;
        self.assertion.set_inner(opened.assertion);

        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.asserter_collateral,
            &self.bond_escrow,
            self.asserter.to_account_info(),
            &[],
            oracle.bond,
        )?;

        msg!(
            "Assertion on market {} live until {}",
            opened.made.market_id,
            opened.made.expiration
        );
        emit!(opened.proposed);
        emit!(opened.made);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct DisputeAssertion<'info> {
    #[account(mut)]
    pub disputer: Signer<'info>,

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

    #[account(
        mut,
        seeds = [
            Assertion::SEED,
            assertion.market.as_ref(),
            assertion.nonce.to_le_bytes().as_ref(),
        ],
        bump = assertion.bump,
    )]
    pub assertion: Box<Account<'info, Assertion>>,

    #[account(address = assertion.currency)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = disputer,
    )]
    pub disputer_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
    )]
    pub bond_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> DisputeAssertion<'info> {
    pub fn dispute_assertion(&mut self, reason: String) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let config: &Config = &self.config;
        let assertion_key = self.assertion.key();

        let disputed = OptimisticOracle::dispute(
            &mut self.assertion,
            &mut self.facts_record,
            config,
            assertion_key,
            self.disputer.key(),
            self.disputer_collateral.amount,
            reason,
            now,
        )?;

        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.disputer_collateral,
            &self.bond_escrow,
            self.disputer.to_account_info(),
            &[],
            self.assertion.bond,
        )?;

        msg!("Assertion {} disputed: {}", assertion_key, disputed.reason);
        emit!(disputed);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct ArbitrateAssertion<'info> {
    pub arbiter: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [
            Assertion::SEED,
            assertion.market.as_ref(),
            assertion.nonce.to_le_bytes().as_ref(),
        ],
        bump = assertion.bump,
    )]
    pub assertion: Box<Account<'info, Assertion>>,
}

impl<'info> ArbitrateAssertion<'info> {
    pub fn arbitrate_assertion(&mut self, truthful: bool) -> Result<()> {
        let config: &Config = &self.config;
        let assertion_key = self.assertion.key();

        let arbitrated = OptimisticOracle::arbitrate(
            &mut self.assertion,
            config,
            &self.arbiter.key(),
            assertion_key,
            truthful,
        )?;

        msg!("Assertion {} ruled truthful: {}", assertion_key, truthful);
        emit!(arbitrated);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct SettleAssertion<'info> {
    /// Anyone may settle; pays for the recipient's token account if needed
    #[account(mut)]
    pub caller: Signer<'info>,

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

    #[account(
        mut,
        seeds = [
            Assertion::SEED,
            assertion.market.as_ref(),
            assertion.nonce.to_le_bytes().as_ref(),
        ],
        bump = assertion.bump,
    )]
    pub assertion: Box<Account<'info, Assertion>>,

    #[account(address = assertion.currency)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
    )]
    pub bond_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Checked against the settlement's bond recipient in the handler
    pub bond_recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = caller,
        associated_token::mint = collateral_mint,
        associated_token::authority = bond_recipient,
    )]
    pub recipient_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> SettleAssertion<'info> {
    pub fn settle_assertion(&mut self) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let config: &Config = &self.config;
        let assertion_key = self.assertion.key();

        let settled = OptimisticOracle::settle(
            &mut self.assertion,
            &mut self.facts_record,
            config,
            assertion_key,
            now,
        )?;
        require_keys_eq!(
            self.bond_recipient.key(),
            settled.bond_recipient,
            OracleError::WrongBondRecipient
        );

        let config_seeds: &[&[u8]] = &[Config::SEED, &[self.config.bump]];
        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.bond_escrow,
            &self.recipient_collateral,
            self.config.to_account_info(),
            &[config_seeds],
            settled.bond_payout,
        )?;

        msg!(
            "Assertion {} settled, accepted: {}, {} bond to {}",
            assertion_key,
            settled.settled.accepted,
            settled.bond_payout,
            settled.bond_recipient
        );
        emit!(settled.settled);
        emit!(settled.finalized);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct ViewAssertion<'info> {
    pub assertion: Box<Account<'info, Assertion>>,
}

impl<'info> ViewAssertion<'info> {
    pub fn can_settle(&self) -> Result<bool> {
        let now = Clock::get()?.unix_timestamp;
        Ok(OptimisticOracle::can_settle(&self.assertion, now))
    }
}

#[derive(Accounts)]
pub struct ViewFacts<'info> {
    pub facts_record: Box<Account<'info, FactsRecord>>,
}

impl<'info> ViewFacts<'info> {
    pub fn get_result_hash(&self) -> Result<[u8; 32]> {
        self.facts_record.get_result_hash()
    }

    pub fn is_result_finalized(&self) -> Result<bool> {
        Ok(self.facts_record.is_finalized())
    }
}
