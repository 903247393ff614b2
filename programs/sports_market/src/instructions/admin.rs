//! Role table, pause switch and protocol parameters.
//!
//! These instructions stay available while the protocol is paused so an
//! admin can always recover it.

use anchor_lang::prelude::*;

use crate::errors::ValidationError;
use crate::events::{PauseChanged, ProtocolParamsUpdated, RoleGranted, RoleRevoked};
use crate::state::{AccessControl, Config, Role};

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,
}

impl<'info> UpdateConfig<'info> {
    pub fn grant_role(&mut self, role: Role, member: Pubkey) -> Result<()> {
        self.config
            .require_any_role(&[Role::Admin], &self.authority.key())?;

        if self.config.grant(role, member)? {
            msg!("Granted {:?} to {}", role, member);
            emit!(RoleGranted { role, member });
        }
        Ok(())
    }

    pub fn revoke_role(&mut self, role: Role, member: Pubkey) -> Result<()> {
        self.config
            .require_any_role(&[Role::Admin], &self.authority.key())?;

        if self.config.revoke(role, member)? {
            msg!("Revoked {:?} from {}", role, member);
            emit!(RoleRevoked { role, member });
        }
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.config
            .require_any_role(&[Role::Pauser, Role::Admin], &self.authority.key())?;

        self.config.paused = paused;

        msg!("Protocol paused: {}", paused);
        emit!(PauseChanged {
            paused,
            changed_by: self.authority.key(),
        });
        Ok(())
    }

    pub fn update_oracle_params(&mut self, oracle_bond: u64, oracle_liveness_secs: i64) -> Result<()> {
        self.config
            .require_any_role(&[Role::Admin], &self.authority.key())?;
        require!(oracle_liveness_secs > 0, ValidationError::InvalidParameter);

        self.config.oracle_bond = oracle_bond;
        self.config.oracle_liveness_secs = oracle_liveness_secs;

        msg!("Oracle bond: {}, liveness: {}s", oracle_bond, oracle_liveness_secs);
        self.emit_params();
        Ok(())
    }

    pub fn update_lock_grace(&mut self, lock_grace_secs: i64) -> Result<()> {
        self.config
            .require_any_role(&[Role::Admin], &self.authority.key())?;
        require!(lock_grace_secs >= 0, ValidationError::InvalidParameter);

        self.config.lock_grace_secs = lock_grace_secs;

        msg!("Lock grace: {}s", lock_grace_secs);
        self.emit_params();
        Ok(())
    }

    fn emit_params(&self) {
        emit!(ProtocolParamsUpdated {
            lock_grace_secs: self.config.lock_grace_secs,
            oracle_bond: self.config.oracle_bond,
            oracle_liveness_secs: self.config.oracle_liveness_secs,
        });
    }
}
