//! Global Protocol Configuration
//!
//! This account stores protocol-wide settings, the role table and the
//! pause switch. Every mutating instruction authorizes its caller against it.

use anchor_lang::prelude::*;

use crate::constants::MAX_ROLE_GRANTS;
use crate::errors::AccessError;

/// Capabilities a caller can hold
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub enum Role {
    /// Protocol administration, vault management, cancel-after-resolve
    Admin,
    /// Locks, resolves and finalizes markets
    Keeper,
    /// Opens and cancels markets
    Operator,
    /// Reports match facts
    Oracle,
    /// Toggles the pause switch
    Pauser,
    /// Acts on behalf of users (bets, redemptions)
    Router,
}

/// One entry of the role table
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub struct RoleGrant {
    pub role: Role,
    pub member: Pubkey,
}

/// Role/pause authority consumed by the market core.
pub trait AccessControl {
    fn has_role(&self, role: Role, actor: &Pubkey) -> bool;

    fn is_paused(&self) -> bool;

    fn require_active(&self) -> Result<()> {
        require!(!self.is_paused(), AccessError::ProtocolPaused);
        Ok(())
    }

    fn require_any_role(&self, roles: &[Role], actor: &Pubkey) -> Result<()> {
        require!(
            roles.iter().any(|role| self.has_role(*role, actor)),
            AccessError::Unauthorized
        );
        Ok(())
    }

    /// Pause check followed by a role check
    fn authorize(&self, roles: &[Role], actor: &Pubkey) -> Result<()> {
        self.require_active()?;
        self.require_any_role(roles, actor)
    }
}

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Protocol owner; implicitly holds `Role::Admin`
    pub admin: Pubkey,

    /// Settlement currency shared by every market and the vault
    pub collateral_mint: Pubkey,

    /// Explicit role grants
    #[max_len(32)]
    pub roles: Vec<RoleGrant>,

    /// Total markets created (used as incrementing ID)
    pub market_count: u64,

    /// Seconds after kickoff when anyone may lock a market
    pub lock_grace_secs: i64,

    /// Bond posted by asserters and disputers of optimistic results
    pub oracle_bond: u64,

    /// Challenge window for optimistic results
    pub oracle_liveness_secs: i64,

    /// Whether the protocol is paused
    pub paused: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = b"config";

    /// Adds a grant. Granting an existing pair is a no-op.
    pub fn grant(&mut self, role: Role, member: Pubkey) -> Result<bool> {
        let grant = RoleGrant { role, member };
        if self.roles.contains(&grant) {
            return Ok(false);
        }
        require!(self.roles.len() < MAX_ROLE_GRANTS, AccessError::RoleTableFull);
        self.roles.push(grant);
        Ok(true)
    }

    /// Removes a grant, returning whether it existed.
    pub fn revoke(&mut self, role: Role, member: Pubkey) -> Result<bool> {
        require!(
            !(role == Role::Admin && member == self.admin),
            AccessError::CannotRevokeOwner
        );
        let before = self.roles.len();
        self.roles.retain(|g| !(g.role == role && g.member == member));
        Ok(self.roles.len() != before)
    }
}

impl AccessControl for Config {
    fn has_role(&self, role: Role, actor: &Pubkey) -> bool {
        if role == Role::Admin && *actor == self.admin {
            return true;
        }
        self.roles
            .iter()
            .any(|g| g.role == role && g.member == *actor)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
