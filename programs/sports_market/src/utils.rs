//! Token movement helpers shared by the instruction handlers.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

/// `transfer_checked` of `amount` collateral. Pass empty `signer_seeds`
/// when `authority` signed the transaction; zero amounts are skipped.
pub fn move_collateral<'info>(
    token_program: &Interface<'info, TokenInterface>,
    mint: &InterfaceAccount<'info, Mint>,
    from: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let accounts = TransferChecked {
        from: from.to_account_info(),
        mint: mint.to_account_info(),
        to: to.to_account_info(),
        authority,
    };
    let ctx = if signer_seeds.is_empty() {
        CpiContext::new(token_program.to_account_info(), accounts)
    } else {
        CpiContext::new_with_signer(token_program.to_account_info(), accounts, signer_seeds)
    };
    transfer_checked(ctx, amount, mint.decimals)
}
