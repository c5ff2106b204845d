use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::WinnerPicked,
    state::{Config, Raffle},
    utils::winner_index,
};

#[derive(Accounts)]
pub struct MockFulfillRandomness<'info> {
    /// Admin-only: drive the settlement path without the VRF oracle.
    #[account(constraint = admin.key() == config.admin @ ErrorCode::Unauthorized)]
    pub admin: Signer<'info>,

    #[account(seeds = [SEED_CONFIG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_RAFFLE],
        bump,
    )]
    pub raffle: AccountLoader<'info, Raffle>,

    /// CHECK: request marker, matched against the raffle's outstanding request.
    pub request: AccountInfo<'info>,
}

pub fn handler(ctx: Context<MockFulfillRandomness>, randomness: [u8; 32]) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let (winner, payout, round) = {
        let mut raffle = ctx.accounts.raffle.load_mut()?;
        require!(
            raffle.matches_pending_request(&ctx.accounts.request.key()),
            ErrorCode::UnknownRequest
        );

        let index = winner_index(&randomness, raffle.players_count)?;
        let winner = Pubkey::new_from_array(raffle.players.data[index]);
        let payout = raffle.settle(winner, now)?;
        (winner, payout, raffle.rounds_completed)
    };

    let winner_info = ctx
        .remaining_accounts
        .iter()
        .find(|a| a.key() == winner)
        .ok_or(ErrorCode::TransferFailed)?;

    ctx.accounts
        .raffle
        .to_account_info()
        .sub_lamports(payout)
        .map_err(|_| error!(ErrorCode::TransferFailed))?;
    winner_info
        .add_lamports(payout)
        .map_err(|_| error!(ErrorCode::TransferFailed))?;

    emit!(WinnerPicked {
        winner,
        payout,
        round,
    });

    Ok(())
}
