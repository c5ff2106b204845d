use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::WinnerPicked,
    state::{Config, Raffle},
    utils::winner_index,
};

/// MagicBlock VRF program identity PDA — only the VRF program can sign as this address.
const VRF_PROGRAM_IDENTITY_BYTES: [u8; 32] =
    ephemeral_vrf_sdk::consts::VRF_PROGRAM_IDENTITY.to_bytes();
pub static VRF_PROGRAM_IDENTITY: Pubkey = Pubkey::new_from_array(VRF_PROGRAM_IDENTITY_BYTES);

#[derive(Accounts)]
pub struct FulfillRandomness<'info> {
    /// VRF program identity PDA — only the VRF program can produce this signature.
    #[account(address = VRF_PROGRAM_IDENTITY)]
    pub vrf_program_identity: Signer<'info>,

    #[account(seeds = [SEED_CONFIG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_RAFFLE],
        bump,
    )]
    pub raffle: AccountLoader<'info, Raffle>,

    /// CHECK: request marker — never created on chain; its address is the
    /// correlation id and must equal the raffle's outstanding request.
    pub request: AccountInfo<'info>,
    //
    // remaining_accounts: the frozen entrant set, enrolled at request time.
    // The winner is paid from these.
}

pub fn handler(ctx: Context<FulfillRandomness>, randomness: [u8; 32]) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let (winner, payout, round) = {
        let mut raffle = ctx.accounts.raffle.load_mut()?;

        // The marker address is the sole authorization beyond the oracle
        // signature: replays, stale rounds and never-issued ids all miss.
        require!(
            raffle.matches_pending_request(&ctx.accounts.request.key()),
            ErrorCode::UnknownRequest
        );

        let index = winner_index(&randomness, raffle.players_count)?;
        let winner = Pubkey::new_from_array(raffle.players.data[index]);
        let payout = raffle.settle(winner, now)?;
        (winner, payout, raffle.rounds_completed)
    };

    // Pay the full pot. Any failure from here aborts the transaction, so the
    // reset above never survives a failed payout and the round stays
    // Calculating for a retried fulfillment.
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
