use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};
use crate::{
    constants::*,
    errors::ErrorCode,
    events::RaffleEntered,
    state::{Config, Raffle},
};

#[derive(Accounts)]
pub struct Enter<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(seeds = [SEED_CONFIG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_RAFFLE],
        bump,
    )]
    pub raffle: AccountLoader<'info, Raffle>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Enter>, amount: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;

    let (pot_after, players_count) = {
        let mut raffle = ctx.accounts.raffle.load_mut()?;

        // Entries stay rejected for the whole randomness round-trip so the
        // entrant set is frozen from trigger to fulfillment.
        require!(raffle.is_open(), ErrorCode::RaffleNotOpen);
        require!(amount >= cfg.entry_fee, ErrorCode::InsufficientPayment);

        raffle.push_player(ctx.accounts.player.key(), amount)?;
        (raffle.pot, raffle.players_count)
    };

    // Escrow the payment in the raffle PDA, on top of its rent.
    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.player.to_account_info(),
                to: ctx.accounts.raffle.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(RaffleEntered {
        player: ctx.accounts.player.key(),
        amount,
        pot_after,
        players_count,
    });

    Ok(())
}
