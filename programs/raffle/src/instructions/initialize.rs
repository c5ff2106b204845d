use anchor_lang::prelude::*;
use crate::{constants::*, errors::ErrorCode, state::{Config, Raffle}};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitializeArgs {
    /// Entry fee in lamports.
    pub entry_fee: u64,
    /// Minimum seconds between round start and upkeep readiness.
    pub interval_sec: u32,
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = Config::SPACE,
        seeds = [SEED_CONFIG],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = payer,
        space = Raffle::SPACE,
        seeds = [SEED_RAFFLE],
        bump
    )]
    pub raffle: AccountLoader<'info, Raffle>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
    require!(args.entry_fee > 0, ErrorCode::InvalidEntryFee);
    require!(args.interval_sec > 0, ErrorCode::InvalidRoundInterval);

    let cfg = &mut ctx.accounts.config;
    cfg.admin = ctx.accounts.admin.key();
    cfg.entry_fee = args.entry_fee;
    cfg.interval_sec = args.interval_sec;
    cfg.bump = ctx.bumps.config;
    cfg.reserved = [0u8; 15];

    let now = Clock::get()?.unix_timestamp;
    let mut raffle = ctx.accounts.raffle.load_init()?;
    raffle.bump = ctx.bumps.raffle;
    raffle.last_timestamp = now;
    // phase=0 (Open), pot=0, players_count=0, etc. — already zeroed by init

    Ok(())
}
