use anchor_lang::prelude::*;
use crate::{constants::*, state::{Config, Raffle, UpkeepStatus}};

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(seeds = [SEED_CONFIG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(seeds = [SEED_RAFFLE], bump)]
    pub raffle: AccountLoader<'info, Raffle>,
}

/// Keeper probe: reports whether `perform_upkeep` would succeed, with one
/// diagnostic per readiness clause. Takes the raffle read-only and mutates
/// nothing; the extra data argument is informational.
pub fn handler(ctx: Context<CheckUpkeep>, _check_data: Vec<u8>) -> Result<UpkeepStatus> {
    let raffle = ctx.accounts.raffle.load()?;
    let now = Clock::get()?.unix_timestamp;
    Ok(raffle.upkeep_status(ctx.accounts.config.interval_sec, now))
}
