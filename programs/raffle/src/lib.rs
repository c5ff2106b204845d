use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod state;
pub mod utils;
pub mod instructions;

use instructions::*;
use state::UpkeepStatus;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod raffle {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
        initialize::handler(ctx, args)
    }

    pub fn enter(ctx: Context<Enter>, amount: u64) -> Result<()> {
        enter::handler(ctx, amount)
    }

    /// Keeper probe — reports readiness without touching state.
    pub fn check_upkeep(ctx: Context<CheckUpkeep>, check_data: Vec<u8>) -> Result<UpkeepStatus> {
        check_upkeep::handler(ctx, check_data)
    }

    /// Close entries and request randomness for the winner draw.
    pub fn perform_upkeep(ctx: Context<PerformUpkeep>, perform_data: Vec<u8>) -> Result<()> {
        perform_upkeep::handler(ctx, perform_data)
    }

    /// VRF oracle callback — pays the winner and reopens the raffle.
    pub fn fulfill_randomness(
        ctx: Context<FulfillRandomness>,
        randomness: [u8; 32],
    ) -> Result<()> {
        fulfill_randomness::handler(ctx, randomness)
    }

    /// Admin-only test fulfillment (bypasses the VRF oracle). Only available
    /// with the `devnet` feature.
    #[cfg(feature = "devnet")]
    pub fn mock_fulfill_randomness(
        ctx: Context<MockFulfillRandomness>,
        randomness: [u8; 32],
    ) -> Result<()> {
        mock_fulfill_randomness::handler(ctx, randomness)
    }
}
