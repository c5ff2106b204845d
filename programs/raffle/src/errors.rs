use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Raffle is not open")]
    RaffleNotOpen,
    #[msg("Payment is below the entry fee")]
    InsufficientPayment,
    #[msg("Upkeep is not needed")]
    UpkeepNotNeeded,
    #[msg("Unknown or stale randomness request")]
    UnknownRequest,
    #[msg("Winner payout failed")]
    TransferFailed,
    #[msg("Raffle has no players")]
    NoPlayers,
    #[msg("Too many players for this round")]
    MaxPlayersReached,
    #[msg("Invalid entry fee (must be > 0)")]
    InvalidEntryFee,
    #[msg("Invalid round interval (must be > 0)")]
    InvalidRoundInterval,
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Unauthorized")]
    Unauthorized,
}
