use anchor_lang::prelude::*;

#[event]
pub struct RaffleEntered {
    pub player: Pubkey,
    pub amount: u64,
    pub pot_after: u64,
    pub players_count: u16,
}

#[event]
pub struct WinnerRequested {
    pub request: Pubkey,
    pub nonce: u64,
}

#[event]
pub struct WinnerPicked {
    pub winner: Pubkey,
    pub payout: u64,
    pub round: u64,
}
