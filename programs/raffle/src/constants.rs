pub const SEED_CONFIG: &[u8] = b"config";
pub const SEED_RAFFLE: &[u8] = b"raffle";
pub const SEED_REQUEST: &[u8] = b"request";

/// Hard cap on entrants per round. Every player account rides in the VRF
/// callback transaction so the winner can be paid in place, which keeps this
/// far below what the state account itself could hold.
pub const MAX_PLAYERS: usize = 24;
