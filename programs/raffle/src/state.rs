use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};
use crate::constants::MAX_PLAYERS;
use crate::errors::ErrorCode;
use crate::utils::checked_add_u64;

/// Wrapper for players array — bytemuck doesn't impl Pod for arbitrary array sizes.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct PlayersArray {
    pub data: [[u8; 32]; MAX_PLAYERS],
}

unsafe impl Pod for PlayersArray {}
unsafe impl Zeroable for PlayersArray {}

#[cfg(feature = "idl-build")]
impl anchor_lang::IdlBuild for PlayersArray {
    fn create_type() -> Option<anchor_lang::idl::types::IdlTypeDef> {
        use anchor_lang::idl::types::*;
        Some(IdlTypeDef {
            name: "PlayersArray".to_string(),
            docs: vec![],
            serialization: IdlSerialization::Bytemuck,
            repr: Some(IdlRepr::C(IdlReprModifier { packed: false, align: None })),
            generics: vec![],
            ty: IdlTypeDefTy::Struct {
                fields: Some(IdlDefinedFields::Named(vec![IdlField {
                    name: "data".to_string(),
                    docs: vec![],
                    ty: IdlType::Array(
                        Box::new(IdlType::Array(Box::new(IdlType::U8), IdlArrayLen::Value(32))),
                        IdlArrayLen::Value(MAX_PLAYERS),
                    ),
                }])),
            },
        })
    }
    fn insert_types(types: &mut std::collections::BTreeMap<String, anchor_lang::idl::types::IdlTypeDef>) {
        if let Some(ty) = Self::create_type() {
            types.insert("PlayersArray".to_string(), ty);
        }
    }
    fn get_full_path() -> String {
        "PlayersArray".to_string()
    }
}

#[repr(u8)]
pub enum RafflePhase {
    Open = 0,
    Calculating = 1,
}

#[account]
pub struct Config {
    pub admin: Pubkey,
    /// Fixed entry fee in lamports. Zero is rejected at init — a free raffle
    /// could never satisfy the `pot > 0` readiness clause.
    pub entry_fee: u64,
    /// Minimum seconds between a round start and upkeep readiness.
    pub interval_sec: u32,
    pub bump: u8,
    pub reserved: [u8; 15],
}

impl Config {
    pub const SPACE: usize = 8
        + 32
        + 8
        + 4
        + 1
        + 15;
}

/// Readiness snapshot returned by `check_upkeep`. `upkeep_needed` is the
/// strict AND of the four diagnostics — no partial credit.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpkeepStatus {
    pub upkeep_needed: bool,
    pub raffle_open: bool,
    pub interval_elapsed: bool,
    pub has_pot: bool,
    pub has_players: bool,
}

/// Raffle account — singleton, zero-copy to keep the players table out of the
/// instruction stack frame. Instructions use `AccountLoader<'info, Raffle>`
/// and call `.load()` / `.load_mut()`.
#[account(zero_copy)]
#[repr(C)]
pub struct Raffle {
    pub phase: u8,
    pub bump: u8,
    pub players_count: u16,
    pub _padding: [u8; 4],

    /// Lamports escrowed on top of the account's rent.
    pub pot: u64,
    pub last_timestamp: i64,
    pub request_nonce: u64,
    pub rounds_completed: u64,

    /// Request-marker address of the outstanding randomness request.
    /// All-zero while the raffle is open.
    pub pending_request: [u8; 32],
    pub recent_winner: [u8; 32],

    pub players: PlayersArray,

    pub reserved: [u8; 32],
}

impl Raffle {
    pub const SPACE: usize = 8 + core::mem::size_of::<Raffle>();

    pub fn is_open(&self) -> bool {
        self.phase == RafflePhase::Open as u8
    }

    pub fn player(&self, index: usize) -> Option<Pubkey> {
        if index < self.players_count as usize {
            Some(Pubkey::new_from_array(self.players.data[index]))
        } else {
            None
        }
    }

    pub fn recent_winner_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.recent_winner)
    }

    pub fn pending_request_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.pending_request)
    }

    /// Append a paid entry. Phase gating is the caller's job; this owns the
    /// capacity check and the pot arithmetic.
    pub fn push_player(&mut self, player: Pubkey, paid: u64) -> Result<()> {
        let index = self.players_count as usize;
        require!(index < MAX_PLAYERS, ErrorCode::MaxPlayersReached);

        self.players.data[index] = player.to_bytes();
        self.players_count += 1;
        self.pot = checked_add_u64(self.pot, paid)?;
        Ok(())
    }

    /// Pure readiness predicate polled by the keeper. Side-effect free and
    /// callable any number of times.
    pub fn upkeep_status(&self, interval_sec: u32, now: i64) -> UpkeepStatus {
        let raffle_open = self.is_open();
        let interval_elapsed = now.saturating_sub(self.last_timestamp) >= interval_sec as i64;
        let has_pot = self.pot > 0;
        let has_players = self.players_count > 0;
        UpkeepStatus {
            upkeep_needed: raffle_open && interval_elapsed && has_pot && has_players,
            raffle_open,
            interval_elapsed,
            has_pot,
            has_players,
        }
    }

    /// Freeze entries and record the outstanding request. While the phase is
    /// Calculating, `enter` and `perform_upkeep` both reject, so at most one
    /// request can be in flight.
    pub fn begin_calculating(&mut self, request: Pubkey, nonce: u64) {
        self.phase = RafflePhase::Calculating as u8;
        self.pending_request = request.to_bytes();
        self.request_nonce = nonce;
    }

    /// An inbound fulfillment is valid iff a request is outstanding and its
    /// marker address matches. Covers replays and markers from other rounds.
    pub fn matches_pending_request(&self, request: &Pubkey) -> bool {
        self.phase == RafflePhase::Calculating as u8 && self.pending_request == request.to_bytes()
    }

    /// Commit a settled round: record the winner, clear the entrant set and
    /// pot, and reopen. Returns the payout amount.
    pub fn settle(&mut self, winner: Pubkey, now: i64) -> Result<u64> {
        let payout = self.pot;
        self.recent_winner = winner.to_bytes();
        self.players_count = 0;
        self.pot = 0;
        self.pending_request = [0u8; 32];
        self.last_timestamp = now;
        self.phase = RafflePhase::Open as u8;
        self.rounds_completed = checked_add_u64(self.rounds_completed, 1)?;
        Ok(payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    const FEE: u64 = 10;
    const INTERVAL: u32 = 30;
    const START_TS: i64 = 100;

    fn player_key(tag: u8) -> Pubkey {
        Pubkey::new_from_array([tag; 32])
    }

    fn open_raffle_with_players(count: u16) -> Raffle {
        let mut raffle = Raffle::zeroed();
        raffle.last_timestamp = START_TS;
        for i in 0..count {
            raffle.push_player(player_key(i as u8 + 1), FEE).unwrap();
        }
        raffle
    }

    #[test]
    fn entries_accumulate_in_order() {
        let raffle = open_raffle_with_players(3);

        assert_eq!(raffle.pot, 3 * FEE);
        assert_eq!(raffle.players_count, 3);
        assert_eq!(raffle.player(0), Some(player_key(1)));
        assert_eq!(raffle.player(1), Some(player_key(2)));
        assert_eq!(raffle.player(2), Some(player_key(3)));
        assert_eq!(raffle.player(3), None);
    }

    #[test]
    fn entry_rejected_at_capacity() {
        let mut raffle = open_raffle_with_players(MAX_PLAYERS as u16);
        assert!(raffle.push_player(player_key(99), FEE).is_err());
        assert_eq!(raffle.players_count, MAX_PLAYERS as u16);
        assert_eq!(raffle.pot, MAX_PLAYERS as u64 * FEE);
    }

    #[test]
    fn upkeep_requires_all_four_conditions() {
        let raffle = open_raffle_with_players(2);

        let ready = raffle.upkeep_status(INTERVAL, START_TS + INTERVAL as i64);
        assert!(ready.upkeep_needed);
        assert!(ready.raffle_open && ready.interval_elapsed && ready.has_pot && ready.has_players);

        let early = raffle.upkeep_status(INTERVAL, START_TS + INTERVAL as i64 - 1);
        assert!(!early.upkeep_needed);
        assert!(!early.interval_elapsed);
        assert!(early.raffle_open && early.has_pot && early.has_players);
    }

    #[test]
    fn upkeep_never_ready_without_players() {
        let raffle = {
            let mut r = Raffle::zeroed();
            r.last_timestamp = START_TS;
            r
        };

        // No entrants: not ready no matter how much time has passed.
        let status = raffle.upkeep_status(INTERVAL, START_TS + 1_000_000);
        assert!(!status.upkeep_needed);
        assert!(!status.has_players);
        assert!(!status.has_pot);
        assert!(status.raffle_open && status.interval_elapsed);
    }

    #[test]
    fn upkeep_not_ready_while_calculating() {
        let mut raffle = open_raffle_with_players(2);
        raffle.begin_calculating(player_key(200), 1);

        let status = raffle.upkeep_status(INTERVAL, START_TS + 10 * INTERVAL as i64);
        assert!(!status.upkeep_needed);
        assert!(!status.raffle_open);
        assert!(status.interval_elapsed && status.has_pot && status.has_players);
    }

    #[test]
    fn upkeep_status_is_idempotent() {
        let raffle = open_raffle_with_players(1);
        let now = START_TS + INTERVAL as i64;

        let first = raffle.upkeep_status(INTERVAL, now);
        let second = raffle.upkeep_status(INTERVAL, now);
        assert_eq!(first, second);
        assert_eq!(raffle.pot, FEE);
        assert_eq!(raffle.players_count, 1);
    }

    #[test]
    fn single_request_in_flight() {
        let marker = player_key(200);
        let mut raffle = open_raffle_with_players(2);

        raffle.begin_calculating(marker, 1);
        assert!(!raffle.is_open());
        assert_eq!(raffle.request_nonce, 1);
        assert_eq!(raffle.pending_request_pubkey(), marker);

        assert!(raffle.matches_pending_request(&marker));
        assert!(!raffle.matches_pending_request(&player_key(201)));
    }

    #[test]
    fn fulfillment_rejected_while_open() {
        let raffle = open_raffle_with_players(2);
        // No request issued yet — nothing can match.
        assert!(!raffle.matches_pending_request(&player_key(200)));
        assert!(!raffle.matches_pending_request(&Pubkey::default()));
    }

    #[test]
    fn settle_resets_round() {
        let marker = player_key(200);
        let winner = player_key(2);
        let mut raffle = open_raffle_with_players(3);
        raffle.begin_calculating(marker, 1);

        let payout = raffle.settle(winner, START_TS + 50).unwrap();

        assert_eq!(payout, 3 * FEE);
        assert_eq!(raffle.pot, 0);
        assert_eq!(raffle.players_count, 0);
        assert_eq!(raffle.player(0), None);
        assert!(raffle.is_open());
        assert_eq!(raffle.pending_request, [0u8; 32]);
        assert_eq!(raffle.last_timestamp, START_TS + 50);
        assert_eq!(raffle.recent_winner_pubkey(), winner);
        assert_eq!(raffle.rounds_completed, 1);

        // A replayed fulfillment for the consumed marker no longer matches.
        assert!(!raffle.matches_pending_request(&marker));
    }

    #[test]
    fn settled_round_matches_fresh_state_except_history() {
        let mut raffle = open_raffle_with_players(2);
        raffle.begin_calculating(player_key(200), 1);
        raffle.settle(player_key(1), START_TS + 40).unwrap();

        let fresh = {
            let mut r = Raffle::zeroed();
            r.last_timestamp = START_TS + 40;
            r
        };

        assert_eq!(raffle.phase, fresh.phase);
        assert_eq!(raffle.players_count, fresh.players_count);
        assert_eq!(raffle.pot, fresh.pot);
        assert_eq!(raffle.pending_request, fresh.pending_request);
        assert_eq!(raffle.last_timestamp, fresh.last_timestamp);
        // Only history differs.
        assert_ne!(raffle.recent_winner, fresh.recent_winner);
        assert_eq!(raffle.rounds_completed, 1);
    }
}
