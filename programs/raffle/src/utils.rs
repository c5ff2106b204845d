use anchor_lang::prelude::*;
use crate::errors::ErrorCode;

pub fn checked_add_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(ErrorCode::MathOverflow.into())
}

/// Reduce oracle randomness to a player index: the little-endian value of the
/// first 16 random bytes, modulo the entrant count.
pub fn winner_index(randomness: &[u8; 32], players_count: u16) -> Result<usize> {
    require!(players_count > 0, ErrorCode::NoPlayers);

    let mut bytes16 = [0u8; 16];
    bytes16.copy_from_slice(&randomness[..16]);
    let r = u128::from_le_bytes(bytes16);

    Ok((r % players_count as u128) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn randomness_from(value: u128) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        bytes
    }

    #[test]
    fn sole_player_always_wins() {
        for value in [0u128, 1, 7, 12_345, u128::from(u64::MAX)] {
            assert_eq!(winner_index(&randomness_from(value), 1).unwrap(), 0);
        }
    }

    #[test]
    fn seven_mod_three_picks_index_one() {
        assert_eq!(winner_index(&randomness_from(7), 3).unwrap(), 1);
    }

    #[test]
    fn multiple_of_count_picks_index_zero() {
        assert_eq!(winner_index(&randomness_from(0), 3).unwrap(), 0);
        assert_eq!(winner_index(&randomness_from(9), 3).unwrap(), 0);
        assert_eq!(winner_index(&randomness_from(300), 3).unwrap(), 0);
    }

    #[test]
    fn upper_random_bytes_are_ignored() {
        let mut bytes = randomness_from(7);
        bytes[16..].copy_from_slice(&[0xff; 16]);
        assert_eq!(winner_index(&bytes, 3).unwrap(), 1);
    }

    #[test]
    fn zero_players_is_rejected() {
        assert!(winner_index(&randomness_from(7), 0).is_err());
    }

    #[test]
    fn checked_add_guards_overflow() {
        assert_eq!(checked_add_u64(1, 2).unwrap(), 3);
        assert!(checked_add_u64(u64::MAX, 1).is_err());
    }
}
