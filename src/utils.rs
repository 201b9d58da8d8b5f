use solana_program::pubkey::Pubkey;

use crate::error::RaffleError;

pub const CONFIG_SEED: &[u8] = b"config";
pub const RAFFLE_SEED: &[u8] = b"raffle";
pub const BUYER_SEED: &[u8] = b"buyer";

/// Denominator for basis-point fee arithmetic (100 bps = 1%).
pub const FEE_MANTISSA: u64 = 10_000;
/// Winner shares are whole percentages summing to this.
pub const TOTAL_PCT: u8 = 100;

/// Find the config PDA
pub fn find_config_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONFIG_SEED], program_id)
}

/// Find the PDA for a raffle record
pub fn find_raffle_address(program_id: &Pubkey, raffle_id: u32) -> (Pubkey, u8) {
    let raffle_id_bytes = raffle_id.to_le_bytes();
    Pubkey::find_program_address(&[RAFFLE_SEED, &raffle_id_bytes], program_id)
}

/// Find the PDA for a per-(raffle, user) buyer record
pub fn find_buyer_address(program_id: &Pubkey, raffle_id: u32, user: &Pubkey) -> (Pubkey, u8) {
    let raffle_id_bytes = raffle_id.to_le_bytes();
    Pubkey::find_program_address(&[BUYER_SEED, &raffle_id_bytes, user.as_ref()], program_id)
}

/// Check a single operation bit in the config pause bitmask
pub fn is_paused(pause_flags: u8, bit: u8) -> bool {
    pause_flags & bit != 0
}

/// Protocol fee taken from ticket revenue, floored
pub fn fee_amount(revenue: u64, fee_bps: u16) -> Result<u64, RaffleError> {
    let fee = (revenue as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(RaffleError::Overflow)?
        / FEE_MANTISSA as u128;
    u64::try_from(fee).map_err(|_| RaffleError::Overflow)
}

/// Percentage share of an amount, floored
pub fn share_amount(amount: u64, pct: u8) -> Result<u64, RaffleError> {
    let share = (amount as u128)
        .checked_mul(pct as u128)
        .ok_or(RaffleError::Overflow)?
        / TOTAL_PCT as u128;
    u64::try_from(share).map_err(|_| RaffleError::Overflow)
}

/// Per-wallet ticket cap: floor(total_tickets * pct / 100)
pub fn wallet_cap(total_tickets: u16, max_per_wallet_pct: u8) -> u16 {
    ((total_tickets as u32 * max_per_wallet_pct as u32) / TOTAL_PCT as u32) as u16
}

/// A share vector is valid when every entry is positive, the sequence is
/// non-increasing, and the entries sum to exactly 100.
pub fn validate_win_shares(win_shares: &[u8]) -> bool {
    if win_shares.is_empty() {
        return false;
    }
    let total: u32 = win_shares.iter().map(|&s| s as u32).sum();
    if total != TOTAL_PCT as u32 {
        return false;
    }
    for (i, &share) in win_shares.iter().enumerate() {
        if share == 0 {
            return false;
        }
        if i > 0 && share > win_shares[i - 1] {
            return false;
        }
    }
    true
}

pub fn has_duplicate_pubkeys(list: &[Pubkey]) -> bool {
    for i in 0..list.len() {
        for j in (i + 1)..list.len() {
            if list[i] == list[j] {
                return true;
            }
        }
    }
    false
}
