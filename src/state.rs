use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use solana_program::{
    clock::UnixTimestamp,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};

use crate::error::RaffleError;
use crate::utils::share_amount;

/// Ticket supply bounds for any raffle
pub const MIN_TICKETS: u16 = 3;
pub const MAX_TICKETS: u16 = 10_000;
/// Winner slots per raffle
pub const MAX_WINNERS: usize = 10;

// Pause bitmask, one bit per operation
pub const PAUSE_CREATE: u8 = 1 << 0;
pub const PAUSE_ACTIVATE: u8 = 1 << 1;
pub const PAUSE_BUY: u8 = 1 << 2;
pub const PAUSE_ANNOUNCE: u8 = 1 << 3;
pub const PAUSE_CLAIM_PRIZE: u8 = 1 << 4;
pub const PAUSE_CLAIM_BACK: u8 = 1 << 5;
pub const PAUSE_CANCEL: u8 = 1 << 6;
pub const PAUSE_UPDATE: u8 = 1 << 7;

/// Status of a raffle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleStatus {
    /// Created with a future start time, not yet selling
    Initialized,
    /// Open for ticket sales until end_time
    Active,
    /// Settled with at least one winner
    SuccessEnded,
    /// Settled with no winners
    FailedEnded,
    /// Cancelled before any sale
    Cancelled,
}

impl RaffleStatus {
    /// Settled or cancelled; no counter may move again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RaffleStatus::SuccessEnded | RaffleStatus::FailedEnded | RaffleStatus::Cancelled
        )
    }

    /// Winners announced; claim paths are open
    pub fn is_settled(&self) -> bool {
        matches!(self, RaffleStatus::SuccessEnded | RaffleStatus::FailedEnded)
    }
}

impl TryFrom<u8> for RaffleStatus {
    type Error = ProgramError;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(RaffleStatus::Initialized),
            1 => Ok(RaffleStatus::Active),
            2 => Ok(RaffleStatus::SuccessEnded),
            3 => Ok(RaffleStatus::FailedEnded),
            4 => Ok(RaffleStatus::Cancelled),
            _ => Err(ProgramError::InvalidAccountData),
        }
    }
}

impl From<RaffleStatus> for u8 {
    fn from(status: RaffleStatus) -> Self {
        match status {
            RaffleStatus::Initialized => 0,
            RaffleStatus::Active => 1,
            RaffleStatus::SuccessEnded => 2,
            RaffleStatus::FailedEnded => 3,
            RaffleStatus::Cancelled => 4,
        }
    }
}

/// What the raffle pays out to winners
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrizeKind {
    /// Lamports held on the raffle PDA
    Native,
    /// SPL tokens held in the prize escrow
    FungibleToken,
    /// A single token of a supply-1, zero-decimals mint
    NonFungible,
}

impl TryFrom<u8> for PrizeKind {
    type Error = ProgramError;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(PrizeKind::Native),
            1 => Ok(PrizeKind::FungibleToken),
            2 => Ok(PrizeKind::NonFungible),
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }
}

impl From<PrizeKind> for u8 {
    fn from(kind: PrizeKind) -> Self {
        match kind {
            PrizeKind::Native => 0,
            PrizeKind::FungibleToken => 1,
            PrizeKind::NonFungible => 2,
        }
    }
}

/// Program configuration singleton.
///
/// The config PDA is also the native fee treasury: creation fees and SOL
/// ticket fees accumulate as lamports on this account. Token ticket fees
/// accumulate in a fee vault token account owned by this PDA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub is_initialized: bool,
    /// Governs fees, period bounds, pauses, and fee withdrawal
    pub owner: Pubkey,
    /// Co-signs every raffle lifecycle operation
    pub admin: Pubkey,
    /// Flat lamport fee charged to the creator per raffle
    pub creation_fee: u64,
    /// Basis-points fee taken from ticket revenue at settlement
    pub ticket_fee_bps: u16,
    /// Bounds on end_time - start_time, in seconds
    pub min_period: u32,
    pub max_period: u32,
    /// Monotone counter; doubles as the next raffle id
    pub raffle_count: u32,
    pub pause_flags: u8,
    pub bump: u8,
}

impl Config {
    /// Invariant enforced on initialization and every update
    pub fn validate_bounds(
        ticket_fee_bps: u16,
        min_period: u32,
        max_period: u32,
    ) -> Result<(), RaffleError> {
        if min_period == 0 || max_period < min_period {
            return Err(RaffleError::InvalidPeriod);
        }
        if ticket_fee_bps > 10_000 {
            return Err(RaffleError::InvalidTicketBounds);
        }
        Ok(())
    }
}

/// One raffle record.
///
/// SOL-denominated value (prize and/or ticket revenue) is held as lamports
/// on this PDA; token-denominated value lives in escrow token accounts the
/// PDA owns. Winner storage is a fixed array with a live length so the
/// record packs to a constant size; the claimed set is a bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raffle {
    pub is_initialized: bool,
    pub raffle_id: u32,
    pub creator: Pubkey,
    pub start_time: UnixTimestamp,
    pub end_time: UnixTimestamp,
    pub total_tickets: u16,
    pub tickets_sold: u16,
    pub ticket_price: u64,
    /// None = tickets are paid in SOL
    pub ticket_mint: Option<Pubkey>,
    pub max_per_wallet_pct: u8,
    pub prize_kind: PrizeKind,
    pub prize_amount: u64,
    /// None = prize is SOL
    pub prize_mint: Option<Pubkey>,
    pub num_winners: u8,
    /// First num_winners entries are meaningful
    pub win_shares: [u8; MAX_WINNERS],
    /// First winners_len entries are meaningful; populated at announcement
    pub winners_len: u8,
    pub winners: [Pubkey; MAX_WINNERS],
    /// Bit i set = slot i claimed
    pub claimed_bitmap: u16,
    pub status: RaffleStatus,
    pub is_unique_winners: bool,
    /// Ticket revenue net of fee, owed to the creator after settlement
    pub claimable_ticket_amount: u64,
    /// Floor shares of unfilled winner slots, owed to the creator
    pub claimable_prize_back: u64,
    pub bump: u8,
}

impl Raffle {
    /// Per-wallet ticket cap for this raffle
    pub fn wallet_cap(&self) -> u16 {
        crate::utils::wallet_cap(self.total_tickets, self.max_per_wallet_pct)
    }

    pub fn has_ended(&self, now: UnixTimestamp) -> bool {
        now > self.end_time
    }

    /// Sale window check: [start_time, end_time)
    pub fn sale_window_open(&self, now: UnixTimestamp) -> bool {
        now >= self.start_time && now < self.end_time
    }

    /// Prize owed to one winner slot, floored
    pub fn slot_prize(&self, slot: usize) -> Result<u64, RaffleError> {
        share_amount(self.prize_amount, self.win_shares[slot])
    }

    /// Sum of floor shares for every unfilled winner slot. This is exactly
    /// what the creator may claim back after announcement; floor remainders
    /// of filled slots stay in escrow.
    pub fn unfilled_prize_back(&self, filled: usize) -> Result<u64, RaffleError> {
        let mut back: u64 = 0;
        for slot in filled..self.num_winners as usize {
            back = back
                .checked_add(self.slot_prize(slot)?)
                .ok_or(RaffleError::Overflow)?;
        }
        Ok(back)
    }

    pub fn is_claimed(&self, slot: usize) -> bool {
        self.claimed_bitmap & (1u16 << slot) != 0
    }

    pub fn set_claimed(&mut self, slot: usize) {
        self.claimed_bitmap |= 1u16 << slot;
    }
}

/// Ticket purchase record, one per (raffle, participant).
///
/// Created on first purchase, accumulated on repeat purchases, and read by
/// the winner-claim path as proof of participation. Never deleted while a
/// claim may still be pending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buyer {
    pub is_initialized: bool,
    pub raffle_id: u32,
    pub user: Pubkey,
    pub tickets: u16,
}

impl Sealed for Config {}
impl Sealed for Raffle {}
impl Sealed for Buyer {}

impl IsInitialized for Config {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl IsInitialized for Buyer {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

fn pack_option_key(src: &Option<Pubkey>, tag_dst: &mut [u8; 1], key_dst: &mut [u8; 32]) {
    match src {
        Some(key) => {
            tag_dst[0] = 1;
            key_dst.copy_from_slice(key.as_ref());
        }
        None => {
            tag_dst[0] = 0;
            key_dst.fill(0);
        }
    }
}

fn unpack_option_key(tag: &[u8; 1], key: &[u8; 32]) -> Result<Option<Pubkey>, ProgramError> {
    match tag[0] {
        0 => Ok(None),
        1 => Ok(Some(Pubkey::new_from_array(*key))),
        _ => Err(ProgramError::InvalidAccountData),
    }
}

impl Pack for Config {
    const LEN: usize = 1 + 32 + 32 + 8 + 2 + 4 + 4 + 4 + 1 + 1;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, Config::LEN];
        let (
            is_initialized,
            owner,
            admin,
            creation_fee,
            ticket_fee_bps,
            min_period,
            max_period,
            raffle_count,
            pause_flags,
            bump,
        ) = array_refs![src, 1, 32, 32, 8, 2, 4, 4, 4, 1, 1];

        Ok(Config {
            is_initialized: is_initialized[0] != 0,
            owner: Pubkey::new_from_array(*owner),
            admin: Pubkey::new_from_array(*admin),
            creation_fee: u64::from_le_bytes(*creation_fee),
            ticket_fee_bps: u16::from_le_bytes(*ticket_fee_bps),
            min_period: u32::from_le_bytes(*min_period),
            max_period: u32::from_le_bytes(*max_period),
            raffle_count: u32::from_le_bytes(*raffle_count),
            pause_flags: pause_flags[0],
            bump: bump[0],
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, Config::LEN];
        let (
            is_initialized_dst,
            owner_dst,
            admin_dst,
            creation_fee_dst,
            ticket_fee_bps_dst,
            min_period_dst,
            max_period_dst,
            raffle_count_dst,
            pause_flags_dst,
            bump_dst,
        ) = mut_array_refs![dst, 1, 32, 32, 8, 2, 4, 4, 4, 1, 1];

        is_initialized_dst[0] = self.is_initialized as u8;
        owner_dst.copy_from_slice(self.owner.as_ref());
        admin_dst.copy_from_slice(self.admin.as_ref());
        *creation_fee_dst = self.creation_fee.to_le_bytes();
        *ticket_fee_bps_dst = self.ticket_fee_bps.to_le_bytes();
        *min_period_dst = self.min_period.to_le_bytes();
        *max_period_dst = self.max_period.to_le_bytes();
        *raffle_count_dst = self.raffle_count.to_le_bytes();
        pause_flags_dst[0] = self.pause_flags;
        bump_dst[0] = self.bump;
    }
}

impl Pack for Raffle {
    const LEN: usize = 1  // is_initialized
        + 4               // raffle_id
        + 32              // creator
        + 8 + 8           // start_time, end_time
        + 2 + 2           // total_tickets, tickets_sold
        + 8               // ticket_price
        + 1 + 32          // ticket_mint option
        + 1               // max_per_wallet_pct
        + 1               // prize_kind
        + 8               // prize_amount
        + 1 + 32          // prize_mint option
        + 1               // num_winners
        + MAX_WINNERS     // win_shares
        + 1               // winners_len
        + MAX_WINNERS * 32 // winners
        + 2               // claimed_bitmap
        + 1               // status
        + 1               // is_unique_winners
        + 8 + 8           // claimable_ticket_amount, claimable_prize_back
        + 1; // bump

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, Raffle::LEN];
        let (
            is_initialized,
            raffle_id,
            creator,
            start_time,
            end_time,
            total_tickets,
            tickets_sold,
            ticket_price,
            ticket_mint_tag,
            ticket_mint,
            max_per_wallet_pct,
            prize_kind,
            prize_amount,
            prize_mint_tag,
            prize_mint,
            num_winners,
            win_shares,
            winners_len,
            winners_src,
            claimed_bitmap,
            status,
            is_unique_winners,
            claimable_ticket_amount,
            claimable_prize_back,
            bump,
        ) = array_refs![
            src, 1, 4, 32, 8, 8, 2, 2, 8, 1, 32, 1, 1, 8, 1, 32, 1, MAX_WINNERS, 1,
            MAX_WINNERS * 32, 2, 1, 1, 8, 8, 1
        ];

        let mut winners = [Pubkey::default(); MAX_WINNERS];
        for (i, winner) in winners.iter_mut().enumerate() {
            *winner = Pubkey::new_from_array(*array_ref![winners_src, i * 32, 32]);
        }

        Ok(Raffle {
            is_initialized: is_initialized[0] != 0,
            raffle_id: u32::from_le_bytes(*raffle_id),
            creator: Pubkey::new_from_array(*creator),
            start_time: UnixTimestamp::from_le_bytes(*start_time),
            end_time: UnixTimestamp::from_le_bytes(*end_time),
            total_tickets: u16::from_le_bytes(*total_tickets),
            tickets_sold: u16::from_le_bytes(*tickets_sold),
            ticket_price: u64::from_le_bytes(*ticket_price),
            ticket_mint: unpack_option_key(ticket_mint_tag, ticket_mint)?,
            max_per_wallet_pct: max_per_wallet_pct[0],
            prize_kind: PrizeKind::try_from(prize_kind[0])
                .map_err(|_| ProgramError::InvalidAccountData)?,
            prize_amount: u64::from_le_bytes(*prize_amount),
            prize_mint: unpack_option_key(prize_mint_tag, prize_mint)?,
            num_winners: num_winners[0],
            win_shares: *win_shares,
            winners_len: winners_len[0],
            winners,
            claimed_bitmap: u16::from_le_bytes(*claimed_bitmap),
            status: RaffleStatus::try_from(status[0])?,
            is_unique_winners: is_unique_winners[0] != 0,
            claimable_ticket_amount: u64::from_le_bytes(*claimable_ticket_amount),
            claimable_prize_back: u64::from_le_bytes(*claimable_prize_back),
            bump: bump[0],
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, Raffle::LEN];
        let (
            is_initialized_dst,
            raffle_id_dst,
            creator_dst,
            start_time_dst,
            end_time_dst,
            total_tickets_dst,
            tickets_sold_dst,
            ticket_price_dst,
            ticket_mint_tag_dst,
            ticket_mint_dst,
            max_per_wallet_pct_dst,
            prize_kind_dst,
            prize_amount_dst,
            prize_mint_tag_dst,
            prize_mint_dst,
            num_winners_dst,
            win_shares_dst,
            winners_len_dst,
            winners_dst,
            claimed_bitmap_dst,
            status_dst,
            is_unique_winners_dst,
            claimable_ticket_amount_dst,
            claimable_prize_back_dst,
            bump_dst,
        ) = mut_array_refs![
            dst, 1, 4, 32, 8, 8, 2, 2, 8, 1, 32, 1, 1, 8, 1, 32, 1, MAX_WINNERS, 1,
            MAX_WINNERS * 32, 2, 1, 1, 8, 8, 1
        ];

        is_initialized_dst[0] = self.is_initialized as u8;
        *raffle_id_dst = self.raffle_id.to_le_bytes();
        creator_dst.copy_from_slice(self.creator.as_ref());
        *start_time_dst = self.start_time.to_le_bytes();
        *end_time_dst = self.end_time.to_le_bytes();
        *total_tickets_dst = self.total_tickets.to_le_bytes();
        *tickets_sold_dst = self.tickets_sold.to_le_bytes();
        *ticket_price_dst = self.ticket_price.to_le_bytes();
        pack_option_key(&self.ticket_mint, ticket_mint_tag_dst, ticket_mint_dst);
        max_per_wallet_pct_dst[0] = self.max_per_wallet_pct;
        prize_kind_dst[0] = self.prize_kind.into();
        *prize_amount_dst = self.prize_amount.to_le_bytes();
        pack_option_key(&self.prize_mint, prize_mint_tag_dst, prize_mint_dst);
        num_winners_dst[0] = self.num_winners;
        *win_shares_dst = self.win_shares;
        winners_len_dst[0] = self.winners_len;
        for (i, winner) in self.winners.iter().enumerate() {
            winners_dst[i * 32..(i + 1) * 32].copy_from_slice(winner.as_ref());
        }
        *claimed_bitmap_dst = self.claimed_bitmap.to_le_bytes();
        status_dst[0] = self.status.into();
        is_unique_winners_dst[0] = self.is_unique_winners as u8;
        *claimable_ticket_amount_dst = self.claimable_ticket_amount.to_le_bytes();
        *claimable_prize_back_dst = self.claimable_prize_back.to_le_bytes();
        bump_dst[0] = self.bump;
    }
}

impl Pack for Buyer {
    const LEN: usize = 1 + 4 + 32 + 2;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, Buyer::LEN];
        let (is_initialized, raffle_id, user, tickets) = array_refs![src, 1, 4, 32, 2];

        Ok(Buyer {
            is_initialized: is_initialized[0] != 0,
            raffle_id: u32::from_le_bytes(*raffle_id),
            user: Pubkey::new_from_array(*user),
            tickets: u16::from_le_bytes(*tickets),
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, Buyer::LEN];
        let (is_initialized_dst, raffle_id_dst, user_dst, tickets_dst) =
            mut_array_refs![dst, 1, 4, 32, 2];

        is_initialized_dst[0] = self.is_initialized as u8;
        *raffle_id_dst = self.raffle_id.to_le_bytes();
        user_dst.copy_from_slice(self.user.as_ref());
        *tickets_dst = self.tickets.to_le_bytes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raffle() -> Raffle {
        let mut win_shares = [0u8; MAX_WINNERS];
        win_shares[..4].copy_from_slice(&[40, 30, 20, 10]);
        Raffle {
            is_initialized: true,
            raffle_id: 7,
            creator: Pubkey::new_unique(),
            start_time: 1_700_000_000,
            end_time: 1_700_086_400,
            total_tickets: 100,
            tickets_sold: 0,
            ticket_price: 100_000_000,
            ticket_mint: None,
            max_per_wallet_pct: 40,
            prize_kind: PrizeKind::Native,
            prize_amount: 1_000_000_000,
            prize_mint: None,
            num_winners: 4,
            win_shares,
            winners_len: 0,
            winners: [Pubkey::default(); MAX_WINNERS],
            claimed_bitmap: 0,
            status: RaffleStatus::Active,
            is_unique_winners: true,
            claimable_ticket_amount: 0,
            claimable_prize_back: 0,
            bump: 254,
        }
    }

    #[test]
    fn prize_back_is_sum_of_floor_shares_for_unfilled_slots() {
        let raffle = sample_raffle();
        // two of four slots filled: slots 2 and 3 (20% and 10%) return
        assert_eq!(raffle.unfilled_prize_back(2).unwrap(), 300_000_000);
        // no winners at all: the whole prize is claimable back
        assert_eq!(raffle.unfilled_prize_back(0).unwrap(), 1_000_000_000);
        // all slots filled
        assert_eq!(raffle.unfilled_prize_back(4).unwrap(), 0);
    }

    #[test]
    fn prize_conservation_across_fill_levels() {
        // claimed(filled slots) + claimable_back(unfilled) + dust == prize
        let mut raffle = sample_raffle();
        raffle.prize_amount = 999_999_999;
        for filled in 0..=raffle.num_winners as usize {
            let mut claimed: u64 = 0;
            for slot in 0..filled {
                claimed += raffle.slot_prize(slot).unwrap();
            }
            let back = raffle.unfilled_prize_back(filled).unwrap();
            assert!(claimed + back <= raffle.prize_amount);
            // dust is bounded by one unit per slot of integer flooring
            assert!(raffle.prize_amount - (claimed + back) < raffle.num_winners as u64);
        }
    }

    #[test]
    fn claimed_bitmap_tracks_slots_independently() {
        let mut raffle = sample_raffle();
        assert!(!raffle.is_claimed(0));
        raffle.set_claimed(0);
        raffle.set_claimed(3);
        assert!(raffle.is_claimed(0));
        assert!(!raffle.is_claimed(1));
        assert!(!raffle.is_claimed(2));
        assert!(raffle.is_claimed(3));
    }

    #[test]
    fn raffle_record_survives_pack_unpack() {
        let mut raffle = sample_raffle();
        raffle.ticket_mint = Some(Pubkey::new_unique());
        raffle.prize_mint = Some(Pubkey::new_unique());
        raffle.prize_kind = PrizeKind::FungibleToken;
        raffle.winners_len = 2;
        raffle.winners[0] = Pubkey::new_unique();
        raffle.winners[1] = Pubkey::new_unique();
        raffle.claimed_bitmap = 0b01;
        raffle.status = RaffleStatus::SuccessEnded;

        let mut buf = vec![0u8; Raffle::LEN];
        raffle.pack_into_slice(&mut buf);
        let decoded = Raffle::unpack_from_slice(&buf).unwrap();
        assert_eq!(decoded, raffle);
    }

    #[test]
    fn config_and_buyer_records_survive_pack_unpack() {
        let config = Config {
            is_initialized: true,
            owner: Pubkey::new_unique(),
            admin: Pubkey::new_unique(),
            creation_fee: 5_000_000,
            ticket_fee_bps: 250,
            min_period: 3_600,
            max_period: 2_592_000,
            raffle_count: 42,
            pause_flags: PAUSE_BUY | PAUSE_CANCEL,
            bump: 255,
        };
        let mut buf = vec![0u8; Config::LEN];
        config.pack_into_slice(&mut buf);
        assert_eq!(Config::unpack_from_slice(&buf).unwrap(), config);

        let buyer = Buyer {
            is_initialized: true,
            raffle_id: 42,
            user: Pubkey::new_unique(),
            tickets: 17,
        };
        let mut buf = vec![0u8; Buyer::LEN];
        buyer.pack_into_slice(&mut buf);
        assert_eq!(Buyer::unpack_from_slice(&buf).unwrap(), buyer);
    }
}
