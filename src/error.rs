use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError,
    program_error::ProgramError,
};
use thiserror::Error;

/// Errors that may be returned by the raffle program.
///
/// Ordering inside each operation: pause check first, then authorization,
/// then state, then parameter validation, then resource checks.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// The targeted operation is disabled via the config pause bitmask
    #[error("Operation is paused")]
    OperationPaused,

    /// Signer does not match the config owner
    #[error("Signer is not the config owner")]
    UnauthorizedOwner,

    /// Signer does not match the config admin
    #[error("Signer is not the config admin")]
    UnauthorizedAdmin,

    /// Signer does not match the raffle creator
    #[error("Signer is not the raffle creator")]
    UnauthorizedCreator,

    /// Raffle window is outside the configured min/max period, or the
    /// start time is in the past
    #[error("Invalid raffle period")]
    InvalidPeriod,

    /// Ticket supply, ticket price, or per-wallet percentage out of bounds
    #[error("Invalid ticket bounds")]
    InvalidTicketBounds,

    /// Winner share vector is malformed (length, ordering, or sum)
    #[error("Invalid winner shares")]
    InvalidWinnerShares,

    /// Winner count out of range for this raffle
    #[error("Invalid winner count")]
    InvalidWinnerCount,

    /// Prize mint does not satisfy the prize kind (e.g. NFT supply/decimals)
    #[error("Prize mint mismatch")]
    PrizeMintMismatch,

    /// Prize amount too small to give every winner slot a nonzero share
    #[error("Insufficient prize balance")]
    InsufficientPrizeBalance,

    /// Operation attempted from a status that does not permit it
    #[error("Invalid state transition")]
    InvalidStateTransition,

    /// Start time has not been reached yet
    #[error("Start time not reached")]
    StartTimeNotReached,

    /// Raffle is not in the Active status
    #[error("Raffle is not active")]
    RaffleNotActive,

    /// Current time is outside the [start_time, end_time) sale window
    #[error("Sale window is closed")]
    WindowClosed,

    /// End time has not passed; settlement is not due yet
    #[error("End time not reached")]
    EndTimeNotReached,

    /// Purchase would exceed the total ticket supply
    #[error("Tickets sold out")]
    SoldOut,

    /// Purchase would exceed the per-wallet ticket cap
    #[error("Per-wallet ticket cap exceeded")]
    WalletCapExceeded,

    /// Supplied mint or token account does not match the stored one
    #[error("Mint mismatch")]
    MintMismatch,

    /// Winners were already announced for this raffle
    #[error("Winners already announced")]
    AlreadyAnnounced,

    /// Duplicate winner in a raffle that requires unique winners
    #[error("Duplicate winner not allowed")]
    DuplicateWinnerViolation,

    /// Caller does not occupy the claimed winner slot
    #[error("Not a winner")]
    NotAWinner,

    /// Winner slot has already been claimed
    #[error("Prize already claimed")]
    AlreadyClaimed,

    /// Raffle has not reached a settled terminal status
    #[error("Settlement is not final")]
    SettlementNotFinal,

    /// Both creator claimables are already zero
    #[error("Nothing to claim")]
    NothingToClaim,

    /// Tickets were already sold; cancellation or update is forbidden
    #[error("Tickets already sold")]
    TicketsAlreadySold,

    /// Checked arithmetic overflowed
    #[error("Arithmetic overflow")]
    Overflow,

    /// Escrow balance is insufficient for the requested movement
    #[error("Insufficient escrow balance")]
    InsufficientEscrowBalance,

    /// A supplied account does not match its expected derived address
    #[error("Account mismatch")]
    AccountMismatch,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
