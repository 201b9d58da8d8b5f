//! Custodial raffle settlement engine.
//!
//! Sells fixed-price entries against an escrowed prize pool, settles under
//! admin attestation, and releases funds by weighted winner shares, with
//! creator claim-back of unfilled shares and net ticket revenue.

pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod utils;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
