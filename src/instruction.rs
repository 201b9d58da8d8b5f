use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use spl_associated_token_account::get_associated_token_address;

use crate::utils::{find_buyer_address, find_config_address, find_raffle_address};

/// Creation parameters for a raffle. The prize mint (when the prize is not
/// SOL) travels in the account list, not here.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct RaffleParams {
    pub start_time: i64,
    pub end_time: i64,
    pub total_tickets: u16,
    pub ticket_price: u64,
    /// None = tickets are paid in SOL
    pub ticket_mint: Option<Pubkey>,
    pub max_per_wallet_pct: u8,
    /// 0 = Native, 1 = FungibleToken, 2 = NonFungible
    pub prize_kind: u8,
    pub prize_amount: u64,
    pub num_winners: u8,
    pub win_shares: Vec<u8>,
    pub is_unique_winners: bool,
    /// Force start_time to now and open the sale immediately
    pub auto_start: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Initialize the program config singleton
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer funding the config account
    /// 1. `[writable]` The config account (PDA, seeds `["config"]`)
    /// 2. `[]` System program
    InitializeConfig {
        owner: Pubkey,
        admin: Pubkey,
        creation_fee: u64,
        ticket_fee_bps: u16,
        min_period: u32,
        max_period: u32,
    },

    /// Hand config ownership to a new owner (owner only)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Current config owner
    /// 1. `[writable]` Config account
    UpdateConfigOwner { new_owner: Pubkey },

    /// Rotate the lifecycle admin (owner only)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Config owner
    /// 1. `[writable]` Config account
    UpdateConfigAdmin { new_admin: Pubkey },

    /// Update fee rates and period bounds (owner only)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Config owner
    /// 1. `[writable]` Config account
    UpdateConfigData {
        creation_fee: u64,
        ticket_fee_bps: u16,
        min_period: u32,
        max_period: u32,
    },

    /// Replace the pause bitmask (owner only)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Config owner
    /// 1. `[writable]` Config account
    SetPauseFlags { pause_flags: u8 },

    /// Create a raffle, escrow the prize, and charge the creation fee.
    /// The new raffle id is the config's current counter.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Creator (pays rent, prize, and creation fee)
    /// 1. `[signer]` Config admin (co-authorization)
    /// 2. `[writable]` Config account
    /// 3. `[writable]` Raffle account (PDA, seeds `["raffle", raffle_id]`)
    /// 4. `[]` System program
    /// If the prize or the tickets are token-denominated:
    /// 5. `[]` SPL Token program
    /// 6. `[]` Associated token program
    /// If the prize is token-denominated:
    /// 7. `[]` Prize mint
    /// 8. `[writable]` Prize escrow (ATA of the raffle PDA for the prize mint)
    /// 9. `[writable]` Creator's token account for the prize mint
    /// If the tickets are token-denominated:
    /// 10. `[]` Ticket mint
    /// 11. `[writable]` Ticket escrow (ATA of the raffle PDA for the ticket mint)
    CreateRaffle { params: RaffleParams },

    /// Open ticket sales on an Initialized raffle whose start time passed
    ///
    /// Accounts expected:
    /// 0. `[signer]` Config admin
    /// 1. `[]` Config account
    /// 2. `[writable]` Raffle account
    ActivateRaffle { raffle_id: u32 },

    /// Buy tickets while the sale window is open
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Buyer (pays tickets and, first time, rent)
    /// 1. `[signer]` Config admin
    /// 2. `[]` Config account
    /// 3. `[writable]` Raffle account
    /// 4. `[writable]` Buyer record (PDA, seeds `["buyer", raffle_id, buyer]`)
    /// 5. `[]` System program
    /// If the tickets are token-denominated:
    /// 6. `[]` SPL Token program
    /// 7. `[]` Ticket mint
    /// 8. `[writable]` Buyer's token account for the ticket mint
    /// 9. `[writable]` Ticket escrow
    BuyTickets { raffle_id: u32, count: u16 },

    /// Settle the raffle: store winners, move the protocol fee out of the
    /// ticket escrow, and book the creator's claimables. An empty winner
    /// list fails the raffle.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Config admin (pays the fee vault if created)
    /// 1. `[writable]` Config account (native fee treasury)
    /// 2. `[writable]` Raffle account
    /// If the tickets are token-denominated:
    /// 3. `[]` System program
    /// 4. `[]` SPL Token program
    /// 5. `[]` Associated token program
    /// 6. `[]` Ticket mint
    /// 7. `[writable]` Ticket escrow
    /// 8. `[writable]` Fee vault (ATA of the config PDA for the ticket mint)
    AnnounceWinners { raffle_id: u32, winners: Vec<Pubkey> },

    /// Pay one winner slot out of the prize escrow
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Winner occupying the slot
    /// 1. `[signer]` Config admin
    /// 2. `[]` Config account
    /// 3. `[writable]` Raffle account
    /// 4. `[]` Buyer record for (raffle, winner)
    /// If the prize is token-denominated:
    /// 5. `[]` SPL Token program
    /// 6. `[]` Prize mint
    /// 7. `[writable]` Prize escrow
    /// 8. `[writable]` Winner's token account for the prize mint
    ClaimPrize { raffle_id: u32, slot: u8 },

    /// Pay the creator's residuals (ticket revenue net of fee + unfilled
    /// prize shares) and zero both claimables
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Raffle creator
    /// 1. `[signer]` Config admin
    /// 2. `[]` Config account
    /// 3. `[writable]` Raffle account
    /// If the prize is token-denominated:
    /// 4. `[]` SPL Token program
    /// 5. `[]` Prize mint
    /// 6. `[writable]` Prize escrow
    /// 7. `[writable]` Creator's token account for the prize mint
    /// If the tickets are token-denominated:
    /// 8. `[]` SPL Token program (again when no token prize preceded)
    /// 9. `[]` Ticket mint
    /// 10. `[writable]` Ticket escrow
    /// 11. `[writable]` Creator's token account for the ticket mint
    ClaimBack { raffle_id: u32 },

    /// Cancel a raffle with no sales: refund the prize, close escrows and
    /// the raffle record back to the creator
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Raffle creator
    /// 1. `[signer]` Config admin
    /// 2. `[]` Config account
    /// 3. `[writable]` Raffle account
    /// If the prize is token-denominated:
    /// 4. `[]` SPL Token program
    /// 5. `[]` Prize mint
    /// 6. `[writable]` Prize escrow
    /// 7. `[writable]` Creator's token account for the prize mint
    /// If the tickets are token-denominated:
    /// 8. `[]` SPL Token program (again when no token prize preceded)
    /// 9. `[writable]` Ticket escrow (empty; closed to the creator)
    CancelRaffle { raffle_id: u32 },

    /// Re-parameterize ticketing before any sale (creator + admin)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Raffle creator
    /// 1. `[signer]` Config admin
    /// 2. `[]` Config account
    /// 3. `[writable]` Raffle account
    UpdateRaffleTicketing {
        raffle_id: u32,
        total_tickets: u16,
        ticket_price: u64,
        max_per_wallet_pct: u8,
    },

    /// Move the sale window of an Initialized raffle (creator + admin)
    ///
    /// Accounts expected: same as UpdateRaffleTicketing
    UpdateRaffleTime {
        raffle_id: u32,
        start_time: i64,
        end_time: i64,
    },

    /// Replace the share vector before any sale (creator + admin)
    ///
    /// Accounts expected: same as UpdateRaffleTicketing
    UpdateRaffleWinners {
        raffle_id: u32,
        win_shares: Vec<u8>,
        is_unique_winners: bool,
    },

    /// Withdraw accumulated native fees from the config treasury (owner)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Config owner
    /// 1. `[writable]` Config account
    /// 2. `[writable]` Receiver (system-owned wallet)
    WithdrawSolFees { amount: u64 },

    /// Withdraw accumulated token fees from a config fee vault (owner)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Config owner
    /// 1. `[]` Config account
    /// 2. `[]` SPL Token program
    /// 3. `[]` Fee mint
    /// 4. `[writable]` Fee vault (ATA of the config PDA for the mint)
    /// 5. `[writable]` Receiver token account for the mint
    WithdrawSplFees { amount: u64 },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|_| ProgramError::InvalidInstructionData)
    }
}

/// Create initialize_config instruction
pub fn initialize_config(
    program_id: &Pubkey,
    payer: &Pubkey,
    owner: &Pubkey,
    admin: &Pubkey,
    creation_fee: u64,
    ticket_fee_bps: u16,
    min_period: u32,
    max_period: u32,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let data = RaffleInstruction::InitializeConfig {
        owner: *owner,
        admin: *admin,
        creation_fee,
        ticket_fee_bps,
        min_period,
        max_period,
    }
    .pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(config, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

fn owner_config_instruction(
    program_id: &Pubkey,
    owner: &Pubkey,
    instruction: RaffleInstruction,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(config, false),
        ],
        data: instruction.pack()?,
    })
}

/// Create update_config_owner instruction
pub fn update_config_owner(
    program_id: &Pubkey,
    owner: &Pubkey,
    new_owner: &Pubkey,
) -> Result<Instruction, ProgramError> {
    owner_config_instruction(
        program_id,
        owner,
        RaffleInstruction::UpdateConfigOwner {
            new_owner: *new_owner,
        },
    )
}

/// Create update_config_admin instruction
pub fn update_config_admin(
    program_id: &Pubkey,
    owner: &Pubkey,
    new_admin: &Pubkey,
) -> Result<Instruction, ProgramError> {
    owner_config_instruction(
        program_id,
        owner,
        RaffleInstruction::UpdateConfigAdmin {
            new_admin: *new_admin,
        },
    )
}

/// Create update_config_data instruction
pub fn update_config_data(
    program_id: &Pubkey,
    owner: &Pubkey,
    creation_fee: u64,
    ticket_fee_bps: u16,
    min_period: u32,
    max_period: u32,
) -> Result<Instruction, ProgramError> {
    owner_config_instruction(
        program_id,
        owner,
        RaffleInstruction::UpdateConfigData {
            creation_fee,
            ticket_fee_bps,
            min_period,
            max_period,
        },
    )
}

/// Create set_pause_flags instruction
pub fn set_pause_flags(
    program_id: &Pubkey,
    owner: &Pubkey,
    pause_flags: u8,
) -> Result<Instruction, ProgramError> {
    owner_config_instruction(
        program_id,
        owner,
        RaffleInstruction::SetPauseFlags { pause_flags },
    )
}

/// Create create_raffle instruction. `raffle_id` must be the config's
/// current raffle counter; `prize_mint`/`creator_prize_token` are required
/// when the prize is not SOL.
pub fn create_raffle(
    program_id: &Pubkey,
    creator: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    params: RaffleParams,
    prize_mint: Option<&Pubkey>,
    creator_prize_token: Option<&Pubkey>,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let (raffle, _) = find_raffle_address(program_id, raffle_id);
    let token_prize = params.prize_kind != 0;
    let token_tickets = params.ticket_mint.is_some();

    let mut accounts = vec![
        AccountMeta::new(*creator, true),
        AccountMeta::new_readonly(*admin, true),
        AccountMeta::new(config, false),
        AccountMeta::new(raffle, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];
    if token_prize || token_tickets {
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        accounts.push(AccountMeta::new_readonly(
            spl_associated_token_account::id(),
            false,
        ));
    }
    if token_prize {
        let mint = prize_mint.ok_or(ProgramError::NotEnoughAccountKeys)?;
        let creator_token = creator_prize_token.ok_or(ProgramError::NotEnoughAccountKeys)?;
        accounts.push(AccountMeta::new_readonly(*mint, false));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
        accounts.push(AccountMeta::new(*creator_token, false));
    }
    if let Some(mint) = params.ticket_mint.as_ref() {
        accounts.push(AccountMeta::new_readonly(*mint, false));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
    }

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: RaffleInstruction::CreateRaffle { params }.pack()?,
    })
}

/// Create activate_raffle instruction
pub fn activate_raffle(
    program_id: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let (raffle, _) = find_raffle_address(program_id, raffle_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*admin, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new(raffle, false),
        ],
        data: RaffleInstruction::ActivateRaffle { raffle_id }.pack()?,
    })
}

/// Create buy_tickets instruction. `ticket_token` is the (ticket mint,
/// buyer token account) pair for token-denominated tickets.
pub fn buy_tickets(
    program_id: &Pubkey,
    buyer: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    count: u16,
    ticket_token: Option<(&Pubkey, &Pubkey)>,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let (raffle, _) = find_raffle_address(program_id, raffle_id);
    let (buyer_record, _) = find_buyer_address(program_id, raffle_id, buyer);

    let mut accounts = vec![
        AccountMeta::new(*buyer, true),
        AccountMeta::new_readonly(*admin, true),
        AccountMeta::new_readonly(config, false),
        AccountMeta::new(raffle, false),
        AccountMeta::new(buyer_record, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];
    if let Some((mint, buyer_token)) = ticket_token {
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        accounts.push(AccountMeta::new_readonly(*mint, false));
        accounts.push(AccountMeta::new(*buyer_token, false));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
    }

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: RaffleInstruction::BuyTickets { raffle_id, count }.pack()?,
    })
}

/// Create announce_winners instruction
pub fn announce_winners(
    program_id: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    winners: Vec<Pubkey>,
    ticket_mint: Option<&Pubkey>,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let (raffle, _) = find_raffle_address(program_id, raffle_id);

    let mut accounts = vec![
        AccountMeta::new(*admin, true),
        AccountMeta::new(config, false),
        AccountMeta::new(raffle, false),
    ];
    if let Some(mint) = ticket_mint {
        accounts.push(AccountMeta::new_readonly(system_program::id(), false));
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        accounts.push(AccountMeta::new_readonly(
            spl_associated_token_account::id(),
            false,
        ));
        accounts.push(AccountMeta::new_readonly(*mint, false));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&config, mint),
            false,
        ));
    }

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: RaffleInstruction::AnnounceWinners { raffle_id, winners }.pack()?,
    })
}

/// Create claim_prize instruction. `prize_token` is the (prize mint, winner
/// token account) pair for token-denominated prizes.
pub fn claim_prize(
    program_id: &Pubkey,
    winner: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    slot: u8,
    prize_token: Option<(&Pubkey, &Pubkey)>,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let (raffle, _) = find_raffle_address(program_id, raffle_id);
    let (buyer_record, _) = find_buyer_address(program_id, raffle_id, winner);

    let mut accounts = vec![
        AccountMeta::new(*winner, true),
        AccountMeta::new_readonly(*admin, true),
        AccountMeta::new_readonly(config, false),
        AccountMeta::new(raffle, false),
        AccountMeta::new_readonly(buyer_record, false),
    ];
    if let Some((mint, winner_token)) = prize_token {
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        accounts.push(AccountMeta::new_readonly(*mint, false));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
        accounts.push(AccountMeta::new(*winner_token, false));
    }

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: RaffleInstruction::ClaimPrize { raffle_id, slot }.pack()?,
    })
}

/// Create claim_back instruction. Token pairs are (mint, creator token
/// account) and are required per side that is token-denominated.
pub fn claim_back(
    program_id: &Pubkey,
    creator: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    prize_token: Option<(&Pubkey, &Pubkey)>,
    ticket_token: Option<(&Pubkey, &Pubkey)>,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let (raffle, _) = find_raffle_address(program_id, raffle_id);

    let mut accounts = vec![
        AccountMeta::new(*creator, true),
        AccountMeta::new_readonly(*admin, true),
        AccountMeta::new_readonly(config, false),
        AccountMeta::new(raffle, false),
    ];
    if let Some((mint, creator_token)) = prize_token {
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        accounts.push(AccountMeta::new_readonly(*mint, false));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
        accounts.push(AccountMeta::new(*creator_token, false));
    }
    if let Some((mint, creator_token)) = ticket_token {
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        accounts.push(AccountMeta::new_readonly(*mint, false));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
        accounts.push(AccountMeta::new(*creator_token, false));
    }

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: RaffleInstruction::ClaimBack { raffle_id }.pack()?,
    })
}

/// Create cancel_raffle instruction
pub fn cancel_raffle(
    program_id: &Pubkey,
    creator: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    prize_token: Option<(&Pubkey, &Pubkey)>,
    ticket_mint: Option<&Pubkey>,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let (raffle, _) = find_raffle_address(program_id, raffle_id);

    let mut accounts = vec![
        AccountMeta::new(*creator, true),
        AccountMeta::new_readonly(*admin, true),
        AccountMeta::new_readonly(config, false),
        AccountMeta::new(raffle, false),
    ];
    if let Some((mint, creator_token)) = prize_token {
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        accounts.push(AccountMeta::new_readonly(*mint, false));
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
        accounts.push(AccountMeta::new(*creator_token, false));
    }
    if let Some(mint) = ticket_mint {
        if prize_token.is_none() {
            accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        }
        accounts.push(AccountMeta::new(
            get_associated_token_address(&raffle, mint),
            false,
        ));
    }

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: RaffleInstruction::CancelRaffle { raffle_id }.pack()?,
    })
}

fn raffle_update_instruction(
    program_id: &Pubkey,
    creator: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    instruction: RaffleInstruction,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    let (raffle, _) = find_raffle_address(program_id, raffle_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*creator, true),
            AccountMeta::new_readonly(*admin, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new(raffle, false),
        ],
        data: instruction.pack()?,
    })
}

/// Create update_raffle_ticketing instruction
pub fn update_raffle_ticketing(
    program_id: &Pubkey,
    creator: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    total_tickets: u16,
    ticket_price: u64,
    max_per_wallet_pct: u8,
) -> Result<Instruction, ProgramError> {
    raffle_update_instruction(
        program_id,
        creator,
        admin,
        raffle_id,
        RaffleInstruction::UpdateRaffleTicketing {
            raffle_id,
            total_tickets,
            ticket_price,
            max_per_wallet_pct,
        },
    )
}

/// Create update_raffle_time instruction
pub fn update_raffle_time(
    program_id: &Pubkey,
    creator: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    start_time: i64,
    end_time: i64,
) -> Result<Instruction, ProgramError> {
    raffle_update_instruction(
        program_id,
        creator,
        admin,
        raffle_id,
        RaffleInstruction::UpdateRaffleTime {
            raffle_id,
            start_time,
            end_time,
        },
    )
}

/// Create update_raffle_winners instruction
pub fn update_raffle_winners(
    program_id: &Pubkey,
    creator: &Pubkey,
    admin: &Pubkey,
    raffle_id: u32,
    win_shares: Vec<u8>,
    is_unique_winners: bool,
) -> Result<Instruction, ProgramError> {
    raffle_update_instruction(
        program_id,
        creator,
        admin,
        raffle_id,
        RaffleInstruction::UpdateRaffleWinners {
            raffle_id,
            win_shares,
            is_unique_winners,
        },
    )
}

/// Create withdraw_sol_fees instruction
pub fn withdraw_sol_fees(
    program_id: &Pubkey,
    owner: &Pubkey,
    receiver: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(config, false),
            AccountMeta::new(*receiver, false),
        ],
        data: RaffleInstruction::WithdrawSolFees { amount }.pack()?,
    })
}

/// Create withdraw_spl_fees instruction
pub fn withdraw_spl_fees(
    program_id: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    receiver_token: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (config, _) = find_config_address(program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(get_associated_token_address(&config, mint), false),
            AccountMeta::new(*receiver_token, false),
        ],
        data: RaffleInstruction::WithdrawSplFees { amount }.pack()?,
    })
}
