use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
    sysvar::Sysvar,
};
use spl_associated_token_account::get_associated_token_address;

use crate::{
    error::RaffleError,
    instruction::{RaffleInstruction, RaffleParams},
    state::{
        Buyer, Config, PrizeKind, Raffle, RaffleStatus, MAX_TICKETS, MAX_WINNERS, MIN_TICKETS,
        PAUSE_ACTIVATE, PAUSE_ANNOUNCE, PAUSE_BUY, PAUSE_CANCEL, PAUSE_CLAIM_BACK,
        PAUSE_CLAIM_PRIZE, PAUSE_CREATE, PAUSE_UPDATE,
    },
    utils::{
        fee_amount, find_buyer_address, find_config_address, find_raffle_address,
        has_duplicate_pubkeys, is_paused, validate_win_shares, wallet_cap, BUYER_SEED,
        CONFIG_SEED, RAFFLE_SEED, TOTAL_PCT,
    },
};

/// Program state handler.
pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeConfig {
                owner,
                admin,
                creation_fee,
                ticket_fee_bps,
                min_period,
                max_period,
            } => {
                msg!("Instruction: Initialize Config");
                Self::process_initialize_config(
                    program_id,
                    accounts,
                    owner,
                    admin,
                    creation_fee,
                    ticket_fee_bps,
                    min_period,
                    max_period,
                )
            }
            RaffleInstruction::UpdateConfigOwner { new_owner } => {
                msg!("Instruction: Update Config Owner");
                Self::process_update_config_owner(program_id, accounts, new_owner)
            }
            RaffleInstruction::UpdateConfigAdmin { new_admin } => {
                msg!("Instruction: Update Config Admin");
                Self::process_update_config_admin(program_id, accounts, new_admin)
            }
            RaffleInstruction::UpdateConfigData {
                creation_fee,
                ticket_fee_bps,
                min_period,
                max_period,
            } => {
                msg!("Instruction: Update Config Data");
                Self::process_update_config_data(
                    program_id,
                    accounts,
                    creation_fee,
                    ticket_fee_bps,
                    min_period,
                    max_period,
                )
            }
            RaffleInstruction::SetPauseFlags { pause_flags } => {
                msg!("Instruction: Set Pause Flags");
                Self::process_set_pause_flags(program_id, accounts, pause_flags)
            }
            RaffleInstruction::CreateRaffle { params } => {
                msg!("Instruction: Create Raffle");
                Self::process_create_raffle(program_id, accounts, params)
            }
            RaffleInstruction::ActivateRaffle { raffle_id } => {
                msg!("Instruction: Activate Raffle");
                Self::process_activate_raffle(program_id, accounts, raffle_id)
            }
            RaffleInstruction::BuyTickets { raffle_id, count } => {
                msg!("Instruction: Buy Tickets");
                Self::process_buy_tickets(program_id, accounts, raffle_id, count)
            }
            RaffleInstruction::AnnounceWinners { raffle_id, winners } => {
                msg!("Instruction: Announce Winners");
                Self::process_announce_winners(program_id, accounts, raffle_id, winners)
            }
            RaffleInstruction::ClaimPrize { raffle_id, slot } => {
                msg!("Instruction: Claim Prize");
                Self::process_claim_prize(program_id, accounts, raffle_id, slot)
            }
            RaffleInstruction::ClaimBack { raffle_id } => {
                msg!("Instruction: Claim Back");
                Self::process_claim_back(program_id, accounts, raffle_id)
            }
            RaffleInstruction::CancelRaffle { raffle_id } => {
                msg!("Instruction: Cancel Raffle");
                Self::process_cancel_raffle(program_id, accounts, raffle_id)
            }
            RaffleInstruction::UpdateRaffleTicketing {
                raffle_id,
                total_tickets,
                ticket_price,
                max_per_wallet_pct,
            } => {
                msg!("Instruction: Update Raffle Ticketing");
                Self::process_update_raffle_ticketing(
                    program_id,
                    accounts,
                    raffle_id,
                    total_tickets,
                    ticket_price,
                    max_per_wallet_pct,
                )
            }
            RaffleInstruction::UpdateRaffleTime {
                raffle_id,
                start_time,
                end_time,
            } => {
                msg!("Instruction: Update Raffle Time");
                Self::process_update_raffle_time(program_id, accounts, raffle_id, start_time, end_time)
            }
            RaffleInstruction::UpdateRaffleWinners {
                raffle_id,
                win_shares,
                is_unique_winners,
            } => {
                msg!("Instruction: Update Raffle Winners");
                Self::process_update_raffle_winners(
                    program_id,
                    accounts,
                    raffle_id,
                    win_shares,
                    is_unique_winners,
                )
            }
            RaffleInstruction::WithdrawSolFees { amount } => {
                msg!("Instruction: Withdraw Sol Fees");
                Self::process_withdraw_sol_fees(program_id, accounts, amount)
            }
            RaffleInstruction::WithdrawSplFees { amount } => {
                msg!("Instruction: Withdraw Spl Fees");
                Self::process_withdraw_spl_fees(program_id, accounts, amount)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn process_initialize_config(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        owner: Pubkey,
        admin: Pubkey,
        creation_fee: u64,
        ticket_fee_bps: u16,
        min_period: u32,
        max_period: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        assert_signer(payer_info)?;
        Config::validate_bounds(ticket_fee_bps, min_period, max_period)?;

        let (expected_config, bump) = find_config_address(program_id);
        if expected_config != *config_info.key {
            return Err(RaffleError::AccountMismatch.into());
        }
        if config_info.owner == program_id {
            msg!("Config account is already initialized");
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        create_pda_account(
            payer_info,
            config_info,
            system_program_info,
            program_id,
            Config::LEN,
            &[CONFIG_SEED, &[bump]],
        )?;

        let config = Config {
            is_initialized: true,
            owner,
            admin,
            creation_fee,
            ticket_fee_bps,
            min_period,
            max_period,
            raffle_count: 0,
            pause_flags: 0,
            bump,
        };
        Config::pack(config, &mut config_info.data.borrow_mut())?;

        msg!(
            "Config initialized: owner={}, admin={}, creation_fee={}, ticket_fee_bps={}",
            owner,
            admin,
            creation_fee,
            ticket_fee_bps
        );
        Ok(())
    }

    fn process_update_config_owner(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        new_owner: Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let owner_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;

        let mut config = load_config(program_id, config_info)?;
        verify_owner(&config, owner_info)?;

        config.owner = new_owner;
        Config::pack(config, &mut config_info.data.borrow_mut())?;

        msg!("Config owner updated to {}", new_owner);
        Ok(())
    }

    fn process_update_config_admin(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        new_admin: Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let owner_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;

        let mut config = load_config(program_id, config_info)?;
        verify_owner(&config, owner_info)?;

        config.admin = new_admin;
        Config::pack(config, &mut config_info.data.borrow_mut())?;

        msg!("Config admin updated to {}", new_admin);
        Ok(())
    }

    fn process_update_config_data(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        creation_fee: u64,
        ticket_fee_bps: u16,
        min_period: u32,
        max_period: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let owner_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;

        let mut config = load_config(program_id, config_info)?;
        verify_owner(&config, owner_info)?;
        Config::validate_bounds(ticket_fee_bps, min_period, max_period)?;

        config.creation_fee = creation_fee;
        config.ticket_fee_bps = ticket_fee_bps;
        config.min_period = min_period;
        config.max_period = max_period;
        Config::pack(config, &mut config_info.data.borrow_mut())?;
        Ok(())
    }

    fn process_set_pause_flags(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        pause_flags: u8,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let owner_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;

        let mut config = load_config(program_id, config_info)?;
        verify_owner(&config, owner_info)?;

        config.pause_flags = pause_flags;
        Config::pack(config, &mut config_info.data.borrow_mut())?;

        msg!("Pause flags set to {:#010b}", pause_flags);
        Ok(())
    }

    fn process_create_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        params: RaffleParams,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let creator_info = next_account_info(account_info_iter)?;
        let admin_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        let mut config = load_config(program_id, config_info)?;
        if is_paused(config.pause_flags, PAUSE_CREATE) {
            return Err(RaffleError::OperationPaused.into());
        }
        assert_signer(creator_info)?;
        verify_admin(&config, admin_info)?;

        let prize_kind = PrizeKind::try_from(params.prize_kind)?;
        let token_prize = prize_kind != PrizeKind::Native;
        let token_tickets = params.ticket_mint.is_some();

        let (token_program_info, ata_program_info) = if token_prize || token_tickets {
            (
                Some(next_account_info(account_info_iter)?),
                Some(next_account_info(account_info_iter)?),
            )
        } else {
            (None, None)
        };
        let prize_accounts = if token_prize {
            Some((
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
            ))
        } else {
            None
        };
        let ticket_accounts = if token_tickets {
            Some((
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
            ))
        } else {
            None
        };

        // NonFungible prizes are a degenerate single-winner raffle
        let mut prize_amount = params.prize_amount;
        let mut num_winners = params.num_winners;
        let mut win_shares_vec = params.win_shares.clone();
        if prize_kind == PrizeKind::NonFungible {
            prize_amount = 1;
            num_winners = 1;
            win_shares_vec = vec![TOTAL_PCT];
        }

        if params.ticket_price == 0
            || params.total_tickets < MIN_TICKETS
            || params.total_tickets > MAX_TICKETS
        {
            return Err(RaffleError::InvalidTicketBounds.into());
        }
        if num_winners == 0
            || num_winners as usize > MAX_WINNERS
            || num_winners as u16 > params.total_tickets
        {
            return Err(RaffleError::InvalidWinnerCount.into());
        }
        if win_shares_vec.len() != num_winners as usize || !validate_win_shares(&win_shares_vec) {
            return Err(RaffleError::InvalidWinnerShares.into());
        }
        if prize_amount < num_winners as u64 {
            return Err(RaffleError::InsufficientPrizeBalance.into());
        }
        if params.max_per_wallet_pct > TOTAL_PCT
            || wallet_cap(params.total_tickets, params.max_per_wallet_pct) == 0
        {
            return Err(RaffleError::InvalidTicketBounds.into());
        }

        let now = Clock::get()?.unix_timestamp;
        let mut start_time = params.start_time;
        let status = if params.auto_start {
            start_time = now;
            RaffleStatus::Active
        } else {
            if start_time < now {
                return Err(RaffleError::InvalidPeriod.into());
            }
            RaffleStatus::Initialized
        };
        let duration = params
            .end_time
            .checked_sub(start_time)
            .ok_or(RaffleError::Overflow)?;
        if duration < config.min_period as i64 || duration > config.max_period as i64 {
            return Err(RaffleError::InvalidPeriod.into());
        }

        let raffle_id = config.raffle_count;
        let raffle_id_bytes = raffle_id.to_le_bytes();
        let (expected_raffle, bump) = find_raffle_address(program_id, raffle_id);
        if expected_raffle != *raffle_info.key {
            return Err(RaffleError::AccountMismatch.into());
        }
        create_pda_account(
            creator_info,
            raffle_info,
            system_program_info,
            program_id,
            Raffle::LEN,
            &[RAFFLE_SEED, &raffle_id_bytes, &[bump]],
        )?;

        let mut win_shares = [0u8; MAX_WINNERS];
        win_shares[..win_shares_vec.len()].copy_from_slice(&win_shares_vec);

        let mut raffle = Raffle {
            is_initialized: true,
            raffle_id,
            creator: *creator_info.key,
            start_time,
            end_time: params.end_time,
            total_tickets: params.total_tickets,
            tickets_sold: 0,
            ticket_price: params.ticket_price,
            ticket_mint: params.ticket_mint,
            max_per_wallet_pct: params.max_per_wallet_pct,
            prize_kind,
            prize_amount,
            prize_mint: None,
            num_winners,
            win_shares,
            winners_len: 0,
            winners: [Pubkey::default(); MAX_WINNERS],
            claimed_bitmap: 0,
            status,
            is_unique_winners: params.is_unique_winners,
            claimable_ticket_amount: 0,
            claimable_prize_back: 0,
            bump,
        };

        // Move the prize into escrow
        match prize_kind {
            PrizeKind::Native => {
                invoke(
                    &system_instruction::transfer(creator_info.key, raffle_info.key, prize_amount),
                    &[
                        creator_info.clone(),
                        raffle_info.clone(),
                        system_program_info.clone(),
                    ],
                )?;
            }
            PrizeKind::FungibleToken | PrizeKind::NonFungible => {
                let (prize_mint_info, prize_escrow_info, creator_prize_token_info) =
                    prize_accounts.ok_or(ProgramError::NotEnoughAccountKeys)?;
                let token_program_info =
                    token_program_info.ok_or(ProgramError::NotEnoughAccountKeys)?;
                let ata_program_info = ata_program_info.ok_or(ProgramError::NotEnoughAccountKeys)?;

                let mint = unpack_mint(prize_mint_info)?;
                if prize_kind == PrizeKind::NonFungible && (mint.supply != 1 || mint.decimals != 0) {
                    return Err(RaffleError::PrizeMintMismatch.into());
                }
                let creator_token = unpack_token_account(creator_prize_token_info)?;
                if creator_token.owner != *creator_info.key
                    || creator_token.mint != *prize_mint_info.key
                {
                    return Err(RaffleError::MintMismatch.into());
                }

                create_escrow_ata(
                    creator_info,
                    prize_escrow_info,
                    raffle_info,
                    prize_mint_info,
                    system_program_info,
                    token_program_info,
                    ata_program_info,
                )?;
                token_transfer(
                    token_program_info,
                    creator_prize_token_info,
                    prize_escrow_info,
                    creator_info,
                    None,
                    prize_amount,
                )?;
                raffle.prize_mint = Some(*prize_mint_info.key);
            }
        }

        // Ticket escrow for token-denominated tickets
        if let Some((ticket_mint_info, ticket_escrow_info)) = ticket_accounts {
            let stored_mint = params
                .ticket_mint
                .ok_or(ProgramError::InvalidInstructionData)?;
            if stored_mint != *ticket_mint_info.key {
                return Err(RaffleError::MintMismatch.into());
            }
            unpack_mint(ticket_mint_info)?;
            let token_program_info = token_program_info.ok_or(ProgramError::NotEnoughAccountKeys)?;
            let ata_program_info = ata_program_info.ok_or(ProgramError::NotEnoughAccountKeys)?;
            create_escrow_ata(
                creator_info,
                ticket_escrow_info,
                raffle_info,
                ticket_mint_info,
                system_program_info,
                token_program_info,
                ata_program_info,
            )?;
        }

        // Flat creation fee goes to the config treasury
        if config.creation_fee > 0 {
            invoke(
                &system_instruction::transfer(
                    creator_info.key,
                    config_info.key,
                    config.creation_fee,
                ),
                &[
                    creator_info.clone(),
                    config_info.clone(),
                    system_program_info.clone(),
                ],
            )?;
        }

        config.raffle_count = config
            .raffle_count
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;
        Config::pack(config, &mut config_info.data.borrow_mut())?;
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle {} created: tickets={} price={} winners={} prize={}",
            raffle_id,
            params.total_tickets,
            params.ticket_price,
            num_winners,
            prize_amount
        );
        Ok(())
    }

    fn process_activate_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let admin_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        if is_paused(config.pause_flags, PAUSE_ACTIVATE) {
            return Err(RaffleError::OperationPaused.into());
        }
        verify_admin(&config, admin_info)?;

        let mut raffle = load_raffle(program_id, raffle_info, raffle_id)?;
        if raffle.status != RaffleStatus::Initialized {
            return Err(RaffleError::InvalidStateTransition.into());
        }
        let now = Clock::get()?.unix_timestamp;
        if now < raffle.start_time {
            return Err(RaffleError::StartTimeNotReached.into());
        }

        raffle.status = RaffleStatus::Active;
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!("Raffle {} activated", raffle_id);
        Ok(())
    }

    fn process_buy_tickets(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
        count: u16,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let buyer_info = next_account_info(account_info_iter)?;
        let admin_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let buyer_record_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        if is_paused(config.pause_flags, PAUSE_BUY) {
            return Err(RaffleError::OperationPaused.into());
        }
        assert_signer(buyer_info)?;
        verify_admin(&config, admin_info)?;

        let mut raffle = load_raffle(program_id, raffle_info, raffle_id)?;
        if raffle.status != RaffleStatus::Active {
            return Err(RaffleError::RaffleNotActive.into());
        }
        let now = Clock::get()?.unix_timestamp;
        if !raffle.sale_window_open(now) {
            return Err(RaffleError::WindowClosed.into());
        }
        if count == 0 {
            return Err(ProgramError::InvalidArgument);
        }

        let new_sold = raffle
            .tickets_sold
            .checked_add(count)
            .ok_or(RaffleError::Overflow)?;
        if new_sold > raffle.total_tickets {
            return Err(RaffleError::SoldOut.into());
        }

        // Buyer record: create on first purchase, accumulate afterwards
        let (expected_record, record_bump) = find_buyer_address(program_id, raffle_id, buyer_info.key);
        if expected_record != *buyer_record_info.key {
            return Err(RaffleError::AccountMismatch.into());
        }
        let mut buyer_record = if buyer_record_info.owner == program_id {
            let record = Buyer::unpack(&buyer_record_info.data.borrow())?;
            if record.user != *buyer_info.key || record.raffle_id != raffle_id {
                return Err(RaffleError::AccountMismatch.into());
            }
            record
        } else {
            let raffle_id_bytes = raffle_id.to_le_bytes();
            create_pda_account(
                buyer_info,
                buyer_record_info,
                system_program_info,
                program_id,
                Buyer::LEN,
                &[
                    BUYER_SEED,
                    &raffle_id_bytes,
                    buyer_info.key.as_ref(),
                    &[record_bump],
                ],
            )?;
            Buyer {
                is_initialized: true,
                raffle_id,
                user: *buyer_info.key,
                tickets: 0,
            }
        };

        let new_buyer_tickets = buyer_record
            .tickets
            .checked_add(count)
            .ok_or(RaffleError::Overflow)?;
        if new_buyer_tickets > raffle.wallet_cap() {
            return Err(RaffleError::WalletCapExceeded.into());
        }

        let price_to_pay = u64::try_from(
            (raffle.ticket_price as u128)
                .checked_mul(count as u128)
                .ok_or(RaffleError::Overflow)?,
        )
        .map_err(|_| RaffleError::Overflow)?;

        match raffle.ticket_mint {
            None => {
                invoke(
                    &system_instruction::transfer(buyer_info.key, raffle_info.key, price_to_pay),
                    &[
                        buyer_info.clone(),
                        raffle_info.clone(),
                        system_program_info.clone(),
                    ],
                )?;
            }
            Some(stored_mint) => {
                let token_program_info = next_account_info(account_info_iter)?;
                let ticket_mint_info = next_account_info(account_info_iter)?;
                let buyer_token_info = next_account_info(account_info_iter)?;
                let ticket_escrow_info = next_account_info(account_info_iter)?;

                if stored_mint != *ticket_mint_info.key {
                    return Err(RaffleError::MintMismatch.into());
                }
                let buyer_token = unpack_token_account(buyer_token_info)?;
                if buyer_token.mint != stored_mint || buyer_token.owner != *buyer_info.key {
                    return Err(RaffleError::MintMismatch.into());
                }
                let expected_escrow = get_associated_token_address(raffle_info.key, &stored_mint);
                if expected_escrow != *ticket_escrow_info.key {
                    return Err(RaffleError::AccountMismatch.into());
                }

                token_transfer(
                    token_program_info,
                    buyer_token_info,
                    ticket_escrow_info,
                    buyer_info,
                    None,
                    price_to_pay,
                )?;
            }
        }

        raffle.tickets_sold = new_sold;
        buyer_record.tickets = new_buyer_tickets;
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
        Buyer::pack(buyer_record, &mut buyer_record_info.data.borrow_mut())?;

        msg!(
            "Buyer {} bought {} tickets of raffle {} for {}",
            buyer_info.key,
            count,
            raffle_id,
            price_to_pay
        );
        Ok(())
    }

    /// The settlement pivot. Reconciles the three ledgers atomically:
    /// ticket revenue (fee out, creator claimable booked), the prize pool
    /// (unfilled slots booked as claimable-back), and the fee treasury.
    fn process_announce_winners(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
        winners: Vec<Pubkey>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let admin_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        if is_paused(config.pause_flags, PAUSE_ANNOUNCE) {
            return Err(RaffleError::OperationPaused.into());
        }
        verify_admin(&config, admin_info)?;

        let mut raffle = load_raffle(program_id, raffle_info, raffle_id)?;
        match raffle.status {
            RaffleStatus::Active => {}
            RaffleStatus::SuccessEnded | RaffleStatus::FailedEnded => {
                return Err(RaffleError::AlreadyAnnounced.into())
            }
            _ => return Err(RaffleError::RaffleNotActive.into()),
        }
        let now = Clock::get()?.unix_timestamp;
        if !raffle.has_ended(now) {
            return Err(RaffleError::EndTimeNotReached.into());
        }

        if winners.len() > raffle.num_winners as usize {
            return Err(RaffleError::InvalidWinnerCount.into());
        }
        if raffle.is_unique_winners && has_duplicate_pubkeys(&winners) {
            return Err(RaffleError::DuplicateWinnerViolation.into());
        }

        // Ledger 1 + 3: ticket revenue nets the protocol fee, remainder is
        // booked for the creator and stays in escrow until claim-back.
        let revenue = u64::try_from(
            (raffle.ticket_price as u128)
                .checked_mul(raffle.tickets_sold as u128)
                .ok_or(RaffleError::Overflow)?,
        )
        .map_err(|_| RaffleError::Overflow)?;
        let fee = fee_amount(revenue, config.ticket_fee_bps)?;
        let creator_amount = revenue.checked_sub(fee).ok_or(RaffleError::Overflow)?;

        match raffle.ticket_mint {
            None => {
                move_lamports(raffle_info, config_info, fee)?;
            }
            Some(stored_mint) => {
                let system_program_info = next_account_info(account_info_iter)?;
                let token_program_info = next_account_info(account_info_iter)?;
                let ata_program_info = next_account_info(account_info_iter)?;
                let ticket_mint_info = next_account_info(account_info_iter)?;
                let ticket_escrow_info = next_account_info(account_info_iter)?;
                let fee_vault_info = next_account_info(account_info_iter)?;

                if stored_mint != *ticket_mint_info.key {
                    return Err(RaffleError::MintMismatch.into());
                }
                let expected_escrow = get_associated_token_address(raffle_info.key, &stored_mint);
                if expected_escrow != *ticket_escrow_info.key {
                    return Err(RaffleError::AccountMismatch.into());
                }

                // Token fees accumulate in a per-mint vault owned by the config PDA
                create_escrow_ata(
                    admin_info,
                    fee_vault_info,
                    config_info,
                    ticket_mint_info,
                    system_program_info,
                    token_program_info,
                    ata_program_info,
                )?;

                let raffle_id_bytes = raffle.raffle_id.to_le_bytes();
                token_transfer(
                    token_program_info,
                    ticket_escrow_info,
                    fee_vault_info,
                    raffle_info,
                    Some(&[RAFFLE_SEED, &raffle_id_bytes, &[raffle.bump]]),
                    fee,
                )?;
            }
        }
        raffle.claimable_ticket_amount = creator_amount;

        // Ledger 2: every unfilled slot's floor share returns to the creator
        raffle.claimable_prize_back = raffle.unfilled_prize_back(winners.len())?;

        for (i, winner) in winners.iter().enumerate() {
            raffle.winners[i] = *winner;
        }
        for slot in winners.len()..MAX_WINNERS {
            raffle.winners[slot] = Pubkey::default();
        }
        raffle.winners_len = winners.len() as u8;
        raffle.claimed_bitmap = 0;
        raffle.status = if winners.is_empty() {
            RaffleStatus::FailedEnded
        } else {
            RaffleStatus::SuccessEnded
        };

        msg!(
            "Raffle {} settled: winners={} revenue={} fee={} creator={} prize_back={}",
            raffle_id,
            raffle.winners_len,
            revenue,
            fee,
            creator_amount,
            raffle.claimable_prize_back
        );
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
        Ok(())
    }

    fn process_claim_prize(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
        slot: u8,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let winner_info = next_account_info(account_info_iter)?;
        let admin_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let buyer_record_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        if is_paused(config.pause_flags, PAUSE_CLAIM_PRIZE) {
            return Err(RaffleError::OperationPaused.into());
        }
        assert_signer(winner_info)?;
        verify_admin(&config, admin_info)?;

        let mut raffle = load_raffle(program_id, raffle_info, raffle_id)?;
        if !raffle.status.is_settled() {
            return Err(RaffleError::SettlementNotFinal.into());
        }

        let slot = slot as usize;
        if slot >= raffle.winners_len as usize || raffle.winners[slot] != *winner_info.key {
            return Err(RaffleError::NotAWinner.into());
        }

        // Winners must have actually bought into the raffle
        let (expected_record, _) = find_buyer_address(program_id, raffle_id, winner_info.key);
        if expected_record != *buyer_record_info.key {
            return Err(RaffleError::AccountMismatch.into());
        }
        if buyer_record_info.owner != program_id {
            return Err(RaffleError::NotAWinner.into());
        }
        let buyer_record = Buyer::unpack(&buyer_record_info.data.borrow())?;
        if buyer_record.user != *winner_info.key || buyer_record.tickets == 0 {
            return Err(RaffleError::NotAWinner.into());
        }

        if raffle.is_claimed(slot) {
            return Err(RaffleError::AlreadyClaimed.into());
        }

        let winner_amount = match raffle.prize_kind {
            PrizeKind::NonFungible => 1,
            _ => raffle.slot_prize(slot)?,
        };

        match raffle.prize_kind {
            PrizeKind::Native => {
                move_lamports(raffle_info, winner_info, winner_amount)?;
            }
            PrizeKind::FungibleToken | PrizeKind::NonFungible => {
                let token_program_info = next_account_info(account_info_iter)?;
                let prize_mint_info = next_account_info(account_info_iter)?;
                let prize_escrow_info = next_account_info(account_info_iter)?;
                let winner_token_info = next_account_info(account_info_iter)?;

                let stored_mint = raffle
                    .prize_mint
                    .ok_or::<ProgramError>(RaffleError::MintMismatch.into())?;
                if stored_mint != *prize_mint_info.key {
                    return Err(RaffleError::MintMismatch.into());
                }
                let expected_escrow = get_associated_token_address(raffle_info.key, &stored_mint);
                if expected_escrow != *prize_escrow_info.key {
                    return Err(RaffleError::AccountMismatch.into());
                }
                let winner_token = unpack_token_account(winner_token_info)?;
                if winner_token.mint != stored_mint {
                    return Err(RaffleError::MintMismatch.into());
                }

                let raffle_id_bytes = raffle.raffle_id.to_le_bytes();
                token_transfer(
                    token_program_info,
                    prize_escrow_info,
                    winner_token_info,
                    raffle_info,
                    Some(&[RAFFLE_SEED, &raffle_id_bytes, &[raffle.bump]]),
                    winner_amount,
                )?;
            }
        }

        raffle.set_claimed(slot);
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!(
            "Winner {} claimed slot {} of raffle {}: {}",
            winner_info.key,
            slot,
            raffle_id,
            winner_amount
        );
        Ok(())
    }

    fn process_claim_back(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let creator_info = next_account_info(account_info_iter)?;
        let admin_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        if is_paused(config.pause_flags, PAUSE_CLAIM_BACK) {
            return Err(RaffleError::OperationPaused.into());
        }
        verify_admin(&config, admin_info)?;

        let mut raffle = load_raffle(program_id, raffle_info, raffle_id)?;
        assert_signer(creator_info)?;
        if raffle.creator != *creator_info.key {
            return Err(RaffleError::UnauthorizedCreator.into());
        }
        if !raffle.status.is_terminal() {
            return Err(RaffleError::SettlementNotFinal.into());
        }

        let ticket_claim = raffle.claimable_ticket_amount;
        let prize_back = raffle.claimable_prize_back;
        if ticket_claim == 0 && prize_back == 0 {
            return Err(RaffleError::NothingToClaim.into());
        }

        let raffle_id_bytes = raffle.raffle_id.to_le_bytes();
        let raffle_seeds: &[&[u8]] = &[RAFFLE_SEED, &raffle_id_bytes, &[raffle.bump]];

        // Account groups are laid out by settlement medium, independent of
        // which claimable happens to be nonzero
        let prize_group = if raffle.prize_mint.is_some() {
            Some((
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
            ))
        } else {
            None
        };
        let ticket_group = if raffle.ticket_mint.is_some() {
            Some((
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
                next_account_info(account_info_iter)?,
            ))
        } else {
            None
        };

        // Residual prize from unfilled winner slots
        if prize_back > 0 {
            match (raffle.prize_mint, prize_group) {
                (None, _) => {
                    move_lamports(raffle_info, creator_info, prize_back)?;
                }
                (Some(stored_mint), Some(group)) => {
                    let (token_program_info, prize_mint_info, prize_escrow_info, creator_token_info) =
                        group;

                    if stored_mint != *prize_mint_info.key {
                        return Err(RaffleError::MintMismatch.into());
                    }
                    let expected_escrow =
                        get_associated_token_address(raffle_info.key, &stored_mint);
                    if expected_escrow != *prize_escrow_info.key {
                        return Err(RaffleError::AccountMismatch.into());
                    }
                    let creator_token = unpack_token_account(creator_token_info)?;
                    if creator_token.mint != stored_mint || creator_token.owner != *creator_info.key
                    {
                        return Err(RaffleError::MintMismatch.into());
                    }

                    token_transfer(
                        token_program_info,
                        prize_escrow_info,
                        creator_token_info,
                        raffle_info,
                        Some(raffle_seeds),
                        prize_back,
                    )?;

                    // Reclaim the escrow rent once every share is out
                    let escrow = unpack_token_account(prize_escrow_info)?;
                    if escrow.amount == 0 {
                        token_close(
                            token_program_info,
                            prize_escrow_info,
                            creator_info,
                            raffle_info,
                            raffle_seeds,
                        )?;
                    }
                }
                (Some(_), None) => return Err(ProgramError::NotEnoughAccountKeys),
            }
        }

        // Ticket revenue net of fee
        if ticket_claim > 0 {
            match (raffle.ticket_mint, ticket_group) {
                (None, _) => {
                    move_lamports(raffle_info, creator_info, ticket_claim)?;
                }
                (Some(stored_mint), Some(group)) => {
                    let (token_program_info, ticket_mint_info, ticket_escrow_info, creator_token_info) =
                        group;

                    if stored_mint != *ticket_mint_info.key {
                        return Err(RaffleError::MintMismatch.into());
                    }
                    let expected_escrow =
                        get_associated_token_address(raffle_info.key, &stored_mint);
                    if expected_escrow != *ticket_escrow_info.key {
                        return Err(RaffleError::AccountMismatch.into());
                    }
                    let creator_token = unpack_token_account(creator_token_info)?;
                    if creator_token.mint != stored_mint || creator_token.owner != *creator_info.key
                    {
                        return Err(RaffleError::MintMismatch.into());
                    }

                    // Sweep the full escrow balance (fee already left at
                    // announcement) and close the account for its rent
                    let escrow = unpack_token_account(ticket_escrow_info)?;
                    if escrow.amount < ticket_claim {
                        return Err(RaffleError::InsufficientEscrowBalance.into());
                    }
                    token_transfer(
                        token_program_info,
                        ticket_escrow_info,
                        creator_token_info,
                        raffle_info,
                        Some(raffle_seeds),
                        escrow.amount,
                    )?;
                    token_close(
                        token_program_info,
                        ticket_escrow_info,
                        creator_info,
                        raffle_info,
                        raffle_seeds,
                    )?;
                }
                (Some(_), None) => return Err(ProgramError::NotEnoughAccountKeys),
            }
        }

        raffle.claimable_ticket_amount = 0;
        raffle.claimable_prize_back = 0;
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!(
            "Creator {} claimed back from raffle {}: tickets={} prize={}",
            creator_info.key,
            raffle_id,
            ticket_claim,
            prize_back
        );
        Ok(())
    }

    fn process_cancel_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let creator_info = next_account_info(account_info_iter)?;
        let admin_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        if is_paused(config.pause_flags, PAUSE_CANCEL) {
            return Err(RaffleError::OperationPaused.into());
        }
        verify_admin(&config, admin_info)?;

        let raffle = load_raffle(program_id, raffle_info, raffle_id)?;
        assert_signer(creator_info)?;
        if raffle.creator != *creator_info.key {
            return Err(RaffleError::UnauthorizedCreator.into());
        }
        if raffle.status.is_terminal() {
            return Err(RaffleError::InvalidStateTransition.into());
        }
        if raffle.tickets_sold != 0 {
            return Err(RaffleError::TicketsAlreadySold.into());
        }

        let raffle_id_bytes = raffle.raffle_id.to_le_bytes();
        let raffle_seeds: &[&[u8]] = &[RAFFLE_SEED, &raffle_id_bytes, &[raffle.bump]];

        // Return the prize; token escrows close back to the creator
        let mut token_program_seen = None;
        if let Some(stored_mint) = raffle.prize_mint {
            let token_program_info = next_account_info(account_info_iter)?;
            let prize_mint_info = next_account_info(account_info_iter)?;
            let prize_escrow_info = next_account_info(account_info_iter)?;
            let creator_token_info = next_account_info(account_info_iter)?;
            token_program_seen = Some(token_program_info);

            if stored_mint != *prize_mint_info.key {
                return Err(RaffleError::MintMismatch.into());
            }
            let expected_escrow = get_associated_token_address(raffle_info.key, &stored_mint);
            if expected_escrow != *prize_escrow_info.key {
                return Err(RaffleError::AccountMismatch.into());
            }
            let creator_token = unpack_token_account(creator_token_info)?;
            if creator_token.mint != stored_mint || creator_token.owner != *creator_info.key {
                return Err(RaffleError::MintMismatch.into());
            }

            let escrow = unpack_token_account(prize_escrow_info)?;
            token_transfer(
                token_program_info,
                prize_escrow_info,
                creator_token_info,
                raffle_info,
                Some(raffle_seeds),
                escrow.amount,
            )?;
            token_close(
                token_program_info,
                prize_escrow_info,
                creator_info,
                raffle_info,
                raffle_seeds,
            )?;
        }
        if let Some(stored_mint) = raffle.ticket_mint {
            let token_program_info = match token_program_seen {
                Some(info) => info,
                None => next_account_info(account_info_iter)?,
            };
            let ticket_escrow_info = next_account_info(account_info_iter)?;
            let expected_escrow = get_associated_token_address(raffle_info.key, &stored_mint);
            if expected_escrow != *ticket_escrow_info.key {
                return Err(RaffleError::AccountMismatch.into());
            }
            // No sales happened, so the escrow is empty and only rent returns
            token_close(
                token_program_info,
                ticket_escrow_info,
                creator_info,
                raffle_info,
                raffle_seeds,
            )?;
        }

        // Close the raffle record: the native prize (if any) and the rent
        // deposit travel back to the creator together
        let remaining = raffle_info.lamports();
        move_lamports(raffle_info, creator_info, remaining)?;
        raffle_info.data.borrow_mut().fill(0);

        msg!("Raffle {} cancelled by {}", raffle_id, creator_info.key);
        Ok(())
    }

    fn process_update_raffle_ticketing(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
        total_tickets: u16,
        ticket_price: u64,
        max_per_wallet_pct: u8,
    ) -> ProgramResult {
        let (mut raffle, raffle_info) =
            load_raffle_for_update(program_id, accounts, raffle_id)?;
        if !matches!(
            raffle.status,
            RaffleStatus::Initialized | RaffleStatus::Active
        ) {
            return Err(RaffleError::InvalidStateTransition.into());
        }
        if raffle.tickets_sold != 0 {
            return Err(RaffleError::TicketsAlreadySold.into());
        }

        if ticket_price == 0 || total_tickets < MIN_TICKETS || total_tickets > MAX_TICKETS {
            return Err(RaffleError::InvalidTicketBounds.into());
        }
        if raffle.num_winners as u16 > total_tickets {
            return Err(RaffleError::InvalidWinnerCount.into());
        }
        if max_per_wallet_pct > TOTAL_PCT || wallet_cap(total_tickets, max_per_wallet_pct) == 0 {
            return Err(RaffleError::InvalidTicketBounds.into());
        }

        raffle.total_tickets = total_tickets;
        raffle.ticket_price = ticket_price;
        raffle.max_per_wallet_pct = max_per_wallet_pct;
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!("Raffle {} ticketing updated", raffle_id);
        Ok(())
    }

    fn process_update_raffle_time(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
        start_time: i64,
        end_time: i64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let creator_info = next_account_info(account_info_iter)?;
        let admin_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        if is_paused(config.pause_flags, PAUSE_UPDATE) {
            return Err(RaffleError::OperationPaused.into());
        }
        verify_admin(&config, admin_info)?;

        let mut raffle = load_raffle(program_id, raffle_info, raffle_id)?;
        assert_signer(creator_info)?;
        if raffle.creator != *creator_info.key {
            return Err(RaffleError::UnauthorizedCreator.into());
        }
        if raffle.status != RaffleStatus::Initialized {
            return Err(RaffleError::InvalidStateTransition.into());
        }

        let now = Clock::get()?.unix_timestamp;
        if now >= raffle.start_time {
            return Err(RaffleError::InvalidStateTransition.into());
        }
        if start_time < now {
            return Err(RaffleError::InvalidPeriod.into());
        }
        let duration = end_time
            .checked_sub(start_time)
            .ok_or(RaffleError::Overflow)?;
        if duration < config.min_period as i64 || duration > config.max_period as i64 {
            return Err(RaffleError::InvalidPeriod.into());
        }

        raffle.start_time = start_time;
        raffle.end_time = end_time;
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!("Raffle {} window updated", raffle_id);
        Ok(())
    }

    fn process_update_raffle_winners(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        raffle_id: u32,
        win_shares: Vec<u8>,
        is_unique_winners: bool,
    ) -> ProgramResult {
        let (mut raffle, raffle_info) =
            load_raffle_for_update(program_id, accounts, raffle_id)?;
        if !matches!(
            raffle.status,
            RaffleStatus::Initialized | RaffleStatus::Active
        ) {
            return Err(RaffleError::InvalidStateTransition.into());
        }
        if raffle.tickets_sold != 0 {
            return Err(RaffleError::TicketsAlreadySold.into());
        }
        // An NFT raffle only ever has the degenerate [100] vector
        if raffle.prize_kind == PrizeKind::NonFungible {
            return Err(RaffleError::InvalidWinnerShares.into());
        }
        if win_shares.len() != raffle.num_winners as usize || !validate_win_shares(&win_shares) {
            return Err(RaffleError::InvalidWinnerShares.into());
        }

        raffle.win_shares = [0u8; MAX_WINNERS];
        raffle.win_shares[..win_shares.len()].copy_from_slice(&win_shares);
        raffle.is_unique_winners = is_unique_winners;
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!("Raffle {} winner shares updated", raffle_id);
        Ok(())
    }

    fn process_withdraw_sol_fees(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let owner_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let receiver_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        verify_owner(&config, owner_info)?;

        if amount == 0 {
            return Err(ProgramError::InvalidArgument);
        }
        // Fees may only go to a plain wallet
        if receiver_info.owner != &system_program::id() {
            return Err(RaffleError::AccountMismatch.into());
        }

        // The treasury PDA must stay rent-exempt
        let rent = Rent::get()?;
        let min_balance = rent.minimum_balance(Config::LEN);
        let withdrawable = config_info
            .lamports()
            .saturating_sub(min_balance);
        if amount > withdrawable {
            return Err(RaffleError::InsufficientEscrowBalance.into());
        }

        move_lamports(config_info, receiver_info, amount)?;

        msg!("Withdrew {} lamports of fees to {}", amount, receiver_info.key);
        Ok(())
    }

    fn process_withdraw_spl_fees(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let owner_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let token_program_info = next_account_info(account_info_iter)?;
        let mint_info = next_account_info(account_info_iter)?;
        let fee_vault_info = next_account_info(account_info_iter)?;
        let receiver_token_info = next_account_info(account_info_iter)?;

        let config = load_config(program_id, config_info)?;
        verify_owner(&config, owner_info)?;

        if amount == 0 {
            return Err(ProgramError::InvalidArgument);
        }
        let expected_vault = get_associated_token_address(config_info.key, mint_info.key);
        if expected_vault != *fee_vault_info.key {
            return Err(RaffleError::AccountMismatch.into());
        }
        let receiver_token = unpack_token_account(receiver_token_info)?;
        if receiver_token.mint != *mint_info.key {
            return Err(RaffleError::MintMismatch.into());
        }

        token_transfer(
            token_program_info,
            fee_vault_info,
            receiver_token_info,
            config_info,
            Some(&[CONFIG_SEED, &[config.bump]]),
            amount,
        )?;

        msg!(
            "Withdrew {} token fees of mint {} to {}",
            amount,
            mint_info.key,
            receiver_token_info.key
        );
        Ok(())
    }
}

fn assert_signer(info: &AccountInfo) -> ProgramResult {
    if !info.is_signer {
        msg!("Missing required signature: {}", info.key);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

fn load_config(program_id: &Pubkey, config_info: &AccountInfo) -> Result<Config, ProgramError> {
    if config_info.owner != program_id {
        return Err(ProgramError::IncorrectProgramId);
    }
    Config::unpack(&config_info.data.borrow())
}

fn verify_owner(config: &Config, owner_info: &AccountInfo) -> ProgramResult {
    assert_signer(owner_info)?;
    if config.owner != *owner_info.key {
        return Err(RaffleError::UnauthorizedOwner.into());
    }
    Ok(())
}

fn verify_admin(config: &Config, admin_info: &AccountInfo) -> ProgramResult {
    assert_signer(admin_info)?;
    if config.admin != *admin_info.key {
        return Err(RaffleError::UnauthorizedAdmin.into());
    }
    Ok(())
}

fn load_raffle(
    program_id: &Pubkey,
    raffle_info: &AccountInfo,
    raffle_id: u32,
) -> Result<Raffle, ProgramError> {
    if raffle_info.owner != program_id {
        return Err(ProgramError::IncorrectProgramId);
    }
    let (expected, _) = find_raffle_address(program_id, raffle_id);
    if expected != *raffle_info.key {
        return Err(RaffleError::AccountMismatch.into());
    }
    Raffle::unpack(&raffle_info.data.borrow())
}

/// Shared prologue for the pre-sale update instructions: pause bit, admin
/// co-signature, creator signature, and record identity.
fn load_raffle_for_update<'a, 'info>(
    program_id: &Pubkey,
    accounts: &'a [AccountInfo<'info>],
    raffle_id: u32,
) -> Result<(Raffle, &'a AccountInfo<'info>), ProgramError> {
    let account_info_iter = &mut accounts.iter();
    let creator_info = next_account_info(account_info_iter)?;
    let admin_info = next_account_info(account_info_iter)?;
    let config_info = next_account_info(account_info_iter)?;
    let raffle_info = next_account_info(account_info_iter)?;

    let config = load_config(program_id, config_info)?;
    if is_paused(config.pause_flags, PAUSE_UPDATE) {
        return Err(RaffleError::OperationPaused.into());
    }
    verify_admin(&config, admin_info)?;

    let raffle = load_raffle(program_id, raffle_info, raffle_id)?;
    assert_signer(creator_info)?;
    if raffle.creator != *creator_info.key {
        return Err(RaffleError::UnauthorizedCreator.into());
    }
    Ok((raffle, raffle_info))
}

fn move_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64) -> ProgramResult {
    if amount == 0 {
        return Ok(());
    }
    let mut from_lamports = from.try_borrow_mut_lamports()?;
    if **from_lamports < amount {
        return Err(RaffleError::InsufficientEscrowBalance.into());
    }
    **from_lamports -= amount;
    drop(from_lamports);
    let mut to_lamports = to.try_borrow_mut_lamports()?;
    **to_lamports = (**to_lamports)
        .checked_add(amount)
        .ok_or(RaffleError::Overflow)?;
    Ok(())
}

fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    new_account: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    program_id: &Pubkey,
    space: usize,
    seeds: &[&[u8]],
) -> ProgramResult {
    let rent = Rent::get()?;
    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            new_account.key,
            rent.minimum_balance(space),
            space as u64,
            program_id,
        ),
        &[payer.clone(), new_account.clone(), system_program.clone()],
        &[seeds],
    )
}

fn unpack_token_account(info: &AccountInfo) -> Result<spl_token::state::Account, ProgramError> {
    if info.owner != &spl_token::id() {
        return Err(ProgramError::IncorrectProgramId);
    }
    spl_token::state::Account::unpack(&info.data.borrow())
}

fn unpack_mint(info: &AccountInfo) -> Result<spl_token::state::Mint, ProgramError> {
    if info.owner != &spl_token::id() {
        return Err(ProgramError::IncorrectProgramId);
    }
    spl_token::state::Mint::unpack(&info.data.borrow())
}

#[allow(deprecated)]
fn token_transfer<'info>(
    token_program: &AccountInfo<'info>,
    source: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    signer_seeds: Option<&[&[u8]]>,
    amount: u64,
) -> ProgramResult {
    if amount == 0 {
        return Ok(());
    }
    let ix = spl_token::instruction::transfer(
        token_program.key,
        source.key,
        destination.key,
        authority.key,
        &[],
        amount,
    )?;
    let infos = [
        source.clone(),
        destination.clone(),
        authority.clone(),
        token_program.clone(),
    ];
    match signer_seeds {
        Some(seeds) => invoke_signed(&ix, &infos, &[seeds]),
        None => invoke(&ix, &infos),
    }
}

fn token_close<'info>(
    token_program: &AccountInfo<'info>,
    account: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    let ix = spl_token::instruction::close_account(
        token_program.key,
        account.key,
        destination.key,
        authority.key,
        &[],
    )?;
    invoke_signed(
        &ix,
        &[
            account.clone(),
            destination.clone(),
            authority.clone(),
            token_program.clone(),
        ],
        &[signer_seeds],
    )
}

/// Create an associated token account for a PDA owner if it is missing.
/// The address is validated either way.
fn create_escrow_ata<'info>(
    funder: &AccountInfo<'info>,
    ata_info: &AccountInfo<'info>,
    owner_info: &AccountInfo<'info>,
    mint_info: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    ata_program: &AccountInfo<'info>,
) -> ProgramResult {
    let expected = get_associated_token_address(owner_info.key, mint_info.key);
    if expected != *ata_info.key {
        return Err(RaffleError::AccountMismatch.into());
    }
    if !ata_info.data_is_empty() {
        return Ok(());
    }
    let ix = spl_associated_token_account::instruction::create_associated_token_account(
        funder.key,
        owner_info.key,
        mint_info.key,
        token_program.key,
    );
    invoke(
        &ix,
        &[
            funder.clone(),
            ata_info.clone(),
            owner_info.clone(),
            mint_info.clone(),
            system_program.clone(),
            token_program.clone(),
            ata_program.clone(),
        ],
    )
}
