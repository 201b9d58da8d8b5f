//! Shared BanksClient harness for the integration suites.
#![allow(dead_code)]

use solana_program::program_pack::Pack;
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    clock::Clock,
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::{Transaction, TransactionError},
};
use spl_associated_token_account::get_associated_token_address;

use solraffle::{
    error::RaffleError,
    instruction as rix,
    instruction::RaffleParams,
    process_instruction,
    state::{Buyer, Config, Raffle},
    utils::{find_buyer_address, find_config_address, find_raffle_address},
};

pub const CREATION_FEE: u64 = 5_000_000;
pub const TICKET_FEE_BPS: u16 = 100;
pub const MIN_PERIOD: u32 = 60;
pub const MAX_PERIOD: u32 = 2_592_000;

pub struct TestEnv {
    pub context: ProgramTestContext,
    pub program_id: Pubkey,
    pub owner: Keypair,
    pub admin: Keypair,
}

pub async fn setup() -> TestEnv {
    let program_id = Pubkey::new_unique();
    let program_test = ProgramTest::new("solraffle", program_id, processor!(process_instruction));
    let context = program_test.start_with_context().await;
    TestEnv {
        context,
        program_id,
        owner: Keypair::new(),
        admin: Keypair::new(),
    }
}

/// Sign and submit with the context payer as fee payer and a fresh
/// blockhash, so resubmitting an identical instruction is a new
/// transaction rather than a duplicate.
pub async fn send_tx(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let mut all_signers: Vec<&Keypair> = vec![&context.payer];
    all_signers.extend_from_slice(signers);
    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&context.payer.pubkey()),
        &all_signers,
        blockhash,
    );
    context.banks_client.process_transaction(tx).await
}

pub async fn fund(context: &mut ProgramTestContext, to: &Pubkey, lamports: u64) {
    let payer = context.payer.pubkey();
    let ix = system_instruction::transfer(&payer, to, lamports);
    send_tx(context, &[ix], &[]).await.unwrap();
}

pub async fn balance(context: &mut ProgramTestContext, address: &Pubkey) -> u64 {
    context.banks_client.get_balance(*address).await.unwrap()
}

pub async fn now(context: &mut ProgramTestContext) -> i64 {
    let clock: Clock = context.banks_client.get_sysvar().await.unwrap();
    clock.unix_timestamp
}

/// Move ledger time; the rest of the clock stays untouched.
pub async fn warp_to_timestamp(context: &mut ProgramTestContext, timestamp: i64) {
    let mut clock: Clock = context.banks_client.get_sysvar().await.unwrap();
    clock.unix_timestamp = timestamp;
    context.set_sysvar(&clock);
}

pub async fn get_config(env: &mut TestEnv) -> Config {
    let (address, _) = find_config_address(&env.program_id);
    let account = env
        .context
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .unwrap();
    Config::unpack(&account.data).unwrap()
}

pub async fn get_raffle(env: &mut TestEnv, raffle_id: u32) -> Raffle {
    let (address, _) = find_raffle_address(&env.program_id, raffle_id);
    let account = env
        .context
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .unwrap();
    Raffle::unpack(&account.data).unwrap()
}

pub async fn get_buyer(env: &mut TestEnv, raffle_id: u32, user: &Pubkey) -> Buyer {
    let (address, _) = find_buyer_address(&env.program_id, raffle_id, user);
    let account = env
        .context
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .unwrap();
    Buyer::unpack(&account.data).unwrap()
}

pub async fn account_is_closed(context: &mut ProgramTestContext, address: &Pubkey) -> bool {
    context
        .banks_client
        .get_account(*address)
        .await
        .unwrap()
        .is_none()
}

/// New mint with the context payer as mint authority.
pub async fn create_mint(context: &mut ProgramTestContext, decimals: u8) -> Keypair {
    let mint = Keypair::new();
    let payer = context.payer.pubkey();
    let rent = context.banks_client.get_rent().await.unwrap();
    let instructions = [
        system_instruction::create_account(
            &payer,
            &mint.pubkey(),
            rent.minimum_balance(spl_token::state::Mint::LEN),
            spl_token::state::Mint::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_mint(&spl_token::id(), &mint.pubkey(), &payer, None, decimals)
            .unwrap(),
    ];
    send_tx(context, &instructions, &[&mint]).await.unwrap();
    mint
}

/// Create `owner`'s associated token account for `mint` and mint `amount`
/// into it.
pub async fn create_funded_ata(
    context: &mut ProgramTestContext,
    owner: &Pubkey,
    mint: &Pubkey,
    amount: u64,
) -> Pubkey {
    let payer = context.payer.pubkey();
    let ata = get_associated_token_address(owner, mint);
    let mut instructions =
        vec![spl_associated_token_account::instruction::create_associated_token_account(
            &payer,
            owner,
            mint,
            &spl_token::id(),
        )];
    if amount > 0 {
        instructions.push(
            spl_token::instruction::mint_to(&spl_token::id(), mint, &ata, &payer, &[], amount)
                .unwrap(),
        );
    }
    send_tx(context, &instructions, &[]).await.unwrap();
    ata
}

pub async fn token_balance(context: &mut ProgramTestContext, address: &Pubkey) -> u64 {
    let account = context
        .banks_client
        .get_account(*address)
        .await
        .unwrap()
        .unwrap();
    spl_token::state::Account::unpack(&account.data).unwrap().amount
}

pub async fn raffle_account_is_closed(env: &mut TestEnv, raffle_id: u32) -> bool {
    let (address, _) = find_raffle_address(&env.program_id, raffle_id);
    env.context
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .is_none()
}

pub async fn init_config(env: &mut TestEnv) {
    let payer = env.context.payer.pubkey();
    let ix = rix::initialize_config(
        &env.program_id,
        &payer,
        &env.owner.pubkey(),
        &env.admin.pubkey(),
        CREATION_FEE,
        TICKET_FEE_BPS,
        MIN_PERIOD,
        MAX_PERIOD,
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[]).await.unwrap();
}

pub async fn set_pause(env: &mut TestEnv, flags: u8) {
    let ix = rix::set_pause_flags(&env.program_id, &env.owner.pubkey(), flags).unwrap();
    send_tx(&mut env.context, &[ix], &[&env.owner]).await.unwrap();
}

/// Baseline SOL/SOL raffle parameters: started immediately, one hour long.
pub fn sol_raffle_params(start_now: i64, shares: Vec<u8>, prize_amount: u64) -> RaffleParams {
    RaffleParams {
        start_time: start_now,
        end_time: start_now + 3_600,
        total_tickets: 10,
        ticket_price: 100_000_000,
        ticket_mint: None,
        max_per_wallet_pct: 40,
        prize_kind: 0,
        prize_amount,
        num_winners: shares.len() as u8,
        win_shares: shares,
        is_unique_winners: true,
        auto_start: true,
    }
}

/// Create a SOL-settled raffle and return its id.
pub async fn create_sol_raffle(env: &mut TestEnv, creator: &Keypair, params: RaffleParams) -> u32 {
    let raffle_id = get_config(env).await.raffle_count;
    let ix = rix::create_raffle(
        &env.program_id,
        &creator.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        params,
        None,
        None,
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[creator, &env.admin])
        .await
        .unwrap();
    raffle_id
}

/// New funded participant wallet.
pub async fn funded_keypair(context: &mut ProgramTestContext, lamports: u64) -> Keypair {
    let keypair = Keypair::new();
    fund(context, &keypair.pubkey(), lamports).await;
    keypair
}

pub async fn buy(
    env: &mut TestEnv,
    buyer: &Keypair,
    raffle_id: u32,
    count: u16,
) -> Result<(), BanksClientError> {
    let ix = rix::buy_tickets(
        &env.program_id,
        &buyer.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        count,
        None,
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[buyer, &env.admin]).await
}

pub async fn announce(
    env: &mut TestEnv,
    raffle_id: u32,
    winners: Vec<Pubkey>,
) -> Result<(), BanksClientError> {
    let ix =
        rix::announce_winners(&env.program_id, &env.admin.pubkey(), raffle_id, winners, None)
            .unwrap();
    send_tx(&mut env.context, &[ix], &[&env.admin]).await
}

pub async fn claim(
    env: &mut TestEnv,
    winner: &Keypair,
    raffle_id: u32,
    slot: u8,
) -> Result<(), BanksClientError> {
    let ix = rix::claim_prize(
        &env.program_id,
        &winner.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        slot,
        None,
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[winner, &env.admin]).await
}

pub async fn claim_back(
    env: &mut TestEnv,
    creator: &Keypair,
    raffle_id: u32,
) -> Result<(), BanksClientError> {
    let ix = rix::claim_back(
        &env.program_id,
        &creator.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        None,
        None,
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[creator, &env.admin]).await
}

/// Assert a transaction failed with the given program error code.
pub fn assert_raffle_error(result: Result<(), BanksClientError>, expected: RaffleError) {
    let err = result.expect_err("expected transaction failure");
    let tx_err = match err {
        BanksClientError::TransactionError(e) => e,
        BanksClientError::SimulationError { err, .. } => err,
        other => panic!("unexpected error kind: {other:?}"),
    };
    match tx_err {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
            assert_eq!(code, expected as u32, "expected {expected:?}");
        }
        other => panic!("unexpected transaction error: {other:?}"),
    }
}
