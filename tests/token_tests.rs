//! Token-denominated settlement paths: SPL ticket payment with the config
//! fee vault, SPL prize escrow and claims, the NFT prize path, and token
//! fee withdrawal.

mod common;

use common::*;
use solana_program::program_pack::Pack;
use solana_sdk::{rent::Rent, signature::Keypair, signer::Signer};
use spl_associated_token_account::get_associated_token_address;
use solraffle::{
    error::RaffleError,
    instruction as rix,
    state::{PrizeKind, RaffleStatus},
    utils::{find_config_address, find_raffle_address},
};

#[tokio::test]
async fn spl_ticket_revenue_settles_through_fee_vault() {
    let mut env = setup().await;
    init_config(&mut env).await;
    // The admin funds the fee vault account at announcement
    fund(&mut env.context, &env.admin.pubkey(), 1_000_000_000).await;
    let creator = funded_keypair(&mut env.context, 5_000_000_000).await;
    let buyer = funded_keypair(&mut env.context, 1_000_000_000).await;

    let mint = create_mint(&mut env.context, 6).await;
    let mint_key = mint.pubkey();
    let buyer_ata = create_funded_ata(&mut env.context, &buyer.pubkey(), &mint_key, 10_000_000).await;
    let creator_ata = create_funded_ata(&mut env.context, &creator.pubkey(), &mint_key, 0).await;

    let t0 = now(&mut env.context).await;
    let mut params = sol_raffle_params(t0, vec![100], 1_000_000_000);
    params.ticket_mint = Some(mint_key);
    params.ticket_price = 1_000_000;

    let raffle_id = get_config(&mut env).await.raffle_count;
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
    send_tx(&mut env.context, &[ix], &[&creator, &env.admin])
        .await
        .unwrap();

    let raffle_address = find_raffle_address(&env.program_id, raffle_id).0;
    let ticket_escrow = get_associated_token_address(&raffle_address, &mint_key);
    assert_eq!(token_balance(&mut env.context, &ticket_escrow).await, 0);

    // Paying with some other mint is refused before any transfer
    let decoy = create_mint(&mut env.context, 6).await;
    let decoy_ata =
        create_funded_ata(&mut env.context, &buyer.pubkey(), &decoy.pubkey(), 10_000_000).await;
    let ix = rix::buy_tickets(
        &env.program_id,
        &buyer.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        1,
        Some((&decoy.pubkey(), &decoy_ata)),
    )
    .unwrap();
    assert_raffle_error(
        send_tx(&mut env.context, &[ix], &[&buyer, &env.admin]).await,
        RaffleError::MintMismatch,
    );

    let ix = rix::buy_tickets(
        &env.program_id,
        &buyer.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        3,
        Some((&mint_key, &buyer_ata)),
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&buyer, &env.admin])
        .await
        .unwrap();
    assert_eq!(token_balance(&mut env.context, &ticket_escrow).await, 3_000_000);
    assert_eq!(token_balance(&mut env.context, &buyer_ata).await, 7_000_000);

    // Settlement moves 100 bps of token revenue into the config fee vault
    warp_to_timestamp(&mut env.context, t0 + 3_601).await;
    let ix = rix::announce_winners(
        &env.program_id,
        &env.admin.pubkey(),
        raffle_id,
        vec![buyer.pubkey()],
        Some(&mint_key),
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&env.admin]).await.unwrap();

    let raffle = get_raffle(&mut env, raffle_id).await;
    assert_eq!(raffle.status, RaffleStatus::SuccessEnded);
    assert_eq!(raffle.claimable_ticket_amount, 2_970_000);

    let config_address = find_config_address(&env.program_id).0;
    let fee_vault = get_associated_token_address(&config_address, &mint_key);
    assert_eq!(token_balance(&mut env.context, &fee_vault).await, 30_000);
    assert_eq!(token_balance(&mut env.context, &ticket_escrow).await, 2_970_000);

    // The prize side of this raffle is native SOL
    let winner_before = balance(&mut env.context, &buyer.pubkey()).await;
    claim(&mut env, &buyer, raffle_id, 0).await.unwrap();
    assert_eq!(
        balance(&mut env.context, &buyer.pubkey()).await,
        winner_before + 1_000_000_000
    );

    // Claim-back sweeps the escrow into the creator's account and closes it
    let ix = rix::claim_back(
        &env.program_id,
        &creator.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        None,
        Some((&mint_key, &creator_ata)),
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&creator, &env.admin])
        .await
        .unwrap();
    assert_eq!(token_balance(&mut env.context, &creator_ata).await, 2_970_000);
    assert!(account_is_closed(&mut env.context, &ticket_escrow).await);

    // Owner drains the token fee vault
    let receiver = Keypair::new();
    let receiver_ata =
        create_funded_ata(&mut env.context, &receiver.pubkey(), &mint_key, 0).await;
    let ix = rix::withdraw_spl_fees(
        &env.program_id,
        &env.owner.pubkey(),
        &mint_key,
        &receiver_ata,
        30_000,
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&env.owner]).await.unwrap();
    assert_eq!(token_balance(&mut env.context, &receiver_ata).await, 30_000);
    assert_eq!(token_balance(&mut env.context, &fee_vault).await, 0);
}

#[tokio::test]
async fn spl_prize_escrow_pays_winner_shares() {
    let mut env = setup().await;
    init_config(&mut env).await;
    let creator = funded_keypair(&mut env.context, 5_000_000_000).await;
    let winner = funded_keypair(&mut env.context, 1_000_000_000).await;

    let mint = create_mint(&mut env.context, 6).await;
    let mint_key = mint.pubkey();
    let creator_ata =
        create_funded_ata(&mut env.context, &creator.pubkey(), &mint_key, 1_000_000_000).await;

    let t0 = now(&mut env.context).await;
    let mut params = sol_raffle_params(t0, vec![60, 40], 1_000_000_000);
    params.prize_kind = 1;

    let raffle_id = get_config(&mut env).await.raffle_count;
    let ix = rix::create_raffle(
        &env.program_id,
        &creator.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        params,
        Some(&mint_key),
        Some(&creator_ata),
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&creator, &env.admin])
        .await
        .unwrap();

    // The whole prize left the creator for the raffle's escrow
    let raffle_address = find_raffle_address(&env.program_id, raffle_id).0;
    let prize_escrow = get_associated_token_address(&raffle_address, &mint_key);
    assert_eq!(token_balance(&mut env.context, &creator_ata).await, 0);
    assert_eq!(token_balance(&mut env.context, &prize_escrow).await, 1_000_000_000);
    let raffle = get_raffle(&mut env, raffle_id).await;
    assert_eq!(raffle.prize_kind, PrizeKind::FungibleToken);
    assert_eq!(raffle.prize_mint, Some(mint_key));

    buy(&mut env, &winner, raffle_id, 2).await.unwrap();

    warp_to_timestamp(&mut env.context, t0 + 3_601).await;
    announce(&mut env, raffle_id, vec![winner.pubkey()]).await.unwrap();
    let raffle = get_raffle(&mut env, raffle_id).await;
    assert_eq!(raffle.claimable_prize_back, 400_000_000);
    assert_eq!(raffle.claimable_ticket_amount, 198_000_000);

    // Slot 0 pays 60% of the token prize
    let winner_ata =
        create_funded_ata(&mut env.context, &winner.pubkey(), &mint_key, 0).await;
    let ix = rix::claim_prize(
        &env.program_id,
        &winner.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        0,
        Some((&mint_key, &winner_ata)),
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&winner, &env.admin])
        .await
        .unwrap();
    assert_eq!(token_balance(&mut env.context, &winner_ata).await, 600_000_000);

    // Claim-back returns the unfilled 40% in tokens and the net SOL ticket
    // revenue in lamports, then the drained escrow closes
    let creator_before = balance(&mut env.context, &creator.pubkey()).await;
    let ix = rix::claim_back(
        &env.program_id,
        &creator.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        Some((&mint_key, &creator_ata)),
        None,
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&creator, &env.admin])
        .await
        .unwrap();
    assert_eq!(token_balance(&mut env.context, &creator_ata).await, 400_000_000);
    assert!(account_is_closed(&mut env.context, &prize_escrow).await);
    // 2 tickets at 0.1 SOL net of the 100 bps fee, plus the closed escrow's rent
    let rent: Rent = env.context.banks_client.get_sysvar().await.unwrap();
    assert_eq!(
        balance(&mut env.context, &creator.pubkey()).await,
        creator_before + 198_000_000 + rent.minimum_balance(spl_token::state::Account::LEN)
    );
}

#[tokio::test]
async fn nft_prize_collapses_to_a_single_winner() {
    let mut env = setup().await;
    init_config(&mut env).await;
    let creator = funded_keypair(&mut env.context, 5_000_000_000).await;
    let winner = funded_keypair(&mut env.context, 1_000_000_000).await;

    // Supply above one is not an NFT
    let fake = create_mint(&mut env.context, 0).await;
    let fake_ata =
        create_funded_ata(&mut env.context, &creator.pubkey(), &fake.pubkey(), 2).await;
    let t0 = now(&mut env.context).await;
    let mut params = sol_raffle_params(t0, vec![50, 30, 20], 7);
    params.prize_kind = 2;
    let ix = rix::create_raffle(
        &env.program_id,
        &creator.pubkey(),
        &env.admin.pubkey(),
        0,
        params.clone(),
        Some(&fake.pubkey()),
        Some(&fake_ata),
    )
    .unwrap();
    assert_raffle_error(
        send_tx(&mut env.context, &[ix], &[&creator, &env.admin]).await,
        RaffleError::PrizeMintMismatch,
    );

    let mint = create_mint(&mut env.context, 0).await;
    let mint_key = mint.pubkey();
    let creator_ata = create_funded_ata(&mut env.context, &creator.pubkey(), &mint_key, 1).await;

    let raffle_id = get_config(&mut env).await.raffle_count;
    let ix = rix::create_raffle(
        &env.program_id,
        &creator.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        params,
        Some(&mint_key),
        Some(&creator_ata),
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&creator, &env.admin])
        .await
        .unwrap();

    // The share vector degenerates to one slot holding everything
    let raffle = get_raffle(&mut env, raffle_id).await;
    assert_eq!(raffle.prize_kind, PrizeKind::NonFungible);
    assert_eq!(raffle.num_winners, 1);
    assert_eq!(raffle.prize_amount, 1);
    assert_eq!(raffle.win_shares[0], 100);
    assert_eq!(token_balance(&mut env.context, &creator_ata).await, 0);

    buy(&mut env, &winner, raffle_id, 1).await.unwrap();
    warp_to_timestamp(&mut env.context, t0 + 3_601).await;
    announce(&mut env, raffle_id, vec![winner.pubkey()]).await.unwrap();

    let winner_ata =
        create_funded_ata(&mut env.context, &winner.pubkey(), &mint_key, 0).await;
    let ix = rix::claim_prize(
        &env.program_id,
        &winner.pubkey(),
        &env.admin.pubkey(),
        raffle_id,
        0,
        Some((&mint_key, &winner_ata)),
    )
    .unwrap();
    send_tx(&mut env.context, &[ix], &[&winner, &env.admin])
        .await
        .unwrap();
    assert_eq!(token_balance(&mut env.context, &winner_ata).await, 1);
}
