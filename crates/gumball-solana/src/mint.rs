//! Mint transaction assembly — the one-shot orchestrator.
//!
//! Builds a fixed sequence: create the mint account, initialise it, create
//! the minter's token account, mint one token, then invoke the
//! candy-machine program with its fixed account order. Gatekeeper,
//! whitelist, and payment-token accounts are appended when the machine
//! demands them; approve instructions get a matching revoke in a cleanup
//! transaction submitted after the first confirms.
//!
//! No retry and no state machine: the call either returns the new mint or
//! an error.

use sha2::{Digest as _, Sha256};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
  commitment_config::CommitmentConfig,
  instruction::{AccountMeta, Instruction},
  program_pack::Pack as _,
  pubkey::Pubkey,
  signature::{Keypair, Signature},
  signer::Signer as _,
  system_instruction, system_program, sysvar,
  transaction::Transaction,
};
use spl_associated_token_account::{
  get_associated_token_address, instruction::create_associated_token_account,
};

use crate::{
  Result,
  machine::{CandyMachineAccount, WhitelistMintMode},
  pda,
  wallet::WalletSigner,
};

/// A submitted mint: the new token plus transaction signatures.
#[derive(Debug, Clone)]
pub struct MintOutcome {
  pub mint:              Pubkey,
  pub signature:         Signature,
  /// Signature of the revoke-cleanup transaction, when one was needed.
  pub cleanup_signature: Option<Signature>,
}

/// Assemble, sign, and submit one minting transaction for `machine_id`.
pub async fn mint_one<W: WalletSigner>(
  client: &RpcClient,
  wallet: &W,
  machine_id: &Pubkey,
  machine: &CandyMachineAccount,
) -> Result<MintOutcome> {
  let payer = wallet.pubkey();
  let nft_mint = Keypair::new();
  let token_account = get_associated_token_address(&payer, &nft_mint.pubkey());
  let rent = client
    .get_minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
    .await?;

  let mut instructions = vec![
    system_instruction::create_account(
      &payer,
      &nft_mint.pubkey(),
      rent,
      spl_token::state::Mint::LEN as u64,
      &spl_token::id(),
    ),
    spl_token::instruction::initialize_mint(
      &spl_token::id(),
      &nft_mint.pubkey(),
      &payer,
      Some(&payer),
      0,
    )?,
    create_associated_token_account(&payer, &payer, &nft_mint.pubkey(), &spl_token::id()),
    spl_token::instruction::mint_to(
      &spl_token::id(),
      &nft_mint.pubkey(),
      &token_account,
      &payer,
      &[],
      1,
    )?,
  ];
  let mut cleanup: Vec<Instruction> = Vec::new();
  let mut remaining: Vec<AccountMeta> = Vec::new();
  // Ephemeral authorities that must co-sign beyond the wallet and the mint.
  let mut ephemeral: Vec<Keypair> = Vec::new();

  if let Some(gatekeeper) = &machine.data.gatekeeper {
    let token = pda::network_token(&payer, &gatekeeper.gatekeeper_network).0;
    remaining.push(AccountMeta::new(token, false));
    if gatekeeper.expire_on_use {
      remaining.push(AccountMeta::new_readonly(pda::CIVIC_GATEWAY_PROGRAM_ID, false));
      remaining.push(AccountMeta::new_readonly(
        pda::network_expire(&gatekeeper.gatekeeper_network).0,
        false,
      ));
    }
  }

  if let Some(whitelist) = &machine.data.whitelist_mint_settings {
    let whitelist_token = get_associated_token_address(&payer, &whitelist.mint);
    remaining.push(AccountMeta::new(whitelist_token, false));

    if whitelist.mode == WhitelistMintMode::BurnEveryTime {
      let burn_authority = Keypair::new();
      remaining.push(AccountMeta::new(whitelist.mint, false));
      remaining.push(AccountMeta::new_readonly(burn_authority.pubkey(), true));

      // Only approve the burn when the whitelist token account exists.
      let exists = client
        .get_account_with_commitment(&whitelist_token, CommitmentConfig::confirmed())
        .await?
        .value
        .is_some();
      if exists {
        instructions.push(spl_token::instruction::approve(
          &spl_token::id(),
          &whitelist_token,
          &burn_authority.pubkey(),
          &payer,
          &[],
          1,
        )?);
        cleanup.push(spl_token::instruction::revoke(
          &spl_token::id(),
          &whitelist_token,
          &payer,
          &[],
        )?);
      }
      ephemeral.push(burn_authority);
    }
  }

  if let Some(token_mint) = &machine.token_mint {
    let paying_account = get_associated_token_address(&payer, token_mint);
    let transfer_authority = Keypair::new();
    remaining.push(AccountMeta::new(paying_account, false));
    remaining.push(AccountMeta::new_readonly(transfer_authority.pubkey(), true));

    instructions.push(spl_token::instruction::approve(
      &spl_token::id(),
      &paying_account,
      &transfer_authority.pubkey(),
      &payer,
      &[],
      machine.data.price,
    )?);
    cleanup.push(spl_token::instruction::revoke(
      &spl_token::id(),
      &paying_account,
      &payer,
      &[],
    )?);
    ephemeral.push(transfer_authority);
  }

  let (creator, creator_bump) = pda::candy_machine_creator(machine_id);
  instructions.push(mint_nft_instruction(
    machine_id,
    &creator,
    creator_bump,
    &payer,
    &machine.wallet,
    &nft_mint.pubkey(),
    remaining,
  ));

  let blockhash = client.get_latest_blockhash().await?;
  let mut tx = Transaction::new_with_payer(&instructions, Some(&payer));
  let signer_refs: Vec<&Keypair> =
    std::iter::once(&nft_mint).chain(ephemeral.iter()).collect();
  tx.try_partial_sign(&signer_refs, blockhash)?;
  wallet.sign(&mut tx, blockhash)?;

  let signature = client.send_and_confirm_transaction(&tx).await?;
  tracing::info!(mint = %nft_mint.pubkey(), %signature, "mint transaction confirmed");

  let cleanup_signature = if cleanup.is_empty() {
    None
  } else {
    let blockhash = client.get_latest_blockhash().await?;
    let mut tx = Transaction::new_with_payer(&cleanup, Some(&payer));
    wallet.sign(&mut tx, blockhash)?;
    Some(client.send_and_confirm_transaction(&tx).await?)
  };

  Ok(MintOutcome {
    mint: nft_mint.pubkey(),
    signature,
    cleanup_signature,
  })
}

/// The candy-machine `mint_nft` call: anchor discriminator + creator bump,
/// with the program's fixed account order.
fn mint_nft_instruction(
  machine_id: &Pubkey,
  creator: &Pubkey,
  creator_bump: u8,
  payer: &Pubkey,
  treasury: &Pubkey,
  nft_mint: &Pubkey,
  remaining: Vec<AccountMeta>,
) -> Instruction {
  let mut accounts = vec![
    AccountMeta::new(*machine_id, false),
    AccountMeta::new_readonly(*creator, false),
    AccountMeta::new(*payer, true),
    AccountMeta::new(*treasury, false),
    AccountMeta::new(pda::metadata_account(nft_mint), false),
    AccountMeta::new(*nft_mint, false),
    AccountMeta::new_readonly(*payer, true), // mint authority
    AccountMeta::new_readonly(*payer, true), // update authority
    AccountMeta::new(pda::master_edition_account(nft_mint), false),
    AccountMeta::new_readonly(pda::TOKEN_METADATA_PROGRAM_ID, false),
    AccountMeta::new_readonly(spl_token::id(), false),
    AccountMeta::new_readonly(system_program::id(), false),
    AccountMeta::new_readonly(sysvar::rent::id(), false),
    AccountMeta::new_readonly(sysvar::clock::id(), false),
    AccountMeta::new_readonly(sysvar::slot_hashes::id(), false),
    AccountMeta::new_readonly(sysvar::instructions::id(), false),
  ];
  accounts.extend(remaining);

  let mut data = anchor_discriminator("mint_nft").to_vec();
  data.push(creator_bump);

  Instruction {
    program_id: pda::CANDY_MACHINE_PROGRAM_ID,
    accounts,
    data,
  }
}

/// First eight bytes of `sha256("global:<method>")` — the instruction
/// discriminator used by anchor programs.
fn anchor_discriminator(method: &str) -> [u8; 8] {
  let digest = Sha256::digest(format!("global:{method}").as_bytes());
  let mut out = [0u8; 8];
  out.copy_from_slice(&digest[..8]);
  out
}
