use anchor_lang::prelude::*;
use anchor_lang::Discriminator;
use ephemeral_vrf_sdk::instructions::{create_request_randomness_ix, RequestRandomnessParams};
use ephemeral_vrf_sdk::types::SerializableAccountMeta;

use crate::{
    constants::*,
    errors::ErrorCode,
    events::WinnerRequested,
    state::{Config, Raffle},
    utils::checked_add_u64,
};

/// Convert an anchor Pubkey to the SDK's Pubkey (same 32 bytes, different crate).
fn to_sdk_pubkey(p: &Pubkey) -> ephemeral_vrf_sdk::Pubkey {
    ephemeral_vrf_sdk::Pubkey::new_from_array(p.to_bytes())
}

// MagicBlock VRF program constants
const VRF_PROGRAM_ID_BYTES: [u8; 32] = ephemeral_vrf_sdk::consts::VRF_PROGRAM_ID.to_bytes();
const DEFAULT_QUEUE_BYTES: [u8; 32] = ephemeral_vrf_sdk::consts::DEFAULT_QUEUE.to_bytes();

pub static VRF_PROGRAM_ID: Pubkey = Pubkey::new_from_array(VRF_PROGRAM_ID_BYTES);
pub static DEFAULT_QUEUE: Pubkey = Pubkey::new_from_array(DEFAULT_QUEUE_BYTES);

#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(seeds = [SEED_CONFIG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_RAFFLE],
        bump,
    )]
    pub raffle: AccountLoader<'info, Raffle>,

    /// CHECK: Our program's identity PDA, used to sign the VRF CPI.
    #[account(seeds = [b"identity"], bump)]
    pub program_identity: AccountInfo<'info>,

    /// CHECK: Oracle queue account
    #[account(mut, address = DEFAULT_QUEUE)]
    pub oracle_queue: AccountInfo<'info>,

    /// CHECK: MagicBlock VRF program
    #[account(address = VRF_PROGRAM_ID)]
    pub vrf_program: AccountInfo<'info>,

    /// CHECK: SlotHashes sysvar
    #[account(address = anchor_lang::solana_program::sysvar::slot_hashes::ID)]
    pub slot_hashes: AccountInfo<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<PerformUpkeep>, _perform_data: Vec<u8>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    let raffle_key = ctx.accounts.raffle.key();
    let config_key = ctx.accounts.config.key();
    let now = Clock::get()?.unix_timestamp;

    // Re-check readiness and snapshot the entrant set. The phase flip below
    // freezes entries, so the snapshot stays exact until fulfillment.
    let (nonce, players) = {
        let raffle = ctx.accounts.raffle.load()?;
        let status = raffle.upkeep_status(cfg.interval_sec, now);
        require!(status.upkeep_needed, ErrorCode::UpkeepNotNeeded);

        let nonce = checked_add_u64(raffle.request_nonce, 1)?;
        let players: Vec<Pubkey> = (0..raffle.players_count as usize)
            .map(|i| Pubkey::new_from_array(raffle.players.data[i]))
            .collect();
        (nonce, players)
    };

    // Request marker: never created on chain. Its address is the correlation
    // id the callback must echo back, one fresh address per request.
    let (request_key, _) =
        Pubkey::find_program_address(&[SEED_REQUEST, &nonce.to_le_bytes()], &crate::ID);

    let mut caller_seed = [0u8; 32];
    caller_seed[..8].copy_from_slice(&nonce.to_le_bytes());

    // The callback carries the raffle, the request marker, and every current
    // player, so the winner — unknown until fulfillment — can be paid in place.
    let mut accounts_metas = vec![
        SerializableAccountMeta {
            pubkey: to_sdk_pubkey(&config_key),
            is_signer: false,
            is_writable: false,
        },
        SerializableAccountMeta {
            pubkey: to_sdk_pubkey(&raffle_key),
            is_signer: false,
            is_writable: true,
        },
        SerializableAccountMeta {
            pubkey: to_sdk_pubkey(&request_key),
            is_signer: false,
            is_writable: false,
        },
    ];
    for player in &players {
        accounts_metas.push(SerializableAccountMeta {
            pubkey: to_sdk_pubkey(player),
            is_signer: false,
            is_writable: true,
        });
    }

    let sdk_ix = create_request_randomness_ix(RequestRandomnessParams {
        payer: to_sdk_pubkey(&ctx.accounts.payer.key()),
        oracle_queue: to_sdk_pubkey(&ctx.accounts.oracle_queue.key()),
        callback_program_id: to_sdk_pubkey(&crate::ID),
        callback_discriminator: crate::instruction::FulfillRandomness::DISCRIMINATOR.to_vec(),
        caller_seed,
        accounts_metas: Some(accounts_metas),
        ..Default::default()
    });

    // Manually convert the SDK instruction to anchor's solana_program types.
    let ix = {
        let program_id = Pubkey::new_from_array(sdk_ix.program_id.to_bytes());
        let accounts: Vec<anchor_lang::solana_program::instruction::AccountMeta> = sdk_ix
            .accounts
            .iter()
            .map(|a| {
                let pubkey = Pubkey::new_from_array(a.pubkey.to_bytes());
                if a.is_writable {
                    anchor_lang::solana_program::instruction::AccountMeta::new(pubkey, a.is_signer)
                } else {
                    anchor_lang::solana_program::instruction::AccountMeta::new_readonly(
                        pubkey, a.is_signer,
                    )
                }
            })
            .collect();
        anchor_lang::solana_program::instruction::Instruction {
            program_id,
            accounts,
            data: sdk_ix.data,
        }
    };

    // Find identity PDA bump
    let (_, identity_bump) = Pubkey::find_program_address(&[b"identity"], &crate::ID);

    // CPI into the VRF program, signing with our program's identity PDA
    anchor_lang::solana_program::program::invoke_signed(
        &ix,
        &[
            ctx.accounts.payer.to_account_info(),
            ctx.accounts.program_identity.to_account_info(),
            ctx.accounts.oracle_queue.to_account_info(),
            ctx.accounts.slot_hashes.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        ],
        &[&[b"identity", &[identity_bump]]],
    )?;

    // Persist the outstanding request after the CPI. From here the raffle is
    // Calculating: entries and repeated triggers reject until the callback.
    let mut raffle = ctx.accounts.raffle.load_mut()?;
    raffle.begin_calculating(request_key, nonce);

    emit!(WinnerRequested {
        request: request_key,
        nonce,
    });

    Ok(())
}
