use crate::error::StakeError;
use anchor_lang::prelude::*;

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::UpgradeableLoaderState;

/// Verifies that `authority` is the program's upgrade authority by
/// deserializing the upgradeable loader's ProgramData account. Used to
/// restrict pool creation in hardened deployments.
pub fn validate_program_update_authority(
    program_data_account: &UncheckedAccount,
    authority: &Signer,
) -> Result<()> {
    let program_data = program_data_account
        .try_borrow_data()
        .map_err(|_| StakeError::InvalidProgramData)?;

    let loader_state = bincode::deserialize::<UpgradeableLoaderState>(&program_data)
        .map_err(|_| StakeError::InvalidProgramData)?;

    match loader_state {
        UpgradeableLoaderState::ProgramData {
            slot: _,
            upgrade_authority_address,
        } => match upgrade_authority_address {
            Some(update_authority) => {
                require!(
                    authority.key() == update_authority,
                    StakeError::UnauthorizedPoolCreator
                );
            }
            None => {
                return Err(StakeError::NoUpgradeAuthority.into());
            }
        },
        _ => return Err(StakeError::InvalidProgramData.into()),
    }

    Ok(())
}
