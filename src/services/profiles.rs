use uuid::Uuid;

use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::AppError;
use crate::db::ProfileStore;
use crate::models::profiles::{Profile, ProfileName, MAX_PROFILES_PER_ACCOUNT};

/// Load a profile on behalf of `account`. A profile owned by someone else is
/// reported exactly like a missing one.
pub async fn resolve_owned_profile(
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    profile_id: Uuid,
) -> Result<Profile, AppError> {
    match profiles.find_profile(profile_id).await? {
        Some(profile) if profile.account_id == account.account_id => Ok(profile),
        Some(_) => {
            tracing::warn!(%profile_id, account_id = %account.account_id, "profile owned by another account");
            Err(AppError::not_found("Profile not found"))
        }
        None => Err(AppError::not_found("Profile not found")),
    }
}

pub async fn list_profiles(
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
) -> Result<Vec<Profile>, AppError> {
    Ok(profiles.list_profiles(account.account_id).await?)
}

pub async fn create_profile(
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    name: String,
) -> Result<Profile, AppError> {
    let name = ProfileName::parse(name).map_err(AppError::validation)?;

    if profiles.count_profiles(account.account_id).await? >= MAX_PROFILES_PER_ACCOUNT {
        return Err(AppError::validation(format!(
            "An account can have at most {} profiles",
            MAX_PROFILES_PER_ACCOUNT
        )));
    }

    let profile = Profile::new(account.account_id, name);
    profiles.insert_profile(&profile).await?;

    tracing::info!(profile_id = %profile.id, "profile created");
    Ok(profile)
}

pub async fn delete_profile(
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    profile_id: Uuid,
) -> Result<(), AppError> {
    let profile = resolve_owned_profile(profiles, account, profile_id).await?;
    profiles.delete_profile(profile.id).await?;
    Ok(())
}
