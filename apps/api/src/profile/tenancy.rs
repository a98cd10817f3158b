//! Tenants are derived from the domain of a user's email address.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Tenant, UserProfile, UserProfileInput};
use crate::store::{ContentStore, ProfileStore};

/// Consumer mail providers. Addresses here never form a tenant.
pub const PUBLIC_MAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "outlook.com",
    "hotmail.com",
    "live.com",
    "yahoo.com",
    "icloud.com",
    "me.com",
    "aol.com",
    "proton.me",
    "protonmail.com",
];

/// Lowercased organizational domain of `email`, or `None` for malformed
/// addresses and public mail providers.
pub fn tenant_domain_for_email(email: &str) -> Option<String> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    let domain = domain.to_ascii_lowercase();
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return None;
    }
    if PUBLIC_MAIL_DOMAINS.contains(&domain.as_str()) {
        return None;
    }
    Some(domain)
}

/// Finds the tenant for `email`'s domain, creating it on first sight.
pub async fn resolve_tenant(
    store: &dyn ContentStore,
    email: &str,
) -> Result<Option<Tenant>, AppError> {
    let Some(domain) = tenant_domain_for_email(email) else {
        return Ok(None);
    };

    if let Some(existing) = store.find_tenant_by_domain(&domain).await? {
        return Ok(Some(existing));
    }

    let tenant = store.create_tenant(&domain, &domain).await?;
    info!(tenant_id = %tenant.id, %domain, "Created tenant");
    Ok(Some(tenant))
}

/// Saves the business profile, attaching the tenant its email resolves to.
pub async fn save_profile(
    store: &dyn ContentStore,
    user_id: Uuid,
    input: UserProfileInput,
) -> Result<UserProfile, AppError> {
    if !input.email.contains('@') {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid email address",
            input.email
        )));
    }
    let tenant_id = resolve_tenant(store, &input.email).await?.map(|t| t.id);
    let profile = store.upsert_user(user_id, input, tenant_id).await?;
    info!(%user_id, ?tenant_id, "Saved user profile");
    Ok(profile)
}
