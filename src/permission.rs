//! Commenter authority

use crate::error::Result;
use crate::ownership::OwnershipResolver;
use crate::platform::PlatformService;
use crate::types::PrRef;
use tracing::debug;

/// Whether `login` may run maintainer commands on `pr`
///
/// Repository `admin`/`write` access grants. Otherwise, when `sigs_dir` is
/// given, ownership of every sig directory the PR touches grants.
///
/// Failing to read the permission level is an error; ownership lookups
/// fail closed.
pub async fn has_permission(
    platform: &dyn PlatformService,
    pr: &PrRef,
    login: &str,
    sigs_dir: Option<&str>,
) -> Result<bool> {
    let login = login.to_lowercase();
    let permission = platform.get_user_permission(&pr.repo_ref(), &login).await?;

    if permission.can_write() {
        debug!(%pr, login = %login, ?permission, "permission granted by repository access");
        return Ok(true);
    }

    let Some(sigs_dir) = sigs_dir else {
        debug!(%pr, login = %login, ?permission, "permission denied");
        return Ok(false);
    };

    let owner = OwnershipResolver::new(platform, sigs_dir)
        .authorize(pr, &login)
        .await;
    debug!(%pr, login = %login, owner, "permission decided by sig ownership");
    Ok(owner)
}
