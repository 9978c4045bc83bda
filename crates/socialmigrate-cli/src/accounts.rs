//! `profile` and `pages` command handlers.

use socialmigrate_core::{Credential, IdentityProvider};

/// Print the profile a token resolves to.
///
/// # Errors
///
/// Returns an error if the token is rejected.
pub(crate) async fn run_profile(identity: &dyn IdentityProvider, token: &str) -> anyhow::Result<()> {
    let profile = identity.resolve_profile(&Credential::new(token)).await?;
    println!("{:<10}{}", "ID", profile.id);
    println!("{:<10}{}", "NAME", profile.display_name);
    println!("{:<10}{}", "HANDLE", profile.handle());
    println!("{:<10}{}", "AVATAR", profile.avatar_uri);
    Ok(())
}

/// Print the pages a token may publish to.
///
/// # Errors
///
/// Returns an error if the token is rejected.
pub(crate) async fn run_pages(identity: &dyn IdentityProvider, token: &str) -> anyhow::Result<()> {
    let targets = identity
        .list_postable_targets(&Credential::new(token))
        .await?;

    if targets.is_empty() {
        println!("no managed pages found for this token");
        return Ok(());
    }

    println!("{:<24}NAME", "PAGE ID");
    for target in &targets {
        println!("{:<24}{}", target.profile.id, target.profile.display_name);
    }
    Ok(())
}
