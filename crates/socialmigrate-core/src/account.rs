use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a migration an account is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Source,
    Destination,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Role::Source => "source",
            Role::Destination => "destination",
        })
    }
}

/// Whether a bound account is a personal profile or a managed page.
///
/// Profiles read their own feed through the `me` alias; pages are addressed
/// by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[default]
    Profile,
    Page,
}

/// A resolved identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub avatar_uri: String,
}

impl Profile {
    /// `@`-prefixed handle derived from the display name.
    #[must_use]
    pub fn handle(&self) -> String {
        let compact: String = self
            .display_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        format!("@{}", compact.to_lowercase())
    }
}

/// Opaque bearer credential.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for collaborators that must send it upstream.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

/// An account a user credential is allowed to publish to, together with the
/// credential to use when doing so.
#[derive(Clone, PartialEq, Eq)]
pub struct PostableTarget {
    pub profile: Profile,
    pub post_credential: Credential,
}

impl std::fmt::Debug for PostableTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostableTarget")
            .field("profile", &self.profile)
            .field("post_credential", &self.post_credential)
            .finish()
    }
}

/// A role bound to a resolved profile and its credential.
#[derive(Debug, Clone)]
pub struct AccountBinding {
    pub role: Role,
    pub kind: AccountKind,
    pub profile: Profile,
    pub credential: Credential,
    pub bound_at: DateTime<Utc>,
}

impl AccountBinding {
    /// Account reference passed to content collaborators.
    #[must_use]
    pub fn account_ref(&self) -> &str {
        match self.kind {
            AccountKind::Profile => "me",
            AccountKind::Page => &self.profile.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> Profile {
        Profile {
            id: "42".to_string(),
            display_name: name.to_string(),
            avatar_uri: String::new(),
        }
    }

    #[test]
    fn handle_strips_whitespace_and_lowercases() {
        assert_eq!(profile("Alex Doe").handle(), "@alexdoe");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("EAAB-secret");
        let out = format!("{cred:?}");
        assert!(!out.contains("EAAB"), "token leaked: {out}");
    }

    #[test]
    fn profile_binding_reads_own_feed() {
        let binding = AccountBinding {
            role: Role::Source,
            kind: AccountKind::Profile,
            profile: profile("Alex Doe"),
            credential: Credential::new("t"),
            bound_at: Utc::now(),
        };
        assert_eq!(binding.account_ref(), "me");
    }

    #[test]
    fn page_binding_is_addressed_by_id() {
        let binding = AccountBinding {
            role: Role::Destination,
            kind: AccountKind::Page,
            profile: profile("Studio"),
            credential: Credential::new("t"),
            bound_at: Utc::now(),
        };
        assert_eq!(binding.account_ref(), "42");
    }
}
