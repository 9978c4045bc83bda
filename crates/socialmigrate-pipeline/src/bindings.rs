//! Source and destination account bindings.

use chrono::Utc;
use socialmigrate_core::{AccountBinding, AccountKind, Credential, Profile, Role};

use crate::error::InvalidStateError;
use crate::step::WizardStep;

/// Holds at most one binding per role.
///
/// While a migration runs the bindings are locked; every mutation is
/// rejected until [`AccountBindings::unlock`].
#[derive(Debug, Default)]
pub struct AccountBindings {
    source: Option<AccountBinding>,
    destination: Option<AccountBinding>,
    locked_in: Option<WizardStep>,
}

impl AccountBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `role`, replacing and dropping any previous binding and its
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] while locked.
    pub fn bind(
        &mut self,
        role: Role,
        kind: AccountKind,
        profile: Profile,
        credential: Credential,
    ) -> Result<&AccountBinding, InvalidStateError> {
        self.ensure_unlocked(bind_action(role))?;

        let binding = AccountBinding {
            role,
            kind,
            profile,
            credential,
            bound_at: Utc::now(),
        };
        let slot = self.slot_mut(role);
        let replaced = slot.take().is_some();
        let bound = slot.insert(binding);
        tracing::info!(
            %role,
            profile_id = %bound.profile.id,
            replaced,
            "account bound"
        );
        Ok(bound)
    }

    /// Remove the binding for `role`. Returns the profile that was bound.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] while locked.
    pub fn unbind(&mut self, role: Role) -> Result<Option<Profile>, InvalidStateError> {
        self.ensure_unlocked(unbind_action(role))?;
        let removed = self.slot_mut(role).take();
        if removed.is_some() {
            tracing::info!(%role, "account unbound");
        }
        Ok(removed.map(|b| b.profile))
    }

    #[must_use]
    pub fn get(&self, role: Role) -> Option<&AccountBinding> {
        match role {
            Role::Source => self.source.as_ref(),
            Role::Destination => self.destination.as_ref(),
        }
    }

    #[must_use]
    pub fn is_bound(&self, role: Role) -> bool {
        self.get(role).is_some()
    }

    #[must_use]
    pub fn both_bound(&self) -> bool {
        self.source.is_some() && self.destination.is_some()
    }

    /// Freeze the bindings for the duration of `step`.
    pub fn lock(&mut self, step: WizardStep) {
        self.locked_in = Some(step);
    }

    pub fn unlock(&mut self) {
        self.locked_in = None;
    }

    /// Drop both bindings.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] while locked.
    pub fn clear(&mut self) -> Result<(), InvalidStateError> {
        self.ensure_unlocked("disconnect accounts")?;
        self.source = None;
        self.destination = None;
        Ok(())
    }

    fn ensure_unlocked(&self, action: &'static str) -> Result<(), InvalidStateError> {
        match self.locked_in {
            Some(step) => Err(InvalidStateError { action, step }),
            None => Ok(()),
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<AccountBinding> {
        match role {
            Role::Source => &mut self.source,
            Role::Destination => &mut self.destination,
        }
    }
}

pub(crate) fn bind_action(role: Role) -> &'static str {
    match role {
        Role::Source => "bind the source account",
        Role::Destination => "bind the destination account",
    }
}

pub(crate) fn unbind_action(role: Role) -> &'static str {
    match role {
        Role::Source => "unbind the source account",
        Role::Destination => "unbind the destination account",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str) -> Profile {
        Profile {
            id: id.to_string(),
            display_name: format!("User {id}"),
            avatar_uri: String::new(),
        }
    }

    #[test]
    fn bind_then_get() {
        let mut bindings = AccountBindings::new();
        bindings
            .bind(
                Role::Source,
                AccountKind::Profile,
                profile("u1"),
                Credential::new("t1"),
            )
            .unwrap();

        let bound = bindings.get(Role::Source).unwrap();
        assert_eq!(bound.profile.id, "u1");
        assert_eq!(bound.credential.expose(), "t1");
        assert!(!bindings.is_bound(Role::Destination));
        assert!(!bindings.both_bound());
    }

    #[test]
    fn rebinding_replaces_previous_credential() {
        let mut bindings = AccountBindings::new();
        bindings
            .bind(Role::Destination, AccountKind::Page, profile("a"), Credential::new("old"))
            .unwrap();
        bindings
            .bind(Role::Destination, AccountKind::Page, profile("b"), Credential::new("new"))
            .unwrap();

        let bound = bindings.get(Role::Destination).unwrap();
        assert_eq!(bound.profile.id, "b");
        assert_eq!(bound.credential.expose(), "new");
    }

    #[test]
    fn unbind_returns_profile() {
        let mut bindings = AccountBindings::new();
        bindings
            .bind(Role::Source, AccountKind::Profile, profile("u1"), Credential::new("t"))
            .unwrap();
        let removed = bindings.unbind(Role::Source).unwrap();
        assert_eq!(removed.map(|p| p.id).as_deref(), Some("u1"));
        assert!(bindings.unbind(Role::Source).unwrap().is_none());
    }

    #[test]
    fn locked_bindings_reject_every_mutation() {
        let mut bindings = AccountBindings::new();
        bindings
            .bind(Role::Source, AccountKind::Profile, profile("u1"), Credential::new("t"))
            .unwrap();
        bindings.lock(WizardStep::Migrating);

        let err = bindings
            .bind(Role::Source, AccountKind::Profile, profile("u2"), Credential::new("x"))
            .unwrap_err();
        assert_eq!(err.step, WizardStep::Migrating);
        assert!(bindings.unbind(Role::Source).is_err());
        assert!(bindings.clear().is_err());
        assert_eq!(bindings.get(Role::Source).unwrap().profile.id, "u1");

        bindings.unlock();
        bindings.clear().unwrap();
        assert!(!bindings.is_bound(Role::Source));
    }
}
