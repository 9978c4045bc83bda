use serde::Serialize;

use crate::error::InvalidStateError;

/// Wizard step. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    AwaitingAccounts,
    AwaitingTopic,
    ReviewingCandidates,
    EditingSelection,
    Migrating,
    Completed,
}

impl WizardStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingAccounts => "awaiting_accounts",
            Self::AwaitingTopic => "awaiting_topic",
            Self::ReviewingCandidates => "reviewing_candidates",
            Self::EditingSelection => "editing_selection",
            Self::Migrating => "migrating",
            Self::Completed => "completed",
        }
    }

    /// Whether account bindings may change in this step.
    #[must_use]
    pub const fn allows_binding_changes(self) -> bool {
        !matches!(self, Self::Migrating | Self::Completed)
    }

    /// Return whether `self -> target` is a legal transition.
    ///
    /// Forward edges follow the wizard. `ReviewingCandidates` and
    /// `EditingSelection` can step back one. A lost binding drops any
    /// pre-migration step to `AwaitingAccounts`, and a replaced source drops
    /// review and edit back to `AwaitingTopic`. `Completed` only resets.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        use WizardStep::{
            AwaitingAccounts, AwaitingTopic, Completed, EditingSelection, Migrating,
            ReviewingCandidates,
        };

        matches!(
            (self, target),
            (AwaitingAccounts, AwaitingTopic)
                | (AwaitingTopic, ReviewingCandidates)
                | (ReviewingCandidates, EditingSelection)
                | (EditingSelection, Migrating)
                | (Migrating, Completed)
                | (ReviewingCandidates | EditingSelection, AwaitingTopic)
                | (EditingSelection, ReviewingCandidates)
                | (
                    AwaitingTopic | ReviewingCandidates | EditingSelection,
                    AwaitingAccounts
                )
                | (Completed, AwaitingAccounts)
        )
    }

    /// Move to `target`, naming `action` in the error when the table forbids
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] if `self -> target` is not in the
    /// transition table.
    pub fn transition_to(
        self,
        target: Self,
        action: &'static str,
    ) -> Result<Self, InvalidStateError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(InvalidStateError { action, step: self })
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::WizardStep::*;
    use super::*;

    const ALL: [WizardStep; 6] = [
        AwaitingAccounts,
        AwaitingTopic,
        ReviewingCandidates,
        EditingSelection,
        Migrating,
        Completed,
    ];

    #[test]
    fn forward_path_is_legal() {
        let path = [
            AwaitingAccounts,
            AwaitingTopic,
            ReviewingCandidates,
            EditingSelection,
            Migrating,
            Completed,
            AwaitingAccounts,
        ];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn migrating_only_completes() {
        for target in ALL {
            assert_eq!(Migrating.can_transition_to(target), target == Completed);
        }
    }

    #[test]
    fn completed_only_resets() {
        for target in ALL {
            assert_eq!(
                Completed.can_transition_to(target),
                target == AwaitingAccounts
            );
        }
    }

    #[test]
    fn no_step_skips_ahead() {
        assert!(!AwaitingAccounts.can_transition_to(ReviewingCandidates));
        assert!(!AwaitingTopic.can_transition_to(EditingSelection));
        assert!(!ReviewingCandidates.can_transition_to(Migrating));
        assert!(!AwaitingAccounts.can_transition_to(Migrating));
    }

    #[test]
    fn self_transitions_are_illegal() {
        for step in ALL {
            assert!(!step.can_transition_to(step), "{step} -> {step}");
        }
    }

    #[test]
    fn illegal_transition_names_action_and_step() {
        let err = Migrating
            .transition_to(AwaitingTopic, "bind the source account")
            .unwrap_err();
        assert_eq!(err.step, Migrating);
        assert_eq!(
            err.to_string(),
            "cannot bind the source account while migrating"
        );
    }

    #[test]
    fn binding_changes_frozen_once_migration_starts() {
        assert!(EditingSelection.allows_binding_changes());
        assert!(!Migrating.allows_binding_changes());
        assert!(!Completed.allows_binding_changes());
    }
}
