//! Wizard orchestrator.
//!
//! Owns the step, the account bindings, the candidate and selection state,
//! and the migration run. Every operation checks the current step first; an
//! operation that is not legal in that step fails with
//! [`InvalidStateError`] and changes nothing.
//!
//! The publish loop is strictly sequential. Callers either drive it one item
//! at a time with [`Orchestrator::publish_next`] or let
//! [`Orchestrator::run_migration`] drain it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use socialmigrate_core::{
    AccountBinding, AccountKind, AuthError, ContentSink, ContentSource, Credential, DateRange,
    IdentityProvider, Post, PostableTarget, Profile, RelevanceClassifier, Role,
};
use tokio::sync::watch;
use uuid::Uuid;

use crate::bindings::{bind_action, unbind_action, AccountBindings};
use crate::candidates::fetch_candidates;
use crate::error::{InvalidStateError, MigrateError};
use crate::log::{ItemStatus, MigrationLog, MigrationReport, Progress};
use crate::relevance::{MatchOutcome, MatchSet, RelevanceFilter};
use crate::selection::SelectionSet;
use crate::step::WizardStep;

const EMPTY_CREDENTIAL: &str = "access token is empty";

/// External services the orchestrator talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityProvider>,
    pub source: Arc<dyn ContentSource>,
    pub sink: Arc<dyn ContentSink>,
    pub classifier: Arc<dyn RelevanceClassifier>,
}

/// Result of a classify call, as shown on the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub topic: String,
    pub candidates: usize,
    pub matched: usize,
    pub outcome: MatchOutcome,
}

/// What happened to one item of a migration run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub index: usize,
    pub post_id: String,
    pub status: ItemStatus,
    pub remote_id: Option<String>,
    pub error: Option<String>,
    pub progress: Progress,
}

struct MigrationRun {
    run_id: Uuid,
    destination_id: String,
    posts: Vec<Post>,
    log: MigrationLog,
    next: usize,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

pub struct Orchestrator {
    identity: Arc<dyn IdentityProvider>,
    source: Arc<dyn ContentSource>,
    sink: Arc<dyn ContentSink>,
    relevance: RelevanceFilter,
    fetch_limit: usize,
    step: WizardStep,
    bindings: AccountBindings,
    topic: Option<String>,
    date_range: DateRange,
    candidates: Vec<Post>,
    matches: MatchSet,
    selection: SelectionSet,
    drafts: Vec<Post>,
    run: Option<MigrationRun>,
    progress: watch::Sender<Progress>,
}

impl Orchestrator {
    /// Create an orchestrator in [`WizardStep::AwaitingAccounts`].
    ///
    /// `fetch_limit` is the number of posts requested per candidate fetch.
    #[must_use]
    pub fn new(collaborators: Collaborators, fetch_limit: usize) -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            identity: collaborators.identity,
            source: collaborators.source,
            sink: collaborators.sink,
            relevance: RelevanceFilter::new(collaborators.classifier),
            fetch_limit,
            step: WizardStep::AwaitingAccounts,
            bindings: AccountBindings::new(),
            topic: None,
            date_range: DateRange::unbounded(),
            candidates: Vec::new(),
            matches: MatchSet::empty(),
            selection: SelectionSet::new(),
            drafts: Vec::new(),
            run: None,
            progress,
        }
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn binding(&self, role: Role) -> Option<&AccountBinding> {
        self.bindings.get(role)
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    /// Bind `role` to an already-resolved profile.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] once a migration has started.
    pub fn bind(
        &mut self,
        role: Role,
        kind: AccountKind,
        profile: Profile,
        credential: Credential,
    ) -> Result<(), MigrateError> {
        self.ensure_bindings_mutable(bind_action(role))?;
        self.bindings.bind(role, kind, profile, credential)?;
        self.after_binding_change(role)?;
        Ok(())
    }

    /// Remove the binding for `role`, returning the profile that was bound.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] once a migration has started.
    pub fn unbind(&mut self, role: Role) -> Result<Option<Profile>, MigrateError> {
        self.ensure_bindings_mutable(unbind_action(role))?;
        let removed = self.bindings.unbind(role)?;
        if removed.is_some() {
            self.after_binding_change(role)?;
        }
        Ok(removed)
    }

    /// Resolve `credential` to a profile and bind it to `role`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Auth`] if the credential is empty or rejected;
    /// the role is left unbound. Returns [`MigrateError::InvalidState`] once a
    /// migration has started, without calling the identity provider.
    pub async fn connect(
        &mut self,
        role: Role,
        credential: Credential,
    ) -> Result<Profile, MigrateError> {
        self.ensure_bindings_mutable(bind_action(role))?;

        let resolved = if credential.is_empty() {
            Err(AuthError::new(EMPTY_CREDENTIAL))
        } else {
            self.identity.resolve_profile(&credential).await
        };
        match resolved {
            Ok(profile) => {
                self.bind(role, AccountKind::Profile, profile.clone(), credential)?;
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!(%role, error = %e, "identity resolution failed");
                self.unbind(role)?;
                Err(e.into())
            }
        }
    }

    /// Pages and accounts `credential` may publish to.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Auth`] if the credential is rejected.
    pub async fn list_targets(
        &self,
        credential: &Credential,
    ) -> Result<Vec<PostableTarget>, MigrateError> {
        Ok(self.identity.list_postable_targets(credential).await?)
    }

    /// Bind `role` to the postable target `target_id`, using the target's
    /// own post credential.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::UnknownTarget`] if `user_credential` cannot
    /// post to `target_id`, [`MigrateError::Auth`] if it is empty or rejected
    /// (the role is left unbound), and [`MigrateError::InvalidState`] once a
    /// migration has started.
    pub async fn connect_target(
        &mut self,
        role: Role,
        user_credential: &Credential,
        target_id: &str,
    ) -> Result<Profile, MigrateError> {
        self.ensure_bindings_mutable(bind_action(role))?;

        let listed = if user_credential.is_empty() {
            Err(AuthError::new(EMPTY_CREDENTIAL).into())
        } else {
            self.list_targets(user_credential).await
        };
        let targets = match listed {
            Ok(targets) => targets,
            Err(MigrateError::Auth(e)) => {
                tracing::warn!(%role, error = %e, "listing postable targets failed");
                self.unbind(role)?;
                return Err(e.into());
            }
            Err(e) => return Err(e),
        };

        let target = targets
            .into_iter()
            .find(|t| t.profile.id == target_id)
            .ok_or_else(|| MigrateError::UnknownTarget(target_id.to_string()))?;

        let profile = target.profile.clone();
        self.bind(role, AccountKind::Page, target.profile, target.post_credential)?;
        Ok(profile)
    }

    fn ensure_bindings_mutable(&self, action: &'static str) -> Result<(), InvalidStateError> {
        if self.step.allows_binding_changes() {
            Ok(())
        } else {
            Err(InvalidStateError {
                action,
                step: self.step,
            })
        }
    }

    /// Recompute the step after a binding changed.
    ///
    /// A new source invalidates everything fetched from the old one.
    fn after_binding_change(&mut self, role: Role) -> Result<(), InvalidStateError> {
        let target = if !self.bindings.both_bound() {
            WizardStep::AwaitingAccounts
        } else if role == Role::Source || self.step == WizardStep::AwaitingAccounts {
            WizardStep::AwaitingTopic
        } else {
            self.step
        };

        if role == Role::Source || target == WizardStep::AwaitingAccounts {
            self.discard_review();
        }
        if target != self.step {
            self.step = self
                .step
                .transition_to(target, "change account bindings")?;
            tracing::info!(step = %self.step, "wizard step changed");
        }
        Ok(())
    }

    fn discard_review(&mut self) {
        self.topic = None;
        self.date_range = DateRange::unbounded();
        self.candidates.clear();
        self.matches = MatchSet::empty();
        self.selection.clear();
        self.drafts.clear();
    }

    // -----------------------------------------------------------------------
    // Topic and review
    // -----------------------------------------------------------------------

    /// Fetch candidates from the source account, apply `date_range`, and
    /// classify them against `topic`. The initial selection is every match.
    ///
    /// Classifier failures do not fail this call; they show up as
    /// [`MatchOutcome::Degraded`].
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::EmptyTopic`] for a blank topic and
    /// [`MigrateError::SourceFetch`] if the fetch fails. The step is
    /// unchanged in both cases.
    pub async fn classify(
        &mut self,
        topic: &str,
        date_range: DateRange,
    ) -> Result<ReviewSummary, MigrateError> {
        const ACTION: &str = "classify posts";
        self.require(WizardStep::AwaitingTopic, ACTION)?;

        let topic = topic.trim();
        if topic.is_empty() {
            return Err(MigrateError::EmptyTopic);
        }
        let source = self
            .bindings
            .get(Role::Source)
            .ok_or(InvalidStateError {
                action: ACTION,
                step: self.step,
            })?;

        let candidates =
            fetch_candidates(self.source.as_ref(), source, &date_range, self.fetch_limit).await?;
        let matches = self.relevance.classify(&candidates, topic).await;

        self.step = self
            .step
            .transition_to(WizardStep::ReviewingCandidates, ACTION)?;
        self.selection = matches.ids().collect();
        self.topic = Some(topic.to_string());
        self.date_range = date_range;
        self.candidates = candidates;
        self.matches = matches;

        let summary = self.review_summary_inner(topic);
        tracing::info!(
            topic,
            candidates = summary.candidates,
            matched = summary.matched,
            degraded = self.matches.is_degraded(),
            "candidates ready for review"
        );
        Ok(summary)
    }

    /// Summary of the last classify call, while it is still current.
    #[must_use]
    pub fn review_summary(&self) -> Option<ReviewSummary> {
        self.topic.as_deref().map(|t| self.review_summary_inner(t))
    }

    fn review_summary_inner(&self, topic: &str) -> ReviewSummary {
        ReviewSummary {
            topic: topic.to_string(),
            candidates: self.candidates.len(),
            matched: self.matches.len(),
            outcome: self.matches.outcome().clone(),
        }
    }

    /// Posts that passed the date filter, in source order.
    #[must_use]
    pub fn candidates(&self) -> &[Post] {
        &self.candidates
    }

    #[must_use]
    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// Matched posts in source order.
    #[must_use]
    pub fn matched_posts(&self) -> Vec<&Post> {
        self.candidates
            .iter()
            .filter(|p| self.matches.contains(&p.id))
            .collect()
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[must_use]
    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    /// Flip selection of one candidate. Returns whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::UnknownPost`] for an id that is not a
    /// candidate, or [`MigrateError::InvalidState`] outside review.
    pub fn toggle(&mut self, post_id: &str) -> Result<bool, MigrateError> {
        self.require(WizardStep::ReviewingCandidates, "change the selection")?;
        if !self.candidates.iter().any(|p| p.id == post_id) {
            return Err(MigrateError::UnknownPost(post_id.to_string()));
        }
        Ok(self.selection.toggle(post_id))
    }

    /// Select every candidate.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] outside review.
    pub fn select_all(&mut self) -> Result<(), MigrateError> {
        self.require(WizardStep::ReviewingCandidates, "change the selection")?;
        self.selection
            .select_all(self.candidates.iter().map(|p| p.id.as_str()));
        Ok(())
    }

    /// Deselect everything.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] outside review.
    pub fn clear_selection(&mut self) -> Result<(), MigrateError> {
        self.require(WizardStep::ReviewingCandidates, "change the selection")?;
        self.selection.clear();
        Ok(())
    }

    /// Clear the selection if every candidate is selected, otherwise select
    /// every candidate.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] outside review.
    pub fn toggle_all(&mut self) -> Result<(), MigrateError> {
        self.require(WizardStep::ReviewingCandidates, "change the selection")?;
        self.selection
            .toggle_all(self.candidates.iter().map(|p| p.id.as_str()));
        Ok(())
    }

    /// Freeze the selection into editable drafts, in candidate order.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] outside review or when nothing
    /// is selected.
    pub fn confirm_selection(&mut self) -> Result<&[Post], MigrateError> {
        const ACTION: &str = "confirm the selection";
        self.require(WizardStep::ReviewingCandidates, ACTION)?;
        if self.selection.is_empty() {
            return Err(InvalidStateError {
                action: "confirm an empty selection",
                step: self.step,
            }
            .into());
        }

        self.step = self
            .step
            .transition_to(WizardStep::EditingSelection, ACTION)?;
        self.drafts = self.selection.resolve(&self.candidates);
        tracing::info!(selected = self.drafts.len(), "selection confirmed");
        Ok(self.drafts.as_slice())
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Posts that will be migrated, with edits applied.
    #[must_use]
    pub fn drafts(&self) -> &[Post] {
        &self.drafts
    }

    /// Replace the text of one draft.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::UnknownPost`] if `post_id` is not a draft, or
    /// [`MigrateError::InvalidState`] outside editing.
    pub fn edit_content(
        &mut self,
        post_id: &str,
        content: impl Into<String>,
    ) -> Result<(), MigrateError> {
        self.require(WizardStep::EditingSelection, "edit a post")?;
        let draft = self
            .drafts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| MigrateError::UnknownPost(post_id.to_string()))?;
        draft.content = content.into();
        Ok(())
    }

    /// Step back from review to the topic, or from editing to review.
    ///
    /// Going back from review discards the candidates. Going back from
    /// editing discards the drafts and keeps the selection.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] from any other step.
    pub fn back(&mut self) -> Result<WizardStep, MigrateError> {
        const ACTION: &str = "go back";
        match self.step {
            WizardStep::ReviewingCandidates => {
                self.step = self.step.transition_to(WizardStep::AwaitingTopic, ACTION)?;
                self.discard_review();
            }
            WizardStep::EditingSelection => {
                self.step = self
                    .step
                    .transition_to(WizardStep::ReviewingCandidates, ACTION)?;
                self.drafts.clear();
            }
            step => return Err(InvalidStateError { action: ACTION, step }.into()),
        }
        Ok(self.step)
    }

    // -----------------------------------------------------------------------
    // Migration
    // -----------------------------------------------------------------------

    /// Snapshot the drafts, lock the bindings, and enter
    /// [`WizardStep::Migrating`] with every log entry pending.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] outside editing.
    pub fn start_migration(&mut self) -> Result<Uuid, MigrateError> {
        const ACTION: &str = "start the migration";
        let next_step = self.step.transition_to(WizardStep::Migrating, ACTION)?;
        let destination = self
            .bindings
            .get(Role::Destination)
            .ok_or(InvalidStateError {
                action: ACTION,
                step: self.step,
            })?;
        if self.drafts.is_empty() {
            return Err(InvalidStateError {
                action: "start an empty migration",
                step: self.step,
            }
            .into());
        }

        let posts = std::mem::take(&mut self.drafts);
        let run = MigrationRun {
            run_id: Uuid::new_v4(),
            destination_id: destination.profile.id.clone(),
            log: MigrationLog::pending_for(&posts),
            posts,
            next: 0,
            started_at: Utc::now(),
            finished_at: None,
        };

        self.bindings.lock(next_step);
        self.step = next_step;
        self.progress.send_replace(run.log.progress());
        tracing::info!(
            run_id = %run.run_id,
            destination = %run.destination_id,
            total = run.posts.len(),
            "migration started"
        );

        let run_id = run.run_id;
        self.run = Some(run);
        Ok(run_id)
    }

    /// Publish the next pending item and record its outcome.
    ///
    /// A sink failure is recorded on the item and does not fail the call.
    /// After the last item the wizard moves to [`WizardStep::Completed`].
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] unless migrating.
    pub async fn publish_next(&mut self) -> Result<ItemOutcome, MigrateError> {
        const ACTION: &str = "publish the next post";
        self.require(WizardStep::Migrating, ACTION)?;

        let step = self.step;
        let not_ready = || InvalidStateError {
            action: ACTION,
            step,
        };
        let destination = self.bindings.get(Role::Destination).ok_or_else(not_ready)?;
        let run = self.run.as_mut().ok_or_else(not_ready)?;
        let index = run.next;
        let post = run.posts.get(index).ok_or_else(not_ready)?;

        run.log.mark_migrating(index);
        tracing::debug!(run_id = %run.run_id, post_id = %post.id, index, "publishing post");

        let result = self
            .sink
            .publish(
                &destination.profile.id,
                &destination.credential,
                &post.content,
                post.image_url.as_deref(),
            )
            .await;

        let (remote_id, error) = match result {
            Ok(remote_id) => {
                run.log.mark_success(index);
                tracing::info!(
                    run_id = %run.run_id,
                    post_id = %post.id,
                    remote_id = %remote_id,
                    "post migrated"
                );
                (Some(remote_id), None)
            }
            Err(e) => {
                run.log.mark_error(index, e.message.clone());
                tracing::warn!(
                    run_id = %run.run_id,
                    post_id = %post.id,
                    error = %e,
                    "post failed to migrate"
                );
                (None, Some(e.message))
            }
        };

        let post_id = post.id.clone();
        run.next += 1;
        let progress = run.log.progress();
        let status = run
            .log
            .get(index)
            .map_or(ItemStatus::Error, |entry| entry.status());
        let finished = run.next >= run.posts.len();
        if finished {
            run.finished_at = Some(Utc::now());
            tracing::info!(
                run_id = %run.run_id,
                succeeded = run.log.count(ItemStatus::Success),
                failed = run.log.count(ItemStatus::Error),
                "migration finished"
            );
        }

        self.progress.send_replace(progress);
        if finished {
            self.step = self
                .step
                .transition_to(WizardStep::Completed, "finish the migration")?;
            self.bindings.unlock();
        }

        Ok(ItemOutcome {
            index,
            post_id,
            status,
            remote_id,
            error,
            progress,
        })
    }

    /// Start the migration and publish every item.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] outside editing. Item failures
    /// are in the report, not here.
    pub async fn run_migration(&mut self) -> Result<MigrationReport, MigrateError> {
        self.start_migration()?;
        while self.step == WizardStep::Migrating {
            self.publish_next().await?;
        }
        self.report().ok_or_else(|| {
            MigrateError::from(InvalidStateError {
                action: "report the migration",
                step: self.step,
            })
        })
    }

    /// Log of the current or last run.
    #[must_use]
    pub fn migration_log(&self) -> Option<&MigrationLog> {
        self.run.as_ref().map(|run| &run.log)
    }

    /// The frozen posts of the current or last run.
    #[must_use]
    pub fn migration_posts(&self) -> Option<&[Post]> {
        self.run.as_ref().map(|run| run.posts.as_slice())
    }

    /// Report for a finished run.
    #[must_use]
    pub fn report(&self) -> Option<MigrationReport> {
        let run = self.run.as_ref()?;
        let finished_at = run.finished_at?;
        Some(MigrationReport {
            run_id: run.run_id,
            destination_id: run.destination_id.clone(),
            started_at: run.started_at,
            finished_at,
            total: run.log.len(),
            succeeded: run.log.count(ItemStatus::Success),
            failed: run.log.count(ItemStatus::Error),
            entries: run.log.entries().to_vec(),
        })
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        *self.progress.borrow()
    }

    /// Receiver that sees progress after every item.
    #[must_use]
    pub fn subscribe_progress(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// Leave [`WizardStep::Completed`], dropping both bindings and all run
    /// state.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] unless completed.
    pub fn reset(&mut self) -> Result<(), MigrateError> {
        const ACTION: &str = "reset the wizard";
        self.require(WizardStep::Completed, ACTION)?;

        self.bindings.unlock();
        self.bindings.clear()?;
        self.discard_review();
        self.run = None;
        self.progress.send_replace(Progress::default());
        self.step = self.step.transition_to(WizardStep::AwaitingAccounts, ACTION)?;
        tracing::info!("wizard reset");
        Ok(())
    }

    fn require(&self, step: WizardStep, action: &'static str) -> Result<(), InvalidStateError> {
        if self.step == step {
            Ok(())
        } else {
            Err(InvalidStateError {
                action,
                step: self.step,
            })
        }
    }
}
