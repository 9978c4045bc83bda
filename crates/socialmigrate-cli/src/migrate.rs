//! `demo` and `migrate` command handlers.
//!
//! Both drive the orchestrator non-interactively: every match is accepted
//! as-is and published in source order.

use std::sync::Arc;
use std::time::Duration;

use socialmigrate_core::{AppConfig, Credential, DateRange, RelevanceClassifier, Role};
use socialmigrate_graph::GraphClient;
use socialmigrate_pipeline::demo::{self, DemoSink};
use socialmigrate_pipeline::{
    Collaborators, ItemOutcome, ItemStatus, MatchOutcome, MigrationReport, Orchestrator,
    ReviewSummary, WizardStep,
};

use crate::PlanArgs;

/// Tokens and optional page ids for a real migration.
#[derive(Debug)]
pub(crate) struct AccountArgs {
    pub source_token: String,
    pub destination_token: String,
    pub source_page: Option<String>,
    pub destination_page: Option<String>,
}

/// Run the wizard against the built-in sample posts.
///
/// # Errors
///
/// Returns an error if the date bounds are invalid.
pub(crate) async fn run_demo(
    config: &AppConfig,
    classifier: Arc<dyn RelevanceClassifier>,
    plan: &PlanArgs,
    delay_ms: u64,
) -> anyhow::Result<()> {
    let mut collaborators = demo::collaborators(classifier);
    collaborators.sink = Arc::new(DemoSink::with_delay(Duration::from_millis(delay_ms)));

    let mut wiz = Orchestrator::new(collaborators, config.fetch_limit);
    bind(&mut wiz, Role::Source, demo::DEMO_SOURCE_TOKEN, None).await?;
    bind(&mut wiz, Role::Destination, demo::DEMO_DESTINATION_TOKEN, None).await?;
    drive(&mut wiz, plan).await
}

/// Run the wizard against the Graph API.
///
/// # Errors
///
/// Returns an error if a token is rejected, a page id is not postable, the
/// source feed cannot be read, or the date bounds are invalid. Individual
/// publish failures are reported, not returned.
pub(crate) async fn run_migrate(
    config: &AppConfig,
    graph: Arc<GraphClient>,
    classifier: Arc<dyn RelevanceClassifier>,
    accounts: &AccountArgs,
    plan: &PlanArgs,
) -> anyhow::Result<()> {
    let collaborators = Collaborators {
        identity: graph.clone(),
        source: graph.clone(),
        sink: graph,
        classifier,
    };

    let mut wiz = Orchestrator::new(collaborators, config.fetch_limit);
    bind(
        &mut wiz,
        Role::Source,
        &accounts.source_token,
        accounts.source_page.as_deref(),
    )
    .await?;
    bind(
        &mut wiz,
        Role::Destination,
        &accounts.destination_token,
        accounts.destination_page.as_deref(),
    )
    .await?;
    drive(&mut wiz, plan).await
}

async fn bind(
    wiz: &mut Orchestrator,
    role: Role,
    token: &str,
    page: Option<&str>,
) -> anyhow::Result<()> {
    let credential = Credential::new(token);
    let profile = match page {
        Some(page_id) => wiz.connect_target(role, &credential, page_id).await?,
        None => wiz.connect(role, credential).await?,
    };
    println!(
        "{:<13}{} ({})",
        format!("{role}:"),
        profile.display_name,
        profile.handle()
    );
    Ok(())
}

async fn drive(wiz: &mut Orchestrator, plan: &PlanArgs) -> anyhow::Result<()> {
    let range = DateRange::new(plan.start.as_deref(), plan.end.as_deref())?;
    let summary = wiz.classify(&plan.topic, range).await?;
    print_review(wiz, &summary);

    if plan.dry_run {
        println!("dry run: nothing published");
        return Ok(());
    }
    if wiz.selection().is_empty() {
        println!("nothing selected; nothing to migrate");
        return Ok(());
    }

    wiz.confirm_selection()?;
    wiz.start_migration()?;
    while wiz.step() == WizardStep::Migrating {
        let outcome = wiz.publish_next().await?;
        print_outcome(&outcome);
    }

    let report = wiz
        .report()
        .ok_or_else(|| anyhow::anyhow!("migration finished without a report"))?;
    if plan.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_review(wiz: &Orchestrator, summary: &ReviewSummary) {
    println!(
        "topic \"{}\": {} candidates, {} matched",
        summary.topic, summary.candidates, summary.matched
    );
    if let MatchOutcome::Degraded { reason } = &summary.outcome {
        println!("classifier unavailable ({reason}); no posts were matched");
    }
    if wiz.candidates().is_empty() {
        return;
    }

    println!();
    println!("{:<5}{:<24}{:<12}CONTENT", "SEL", "ID", "DATE");
    for post in wiz.candidates() {
        let marker = if wiz.selection().contains(&post.id) {
            "*"
        } else {
            ""
        };
        println!(
            "{marker:<5}{:<24}{:<12}{}",
            post.id,
            post.date,
            post.content_preview()
        );
    }
    println!();
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn print_outcome(outcome: &ItemOutcome) {
    let percent = outcome.progress.percent().round() as u32;
    match outcome.status {
        ItemStatus::Error => println!(
            "[{percent:>3}%] {:<24}error    {}",
            outcome.post_id,
            outcome.error.as_deref().unwrap_or("unknown error")
        ),
        status => println!(
            "[{percent:>3}%] {:<24}{:<9}{}",
            outcome.post_id,
            status,
            outcome.remote_id.as_deref().unwrap_or("")
        ),
    }
}

fn print_report(report: &MigrationReport) {
    println!();
    println!(
        "run {}: {}/{} migrated to {}, {} failed",
        report.run_id, report.succeeded, report.total, report.destination_id, report.failed
    );
}
