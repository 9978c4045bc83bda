use socialmigrate_core::{AccountBinding, ContentSource, DateRange, Post, SourceFetchError};

/// Fetch posts from the bound source account and keep those inside `range`.
///
/// Source order is preserved.
///
/// # Errors
///
/// Returns [`SourceFetchError`] if the source fails. Nothing is filtered in
/// that case.
pub async fn fetch_candidates(
    source: &dyn ContentSource,
    binding: &AccountBinding,
    range: &DateRange,
    limit: usize,
) -> Result<Vec<Post>, SourceFetchError> {
    let fetched = source
        .fetch_posts(&binding.credential, binding.account_ref(), limit)
        .await?;
    let fetched_count = fetched.len();
    let candidates = range.apply(fetched);

    tracing::info!(
        account = binding.account_ref(),
        fetched = fetched_count,
        in_range = candidates.len(),
        start = range.start().unwrap_or("-"),
        end = range.end().unwrap_or("-"),
        "fetched candidate posts"
    );
    Ok(candidates)
}
