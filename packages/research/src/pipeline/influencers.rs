//! Influencer discovery and lookup.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use super::answer::{ask, InfluencerAnswer, InfluencersAnswer};
use super::prompts::{discover_influencers_prompt, lookup_influencer_prompt, CONCISE_SYSTEM};
use crate::error::Result;
use crate::traits::answer::AnswerService;
use crate::types::{config::AnswerSettings, influencer::InfluencerDescriptor};

/// Ask for the top health influencers, skipping `exclude`.
///
/// Names are compared trimmed and case-insensitively. Excluded names the
/// answer service returns anyway are filtered out, as are repeats within
/// one answer and blank names.
#[instrument(skip(service, settings, exclude), fields(exclude_count = exclude.len()))]
pub async fn discover_influencers<A>(
    service: &A,
    settings: &AnswerSettings,
    count: usize,
    exclude: &[String],
) -> Result<Vec<InfluencerDescriptor>>
where
    A: AnswerService + ?Sized,
{
    let answer: InfluencersAnswer = ask(
        service,
        settings,
        CONCISE_SYSTEM,
        discover_influencers_prompt(count, exclude),
    )
    .await?;

    let mut seen: HashSet<String> = exclude.iter().map(|n| name_key(n)).collect();
    let returned = answer.influencers.len();

    let influencers: Vec<InfluencerDescriptor> = answer
        .influencers
        .into_iter()
        .filter_map(|mut descriptor| {
            descriptor.name = descriptor.name.trim().to_string();
            if descriptor.name.is_empty() || !seen.insert(name_key(&descriptor.name)) {
                debug!(name = %descriptor.name, "Skipping excluded or repeated influencer");
                return None;
            }
            Some(descriptor)
        })
        .collect();

    info!(
        returned,
        kept = influencers.len(),
        "Influencers discovered"
    );

    Ok(influencers)
}

/// Ask for the profile of one named influencer.
#[instrument(skip(service, settings))]
pub async fn lookup_influencer<A>(
    service: &A,
    settings: &AnswerSettings,
    name: &str,
) -> Result<InfluencerDescriptor>
where
    A: AnswerService + ?Sized,
{
    let answer: InfluencerAnswer =
        ask(service, settings, CONCISE_SYSTEM, lookup_influencer_prompt(name)).await?;
    Ok(answer.influencer)
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
