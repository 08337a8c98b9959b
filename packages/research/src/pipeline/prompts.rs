//! Prompts sent to the answer service.
//!
//! Each builder returns the user message; the schema for the expected answer
//! travels separately with the request.

/// System message for influencer lookups.
pub const CONCISE_SYSTEM: &str = "Be precise and concise.";

/// System message for claim and paper searches.
pub const RESEARCH_SYSTEM: &str = "Be precise and concise. Search references thoroughly";

const RAW_JSON_ONLY: &str =
    "Do not include any other text in the response. Return a valid raw JSON response.";

/// Top influencers in the health domain, skipping names already tracked.
pub fn discover_influencers_prompt(count: usize, exclude: &[String]) -> String {
    let mut prompt = String::from(
        "Find top influencers in the health industry. \
         Top influencers are those with the most followers. \
         Please output a JSON list of objects with the following keys: \
         name, bio (detailed), category, followers (int), profile_picture (link). ",
    );

    if !exclude.is_empty() {
        prompt.push_str(&format!(
            "Do not include the following influencers: {}. ",
            exclude.join(", ")
        ));
    }

    prompt.push_str(RAW_JSON_ONLY);
    prompt.push_str(&format!(" Return a maximum of {} influencers.", count));
    prompt
}

/// Profile details for one named influencer.
pub fn lookup_influencer_prompt(name: &str) -> String {
    format!(
        "Find information about the influencer {}. \
         Please output a JSON object with the following keys: \
         name, bio (detailed), category, followers (int), profile_picture (link). {}",
        name, RAW_JSON_ONLY
    )
}

/// Health claims made by one influencer.
pub fn discover_claims_prompt(
    influencer: &str,
    count: usize,
    journals: &[String],
    note: Option<&str>,
    timeframe: &str,
) -> String {
    let mut prompt = format!(
        "Find {} health claims for the influencer {}. \
         Please output a JSON list of objects with the following keys: \
         claim, category, source (link where the claim was made), date (yyyy-mm-dd). \
         Claims will be checked against the following trusted scientific journals: {}. ",
        timeframe,
        influencer,
        journals.join(", ")
    );

    if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
        prompt.push_str(&format!("Notes for research assistant: {} ", note));
    }

    prompt.push_str(RAW_JSON_ONLY);
    prompt.push_str(&format!(" Return exactly {} health claims.", count));
    prompt
}

/// Papers supporting or contradicting one claim.
pub fn research_papers_prompt(claim: &str, journals: &[String]) -> String {
    format!(
        "Find research papers that validate or invalidate the claim: '{}'. \
         Please output a JSON list of objects with the following keys: \
         title, link, journal, date (yyyy-mm-dd), \
         is_evidence (true if evidence, false if counter-evidence). \
         Research papers should come from the following trusted scientific journals: {}. {}",
        claim,
        journals.join(", "),
        RAW_JSON_ONLY
    )
}
