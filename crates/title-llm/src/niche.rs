//! Best-effort detection of the subject niche shared by a title list.
//!
//! Detection is an optimization: callers continue without a niche when it
//! fails, so errors from here must never abort a run.

use crate::error::Result;
use crate::gateway::ModelGateway;
use crate::protocol::GenerateRequest;

/// Only this many titles are sampled; bounds the detection prompt.
const SAMPLE_LIMIT: usize = 20;

/// Ask the gateway for a two-keyword label of the niche the titles share.
/// An empty string is a valid "no niche found" answer.
pub async fn detect_niche(gateway: &ModelGateway, titles: &[String]) -> Result<String> {
    let sample = &titles[..titles.len().min(SAMPLE_LIMIT)];
    let request = GenerateRequest::from_text(detection_prompt(sample));
    let response = gateway.generate("niche detection", &request).await?;
    Ok(response.text().trim().to_string())
}

fn detection_prompt(titles: &[String]) -> String {
    format!(
        "Analyze the list of titles below and identify the central niche (the main subject) \
         they have in common.\n\
         \n\
         Titles under analysis:\n\
         {titles}\n\
         \n\
         Your task is to extract exactly 2 keywords that name the main niche.\n\
         \n\
         EXCLUSION RULES (word classes you MUST ignore):\n\
         1. Articles, prepositions and connectives;\n\
         2. Generic action verbs (e.g. make, create, be, have, learn);\n\
         3. Content-format words (e.g. guide, tutorial, step, tips, course, class, definitive, complete, simple);\n\
         4. Generic adjectives (e.g. best, fast, incredible, easy).\n\
         \n\
         Focus only on the NOUNS that define the MARKET THEME \
         (e.g. \"Digital Marketing\", \"Weight Loss\", \"Stock Investing\", \"Dog Training\").\n\
         \n\
         Answer ONLY with the two words separated by a space. Nothing else.",
        titles = titles.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_every_sampled_title() {
        let titles = vec!["Train your dog fast".to_string(), "Puppy obedience secrets".to_string()];
        let prompt = detection_prompt(&titles);
        assert!(prompt.contains("Train your dog fast"));
        assert!(prompt.contains("Puppy obedience secrets"));
    }

    #[test]
    fn sample_limit_bounds_the_slice() {
        let titles: Vec<String> = (0..30).map(|i| format!("title {}", i)).collect();
        let sample = &titles[..titles.len().min(SAMPLE_LIMIT)];
        assert_eq!(sample.len(), 20);
        assert_eq!(sample.last().unwrap(), "title 19");
    }
}
