//! Batched generation of title variations with a schema-constrained response.

use serde::Deserialize;
use serde_json::{json, Value};

use title_core::VariationMode;

use crate::error::{LlmError, Result};
use crate::gateway::ModelGateway;
use crate::protocol::GenerateRequest;

/// Upper bound callers should keep batches under for prompt size and latency.
/// Splitting into batches is the orchestrator's responsibility, not enforced
/// here.
pub const BATCH_LIMIT: usize = 10;

/// Every variation is produced in the product's fixed locale, whatever the
/// mode asks for.
const LANGUAGE_RULE: &str = "IMPORTANT: EVERY VARIATION MUST BE WRITTEN IN BRAZILIAN PORTUGUESE \
                             (PT-BR), WITH NO EXCEPTIONS.";

/// One input title resolved by the backend.
///
/// `id` echoes the numeric identifier the prompt assigned to the source
/// title; the backend may omit or mangle it, so callers fall back to matching
/// on `original_title`. `variations` should hold exactly three entries but
/// shorter lists do arrive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(default)]
    pub id: Option<usize>,
    pub original_title: String,
    #[serde(default)]
    pub variations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VariationsPayload {
    #[serde(default)]
    results: Option<Vec<BatchResult>>,
}

/// Generate three variations for each title in one gateway call.
///
/// Returns an empty list when the backend answers with a well-formed payload
/// that carries no `results` array; callers must treat that as "no titles
/// resolved". Unparseable payloads fail with [`LlmError::Parse`].
pub async fn generate_variations(
    gateway: &ModelGateway,
    titles: &[String],
    mode: VariationMode,
    context_niche: Option<&str>,
    target_niche: Option<&str>,
) -> Result<Vec<BatchResult>> {
    let prompt = batch_prompt(titles, mode, context_niche, target_niche);
    let request = GenerateRequest::with_json_schema(prompt, results_schema());

    let response = gateway.generate("batch variation generation", &request).await?;
    let text = response.text();

    let payload: VariationsPayload = serde_json::from_str(&text)
        .map_err(|err| LlmError::Parse(format!("invalid variations payload ({}): {}", err, text)))?;

    Ok(payload.results.unwrap_or_default())
}

fn mode_instruction(
    mode: VariationMode,
    context_niche: Option<&str>,
    target_niche: Option<&str>,
) -> String {
    match mode {
        VariationMode::Synonyms => format!(
            "Keep the original strategic structure and EXACTLY THE SAME ELEMENTS/CONCEPTS. \
             Do NOT change the subject or the sub-niche. Only change the words used to refer \
             to them (synonyms, related terms, or a creative rewrite of the same idea). The \
             goal is to say the same thing in a different way while keeping the same \
             emotional impact. {}",
            LANGUAGE_RULE
        ),
        VariationMode::SameNiche => {
            let niche_clause = match context_niche {
                Some(niche) => format!(
                    "The main niche is \"{}\". These words (or their central concept) MUST \
                     appear in every variation.",
                    niche
                ),
                None => "Keep a strict focus on the same niche as the original title.".to_string(),
            };
            format!(
                "Keep the original strategic structure. {} Keep the central theme, but swap \
                 the complementary elements for other CONTEXTS, SCENARIOS, EVERYDAY \
                 SITUATIONS or specific problems within this same niche. The goal is to \
                 explore different angles for the same audience. {}",
                niche_clause, LANGUAGE_RULE
            )
        }
        VariationMode::DifferentNiches => match target_niche {
            Some(target) if !target.trim().is_empty() => format!(
                "Keep the original strategic structure (mental triggers and format), but \
                 swap the subject elements to adapt the title specifically to the \"{}\" \
                 niche. Use the terms, pains and desires common to that audience. {}",
                target.trim(),
                LANGUAGE_RULE
            ),
            _ => format!(
                "Keep the original strategic structure (mental triggers and format), but \
                 swap the specific subject for COMPLETELY DIFFERENT and varied niches and \
                 sub-niches (e.g. if it is about cooking, produce finance, fitness, \
                 business, and so on). {}",
                LANGUAGE_RULE
            ),
        },
    }
}

fn batch_prompt(
    titles: &[String],
    mode: VariationMode,
    context_niche: Option<&str>,
    target_niche: Option<&str>,
) -> String {
    let listing: Vec<String> = titles
        .iter()
        .enumerate()
        .map(|(id, title)| format!("ID {}: {}", id, title))
        .collect();

    format!(
        "Act as an expert in copywriting and viral marketing.\n\
         \n\
         You will receive a list of original titles. For EACH title in the list:\n\
         1. Analyze its syntactic structure and mental triggers.\n\
         2. Generate exactly 3 new variations, strictly following the MODE INSTRUCTIONS.\n\
         \n\
         MODE INSTRUCTIONS ({mode}):\n\
         {instruction}\n\
         \n\
         TITLE LIST:\n\
         {listing}\n\
         \n\
         OUTPUT:\n\
         Return a JSON object containing a \"results\" array. Each item must echo the \
         numeric \"id\" and the \"originalTitle\" exactly as listed, plus its \"variations\".",
        mode = mode.as_str(),
        instruction = mode_instruction(mode, context_niche, target_niche),
        listing = listing.join("\n")
    )
}

fn results_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "results": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {
                            "type": "INTEGER",
                            "description": "The numeric id of the source title, exactly as listed."
                        },
                        "originalTitle": {
                            "type": "STRING",
                            "description": "The source title, exactly as received in the list."
                        },
                        "variations": {
                            "type": "ARRAY",
                            "description": "Exactly 3 generated variations.",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["id", "originalTitle", "variations"]
                }
            }
        },
        "required": ["results"]
    })
}
