//! Composite-answer assembly

use crate::analysis::lexicon::{CODE_CONTEXT_WORDS, COMPARISON_KEYWORDS};
use crate::analysis::textops::{
    PARAGRAPH_SIMILARITY_THRESHOLD, STATEMENT_MATCH_THRESHOLD, first_code_block,
    jaccard_similarity, split_paragraphs, split_sentences, statement_overlap, word_count,
};
use crate::blending::BlendStrategy;
use crate::core::candidate::CandidateResponse;
use crate::ranking::score::Ranking;
use serde::{Deserialize, Serialize};

/// Blending only ever draws from the first few ranking entries
const TOP_BLEND_TEXTS: usize = 3;
const MAX_SECTION_SENTENCES: usize = 3;
const MAX_EXTRA_PARAGRAPHS: usize = 2;
const MAX_NOVEL_SENTENCES: usize = 3;

/// A blended answer and the models whose text it draws from, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendedText {
    pub text: String,
    pub contributors: Vec<String>,
}

/// Assemble a composite answer from the top-ranked candidate texts.
///
/// Every strategy degrades to the rank-1 text verbatim when it cannot
/// assemble a composite, so the result is never empty while the ranking
/// holds at least one candidate with usable text.
pub fn blend(
    strategy: BlendStrategy,
    ranking: &Ranking,
    candidates: &[CandidateResponse],
) -> BlendedText {
    let texts = ranked_texts(ranking, candidates);
    let Some(lead) = texts.first().copied() else {
        return BlendedText {
            text: String::new(),
            contributors: Vec::new(),
        };
    };
    if texts.len() < 2 {
        return solo(lead);
    }

    let top = &texts[..texts.len().min(TOP_BLEND_TEXTS)];
    let composite = match strategy {
        BlendStrategy::Comparison => comparison_blend(top),
        BlendStrategy::Technical => technical_blend(top),
        BlendStrategy::Explanation => explanation_blend(top),
        BlendStrategy::General => general_blend(top),
    };
    composite.unwrap_or_else(|| solo(lead))
}

/// Pair each ranking entry with its candidate text, ranking order preserved
fn ranked_texts<'a>(
    ranking: &'a Ranking,
    candidates: &'a [CandidateResponse],
) -> Vec<(&'a str, &'a str)> {
    ranking
        .entries()
        .iter()
        .filter_map(|entry| {
            candidates
                .iter()
                .find(|c| c.model == entry.model)
                .and_then(|c| c.text())
                .map(|text| (entry.model.as_str(), text))
        })
        .collect()
}

fn solo((model, text): (&str, &str)) -> BlendedText {
    BlendedText {
        text: text.to_string(),
        contributors: vec![model.to_string()],
    }
}

/// Intro from the leader, one "According to <model>" section per model with
/// comparison-bearing sentences, conclusion from the leader's tail.
fn comparison_blend(top: &[(&str, &str)]) -> Option<BlendedText> {
    let (lead_model, lead_text) = top[0];
    let lead_sentences = split_sentences(lead_text);
    let intro: String = lead_sentences
        .iter()
        .take(2)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let mut collected: Vec<&str> = Vec::new();
    let mut sections: Vec<String> = Vec::new();
    let mut contributors = vec![lead_model.to_string()];
    for (model, text) in top {
        let mut picked: Vec<&str> = Vec::new();
        for sentence in split_sentences(text) {
            if picked.len() == MAX_SECTION_SENTENCES {
                break;
            }
            let lower = sentence.to_lowercase();
            if !COMPARISON_KEYWORDS.iter().any(|k| lower.contains(k)) {
                continue;
            }
            let already_said = collected
                .iter()
                .chain(picked.iter())
                .any(|c| statement_overlap(sentence, c) > STATEMENT_MATCH_THRESHOLD);
            if already_said {
                continue;
            }
            picked.push(sentence);
        }
        if picked.is_empty() {
            continue;
        }
        collected.extend(&picked);
        sections.push(format!("According to {model}: {}", picked.join(" ")));
        if !contributors.iter().any(|c| c == model) {
            contributors.push(model.to_string());
        }
    }
    if sections.is_empty() {
        return None;
    }

    let mut parts = vec![intro];
    parts.extend(sections);
    if lead_sentences.len() > 2 {
        // last two sentences, never overlapping the intro
        let skip = lead_sentences.len().saturating_sub(2).max(2);
        parts.push(lead_sentences[skip..].join(" "));
    }
    Some(BlendedText {
        text: parts.join("\n\n"),
        contributors,
    })
}

/// Keep the leader's prose and splice in the first fenced code block found
/// lower in the ranking when the leader has none.
fn technical_blend(top: &[(&str, &str)]) -> Option<BlendedText> {
    let (lead_model, lead_text) = top[0];
    if lead_text.contains("```") {
        return None;
    }
    let (donor_model, block) = top[1..]
        .iter()
        .find_map(|(model, text)| first_code_block(text).map(|block| (*model, block)))?;

    let splice = format!("The following implementation comes from {donor_model}:\n\n{block}");
    let mut paragraphs: Vec<String> = split_paragraphs(lead_text)
        .into_iter()
        .map(str::to_string)
        .collect();
    let anchor = paragraphs.iter().position(|p| {
        let lower = p.to_lowercase();
        CODE_CONTEXT_WORDS.iter().any(|w| lower.contains(w))
    });
    match anchor {
        Some(i) => paragraphs.insert(i + 1, splice),
        None => paragraphs.push(splice),
    }
    Some(BlendedText {
        text: paragraphs.join("\n\n"),
        contributors: vec![lead_model.to_string(), donor_model.to_string()],
    })
}

/// Leader's text plus an "Additional Insights" section of paragraphs the
/// leader does not already cover.
fn explanation_blend(top: &[(&str, &str)]) -> Option<BlendedText> {
    let (lead_model, lead_text) = top[0];
    let lead_paragraphs = split_paragraphs(lead_text);

    let mut extras: Vec<&str> = Vec::new();
    let mut contributors = vec![lead_model.to_string()];
    for (model, text) in &top[1..] {
        if extras.len() == MAX_EXTRA_PARAGRAPHS {
            break;
        }
        for paragraph in split_paragraphs(text) {
            if extras.len() == MAX_EXTRA_PARAGRAPHS {
                break;
            }
            let covered = lead_paragraphs
                .iter()
                .chain(extras.iter())
                .any(|known| jaccard_similarity(paragraph, known) > PARAGRAPH_SIMILARITY_THRESHOLD);
            if covered {
                continue;
            }
            extras.push(paragraph);
            if !contributors.iter().any(|c| c == model) {
                contributors.push(model.to_string());
            }
        }
    }
    if extras.is_empty() {
        return None;
    }
    Some(BlendedText {
        text: format!(
            "{lead_text}\n\n## Additional Insights\n\n{}",
            extras.join("\n\n")
        ),
        contributors,
    })
}

/// Leader's text plus up to three runner-up sentences it does not state
fn general_blend(top: &[(&str, &str)]) -> Option<BlendedText> {
    let (lead_model, lead_text) = top[0];
    let (second_model, second_text) = top[1];

    let mut novel: Vec<&str> = Vec::new();
    for sentence in split_sentences(second_text) {
        if novel.len() == MAX_NOVEL_SENTENCES {
            break;
        }
        if word_count(sentence) < 3 {
            continue;
        }
        if statement_overlap(sentence, lead_text) > STATEMENT_MATCH_THRESHOLD {
            continue;
        }
        let repeats_picked = novel
            .iter()
            .any(|n| statement_overlap(sentence, n) > STATEMENT_MATCH_THRESHOLD);
        if repeats_picked {
            continue;
        }
        novel.push(sentence);
    }
    if novel.is_empty() {
        return None;
    }
    Some(BlendedText {
        text: format!("{lead_text}\n\nAdditional information: {}", novel.join(" ")),
        contributors: vec![lead_model.to_string(), second_model.to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::table::CapabilityTable;
    use crate::core::query::Query;
    use crate::ranking::ranker::ResponseRanker;
    use std::sync::Arc;

    fn rank(query: &Query, candidates: &[CandidateResponse]) -> Ranking {
        ResponseRanker::new(Arc::new(CapabilityTable::with_defaults()))
            .rank(query, candidates)
            .ranking()
            .cloned()
            .expect("candidates should rank")
    }

    // ==================== comparison ====================

    #[test]
    fn test_comparison_blend_draws_from_multiple_models() {
        let query = Query::new("Compare rust and go for backend services");
        let candidates = vec![
            CandidateResponse::answered(
                "gpt-4o",
                "Rust and Go both target backend services. Rust is faster than Go at peak throughput. \
                 Go is simpler to learn whereas Rust demands ownership discipline. \
                 Overall the better choice depends on the team.",
            ),
            CandidateResponse::answered(
                "claude-3-opus",
                "Go compiles much faster compared to Rust in large builds. \
                 The difference between their runtimes shows up under load.",
            ),
            CandidateResponse::answered(
                "mistral-large",
                "Deployment tooling is a strength on the other hand for Go.",
            ),
        ];
        let ranking = rank(&query, &candidates);
        let blended = blend(BlendStrategy::Comparison, &ranking, &candidates);

        assert!(blended.contributors.len() >= 2);
        assert!(blended.text.contains("According to"));
        // intro comes from the rank-1 text
        let best = ranking.best().unwrap().model.clone();
        assert_eq!(blended.contributors[0], best);
    }

    #[test]
    fn test_comparison_blend_skips_restated_sentences() {
        let query = Query::new("Compare rust and go");
        let shared = "Rust is faster than Go at peak throughput.";
        let candidates = vec![
            CandidateResponse::answered("model-a", shared),
            CandidateResponse::answered("model-b", shared),
        ];
        let ranking = rank(&query, &candidates);
        let blended = blend(BlendStrategy::Comparison, &ranking, &candidates);
        // the duplicate sentence appears in one section only
        assert_eq!(blended.text.matches("According to").count(), 1);
    }

    #[test]
    fn test_comparison_blend_keeps_one_of_two_near_duplicate_sentences() {
        let query = Query::new("Compare rust and go");
        let candidates = vec![
            CandidateResponse::answered(
                "model-a",
                "Go and Rust are both strong backend choices. \
                 Go is simpler to operate whereas Rust gives tighter control.",
            ),
            CandidateResponse::answered(
                "model-b",
                "Rust wins on raw throughput compared to Go in server workloads. \
                 Rust wins on raw throughput compared to Go in typical workloads.",
            ),
        ];
        let ranking = rank(&query, &candidates);
        let blended = blend(BlendStrategy::Comparison, &ranking, &candidates);
        // a section never restates its own sentences
        let section = blended
            .text
            .split("\n\n")
            .find(|part| part.starts_with("According to model-b:"))
            .unwrap();
        assert_eq!(section.matches("wins on raw throughput").count(), 1);
    }

    #[test]
    fn test_comparison_blend_degrades_without_comparison_sentences() {
        let query = Query::new("Compare rust and go");
        let candidates = vec![
            CandidateResponse::answered("model-a", "Rust has a strong type system."),
            CandidateResponse::answered("model-b", "Go ships a garbage collector."),
        ];
        let ranking = rank(&query, &candidates);
        let blended = blend(BlendStrategy::Comparison, &ranking, &candidates);
        let best = ranking.best().unwrap().model.clone();
        assert_eq!(blended.text, "Rust has a strong type system.");
        assert_eq!(blended.contributors, vec![best]);
    }

    // ==================== technical ====================

    #[test]
    fn test_technical_blend_splices_code_after_anchor_paragraph() {
        let lead = "Binary search needs a sorted slice.\n\nThe implementation below halves the range each step.\n\nComplexity is logarithmic.";
        let donor = "Use this:\n\n```rust\nfn bsearch(xs: &[i32], x: i32) -> Option<usize> { xs.binary_search(&x).ok() }\n```";
        let candidates = vec![
            CandidateResponse::answered("gpt-4o", lead),
            CandidateResponse::answered("claude-3-opus", donor),
        ];
        let ranking = rank(&Query::new("Implement binary search in rust"), &candidates);
        let blended = blend(BlendStrategy::Technical, &ranking, &candidates);

        assert!(blended.text.contains("```rust"));
        let splice_at = blended.text.find("The following implementation").unwrap();
        let anchor_at = blended.text.find("implementation below").unwrap();
        let tail_at = blended.text.find("Complexity is logarithmic").unwrap();
        assert!(anchor_at < splice_at && splice_at < tail_at);
        assert_eq!(blended.contributors.len(), 2);
    }

    #[test]
    fn test_technical_blend_appends_code_without_anchor() {
        let candidates = vec![
            CandidateResponse::answered(
                "model-a",
                "Sort the slice first to implement binary search.\n\nThen bisect it.",
            ),
            CandidateResponse::answered("model-b", "```rust\nxs.sort();\n```"),
        ];
        let ranking = rank(&Query::new("Implement binary search in rust"), &candidates);
        let blended = blend(BlendStrategy::Technical, &ranking, &candidates);
        assert!(blended.text.ends_with("```"));
    }

    #[test]
    fn test_technical_blend_degrades_when_lead_has_code() {
        let lead = "Here is the code.\n\n```rust\nxs.binary_search(&x)\n```";
        let candidates = vec![
            CandidateResponse::answered("model-a", lead),
            CandidateResponse::answered("model-b", "```python\nbisect.bisect(xs, x)\n```"),
        ];
        let ranking = rank(&Query::new("Implement binary search in rust"), &candidates);
        let best = ranking.best().unwrap().model.clone();
        let blended = blend(BlendStrategy::Technical, &ranking, &candidates);
        let lead_text = candidates
            .iter()
            .find(|c| c.model == best)
            .and_then(|c| c.text())
            .unwrap();
        assert_eq!(blended.text, lead_text);
        assert_eq!(blended.contributors, vec![best]);
    }

    // ==================== explanation ====================

    #[test]
    fn test_explanation_blend_appends_novel_paragraphs() {
        let candidates = vec![
            CandidateResponse::answered(
                "model-a",
                "Rain forms when water vapor condenses around dust particles in cooling air.",
            ),
            CandidateResponse::answered(
                "model-b",
                "Rain forms when water vapor condenses around dust particles in cooling air.\n\nOrographic lift over mountains also wrings moisture out of passing weather systems.",
            ),
        ];
        let ranking = rank(&Query::new("Explain how rain forms"), &candidates);
        let blended = blend(BlendStrategy::Explanation, &ranking, &candidates);

        assert!(blended.text.contains("## Additional Insights"));
        assert!(blended.text.contains("Orographic lift"));
        assert_eq!(blended.contributors.len(), 2);
    }

    #[test]
    fn test_explanation_blend_degrades_on_near_identical_texts() {
        let text = "Rain forms when water vapor condenses around dust particles in cooling air.";
        let near = "Rain forms when water vapor condenses around tiny dust particles in cooling air.";
        let candidates = vec![
            CandidateResponse::answered("model-a", text),
            CandidateResponse::answered("model-b", near),
        ];
        let ranking = rank(&Query::new("Explain how rain forms"), &candidates);
        let blended = blend(BlendStrategy::Explanation, &ranking, &candidates);

        let best = ranking.best().unwrap().model.clone();
        let best_text = candidates
            .iter()
            .find(|c| c.model == best)
            .and_then(|c| c.text())
            .unwrap();
        assert_eq!(blended.text, best_text);
        assert!(!blended.text.contains("Additional Insights"));
        assert_eq!(blended.contributors, vec![best]);
    }

    #[test]
    fn test_explanation_blend_caps_extra_paragraphs() {
        let lead = "Photosynthesis turns light into chemical energy.";
        let verbose = "Chlorophyll absorbs mostly red and blue light.\n\nStomata regulate gas exchange on the leaf underside.\n\nThe Calvin cycle fixes carbon in the stroma.";
        let candidates = vec![
            CandidateResponse::answered("model-a", lead),
            CandidateResponse::answered("model-b", verbose),
        ];
        let ranking = rank(&Query::new("Explain photosynthesis"), &candidates);
        let blended = blend(BlendStrategy::Explanation, &ranking, &candidates);
        let insights = blended.text.split("## Additional Insights").nth(1).unwrap();
        assert_eq!(split_paragraphs(insights).len(), MAX_EXTRA_PARAGRAPHS);
    }

    // ==================== general ====================

    #[test]
    fn test_general_blend_appends_novel_runner_up_sentences() {
        let candidates = vec![
            CandidateResponse::answered("model-a", "The Louvre is the most visited museum."),
            CandidateResponse::answered(
                "model-b",
                "The Louvre is the most visited museum. Its glass pyramid entrance opened in 1989.",
            ),
        ];
        let ranking = rank(&Query::new("Tell me about the Louvre"), &candidates);
        let blended = blend(BlendStrategy::General, &ranking, &candidates);

        assert!(blended.text.contains("Additional information:"));
        assert!(blended.text.contains("glass pyramid"));
        // the restated sentence is not duplicated
        assert_eq!(blended.text.matches("most visited museum").count(), 1);
    }

    #[test]
    fn test_general_blend_degrades_when_runner_up_adds_nothing() {
        let text = "The Louvre is the most visited museum in the world.";
        let candidates = vec![
            CandidateResponse::answered("model-a", text),
            CandidateResponse::answered("model-b", text),
        ];
        let ranking = rank(&Query::new("Tell me about the Louvre"), &candidates);
        let blended = blend(BlendStrategy::General, &ranking, &candidates);
        assert_eq!(blended.text, text);
        assert_eq!(blended.contributors.len(), 1);
    }

    // ==================== degradation ====================

    #[test]
    fn test_single_usable_text_comes_back_verbatim() {
        let candidates = vec![CandidateResponse::answered(
            "model-a",
            "Rust is faster than Go at peak throughput.",
        )];
        let ranking = rank(&Query::new("Compare rust and go"), &candidates);
        for strategy in [
            BlendStrategy::Comparison,
            BlendStrategy::Technical,
            BlendStrategy::Explanation,
            BlendStrategy::General,
        ] {
            let blended = blend(strategy, &ranking, &candidates);
            assert_eq!(blended.text, "Rust is faster than Go at peak throughput.");
            assert_eq!(blended.contributors, vec!["model-a".to_string()]);
        }
    }
}
