// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tokenize/stopword/frequency-filter text preprocessing for the Preprocess
//! stage. Deliberately simple (whitespace tokenization, no real lemmatizer)
//! — a production deployment would plug a proper NLP pipeline in here, but
//! tokenization/stopwording is plain string work, not a numeric
//! collaborator, so it's implemented directly rather than behind a trait.

use std::collections::HashMap;

use loom_core::TextPreprocessingConfig;

/// "Heavy" preprocessing used as modeling input: per-document token
/// filtering (email/url/number/stopword/length rules), then a corpus-wide
/// document-frequency filter.
pub fn heavy_preprocess_corpus(raw_docs: &[String], cfg: &TextPreprocessingConfig) -> Vec<String> {
    let ignore: std::collections::HashSet<&str> =
        cfg.ignore_tokens.iter().map(String::as_str).collect();
    let stop: std::collections::HashSet<&str> = cfg.stopwords.iter().map(String::as_str).collect();

    let per_doc_tokens: Vec<Vec<String>> = raw_docs
        .iter()
        .map(|doc| {
            tokenize(doc)
                .into_iter()
                .filter(|t| !ignore.contains(t.as_str()) && !stop.contains(t.as_str()))
                .filter(|t| !cfg.remove_email || !t.contains('@'))
                .filter(|t| !cfg.remove_url || !(t.starts_with("http://") || t.starts_with("https://")))
                .filter(|t| !cfg.remove_number || !t.chars().all(|c| c.is_ascii_digit()))
                .filter(|t| t.chars().count() as u32 >= cfg.min_word_length)
                .collect()
        })
        .collect();

    let doc_count = per_doc_tokens.len().max(1) as f64;
    let mut doc_frequency: HashMap<&str, u32> = HashMap::new();
    for tokens in &per_doc_tokens {
        let unique: std::collections::HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for word in unique {
            *doc_frequency.entry(word).or_insert(0) += 1;
        }
    }

    let mut allowed: Vec<(&str, u32)> = doc_frequency
        .iter()
        .filter(|&(_, &df)| df >= cfg.min_df && (df as f64 / doc_count) <= cfg.max_df)
        .map(|(&w, &df)| (w, df))
        .collect();
    allowed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    if let Some(max_unique) = cfg.max_unique_words {
        allowed.truncate(max_unique as usize);
    }
    let vocabulary: std::collections::HashSet<&str> = allowed.iter().map(|(w, _)| *w).collect();

    per_doc_tokens
        .into_iter()
        .map(|tokens| {
            let kept: Vec<String> = tokens
                .into_iter()
                .filter(|t| vocabulary.contains(t.as_str()))
                .collect();
            if kept.len() as u32 >= cfg.min_document_length {
                kept.join(" ")
            } else {
                String::new()
            }
        })
        .collect()
}

/// "Light" preprocessing used only as embedding input: lowercase and
/// collapse whitespace, no vocabulary filtering (the embedding transformer
/// sees more context than the modeling vocabulary affords).
pub fn light_preprocess(raw: &str) -> String {
    tokenize(raw).join(" ")
}

fn tokenize(text: &str) -> Vec<String> {
    let is_word_char = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | ':' | '/');
    text.to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !is_word_char(c)))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
