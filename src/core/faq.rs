//! Keyword-overlap retrieval over the dealership FAQ.
//!
//! The knowledge base is plain text: a `Q:` line opens an entry and the next
//! `A:` line closes it. Everything else (headings, contact blocks) is ignored.

use crate::domain::model::FaqEntry;
use crate::utils::error::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_MAX_RESULTS: usize = 5;

const BUILTIN_KNOWLEDGE_BASE: &str = include_str!("../../data/faq.txt");

const STOPWORDS: &[&str] = &[
    "the", "is", "a", "an", "and", "or", "to", "for", "of", "in", "on", "with", "do", "you",
    "your", "are", "can", "i", "what", "how", "many", "does", "it", "my", "we", "have",
];

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("static word pattern"))
}

pub fn tokenize(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    word_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| !STOPWORDS.contains(word))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct FaqIndex {
    entries: Vec<FaqEntry>,
}

impl FaqIndex {
    pub fn parse(raw: &str) -> Self {
        let mut entries = Vec::new();
        let mut current_question: Option<String> = None;

        for line in raw.lines() {
            let stripped = line.trim();
            if let Some(question) = stripped.strip_prefix("Q:") {
                current_question = Some(question.trim().to_string());
            } else if let Some(answer) = stripped.strip_prefix("A:") {
                if let Some(question) = current_question.take() {
                    let keywords = tokenize(&question);
                    if !keywords.is_empty() {
                        entries.push(FaqEntry {
                            question,
                            answer: answer.trim().to_string(),
                            keywords,
                        });
                    }
                }
            }
        }

        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::parse(BUILTIN_KNOWLEDGE_BASE)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::parse(&raw))
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Entries ranked by the number of shared keywords. An empty query, or
    /// one that overlaps nothing, yields the first `max_results` entries.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<&FaqEntry> {
        if query.is_empty() {
            return self.entries.iter().take(max_results).collect();
        }

        let query_words = tokenize(query);
        let mut scored: Vec<(usize, &FaqEntry)> = self
            .entries
            .iter()
            .map(|entry| (entry.keywords.intersection(&query_words).count(), entry))
            .filter(|(score, _)| *score > 0)
            .collect();

        if scored.is_empty() {
            return self.entries.iter().take(max_results).collect();
        }

        // sort_by 是穩定排序，同分時保留原始順序
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(max_results)
            .map(|(_, entry)| entry)
            .collect()
    }

    pub fn answer(&self, query: &str, max_results: usize) -> String {
        let top = self.search(query, max_results);
        if top.is_empty() {
            return "No FAQ entries found.".to_string();
        }

        top.iter()
            .map(|entry| format!("Q: {}\nA: {}", entry.question, entry.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for FaqIndex {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
Heading that is ignored

Q: What is your address?
A: 123 MG Road.

A: orphan answer without a question

Q: Can I buy on EMI?
A: Yes, through partner banks.

Q: What is it?
A: Only stopwords in this question, so it is dropped.

Q: Interest rate for EMI loans
A: Around 8.5%.
"#;

    #[test]
    fn test_tokenize_drops_stopwords() {
        let tokens = tokenize("What is the EMI for my Creta?");
        let expected: BTreeSet<String> = ["emi", "creta"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_parse_pairs_questions_and_answers() {
        let index = FaqIndex::parse(SAMPLE);
        let questions: Vec<&str> = index.entries().iter().map(|e| e.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["What is your address?", "Can I buy on EMI?", "Interest rate for EMI loans"]
        );
    }

    #[test]
    fn test_search_ranks_by_overlap() {
        let index = FaqIndex::parse(SAMPLE);
        let hits = index.search("emi interest rate", 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].question, "Interest rate for EMI loans");
        assert_eq!(hits[1].question, "Can I buy on EMI?");
    }

    #[test]
    fn test_search_without_overlap_returns_leading_entries() {
        let index = FaqIndex::parse(SAMPLE);
        let hits = index.search("weather tomorrow", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].question, "What is your address?");

        let hits = index.search("", 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_answer_formatting() {
        let index = FaqIndex::parse(SAMPLE);
        let text = index.answer("address", 1);
        assert_eq!(text, "Q: What is your address?\nA: 123 MG Road.");

        assert_eq!(FaqIndex::parse("").answer("address", 5), "No FAQ entries found.");
    }

    #[test]
    fn test_builtin_knowledge_base() {
        let index = FaqIndex::builtin();
        assert_eq!(index.entries().len(), 157);
        assert_eq!(index.entries()[0].question, "Hello / Hi");

        let hits = index.search("showroom address", 3);
        let questions: Vec<&str> = hits.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["What is your address?", "Showroom working hours", "Exact showroom addresses"]
        );
    }

    #[test]
    fn test_builtin_keeps_templated_entries() {
        let index = FaqIndex::builtin();
        let hits = index.search("cars under budget_range", 1);
        assert_eq!(hits[0].question, "Do you have cars under {budget_range}?");
        assert!(hits[0].answer.contains("{budget_range}"));
    }
}
