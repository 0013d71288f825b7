//! Keyword Extractor: salient lemmatized terms of a job description.
//!
//! Tagging is a capability (`PosTagger`) built once at startup. The default
//! `LexiconTagger` is a deterministic rule-based tagger: no model files, no network.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of keywords returned per job description.
pub const MAX_KEYWORDS: usize = 15;

/// Terms that are nouns in almost every JD but carry no signal.
pub const CUSTOM_STOP_WORDS: &[&str] = &[
    "experience",
    "work",
    "skill",
    "skills",
    "knowledge",
    "plus",
    "candidate",
    "track",
    "record",
    "ideal",
    "platform",
    "platforms",
];

/// Coarse universal part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Adjective,
    Verb,
    Adverb,
    Number,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    /// NOUN / PROPN / ADJ are the only classes kept as keywords.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun | PartOfSpeech::ProperNoun | PartOfSpeech::Adjective
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
    pub is_punct: bool,
}

/// Part-of-speech tagging and lemmatization capability.
pub trait PosTagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<Token>;
}

/// Extracts up to `MAX_KEYWORDS` lemmas from `text`, most frequent first.
///
/// Ties keep first-encountered order: counts are accumulated in encounter order
/// and then stably sorted by descending frequency.
pub fn extract_keywords(text: &str, tagger: &dyn PosTagger) -> Vec<String> {
    let lowered = text.to_lowercase();
    if lowered.trim().is_empty() {
        return Vec::new();
    }

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for token in tagger.tag(&lowered) {
        if token.is_stop
            || token.is_punct
            || !token.pos.is_content()
            || token.lemma.is_empty()
            || CUSTOM_STOP_WORDS.contains(&token.lemma.as_str())
        {
            continue;
        }
        let count = counts.entry(token.lemma.clone()).or_insert(0);
        if *count == 0 {
            order.push(token.lemma);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|lemma| {
            let count = counts[&lemma];
            (lemma, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(lemma, _)| lemma)
        .collect()
}

/// Keywords that do not appear (as substrings) in the lower-cased resume.
pub fn missing_keywords(keywords: &[String], resume_text: &str) -> Vec<String> {
    let resume_lower = resume_text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| !resume_lower.contains(kw.as_str()))
        .cloned()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// LexiconTagger
// ────────────────────────────────────────────────────────────────────────────

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z0-9+#]*(?:[.\-'][A-Za-z0-9+#]+)*|\d+(?:[.,]\d+)*|[^\sA-Za-z0-9]")
        .expect("token regex is valid")
});

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "again", "against", "all", "almost", "alone",
        "along", "already", "also", "although", "always", "am", "among", "an", "and", "another",
        "any", "anyone", "anything", "are", "around", "as", "at", "be", "became", "because",
        "become", "been", "before", "being", "below", "between", "both", "but", "by", "can",
        "cannot", "could", "did", "do", "does", "doing", "done", "down", "due", "during", "each",
        "either", "else", "enough", "etc", "even", "ever", "every", "few", "for", "from",
        "further", "get", "give", "go", "had", "has", "have", "having", "he", "her", "here",
        "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in", "into",
        "is", "it", "its", "itself", "just", "least", "less", "made", "make", "many", "may",
        "me", "might", "more", "most", "much", "must", "my", "myself", "neither", "never",
        "next", "no", "nor", "not", "nothing", "now", "of", "off", "often", "on", "once", "one",
        "only", "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
        "over", "own", "part", "per", "perhaps", "please", "put", "rather", "re", "really",
        "same", "say", "see", "seem", "several", "she", "should", "show", "since", "so", "some",
        "something", "still", "such", "take", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "though", "through",
        "throughout", "thus", "to", "together", "too", "toward", "towards", "under", "until",
        "up", "upon", "us", "used", "using", "various", "very", "via", "was", "we", "well",
        "were", "what", "whatever", "when", "where", "whether", "which", "while", "who",
        "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
        "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

static VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "apply", "architect", "assist", "build", "collaborate", "communicate", "contribute",
        "create", "define", "deliver", "deploy", "design", "develop", "drive", "enable",
        "ensure", "grow", "help", "implement", "improve", "join", "lead", "learn", "look",
        "maintain", "manage", "mentor", "monitor", "own", "partner", "provide", "require",
        "seek", "ship", "solve", "support", "test", "thrive", "understand", "want", "write",
    ]
    .into_iter()
    .collect()
});

/// Words ending in -ing/-ed that are nouns or adjectives in JD prose.
static NON_VERB_FORMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "engineering", "computing", "testing", "marketing", "accounting", "networking",
        "learning", "training", "scripting", "programming", "modeling", "modelling",
        "processing", "monitoring", "logging", "debugging", "caching", "hosting", "tracing",
        "embedded", "distributed", "advanced", "detailed", "motivated", "experienced",
        "skilled", "qualified", "related", "based", "oriented", "driven", "automated",
    ]
    .into_iter()
    .collect()
});

/// Plural-looking words whose lemma is the word itself.
static LEMMA_EXCEPTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "aws", "kubernetes", "redis", "postgres", "jenkins", "sass", "less", "analytics",
        "statistics", "mathematics", "physics", "economics", "ethics", "devops", "mlops",
        "ios", "macos", "windows", "news", "series", "business", "status", "success",
        "process", "access", "address", "class", "canvas", "bias", "basis", "analysis",
        "thesis", "corpus", "campus", "bonus", "plus", "express", "numpy", "pandas",
        "graphics", "robotics", "logistics",
    ]
    .into_iter()
    .collect()
});

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "able", "ible", "ful", "ous", "ive", "ical", "ic", "al", "less", "ish", "ary", "ent", "ant",
];

/// Rule-based tagger over a small closed-class lexicon.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconTagger;

impl PosTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<Token> {
        TOKEN_RE
            .find_iter(text)
            .map(|m| classify(m.as_str()))
            .collect()
    }
}

fn classify(raw: &str) -> Token {
    let lower = raw.to_lowercase();

    if !lower.chars().any(|c| c.is_alphanumeric()) {
        return Token {
            text: raw.to_string(),
            lemma: lower,
            pos: PartOfSpeech::Punctuation,
            is_stop: false,
            is_punct: true,
        };
    }

    if lower.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Token {
            text: raw.to_string(),
            lemma: lower,
            pos: PartOfSpeech::Number,
            is_stop: false,
            is_punct: false,
        };
    }

    let is_stop = STOP_WORDS.contains(lower.as_str());
    let lemma = lemmatize(&lower);
    let pos = if is_stop {
        PartOfSpeech::Other
    } else {
        guess_pos(&lower, &lemma)
    };

    Token {
        text: raw.to_string(),
        lemma,
        pos,
        is_stop,
        is_punct: false,
    }
}

fn guess_pos(word: &str, lemma: &str) -> PartOfSpeech {
    if VERBS.contains(lemma) || VERBS.contains(verb_stem(word).as_str()) {
        return PartOfSpeech::Verb;
    }
    if NON_VERB_FORMS.contains(word) {
        return if word.ends_with("ed") {
            PartOfSpeech::Adjective
        } else {
            PartOfSpeech::Noun
        };
    }
    if word.len() > 4 && (word.ends_with("ing") || word.ends_with("ed")) {
        return PartOfSpeech::Verb;
    }
    if word.len() > 4 && word.ends_with("ly") {
        return PartOfSpeech::Adverb;
    }
    if word.len() > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        return PartOfSpeech::Adjective;
    }
    PartOfSpeech::Noun
}

/// Strips -ing / -ed / -s to find a base verb form for lexicon lookups.
fn verb_stem(word: &str) -> String {
    for suffix in ["ing", "ed", "es", "s"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.len() >= 3 {
                if VERBS.contains(stem) {
                    return stem.to_string();
                }
                // building -> build, but writing -> writ + e
                let with_e = format!("{stem}e");
                if VERBS.contains(with_e.as_str()) {
                    return with_e;
                }
            }
        }
    }
    word.to_string()
}

/// Plural-to-singular lemmatization for nouns; other words are returned unchanged.
fn lemmatize(word: &str) -> String {
    if word.len() <= 3 || LEMMA_EXCEPTIONS.contains(word) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYTHON_JD: &str = "Looking for a Python developer with AWS and Docker experience";

    #[test]
    fn test_scenario_keywords_include_python_aws_docker() {
        let keywords = extract_keywords(PYTHON_JD, &LexiconTagger);
        for expected in ["python", "aws", "docker"] {
            assert!(
                keywords.contains(&expected.to_string()),
                "missing {expected} in {keywords:?}"
            );
        }
        assert!(!keywords.contains(&"experience".to_string()));
        assert!(!keywords.contains(&"looking".to_string()));
    }

    #[test]
    fn test_empty_text_yields_no_keywords() {
        assert!(extract_keywords("", &LexiconTagger).is_empty());
        assert!(extract_keywords("   \n", &LexiconTagger).is_empty());
    }

    #[test]
    fn test_at_most_fifteen_keywords() {
        let jd = "rust go java kotlin swift scala haskell ocaml erlang elixir clojure \
                  fortran cobol pascal perl ruby php lua julia dart";
        let keywords = extract_keywords(jd, &LexiconTagger);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_custom_stop_words_never_returned() {
        let jd = "Skills and knowledge: platform experience, proven track record, ideal candidate, \
                  work with platforms. Kafka plus Spark skill.";
        let keywords = extract_keywords(jd, &LexiconTagger);
        for kw in &keywords {
            assert!(
                !CUSTOM_STOP_WORDS.contains(&kw.to_lowercase().as_str()),
                "stop word {kw} leaked"
            );
        }
        assert!(keywords.contains(&"kafka".to_string()));
    }

    #[test]
    fn test_frequency_ranking_with_first_seen_tie_break() {
        let jd = "docker rust kafka rust kafka rust";
        let keywords = extract_keywords(jd, &LexiconTagger);
        // rust=3, kafka=2, docker=1
        assert_eq!(keywords, vec!["rust", "kafka", "docker"]);

        let tied = extract_keywords("terraform ansible puppet", &LexiconTagger);
        assert_eq!(tied, vec!["terraform", "ansible", "puppet"]);
    }

    #[test]
    fn test_plurals_are_lemmatized_but_tech_names_kept() {
        let keywords = extract_keywords("databases and APIs on AWS with Kubernetes", &LexiconTagger);
        assert!(keywords.contains(&"database".to_string()));
        assert!(keywords.contains(&"api".to_string()));
        assert!(keywords.contains(&"aws".to_string()));
        assert!(keywords.contains(&"kubernetes".to_string()));
    }

    #[test]
    fn test_verbs_and_adverbs_are_dropped() {
        let keywords = extract_keywords("You will build and maintain systems quickly", &LexiconTagger);
        assert!(!keywords.contains(&"build".to_string()));
        assert!(!keywords.contains(&"maintain".to_string()));
        assert!(!keywords.contains(&"quickly".to_string()));
        assert!(keywords.contains(&"system".to_string()));
    }

    #[test]
    fn test_punctuation_and_numbers_are_tagged() {
        let tokens = LexiconTagger.tag("5 years, python!");
        assert_eq!(tokens[0].pos, PartOfSpeech::Number);
        assert!(tokens.iter().any(|t| t.is_punct && t.text == ","));
        assert!(tokens.iter().any(|t| t.is_punct && t.text == "!"));
    }

    #[test]
    fn test_missing_keywords_uses_substring_match() {
        let keywords = vec!["python".to_string(), "aws".to_string(), "docker".to_string()];
        let missing = missing_keywords(
            &keywords,
            "I have 3 years experience with Python and Docker projects.",
        );
        assert_eq!(missing, vec!["aws"]);
    }
}
