//! Profanity filtering for chat text.

use std::collections::HashSet;

use chatrelay_core::config::ProfanityConfig;

/// Decides whether a piece of text is profane.
pub trait ProfanityFilter: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `text` must not be relayed.
    fn is_profane(&self, text: &str) -> bool;
}

const DEFAULT_WORDS: &[&str] = &[
    "anal", "anus", "arse", "arsehole", "ass", "asses", "asshat", "asshole", "assholes", "bastard",
    "bastards", "bellend", "bitch", "bitches", "bitching", "bitchy", "blowjob", "bollock",
    "bollocks", "boner", "boob", "boobs", "bugger", "bullshit", "butthole", "clit", "cock", "cocks",
    "cocksucker", "coon", "crap", "cum", "cumshot", "cunt", "cunts", "damn", "dick", "dickhead",
    "dickheads", "dildo", "dipshit", "douche", "douchebag", "dyke", "fag", "faggot", "fags",
    "fanny", "felching", "fuck", "fucked", "fucker", "fuckers", "fuckhead", "fucking", "fucks",
    "fuckwit", "goddamn", "goddamned", "handjob", "hoe", "horny", "jackass", "jerkoff", "jizz",
    "kike", "knob", "knobhead", "motherfucker", "motherfuckers", "motherfucking", "muff", "nigga",
    "nigger", "niggers", "nob", "nutsack", "orgasm", "penis", "piss", "pissed", "pissing", "poon",
    "porn", "prick", "pube", "pubes", "punani", "pussies", "pussy", "queef", "rape", "rectum",
    "retard", "rimjob", "scrotum", "semen", "sex", "shag", "shit", "shite", "shits", "shitted",
    "shitting", "shitty", "skank", "slag", "slut", "sluts", "smegma", "spunk", "tit", "tits",
    "titties", "tosser", "turd", "twat", "twats", "vagina", "wank", "wanker", "wankers", "whore",
    "whores",
];

/// Whole-word, case-insensitive match against a word list.
///
/// Text is split on every run of non-alphanumeric characters, so
/// `"what.the.fuck"` yields three words and `"class"` never matches `"ass"`.
#[derive(Debug, Clone)]
pub struct WordListFilter {
    words: HashSet<String>,
    enabled: bool,
}

impl WordListFilter {
    /// Builds the filter from the built-in list adjusted by `config`.
    pub fn from_config(config: &ProfanityConfig) -> Self {
        let allowed: HashSet<String> = config
            .allowed_words
            .iter()
            .map(|w| clean_word(w))
            .collect();

        let words = DEFAULT_WORDS
            .iter()
            .map(|w| (*w).to_string())
            .chain(config.extra_words.iter().map(|w| clean_word(w)))
            .filter(|w| !w.is_empty() && !allowed.contains(w))
            .collect();

        Self {
            words,
            enabled: config.enabled,
        }
    }

    /// Number of words in the active list.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

impl Default for WordListFilter {
    fn default() -> Self {
        Self::from_config(&ProfanityConfig::default())
    }
}

impl ProfanityFilter for WordListFilter {
    fn is_profane(&self, text: &str) -> bool {
        self.enabled
            && text
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
                .any(|w| self.words.contains(&w.to_lowercase()))
    }
}

fn clean_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
