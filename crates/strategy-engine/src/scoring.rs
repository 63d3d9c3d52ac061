//! Word-lexicon polarity scorer for headlines

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::Result;
use crate::providers::PolarityScorer;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("token pattern is valid"));

const NEGATORS: &[&str] = &["not", "no", "never", "without", "hardly", "barely"];
/// TextBlob-style negation flips and dampens
const NEGATION_FACTOR: f64 = -0.5;

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("sharply", 1.3),
    ("slightly", 0.5),
];

const POSITIVE: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("strong", 0.4),
    ("stronger", 0.5),
    ("gain", 0.4),
    ("gains", 0.4),
    ("surge", 0.6),
    ("surges", 0.6),
    ("soar", 0.7),
    ("soars", 0.7),
    ("rally", 0.5),
    ("rallies", 0.5),
    ("beat", 0.4),
    ("beats", 0.4),
    ("record", 0.3),
    ("growth", 0.4),
    ("profit", 0.4),
    ("profitable", 0.5),
    ("upgrade", 0.5),
    ("upgraded", 0.5),
    ("bullish", 0.6),
    ("outperform", 0.5),
    ("positive", 0.5),
    ("boost", 0.4),
    ("boosts", 0.4),
    ("win", 0.6),
    ("wins", 0.6),
    ("success", 0.6),
    ("successful", 0.6),
    ("optimistic", 0.5),
    ("rise", 0.3),
    ("rises", 0.3),
    ("higher", 0.25),
    ("best", 1.0),
    ("innovative", 0.5),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bad", -0.7),
    ("poor", -0.4),
    ("weak", -0.4),
    ("weaker", -0.5),
    ("loss", -0.4),
    ("losses", -0.4),
    ("plunge", -0.7),
    ("plunges", -0.7),
    ("crash", -0.8),
    ("crashes", -0.8),
    ("slump", -0.6),
    ("slumps", -0.6),
    ("miss", -0.4),
    ("misses", -0.4),
    ("decline", -0.4),
    ("declines", -0.4),
    ("drop", -0.4),
    ("drops", -0.4),
    ("fall", -0.3),
    ("falls", -0.3),
    ("downgrade", -0.5),
    ("downgraded", -0.5),
    ("bearish", -0.6),
    ("underperform", -0.5),
    ("negative", -0.3),
    ("lawsuit", -0.5),
    ("fraud", -0.9),
    ("recall", -0.4),
    ("layoffs", -0.5),
    ("warning", -0.4),
    ("risk", -0.2),
    ("fears", -0.5),
    ("lower", -0.25),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("bankruptcy", -0.9),
];

/// Mean polarity of the lexicon words found in the text
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Scorer with the built-in finance lexicon
    pub fn new() -> Self {
        let words = POSITIVE
            .iter()
            .chain(NEGATIVE)
            .map(|(word, polarity)| ((*word).to_string(), *polarity))
            .collect();
        Self {
            words,
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Add or override word polarities (clamped to [-1, 1])
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, polarity) in words {
            self.words
                .insert(word.into().to_lowercase(), polarity.clamp(-1.0, 1.0));
        }
        self
    }

    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut matched = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(*token) else {
                continue;
            };

            let mut polarity = base;
            let mut lookback = i;
            if let Some(factor) = lookback
                .checked_sub(1)
                .and_then(|j| self.intensifiers.get(tokens[j]))
            {
                polarity *= factor;
                lookback -= 1;
            }
            if lookback
                .checked_sub(1)
                .is_some_and(|j| is_negator(tokens[j]))
            {
                polarity *= NEGATION_FACTOR;
            }
            matched.push(polarity.clamp(-1.0, 1.0));
        }

        if matched.is_empty() {
            return 0.0;
        }
        (matched.iter().sum::<f64>() / matched.len() as f64).clamp(-1.0, 1.0)
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64> {
        Ok(self.polarity(text))
    }
}
