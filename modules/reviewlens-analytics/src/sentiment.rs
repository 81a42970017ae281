use std::collections::HashMap;
use std::sync::LazyLock;

/// Signed sentiment of a piece of text: positive > 0, negative < 0, neutral = 0.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> i32;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> i32 + Send + Sync,
{
    fn score(&self, text: &str) -> i32 {
        self(text)
    }
}

/// AFINN-165 word list, one `word<TAB>valence` pair per line, valences in -5..=5.
const AFINN_165: &str = include_str!("../data/afinn-165.txt");

/// Accommodation vocabulary AFINN has no entry for, layered over it.
const STAY_VOCABULARY: &[(&str, i32)] = &[
    ("comfy", 2),
    ("cosy", 2),
    ("cozy", 2),
    ("spotless", 2),
    ("tidy", 2),
    ("cramped", -2),
    ("damp", -2),
    ("dusty", -2),
    ("loud", -1),
    ("messy", -2),
    ("mold", -2),
    ("mould", -2),
    ("overpriced", -2),
    ("smelly", -2),
    ("stained", -2),
    ("unhelpful", -2),
    ("unresponsive", -2),
];

/// Tokens that flip the valence of the token right after them.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "neither", "nor", "don't", "dont", "doesn't", "doesnt",
    "didn't", "didnt", "isn't", "isnt", "wasn't", "wasnt", "weren't", "werent", "aren't",
    "arent", "can't", "cant", "couldn't", "couldnt", "won't", "wont", "wouldn't", "wouldnt",
    "hardly",
];

static DEFAULT_LEXICON: LazyLock<HashMap<String, i32>> = LazyLock::new(|| {
    let mut words: HashMap<String, i32> = AFINN_165
        .lines()
        .filter_map(|line| {
            let (word, valence) = line.split_once('\t')?;
            Some((word.trim().to_string(), valence.trim().parse().ok()?))
        })
        .collect();
    for (word, valence) in STAY_VOCABULARY {
        words.insert(word.to_string(), *valence);
    }
    words
});

/// Sums word valences over the text, flipping a word's valence when the previous
/// token is a negator ("not clean" scores -2).
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, i32>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            words: DEFAULT_LEXICON.clone(),
        }
    }

    /// Add or override word valences.
    pub fn with_words<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        for (word, valence) in extra {
            self.words.insert(word.into().to_lowercase(), valence);
        }
        self
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> i32 {
        let tokens = tokenize(text);
        tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| {
                let valence = *self.words.get(token.as_str())?;
                let negated = i > 0 && NEGATORS.contains(&tokens[i - 1].as_str());
                Some(if negated { -valence } else { valence })
            })
            .sum()
    }
}

/// Lowercase, then split on anything that is not a letter, digit, apostrophe or hyphen.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_and_negative() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("Lovely flat, spotless and cozy!") > 0);
        assert!(scorer.score("very noisy and dirty room") < 0);
        assert_eq!(scorer.score("We stayed three nights."), 0);
    }

    #[test]
    fn test_negation_flips_next_word() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score("clean"), 2);
        assert_eq!(scorer.score("not clean"), -2);
        assert_eq!(scorer.score("wasn’t clean"), -2);
    }

    #[test]
    fn test_afinn_scores_common_review_words() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score("The kitchen was a disaster, I hate this place"), -5);
        assert_eq!(scorer.score("Worth it, we had fun"), 6);
        assert!(scorer.score("Ugly room, worse than the photos, total fail") < 0);
        assert!(DEFAULT_LEXICON.len() > 3000);
    }

    #[test]
    fn test_afinn_lines_parse_into_valid_valences() {
        assert!(DEFAULT_LEXICON.values().all(|v| (-5..=5).contains(v)));
        assert_eq!(DEFAULT_LEXICON.get("superb"), Some(&5));
        assert_eq!(DEFAULT_LEXICON.get("spotless"), Some(&2));
    }

    #[test]
    fn test_with_words_overrides() {
        let scorer = LexiconScorer::new().with_words([("Quirky", 2)]);
        assert_eq!(scorer.score("quirky"), 2);
    }

    #[test]
    fn test_closure_is_a_scorer() {
        let always_negative = |_: &str| -1;
        assert_eq!(always_negative.score("anything"), -1);
    }

    #[test]
    fn test_tokenize_keeps_contractions_and_hyphens() {
        assert_eq!(
            tokenize("Don't miss the check-in, OK?"),
            vec!["don't", "miss", "the", "check-in", "ok"]
        );
    }
}
