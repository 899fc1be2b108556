//! Word-polarity lexicon for sales conversations, English and Portuguese.

use std::collections::HashMap;

use super::SentimentClassifier;
use crate::error::AdapterResult;
use crate::types::{SentimentLabel, SentimentResult};

/// Scores strictly inside this band are NEUTRAL
const NEUTRAL_BAND: f64 = 0.2;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("good", 0.5),
    ("great", 0.7),
    ("excellent", 0.8),
    ("amazing", 0.8),
    ("awesome", 0.8),
    ("perfect", 0.8),
    ("love", 0.8),
    ("loved", 0.8),
    ("like", 0.4),
    ("liked", 0.5),
    ("happy", 0.6),
    ("satisfied", 0.6),
    ("interested", 0.5),
    ("recommend", 0.6),
    ("thanks", 0.4),
    ("thank", 0.4),
    ("buy", 0.4),
    ("bought", 0.5),
    ("helpful", 0.6),
    ("fast", 0.4),
    ("bom", 0.5),
    ("boa", 0.5),
    ("ótimo", 0.7),
    ("ótima", 0.7),
    ("otimo", 0.7),
    ("excelente", 0.8),
    ("maravilhoso", 0.8),
    ("perfeito", 0.8),
    ("adorei", 0.8),
    ("amei", 0.8),
    ("gostei", 0.6),
    ("interessado", 0.5),
    ("interessada", 0.5),
    ("satisfeito", 0.6),
    ("satisfeita", 0.6),
    ("recomendo", 0.6),
    ("obrigado", 0.4),
    ("obrigada", 0.4),
    ("comprar", 0.4),
    ("rápido", 0.4),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bad", -0.6),
    ("terrible", -0.8),
    ("awful", -0.8),
    ("worst", -0.9),
    ("hate", -0.8),
    ("hated", -0.8),
    ("poor", -0.6),
    ("expensive", -0.5),
    ("problem", -0.5),
    ("complaint", -0.6),
    ("disappointed", -0.7),
    ("angry", -0.7),
    ("unhappy", -0.6),
    ("cancel", -0.6),
    ("refund", -0.5),
    ("slow", -0.4),
    ("late", -0.4),
    ("ruim", -0.6),
    ("péssimo", -0.9),
    ("pessimo", -0.9),
    ("horrível", -0.8),
    ("horrivel", -0.8),
    ("odiei", -0.8),
    ("caro", -0.5),
    ("problema", -0.5),
    ("reclamação", -0.6),
    ("decepcionado", -0.7),
    ("decepcionada", -0.7),
    ("insatisfeito", -0.6),
    ("insatisfeita", -0.6),
    ("cancelar", -0.6),
    ("demora", -0.4),
    ("atraso", -0.5),
    ("lento", -0.4),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "didn't", "didnt", "isn't", "isnt", "wasn't",
    "wasnt", "won't", "wont", "hardly", "não", "nao", "nunca", "nem", "jamais",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("extremely", 2.0),
    ("super", 1.5),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("muito", 1.5),
    ("muita", 1.5),
    ("bastante", 1.4),
    ("extremamente", 2.0),
    ("pouco", 0.5),
];

pub struct PolarityLexicon {
    words: HashMap<String, f64>,
    negations: Vec<String>,
    intensifiers: HashMap<String, f64>,
}

/// Outcome of scoring one text against the lexicon
#[derive(Debug, Clone)]
pub struct LexiconScore {
    /// Mean polarity of matched words, within [-1, 1]
    pub score: f64,
    pub matched: usize,
    pub tokens: usize,
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityLexicon {
    pub fn new() -> Self {
        let words = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS.iter())
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        let intensifiers = INTENSIFIERS.iter().map(|(w, m)| (w.to_string(), *m)).collect();

        Self {
            words,
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
            intensifiers,
        }
    }

    pub fn add_word(&mut self, word: &str, score: f64) {
        self.words.insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
    }

    /// Score a text: negation flips the next sentiment word, an intensifier scales it
    pub fn score(&self, text: &str) -> LexiconScore {
        let mut scores: Vec<f64> = Vec::new();
        let mut tokens = 0;
        let mut negate_next = false;
        let mut intensity = 1.0;

        for token in tokenize(text) {
            tokens += 1;
            let word = token.to_lowercase();

            if self.negations.contains(&word) {
                negate_next = true;
                continue;
            }

            if let Some(mult) = self.intensifiers.get(&word) {
                intensity = *mult;
                continue;
            }

            if let Some(base) = self.words.get(&word) {
                let mut score = *base * intensity;
                if negate_next {
                    score = -score;
                }
                scores.push(score);
            }
            // Modifiers only reach the word right after them
            negate_next = false;
            intensity = 1.0;
        }

        let mean = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        LexiconScore {
            score: mean.clamp(-1.0, 1.0),
            matched: scores.len(),
            tokens,
        }
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
}

#[derive(Default)]
pub struct LexiconClassifier {
    lexicon: PolarityLexicon,
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self {
            lexicon: PolarityLexicon::new(),
        }
    }

    pub fn with_lexicon(lexicon: PolarityLexicon) -> Self {
        Self { lexicon }
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify_text(&self, text: &str) -> AdapterResult<SentimentResult> {
        let scored = self.lexicon.score(text);
        if scored.matched == 0 {
            return Ok(SentimentResult::neutral());
        }

        let label = if scored.score > NEUTRAL_BAND {
            SentimentLabel::Positive
        } else if scored.score < -NEUTRAL_BAND {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        let coverage = (scored.matched as f64 / scored.tokens.max(1) as f64).min(1.0);
        let confidence = (0.3 + 0.4 * coverage + 0.3 * scored.score.abs()).min(0.95);

        Ok(SentimentResult::new(label, confidence))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}
