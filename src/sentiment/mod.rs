//! Sentiment classification of interaction notes
//!
//! Two backends share the `SentimentClassifier` trait: a local word-polarity
//! lexicon and a hosted inference endpoint. Callers go through [`classify`],
//! which never fails: empty text and every backend error come back as
//! NEUTRAL with zero confidence.

mod lexicon;
mod remote;

pub use lexicon::{LexiconClassifier, PolarityLexicon};
pub use remote::{parse_predictions, RemoteClassifier};

use log::error;

use crate::config::{secret_from_env, SentimentConfig};
use crate::error::AdapterResult;
use crate::types::{Lead, SentimentResult};

pub trait SentimentClassifier {
    fn classify_text(&self, text: &str) -> AdapterResult<SentimentResult>;

    fn name(&self) -> &'static str;
}

/// Classify one text, mapping empty input and failures to a neutral result
pub fn classify(classifier: &dyn SentimentClassifier, text: &str) -> SentimentResult {
    if text.trim().is_empty() {
        return SentimentResult::neutral();
    }

    match classifier.classify_text(text) {
        Ok(result) => result,
        Err(e) => {
            error!("Sentiment analysis failed ({}): {}", classifier.name(), e);
            SentimentResult::neutral()
        }
    }
}

/// Classify each lead's interaction text, in row order
pub fn classify_all(classifier: &dyn SentimentClassifier, leads: &[Lead]) -> Vec<SentimentResult> {
    leads
        .iter()
        .map(|lead| classify(classifier, &lead.interaction))
        .collect()
}

pub fn classifier_from_config(config: &SentimentConfig) -> AdapterResult<Box<dyn SentimentClassifier>> {
    Ok(match config {
        SentimentConfig::Lexicon => Box::new(LexiconClassifier::new()),
        SentimentConfig::Remote { url, token_env } => Box::new(RemoteClassifier::new(
            url.clone(),
            secret_from_env(token_env.as_deref()),
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::types::SentimentLabel;

    struct BrokenClassifier;

    impl SentimentClassifier for BrokenClassifier {
        fn classify_text(&self, _text: &str) -> AdapterResult<SentimentResult> {
            Err(DashboardError::Classification("model not loaded".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_empty_text_is_neutral_zero() {
        let result = classify(&LexiconClassifier::new(), "");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.0);

        let result = classify(&BrokenClassifier, "   ");
        assert_eq!(result, SentimentResult::neutral());
    }

    #[test]
    fn test_failure_is_neutral_zero() {
        let result = classify(&BrokenClassifier, "great service");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let lead = |text: &str| Lead {
            name: String::new(),
            phone: String::new(),
            platform: String::new(),
            status: String::new(),
            interaction: text.to_string(),
            value: None,
            date: None,
        };
        let leads = vec![lead("excellent, loved it"), lead(""), lead("terrible experience")];
        let results = classify_all(&LexiconClassifier::new(), &leads);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].label, SentimentLabel::Positive);
        assert_eq!(results[1].label, SentimentLabel::Neutral);
        assert_eq!(results[2].label, SentimentLabel::Negative);
    }
}
