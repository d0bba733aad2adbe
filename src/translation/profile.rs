/*!
 * Per-family generation profiles and text preprocessing.
 *
 * Generation parameters are fixed per engine family so the same input always
 * decodes the same way; they are not tunable per request.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::EngineFamily;
use crate::language_utils;
use crate::providers::GenerationParams;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,.!?;:।۔،؟])").expect("valid punctuation pattern"));

/// Family-specific generation profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FamilyProfile {
    /// Decoding parameters sent with every generate call
    pub params: GenerationParams,
    /// Maximum number of input tokens kept after preprocessing
    pub max_input_tokens: usize,
}

impl FamilyProfile {
    /// Get the profile for a given family
    pub fn for_family(family: EngineFamily) -> Self {
        match family {
            EngineFamily::IndicTrans => Self {
                params: GenerationParams {
                    max_length: 256,
                    num_beams: 5,
                    length_penalty: 0.8,
                    early_stopping: true,
                },
                max_input_tokens: 256,
            },
            EngineFamily::OpusMt => Self {
                params: GenerationParams {
                    max_length: 512,
                    num_beams: 4,
                    length_penalty: 0.8,
                    early_stopping: true,
                },
                max_input_tokens: 512,
            },
        }
    }
}

/// Input/output conventions of an engine family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocessor {
    /// Whitespace normalization plus a `<src> <tgt>` tag prefix
    IndicTrans { max_tokens: usize },
    /// Whitespace normalization only
    OpusMt { max_tokens: usize },
}

impl Preprocessor {
    pub fn for_family(family: EngineFamily) -> Self {
        let max_tokens = FamilyProfile::for_family(family).max_input_tokens;
        match family {
            EngineFamily::IndicTrans => Self::IndicTrans { max_tokens },
            EngineFamily::OpusMt => Self::OpusMt { max_tokens },
        }
    }

    /// Prepare raw text for the model
    pub fn preprocess(&self, text: &str, source: &str, target: &str) -> String {
        match *self {
            Self::IndicTrans { max_tokens } => {
                let body = truncate_tokens(&normalize_whitespace(text), max_tokens);
                format!("{} {} {}", source, target, body)
            }
            Self::OpusMt { max_tokens } => truncate_tokens(&normalize_whitespace(text), max_tokens),
        }
    }

    /// Clean decoded output for the target language
    pub fn postprocess(&self, decoded: &str, target: &str) -> String {
        match self {
            Self::IndicTrans { .. } => {
                let collapsed = normalize_whitespace(decoded);
                let mut detokenized = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1").into_owned();
                // Devanagari sentences end with a danda rather than a period
                if language_utils::script_of(target) == Some("Deva") && detokenized.ends_with('.') {
                    detokenized.pop();
                    detokenized.push('।');
                }
                detokenized
            }
            Self::OpusMt { .. } => decoded.trim().to_string(),
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn truncate_tokens(text: &str, max_tokens: usize) -> String {
    let mut tokens = text.split(' ');
    let kept: Vec<&str> = tokens.by_ref().take(max_tokens).collect();
    if tokens.next().is_some() {
        log::debug!("Input truncated to {} tokens", max_tokens);
    }
    kept.join(" ")
}
