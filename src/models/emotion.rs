use crate::error::{AppError, Result};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

pub const EMOTION_COUNT: usize = 17;

/// The fixed emotion vocabulary. Declaration order is the canonical order
/// used for iteration and every tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Emotion {
    Happiness,
    Contentment,
    Confidence,
    Neutral,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Love,
    Excitement,
    Anticipation,
    Nostalgia,
    Confusion,
    Frustration,
    Longing,
    Optimism,
}

impl Emotion {
    pub const ALL: [Emotion; EMOTION_COUNT] = [
        Emotion::Happiness,
        Emotion::Contentment,
        Emotion::Confidence,
        Emotion::Neutral,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Love,
        Emotion::Excitement,
        Emotion::Anticipation,
        Emotion::Nostalgia,
        Emotion::Confusion,
        Emotion::Frustration,
        Emotion::Longing,
        Emotion::Optimism,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happiness => "Happiness",
            Emotion::Contentment => "Contentment",
            Emotion::Confidence => "Confidence",
            Emotion::Neutral => "Neutral",
            Emotion::Sadness => "Sadness",
            Emotion::Anger => "Anger",
            Emotion::Fear => "Fear",
            Emotion::Surprise => "Surprise",
            Emotion::Disgust => "Disgust",
            Emotion::Love => "Love",
            Emotion::Excitement => "Excitement",
            Emotion::Anticipation => "Anticipation",
            Emotion::Nostalgia => "Nostalgia",
            Emotion::Confusion => "Confusion",
            Emotion::Frustration => "Frustration",
            Emotion::Longing => "Longing",
            Emotion::Optimism => "Optimism",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = AppError;

    /// Case-insensitive lookup by name
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| AppError::Validation(format!("Unknown emotion: {}", s)))
    }
}

/// Independent per-emotion scores in [0, 1], one slot per [`Emotion`].
///
/// Scores come from per-category sigmoid activations and are not expected to
/// sum to 1. Serializes as a name -> score object in canonical order and
/// deserializes from either that object or a plain 17-element array.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "ScoresRepr")]
pub struct EmotionVector([f64; EMOTION_COUNT]);

impl EmotionVector {
    /// Validate raw classifier output: exactly 17 values, each within [0, 1].
    pub fn from_scores(scores: &[f64]) -> Result<Self> {
        if scores.len() != EMOTION_COUNT {
            return Err(AppError::InputShape {
                expected: EMOTION_COUNT,
                actual: scores.len(),
            });
        }

        let mut values = [0.0; EMOTION_COUNT];
        for (emotion, (slot, &score)) in Emotion::ALL.iter().zip(values.iter_mut().zip(scores)) {
            check_range(*emotion, score)?;
            *slot = score;
        }

        Ok(Self(values))
    }

    /// Build from named scores; emotions that are not mentioned score 0.
    pub fn from_pairs(pairs: &[(Emotion, f64)]) -> Result<Self> {
        let mut values = [0.0; EMOTION_COUNT];
        for &(emotion, score) in pairs {
            check_range(emotion, score)?;
            values[emotion.index()] = score;
        }
        Ok(Self(values))
    }

    #[cfg(test)]
    pub fn zeroed() -> Self {
        Self([0.0; EMOTION_COUNT])
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        self.0[emotion.index()]
    }

    pub fn scores(&self) -> &[f64; EMOTION_COUNT] {
        &self.0
    }

    /// (emotion, score) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.iter().copied().zip(self.0.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Highest-scoring emotion. Equal scores resolve to the earlier emotion
    /// in canonical order.
    pub fn primary(&self) -> (Emotion, f64) {
        let mut best = (Emotion::ALL[0], self.0[0]);
        for (emotion, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (emotion, score);
            }
        }
        best
    }
}

impl Index<Emotion> for EmotionVector {
    type Output = f64;

    fn index(&self, emotion: Emotion) -> &f64 {
        &self.0[emotion.index()]
    }
}

impl Serialize for EmotionVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EMOTION_COUNT))?;
        for (emotion, score) in self.iter() {
            map.serialize_entry(emotion.as_str(), &score)?;
        }
        map.end()
    }
}

fn check_range(emotion: Emotion, score: f64) -> Result<()> {
    // NaN fails the range check as well
    if !(0.0..=1.0).contains(&score) {
        return Err(AppError::Range {
            emotion: emotion.to_string(),
            value: score,
        });
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScoresRepr {
    List(Vec<f64>),
    Named(BTreeMap<String, f64>),
}

impl TryFrom<ScoresRepr> for EmotionVector {
    type Error = AppError;

    fn try_from(repr: ScoresRepr) -> Result<Self> {
        match repr {
            ScoresRepr::List(scores) => Self::from_scores(&scores),
            ScoresRepr::Named(named) => {
                let pairs = named
                    .iter()
                    .map(|(name, &score)| -> Result<(Emotion, f64)> { Ok((name.parse()?, score)) })
                    .collect::<Result<Vec<_>>>()?;
                Self::from_pairs(&pairs)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            ConfidenceLevel::High
        } else if confidence >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// How the attribution provider's tokenizer labelled a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Ordinary,
    /// Sub-word piece glued onto the previous word (e.g. "##moted")
    Continuation,
    /// Sequence markers such as [CLS] / [SEP]
    Boundary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionToken {
    pub token: String,
    pub weight: f64,
    pub kind: TokenKind,
}

impl AttributionToken {
    #[cfg(test)]
    pub fn new(token: impl Into<String>, weight: f64, kind: TokenKind) -> Self {
        Self {
            token: token.into(),
            weight,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordImportance {
    pub word: String,
    pub importance: f64,
}

/// Full result of analysing one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub emotions: EmotionVector,
    pub primary_emotion: Emotion,
    pub primary_confidence: f64,
    pub secondary_emotions: Vec<Emotion>,
    pub detected_emotions: Vec<Emotion>,
    pub confidence_level: ConfidenceLevel,
    pub emotional_complexity: f64,
    pub explanation: String,
    /// Ranked by absolute importance, strongest first
    pub top_words: Vec<WordImportance>,
    pub word_importance: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        assert_eq!(Emotion::ALL.len(), 17);
        assert_eq!(Emotion::ALL[0], Emotion::Happiness);
        assert_eq!(Emotion::ALL[3], Emotion::Neutral);
        assert_eq!(Emotion::ALL[16], Emotion::Optimism);
        for (i, emotion) in Emotion::ALL.iter().enumerate() {
            assert_eq!(emotion.index(), i);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("happiness".parse::<Emotion>().unwrap(), Emotion::Happiness);
        assert_eq!("LONGING".parse::<Emotion>().unwrap(), Emotion::Longing);
        assert!(matches!("Joy".parse::<Emotion>(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_from_scores_rejects_wrong_length() {
        let err = EmotionVector::from_scores(&[0.5; 16]).unwrap_err();
        assert!(matches!(err, AppError::InputShape { expected: 17, actual: 16 }));
    }

    #[test]
    fn test_from_scores_rejects_out_of_range() {
        let mut scores = [0.1; 17];
        scores[4] = 1.2;
        let err = EmotionVector::from_scores(&scores).unwrap_err();
        match err {
            AppError::Range { emotion, value } => {
                assert_eq!(emotion, "Sadness");
                assert_eq!(value, 1.2);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        scores[4] = f64::NAN;
        assert!(matches!(
            EmotionVector::from_scores(&scores),
            Err(AppError::Range { .. })
        ));
    }

    #[test]
    fn test_primary_ties_resolve_to_canonical_order() {
        let v = EmotionVector::from_pairs(&[(Emotion::Love, 0.7), (Emotion::Confidence, 0.7)]).unwrap();
        assert_eq!(v.primary(), (Emotion::Confidence, 0.7));

        assert_eq!(EmotionVector::zeroed().primary(), (Emotion::Happiness, 0.0));
    }

    #[test]
    fn test_serializes_as_named_map() {
        let v = EmotionVector::from_pairs(&[(Emotion::Fear, 0.25)]).unwrap();
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json["Fear"], 0.25);
        assert_eq!(json["Happiness"], 0.0);
        assert_eq!(json.as_object().unwrap().len(), 17);
    }

    #[test]
    fn test_deserializes_from_array_or_map() {
        let from_list: EmotionVector = serde_json::from_str(&format!("{:?}", vec![0.5; 17])).unwrap();
        assert_eq!(from_list.get(Emotion::Optimism), 0.5);

        let from_map: EmotionVector = serde_json::from_str(r#"{"sadness": 0.9, "Longing": 0.6}"#).unwrap();
        assert_eq!(from_map[Emotion::Sadness], 0.9);
        assert_eq!(from_map[Emotion::Longing], 0.6);
        assert_eq!(from_map[Emotion::Happiness], 0.0);

        assert!(serde_json::from_str::<EmotionVector>(r#"{"Joy": 0.9}"#).is_err());
        assert!(serde_json::from_str::<EmotionVector>("[0.5, 0.5]").is_err());
    }

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(ConfidenceLevel::from_confidence(0.92), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_confidence(0.8), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_confidence(0.79), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_confidence(0.5), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_confidence(0.49), ConfidenceLevel::Low);
    }

    #[test]
    fn test_token_kind_wire_names() {
        let token: AttributionToken =
            serde_json::from_str(r###"{"token": "##moted", "weight": 0.134, "kind": "continuation"}"###).unwrap();
        assert_eq!(token.kind, TokenKind::Continuation);
    }
}
