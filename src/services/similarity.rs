// Similarity Primitives
// Term vectors (cosine) and word sets (Jaccard) built from single sentences

use std::collections::{BTreeMap, HashSet};

use super::text_processor::word_tokens;

/// L2-normalized term-frequency vector of one sentence.
///
/// Keys are kept sorted so the inner product is always summed in the same
/// order, which keeps `cosine(a, b) == cosine(b, a)` exact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    pub fn from_sentence(sentence: &str) -> Self {
        let mut counts: BTreeMap<String, f64> = BTreeMap::new();
        for token in word_tokens(sentence) {
            *counts.entry(token).or_insert(0.0) += 1.0;
        }

        let norm = counts.values().map(|c| c * c).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }

        for weight in counts.values_mut() {
            *weight /= norm;
        }
        Self { weights: counts }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }
}

/// Distinct lowercase word tokens of one sentence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet {
    words: HashSet<String>,
}

impl WordSet {
    pub fn from_sentence(sentence: &str) -> Self {
        Self {
            words: word_tokens(sentence).into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

/// Cosine similarity of two normalized term vectors, 0 when either is empty
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .weights
        .iter()
        .filter_map(|(term, w)| large.weights.get(term).map(|other| w * other))
        .sum();

    dot.clamp(0.0, 1.0)
}

/// Jaccard similarity of two word sets, 0 when either is empty
pub fn jaccard(a: &WordSet, b: &WordSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.words.intersection(&b.words).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_of_squares(v: &TermVector) -> f64 {
        v.weights.values().map(|w| w * w).sum()
    }

    #[test]
    fn test_term_vector_is_normalized() {
        let v = TermVector::from_sentence("la casa, la porta e la finestra");
        assert!((sum_of_squares(&v) - 1.0).abs() < 1e-12);
        // "la" appears three times: 3 / sqrt(9 + 1 + 1 + 1 + 1)
        assert!((v.weight("la") - 3.0 / 13f64.sqrt()).abs() < 1e-12);
        assert_eq!(v.weight("assente"), 0.0);
    }

    #[test]
    fn test_term_vector_empty_without_letters() {
        let v = TermVector::from_sentence("... 123 !!!");
        assert!(v.is_empty());
    }

    #[test]
    fn test_cosine_identical_ignores_case_and_punctuation() {
        let a = TermVector::from_sentence("Maria guardava la finestra in silenzio.");
        let b = TermVector::from_sentence("maria guardava la finestra, in silenzio");
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_empty_is_zero() {
        let empty = TermVector::default();
        let x = TermVector::from_sentence("qualcosa di vero");
        assert_eq!(cosine(&empty, &x), 0.0);
        assert_eq!(cosine(&x, &empty), 0.0);
        assert_eq!(cosine(&empty, &empty), 0.0);
    }

    #[test]
    fn test_cosine_symmetric_and_bounded() {
        let samples = [
            "il vento soffiava forte sulla collina",
            "il vento",
            "la collina era verde e il vento soffiava",
            "nessuna parola in comune qui",
            "vento vento vento collina",
        ];
        for x in &samples {
            for y in &samples {
                let a = TermVector::from_sentence(x);
                let b = TermVector::from_sentence(y);
                let ab = cosine(&a, &b);
                let ba = cosine(&b, &a);
                assert_eq!(ab, ba, "asymmetric for {:?} / {:?}", x, y);
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn test_cosine_disjoint_is_zero() {
        let a = TermVector::from_sentence("gatto nero");
        let b = TermVector::from_sentence("cane bianco");
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn test_word_set_collapses_duplicates() {
        let s = WordSet::from_sentence("Via, via, VIA!");
        assert_eq!(s.len(), 1);
        assert!(s.contains("via"));
    }

    #[test]
    fn test_jaccard_values() {
        let a = WordSet::from_sentence("il gatto dorme");
        let b = WordSet::from_sentence("il gatto mangia");
        // {il, gatto} / {il, gatto, dorme, mangia}
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-12);
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn test_jaccard_symmetric_and_empty() {
        let a = WordSet::from_sentence("uno due tre");
        let b = WordSet::from_sentence("tre quattro");
        let empty = WordSet::from_sentence("!!!");
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert_eq!(jaccard(&a, &empty), 0.0);
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }
}
