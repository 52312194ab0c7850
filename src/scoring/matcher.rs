use crate::models::NutritionRecord;
use crate::scoring::config::MatchPolicy;
use crate::state::KnowledgeBase;

/// Lowercase and collapse runs of whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Length of the longest common subsequence of two char slices.
fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Indel ratio of two strings, `2·M / (|a| + |b|)` scaled to 0-100 and
/// rounded to the nearest integer. An empty side scores 0.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matches = common_subsequence_len(&a, &b) as f64;
    (200.0 * matches / (a.len() + b.len()) as f64).round()
}

/// Similarity of two meal names on a 0-100 scale, ignoring case and spacing.
pub fn similarity(a: &str, b: &str) -> f64 {
    indel_ratio(&normalize_name(a), &normalize_name(b))
}

/// How a meal name was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// The name is a knowledge-base key verbatim.
    Exact,
    /// The closest key scored at or above the threshold.
    Fuzzy { matched: String, score: f64 },
    /// Nothing matched; the default record was substituted.
    Default { best_score: Option<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub record: NutritionRecord,
    pub outcome: MatchOutcome,
}

/// Resolves free-text meal names against a knowledge base.
///
/// Fuzzy resolution is a linear scan over every key, so cost grows with the
/// knowledge-base size (fine for a few hundred meals). Keys are visited in
/// insertion order and only a strictly higher score replaces the current
/// best, so the earliest key wins ties.
pub struct FuzzyMealMatcher<'a> {
    knowledge: &'a KnowledgeBase,
    policy: &'a MatchPolicy,
}

impl<'a> FuzzyMealMatcher<'a> {
    pub fn new(knowledge: &'a KnowledgeBase, policy: &'a MatchPolicy) -> Self {
        Self { knowledge, policy }
    }

    /// Highest-scoring key for `query`, regardless of threshold.
    pub fn best_candidate(&self, query: &str) -> Option<(&'a str, f64)> {
        let query = normalize_name(query);
        let mut best: Option<(&'a str, f64)> = None;

        for (name, _) in self.knowledge.iter() {
            let score = indel_ratio(&query, &normalize_name(name));
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((name, score)),
            }
        }

        best
    }

    /// Resolve a meal name: exact key, then fuzzy match, then default record.
    pub fn resolve(&self, meal_name: &str) -> Resolution {
        if let Some(entry) = self.knowledge.get(meal_name) {
            return Resolution {
                record: entry.record,
                outcome: MatchOutcome::Exact,
            };
        }

        let best = self.best_candidate(meal_name);
        if let Some((name, score)) = best {
            if score >= self.policy.fuzzy_threshold {
                if let Some(entry) = self.knowledge.get(name) {
                    return Resolution {
                        record: entry.record,
                        outcome: MatchOutcome::Fuzzy {
                            matched: name.to_string(),
                            score,
                        },
                    };
                }
            }
        }

        Resolution {
            record: self.policy.default_record,
            outcome: MatchOutcome::Default {
                best_score: best.map(|(_, score)| score),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KnowledgeEntry;
    use crate::scoring::constants::DEFAULT_NUTRITION;

    fn knowledge() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.insert(
            "Grilled Chicken",
            KnowledgeEntry::from(NutritionRecord::new(330.0, 38.0, 0.0, 7.0)),
        );
        kb.insert(
            "Caesar Salad",
            KnowledgeEntry::from(NutritionRecord::new(480.0, 10.0, 20.0, 40.0)),
        );
        kb
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Grilled   CHICKEN "), "grilled chicken");
    }

    #[test]
    fn test_exact_key() {
        let kb = knowledge();
        let policy = MatchPolicy::default();
        let resolution = FuzzyMealMatcher::new(&kb, &policy).resolve("Caesar Salad");
        assert_eq!(resolution.outcome, MatchOutcome::Exact);
        assert_eq!(resolution.record.calories, 480.0);
    }

    #[test]
    fn test_case_and_whitespace_variant_matches() {
        let kb = knowledge();
        let policy = MatchPolicy::default();
        let resolution = FuzzyMealMatcher::new(&kb, &policy).resolve("grilled  chicken ");
        match resolution.outcome {
            MatchOutcome::Fuzzy { matched, score } => {
                assert_eq!(matched, "Grilled Chicken");
                assert!(score >= 85.0);
            }
            other => panic!("expected fuzzy match, got {:?}", other),
        }
        assert_eq!(resolution.record.protein_g, 38.0);
    }

    #[test]
    fn test_unrelated_name_falls_back_to_default() {
        let kb = knowledge();
        let policy = MatchPolicy::default();
        assert!(similarity("Grilled Chicken", "Chocolate Cake") < 85.0);

        let resolution = FuzzyMealMatcher::new(&kb, &policy).resolve("Chocolate Cake");
        assert_eq!(resolution.record, DEFAULT_NUTRITION);
        assert!(matches!(resolution.outcome, MatchOutcome::Default { .. }));
    }

    #[test]
    fn test_first_key_wins_ties() {
        let mut kb = KnowledgeBase::new();
        kb.insert("Pasta A", KnowledgeEntry::from(NutritionRecord::new(1.0, 0.0, 0.0, 0.0)));
        kb.insert("Pasta B", KnowledgeEntry::from(NutritionRecord::new(2.0, 0.0, 0.0, 0.0)));
        let policy = MatchPolicy::default();
        let matcher = FuzzyMealMatcher::new(&kb, &policy);

        let (name, _) = matcher.best_candidate("Pasta C").unwrap();
        assert_eq!(name, "Pasta A");
    }

    #[test]
    fn test_indel_ratio_values() {
        assert_eq!(indel_ratio("pasta", "pasta"), 100.0);
        assert_eq!(indel_ratio("", "pasta"), 0.0);
        // 2 * 19 / (19 + 24) = 88.37
        assert_eq!(indel_ratio("chicken noodle soup", "chicken noodle soup bowl"), 88.0);
        // 2 * 3 / (4 + 4) = 75
        assert_eq!(indel_ratio("abcd", "abdc"), 75.0);
    }

    #[test]
    fn test_added_word_still_matches() {
        let mut kb = knowledge();
        kb.insert(
            "Chicken Noodle Soup",
            KnowledgeEntry::from(NutritionRecord::new(160.0, 12.0, 18.0, 4.0)),
        );
        let policy = MatchPolicy::default();
        let resolution = FuzzyMealMatcher::new(&kb, &policy).resolve("Chicken Noodle Soup Bowl");
        match resolution.outcome {
            MatchOutcome::Fuzzy { matched, score } => {
                assert_eq!(matched, "Chicken Noodle Soup");
                assert_eq!(score, 88.0);
            }
            other => panic!("expected fuzzy match, got {:?}", other),
        }
        assert_eq!(resolution.record.calories, 160.0);
    }

    #[test]
    fn test_empty_knowledge_base() {
        let kb = KnowledgeBase::new();
        let policy = MatchPolicy::default();
        let resolution = FuzzyMealMatcher::new(&kb, &policy).resolve("Anything");
        assert_eq!(
            resolution.outcome,
            MatchOutcome::Default { best_score: None }
        );
    }
}
