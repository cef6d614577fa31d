//! Fuzzy matching of free text against the category and payment mode
//! registries.
//!
//! Both sides are normalized (case, diacritics, spacing) before
//! comparison. Matching is a two-stage affair: an exact substring hit
//! wins immediately, otherwise every candidate is given a word-overlap
//! score and the best one above the minimum wins. Ties keep the
//! first-occurring candidate, so callers control precedence through
//! list order.

use crate::categories::Category;
use crate::payment_modes::PaymentMode;
use crate::util::normalize;

/// Scores below this are considered noise and never matched.
const MIN_SCORE: f64 = 2.0;

/// Singular/plural variants of a word, the word itself first.
pub(crate) fn word_variations(word: &str) -> Vec<String> {
    let mut variations = vec![word.to_string()];

    if let Some(stem) = word.strip_suffix("ies") {
        variations.push(format!("{stem}y"));
    } else if let Some(stem) = word.strip_suffix("es") {
        variations.push(stem.to_string());
    } else if word.len() > 3
        && let Some(stem) = word.strip_suffix('s')
    {
        variations.push(stem.to_string());
    }

    if word.len() > 2
        && let Some(stem) = word.strip_suffix('y')
    {
        variations.push(format!("{stem}ies"));
    } else if !word.ends_with('s') {
        variations.push(format!("{word}s"));
        variations.push(format!("{word}es"));
    }

    variations
}

/// Best category for a lowercased utterance, or `None` when nothing
/// clears the minimum score.
pub(crate) fn best_category<'a>(text: &str, categories: &'a [Category]) -> Option<&'a Category> {
    let text = normalize(text);
    let mut best_match = None;
    let mut best_score = 0.0;

    for category in categories {
        let name = normalize(&category.name);
        if name.is_empty() {
            continue;
        }

        if text.contains(&name) {
            return Some(category);
        }
        if word_variations(&name)
            .iter()
            .any(|variation| text.contains(variation))
        {
            return Some(category);
        }

        let mut score = 0.0;
        for word in name.split(' ') {
            if word.is_empty() {
                continue;
            }
            if text.contains(word) {
                score += word.len() as f64;
            }
            for variation in word_variations(word) {
                if text.contains(&variation) {
                    score += word.len() as f64 * 0.9;
                }
            }
        }

        if score > best_score && score > MIN_SCORE {
            best_score = score;
            best_match = Some(category);
        }
    }

    best_match
}

/// Best payment mode for a lowercased utterance. Payment mode names
/// are short and literal, so no morphological variants are tried.
pub(crate) fn best_payment_mode<'a>(
    text: &str,
    modes: &'a [PaymentMode],
) -> Option<&'a PaymentMode> {
    let text = normalize(text);
    let mut best_match = None;
    let mut best_score = 0.0;

    for mode in modes {
        let name = normalize(&mode.name);
        if name.is_empty() {
            continue;
        }

        if text.contains(&name) {
            return Some(mode);
        }

        let mut score = 0.0;
        for word in name.split(' ') {
            if !word.is_empty() && text.contains(word) {
                score += word.len() as f64;
            }
        }

        if score > best_score && score > MIN_SCORE {
            best_score = score;
            best_match = Some(mode);
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryKind;
    use uuid::Uuid;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind: CategoryKind::Expense,
            icon: None,
            user_id: None,
        }
    }

    fn mode(name: &str, mode_type: i32) -> PaymentMode {
        PaymentMode {
            id: Uuid::new_v4(),
            name: name.to_string(),
            mode_type,
            icon: None,
            user_id: None,
        }
    }

    #[test]
    fn variations_cover_plural_and_singular() {
        assert!(word_variations("groceries").contains(&"grocery".to_string()));
        assert!(word_variations("grocery").contains(&"groceries".to_string()));
        assert!(word_variations("books").contains(&"book".to_string()));
        assert!(word_variations("book").contains(&"books".to_string()));
        assert!(word_variations("clothes").contains(&"cloth".to_string()));
    }

    #[test]
    fn exact_substring_wins() {
        let categories = vec![category("Food"), category("Fuel")];
        let hit = best_category("spent 20 on fuel", &categories).unwrap();
        assert_eq!(hit.name, "Fuel");
    }

    #[test]
    fn plural_text_matches_singular_category() {
        let categories = vec![category("Grocery")];
        let hit = best_category("bought groceries yesterday", &categories).unwrap();
        assert_eq!(hit.name, "Grocery");
    }

    #[test]
    fn partial_word_overlap_matches_multiword_name() {
        let categories = vec![category("Health Care")];
        let hit = best_category("paid for health checkup", &categories).unwrap();
        assert_eq!(hit.name, "Health Care");
    }

    #[test]
    fn diacritics_do_not_block_a_match() {
        let categories = vec![category("Café")];
        let hit = best_category("coffee at the cafe", &categories).unwrap();
        assert_eq!(hit.name, "Café");
    }

    #[test]
    fn low_overlap_is_rejected() {
        let categories = vec![category("Pets")];
        assert!(best_category("lunch downtown", &categories).is_none());
    }

    #[test]
    fn tie_keeps_first_candidate() {
        let categories = vec![category("Food Court"), category("Food Truck")];
        let hit = best_category("some food yesterday", &categories).unwrap();
        assert_eq!(hit.name, "Food Court");
    }

    #[test]
    fn payment_mode_matches_by_name() {
        let modes = vec![mode("Cash", 1), mode("Credit Card", 3)];
        let hit = best_payment_mode("paid using credit card", &modes).unwrap();
        assert_eq!(hit.name, "Credit Card");
    }

    #[test]
    fn payment_mode_partial_word_match() {
        let modes = vec![mode("Credit Card", 3)];
        let hit = best_payment_mode("put it on credit", &modes).unwrap();
        assert_eq!(hit.name, "Credit Card");
    }

    #[test]
    fn payment_mode_unknown_text_is_none() {
        let modes = vec![mode("Cash", 1)];
        assert!(best_payment_mode("wire transfer", &modes).is_none());
    }
}
