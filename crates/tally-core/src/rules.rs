//! Keyword-based category suggestion
//!
//! Deterministic, synchronous, no I/O. Each rule is a set of keywords mapped
//! to one category; matching is case-insensitive substring search over the
//! transaction description. Table order is the priority: the first rule with
//! any matching keyword wins, so a description containing both "food" and
//! "gift" resolves to Food.

use crate::models::Category;

/// Ordered rule table: (keywords, category)
const RULES: &[(&[&str], Category)] = &[
    (
        &["grocery", "food", "restaurant", "supermarket", "cafe"],
        Category::Food,
    ),
    (
        &["gas", "uber", "taxi", "metro", "parking", "fuel"],
        Category::Transportation,
    ),
    (&["rent", "mortgage", "property"], Category::Housing),
    (
        &["movie", "netflix", "game", "cinema", "concert"],
        Category::Entertainment,
    ),
    (
        &["gift", "new year", "hongbao", "red envelope", "festival"],
        Category::Seasonal,
    ),
    (
        &["electric", "water bill", "internet", "phone bill", "utility"],
        Category::Utilities,
    ),
    (
        &["tuition", "course", "textbook", "school"],
        Category::Education,
    ),
    (
        &["pharmacy", "hospital", "doctor", "clinic", "dental"],
        Category::Medical,
    ),
    (
        &["flight", "hotel", "airbnb", "train ticket"],
        Category::Travel,
    ),
    (
        &["mall", "clothing", "shoes", "amazon", "taobao"],
        Category::Shopping,
    ),
];

/// Suggest a category for a description, or None if no rule matches
pub fn suggest(description: &str) -> Option<Category> {
    suggest_with_seasonal(description, true)
}

/// Suggest a category, optionally skipping the seasonal-spending rule
///
/// When `detect_seasonal` is false the Seasonal rule is ignored entirely;
/// later rules in the table can still match.
pub fn suggest_with_seasonal(description: &str, detect_seasonal: bool) -> Option<Category> {
    let haystack = description.to_lowercase();

    for (keywords, category) in RULES {
        if *category == Category::Seasonal && !detect_seasonal {
            continue;
        }
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return Some(*category);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_housing_keywords() {
        assert_eq!(suggest("Monthly Rent"), Some(Category::Housing));
        assert_eq!(suggest("MORTGAGE PAYMENT"), Some(Category::Housing));
    }

    #[test]
    fn test_food_keywords() {
        assert_eq!(suggest("Grocery Shopping"), Some(Category::Food));
        assert_eq!(suggest("fast food drive-thru"), Some(Category::Food));
        assert_eq!(suggest("Thai Restaurant"), Some(Category::Food));
    }

    #[test]
    fn test_transportation_keywords() {
        assert_eq!(suggest("Gas Station"), Some(Category::Transportation));
        assert_eq!(suggest("UBER TRIP"), Some(Category::Transportation));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(suggest("Mystery charge 4921"), None);
        assert_eq!(suggest(""), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(suggest("NETFLIX.COM"), Some(Category::Entertainment));
        assert_eq!(suggest("netflix subscription"), Some(Category::Entertainment));
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        // "food" (Food rule) appears before "gift" (Seasonal rule) in the table
        assert_eq!(suggest("food gift basket"), Some(Category::Food));
        // Seasonal-only keywords still resolve to Seasonal
        assert_eq!(suggest("new year hongbao"), Some(Category::Seasonal));
    }

    #[test]
    fn test_seasonal_toggle() {
        assert_eq!(
            suggest_with_seasonal("birthday gift", true),
            Some(Category::Seasonal)
        );
        assert_eq!(suggest_with_seasonal("birthday gift", false), None);
        // Non-seasonal rules unaffected by the toggle
        assert_eq!(
            suggest_with_seasonal("grocery run", false),
            Some(Category::Food)
        );
    }
}
