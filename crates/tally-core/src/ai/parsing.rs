//! Label extraction from AI model responses
//!
//! Model output is free-form text; the label usually arrives alone but can be
//! wrapped in quotes, backticks, or a short sentence. These helpers pull out
//! the label and resolve it against the allowed vocabulary.

use crate::error::{Error, Result};
use crate::models::Category;

use super::LabelResponse;

/// Extract a category label from a model response and resolve it
///
/// Fails only when no label can be extracted at all. An extracted label that
/// is not in `allowed` is surfaced with `category: None` so the caller can
/// apply its own fallback policy.
pub fn extract_label(response: &str, allowed: &[Category]) -> Result<LabelResponse> {
    let line = response
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| Error::Categorization("Empty AI response".into()))?;

    let label = line
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches('.')
        .trim();

    if label.is_empty() {
        return Err(Error::Categorization(format!(
            "No label found in AI response: {}",
            truncate(response)
        )));
    }

    Ok(LabelResponse {
        label: label.to_string(),
        category: resolve_label(label, allowed),
    })
}

/// Resolve a label against the allowed set, case-insensitively
pub fn resolve_label(label: &str, allowed: &[Category]) -> Option<Category> {
    let label = label.trim();
    allowed
        .iter()
        .copied()
        .find(|c| c.as_str().eq_ignore_ascii_case(label))
}

fn truncate(s: &str) -> String {
    if s.len() > 200 {
        format!("{}...", &s[..200])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_label() {
        let result = extract_label("Food", &Category::ALL).unwrap();
        assert_eq!(result.label, "Food");
        assert_eq!(result.category, Some(Category::Food));
    }

    #[test]
    fn test_extract_quoted_label() {
        let result = extract_label("\"Transportation\"", &Category::ALL).unwrap();
        assert_eq!(result.category, Some(Category::Transportation));
    }

    #[test]
    fn test_extract_first_line_with_trailing_period() {
        let result = extract_label("Housing.\nBecause rent is housing.", &Category::ALL).unwrap();
        assert_eq!(result.label, "Housing");
        assert_eq!(result.category, Some(Category::Housing));
    }

    #[test]
    fn test_extract_out_of_vocabulary_label() {
        let result = extract_label("Not A Category", &Category::ALL).unwrap();
        assert_eq!(result.label, "Not A Category");
        assert_eq!(result.category, None);
    }

    #[test]
    fn test_extract_empty_response_fails() {
        assert!(extract_label("", &Category::ALL).is_err());
        assert!(extract_label("  \n  ", &Category::ALL).is_err());
    }

    #[test]
    fn test_resolve_case_insensitive() {
        assert_eq!(resolve_label("food", &Category::ALL), Some(Category::Food));
        assert_eq!(resolve_label("FOOD", &Category::ALL), Some(Category::Food));
        assert_eq!(resolve_label("groceries", &Category::ALL), None);
    }

    #[test]
    fn test_resolve_respects_restricted_set() {
        let subset = [Category::Food, Category::Housing];
        assert_eq!(resolve_label("Travel", &subset), None);
    }
}
