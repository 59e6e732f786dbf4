use super::category::{Category, CategoryMap};
use super::taxonomy::Taxonomy;
use crate::error::ConfigError;

/// Platform text grouped by category. Every category is present; categories
/// without a matching paragraph hold an empty string.
pub type CategorizedText = CategoryMap<String>;

pub struct Categorizer {
    taxonomy: Taxonomy,
}

impl Categorizer {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Builds a categorizer over the embedded keyword table.
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self::new(Taxonomy::builtin()?))
    }

    /// Splits `text` into paragraphs on runs of newlines and appends each
    /// paragraph (plus `\n`) to every category with a keyword occurring in it.
    ///
    /// Matching is a case-insensitive substring test, so `tax` also matches
    /// `taxation`. A paragraph can land in several categories.
    pub fn categorize(&self, text: &str) -> CategorizedText {
        let mut categorized = CategorizedText::default();

        for paragraph in paragraphs(text) {
            let lowered = paragraph.to_lowercase();
            for (category, keywords) in self.taxonomy.iter() {
                if matches_any(&lowered, keywords) {
                    let bucket = categorized.get_mut(category);
                    bucket.push_str(paragraph);
                    bucket.push('\n');
                }
            }
        }

        categorized
    }

    /// Categories that received at least one paragraph.
    pub fn matched_categories(categorized: &CategorizedText) -> Vec<Category> {
        categorized
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(category, _)| category)
            .collect()
    }
}

/// Maximal runs of text between runs of `\n`. Empty segments are dropped.
fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|p| !p.is_empty())
}

/// Keywords are stored lowercase, so `lowered` must already be lowercase.
fn matches_any(lowered: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| lowered.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorizer() -> Categorizer {
        Categorizer::builtin().unwrap()
    }

    #[test]
    fn test_all_categories_present_for_empty_input() {
        let result = categorizer().categorize("");
        assert_eq!(result.len(), 15);
        assert!(result.iter().all(|(_, text)| text.is_empty()));
    }

    #[test]
    fn test_substring_match_in_multiple_categories() {
        let text = "We will reduce taxes and invest in renewable energy.";
        let result = categorizer().categorize(text);

        let expected = format!("{}\n", text);
        assert_eq!(result[Category::CostOfLiving], expected);
        assert_eq!(result[Category::ClimateChangeAndEnergy], expected);
        assert_eq!(
            Categorizer::matched_categories(&result),
            vec![Category::ClimateChangeAndEnergy, Category::CostOfLiving]
        );
    }

    #[test]
    fn test_paragraphs_routed_separately() {
        let text = "Para one about housing.\n\nPara two about defence and nato.";
        let result = categorizer().categorize(text);

        assert_eq!(result[Category::Housing], "Para one about housing.\n");
        assert_eq!(
            result[Category::DefenceAndNationalSecurity],
            "Para two about defence and nato.\n"
        );
        assert_eq!(Categorizer::matched_categories(&result).len(), 2);
    }

    #[test]
    fn test_case_insensitive_match() {
        let result = categorizer().categorize("PHARMACARE FOR ALL");
        assert_eq!(result[Category::HealthCare], "PHARMACARE FOR ALL\n");
    }

    #[test]
    fn test_keyword_matches_inside_longer_word() {
        let result = categorizer().categorize("Taxation policy");
        assert_eq!(result[Category::CostOfLiving], "Taxation policy\n");
    }

    #[test]
    fn test_multiple_paragraphs_accumulate_in_order() {
        let text = "Lower the tax burden.\nNo new tax on groceries.";
        let result = categorizer().categorize(text);
        assert_eq!(
            result[Category::CostOfLiving],
            "Lower the tax burden.\nNo new tax on groceries.\n"
        );
    }

    #[test]
    fn test_newline_runs_and_edges_produce_no_empty_paragraphs() {
        let result = categorizer().categorize("\n\n\nhousing\n\n\n");
        assert_eq!(result[Category::Housing], "housing\n");
    }

    #[test]
    fn test_unmatched_text_yields_empty_buckets() {
        let result = categorizer().categorize("Nothing relevant here.");
        assert!(Categorizer::matched_categories(&result).is_empty());
    }

    #[test]
    fn test_categorize_is_deterministic() {
        let c = categorizer();
        let text = "Invest in transit infrastructure.\n\nStrengthen NATO commitments.";
        assert_eq!(c.categorize(text), c.categorize(text));
    }
}
