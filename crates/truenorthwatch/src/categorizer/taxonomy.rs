//! Keyword table mapping each category to the phrases that select it.
//!
//! The table ships as `data/categories.json`, embedded at build time and
//! validated once when the categorizer is built.

use serde::Deserialize;

use super::category::{Category, CategoryMap, UnknownCategory};
use crate::error::ConfigError;

const BUILTIN_TABLE: &str = include_str!("../../data/categories.json");

#[derive(Debug, Deserialize)]
struct TableFile {
    categories: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    name: String,
    keywords: Vec<String>,
}

/// Validated keyword lists, one per category.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    keywords: CategoryMap<Vec<String>>,
}

impl Taxonomy {
    /// Parses the embedded keyword table.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(BUILTIN_TABLE)
    }

    /// Parses a keyword table in the `data/categories.json` layout.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let file: TableFile = serde_json::from_str(content)?;

        let mut keywords: CategoryMap<Option<Vec<String>>> = CategoryMap::default();
        for entry in file.categories {
            let category: Category =
                entry
                    .name
                    .parse()
                    .map_err(|e: UnknownCategory| ConfigError::InvalidTaxonomy {
                        reason: e.to_string(),
                    })?;

            if keywords[category].is_some() {
                return Err(ConfigError::InvalidTaxonomy {
                    reason: format!("Duplicate category '{}'", category),
                });
            }

            validate_keywords(category, &entry.keywords)?;
            keywords[category] = Some(entry.keywords);
        }

        if let Some((missing, _)) = keywords.iter().find(|(_, k)| k.is_none()) {
            return Err(ConfigError::InvalidTaxonomy {
                reason: format!("Missing category '{}'", missing),
            });
        }

        Ok(Self {
            keywords: keywords.map(|_, k| k.unwrap_or_default()),
        })
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        self.keywords.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.keywords.iter().map(|(c, k)| (c, k.as_slice()))
    }
}

fn validate_keywords(category: Category, keywords: &[String]) -> Result<(), ConfigError> {
    if keywords.is_empty() {
        return Err(ConfigError::InvalidTaxonomy {
            reason: format!("Category '{}' has no keywords", category),
        });
    }

    for keyword in keywords {
        if keyword.trim().is_empty() {
            return Err(ConfigError::InvalidTaxonomy {
                reason: format!("Category '{}' has an empty keyword", category),
            });
        }
        if *keyword != keyword.to_lowercase() {
            return Err(ConfigError::InvalidTaxonomy {
                reason: format!(
                    "Keyword '{}' in category '{}' must be lowercase",
                    keyword, category
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(entries: &[(&str, &[&str])]) -> String {
        let categories: Vec<serde_json::Value> = entries
            .iter()
            .map(|(name, keywords)| serde_json::json!({ "name": name, "keywords": keywords }))
            .collect();
        serde_json::json!({ "categories": categories }).to_string()
    }

    const PLACEHOLDER: &[&str] = &["keyword"];

    fn full_table_except(skip: Option<Category>) -> Vec<(&'static str, &'static [&'static str])> {
        Category::ALL
            .into_iter()
            .filter(|c| Some(*c) != skip)
            .map(|c| (c.as_str(), PLACEHOLDER))
            .collect()
    }

    #[test]
    fn test_builtin_table_is_valid() {
        let taxonomy = Taxonomy::builtin().unwrap();
        assert_eq!(taxonomy.iter().count(), 15);
        assert!(taxonomy
            .keywords(Category::CostOfLiving)
            .contains(&"tax".to_string()));
        assert!(taxonomy
            .keywords(Category::DefenceAndNationalSecurity)
            .contains(&"nato".to_string()));
    }

    #[test]
    fn test_missing_category_rejected() {
        let json = table_with(&full_table_except(Some(Category::Housing)));
        let err = Taxonomy::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("Missing category 'Housing'"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut entries = full_table_except(None);
        entries.push(("Sports", &["hockey"]));
        let err = Taxonomy::from_json_str(&table_with(&entries)).unwrap_err();
        assert!(err.to_string().contains("Unknown category: 'Sports'"));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut entries = full_table_except(None);
        entries.push(("Housing", &["rent"]));
        let err = Taxonomy::from_json_str(&table_with(&entries)).unwrap_err();
        assert!(err.to_string().contains("Duplicate category 'Housing'"));
    }

    #[test]
    fn test_uppercase_keyword_rejected() {
        let mut entries = full_table_except(Some(Category::Housing));
        entries.push(("Housing", &["Rent"]));
        let err = Taxonomy::from_json_str(&table_with(&entries)).unwrap_err();
        assert!(err.to_string().contains("must be lowercase"));
    }

    #[test]
    fn test_empty_keyword_list_rejected() {
        let mut entries = full_table_except(Some(Category::Housing));
        entries.push(("Housing", &[]));
        let err = Taxonomy::from_json_str(&table_with(&entries)).unwrap_err();
        assert!(err.to_string().contains("has no keywords"));
    }
}
