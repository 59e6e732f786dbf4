//! The fixed set of policy categories and a total map keyed by them.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A policy topic. The set is closed and known at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Climate Change and Energy")]
    ClimateChangeAndEnergy,
    #[serde(rename = "Cost of Living (including Taxes)")]
    CostOfLiving,
    #[serde(rename = "Crime and Justice")]
    CrimeAndJustice,
    #[serde(rename = "Defence and National Security")]
    DefenceAndNationalSecurity,
    #[serde(rename = "Education and Training")]
    EducationAndTraining,
    #[serde(rename = "Foreign Policy")]
    ForeignPolicy,
    #[serde(rename = "Government Spending and Fiscal Policy")]
    GovernmentSpending,
    #[serde(rename = "Gun Control")]
    GunControl,
    #[serde(rename = "Health Care")]
    HealthCare,
    #[serde(rename = "Housing")]
    Housing,
    #[serde(rename = "Immigration")]
    Immigration,
    #[serde(rename = "Indigenous Affairs")]
    IndigenousAffairs,
    #[serde(rename = "Infrastructure")]
    Infrastructure,
    #[serde(rename = "Jobs and Employment")]
    JobsAndEmployment,
    #[serde(rename = "International Trade and Relations")]
    InternationalTrade,
}

impl Category {
    pub const COUNT: usize = 15;

    /// All categories in canonical order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::ClimateChangeAndEnergy,
        Category::CostOfLiving,
        Category::CrimeAndJustice,
        Category::DefenceAndNationalSecurity,
        Category::EducationAndTraining,
        Category::ForeignPolicy,
        Category::GovernmentSpending,
        Category::GunControl,
        Category::HealthCare,
        Category::Housing,
        Category::Immigration,
        Category::IndigenousAffairs,
        Category::Infrastructure,
        Category::JobsAndEmployment,
        Category::InternationalTrade,
    ];

    /// The display name, which is also the persisted identity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ClimateChangeAndEnergy => "Climate Change and Energy",
            Category::CostOfLiving => "Cost of Living (including Taxes)",
            Category::CrimeAndJustice => "Crime and Justice",
            Category::DefenceAndNationalSecurity => "Defence and National Security",
            Category::EducationAndTraining => "Education and Training",
            Category::ForeignPolicy => "Foreign Policy",
            Category::GovernmentSpending => "Government Spending and Fiscal Policy",
            Category::GunControl => "Gun Control",
            Category::HealthCare => "Health Care",
            Category::Housing => "Housing",
            Category::Immigration => "Immigration",
            Category::IndigenousAffairs => "Indigenous Affairs",
            Category::Infrastructure => "Infrastructure",
            Category::JobsAndEmployment => "Jobs and Employment",
            Category::InternationalTrade => "International Trade and Relations",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A map holding exactly one value for every [`Category`].
///
/// Totality is structural: there is no way to build a `CategoryMap` with a
/// missing key, so every categorization and stance result has 15 entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap<T> {
    values: [T; Category::COUNT],
}

impl<T> CategoryMap<T> {
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            values: Category::ALL.map(&mut f),
        }
    }

    pub fn get(&self, category: Category) -> &T {
        &self.values[category.index()]
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        &mut self.values[category.index()]
    }

    pub fn len(&self) -> usize {
        Category::COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.values.iter())
    }

    pub fn map<U>(self, mut f: impl FnMut(Category, T) -> U) -> CategoryMap<U> {
        let mut position = 0;
        CategoryMap {
            values: self.values.map(|value| {
                let category = Category::ALL[position];
                position += 1;
                f(category, value)
            }),
        }
    }
}

impl<T: Default> Default for CategoryMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Category> for CategoryMap<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        self.get(category)
    }
}

impl<T> IndexMut<Category> for CategoryMap<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        self.get_mut(category)
    }
}

impl<T: Serialize> Serialize for CategoryMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.as_str(), value)?;
        }
        map.end()
    }
}
