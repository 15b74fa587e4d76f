//! Towns and their daily activity summary.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TownId;

/// Validation errors for [`TownName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TownValidationError {
    /// Name was empty once trimmed.
    #[error("town name must not be blank")]
    BlankName,
}

/// Trimmed, non-blank town name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TownName(String);

impl TownName {
    /// Validate and construct a town name.
    ///
    /// # Examples
    /// ```
    /// use ayuda::domain::TownName;
    ///
    /// let name = TownName::new("  Alfafar ").expect("valid name");
    /// assert_eq!(name.as_ref(), "Alfafar");
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self, TownValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TownValidationError::BlankName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TownName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TownName> for String {
    fn from(value: TownName) -> Self {
        value.0
    }
}

impl TryFrom<String> for TownName {
    type Error = TownValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Town {
    pub id: TownId,
    pub name: TownName,
}

/// Per-town counters over the last 24 hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownSummary {
    pub town_id: TownId,
    pub town_name: String,
    pub offers_last_24h: u32,
    pub needs_last_24h: u32,
    pub unassigned_needs: u32,
}

impl TownSummary {
    /// True when any counter is positive; only such rows are reported.
    pub fn has_activity(&self) -> bool {
        self.offers_last_24h > 0 || self.needs_last_24h > 0 || self.unassigned_needs > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_rejected(#[case] raw: &str) {
        assert_eq!(TownName::new(raw), Err(TownValidationError::BlankName));
    }

    #[rstest]
    #[case(0, 0, 0, false)]
    #[case(1, 0, 0, true)]
    #[case(0, 2, 0, true)]
    #[case(0, 0, 3, true)]
    fn activity_requires_a_positive_counter(
        #[case] offers: u32,
        #[case] needs: u32,
        #[case] unassigned: u32,
        #[case] expected: bool,
    ) {
        let summary = TownSummary {
            town_id: TownId::new(1),
            town_name: "Sedaví".to_owned(),
            offers_last_24h: offers,
            needs_last_24h: needs,
            unassigned_needs: unassigned,
        };
        assert_eq!(summary.has_activity(), expected);
    }
}
