#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Focus group taxonomy for San Francisco incident categories.
//!
//! SFPD has renamed its incident categories over the years, so the raw
//! `Incident Category` vocabulary mixes old and new naming schemes. Every
//! category is collapsed into one of the coarse [`FocusGroup`] labels
//! defined here, with [`FocusGroup::OtherSuspicious`] as the catch-all.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coarse category label appended to every incident as `Focus Group`.
///
/// The string form of each variant is the exact label written to the
/// grouped CSV.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum FocusGroup {
    /// Assault, robbery, kidnapping, homicide, extortion
    #[serde(rename = "Violent Crime")]
    #[strum(serialize = "Violent Crime")]
    ViolentCrime,
    /// Forcible and non-forcible sex offenses, human trafficking
    #[serde(rename = "Sex Offenses")]
    #[strum(serialize = "Sex Offenses")]
    SexOffenses,
    /// Theft, burglary, arson, vandalism, stolen and recovered property
    #[serde(rename = "Property Crime")]
    #[strum(serialize = "Property Crime")]
    PropertyCrime,
    /// Fraud, forgery, embezzlement, bribery
    #[serde(rename = "Financial Crime")]
    #[strum(serialize = "Financial Crime")]
    FinancialCrime,
    /// Narcotics, DUI, drunkenness, liquor laws
    #[serde(rename = "Drug & Alcohol")]
    #[strum(serialize = "Drug & Alcohol")]
    DrugAlcohol,
    /// Weapon possession and carrying offenses
    #[serde(rename = "Weapons")]
    #[strum(serialize = "Weapons")]
    Weapons,
    /// Quality-of-life offenses (disorderly conduct, loitering, gambling)
    #[serde(rename = "Public Order")]
    #[strum(serialize = "Public Order")]
    PublicOrder,
    /// Warrants, traffic, case closures and other paperwork categories
    #[serde(rename = "Administrative")]
    #[strum(serialize = "Administrative")]
    Administrative,
    /// Missing persons, lost property, suicide and other non-crimes
    #[serde(rename = "Non-Criminal")]
    #[strum(serialize = "Non-Criminal")]
    NonCriminal,
    /// Catch-all for categories that aren't in the lookup table
    #[serde(rename = "Other/Suspicious")]
    #[strum(serialize = "Other/Suspicious")]
    OtherSuspicious,
}

impl FocusGroup {
    /// The label assigned to any category missing from the lookup table.
    pub const CATCH_ALL: Self = Self::OtherSuspicious;

    /// Returns all variants of this enum, catch-all last.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ViolentCrime,
            Self::SexOffenses,
            Self::PropertyCrime,
            Self::FinancialCrime,
            Self::DrugAlcohol,
            Self::Weapons,
            Self::PublicOrder,
            Self::Administrative,
            Self::NonCriminal,
            Self::OtherSuspicious,
        ]
    }

    /// Returns the label written to the `Focus Group` column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViolentCrime => "Violent Crime",
            Self::SexOffenses => "Sex Offenses",
            Self::PropertyCrime => "Property Crime",
            Self::FinancialCrime => "Financial Crime",
            Self::DrugAlcohol => "Drug & Alcohol",
            Self::Weapons => "Weapons",
            Self::PublicOrder => "Public Order",
            Self::Administrative => "Administrative",
            Self::NonCriminal => "Non-Criminal",
            Self::OtherSuspicious => "Other/Suspicious",
        }
    }

    /// Whether this is the catch-all label.
    #[must_use]
    pub const fn is_catch_all(self) -> bool {
        matches!(self, Self::OtherSuspicious)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn label_matches_display_and_parse() {
        for group in FocusGroup::all() {
            assert_eq!(group.to_string(), group.label());
            assert_eq!(group.as_ref(), group.label());
            assert_eq!(FocusGroup::from_str(group.label()).unwrap(), *group);
        }
    }

    #[test]
    fn exactly_one_catch_all() {
        let catch_alls: Vec<_> = FocusGroup::all()
            .iter()
            .filter(|g| g.is_catch_all())
            .collect();
        assert_eq!(catch_alls, vec![&FocusGroup::CATCH_ALL]);
        assert_eq!(FocusGroup::all().len(), 10);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&FocusGroup::DrugAlcohol).unwrap();
        assert_eq!(json, "\"Drug & Alcohol\"");
        let parsed: FocusGroup = serde_json::from_str("\"Other/Suspicious\"").unwrap();
        assert_eq!(parsed, FocusGroup::OtherSuspicious);
    }
}
