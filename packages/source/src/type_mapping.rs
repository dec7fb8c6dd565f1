//! Incident category to focus group mapping.
//!
//! SFPD's `Incident Category` vocabulary changed when the department moved
//! to its 2018 reporting system, so both naming schemes (`LARCENY/THEFT`
//! vs `Larceny Theft`, `WEAPON LAWS` vs `Weapons Offense`, ...) appear in the
//! merged dataset. This module maps either spelling to the same
//! [`FocusGroup`]. Lookups are case-insensitive and anything absent from the
//! table falls back to [`FocusGroup::CATCH_ALL`].

use std::collections::HashMap;
use std::sync::LazyLock;

use sf_crime_crime_models::FocusGroup;

/// Lower-cased category → focus group.
///
/// Some entries map to [`FocusGroup::OtherSuspicious`] explicitly. They
/// produce the same label as an unknown category and are reported as
/// unmapped, but keeping them here documents that they were reviewed.
pub const FOCUS_GROUP_TABLE: &[(&str, FocusGroup)] = &[
    // ── Violent Crime ───────────────────────────────────────────────
    ("assault", FocusGroup::ViolentCrime),
    ("robbery", FocusGroup::ViolentCrime),
    ("kidnapping", FocusGroup::ViolentCrime),
    ("homicide", FocusGroup::ViolentCrime),
    ("extortion", FocusGroup::ViolentCrime),
    // ── Sex Offenses ────────────────────────────────────────────────
    ("sex offenses, forcible", FocusGroup::SexOffenses),
    ("sex offenses, non forcible", FocusGroup::SexOffenses),
    ("sex offense", FocusGroup::SexOffenses),
    ("rape", FocusGroup::SexOffenses),
    (
        "human trafficking (a), commercial sex acts",
        FocusGroup::SexOffenses,
    ),
    (
        "human trafficking, commercial sex acts",
        FocusGroup::SexOffenses,
    ),
    (
        "human trafficking (b), involuntary servitude",
        FocusGroup::SexOffenses,
    ),
    // ── Property Crime ──────────────────────────────────────────────
    ("vehicle theft", FocusGroup::PropertyCrime),
    ("larceny/theft", FocusGroup::PropertyCrime),
    ("larceny theft", FocusGroup::PropertyCrime),
    ("burglary", FocusGroup::PropertyCrime),
    ("arson", FocusGroup::PropertyCrime),
    ("vandalism", FocusGroup::PropertyCrime),
    ("malicious mischief", FocusGroup::PropertyCrime),
    ("stolen property", FocusGroup::PropertyCrime),
    ("motor vehicle theft", FocusGroup::PropertyCrime),
    ("motor vehicle theft?", FocusGroup::PropertyCrime),
    ("vehicle misplaced", FocusGroup::PropertyCrime),
    ("vehicle impounded", FocusGroup::PropertyCrime),
    ("trespass", FocusGroup::PropertyCrime),
    ("bad checks", FocusGroup::PropertyCrime),
    // ── Financial Crime ─────────────────────────────────────────────
    ("fraud", FocusGroup::FinancialCrime),
    ("forgery/counterfeiting", FocusGroup::FinancialCrime),
    ("forgery and counterfeiting", FocusGroup::FinancialCrime),
    ("embezzlement", FocusGroup::FinancialCrime),
    ("bribery", FocusGroup::FinancialCrime),
    // ── Drug & Alcohol ──────────────────────────────────────────────
    ("drug/narcotic", FocusGroup::DrugAlcohol),
    ("drug offense", FocusGroup::DrugAlcohol),
    ("drug violation", FocusGroup::DrugAlcohol),
    ("driving under the influence", FocusGroup::DrugAlcohol),
    ("drunkenness", FocusGroup::DrugAlcohol),
    ("liquor laws", FocusGroup::DrugAlcohol),
    // ── Weapons ─────────────────────────────────────────────────────
    ("weapon laws", FocusGroup::Weapons),
    ("weapons offense", FocusGroup::Weapons),
    ("weapons offence", FocusGroup::Weapons),
    ("weapons carrying etc", FocusGroup::Weapons),
    // ── Public Order ────────────────────────────────────────────────
    ("disorderly conduct", FocusGroup::PublicOrder),
    ("loitering", FocusGroup::PublicOrder),
    ("prostitution", FocusGroup::PublicOrder),
    ("gambling", FocusGroup::PublicOrder),
    ("pornography/obscene mat", FocusGroup::PublicOrder),
    ("civil sidewalks", FocusGroup::PublicOrder),
    ("trea", FocusGroup::PublicOrder),
    (
        "offences against the family and children",
        FocusGroup::PublicOrder,
    ),
    // ── Administrative ──────────────────────────────────────────────
    ("warrants", FocusGroup::Administrative),
    ("warrant", FocusGroup::Administrative),
    ("secondary codes", FocusGroup::Administrative),
    ("traffic violation arrest", FocusGroup::Administrative),
    ("traffic collision", FocusGroup::Administrative),
    ("case closure", FocusGroup::Administrative),
    ("courtesy report", FocusGroup::Administrative),
    ("fire report", FocusGroup::Administrative),
    // ── Non-Criminal ────────────────────────────────────────────────
    ("non-criminal", FocusGroup::NonCriminal),
    ("missing person", FocusGroup::NonCriminal),
    ("lost property", FocusGroup::NonCriminal),
    ("suicide", FocusGroup::NonCriminal),
    // Recovered vehicles are reports of found property, not thefts.
    ("recovered vehicle", FocusGroup::NonCriminal),
    // ── Other/Suspicious ────────────────────────────────────────────
    ("other offenses", FocusGroup::OtherSuspicious),
    ("other", FocusGroup::OtherSuspicious),
    ("other miscellaneous", FocusGroup::OtherSuspicious),
    ("miscellaneous investigation", FocusGroup::OtherSuspicious),
    ("suspicious occ", FocusGroup::OtherSuspicious),
    ("suspicious", FocusGroup::OtherSuspicious),
];

static LOOKUP: LazyLock<HashMap<&'static str, FocusGroup>> =
    LazyLock::new(|| FOCUS_GROUP_TABLE.iter().copied().collect());

/// Looks up a raw category in the table, case-insensitively.
///
/// Returns `None` for categories the table doesn't know about.
#[must_use]
pub fn lookup_focus_group(raw: &str) -> Option<FocusGroup> {
    LOOKUP.get(raw.to_lowercase().as_str()).copied()
}

/// Maps a raw `Incident Category` value to its focus group.
///
/// Never fails: unknown categories map to [`FocusGroup::CATCH_ALL`].
#[must_use]
pub fn map_focus_group(raw: &str) -> FocusGroup {
    lookup_focus_group(raw).unwrap_or(FocusGroup::CATCH_ALL)
}
