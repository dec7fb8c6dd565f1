//! Text normalization for free-text columns.

/// Converts `s` to title case.
///
/// A letter is upper-cased when the character before it is not a letter
/// and lower-cased otherwise, so `"MISSION"`, `"mission"` and `"Mission"`
/// all become `"Mission"` and `"OUT OF SF"` becomes `"Out Of Sf"`.
/// Non-letters pass through unchanged.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}
