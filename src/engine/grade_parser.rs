//! Deterministic grade-name parser (§4.1). Maps a display string to an ordered
//! list of concrete grade names drawn from the supplied vocabulary. Never invents
//! a grade; electives and unresolved strings both resolve to `[]`.

use crate::types::Grade;

/// Parse a `grade_display` string against the available grade vocabulary.
///
/// Resolution order, first match wins:
/// (a) contains "elective" (any case) -> `[]`
/// (b) exact match against an available grade name -> that grade, alone
/// (c) a range like "6th-11th Grade" -> every available grade in `[min, max]`
///     by `sort_order`, ascending
/// (d) a single number like "6th Grade" -> the grade with that number, if present
/// (e) "kindergarten" (any case, substring) -> the available Kindergarten grade
/// (f) otherwise -> `[]`
pub fn parse_grades(display: &str, available: &[Grade]) -> Vec<Grade> {
    let lower = display.to_lowercase();

    if lower.contains("elective") {
        return Vec::new();
    }

    if let Some(exact) = available.iter().find(|g| g.name == display) {
        return vec![exact.clone()];
    }

    if let Some((lo, hi)) = parse_range(&lower) {
        let (min, max) = (lo.min(hi), lo.max(hi));
        let mut matches: Vec<Grade> = available
            .iter()
            .filter(|g| (min..=max).contains(&g.sort_order))
            .cloned()
            .collect();
        matches.sort_by_key(|g| g.sort_order);
        if !matches.is_empty() {
            return matches;
        }
    }

    if let Some(n) = parse_single_number(&lower) {
        if let Some(g) = available.iter().find(|g| g.sort_order == n) {
            return vec![g.clone()];
        }
    }

    if lower.contains("kindergarten") {
        if let Some(g) = available.iter().find(|g| g.name.to_lowercase() == "kindergarten") {
            return vec![g.clone()];
        }
    }

    Vec::new()
}

/// Parse `"6th-11th"`-style ranges, stripping ordinal suffixes and the word "grade".
fn parse_range(lower: &str) -> Option<(u8, u8)> {
    let stripped = lower.replace("grade", "");
    let stripped = stripped.trim();
    let (left, right) = stripped.split_once('-')?;
    let lo = parse_ordinal(left.trim())?;
    let hi = parse_ordinal(right.trim())?;
    Some((lo, hi))
}

fn parse_single_number(lower: &str) -> Option<u8> {
    let stripped = lower.replace("grade", "");
    parse_ordinal(stripped.trim())
}

/// Parse `"6"`, `"6th"`, `"1st"`, `"2nd"`, `"3rd"` into their leading digits.
fn parse_ordinal(s: &str) -> Option<u8> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
