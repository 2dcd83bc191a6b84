//! Argument coercion for values handed over from page scripts.

/// Path ids arrive as JS numbers or strings; numbers must be integral.
pub(crate) fn format_id_number(value: f64) -> Option<String> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    Some(format!("{value:.0}"))
}

/// Largest integer a JS number holds exactly (`Number.MAX_SAFE_INTEGER`).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Minute and point amounts: integral and exactly representable. The sign is
/// kept so the backend can reject non-positive values itself.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn integral_amount(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER {
        return None;
    }
    Some(value as i64)
}

pub(crate) fn non_empty_id(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
