use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[\s\-().]").unwrap();
    static ref NON_DIGITS: Regex = Regex::new(r"\D").unwrap();
    static ref E164ISH: Regex = Regex::new(r"^\+\d+$").unwrap();
    static ref RESPONDENT_PHONE: Regex = Regex::new(r"^\+?\d{10,15}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Ir,
    Us,
}

impl Region {
    /// `+1…` numbers are US, everything else is read as Iranian.
    pub fn detect(raw: &str) -> Self {
        if raw.trim().starts_with("+1") { Region::Us } else { Region::Ir }
    }
}

/// Normalizes a phone number to `+<digits>`, or `None` when it cannot be.
///
/// Numbers without a country prefix are read as local numbers of `region`.
pub fn normalize_phone(raw: &str, region: Region) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let mut s = SEPARATORS.replace_all(raw.trim(), "").into_owned();

    if s.starts_with("00") {
        s.replace_range(..2, "+");
    }

    if !s.starts_with('+') {
        match region {
            Region::Ir => {
                let local = s.strip_prefix('0').unwrap_or(&s).to_string();
                s = format!("+98{}", local);
            }
            Region::Us => {
                let mut digits = NON_DIGITS.replace_all(&s, "").into_owned();
                if digits.len() == 11 && digits.starts_with('1') {
                    digits.remove(0);
                }
                if digits.len() != 10 {
                    return None;
                }
                s = format!("+1{}", digits);
            }
        }
    }

    // +98 0912… -> +98 912…
    if let Some(rest) = s.strip_prefix("+98").map(str::to_string) {
        let rest = rest.strip_prefix('0').unwrap_or(&rest);
        s = format!("+98{}", rest);
    }

    if let Some(rest) = s.strip_prefix("+1").map(str::to_string) {
        let digits = NON_DIGITS.replace_all(&rest, "").into_owned();
        s = match digits.len() {
            11 if digits.starts_with('1') => format!("+1{}", &digits[1..]),
            10 => format!("+1{}", digits),
            _ => return None,
        };
    }

    if E164ISH.is_match(&s) { Some(s) } else { None }
}

/// Phone check for respondents on sheets that require one.
pub fn is_respondent_phone_valid(required: bool, phone: &str) -> bool {
    if !required {
        return true;
    }

    let sanitized: String = phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    !sanitized.is_empty() && RESPONDENT_PHONE.is_match(&sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iranian_local_numbers() {
        assert_eq!(normalize_phone("0912 345 6789", Region::Ir).as_deref(), Some("+989123456789"));
        assert_eq!(normalize_phone("912-345-6789", Region::Ir).as_deref(), Some("+989123456789"));
        assert_eq!(normalize_phone("+98 0912 345 6789", Region::Ir).as_deref(), Some("+989123456789"));
        assert_eq!(normalize_phone("0098 912 345 6789", Region::Ir).as_deref(), Some("+989123456789"));
    }

    #[test]
    fn us_numbers() {
        assert_eq!(normalize_phone("(415) 555-0100", Region::Us).as_deref(), Some("+14155550100"));
        assert_eq!(normalize_phone("1 415 555 0100", Region::Us).as_deref(), Some("+14155550100"));
        assert_eq!(normalize_phone("+1 415.555.0100", Region::Us).as_deref(), Some("+14155550100"));
        assert_eq!(normalize_phone("555-0100", Region::Us), None);
        assert_eq!(normalize_phone("+1 555", Region::Ir), None);
    }

    #[test]
    fn rejects_junk() {
        assert_eq!(normalize_phone("", Region::Ir), None);
        assert_eq!(normalize_phone("call me", Region::Ir), None);
    }

    #[test]
    fn region_detection() {
        assert_eq!(Region::detect(" +1 415"), Region::Us);
        assert_eq!(Region::detect("0912"), Region::Ir);
    }

    #[test]
    fn respondent_phone_rules() {
        assert!(is_respondent_phone_valid(false, ""));
        assert!(!is_respondent_phone_valid(true, ""));
        assert!(is_respondent_phone_valid(true, "+98 912 345 6789"));
        assert!(!is_respondent_phone_valid(true, "12345"));
    }
}
