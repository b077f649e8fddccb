//! Splitting raw verb tokens into a base infinitive and a reflexive flag.

/// Parse a raw token like `llamar`, `llamarse` or `llamar(se)` into
/// `(base_infinitive, is_reflexive)`. A trailing `(se)` always marks the
/// verb reflexive; a trailing `se` only does when the remainder ends in one
/// of the three infinitive endings. Never fails; unrecognized tokens come
/// back trimmed and non-reflexive.
pub fn split_reflexive(raw: &str) -> (String, bool) {
    let token = raw.trim();

    if let Some(base) = token.strip_suffix("(se)") {
        return (base.trim().to_string(), true);
    }

    if let Some(base) = token.strip_suffix("se") {
        if !base.is_empty()
            && (base.ends_with("ar") || base.ends_with("er") || base.ends_with("ir"))
        {
            return (base.trim().to_string(), true);
        }
    }

    (token.to_string(), false)
}

#[cfg(test)]
mod tests {
    use super::split_reflexive;

    #[test]
    fn parenthesized_suffix_is_reflexive() {
        assert_eq!(split_reflexive("llamar(se)"), ("llamar".to_string(), true));
        assert_eq!(split_reflexive("  ir(se) "), ("ir".to_string(), true));
    }

    #[test]
    fn fused_suffix_requires_an_infinitive_ending() {
        assert_eq!(split_reflexive("llamarse"), ("llamar".to_string(), true));
        assert_eq!(split_reflexive("ponerse"), ("poner".to_string(), true));
        assert_eq!(split_reflexive("aburrirse"), ("aburrir".to_string(), true));
        // "mese" would leave "me", which is not an infinitive.
        assert_eq!(split_reflexive("mese"), ("mese".to_string(), false));
        assert_eq!(split_reflexive("se"), ("se".to_string(), false));
    }

    #[test]
    fn plain_tokens_pass_through_trimmed() {
        assert_eq!(split_reflexive("llamar"), ("llamar".to_string(), false));
        assert_eq!(split_reflexive("  comer\n"), ("comer".to_string(), false));
    }
}
