/// Punctuation dropped before answers are compared
pub const STRIPPED_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

pub trait Normalizer {
    // Default comparison form: lowercase, no punctuation, single spaces
    fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = lowered.replace(STRIPPED_PUNCTUATION, "");

        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct DefaultNormalizer;
impl Normalizer for DefaultNormalizer {}

/// Canonical form used by the scorer
pub fn normalize(text: &str) -> String {
    DefaultNormalizer.normalize(text)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Hello,   World! "), "hello world");
        assert_eq!(normalize("Wait; what?"), "wait what");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" .,!?;: "), "");
    }

    #[test]
    fn test_normalize_keeps_other_symbols() {
        assert_eq!(normalize("don't"), "don't");
        assert_eq!(normalize("食べる。"), "食べる。");
    }

    #[test]
    fn test_normalize_collapses_tabs_and_newlines() {
        assert_eq!(normalize("I\tate\n\nrice"), "i ate rice");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "[a-zA-Z0-9 .,!?;:'\t\nあ-ん]{0,48}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
