//! Text folding shared by search and masking.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercase, decompose (NFD) and drop combining marks, for
/// accent-insensitive matching.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|&ch| !is_combining_mark(ch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_case() {
        assert_eq!(fold("Pequena Miss Sunshine"), "pequena miss sunshine");
        assert_eq!(fold("Ação É Coração"), "acao e coracao");
        assert_eq!(fold("Señor Ñandú"), "senor nandu");
    }

    #[test]
    fn folds_letters_beyond_latin_1() {
        assert_eq!(fold("Nguyễn Văn"), "nguyen van");
        assert_eq!(fold("Ștefan Țepeș"), "stefan tepes");
        assert_eq!(fold("Ĉiuĵaŭde"), "ciujaude");
    }

    #[test]
    fn strips_marks_that_are_already_decomposed() {
        assert_eq!(fold("Pe\u{301}rez"), "perez");
    }

    #[test]
    fn leaves_non_latin_untouched() {
        assert_eq!(fold("千と千尋"), "千と千尋");
        assert_eq!(fold("Amélie-2001!"), "amelie-2001!");
    }
}
