/// Deterministic value of a word: the sum of the 1-based alphabet positions
/// of its letters. Case-insensitive; non-letter characters count as zero.
pub fn word_value(word: &str) -> i64 {
    word.chars()
        .filter(|ch| ch.is_ascii_alphabetic())
        .map(|ch| (ch.to_ascii_lowercase() as u8 - b'a' + 1) as i64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::word_value;

    #[test]
    fn sums_alphabet_positions() {
        assert_eq!(word_value("abc"), 1 + 2 + 3);
        assert_eq!(word_value("z"), 26);
    }

    #[test]
    fn ignores_case_and_non_letters() {
        assert_eq!(word_value("Abc"), word_value("abc"));
        assert_eq!(word_value("a1b2c3"), word_value("abc"));
        assert_eq!(word_value("Hello!"), word_value("hello"));
        assert_eq!(word_value("123"), 0);
        assert_eq!(word_value(""), 0);
    }
}
