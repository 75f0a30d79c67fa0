use once_cell::sync::Lazy;
use regex::Regex;

/// Offset of an option letter from `A`, case-insensitive.
///
/// Not range-checked: a letter outside `A`–`D` yields an offset outside
/// `0..4`, which callers pass through [`clamp_index`].
pub fn letter_offset(letter: char) -> i64 {
    letter.to_ascii_uppercase() as i64 - 'A' as i64
}

/// Clamp a raw option offset into the valid index range `0..=3`.
pub fn clamp_index(raw: i64) -> usize {
    raw.clamp(0, crate::OPTION_COUNT as i64 - 1) as usize
}

/// Option letter at the very start of an answer statement.
///
/// Matches `A.`, `B)`, `C ` and a bare `D`. Uppercase only: a lowercase
/// leading "a" is far more often the article than an option label.
pub fn leading_option_letter(statement: &str) -> Option<char> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-D])(?:[.)\s]|$)").unwrap());
    RE.captures(statement.trim_start())
        .and_then(|caps| caps[1].chars().next())
}

/// First `correct [answer] [is] X` phrase anywhere in `text`.
///
/// The whole phrase is case-insensitive; the captured letter is returned
/// upper-cased. The letter must stand alone so "correct answer is as follows"
/// does not read as option A. Older extraction scripts accepted any letter
/// here and would return A for that phrase; keep the boundary.
pub fn correct_phrase_letter(text: &str) -> Option<char> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)correct\s+(?:answer\s+)?(?:is\s+)?([a-d])\b").unwrap()
    });
    RE.captures(text)
        .and_then(|caps| caps[1].chars().next())
        .map(|c| c.to_ascii_uppercase())
}

/// `correct answer X` with an uppercase option letter, as written in explanations.
///
/// Same standalone-letter rule as [`correct_phrase_letter`]: "Correct answer
/// Amazon S3" is not option A, although older extraction scripts read it so.
pub fn correct_answer_letter(text: &str) -> Option<char> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i:correct\s+answer)\s+([A-D])\b").unwrap());
    RE.captures(text).and_then(|caps| caps[1].chars().next())
}

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Distinct whitespace-delimited tokens, lower-cased.
pub fn word_set(text: &str) -> std::collections::HashSet<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// First `n` characters of `text` (char-boundary safe).
pub fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ligatures() {
        assert_eq!(expand_ligatures("ﬁle ﬂow"), "file flow");
        assert_eq!(expand_ligatures("eﬃcient"), "efficient");
        assert_eq!(expand_ligatures("no ligatures here"), "no ligatures here");
    }

    #[test]
    fn test_letter_offset() {
        assert_eq!(letter_offset('A'), 0);
        assert_eq!(letter_offset('d'), 3);
        assert_eq!(letter_offset('Z'), 25);
        assert_eq!(letter_offset('@'), -1);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-1), 0);
        assert_eq!(clamp_index(2), 2);
        assert_eq!(clamp_index(25), 3);
        assert_eq!(clamp_index(letter_offset('Z')), 3);
    }

    #[test]
    fn test_leading_option_letter() {
        assert_eq!(leading_option_letter("A. Use S3"), Some('A'));
        assert_eq!(leading_option_letter("C) Use EFS"), Some('C'));
        assert_eq!(leading_option_letter("B Use EBS"), Some('B'));
        assert_eq!(leading_option_letter("D"), Some('D'));
        assert_eq!(leading_option_letter("Amazon S3 is correct"), None);
        assert_eq!(leading_option_letter("E. not an option"), None);
        assert_eq!(leading_option_letter("a. lowercase"), None);
    }

    #[test]
    fn test_correct_phrase_letter() {
        assert_eq!(correct_phrase_letter("The correct answer is b."), Some('B'));
        assert_eq!(correct_phrase_letter("Correct C because..."), Some('C'));
        assert_eq!(correct_phrase_letter("correct is D"), Some('D'));
        assert_eq!(
            correct_phrase_letter("The correct answer is as follows"),
            None
        );
        assert_eq!(correct_phrase_letter("no signal here"), None);
    }

    #[test]
    fn test_correct_answer_letter() {
        assert_eq!(correct_answer_letter("Correct answer C: use DMS"), Some('C'));
        assert_eq!(correct_answer_letter("CORRECT ANSWER B"), Some('B'));
        assert_eq!(correct_answer_letter("correct answer b"), None);
        assert_eq!(correct_answer_letter("correct answer is A"), None);
        assert_eq!(correct_answer_letter("Correct answer Amazon S3"), None);
    }

    #[test]
    fn test_word_set() {
        let words = word_set("Use  S3 use\nGlacier");
        assert_eq!(words.len(), 3);
        assert!(words.contains("s3"));
        assert!(words.contains("use"));
    }

    #[test]
    fn test_char_prefix() {
        assert_eq!(char_prefix("hello", 3), "hel");
        assert_eq!(char_prefix("hi", 50), "hi");
        assert_eq!(char_prefix("héllo", 2), "hé");
    }
}
