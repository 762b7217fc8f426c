//! # Text Lexer
//!
//! Splits free-form text (for example a pasted chat answer) into candidate
//! chord tokens.
//!
//! ## Steps
//! 1. Split on whitespace, commas, semicolons and pipes. Double quotes group
//!    their contents into one token and are not part of the token.
//! 2. Drop empty tokens, numeric bullets (`1.`, `-`, `*`) and filler words.
//! 3. Strip trailing sentence punctuation (`.`, `:`, `!`, `?`). Accidentals
//!    (`#`, `b`) are never stripped.
//!
//! Whether a surviving token is actually a chord is decided by the parser.

/// Words that commonly surround chord names in prose. Matched case-insensitively
/// against whole tokens.
pub const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "here's", "heres", "try", "this", "progression", "chord", "chords",
    "following", "these", "use", "play", "with", "in", "key", "of", "for", "and", "or", "is",
    "are", "be", "to", "from", "at", "on", "by", "as", "it", "that", "which",
];

const QUOTE: char = '"';

/// Lexer for splitting prose into raw tokens
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    in_quotes: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            in_quotes: false,
        }
    }

    fn is_separator(c: char) -> bool {
        c.is_whitespace() || matches!(c, ',' | ';' | '|')
    }

    /// Split the input into trimmed raw tokens. Empty tokens are kept so the
    /// noise filter sees exactly what the splitter produced.
    pub fn tokenize(&mut self) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();

        while let Some(c) = self.chars.next() {
            if c == QUOTE {
                self.in_quotes = !self.in_quotes;
                continue;
            }
            if !self.in_quotes && Self::is_separator(c) {
                tokens.push(current.trim().to_string());
                current.clear();
                // Runs of separators collapse into a single break
                while let Some(&next) = self.chars.peek() {
                    if Self::is_separator(next) {
                        self.chars.next();
                    } else {
                        break;
                    }
                }
                continue;
            }
            current.push(c);
        }

        if !current.is_empty() {
            tokens.push(current.trim().to_string());
        }
        tokens
    }
}

/// Case-insensitive exact match against [`FILLER_WORDS`].
pub fn is_filler_word(token: &str) -> bool {
    let lower = token.to_lowercase();
    FILLER_WORDS.iter().any(|filler| *filler == lower)
}

/// True for list bullets and bare numbers: digits, `.`, `-` and `*` only.
pub fn is_bullet(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '*'))
}

pub fn trim_trailing_punctuation(token: &str) -> &str {
    token.trim_end_matches(&['.', ':', '!', '?'][..])
}

/// Tokenize `text` and drop everything that can never be a chord symbol.
pub fn candidate_tokens(text: &str) -> Vec<String> {
    Lexer::new(text)
        .tokenize()
        .into_iter()
        .filter(|token| !token.is_empty() && !is_filler_word(token) && !is_bullet(token))
        .map(|token| trim_trailing_punctuation(&token).to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_separators() {
        let tokens = Lexer::new("C, Am;F|G\nDm7\tE7").tokenize();
        assert_eq!(tokens, vec!["C", "Am", "F", "G", "Dm7", "E7"]);
    }

    #[test]
    fn test_separator_runs_collapse() {
        let tokens = Lexer::new("C ,  Am").tokenize();
        assert_eq!(tokens, vec!["C", "Am"]);
    }

    #[test]
    fn test_quotes_group_and_are_removed() {
        let tokens = Lexer::new(r#"play "Cmaj7" then "G sus""#).tokenize();
        assert_eq!(tokens, vec!["play", "Cmaj7", "then", "G sus"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let tokens = Lexer::new(r#"C "Am F"#).tokenize();
        assert_eq!(tokens, vec!["C", "Am F"]);
    }

    #[test]
    fn test_filler_words_case_insensitive() {
        assert!(is_filler_word("The"));
        assert!(is_filler_word("HERE'S"));
        assert!(is_filler_word("progression"));
        assert!(!is_filler_word("progression:"));
        assert!(!is_filler_word("Am"));
    }

    #[test]
    fn test_bullets() {
        assert!(is_bullet("1."));
        assert!(is_bullet("-"));
        assert!(is_bullet("**"));
        assert!(is_bullet("12"));
        assert!(!is_bullet("7b9"));
    }

    #[test]
    fn test_trailing_punctuation_keeps_accidentals() {
        assert_eq!(trim_trailing_punctuation("G7."), "G7");
        assert_eq!(trim_trailing_punctuation("Am?!"), "Am");
        assert_eq!(trim_trailing_punctuation("Bb"), "Bb");
        assert_eq!(trim_trailing_punctuation("F#:"), "F#");
    }

    #[test]
    fn test_candidate_tokens_filters_prose() {
        let tokens = candidate_tokens("Here's a progression: Cmaj7, Dm7, G7. Enjoy!");
        assert_eq!(tokens, vec!["progression", "Cmaj7", "Dm7", "G7", "Enjoy"]);
    }

    #[test]
    fn test_candidate_tokens_drops_numbered_list() {
        let tokens = candidate_tokens("1. C\n2. Am\n3. F");
        assert_eq!(tokens, vec!["C", "Am", "F"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(candidate_tokens("").is_empty());
        assert!(candidate_tokens("   \n\t ").is_empty());
    }
}
