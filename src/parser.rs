//! # Chord Parser
//!
//! Recognizes chord symbols in free-form text and decomposes each one into a
//! [`StructuredChord`].
//!
//! ## Grammar
//! A token is a chord symbol iff the whole token matches (letters compared
//! case-insensitively):
//!
//! ```text
//! Root      := [A-G] ('#' | 'b')?
//! Quality   := ("maj" | "min" | "m" | "dim" | "aug" | "sus" | "add" | "dom")?
//! Extension := (digits | 'b' digits | '#' digits)*
//! Slash     := ("/" Root)?
//! ```
//!
//! ## Decomposition
//! The root is the upper-cased first letter plus a directly following `#` or
//! `b`. Anything after a `/` is the bass note. The rest is matched against
//! [`QUALITY_RULES`], an ordered list checked top to bottom, so that longer
//! keywords win over their own prefixes ("m7b5" before "m7" before "m").
//! Whatever the winning rule does not consume is kept verbatim as
//! `extensions`.
//!
//! ## Example
//! ```rust
//! use chordgen::{parse, ChordQuality};
//!
//! let chords = parse("Try Cm7b5, F7 and Bbmaj7/D");
//! assert_eq!(chords.len(), 3);
//! assert_eq!(chords[0].quality, ChordQuality::HalfDiminished7);
//! assert_eq!(chords[0].extensions, "");
//! assert_eq!(chords[2].bass.as_deref(), Some("D"));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ChordGenError;
use crate::lexer::candidate_tokens;
use crate::theory::{ChordQuality, NoteName};

/// Upper bound on chords collected from one input text
pub const MAX_CHORDS: usize = 100;

static CHORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[A-G][#b]?(maj|min|m|dim|aug|sus|add|dom)?([0-9]+|b[0-9]+|#[0-9]+)*(/[A-G][#b]?)?$",
    )
    .expect("chord grammar is a valid regex")
});

/// One entry of the quality decision list
#[derive(Debug, Clone, Copy)]
pub struct QualityRule {
    pub prefix: &'static str,
    pub quality: ChordQuality,
    pub ignore_case: bool,
}

const fn keyword(prefix: &'static str, quality: ChordQuality) -> QualityRule {
    QualityRule {
        prefix,
        quality,
        ignore_case: true,
    }
}

const fn literal(prefix: &'static str, quality: ChordQuality) -> QualityRule {
    QualityRule {
        prefix,
        quality,
        ignore_case: false,
    }
}

/// Quality prefixes in precedence order. The first matching rule wins and
/// consumes exactly `prefix.len()` bytes.
pub const QUALITY_RULES: &[QualityRule] = &[
    keyword("maj7", ChordQuality::Major7),
    keyword("maj", ChordQuality::Major),
    keyword("min7b5", ChordQuality::HalfDiminished7),
    keyword("m7b5", ChordQuality::HalfDiminished7),
    keyword("min7", ChordQuality::Minor7),
    keyword("m7", ChordQuality::Minor7),
    keyword("min9", ChordQuality::Minor9),
    keyword("m9", ChordQuality::Minor9),
    keyword("min", ChordQuality::Minor),
    keyword("m", ChordQuality::Minor),
    keyword("dim7", ChordQuality::Diminished7),
    keyword("dim", ChordQuality::Diminished),
    keyword("aug", ChordQuality::Augmented),
    keyword("sus4", ChordQuality::Sus4),
    keyword("sus2", ChordQuality::Sus2),
    keyword("add9", ChordQuality::Add9),
    keyword("add11", ChordQuality::Add11),
    keyword("dom7", ChordQuality::Dominant7),
    keyword("dom9", ChordQuality::Dominant9),
    literal("7#5", ChordQuality::Dominant7Sharp5),
    literal("7b9", ChordQuality::Dominant7Flat9),
    literal("7#9", ChordQuality::Dominant7Sharp9),
    literal("7b5", ChordQuality::Dominant7Flat5),
    literal("13", ChordQuality::Dominant13),
    literal("11", ChordQuality::Dominant11),
    literal("9", ChordQuality::Dominant9),
    literal("7", ChordQuality::Dominant7),
];

impl QualityRule {
    fn matches(&self, input: &str) -> bool {
        match input.get(..self.prefix.len()) {
            Some(head) if self.ignore_case => head.eq_ignore_ascii_case(self.prefix),
            Some(head) => head == self.prefix,
            None => false,
        }
    }
}

/// A chord recognized in the input text.
///
/// `quality_spelling` is the quality prefix exactly as written (`"maj"`,
/// `"MIN7"`, `""`), so the chord can be rebuilt without changing its meaning.
/// `extensions` is opaque display text: it never influences which pitches are
/// generated. `bass` holds the spelling written after the slash; a spelling
/// that is not a known note name is ignored at generation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredChord {
    pub root: NoteName,
    pub quality: ChordQuality,
    pub quality_spelling: String,
    pub extensions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<String>,
    pub original_text: String,
}

impl StructuredChord {
    /// Build a chord from its parts. The original text is the canonical name.
    pub fn new(root: NoteName, quality: ChordQuality) -> Self {
        let mut chord = Self {
            root,
            quality,
            quality_spelling: quality.symbol().to_string(),
            extensions: String::new(),
            bass: None,
            original_text: String::new(),
        };
        chord.original_text = chord.canonical_name();
        chord
    }

    pub fn with_bass(mut self, bass: &str) -> Self {
        self.bass = Some(bass.to_string());
        self.original_text = self.canonical_name();
        self
    }

    /// The chord as it was spelled in the input.
    pub fn display_name(&self) -> &str {
        &self.original_text
    }

    /// Chord-chart spelling rebuilt from the structured fields,
    /// e.g. `Cm7b5` or `Bbmaj7/D`. Parsing the result gives back the same
    /// root, quality, extensions and bass.
    pub fn canonical_name(&self) -> String {
        let mut name = format!("{}{}{}", self.root, self.quality_spelling, self.extensions);
        if let Some(bass) = &self.bass {
            name.push('/');
            name.push_str(bass);
        }
        name
    }

    /// The bass note, if one was written and it is a known spelling.
    pub fn bass_note(&self) -> Option<NoteName> {
        self.bass.as_deref().and_then(NoteName::from_spelling)
    }
}

/// Parse every chord symbol in `text`, in input order.
///
/// Tokens that are not chords are skipped. Collection stops after
/// [`MAX_CHORDS`] chords.
pub fn parse(text: &str) -> Vec<StructuredChord> {
    let mut chords = Vec::new();

    for token in candidate_tokens(text) {
        match parse_chord_symbol(&token) {
            Ok(chord) => {
                chords.push(chord);
                if chords.len() >= MAX_CHORDS {
                    info!(limit = MAX_CHORDS, "chord progression limited");
                    break;
                }
            }
            Err(e) => debug!(%e, "skipping token"),
        }
    }

    chords
}

/// Does the whole token match the chord grammar?
pub fn is_chord_pattern(token: &str) -> bool {
    CHORD_PATTERN.is_match(token)
}

/// Parse a single token into a chord.
///
/// # Examples
/// ```
/// use chordgen::{parse_chord_symbol, ChordQuality};
///
/// let chord = parse_chord_symbol("Cmaj7/E").unwrap();
/// assert_eq!(chord.root.spelling(), "C");
/// assert_eq!(chord.quality, ChordQuality::Major7);
/// assert_eq!(chord.bass.as_deref(), Some("E"));
/// assert_eq!(chord.display_name(), "Cmaj7/E");
///
/// assert!(parse_chord_symbol("Hm7").is_err());
/// ```
pub fn parse_chord_symbol(token: &str) -> Result<StructuredChord, ChordGenError> {
    if !is_chord_pattern(token) {
        return Err(ChordGenError::UnrecognizedToken(token.to_string()));
    }

    let (root_spelling, mut remaining) = extract_root(token);
    let root = NoteName::from_spelling(&root_spelling)
        .ok_or(ChordGenError::InvalidNoteName(root_spelling))?;

    let mut bass = None;
    if let Some(slash) = remaining.find('/') {
        bass = Some(remaining[slash + 1..].trim().to_string());
        remaining = &remaining[..slash];
    }

    let (quality, quality_spelling, extensions) = extract_quality_and_extensions(remaining);

    Ok(StructuredChord {
        root,
        quality,
        quality_spelling: quality_spelling.to_string(),
        extensions: extensions.to_string(),
        bass,
        original_text: token.to_string(),
    })
}

/// Split off the root spelling: the upper-cased first letter plus an
/// immediately following `#` or `b`.
fn extract_root(token: &str) -> (String, &str) {
    let mut chars = token.chars();
    let Some(letter) = chars.next() else {
        return (String::new(), "");
    };

    let mut root = letter.to_ascii_uppercase().to_string();
    let mut remaining = chars.as_str();
    if let Some(accidental @ ('#' | 'b')) = remaining.chars().next() {
        root.push(accidental);
        remaining = &remaining[1..];
    }
    (root, remaining)
}

/// Apply the first matching rule of [`QUALITY_RULES`]. Without a match the
/// chord is a plain major triad with no extensions.
fn extract_quality_and_extensions(remaining: &str) -> (ChordQuality, &str, &str) {
    QUALITY_RULES
        .iter()
        .find(|rule| rule.matches(remaining))
        .map(|rule| {
            let (spelling, extensions) = remaining.split_at(rule.prefix.len());
            (rule.quality, spelling, extensions)
        })
        .unwrap_or((ChordQuality::Major, "", ""))
}
