//! Text and key preparation around the cipher core.
//!
//! None of this is invertible: folded diacritics, removed spaces, and random
//! key padding are all lost on the way through. The cipher core only ever
//! sees the normalized results.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use zeroize::Zeroize;

use crate::config::StepperConfig;
use crate::error::StepperError;

/// Folds the diacritics the tool knows about to plain ASCII.
///
/// Matching is case insensitive and the replacement is always lowercase.
/// Super- and subscript digits fold to ASCII digits. Anything else passes
/// through unchanged.
///
/// # Examples
///
/// ```
/// use stepper::normalize::fold_diacritics;
///
/// assert_eq!(fold_diacritics("Crème Brûlée ²"), "Creme Brulee 2");
/// assert_eq!(fold_diacritics("ÑANDÚ"), "nANDu");
/// ```
pub fn fold_diacritics(text: &str) -> String {
    text.chars()
        .map(|ch| fold_char(ch).unwrap_or(ch))
        .collect()
}

fn fold_char(ch: char) -> Option<char> {
    let mut lower = ch.to_lowercase();
    let first = lower.next()?;
    if lower.next().is_some() {
        return None;
    }
    let folded = match first {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'ð' => 'd',
        'è' | 'é' | 'ë' | 'ê' | 'œ' | 'æ' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ǹ' | 'ń' | 'ñ' | 'ň' => 'n',
        'ß' => 's',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        '⁰' | '₀' => '0',
        '¹' | '₁' => '1',
        '²' | '₂' => '2',
        '³' | '₃' => '3',
        '⁴' | '₄' => '4',
        '⁵' | '₅' => '5',
        '⁶' | '₆' => '6',
        '⁷' | '₇' => '7',
        '⁸' | '₈' => '8',
        '⁹' | '₉' => '9',
        _ => return None,
    };
    Some(folded)
}

/// A key brought to exactly `config.key_length()` lowercase letters.
///
/// Cleared on drop.
pub struct NormalizedKey {
    key: String,
    padded_by: usize,
    truncated_by: usize,
}

impl NormalizedKey {
    /// The normalized key letters.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Number of random letters appended.
    pub fn padded_by(&self) -> usize {
        self.padded_by
    }

    /// Number of letters cut from the end.
    pub fn truncated_by(&self) -> usize {
        self.truncated_by
    }
}

impl fmt::Debug for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedKey")
            .field("len", &self.key.len())
            .field("padded_by", &self.padded_by)
            .field("truncated_by", &self.truncated_by)
            .finish()
    }
}

impl Drop for NormalizedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Normalizes a raw key for `config`.
///
/// Diacritics are folded, everything but ASCII letters is dropped, and the
/// rest is lowercased. A short key is padded with uniformly random letters
/// drawn from `rng`; a long key is truncated.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use stepper::config::StepperConfig;
/// use stepper::normalize::normalize_key;
///
/// let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let key = normalize_key("Ñé-Kx", &cfg, &mut rng);
/// assert!(key.as_str().starts_with("nekx"));
/// assert_eq!(key.as_str().len(), 6);
/// assert_eq!(key.padded_by(), 2);
/// ```
pub fn normalize_key<R: Rng + ?Sized>(
    raw: &str,
    config: &StepperConfig,
    rng: &mut R,
) -> NormalizedKey {
    let target = config.key_length();
    let mut key: String = fold_diacritics(raw)
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|ch| ch.to_ascii_lowercase())
        .collect();

    let letters = key.len();
    let mut padded_by = 0;
    let mut truncated_by = 0;
    if letters < target {
        padded_by = target - letters;
        key.extend((0..padded_by).map(|_| (b'a' + rng.gen_range(0..26u8)) as char));
        tracing::debug!(letters, padded_by, "key padded with random letters");
    } else if letters > target {
        truncated_by = letters - target;
        key.truncate(target);
        tracing::debug!(letters, truncated_by, "key truncated");
    }

    NormalizedKey {
        key,
        padded_by,
        truncated_by,
    }
}

/// Punctuation handling around a cipher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PunctuationMode {
    /// Keep every non-letter character in place.
    #[default]
    Keep,
    /// Drop spaces before ciphering, see [`remove_spaces`].
    NoSpaces,
    /// Emit only alphanumeric characters.
    AlphanumericOnly,
}

impl PunctuationMode {
    /// Applies the mode to plaintext before letter extraction.
    pub fn prepare(self, text: &str) -> String {
        match self {
            PunctuationMode::NoSpaces => remove_spaces(text),
            PunctuationMode::Keep | PunctuationMode::AlphanumericOnly => text.to_string(),
        }
    }

    /// Applies the mode to the produced text.
    pub fn finish(self, text: String) -> String {
        match self {
            PunctuationMode::AlphanumericOnly => filter_output(&text),
            PunctuationMode::Keep | PunctuationMode::NoSpaces => text,
        }
    }
}

impl FromStr for PunctuationMode {
    type Err = StepperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" | "y" => Ok(PunctuationMode::Keep),
            "no-spaces" | "s" => Ok(PunctuationMode::NoSpaces),
            "alnum" | "n" => Ok(PunctuationMode::AlphanumericOnly),
            _ => Err(StepperError::InvalidConfig(
                "punctuation mode must be keep, no-spaces or alnum",
            )),
        }
    }
}

impl fmt::Display for PunctuationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PunctuationMode::Keep => "keep",
            PunctuationMode::NoSpaces => "no-spaces",
            PunctuationMode::AlphanumericOnly => "alnum",
        })
    }
}

/// Keeps only alphanumeric characters.
pub fn filter_output(text: &str) -> String {
    text.chars().filter(|c| c.is_alphanumeric()).collect()
}

const SENTENCE_PUNCTUATION: [char; 7] = ['.', ',', '!', '?', '-', ':', ';'];

/// Removes spaces, keeping one space after each run of sentence punctuation.
///
/// No space is inserted when the character two positions back is a digit,
/// so numbers such as `10,000` stay intact.
///
/// # Examples
///
/// ```
/// use stepper::normalize::remove_spaces;
///
/// assert_eq!(remove_spaces("abc? Abc,abc!"), "abc? Abc, abc!");
/// assert_eq!(remove_spaces("10,000 yards"), "10,000yards");
/// ```
pub fn remove_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());
    for (i, &ch) in chars.iter().enumerate() {
        let after_punct = i > 0
            && !SENTENCE_PUNCTUATION.contains(&ch)
            && SENTENCE_PUNCTUATION.contains(&chars[i - 1]);
        if after_punct {
            let inside_number = i >= 2 && chars[i - 2].is_ascii_digit();
            if !inside_number {
                output.push(' ');
            }
        }
        if ch != ' ' {
            output.push(ch);
        }
    }
    output
}

/// Positions (1-based) and characters that may not survive a round trip
/// through plain-text tools: control characters other than `\t`..`\r`, and
/// codepoints above 255.
pub fn unsupported_characters(text: &str) -> Vec<(usize, char)> {
    text.chars()
        .enumerate()
        .filter(|&(_, c)| {
            let code = c as u32;
            (code < 32 && !(9..=13).contains(&code)) || code > 255
        })
        .map(|(i, c)| (i + 1, c))
        .collect()
}
