//! Parameter value generators.
//!
//! The `expression` generator expands every `[<ranges>]{<n>}` block in its
//! input into `n` random characters drawn from the ranges; text outside the
//! blocks is copied through unchanged.
//!
//! | range   | characters                      |
//! |---------|---------------------------------|
//! | `a-z`   | inclusive span over `0-9A-Za-z` |
//! | `x`     | the single character            |
//! | `\w`    | letters, digits and `_`         |
//! | `\d`    | digits                          |
//! | `\a`    | letters and digits              |
//! | `\A`    | ASCII punctuation symbols       |

use std::sync::LazyLock;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use crate::error::GeneratorError;

const ALPHANUMERIC: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "~!@#$%^&*()-_+={}[]\\|<,>.?/\"';:`";
const MAX_LENGTH: usize = 255;

static EXPRESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([a-zA-Z0-9\-\\]+)\]\{(\w+)\}").unwrap());

/// Produces a value for a parameter that has a `generate` directive.
pub trait Generator {
    fn generate_value(&mut self, expression: &str) -> Result<String, GeneratorError>;
}

/// Random-expression generator backed by any [`Rng`].
pub struct ExpressionValueGenerator<R = StdRng> {
    rng: R,
}

impl ExpressionValueGenerator<StdRng> {
    /// Seeded from the current time; values are not reproducible.
    pub fn from_time() -> Self {
        let seed = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ExpressionValueGenerator<R> {
    pub fn new(rng: R) -> Self {
        ExpressionValueGenerator { rng }
    }

    fn random_string(&mut self, alphabet: &[char], length: usize) -> String {
        (0..length)
            .map(|_| alphabet[self.rng.gen_range(0..alphabet.len())])
            .collect()
    }
}

impl<R: Rng> Generator for ExpressionValueGenerator<R> {
    fn generate_value(&mut self, expression: &str) -> Result<String, GeneratorError> {
        let mut out = String::with_capacity(expression.len());
        let mut last = 0;
        for caps in EXPRESSION_RE.captures_iter(expression) {
            let Some(whole) = caps.get(0) else { continue };
            let alphabet = alphabet_for(&caps[1])?;
            let length = parse_length(&caps[2])?;
            out.push_str(&expression[last..whole.start()]);
            out.push_str(&self.random_string(&alphabet, length));
            last = whole.end();
        }
        out.push_str(&expression[last..]);
        Ok(out)
    }
}

fn parse_length(raw: &str) -> Result<usize, GeneratorError> {
    match raw.parse::<usize>() {
        Ok(n) if (1..=MAX_LENGTH).contains(&n) => Ok(n),
        _ => Err(GeneratorError::InvalidLength(raw.to_string())),
    }
}

/// Union of every range in a bracket body, deduplicated, in first-seen order.
fn alphabet_for(ranges: &str) -> Result<Vec<char>, GeneratorError> {
    let malformed = || GeneratorError::MalformedExpression(format!("[{ranges}]"));
    let chars: Vec<char> = ranges.chars().collect();
    let mut alphabet: Vec<char> = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let class = match chars.get(i + 1) {
                    Some('w') => format!("{ALPHANUMERIC}_"),
                    Some('d') => DIGITS.to_string(),
                    Some('a') => ALPHANUMERIC.to_string(),
                    Some('A') => SYMBOLS.to_string(),
                    _ => return Err(malformed()),
                };
                extend_unique(&mut alphabet, class.chars());
                i += 2;
            }
            '-' => return Err(malformed()),
            from if chars.get(i + 1) == Some(&'-') => {
                let to = match chars.get(i + 2) {
                    Some(&to) if to != '-' && to != '\\' => to,
                    _ => return Err(malformed()),
                };
                extend_unique(&mut alphabet, span(from, to)?.chars());
                i += 3;
            }
            single => {
                extend_unique(&mut alphabet, [single]);
                i += 1;
            }
        }
    }

    if alphabet.is_empty() {
        return Err(malformed());
    }
    Ok(alphabet)
}

fn extend_unique(alphabet: &mut Vec<char>, chars: impl IntoIterator<Item = char>) {
    for c in chars {
        if !alphabet.contains(&c) {
            alphabet.push(c);
        }
    }
}

fn span(from: char, to: char) -> Result<&'static str, GeneratorError> {
    let invalid = || GeneratorError::InvalidRange { from, to };
    let start = ALPHANUMERIC.find(from).ok_or_else(invalid)?;
    let end = ALPHANUMERIC.find(to).ok_or_else(invalid)?;
    if start > end {
        return Err(invalid());
    }
    Ok(&ALPHANUMERIC[start..=end])
}
