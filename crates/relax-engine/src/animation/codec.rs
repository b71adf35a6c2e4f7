//! Value codec for CSS-like value strings.
//!
//! A formatted value such as `translate(10px, -20.5px)` is split into its
//! numeric components (`[10.0, -20.5]`) and a [`Template`] that keeps the
//! surrounding text (`translate({0}px, {1}px)`). Interpolation works on the
//! numbers and renders them back through the template.
//!
//! Numeric tokens match `-?\d+(\.\d*)?`. The parser is permissive: text
//! without numbers yields an empty sequence and a static template.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Rewrites value strings into a form the numeric scanner understands.
pub trait ValueNormalizer {
    fn normalize<'a>(&self, raw: &'a str) -> Cow<'a, str>;
}

/// Rewrites `#rrggbb` tokens to `rgb(r,g,b)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexColorNormalizer;

impl ValueNormalizer for HexColorNormalizer {
    fn normalize<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        let bytes = raw.as_bytes();
        let mut out: Option<String> = None;
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'#' {
                if let Some([r, g, b]) = hex_triplet(bytes, i) {
                    let buf = out.get_or_insert_with(|| String::with_capacity(raw.len() + 8));
                    buf.push_str(&raw[copied..i]);
                    buf.push_str(&format!("rgb({},{},{})", r, g, b));
                    i += 7;
                    copied = i;
                    continue;
                }
            }
            i += 1;
        }

        match out {
            Some(mut buf) => {
                buf.push_str(&raw[copied..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(raw),
        }
    }
}

/// Decode `#rrggbb` starting at `at`, rejecting longer word runs like `#ff00001`.
fn hex_triplet(bytes: &[u8], at: usize) -> Option<[u8; 3]> {
    let digits = bytes.get(at + 1..at + 7)?;
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    if let Some(next) = bytes.get(at + 7) {
        if next.is_ascii_alphanumeric() || *next == b'_' {
            return None;
        }
    }
    let channel = |pair: &[u8]| -> Option<u8> {
        let text = std::str::from_utf8(pair).ok()?;
        u8::from_str_radix(text, 16).ok()
    };
    Some([
        channel(&digits[0..2])?,
        channel(&digits[2..4])?,
        channel(&digits[4..6])?,
    ])
}

/// Normalise with the default [`HexColorNormalizer`].
pub fn normalize(raw: &str) -> Cow<'_, str> {
    HexColorNormalizer.normalize(raw)
}

/// Byte ranges of every numeric token, in encounter order.
fn numeric_tokens(formatted: &str) -> Vec<Range<usize>> {
    let bytes = formatted.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let mut j = i;
        if bytes[j] == b'-' {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'.' {
                j += 1;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
            }
            tokens.push(start..j);
            i = j;
        } else {
            i += 1;
        }
    }

    tokens
}

fn parse_token(token: &str) -> f64 {
    token.trim_end_matches('.').parse().unwrap_or(0.0)
}

/// Parse every numeric token of `formatted` in encounter order.
pub fn extract_values(formatted: &str) -> Vec<f64> {
    numeric_tokens(formatted)
        .into_iter()
        .map(|range| parse_token(&formatted[range]))
        .collect()
}

/// Format a number in shortest round-trip form, writing `-0` and non-finite values as `0`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Slot {
        index: usize,
        /// First three arguments of `rgb(`/`rgba(`, rendered as integers.
        channel: bool,
        original: String,
    },
}

/// A value string with its numeric tokens replaced by indexed placeholders.
///
/// Displays as the placeholder form, e.g. `{0}px {1}px`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Number of placeholders.
    pub fn slot_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Slot { .. }))
            .count()
    }

    /// Substitute `values` into the placeholders in index order.
    ///
    /// Placeholders past the end of `values` keep their original token text.
    /// Colour channels are truncated toward zero.
    pub fn render(&self, values: &[f64]) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot {
                    index,
                    channel,
                    original,
                } => match values.get(*index) {
                    Some(value) if *channel => out.push_str(&format_number(value.trunc())),
                    Some(value) => out.push_str(&format_number(*value)),
                    None => out.push_str(original),
                },
            }
        }
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Slot { index, .. } => write!(f, "{{{}}}", index)?,
            }
        }
        Ok(())
    }
}

/// Tracks whether the scanner sits inside the channel list of `rgb(`/`rgba(`.
#[derive(Default)]
struct ChannelTracker {
    inside: bool,
    channel: usize,
}

impl ChannelTracker {
    fn advance(&mut self, literal: &str) {
        let lower = literal.to_ascii_lowercase();
        let mut rest = lower.as_str();
        while let Some(c) = rest.chars().next() {
            if rest.starts_with("rgb(") || rest.starts_with("rgba(") {
                self.inside = true;
                self.channel = 0;
                let skip = rest.find('(').map_or(1, |p| p + 1);
                rest = &rest[skip..];
                continue;
            }
            if c == ')' {
                self.inside = false;
            }
            rest = &rest[c.len_utf8()..];
        }
    }

    fn next_slot_is_channel(&mut self) -> bool {
        if !self.inside {
            return false;
        }
        let is_channel = self.channel < 3;
        self.channel += 1;
        is_channel
    }
}

/// Replace each numeric token of `formatted` with a placeholder, in encounter order.
pub fn build_template(formatted: &str) -> Template {
    let mut segments = Vec::new();
    let mut tracker = ChannelTracker::default();
    let mut copied = 0;

    for (index, range) in numeric_tokens(formatted).into_iter().enumerate() {
        let literal = &formatted[copied..range.start];
        tracker.advance(literal);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal.to_string()));
        }
        segments.push(Segment::Slot {
            index,
            channel: tracker.next_slot_is_channel(),
            original: formatted[range.clone()].to_string(),
        });
        copied = range.end;
    }

    if copied < formatted.len() {
        segments.push(Segment::Literal(formatted[copied..].to_string()));
    }

    Template { segments }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize("#ff0000"), "rgb(255,0,0)");
        assert_eq!(normalize("1px solid #00FF7f"), "1px solid rgb(0,255,127)");
        assert_eq!(
            normalize("#000000 0 0 #ffffff"),
            "rgb(0,0,0) 0 0 rgb(255,255,255)"
        );
    }

    #[test]
    fn test_normalize_passthrough() {
        assert!(matches!(normalize("10px"), Cow::Borrowed("10px")));
        assert_eq!(normalize("#fff"), "#fff");
        assert_eq!(normalize("#ff00001"), "#ff00001");
        assert_eq!(normalize("#gg0000"), "#gg0000");
        assert_eq!(normalize("#"), "#");
    }

    #[test]
    fn test_extract_values() {
        assert_eq!(extract_values("20px 10px"), vec![20.0, 10.0]);
        assert_eq!(extract_values("translate(-10.5px, 3.)"), vec![-10.5, 3.0]);
        assert_eq!(extract_values("rgb(1,2,3)"), vec![1.0, 2.0, 3.0]);
        assert_eq!(extract_values("1.2.3"), vec![1.2, 3.0]);
        assert!(extract_values("auto").is_empty());
        assert!(extract_values("").is_empty());
        assert!(extract_values("- -").is_empty());
    }

    #[test]
    fn test_build_template() {
        assert_eq!(build_template("20px 10px").to_string(), "{0}px {1}px");
        assert_eq!(
            build_template("translate(-10px, 5px) scale(2)").to_string(),
            "translate({0}px, {1}px) scale({2})"
        );
        assert_eq!(build_template("auto").to_string(), "auto");
        assert_eq!(build_template("0.5").to_string(), "{0}");
        assert_eq!(build_template("20px 10px").slot_count(), 2);
    }

    #[test]
    fn test_template_round_trip() {
        for text in ["20px 10px", "0 0 4px -2px", "translate(-10.5px, 3px)", "1,2,3"] {
            let values = extract_values(text);
            assert_eq!(build_template(text).render(&values), text);
        }
    }

    #[test]
    fn test_template_missing_values_keep_original() {
        let template = build_template("1px 2px 3px");
        assert_eq!(template.render(&[10.0]), "10px 2px 3px");
    }

    #[test]
    fn test_colour_channels_truncate() {
        let template = build_template("rgb(255,0,0)");
        assert_eq!(template.render(&[127.5, 127.9, -0.4]), "rgb(127,127,0)");

        let rgba = build_template("RGBA(0, 0, 0, 0.5)");
        assert_eq!(rgba.render(&[10.7, 20.2, 30.9, 0.25]), "RGBA(10, 20, 30, 0.25)");

        // Numbers after the colour function are not channels
        let shadow = build_template("rgb(0,0,0) 2.5px");
        assert_eq!(shadow.render(&[1.5, 1.5, 1.5, 2.5]), "rgb(1,1,1) 2.5px");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.25), "-12.25");
        assert_eq!(format_number(f64::NAN), "0");
    }
}
