use std::error::Error;
use std::fmt;

/// A single media range parsed from an `Accept` header: `type/subtype` plus
/// a quality weight and any remaining parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    /// Top-level type token, `"*"` for a full wildcard.
    pub type_: String,
    /// Subtype token, `"*"` to match any subtype of `type_`.
    pub subtype: String,
    /// Quality weight, `1` when the range carries no `q` parameter.
    pub q: f32,
    /// Remaining `name=value` parameters in first-seen order, `q` excluded.
    /// Duplicate names are kept.
    pub params: Vec<(String, String)>,
}

impl MediaRange {
    /// Parse a single `type/subtype[;name=value...]` segment.
    ///
    /// The whole input is one range: `;`-separated parameter tails are
    /// honored but there is no `,` splitting. Negotiation parses alternative
    /// media types with this same routine.
    ///
    /// The `type/subtype` head must split on `/` into exactly two non-empty
    /// tokens; both are whitespace-trimmed. Parameter tails that do not split
    /// on `=` into exactly two tokens are dropped. A `q` tail (name matched
    /// exactly, case-sensitive) sets the quality weight instead of being
    /// retained: the value parses as a float when it contains a decimal
    /// point, as an integer otherwise, and degrades to `0` when it is
    /// neither.
    pub fn parse(segment: &str) -> Result<MediaRange, MalformedRangeError> {
        let mut parts = segment.split(';');

        // split always yields at least one item
        let head = parts.next().unwrap_or_default();

        let mut tokens = head.split('/');
        let (type_, subtype) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(type_), Some(subtype), None) => (type_.trim(), subtype.trim()),
            _ => return Err(MalformedRangeError(segment.to_owned())),
        };

        if type_.is_empty() || subtype.is_empty() {
            return Err(MalformedRangeError(segment.to_owned()));
        }

        let mut q = 1.0;
        let mut params = Vec::new();

        for tail in parts {
            let mut tokens = tail.split('=');
            // tails without exactly one `=` are dropped, never errors
            if let (Some(name), Some(value), None) = (tokens.next(), tokens.next(), tokens.next())
            {
                if name == "q" {
                    q = parse_q(value);
                } else {
                    params.push((name.to_owned(), value.to_owned()));
                }
            }
        }

        Ok(MediaRange {
            type_: type_.to_owned(),
            subtype: subtype.to_owned(),
            q,
            params,
        })
    }
}

impl fmt::Display for MediaRange {
    /// Canonical `type/subtype[;name=value...][;q=...]` form. A `q` of `1`
    /// is omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.params {
            write!(f, ";{}={}", name, value)?;
        }
        if self.q != 1.0 {
            write!(f, ";q={}", self.q)?;
        }
        Ok(())
    }
}

/// Parse an `Accept` header into its media ranges, preserving header order.
///
/// The header splits on `,` into segments, each parsed with
/// [`MediaRange::parse`]. Any segment whose `type/subtype` head is malformed
/// fails the whole call; there is no partial result. Malformed parameters
/// and `q` values inside a segment never fail the call.
pub fn parse_accept(header: &str) -> Result<Vec<MediaRange>, MalformedRangeError> {
    header.split(',').map(MediaRange::parse).collect()
}

// qvalues are short decimals in the RFC grammar, but any numeric literal is
// accepted here: float when a decimal point is present, integer otherwise.
fn parse_q(value: &str) -> f32 {
    if value.contains('.') {
        value.parse::<f32>().unwrap_or(0.0)
    } else {
        value.parse::<i64>().map(|q| q as f32).unwrap_or(0.0)
    }
}

/// Error type indicating that a `type/subtype` segment did not split into
/// exactly two non-empty tokens. Carries the offending segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRangeError(pub String);

impl fmt::Display for MalformedRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed media range: {:?}", self.0)
    }
}

impl Error for MalformedRangeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(type_: &str, subtype: &str, q: f32, params: &[(&str, &str)]) -> MediaRange {
        MediaRange {
            type_: type_.to_owned(),
            subtype: subtype.to_owned(),
            q,
            params: params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    fn malformed(segment: &str) -> Result<Vec<MediaRange>, MalformedRangeError> {
        Err(MalformedRangeError(segment.to_owned()))
    }

    #[test]
    fn test_parse_accept() {
        let tests = [
            // q defaults to 1 when absent
            ("text/html", Ok(vec![range("text", "html", 1.0, &[])])),
            // malformed q degrades to 0
            ("text/html;q=bogus", Ok(vec![range("text", "html", 0.0, &[])])),
            // integer and float q forms
            ("text/html;q=0", Ok(vec![range("text", "html", 0.0, &[])])),
            ("text/html;q=1", Ok(vec![range("text", "html", 1.0, &[])])),
            ("text/html;q=0.5", Ok(vec![range("text", "html", 0.5, &[])])),
            // no decimal point means the integer parse, so exponents degrade
            ("text/html;q=1e-1", Ok(vec![range("text", "html", 0.0, &[])])),
            // params are kept in order, q excluded
            (
                "text/html;level=1",
                Ok(vec![range("text", "html", 1.0, &[("level", "1")])]),
            ),
            (
                "text/html;a=1;a=2;b=3;q=0.9",
                Ok(vec![range(
                    "text",
                    "html",
                    0.9,
                    &[("a", "1"), ("a", "2"), ("b", "3")],
                )]),
            ),
            // tails without exactly one `=` are dropped
            ("text/html;level", Ok(vec![range("text", "html", 1.0, &[])])),
            ("text/html;a=b=c", Ok(vec![range("text", "html", 1.0, &[])])),
            // q is matched exactly: `Q` and ` q` stay ordinary params
            (
                "text/html;Q=0.5",
                Ok(vec![range("text", "html", 1.0, &[("Q", "0.5")])]),
            ),
            (
                "text/html; q=0.5",
                Ok(vec![range("text", "html", 1.0, &[(" q", "0.5")])]),
            ),
            // type and subtype are trimmed
            (" text / html ", Ok(vec![range("text", "html", 1.0, &[])])),
            (
                "text/*;q=0.3, text/html;q=0.7, text/html;level=1, text/html;level=2;q=0.4, */*;q=0.5",
                Ok(vec![
                    range("text", "*", 0.3, &[]),
                    range("text", "html", 0.7, &[]),
                    range("text", "html", 1.0, &[("level", "1")]),
                    range("text", "html", 0.4, &[("level", "2")]),
                    range("*", "*", 0.5, &[]),
                ]),
            ),
            // the type/subtype head must split into exactly two non-empty tokens
            ("text", malformed("text")),
            ("text/html/xml", malformed("text/html/xml")),
            ("/html", malformed("/html")),
            ("text/", malformed("text/")),
            (" / ", malformed(" / ")),
            ("", malformed("")),
            ("   ", malformed("   ")),
            // the error carries the whole offending segment
            ("text;q=0.5", malformed("text;q=0.5")),
            ("text/html,", malformed("")),
            ("application/json, text", malformed(" text")),
        ];

        for (i, (header, expected)) in tests.iter().enumerate() {
            let result = parse_accept(header);
            assert_eq!(result, *expected, "failed to parse accept header #{i}: {header:?}");
        }
    }

    #[test]
    fn test_segment_count() {
        let ranges = parse_accept("a/b, c/d;x=1, e/f;q=0.1").unwrap();
        assert_eq!(ranges.len(), 3);
        for range in &ranges {
            assert!(!range.type_.is_empty());
            assert!(!range.subtype.is_empty());
            assert_eq!(range.type_, range.type_.trim());
            assert_eq!(range.subtype, range.subtype.trim());
        }
    }

    #[test]
    fn test_single_range_does_not_split_on_commas() {
        // the whole string is one range, so the comma lands in the subtype
        // token and fails the two-token rule
        assert!(MediaRange::parse("text/html,text/plain").is_err());
        assert_eq!(parse_accept("text/html,text/plain").unwrap().len(), 2);
    }

    #[test]
    fn test_display() {
        let tests = [
            ("text/html", "text/html"),
            // q=1 is omitted, explicit or defaulted
            ("text/html;q=1", "text/html"),
            ("text/html;q=0.5", "text/html;q=0.5"),
            ("text/html;q=0", "text/html;q=0"),
            // params render before q regardless of input order
            ("text/html;q=0.4;level=1", "text/html;level=1;q=0.4"),
            (" text / html ;level=1", "text/html;level=1"),
            ("*/*;q=0.3", "*/*;q=0.3"),
        ];

        for (i, (input, expected)) in tests.iter().enumerate() {
            let range = MediaRange::parse(input).unwrap();
            assert_eq!(range.to_string(), *expected, "failed to render range #{i}: {input:?}");
        }
    }
}
