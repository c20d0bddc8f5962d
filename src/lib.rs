//! # axum-accept
//!
//! HTTP content negotiation for [`axum`][1].
//!
//! Parses `Accept` request headers into [`MediaRange`] preference lists and
//! selects the best matching [`Alternative`] a handler can actually produce,
//! following the RFC 2616 §14.1 rules for wildcards, parameter specificity,
//! and `q` quality weights.
//!
//! The core is a pair of pure functions, [`parse_accept`] and [`negotiate`].
//! For axum handlers there is the typed [`Accept`] header, extractable with
//! [`TypedHeader`][2], and the [`NotAcceptable`] responder for the failure
//! path.
//!
//! ```
//! use axum::Router;
//! use axum::routing::get;
//! use axum::response::{IntoResponse, Response};
//! use axum_extra::TypedHeader;
//!
//! use axum_accept::{Accept, Alternative, NotAcceptable};
//!
//! async fn report(accept: Option<TypedHeader<Accept>>) -> Response {
//!     let accept = accept.map(|TypedHeader(accept)| accept).unwrap_or_else(Accept::any);
//!     let alternatives = vec![
//!         Alternative::new("application/json", "json"),
//!         Alternative::new("text/html", "html"),
//!     ];
//!     match accept.negotiate(alternatives) {
//!         Ok(Some("json")) => ([("content-type", "application/json")], r#"{"ok":true}"#).into_response(),
//!         Ok(Some("html")) => ([("content-type", "text/html")], "<p>ok</p>").into_response(),
//!         _ => NotAcceptable.into_response(),
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // build our application with a single route
//!     let _app = Router::<()>::new().route("/report", get(report));
//! }
//! ```
//!
//! [1]: https://docs.rs/axum
//! [2]: https://docs.rs/axum-extra/latest/axum_extra/struct.TypedHeader.html

mod header;
mod parse;

pub use header::{Accept, NotAcceptable};
pub use parse::{parse_accept, MalformedRangeError, MediaRange};

/// A representation the caller can produce, offered to [`negotiate`] for
/// scoring against the client's media ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative<T> {
    /// Media-type string, parsed with the same logic as header ranges.
    /// Supports `;`-separated parameters.
    pub media_type: String,
    /// Caller-defined value, opaque to negotiation, returned unchanged when
    /// this alternative wins.
    pub tag: T,
}

impl<T> Alternative<T> {
    /// Construct an alternative from a media-type string and a tag.
    pub fn new(media_type: impl Into<String>, tag: T) -> Self {
        Alternative { media_type: media_type.into(), tag }
    }
}

/// A bare media-type string doubles as its own tag.
impl From<&str> for Alternative<String> {
    fn from(media_type: &str) -> Self {
        Alternative { media_type: media_type.to_owned(), tag: media_type.to_owned() }
    }
}

/// A bare media-type string doubles as its own tag.
impl From<String> for Alternative<String> {
    fn from(media_type: String) -> Self {
        Alternative { media_type: media_type.clone(), tag: media_type }
    }
}

/// Select the best alternative for an `Accept` header.
///
/// Parses `header` with [`parse_accept`], scores every alternative's media
/// type against every parsed range, and returns `Ok(Some(tag))` for the
/// winner. Each alternative is scored by the `q` of its best-matching range;
/// specificity (exact match with params beats exact beats `type/*` beats
/// `*/*`) decides which range that is, not who wins overall. Ties go to the
/// alternative appearing earliest in `alternatives`.
///
/// `Ok(None)` means no alternative overlapped any range even partially. An
/// empty `alternatives` list also yields `Ok(None)`. A range with `q=0`
/// still overlaps: only a type/subtype mismatch excludes an alternative.
///
/// A malformed `type/subtype` in the header or in any alternative's media
/// type fails the whole call.
pub fn negotiate<T>(
    header: &str,
    alternatives: Vec<Alternative<T>>,
) -> Result<Option<T>, MalformedRangeError> {
    let ranges = parse_accept(header)?;
    negotiate_ranges(&ranges, alternatives)
}

/// Score assigned to alternatives whose type/subtype overlaps no range.
const EXCLUDED: f32 = -1.0;

pub(crate) fn negotiate_ranges<T>(
    ranges: &[MediaRange],
    alternatives: Vec<Alternative<T>>,
) -> Result<Option<T>, MalformedRangeError> {
    let mut best: Option<(f32, usize)> = None;

    for (index, alternative) in alternatives.iter().enumerate() {
        let offered = MediaRange::parse(&alternative.media_type)?;
        let score = alternative_score(ranges, &offered);

        // replace only on strictly greater, so the earliest alternative
        // keeps ties
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, index)),
        }
    }

    Ok(match best {
        Some((score, index)) if score != EXCLUDED => alternatives
            .into_iter()
            .nth(index)
            .map(|alternative| alternative.tag),
        _ => None,
    })
}

/// The `q` of the best-scoring range for one offered media type, or
/// [`EXCLUDED`] when no range overlaps its type/subtype.
fn alternative_score(ranges: &[MediaRange], offered: &MediaRange) -> f32 {
    let mut best = 0;
    let mut q = 0.0;

    for range in ranges {
        let score = range_score(range, offered);
        // strictly greater keeps the first maximal range in header order
        if score > best {
            best = score;
            q = range.q;
        }
    }

    if best == 0 { EXCLUDED } else { q }
}

/// Specificity score of one header range against an offered media type.
///
/// An exact type and subtype match scores `12` plus a parameter bonus; a
/// wildcard subtype scores `11`, a wildcard type `8`, no overlap `0`. The
/// bonus makes exact-with-matching-params (14) beat unqualified-exact (13)
/// beat exact-with-mismatched-params (12).
fn range_score(range: &MediaRange, offered: &MediaRange) -> u32 {
    if range.type_ == offered.type_ && range.subtype == offered.subtype {
        12 + param_score(&range.params, &offered.params)
    } else if range.type_ == offered.type_ && range.subtype == "*" {
        11
    } else if range.type_ == "*" {
        8
    } else {
        0
    }
}

/// Parameter bonus: `1` for an unqualified range (matches any parameter
/// set), `2` when both sides carry the same parameters as an unordered
/// multiset, `0` otherwise.
fn param_score(range_params: &[(String, String)], offered_params: &[(String, String)]) -> u32 {
    if range_params.is_empty() {
        return 1;
    }

    if range_params.len() != offered_params.len() {
        return 0;
    }

    // multiset equality: every pair must claim its own partner
    let mut used = vec![false; offered_params.len()];
    for range_param in range_params {
        let partner = offered_params
            .iter()
            .enumerate()
            .position(|(index, offered_param)| !used[index] && offered_param == range_param);
        match partner {
            Some(index) => used[index] = true,
            None => return 0,
        }
    }

    2
}
