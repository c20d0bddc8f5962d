use std::iter;

use axum::http::header::ACCEPT;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::{self, Header, HeaderName, HeaderValue};

use crate::{negotiate_ranges, parse_accept, Alternative, MalformedRangeError, MediaRange};

/// Typed `Accept` request header: the client's media ranges in header order.
///
/// Extract it in a handler with [`TypedHeader`][1] and feed it to
/// [`Accept::negotiate`]. A missing header means the client accepts
/// anything; use [`Accept::any`] as the default in that case.
///
/// [1]: https://docs.rs/axum-extra/latest/axum_extra/struct.TypedHeader.html
#[derive(Debug, Clone, PartialEq)]
pub struct Accept(pub Vec<MediaRange>);

impl Accept {
    /// The `*/*` preference: accepts any media type at `q = 1`.
    pub fn any() -> Self {
        Accept(vec![MediaRange {
            type_: "*".to_owned(),
            subtype: "*".to_owned(),
            q: 1.0,
            params: Vec::new(),
        }])
    }

    /// Parsed media ranges in header order.
    pub fn ranges(&self) -> &[MediaRange] {
        &self.0
    }

    /// Select the best alternative for these ranges.
    ///
    /// Same selection rules as [`negotiate`](crate::negotiate) with the
    /// header already parsed, so only a malformed alternative media type can
    /// fail the call.
    pub fn negotiate<T>(
        &self,
        alternatives: Vec<Alternative<T>>,
    ) -> Result<Option<T>, MalformedRangeError> {
        negotiate_ranges(&self.0, alternatives)
    }
}

impl Header for Accept {
    fn name() -> &'static HeaderName {
        &ACCEPT
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let mut ranges = Vec::new();
        let mut seen = false;

        // a comma-list header may be split across multiple field lines
        for value in values {
            seen = true;
            let text = value.to_str().map_err(|_| headers::Error::invalid())?;
            ranges.extend(parse_accept(text).map_err(|_| headers::Error::invalid())?);
        }

        if seen {
            Ok(Accept(ranges))
        } else {
            Err(headers::Error::invalid())
        }
    }

    fn encode<E>(&self, values: &mut E)
    where
        E: Extend<HeaderValue>,
    {
        let header = self
            .0
            .iter()
            .map(|range| range.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        // ranges normally hold header-derived tokens; hand-built ones with
        // non-header characters are skipped rather than panicking
        if let Ok(value) = HeaderValue::from_str(&header) {
            values.extend(iter::once(value));
        }
    }
}

/// Error type indicating that no alternative was acceptable to the client.
/// Implements [`IntoResponse`], responding with `406 Not Acceptable`.
#[derive(Debug, Clone)]
pub struct NotAcceptable;

impl IntoResponse for NotAcceptable {
    fn into_response(self) -> Response {
        StatusCode::NOT_ACCEPTABLE.into_response()
    }
}
