use std::fmt;

/// Placeholder shown when a page has no `<title>` element
pub const TITLE_MISSING: &str = "<title> tag missing";

/// What the title extractor made of a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleOutcome {
    /// Whitespace-normalized title text
    Found(String),
    /// The document had no title element
    Missing,
    /// The body stream failed before a title was seen; holds the error description
    Degraded(String),
}

impl TitleOutcome {
    /// The text printed where a title would appear
    pub fn as_display(&self) -> &str {
        match self {
            TitleOutcome::Found(title) => title,
            TitleOutcome::Missing => TITLE_MISSING,
            TitleOutcome::Degraded(reason) => reason,
        }
    }
}

impl fmt::Display for TitleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_display())
    }
}

/// Either a title or an error, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The request succeeded and the body went through the title extractor
    Title(TitleOutcome),
    /// Request construction or transport failed
    Error(String),
}

/// One record per processed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// URL as read from the input
    pub url: String,

    /// HTTP status code, 0 when the request failed
    pub status: u16,

    /// Title or error description
    pub outcome: Outcome,
}

impl FetchResult {
    /// Result for a request that got a response
    pub fn fetched(url: String, status: u16, title: TitleOutcome) -> Self {
        Self {
            url,
            status,
            outcome: Outcome::Title(title),
        }
    }

    /// Result for a request that never got a response
    pub fn failed(url: String, error: impl Into<String>) -> Self {
        Self {
            url,
            status: 0,
            outcome: Outcome::Error(error.into()),
        }
    }

    /// Title text, present only on success
    pub fn title(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Title(title) => Some(title.as_display()),
            Outcome::Error(_) => None,
        }
    }

    /// Error description, present only on failure
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Title(_) => None,
            Outcome::Error(err) => Some(err),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}
