//! HTTP actions and the explicit control-flow type used instead of
//! exceptions.

use std::fmt;

use http::StatusCode;

/// A response the engine wants sent to the browser right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAction {
    /// `302 Found` with a `Location` header.
    Redirect { location: String },
    /// `303 See Other` with a `Location` header.
    SeeOther { location: String },
    /// A response with a body, e.g. an auto-submitting form.
    Content { status: StatusCode, body: String },
    /// A bare status code (400, 401, 403, ...).
    Status(StatusCode),
}

impl HttpAction {
    #[must_use]
    pub fn redirect(location: &str) -> Self {
        Self::Redirect {
            location: location.to_owned(),
        }
    }

    #[must_use]
    pub fn see_other(location: &str) -> Self {
        Self::SeeOther {
            location: location.to_owned(),
        }
    }

    #[must_use]
    pub fn ok(body: &str) -> Self {
        Self::Content {
            status: StatusCode::OK,
            body: body.to_owned(),
        }
    }

    #[must_use]
    pub fn bad_request() -> Self {
        Self::Status(StatusCode::BAD_REQUEST)
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Status(StatusCode::UNAUTHORIZED)
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::Status(StatusCode::FORBIDDEN)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Redirect { .. } => StatusCode::FOUND,
            Self::SeeOther { .. } => StatusCode::SEE_OTHER,
            Self::Content { status, .. } | Self::Status(status) => *status,
        }
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect { location } | Self::SeeOther { location } => Some(location),
            Self::Content { .. } | Self::Status(_) => None,
        }
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Content { body, .. } => Some(body),
            Self::Redirect { .. } | Self::SeeOther { .. } | Self::Status(_) => None,
        }
    }
}

impl fmt::Display for HttpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(location) => write!(f, "{} -> {location}", self.status()),
            None => write!(f, "{}", self.status()),
        }
    }
}

/// Outcome of an engine step: either keep going with a value, or stop and
/// send an HTTP action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow<T> {
    Continue(T),
    Action(HttpAction),
}

impl<T> Flow<T> {
    #[must_use]
    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action(_))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn redirect_carries_found_and_location() {
        let action = HttpAction::redirect("/home");

        assert_eq!(action.status(), StatusCode::FOUND);
        assert_eq!(action.location(), Some("/home"));
        assert!(action.body().is_none());
        assert_eq!(action.to_string(), "302 Found -> /home");
    }

    #[test]
    fn status_actions_have_no_location() {
        assert_eq!(HttpAction::unauthorized().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(HttpAction::forbidden().location(), None);
        assert_eq!(HttpAction::bad_request().to_string(), "400 Bad Request");
    }

    #[test]
    fn content_action_exposes_body() {
        let action = HttpAction::ok("<form></form>");

        assert_eq!(action.status(), StatusCode::OK);
        assert_eq!(action.body(), Some("<form></form>"));
    }

    #[test]
    fn flow_reports_actions() {
        assert!(Flow::<()>::Action(HttpAction::forbidden()).is_action());
        assert!(!Flow::Continue(1).is_action());
    }
}
