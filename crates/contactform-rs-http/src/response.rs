//! Responses produced by the contact endpoints.
//!
//! [`SubmissionResponse`] covers the three shapes a submission can end in:
//! a rendered page, a redirect back to the form with an outcome flag, or a
//! JSON document for asynchronous submissions. [`HttpError`] turns a
//! [`FormsError`] into a plain-text error response.

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderValue, StatusCode};

use contactform_rs_core::FormsError;

/// A finished submission, ready to be written to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResponse {
    /// An HTML page.
    Page {
        /// The status code.
        status: StatusCode,
        /// The document.
        html: String,
    },
    /// A `303 See Other` to the given location.
    Redirect(String),
    /// A JSON document.
    Json {
        /// The status code.
        status: StatusCode,
        /// The document.
        body: serde_json::Value,
    },
}

impl SubmissionResponse {
    /// A `200 OK` page.
    pub fn page(html: impl Into<String>) -> Self {
        Self::Page {
            status: StatusCode::OK,
            html: html.into(),
        }
    }

    /// Returns the status code that will be sent.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Page { status, .. } | Self::Json { status, .. } => *status,
            Self::Redirect(_) => StatusCode::SEE_OTHER,
        }
    }
}

impl IntoResponse for SubmissionResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = match self {
            Self::Page { html, .. } => {
                let mut response = Response::new(Body::from(html));
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/html; charset=utf-8"),
                );
                response
            }
            Self::Redirect(location) => {
                let mut response = Response::new(Body::empty());
                if let Ok(value) = HeaderValue::from_str(&location) {
                    response.headers_mut().insert(LOCATION, value);
                }
                response
            }
            Self::Json { body, .. } => {
                let mut response = Response::new(Body::from(body.to_string()));
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                response
            }
        };
        *response.status_mut() = status;
        response
    }
}

/// A [`FormsError`] rendered as a plain-text response with its mapped status.
#[derive(Debug)]
pub struct HttpError(pub FormsError);

impl From<FormsError> for HttpError {
    fn from(err: FormsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        (status, self.0.to_string()).into_response()
    }
}
