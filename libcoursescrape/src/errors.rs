use std::fmt::Formatter;

#[derive(Debug, PartialEq)]
pub enum CourseError {
    /// Parameter is the cookie file path
    MissingCookieFile(String),
    /// Parameter is the cookie file path
    EmptyCookieFile(String),
    InvalidCookie(String),
    InvalidProxy(String),
    InvalidSelector(String),
    ErrorCreatingDestinationDirectory(String),
    /// parameters are file path, additional error message
    FileOperationError {
        file_name: String,
        message: String,
    },
    NetworkError(String),
    ErrorStatusCode {
        status_code: u16,
        url: String,
    },
    Extract(ExtractError),
}

impl CourseError {
    /// Errors that are detected before any network activity takes place.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CourseError::MissingCookieFile(_)
                | CourseError::EmptyCookieFile(_)
                | CourseError::InvalidCookie(_)
                | CourseError::InvalidProxy(_)
                | CourseError::InvalidSelector(_)
        )
    }
}

impl std::fmt::Display for CourseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            CourseError::MissingCookieFile(path) => {
                format!("cookie file {path} was not found.")
            }
            CourseError::EmptyCookieFile(path) => format!("cookie header in {path} is empty."),
            CourseError::InvalidCookie(err) => format!("cookie header is not valid. {err}"),
            CourseError::InvalidProxy(err) => format!("proxy could not be configured. {err}"),
            CourseError::InvalidSelector(selector) => {
                format!("invalid css selector : {selector}")
            }
            CourseError::ErrorCreatingDestinationDirectory(err) => {
                format!("error creating destination directory. {err}")
            }
            CourseError::FileOperationError { file_name, message } => {
                format!("{message} : {file_name}")
            }
            CourseError::NetworkError(err) => format!("error connecting to internet. {err}"),
            CourseError::ErrorStatusCode { status_code, url } => {
                format!("server returned an error response. {url} => {status_code}")
            }
            CourseError::Extract(err) => format!("{err}"),
        };
        write!(f, "{str}")
    }
}

impl std::error::Error for CourseError {}

impl From<ExtractError> for CourseError {
    fn from(err: ExtractError) -> Self {
        CourseError::Extract(err)
    }
}

/// Failures while pulling lesson fields out of a parsed page.
#[derive(Debug, PartialEq)]
pub enum ExtractError {
    MissingTitle { url: String },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::MissingTitle { url } => {
                write!(f, "no lesson title element found in page {url}")
            }
        }
    }
}

impl std::error::Error for ExtractError {}
