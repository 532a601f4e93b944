use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct AppError(Box<ErrorKind>);

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),
    #[error("EncodedSeriesError: series `{key}` is not a valid JSON pair list: {source}")]
    EncodedSeries {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("UrlTemplateError: no value for placeholder `{0}`")]
    UnresolvedPlaceholder(String),
    #[error("UrlTemplateError: unterminated placeholder at byte {0}")]
    UnterminatedPlaceholder(usize),
}

impl AppError {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }
}

impl<E> From<E> for AppError
where
    ErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        AppError(Box::new(ErrorKind::from(err)))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
