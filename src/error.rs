use err_derive::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(display = "Invalid IoU threshold: {} (expected a finite value in [0, 1])", _0)]
    InvalidThreshold(f32),

    #[error(display = "Malformed detection box at index {}", _0)]
    InvalidDetection(usize),

    #[error(display = "Malformed tracker box at index {}", _0)]
    InvalidTracker(usize),

    #[error(display = "Assignment Error: {}", _0)]
    Assignment(String),

    #[error(display = "Config Error: {}", _0)]
    Config(String),

    #[error(display = "IO Error: {}", _0)]
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<munkres::Error> for Error {
    fn from(err: munkres::Error) -> Self {
        Self::Assignment(format!("{:?}", err))
    }
}
