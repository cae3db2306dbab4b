use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Book2AnkiError {
    /// Frequency dictionary or analyzer dictionary is missing, corrupt or unrecognized.
    #[error("Data error: {message}")]
    Data { message: String, source: Option<Box<dyn std::error::Error + Send + Sync>> },

    /// An input file could not be read or is not a supported text file.
    #[error("Input error for {}: {message}", path.display())]
    Input { path: PathBuf, message: String },

    /// The deck could not be written.
    #[error("I/O error writing {}: {source}", path.display())]
    Io { path: PathBuf, source: Box<std::io::Error> },

    #[error("Invalid settings file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Failed to serialize deck: {0}")]
    Serialize(String),
}

impl Book2AnkiError {
    pub fn data(message: impl Into<String>) -> Self {
        Book2AnkiError::Data { message: message.into(), source: None }
    }

    pub fn data_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Book2AnkiError::Data { message: message.into(), source: Some(Box::new(source)) }
    }

    pub fn input(path: &Path, message: impl Into<String>) -> Self {
        Book2AnkiError::Input { path: path.to_path_buf(), message: message.into() }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Book2AnkiError::Io { path: path.to_path_buf(), source: Box::new(source) }
    }

    /// Process exit code for this failure category.
    pub fn exit_code(&self) -> u8 {
        match self {
            Book2AnkiError::Data { .. } | Book2AnkiError::Config { .. } => 2,
            Book2AnkiError::Input { .. } => 3,
            Book2AnkiError::Io { .. } | Book2AnkiError::Serialize(_) => 4,
        }
    }
}

impl From<vibrato::errors::VibratoError> for Book2AnkiError {
    fn from(error: vibrato::errors::VibratoError) -> Self {
        Book2AnkiError::data_with(format!("analyzer dictionary: {}", error), error)
    }
}

impl From<zip::result::ZipError> for Book2AnkiError {
    fn from(error: zip::result::ZipError) -> Self {
        Book2AnkiError::data_with(format!("frequency archive: {}", error), error)
    }
}

impl From<csv::Error> for Book2AnkiError {
    fn from(error: csv::Error) -> Self {
        Book2AnkiError::Serialize(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Book2AnkiError::data("missing").exit_code(), 2);
        assert_eq!(Book2AnkiError::input(Path::new("a.txt"), "unreadable").exit_code(), 3);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Book2AnkiError::io(Path::new("out.tsv"), io).exit_code(), 4);
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = Book2AnkiError::input(Path::new("book.epub"), "unsupported file type");
        assert_eq!(err.to_string(), "Input error for book.epub: unsupported file type");
    }
}
