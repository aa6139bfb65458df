use std::fmt;

/// Errors raised while consuming a class-file event stream.
///
/// The checking consumers ([`crate::check`]) raise `Sequencing` and
/// `InvalidArgument` synchronously at the offending call, before the event
/// reaches anything downstream. `IoError` can only come out of the final
/// flush of a rendered tree to a writer.
#[derive(Debug)]
pub enum Error {
    /// An event arrived while its scope's state machine forbids it
    Sequencing(&'static str),

    /// A malformed descriptor, signature, name, flag set, or numeric operand
    InvalidArgument(String),

    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Sequencing(msg) => write!(f, "{}", msg),
            Error::InvalidArgument(msg) => write!(f, "{}", msg),
            Error::IoError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
