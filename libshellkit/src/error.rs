use std::error::Error as StdError;
use std::fmt;

/// `ShellKitResult<T>` provides a simplified result type with a common error type
pub type ShellKitResult<T> = std::result::Result<T, ErrorWrapper>;

/// ShellKitError defines all the internal errors that `libshellkit` might return
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ShellKitError {
    IconNotFound(String),
    InvalidEdges(String),
    InvalidIconSource(String),
    InvalidWindow(String),
    NoScreen(usize),
    PropertyNotFound(String),
    SvgRender(String),
}
impl std::error::Error for ShellKitError {}
impl fmt::Display for ShellKitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ShellKitError::IconNotFound(ref err) => write!(f, "icon {} was not found", err),
            ShellKitError::InvalidEdges(ref err) => write!(f, "invalid edges were given: {}", err),
            ShellKitError::InvalidIconSource(ref err) => write!(f, "invalid icon source was given: {}", err),
            ShellKitError::InvalidWindow(ref err) => write!(f, "invalid window id was given: {}", err),
            ShellKitError::NoScreen(ref err) => write!(f, "screen {} does not exist", err),
            ShellKitError::PropertyNotFound(ref err) => write!(f, "property {} was not found", err),
            ShellKitError::SvgRender(ref err) => write!(f, "failed to render svg: {}", err),
        }
    }
}

/// ErrorWrapper provides wrapper around all the underlying library dependencys that `libshellkit`
/// uses such that we can easily surface all errors from `libshellkit` in a single easy way.
#[derive(Debug)]
pub enum ErrorWrapper {
    ShellKit(ShellKitError),

    // std errors
    Io(std::io::Error),
    Utf8(std::str::Utf8Error),

    // x11rb errors
    Connect(x11rb::errors::ConnectError),
    Connection(x11rb::errors::ConnectionError),
    Reply(x11rb::errors::ReplyError),

    // image decoding errors
    Image(image::ImageError),
    Svg(resvg::usvg::Error),
}
impl ErrorWrapper {
    /// Implemented directly on the `Error` type to reduce casting required
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.as_ref().is::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.as_ref().downcast_ref::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    /// which allows for using as_ref to get the correct pass through.
    pub fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.as_ref().source()
    }
}
impl StdError for ErrorWrapper {}

impl fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorWrapper::ShellKit(ref err) => write!(f, "{}", err),
            ErrorWrapper::Io(ref err) => write!(f, "{}", err),
            ErrorWrapper::Utf8(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connect(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connection(ref err) => write!(f, "{}", err),
            ErrorWrapper::Reply(ref err) => write!(f, "{}", err),
            ErrorWrapper::Image(ref err) => write!(f, "{}", err),
            ErrorWrapper::Svg(ref err) => write!(f, "{}", err),
        }
    }
}

impl AsRef<dyn StdError> for ErrorWrapper {
    fn as_ref(&self) -> &(dyn StdError + 'static) {
        match *self {
            ErrorWrapper::ShellKit(ref err) => err,
            ErrorWrapper::Io(ref err) => err,
            ErrorWrapper::Utf8(ref err) => err,
            ErrorWrapper::Connect(ref err) => err,
            ErrorWrapper::Connection(ref err) => err,
            ErrorWrapper::Reply(ref err) => err,
            ErrorWrapper::Image(ref err) => err,
            ErrorWrapper::Svg(ref err) => err,
        }
    }
}

impl From<ShellKitError> for ErrorWrapper {
    fn from(err: ShellKitError) -> ErrorWrapper {
        ErrorWrapper::ShellKit(err)
    }
}

impl From<std::io::Error> for ErrorWrapper {
    fn from(err: std::io::Error) -> ErrorWrapper {
        ErrorWrapper::Io(err)
    }
}

impl From<std::str::Utf8Error> for ErrorWrapper {
    fn from(err: std::str::Utf8Error) -> ErrorWrapper {
        ErrorWrapper::Utf8(err)
    }
}

// x11rb errors
//--------------------------------------------------------------------------------------------------
impl From<x11rb::errors::ConnectError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectError) -> ErrorWrapper {
        ErrorWrapper::Connect(err)
    }
}

impl From<x11rb::errors::ConnectionError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectionError) -> ErrorWrapper {
        ErrorWrapper::Connection(err)
    }
}

impl From<x11rb::errors::ReplyError> for ErrorWrapper {
    fn from(err: x11rb::errors::ReplyError) -> ErrorWrapper {
        ErrorWrapper::Reply(err)
    }
}

// image errors
//--------------------------------------------------------------------------------------------------
impl From<image::ImageError> for ErrorWrapper {
    fn from(err: image::ImageError) -> ErrorWrapper {
        ErrorWrapper::Image(err)
    }
}

impl From<resvg::usvg::Error> for ErrorWrapper {
    fn from(err: resvg::usvg::Error) -> ErrorWrapper {
        ErrorWrapper::Svg(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors() {
        let err: ErrorWrapper = ShellKitError::InvalidEdges("diagonal".to_owned()).into();
        assert!(err.is::<ShellKitError>());
        assert_eq!(err.to_string(), "invalid edges were given: diagonal");
        assert_eq!(
            err.downcast_ref::<ShellKitError>(),
            Some(&ShellKitError::InvalidEdges("diagonal".to_owned()))
        );

        let err: ErrorWrapper = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is::<std::io::Error>());
        assert!(!err.is::<ShellKitError>());
    }
}
