//! Classification of the values an icon item can be pointed at
use std::path::{Path, PathBuf};

use image::RgbaImage;

/// Where an icon item takes its pixels from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IconSource {
    #[default]
    Empty,

    /// Absolute path on the local file system
    File(PathBuf),

    /// Resource path of the form `:/path`, resolved against the configured resource root
    Resource(String),

    /// Name looked up in the icon theme e.g. `system-file-manager`
    Theme(String),

    /// Image already held in memory
    Image(RgbaImage),
}

impl IconSource {
    /// Classify a source string
    ///
    /// ### Arguments
    /// * `val` - a `file:` URL, an absolute path, a `qrc:/` or `:/` resource path or a theme name
    ///
    /// ### Examples
    /// ```
    /// use libshellkit::prelude::*;
    /// assert_eq!(IconSource::parse("/usr/share/pixmaps/a.png"), IconSource::File("/usr/share/pixmaps/a.png".into()));
    /// assert_eq!(IconSource::parse("qrc:/images/logo.svg"), IconSource::Resource(":/images/logo.svg".into()));
    /// assert_eq!(IconSource::parse("firefox"), IconSource::Theme("firefox".into()));
    /// ```
    pub fn parse(val: &str) -> IconSource {
        if val.is_empty() {
            IconSource::Empty
        } else if let Some(rest) = val.strip_prefix("file:") {
            IconSource::File(PathBuf::from(file_url_path(rest)))
        } else if val.starts_with('/') {
            IconSource::File(PathBuf::from(val))
        } else if let Some(rest) = val.strip_prefix("qrc") {
            if rest.starts_with(":/") {
                IconSource::Resource(rest.to_owned())
            } else {
                IconSource::Theme(val.to_owned())
            }
        } else if val.starts_with(":/") {
            IconSource::Resource(val.to_owned())
        } else {
            IconSource::Theme(val.to_owned())
        }
    }

    /// Resolve file and resource sources to a local path
    ///
    /// ### Arguments
    /// * `resource_root` - directory that `:/` resource paths are relative to
    pub fn local_path(&self, resource_root: Option<&Path>) -> Option<PathBuf> {
        match self {
            IconSource::File(path) => Some(path.clone()),
            IconSource::Resource(res) => {
                resource_root.map(|root| root.join(res.trim_start_matches(":/")))
            },
            _ => None,
        }
    }
}

impl From<&str> for IconSource {
    fn from(val: &str) -> Self {
        IconSource::parse(val)
    }
}

impl From<String> for IconSource {
    fn from(val: String) -> Self {
        IconSource::parse(&val)
    }
}

impl From<RgbaImage> for IconSource {
    fn from(val: RgbaImage) -> Self {
        IconSource::Image(val)
    }
}

/// True for files that are rendered on demand at the requested size rather than decoded up
/// front: scalable images and multi-size icon containers.
pub fn is_icon_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|x| x.to_str()), Some("svg") | Some("svgz") | Some("ico"))
}

// Strip the authority from the remainder of a `file:` URL and percent-decode the path
fn file_url_path(rest: &str) -> String {
    let path = match rest.strip_prefix("//") {
        Some(authority) => match authority.find('/') {
            Some(idx) => &authority[idx..],
            None => "",
        },
        None => rest,
    };
    percent_decode(path)
}

fn percent_decode(val: &str) -> String {
    let bytes = val.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok().and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(b) = hex {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_files() {
        assert_eq!(IconSource::parse("file:///usr/share/icons/a.png"), IconSource::File("/usr/share/icons/a.png".into()));
        assert_eq!(IconSource::parse("file://localhost/tmp/b.svg"), IconSource::File("/tmp/b.svg".into()));
        assert_eq!(IconSource::parse("file:/tmp/c.png"), IconSource::File("/tmp/c.png".into()));
        assert_eq!(IconSource::parse("file:///tmp/my%20icon.png"), IconSource::File("/tmp/my icon.png".into()));
        assert_eq!(IconSource::parse("/opt/app/logo.ico"), IconSource::File("/opt/app/logo.ico".into()));
    }

    #[test]
    fn test_parse_resources() {
        assert_eq!(IconSource::parse("qrc:/images/close.svg"), IconSource::Resource(":/images/close.svg".into()));
        assert_eq!(IconSource::parse(":/images/close.svg"), IconSource::Resource(":/images/close.svg".into()));

        let root = Path::new("/usr/share/shellkit");
        assert_eq!(
            IconSource::parse("qrc:/images/close.svg").local_path(Some(root)),
            Some(PathBuf::from("/usr/share/shellkit/images/close.svg"))
        );
        assert_eq!(IconSource::parse(":/images/close.svg").local_path(None), None);
    }

    #[test]
    fn test_parse_theme_names() {
        assert_eq!(IconSource::parse("system-file-manager"), IconSource::Theme("system-file-manager".into()));
        assert_eq!(IconSource::parse("qrcode"), IconSource::Theme("qrcode".into()));
        assert_eq!(IconSource::parse(""), IconSource::Empty);
        assert_eq!(IconSource::parse("firefox").local_path(None), None);
    }

    #[test]
    fn test_icon_files() {
        assert!(is_icon_file(Path::new("/a/b.svg")));
        assert!(is_icon_file(Path::new("/a/b.svgz")));
        assert!(is_icon_file(Path::new("/a/b.ico")));
        assert!(!is_icon_file(Path::new("/a/b.png")));
        assert!(!is_icon_file(Path::new("/a/svg")));
    }

    #[test]
    fn test_percent_decode_keeps_invalid_escapes() {
        assert_eq!(percent_decode("a%2Fb"), "a/b");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}
