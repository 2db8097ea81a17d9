//! Icon theme lookup following the freedesktop
//! [Icon Theme Specification](https://specifications.freedesktop.org/icon-theme-spec/latest/)
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

/// Name of the icon used when a theme icon can't be found
pub const FALLBACK_ICON: &str = "application-x-desktop";

/// Resolves icon names to files
pub trait IconTheme {
    /// Find the file for the named icon closest to the given logical size
    ///
    /// ### Arguments
    /// * `name` - icon name e.g. `folder`
    /// * `size` - logical size in pixels of the largest side
    /// * `scale` - integer scale factor of the display
    fn lookup(&self, name: &str, size: u32, scale: u32) -> Option<PathBuf>;
}

/// Theme lookup over the installed freedesktop icon themes
#[derive(Debug, Clone, Default)]
pub struct FreedesktopTheme {
    theme: Option<String>,
}

impl FreedesktopTheme {
    /// Use the given theme, or the system theme when `None`, with the standard fallbacks
    pub fn new(theme: Option<String>) -> Self {
        Self { theme }
    }
}

impl IconTheme for FreedesktopTheme {
    fn lookup(&self, name: &str, size: u32, scale: u32) -> Option<PathBuf> {
        let theme = self.theme.clone().or_else(linicon::get_system_theme);
        let mut builder = linicon::lookup_icon(name)
            .with_size(size.clamp(1, u16::MAX as u32) as u16)
            .with_scale(scale.clamp(1, u16::MAX as u32) as u16)
            .use_fallback_themes(true);
        if let Some(theme) = theme.as_deref() {
            builder = builder.from_theme(theme);
        }

        let path = builder.into_iter().filter_map(Result::ok).map(|icon| icon.path).find(|path| renderable(path));
        debug!("lookup: name: {}, theme: {:?}, size: {}@{}, found: {:?}", name, theme, size, scale, path);
        path
    }
}

/// Theme made of plain directories searched for `<name>.png` or `<name>.svg`, checking
/// `<size>x<size>` sub-directories first
#[derive(Debug, Clone, Default)]
pub struct DirTheme {
    dirs: Vec<PathBuf>,
}

impl DirTheme {
    pub fn new<T: Into<PathBuf>>(dirs: impl IntoIterator<Item = T>) -> Self {
        Self { dirs: dirs.into_iter().map(Into::into).collect() }
    }
}

impl IconTheme for DirTheme {
    fn lookup(&self, name: &str, size: u32, scale: u32) -> Option<PathBuf> {
        let px = size.saturating_mul(scale.max(1));
        for dir in &self.dirs {
            for sub in [dir.join(format!("{}x{}", px, px)), dir.join("scalable"), dir.clone()] {
                for ext in ["svg", "png"] {
                    let path = sub.join(format!("{}.{}", name, ext));
                    trace!("lookup: trying {}", path.display());
                    if path.is_file() {
                        return Some(path);
                    }
                }
            }
        }
        None
    }
}

// Only png and svg icons can be rasterized, legacy xpm icons are skipped
fn renderable(path: &Path) -> bool {
    matches!(path.extension().and_then(|x| x.to_str()), Some("png") | Some("svg") | Some("svgz"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_dir_theme_prefers_sized_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("32x32")).unwrap();
        fs::write(tmp.path().join("folder.png"), b"").unwrap();
        fs::write(tmp.path().join("32x32/folder.png"), b"").unwrap();

        let theme = DirTheme::new([tmp.path()]);
        assert_eq!(theme.lookup("folder", 32, 1), Some(tmp.path().join("32x32/folder.png")));
        assert_eq!(theme.lookup("folder", 16, 2), Some(tmp.path().join("32x32/folder.png")));
        assert_eq!(theme.lookup("folder", 48, 1), Some(tmp.path().join("folder.png")));
        assert_eq!(theme.lookup("missing", 48, 1), None);
    }

    #[test]
    fn test_dir_theme_huge_size() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("folder.png"), b"").unwrap();
        let theme = DirTheme::new([tmp.path()]);
        assert_eq!(theme.lookup("folder", u32::MAX, 2), Some(tmp.path().join("folder.png")));
    }

    #[test]
    fn test_renderable() {
        assert!(renderable(Path::new("/usr/share/icons/hicolor/48x48/apps/a.png")));
        assert!(renderable(Path::new("/usr/share/icons/hicolor/scalable/apps/a.svg")));
        assert!(!renderable(Path::new("/usr/share/pixmaps/a.xpm")));
    }
}
