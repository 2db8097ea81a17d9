//! `IconItem` shows a single icon at whatever size the shell lays it out at. The source may be a
//! file, a resource, an in-memory image or an icon theme name; the pixmap is re-rendered for the
//! item's size and device pixel ratio whenever either changes.
use std::path::PathBuf;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::{
    render::{self, Pixmap},
    source::{self, IconSource},
    theme::{FreedesktopTheme, IconTheme, FALLBACK_ICON},
};

/// Options shared by icon items
#[derive(Debug, Clone, PartialEq)]
pub struct IconConfig {
    /// Icon theme to look names up in, the system theme when not set
    pub theme: Option<String>,

    /// Icon used when a theme name can't be found
    pub fallback_icon: String,

    /// Directory that `:/` resource paths are resolved against
    pub resource_root: Option<PathBuf>,

    /// Ratio between device pixels and the item's logical size
    pub device_pixel_ratio: f64,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            theme: None,
            fallback_icon: FALLBACK_ICON.to_owned(),
            resource_root: None,
            device_pixel_ratio: 1.0,
        }
    }
}

// What the source resolved to, only one kind is held at a time
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Nothing,
    ThemeName(String),
    IconFile(PathBuf),
    Image(RgbaImage),
}

impl Resolved {
    // An image without pixels renders nothing
    fn image(img: RgbaImage) -> Self {
        if img.width() == 0 || img.height() == 0 {
            Resolved::Nothing
        } else {
            Resolved::Image(img)
        }
    }
}

pub struct IconItem {
    config: IconConfig,
    theme: Box<dyn IconTheme>,
    source: Option<IconSource>,
    resolved: Resolved,
    width: f64,
    height: f64,
    complete: bool,
    pixmap: Option<Pixmap>,
    updates: u64,
}

impl IconItem {
    /// Create an icon item that looks names up in the installed freedesktop icon themes
    pub fn new(config: IconConfig) -> Self {
        let theme = Box::new(FreedesktopTheme::new(config.theme.clone()));
        IconItem::with_theme(config, theme)
    }

    /// Create an icon item with a custom theme lookup
    pub fn with_theme(config: IconConfig, theme: Box<dyn IconTheme>) -> Self {
        Self {
            config,
            theme,
            source: None,
            resolved: Resolved::Nothing,
            width: 0.0,
            height: 0.0,
            complete: false,
            pixmap: None,
            updates: 0,
        }
    }

    /// Current source, `None` until one has been set
    pub fn source(&self) -> Option<&IconSource> {
        self.source.as_ref()
    }

    /// Current pixmap, `None` when nothing could be rendered
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Number of times the item asked to be repainted
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set where the icon comes from
    ///
    /// Returns false without doing anything when the source is unchanged, otherwise true. A new
    /// item has no source at all, so even an empty first source counts as a change.
    ///
    /// ### Arguments
    /// * `source` - anything convertible into an `IconSource` e.g. `"folder"` or `"file:///a.png"`
    ///
    /// ### Examples
    /// ```ignore
    /// use libshellkit::prelude::*;
    /// let mut item = IconItem::new(IconConfig::default());
    /// item.set_geometry(48.0, 48.0);
    /// item.complete();
    /// assert!(item.set_source("system-file-manager"));
    /// ```
    pub fn set_source(&mut self, source: impl Into<IconSource>) -> bool {
        let source = source.into();
        if self.source.as_ref() == Some(&source) {
            return false;
        }

        self.resolved = match &source {
            IconSource::Empty => Resolved::Nothing,
            IconSource::Theme(name) => Resolved::ThemeName(name.clone()),
            IconSource::Image(img) => Resolved::image(img.clone()),
            IconSource::File(_) | IconSource::Resource(_) => {
                match source.local_path(self.config.resource_root.as_deref()) {
                    Some(path) if source::is_icon_file(&path) => Resolved::IconFile(path),
                    Some(path) => match render::load_image(&path) {
                        Ok(img) => Resolved::image(img),
                        Err(err) => {
                            warn!("failed to load {}: {}", path.display(), err);
                            Resolved::Nothing
                        },
                    },
                    None => {
                        warn!("no resource root to resolve {:?}", source);
                        Resolved::Nothing
                    },
                }
            },
        };
        debug!("set_source: {:?}", self.resolved_kind());
        self.source = Some(source);

        if self.width > 0.0 && self.height > 0.0 {
            self.load_pixmap();
        }
        true
    }

    /// Update the item size, re-rendering when it has a visible area
    pub fn set_geometry(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        if width > 0.0 && height > 0.0 {
            self.load_pixmap();
        }
    }

    /// Change the device pixel ratio e.g. when the item moves to another screen
    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        if dpr > 0.0 && dpr != self.config.device_pixel_ratio {
            self.config.device_pixel_ratio = dpr;
            self.load_pixmap();
        }
    }

    /// Mark the item as fully constructed, nothing is rendered before this
    pub fn complete(&mut self) {
        self.complete = true;
        self.load_pixmap();
    }

    /// Re-render the icon e.g. after the icon theme changed
    pub fn update_icon(&mut self) {
        self.load_pixmap();
    }

    /// Render the resolved source at the current size and device pixel ratio
    pub fn load_pixmap(&mut self) {
        if !self.complete {
            return;
        }

        let (w, h) = (self.width.trunc(), self.height.trunc());
        if w <= 0.0 || h <= 0.0 {
            self.set_pixmap(None);
            return;
        }

        let dpr = self.config.device_pixel_ratio;
        let bounds = render::device_bounds(w, h, dpr);

        let image = match &self.resolved {
            Resolved::ThemeName(name) => self.render_theme_icon(name, w.max(h) as u32, bounds),
            Resolved::IconFile(path) => match render::render_icon_file(path, bounds) {
                Ok(img) => Some(img),
                Err(err) => {
                    warn!("failed to render {}: {}", path.display(), err);
                    None
                },
            },
            Resolved::Image(img) => Some(render::scale_to_fit(img, bounds)),
            Resolved::Nothing => None,
        };
        self.set_pixmap(image.map(|image| Pixmap { image, device_pixel_ratio: dpr }));
    }

    /// Draw the pixmap over the item's bounding rectangle on a canvas in device pixels
    pub fn paint(&self, canvas: &mut RgbaImage) {
        if let Some(pixmap) = &self.pixmap {
            let dpr = self.config.device_pixel_ratio;
            let target = render::device_bounds(self.width, self.height, dpr);
            render::draw_pixmap(canvas, &pixmap.image, target);
        }
    }

    fn render_theme_icon(&self, name: &str, size: u32, bounds: (u32, u32)) -> Option<RgbaImage> {
        let scale = self.config.device_pixel_ratio.ceil().max(1.0) as u32;
        let path = self
            .theme
            .lookup(name, size, scale)
            .or_else(|| {
                debug!("icon {} not in theme, using {}", name, self.config.fallback_icon);
                self.theme.lookup(&self.config.fallback_icon, size, scale)
            })?;
        match render::render_icon_file(&path, bounds) {
            Ok(img) => Some(img),
            Err(err) => {
                warn!("failed to render {}: {}", path.display(), err);
                None
            },
        }
    }

    fn set_pixmap(&mut self, pixmap: Option<Pixmap>) {
        self.pixmap = pixmap;
        self.updates += 1;
    }

    fn resolved_kind(&self) -> &'static str {
        match self.resolved {
            Resolved::Nothing => "nothing",
            Resolved::ThemeName(_) => "theme",
            Resolved::IconFile(_) => "icon file",
            Resolved::Image(_) => "image",
        }
    }
}
