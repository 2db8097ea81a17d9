//! `libshellkit` provides the small pieces of X11 integration a desktop shell needs around its own
//! client side decorated windows and icons.
//!
//! [Window helper](WindowHelper)
//! Uses the [Extended Window Manager Hints (EWMH) specification](https://specifications.freedesktop.org/wm-spec/latest/)
//! to hand interactive moves and resizes over to the window manager via `_NET_WM_MOVERESIZE` and
//! to minimize windows via `_NET_WM_STATE`. It is not a window manager and keeps no protocol state
//! beyond the atoms it interned and whether a compositing manager was last seen running.
//!
//! [Icon item](IconItem)
//! Resolves an icon source, which may be a file, a resource, an in-memory image or an icon theme
//! name, into a pixmap sized for the item and the screen's device pixel ratio.
mod atoms;
mod error;
mod item;
pub mod message;
mod model;
pub mod render;
mod source;
pub mod theme;
mod wm;
pub use atoms::AtomCollection;
pub use error::*;
pub use item::{IconConfig, IconItem};
pub use model::*;
pub use render::Pixmap;
pub use source::IconSource;
pub use theme::{DirTheme, FreedesktopTheme, IconTheme};
pub use wm::{HelperConfig, WindowHelper};

/// All essential symbols in a simple consumable form
///
/// ### Examples
/// ```
/// use libshellkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::*;
}
