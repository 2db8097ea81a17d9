//! `WindowHelper` asks an [EWMH](https://specifications.freedesktop.org/wm-spec/latest/) compatible
//! window manager to move, resize or minimize client windows on behalf of the shell.
//!
//! [Application Window Properties](https://specifications.freedesktop.org/wm-spec/latest/ar01s04.html)
//! Client side decorated windows cannot be dragged by the window manager's own frame. Instead the
//! client sends a `_NET_WM_MOVERESIZE` message to the root window when the user presses a button
//! on its custom title bar or border and the window manager takes over the pointer from there.
//! Minimizing uses the `_NET_WM_STATE` message with the `_NET_WM_STATE_HIDDEN` state.
use crate::{
    atoms::AtomCollection, message, model::*, ErrorWrapper, ShellKitError, ShellKitResult,
};
use std::{collections::HashMap, str, sync::Arc};
use tracing::{debug, trace, warn};

use x11rb::{
    connection::Connection,
    protocol::xproto::{self, Atom, AtomEnum, ClientMessageEvent, ConnectionExt as _, EventMask},
    rust_connection::RustConnection,
};

/// Options used when connecting the helper to the X server
#[derive(Debug, Clone, PartialEq)]
pub struct HelperConfig {
    /// Display to connect to, `$DISPLAY` when not set
    pub display: Option<String>,

    /// Ratio between device pixels and the logical pixels callers work in
    pub device_pixel_ratio: f64,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self { display: None, device_pixel_ratio: 1.0 }
    }
}

/// Window helper implements the move/resize/minimize subset of the EWMH protocol using x11rb
pub struct WindowHelper {
    conn: Arc<RustConnection>,     // x11 connection
    pub atoms: AtomCollection,     // atom cache
    supported: HashMap<u32, bool>, // cache for supported functions
    screen: usize,                 // screen number
    root: u32,                     // root window id
    dpr: f64,                      // device pixel ratio
    compositing: CompositingState, // last known compositing state
}

impl WindowHelper {
    /// Create the window helper and connect to the X11 server named by `$DISPLAY`
    pub fn connect() -> ShellKitResult<Self> {
        WindowHelper::connect_with(HelperConfig::default())
    }

    /// Create the window helper with the given options
    ///
    /// ### Arguments
    /// * `config` - display name and device pixel ratio to use
    ///
    /// ### Examples
    /// ```ignore
    /// use libshellkit::prelude::*;
    /// let helper = WindowHelper::connect_with(HelperConfig { display: Some(":1".into()), device_pixel_ratio: 2.0 }).unwrap();
    /// ```
    pub fn connect_with(config: HelperConfig) -> ShellKitResult<Self> {
        let (conn, screen) = x11rb::connect(config.display.as_deref())?;
        let root = conn.setup().roots.get(screen).ok_or(ShellKitError::NoScreen(screen))?.root;

        // Populate the atom and supported functions cache
        let (atoms, supported) = WindowHelper::init_caching(&conn, root)?;

        let helper = WindowHelper {
            conn: Arc::new(conn),
            atoms,
            supported,
            screen,
            root,
            dpr: config.device_pixel_ratio,
            compositing: CompositingState::default(),
        };
        debug!("connect: screen: {}, root: {}, dpr: {}", screen, root, helper.dpr);
        Ok(helper)
    }

    fn init_caching(conn: &RustConnection, root: u32) -> ShellKitResult<(AtomCollection, HashMap<u32, bool>)> {
        debug!("initializing caching...");

        // Cache atoms
        let atoms = AtomCollection::new(conn)?.reply()?;

        // Cache supported functions. A window manager that doesn't publish the list simply
        // leaves the cache empty.
        let mut supported = HashMap::<u32, bool>::new();
        let reply = conn.get_property(false, root, atoms._NET_SUPPORTED, AtomEnum::ATOM, 0, u32::MAX)?.reply()?;
        if let Some(values) = reply.value32() {
            for atom in values {
                trace!("supported: {}", atom);
                supported.insert(atom, true);
            }
        } else {
            warn!("window manager does not publish _NET_SUPPORTED");
        }
        debug!("caching initialized");
        Ok((atoms, supported))
    }

    /// Get the default screen number
    pub fn screen(&self) -> usize {
        self.screen
    }

    /// Get the root window
    pub fn root(&self) -> u32 {
        self.root
    }

    /// Get the device pixel ratio used to scale logical positions
    pub fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    /// Last known compositing state, false until it is set or refreshed
    pub fn compositing(&self) -> bool {
        self.compositing.active()
    }

    /// Update the compositing state
    ///
    /// Returns true only when the state actually changed.
    pub fn set_compositing(&mut self, enabled: bool) -> bool {
        let changed = self.compositing.update(enabled);
        if changed {
            debug!("compositing changed: {}", enabled);
        }
        changed
    }

    /// Query the X server for a running compositing manager and update the compositing state
    ///
    /// Returns true when the state changed.
    pub fn refresh_compositing(&mut self) -> ShellKitResult<bool> {
        let active = self.composite_manager()?;
        Ok(self.set_compositing(active))
    }

    /// Check if a composite manager is running
    pub fn composite_manager(&self) -> ShellKitResult<bool> {
        // Defined as: _NET_WM_CM_Sn
        // For each screen the compositing manager manages they MUST acquire ownership of a
        // selection named _NET_WM_CM_Sn, where the suffix `n` is the screen number.
        let atom = format!("_NET_WM_CM_S{}", self.screen);
        let atom = self.conn.intern_atom(false, atom.as_bytes())?.reply()?.atom;
        let reply = self.conn.get_selection_owner(atom)?.reply()?;
        let result = reply.owner != x11rb::NONE;
        debug!("composite_manager: {}", result);
        Ok(result)
    }

    /// Get the current pointer position relative to the root window
    pub fn cursor_pos(&self) -> ShellKitResult<Point> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        let pos = Point::new(reply.root_x as i32, reply.root_y as i32);
        trace!("cursor_pos: x: {}, y: {}", pos.x, pos.y);
        Ok(pos)
    }

    /// Ask the window manager to start an interactive move of the window at the pointer position
    ///
    /// ### Arguments
    /// * `win` - id of the window to manipulate
    ///
    /// ### Examples
    /// ```ignore
    /// use libshellkit::prelude::*;
    /// let helper = WindowHelper::connect().unwrap();
    /// helper.start_system_move(12345).unwrap();
    /// ```
    pub fn start_system_move(&self, win: xproto::Window) -> ShellKitResult<()> {
        self.start_system_move_resize(win, MoveResizeAction::Move)
    }

    /// Ask the window manager to start an interactive resize of the window at the pointer
    /// position, anchored to the given edges
    ///
    /// ### Arguments
    /// * `win` - id of the window to manipulate
    /// * `edges` - edges (or a corner) being dragged
    ///
    /// ### Examples
    /// ```ignore
    /// use libshellkit::prelude::*;
    /// let helper = WindowHelper::connect().unwrap();
    /// helper.start_system_resize(12345, Edges::BOTTOM | Edges::RIGHT).unwrap();
    /// ```
    pub fn start_system_resize(&self, win: xproto::Window, edges: Edges) -> ShellKitResult<()> {
        self.start_system_move_resize(win, MoveResizeAction::Resize(edges))
    }

    // The pointer position reported by the server is already in device pixels
    fn start_system_move_resize(&self, win: xproto::Window, action: MoveResizeAction) -> ShellKitResult<()> {
        if is_null_window(win) {
            debug!("start_system_move_resize: no window given");
            return Ok(());
        }
        let cursor = self.cursor_pos()?;
        self.do_start_system_move_resize(win, cursor, 1.0, action)
    }

    /// Start a move or resize for a caller that tracks the pointer in logical coordinates
    ///
    /// ### Arguments
    /// * `win` - id of the window to manipulate
    /// * `pos` - logical pointer position, scaled by the device pixel ratio before sending
    /// * `action` - move or resize along the given edges
    pub fn start_system_move_resize_at(
        &self, win: xproto::Window, pos: Point, action: MoveResizeAction,
    ) -> ShellKitResult<()> {
        if is_null_window(win) {
            debug!("start_system_move_resize_at: no window given");
            return Ok(());
        }
        self.do_start_system_move_resize(win, pos, self.dpr, action)
    }

    fn do_start_system_move_resize(
        &self, win: xproto::Window, pos: Point, dpr: f64, action: MoveResizeAction,
    ) -> ShellKitResult<()> {
        if !self.supported(self.atoms._NET_WM_MOVERESIZE) {
            warn!("window manager does not advertise _NET_WM_MOVERESIZE, sending anyway");
        }

        // The window manager can't grab the pointer while we still hold it
        self.conn.ungrab_pointer(x11rb::CURRENT_TIME)?;

        let msg = message::move_resize_message(win, self.atoms._NET_WM_MOVERESIZE, pos, dpr, action);
        self.send_event(msg)?;
        debug!("move_resize: id: {}, action: {:?}, x: {}, y: {}", win, action, pos.x, pos.y);
        Ok(())
    }

    /// Cancel a move or resize the window manager started for the window
    ///
    /// ### Arguments
    /// * `win` - id of the window to manipulate
    pub fn cancel_system_move_resize(&self, win: xproto::Window) -> ShellKitResult<()> {
        if is_null_window(win) {
            return Ok(());
        }
        self.send_event(message::cancel_message(win, self.atoms._NET_WM_MOVERESIZE))?;
        debug!("cancel_move_resize: id: {}", win);
        Ok(())
    }

    /// Minimize the window by adding the hidden state
    ///
    /// ### Arguments
    /// * `win` - id of the window to manipulate
    ///
    /// ### Examples
    /// ```ignore
    /// use libshellkit::prelude::*;
    /// let helper = WindowHelper::connect().unwrap();
    /// helper.minimize_window(12345).unwrap();
    /// ```
    pub fn minimize_window(&self, win: xproto::Window) -> ShellKitResult<()> {
        if is_null_window(win) {
            debug!("minimize: no window given");
            return Ok(());
        }
        self.send_event(message::minimize_message(
            win,
            self.atoms._NET_WM_STATE,
            self.atoms._NET_WM_STATE_HIDDEN,
        ))?;
        debug!("minimize: id: {}", win);
        Ok(())
    }

    /// Send the event to the root window and flush the connection
    ///
    /// ### Arguments
    /// * `msg` - the client message event to send
    pub fn send_event(&self, msg: ClientMessageEvent) -> ShellKitResult<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY;
        self.conn.send_event(false, self.root, mask, &msg)?.check()?;
        self.conn.flush()?;
        debug!("send_event: win: {}, type: {}", msg.window, msg.type_);
        Ok(())
    }

    /// Determine if the given function is supported by the window manager
    ///
    /// ### Arguments
    /// * `atom` - atom to lookup to see if its supported
    pub fn supported(&self, atom: Atom) -> bool {
        self.supported.get(&atom).is_some()
    }

    /// Get window manager's window id and name
    pub fn winmgr(&self) -> ShellKitResult<(u32, String)> {
        let reply = self
            .conn
            .get_property(false, self.root, self.atoms._NET_SUPPORTING_WM_CHECK, AtomEnum::WINDOW, 0, 1)?
            .reply()?;
        let win = reply
            .value32()
            .and_then(|mut x| x.next())
            .ok_or_else(|| ErrorWrapper::from(ShellKitError::PropertyNotFound("_NET_SUPPORTING_WM_CHECK".into())))?;

        // Defined as: _NET_WM_NAME, UTF8_STRING
        let reply = self
            .conn
            .get_property(false, win, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING, 0, u32::MAX)?
            .reply()?;
        let name = str::from_utf8(&reply.value)?.to_owned();
        debug!("winmgr: id: {}, name: {}", win, name);
        Ok((win, name))
    }
}
