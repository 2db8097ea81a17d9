//! Construction of the client messages sent to the window manager. Kept free of any connection
//! so that the exact wire fields can be checked without an X server.
use x11rb::protocol::xproto::{self, Atom, ClientMessageEvent};

use crate::model::*;

/// Button index sent with interactive move-resize requests (the primary button)
pub const MOVERESIZE_BUTTON: u32 = 1;

/// Source indication sent with move-resize requests
pub const MOVERESIZE_SOURCE: u32 = 0;

/// Build a `_NET_WM_MOVERESIZE` message
///
/// ### Arguments
/// * `win` - id of the window to manipulate
/// * `atom` - interned `_NET_WM_MOVERESIZE` atom
/// * `cursor` - logical cursor position in root coordinates
/// * `dpr` - device pixel ratio used to scale the cursor position
/// * `action` - move or resize along the given edges
pub fn move_resize_message(
    win: xproto::Window, atom: Atom, cursor: Point, dpr: f64, action: MoveResizeAction,
) -> ClientMessageEvent {
    let (x, y) = cursor.to_device(dpr);
    let direction: u32 = MoveResizeDirection::from(action).into();
    ClientMessageEvent::new(32, win, atom, [x, y, direction, MOVERESIZE_BUTTON, MOVERESIZE_SOURCE])
}

/// Build a `_NET_WM_MOVERESIZE` message that cancels an ongoing move-resize
pub fn cancel_message(win: xproto::Window, atom: Atom) -> ClientMessageEvent {
    let direction: u32 = MoveResizeDirection::Cancel.into();
    ClientMessageEvent::new(32, win, atom, [0, 0, direction, 0, 0])
}

/// Build a `_NET_WM_STATE` message that adds, removes or toggles a single state
pub fn state_message(
    win: xproto::Window, state_atom: Atom, action: WindowStateAction, state: Atom,
) -> ClientMessageEvent {
    ClientMessageEvent::new(32, win, state_atom, [action.into(), state, 0, 0, 0])
}

/// Build the `_NET_WM_STATE` message that asks the window manager to hide (minimize) a window
pub fn minimize_message(win: xproto::Window, state_atom: Atom, hidden_atom: Atom) -> ClientMessageEvent {
    state_message(win, state_atom, WindowStateAction::Add, hidden_atom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIN: u32 = 0x0260_0007;
    const MOVERESIZE: u32 = 301;
    const STATE: u32 = 302;
    const HIDDEN: u32 = 303;

    #[test]
    fn test_move_message() {
        let msg = move_resize_message(WIN, MOVERESIZE, Point::new(640, 360), 1.0, MoveResizeAction::Move);
        assert_eq!(msg.format, 32);
        assert_eq!(msg.window, WIN);
        assert_eq!(msg.type_, MOVERESIZE);
        assert_eq!(msg.data.as_data32(), [640, 360, 8, 1, 0]);
    }

    #[test]
    fn test_resize_message_scales_cursor() {
        let action = MoveResizeAction::Resize(Edges::BOTTOM | Edges::RIGHT);
        let msg = move_resize_message(WIN, MOVERESIZE, Point::new(100, 50), 2.0, action);
        assert_eq!(msg.data.as_data32(), [200, 100, 4, 1, 0]);

        let action = MoveResizeAction::Resize(Edges::TOP);
        let msg = move_resize_message(WIN, MOVERESIZE, Point::new(3, 3), 1.5, action);
        assert_eq!(msg.data.as_data32(), [4, 4, 1, 1, 0]);
    }

    #[test]
    fn test_cancel_message() {
        let msg = cancel_message(WIN, MOVERESIZE);
        assert_eq!(msg.type_, MOVERESIZE);
        assert_eq!(msg.data.as_data32(), [0, 0, 11, 0, 0]);
    }

    #[test]
    fn test_minimize_message() {
        let msg = minimize_message(WIN, STATE, HIDDEN);
        assert_eq!(msg.format, 32);
        assert_eq!(msg.window, WIN);
        assert_eq!(msg.type_, STATE);
        assert_eq!(msg.data.as_data32(), [1, HIDDEN, 0, 0, 0]);
    }
}
