use std::{convert, fmt};

use bitflags::bitflags;
use tracing::warn;

use crate::ShellKitError;

bitflags! {
    /// Edges of a window that an interactive resize is anchored to. Corners are expressed by
    /// combining two adjacent edges.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Edges: u32 {
        const TOP    = 1 << 0;
        const LEFT   = 1 << 1;
        const RIGHT  = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

// Implement format! support
impl fmt::Display for Edges {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = [
            (Edges::TOP, "top"),
            (Edges::BOTTOM, "bottom"),
            (Edges::LEFT, "left"),
            (Edges::RIGHT, "right"),
        ]
        .iter()
        .filter(|(edge, _)| self.contains(*edge))
        .map(|(_, name)| *name)
        .collect();
        write!(f, "{}", names.join("-"))
    }
}

// Convert from &str to Edges e.g. `top-left`, `bottom,right` or `LEFT`
impl convert::TryFrom<&str> for Edges {
    type Error = ShellKitError;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        let mut edges = Edges::empty();
        for part in val.split(|c| c == '-' || c == ',' || c == '|' || c == '+') {
            edges |= match part.trim().to_lowercase().as_ref() {
                "top" => Edges::TOP,
                "left" => Edges::LEFT,
                "right" => Edges::RIGHT,
                "bottom" => Edges::BOTTOM,
                _ => return Err(ShellKitError::InvalidEdges(val.to_string())),
            };
        }
        Ok(edges)
    }
}

// Convert from String to Edges
impl convert::TryFrom<String> for Edges {
    type Error = ShellKitError;

    fn try_from(val: String) -> Result<Self, Self::Error> {
        Edges::try_from(val.as_str())
    }
}

/// MoveResizeDirection is the third data field of a `_NET_WM_MOVERESIZE` client message
/// <https://specifications.freedesktop.org/wm-spec/latest/ar01s04.html#idm46409506331616>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResizeDirection {
    SizeTopLeft,
    SizeTop,
    SizeTopRight,
    SizeRight,
    SizeBottomRight,
    SizeBottom,
    SizeBottomLeft,
    SizeLeft,
    Move,
    SizeKeyboard,
    MoveKeyboard,
    Cancel,
}

// Implement format! support
impl fmt::Display for MoveResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

impl From<MoveResizeDirection> for u32 {
    fn from(val: MoveResizeDirection) -> Self {
        match val {
            MoveResizeDirection::SizeTopLeft => 0,
            MoveResizeDirection::SizeTop => 1,
            MoveResizeDirection::SizeTopRight => 2,
            MoveResizeDirection::SizeRight => 3,
            MoveResizeDirection::SizeBottomRight => 4,
            MoveResizeDirection::SizeBottom => 5,
            MoveResizeDirection::SizeBottomLeft => 6,
            MoveResizeDirection::SizeLeft => 7,
            MoveResizeDirection::Move => 8,
            MoveResizeDirection::SizeKeyboard => 9,
            MoveResizeDirection::MoveKeyboard => 10,
            MoveResizeDirection::Cancel => 11,
        }
    }
}

// Edge combinations without a matching direction fall back to the top left corner
impl From<Edges> for MoveResizeDirection {
    fn from(edges: Edges) -> Self {
        match edges {
            e if e == Edges::TOP | Edges::LEFT => MoveResizeDirection::SizeTopLeft,
            e if e == Edges::TOP => MoveResizeDirection::SizeTop,
            e if e == Edges::TOP | Edges::RIGHT => MoveResizeDirection::SizeTopRight,
            e if e == Edges::RIGHT => MoveResizeDirection::SizeRight,
            e if e == Edges::RIGHT | Edges::BOTTOM => MoveResizeDirection::SizeBottomRight,
            e if e == Edges::BOTTOM => MoveResizeDirection::SizeBottom,
            e if e == Edges::BOTTOM | Edges::LEFT => MoveResizeDirection::SizeBottomLeft,
            e if e == Edges::LEFT => MoveResizeDirection::SizeLeft,
            e => {
                warn!("edges {:?} have no resize direction, using top-left", e);
                MoveResizeDirection::SizeTopLeft
            },
        }
    }
}

/// MoveResizeAction is what the caller asks the window manager to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResizeAction {
    Move,
    Resize(Edges),
}

impl From<MoveResizeAction> for MoveResizeDirection {
    fn from(val: MoveResizeAction) -> Self {
        match val {
            MoveResizeAction::Move => MoveResizeDirection::Move,
            MoveResizeAction::Resize(edges) => edges.into(),
        }
    }
}

/// WindowStateAction is the first data field of a `_NET_WM_STATE` client message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStateAction {
    Remove,
    Add,
    Toggle,
}

impl From<WindowStateAction> for u32 {
    fn from(val: WindowStateAction) -> Self {
        match val {
            WindowStateAction::Remove => 0,
            WindowStateAction::Add => 1,
            WindowStateAction::Toggle => 2,
        }
    }
}

/// Position on the screen in root window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Scale a logical position into device pixels, truncating toward zero and clamping
    /// negative values to zero as the wire fields are unsigned.
    pub fn to_device(self, dpr: f64) -> (u32, u32) {
        let scale = |v: i32| {
            let v = (v as f64 * dpr).trunc();
            if v <= 0.0 {
                0
            } else {
                v as u32
            }
        };
        (scale(self.x), scale(self.y))
    }
}

/// True for the null window id, which every window operation ignores
pub fn is_null_window(win: u32) -> bool {
    win == x11rb::NONE
}

/// Whether a compositing manager was last seen running, false until told otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositingState {
    active: bool,
}

impl CompositingState {
    pub fn active(&self) -> bool {
        self.active
    }

    /// Record the new state, returning true only when it differs from the previous one
    pub fn update(&mut self, active: bool) -> bool {
        if active == self.active {
            return false;
        }
        self.active = active;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_map_to_directions() {
        let cases = [
            (Edges::TOP | Edges::LEFT, 0),
            (Edges::TOP, 1),
            (Edges::TOP | Edges::RIGHT, 2),
            (Edges::RIGHT, 3),
            (Edges::RIGHT | Edges::BOTTOM, 4),
            (Edges::BOTTOM, 5),
            (Edges::BOTTOM | Edges::LEFT, 6),
            (Edges::LEFT, 7),
        ];
        for (edges, expected) in cases {
            assert_eq!(u32::from(MoveResizeDirection::from(edges)), expected, "{}", edges);
        }
    }

    #[test]
    fn test_unmapped_edges_fall_back_to_top_left() {
        assert_eq!(MoveResizeDirection::from(Edges::empty()), MoveResizeDirection::SizeTopLeft);
        assert_eq!(MoveResizeDirection::from(Edges::LEFT | Edges::RIGHT), MoveResizeDirection::SizeTopLeft);
        assert_eq!(MoveResizeDirection::from(Edges::all()), MoveResizeDirection::SizeTopLeft);
    }

    #[test]
    fn test_move_action_is_direction_eight() {
        assert_eq!(u32::from(MoveResizeDirection::from(MoveResizeAction::Move)), 8);
        assert_eq!(u32::from(MoveResizeDirection::Cancel), 11);
        assert_eq!(
            MoveResizeDirection::from(MoveResizeAction::Resize(Edges::BOTTOM)),
            MoveResizeDirection::SizeBottom
        );
    }

    #[test]
    fn test_edges_parse() {
        assert_eq!(Edges::try_from("top-left"), Ok(Edges::TOP | Edges::LEFT));
        assert_eq!(Edges::try_from("Bottom,Right"), Ok(Edges::BOTTOM | Edges::RIGHT));
        assert_eq!(Edges::try_from("left".to_owned()), Ok(Edges::LEFT));
        assert_eq!(Edges::try_from("middle"), Err(ShellKitError::InvalidEdges("middle".to_owned())));
        assert_eq!((Edges::BOTTOM | Edges::LEFT).to_string(), "bottom-left");
    }

    #[test]
    fn test_point_to_device() {
        assert_eq!(Point::new(10, 20).to_device(1.0), (10, 20));
        assert_eq!(Point::new(10, 21).to_device(1.5), (15, 31));
        assert_eq!(Point::new(-4, 3).to_device(2.0), (0, 6));
    }

    #[test]
    fn test_compositing_changes_reported_once() {
        let mut state = CompositingState::default();
        assert!(!state.active());
        assert!(!state.update(false));
        assert!(state.update(true));
        assert!(state.active());
        assert!(!state.update(true));
        assert!(state.update(false));
        assert!(!state.active());
    }

    #[test]
    fn test_null_window() {
        assert!(is_null_window(0));
        assert!(!is_null_window(0x0260_0007));
    }

    #[test]
    fn test_state_actions() {
        assert_eq!(u32::from(WindowStateAction::Remove), 0);
        assert_eq!(u32::from(WindowStateAction::Add), 1);
        assert_eq!(u32::from(WindowStateAction::Toggle), 2);
    }
}
