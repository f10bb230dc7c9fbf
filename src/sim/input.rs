//! Host input events
//!
//! The host (browser, window, test) translates its own events into these and
//! hands them to `Simulation::handle_input`.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key press: space toggles pause, '1'..='9' spawn a particle
    Key(char),
    /// Pointer moved to canvas coordinates
    PointerMoved(Vec2),
    /// Viewport resized
    Resized { width: f32, height: f32 },
}

/// Particle type spawned by a number key ('1' spawns type 0)
pub fn spawn_type_for_key(key: char) -> Option<usize> {
    match key {
        '1'..='9' => key.to_digit(10).map(|d| d as usize - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_keys() {
        assert_eq!(spawn_type_for_key('1'), Some(0));
        assert_eq!(spawn_type_for_key('9'), Some(8));
        assert_eq!(spawn_type_for_key('0'), None);
        assert_eq!(spawn_type_for_key('a'), None);
        assert_eq!(spawn_type_for_key(' '), None);
    }
}
