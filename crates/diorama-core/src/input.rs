use glam::Vec3;

/// Which movement axis a key drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Forward,
    Sideways,
    Vertical,
}

/// Map a DOM-style key code (`KeyboardEvent.code`) to an axis and its pressed value.
///
/// Both keys of a pair share one axis slot, so the most recent press wins.
#[inline]
pub fn axis_for_code(code: &str) -> Option<(Axis, f32)> {
    match code {
        "KeyW" => Some((Axis::Forward, -1.0)), // zoom in
        "KeyS" => Some((Axis::Forward, 1.0)),  // zoom out
        "KeyA" => Some((Axis::Sideways, -1.0)),
        "KeyD" => Some((Axis::Sideways, 1.0)),
        "Space" => Some((Axis::Vertical, 1.0)),
        "ShiftLeft" => Some((Axis::Vertical, -1.0)),
        _ => None,
    }
}

/// Held movement keys, one value in `{-1, 0, 1}` per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementIntent {
    pub forward: f32,
    pub sideways: f32,
    pub vertical: f32,
}

impl MovementIntent {
    /// Apply a key press or release. Returns `false` for keys outside the movement set.
    pub fn handle_key(&mut self, code: &str, is_pressed: bool) -> bool {
        let Some((axis, value)) = axis_for_code(code) else {
            return false;
        };
        let slot = match axis {
            Axis::Forward => &mut self.forward,
            Axis::Sideways => &mut self.sideways,
            Axis::Vertical => &mut self.vertical,
        };
        *slot = if is_pressed { value } else { 0.0 };
        true
    }

    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.sideways == 0.0 && self.vertical == 0.0
    }
}

/// Pointer state projected onto the habitat's equator plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerIntent {
    pub is_down: bool,
    pub world_position: Vec3,
}

impl PointerIntent {
    /// Re-project the pointer from a world-space ray. A ray parallel to (or
    /// pointing away from) the plane leaves the last position untouched.
    pub fn set_from_ray(&mut self, ray_origin: Vec3, ray_dir: Vec3, plane_y: f32) -> bool {
        match ray_plane_y(ray_origin, ray_dir, plane_y) {
            Some(hit) => {
                self.world_position = hit;
                true
            }
            None => false,
        }
    }
}

/// All host-driven input, owned by the simulation root and read once per frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputState {
    pub movement: MovementIntent,
    pub pointer: PointerIntent,
}

/// Intersect a ray with the horizontal plane `y = plane_y`.
#[inline]
pub fn ray_plane_y(ray_origin: Vec3, ray_dir: Vec3, plane_y: f32) -> Option<Vec3> {
    if ray_dir.y.abs() <= 1e-6 {
        return None;
    }
    let t = (plane_y - ray_origin.y) / ray_dir.y;
    (t >= 0.0 && t.is_finite()).then(|| ray_origin + ray_dir * t)
}

/// Pointer sample delivered by a host, in the canvas/window backing-store pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// `Some` when the sample carries a button transition.
    pub is_down: Option<bool>,
}
