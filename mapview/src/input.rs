//! Input state machine for map interaction.
//!
//! Translates discrete key/mouse events from the platform layer into camera
//! mutations and province-selection requests. Event pairing is never
//! assumed: an unmatched key-up or button-up is a no-op.

use crate::camera::Camera;
use mapdata::{ProvinceId, ProvinceIdRaster, SENTINEL_PROVINCE};

/// Maximum cursor travel between press and release for a click, in pixels.
/// Anything farther is a drag, not a selection.
const CLICK_THRESHOLD_PX: f64 = 4.0;

/// Arrow keys panning the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanKey {
    Left,
    Right,
    Up,
    Down,
}

impl PanKey {
    fn index(self) -> usize {
        match self {
            PanKey::Left => 0,
            PanKey::Right => 1,
            PanKey::Up => 2,
            PanKey::Down => 3,
        }
    }
}

/// The province picked by the last confirmed click.
///
/// Consumers poll [`take`](Self::take) once per frame; the pending flag
/// clears on read, so each click is delivered at most once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selection {
    selected: ProvinceId,
    pending: bool,
}

impl Selection {
    pub fn selected(&self) -> ProvinceId {
        self.selected
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Overwrites the selection and marks it pending. A sentinel id clears
    /// any previous selection the same way.
    pub fn set(&mut self, id: ProvinceId) {
        self.selected = id;
        self.pending = true;
    }

    /// Returns the pending selection once; `None` until the next click.
    pub fn take(&mut self) -> Option<ProvinceId> {
        if self.pending {
            self.pending = false;
            Some(self.selected)
        } else {
            None
        }
    }
}

/// Per-view input state: held pan keys, pending click, selection.
#[derive(Debug, Default)]
pub struct InputState {
    held: [bool; 4],
    press_pos: Option<(f64, f64)>,
    pub selection: Selection,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: PanKey, camera: &mut Camera) {
        self.held[key.index()] = true;
        self.apply_pan(camera);
    }

    pub fn on_key_up(&mut self, key: PanKey, camera: &mut Camera) {
        if !self.held[key.index()] {
            return;
        }
        self.held[key.index()] = false;
        self.apply_pan(camera);
    }

    fn apply_pan(&self, camera: &mut Camera) {
        let right = self.held[PanKey::Right.index()] as i32;
        let left = self.held[PanKey::Left.index()] as i32;
        let down = self.held[PanKey::Down.index()] as i32;
        let up = self.held[PanKey::Up.index()] as i32;
        camera.set_pan_input(f64::from(right - left), f64::from(down - up));
    }

    pub fn on_mouse_wheel(
        &mut self,
        x: f64,
        y: f64,
        screen_w: f64,
        screen_h: f64,
        amount: f64,
        camera: &mut Camera,
    ) {
        camera.on_mouse_wheel(x, y, screen_w, screen_h, amount);
    }

    pub fn on_mouse_move(&mut self, x: f64, y: f64, camera: &mut Camera) {
        camera.on_drag_move(x, y);
    }

    pub fn on_mbutton_down(&mut self, x: f64, y: f64, screen_w: f64, screen_h: f64, camera: &mut Camera) {
        camera.on_drag_start(x, y, screen_w, screen_h);
    }

    pub fn on_mbutton_up(&mut self, camera: &mut Camera) {
        camera.on_drag_end();
    }

    pub fn on_lbutton_down(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.press_pos = Some((x, y));
        }
    }

    /// Resolves a click into a province selection.
    ///
    /// Release close to the press point resolves `screen_to_map` and looks
    /// up the raster; a projection miss or unmapped ground selects the
    /// sentinel, still overwriting the previous selection.
    pub fn on_lbutton_up(
        &mut self,
        x: f64,
        y: f64,
        screen_w: f64,
        screen_h: f64,
        camera: &Camera,
        raster: &ProvinceIdRaster,
    ) {
        let Some((px, py)) = self.press_pos.take() else {
            return;
        };
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let travel = ((x - px).powi(2) + (y - py).powi(2)).sqrt();
        if travel > CLICK_THRESHOLD_PX {
            return;
        }

        let id = camera
            .screen_to_map((x, y), (screen_w, screen_h))
            .map(|(u, v)| raster.id_at_uv(u, v))
            .unwrap_or(SENTINEL_PROVINCE);
        self.selection.set(id);
    }
}
