//! Camera over the strategic map: pan, zoom, drag, and the screen↔map
//! transform used for hit-testing.
//!
//! Positions are texture coordinates (0.0-1.0) with X-axis wrapping. Two
//! projections are supported: a flat view over the raster and an
//! orthographic globe that wraps the same texture around a unit sphere and
//! is steered by accumulating drag rotations.

use glam::{DQuat, DVec2, DVec3, Mat4};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 50.0;
/// Zoom factor per mouse-wheel notch.
const ZOOM_STEP: f64 = 1.25;
/// Exponential damping rate of pan inertia, per second.
const PAN_DAMPING: f64 = 6.0;
/// Exponential easing rate of the zoom animation, per second.
const ZOOM_RATE: f64 = 10.0;
/// Keyboard pan speed in map widths per second at zoom 1.
const KEY_PAN_SPEED: f64 = 0.35;
/// Scales the last drag step into release velocity.
const DRAG_RELEASE_SCALE: f64 = 20.0;
/// Globe radius at zoom 1, as a fraction of the smaller screen dimension.
const GLOBE_RADIUS_FRAC: f64 = 0.4;

/// Active map projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    Flat,
    Globe,
}

/// Camera state for viewing the map.
///
/// Owned by the view; all mutation goes through the update and input entry
/// points, so multiple independent views can each carry their own camera.
#[derive(Debug, Clone)]
pub struct Camera {
    pos: (f64, f64),
    velocity: (f64, f64),
    /// Held keyboard pan direction, components in -1..1.
    pan_input: (f64, f64),
    zoom: f64,
    zoom_target: f64,
    zoom_anchor: Option<ZoomAnchor>,
    drag: Option<DragState>,
    projection: Projection,
    globe_rotation: DQuat,
    /// Animation clock forwarded to the shader side.
    time_counter: f64,
    /// Aspect ratio of the map texture (width / height).
    content_aspect: f64,
}

/// Cursor anchor recorded on wheel input: the map point under the cursor
/// must stay put while the zoom animates.
#[derive(Debug, Clone)]
struct ZoomAnchor {
    screen: DVec2,
    screen_size: DVec2,
    /// Flat mode: anchored map point.
    map: DVec2,
    /// Globe mode: anchored surface point in model space.
    surface: Option<DVec3>,
}

#[derive(Debug, Clone)]
struct DragState {
    last: DVec2,
    screen_size: DVec2,
    /// Map-space displacement of the latest drag step (flat mode), kept for
    /// release inertia.
    last_step: DVec2,
}

impl Camera {
    /// Creates a camera centered on the map at minimum zoom.
    pub fn new(content_aspect: f64) -> Self {
        Self {
            pos: (0.5, 0.5),
            velocity: (0.0, 0.0),
            pan_input: (0.0, 0.0),
            zoom: 1.0,
            zoom_target: 1.0,
            zoom_anchor: None,
            drag: None,
            projection: Projection::Flat,
            globe_rotation: DQuat::IDENTITY,
            time_counter: 0.0,
            content_aspect,
        }
    }

    pub fn pos(&self) -> (f64, f64) {
        self.pos
    }

    pub fn velocity(&self) -> (f64, f64) {
        self.velocity
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_target(&self) -> f64 {
        self.zoom_target
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.zoom_anchor = None;
    }

    pub fn globe_rotation(&self) -> DQuat {
        self.globe_rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn time(&self) -> f64 {
        self.time_counter
    }

    /// Jumps to a position immediately, without animation.
    ///
    /// X wraps around the cylinder, Y clamps into the map.
    pub fn set_pos(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.pos = (x.rem_euclid(1.0), y.clamp(0.0, 1.0));
    }

    /// Sets the held keyboard pan direction (components in -1..1).
    pub fn set_pan_input(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.pan_input = (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
    }

    /// Retargets the zoom and anchors the map point under the cursor.
    ///
    /// The zoom itself is integrated during [`update`](Self::update);
    /// positive `amount` zooms in.
    pub fn on_mouse_wheel(&mut self, x: f64, y: f64, screen_w: f64, screen_h: f64, amount: f64) {
        if !amount.is_finite() || !Self::screen_ok(x, y, screen_w, screen_h) {
            return;
        }
        self.zoom_target = (self.zoom_target * ZOOM_STEP.powf(amount)).clamp(MIN_ZOOM, MAX_ZOOM);

        let screen = DVec2::new(x, y);
        let screen_size = DVec2::new(screen_w, screen_h);
        self.zoom_anchor = match self.projection {
            Projection::Flat => self.screen_to_map((x, y), (screen_w, screen_h)).map(|(u, v)| {
                ZoomAnchor {
                    screen,
                    screen_size,
                    map: DVec2::new(u, v),
                    surface: None,
                }
            }),
            Projection::Globe => self.globe_hit(screen, screen_size).map(|surface| ZoomAnchor {
                screen,
                screen_size,
                map: DVec2::ZERO,
                surface: Some(surface),
            }),
        };
    }

    /// Begins a camera drag at the given cursor position.
    pub fn on_drag_start(&mut self, x: f64, y: f64, screen_w: f64, screen_h: f64) {
        if !Self::screen_ok(x, y, screen_w, screen_h) {
            return;
        }
        self.velocity = (0.0, 0.0);
        self.drag = Some(DragState {
            last: DVec2::new(x, y),
            screen_size: DVec2::new(screen_w, screen_h),
            last_step: DVec2::ZERO,
        });
    }

    /// Continues a drag; a move without a preceding drag start is a no-op.
    pub fn on_drag_move(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        let cursor = DVec2::new(x, y);
        let delta = cursor - drag.last;
        drag.last = cursor;

        match self.projection {
            Projection::Flat => {
                let view = self.view_extent(drag.screen_size);
                // Dragging right moves the camera left
                let step = DVec2::new(
                    -delta.x / drag.screen_size.x * view.x,
                    -delta.y / drag.screen_size.y * view.y,
                );
                self.pos.0 += step.x;
                self.pos.1 += step.y;
                self.normalize_pos();
                drag.last_step = step;
            }
            Projection::Globe => {
                let radius = self.globe_radius_px(drag.screen_size);
                let yaw = delta.x / radius;
                let pitch = delta.y / radius;
                let spin = DQuat::from_rotation_x(pitch) * DQuat::from_rotation_y(yaw);
                // Renormalize after every composition to keep drift out
                self.globe_rotation = (spin * self.globe_rotation).normalize();
            }
        }
        self.drag = Some(drag);
    }

    /// Ends a drag; an unmatched release is a no-op.
    ///
    /// Flat mode keeps the last drag step as inertia, damped in `update`.
    pub fn on_drag_end(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if self.projection == Projection::Flat {
            self.velocity = (
                drag.last_step.x * DRAG_RELEASE_SCALE,
                drag.last_step.y * DRAG_RELEASE_SCALE,
            );
        }
    }

    /// Advances the camera one frame.
    ///
    /// Integrates pan velocity with exponential damping and eases the zoom
    /// toward its wheel target while holding the cursor anchor. `dt = 0`
    /// leaves pos, zoom and velocity untouched.
    pub fn update(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.time_counter += dt;

        // Held keys override inertia while pressed
        if self.pan_input != (0.0, 0.0) {
            self.velocity = (
                self.pan_input.0 * KEY_PAN_SPEED / self.zoom,
                self.pan_input.1 * KEY_PAN_SPEED / self.zoom,
            );
        }

        if self.velocity != (0.0, 0.0) {
            self.pos.0 += self.velocity.0 * dt;
            self.pos.1 += self.velocity.1 * dt;
            self.normalize_pos();

            if self.pan_input == (0.0, 0.0) {
                let decay = (-PAN_DAMPING * dt).exp();
                self.velocity.0 *= decay;
                self.velocity.1 *= decay;
                if self.velocity.0.abs() < 1e-6 && self.velocity.1.abs() < 1e-6 {
                    self.velocity = (0.0, 0.0);
                }
            }
        }

        if self.zoom != self.zoom_target {
            let blend = 1.0 - (-ZOOM_RATE * dt).exp();
            let mut zoom = self.zoom + (self.zoom_target - self.zoom) * blend;
            if ((zoom - self.zoom_target) / self.zoom_target).abs() < 1e-4 {
                zoom = self.zoom_target;
            }
            self.zoom = zoom;
            self.hold_zoom_anchor();
            if self.zoom == self.zoom_target {
                self.zoom_anchor = None;
            }
        }
    }

    /// Converts a screen pixel to normalized map coordinates.
    ///
    /// Pure; `None` on malformed input, and in globe mode for points off the
    /// silhouette disc (far hemisphere). Callers must treat a miss as
    /// "no province".
    pub fn screen_to_map(
        &self,
        screen_pos: (f64, f64),
        screen_size: (f64, f64),
    ) -> Option<(f64, f64)> {
        let (x, y) = screen_pos;
        let (w, h) = screen_size;
        if !Self::screen_ok(x, y, w, h) {
            return None;
        }
        match self.projection {
            Projection::Flat => {
                let view = self.view_extent(DVec2::new(w, h));
                let u = self.pos.0 + (x / w - 0.5) * view.x;
                let v = self.pos.1 + (y / h - 0.5) * view.y;
                Some((u.rem_euclid(1.0), v))
            }
            Projection::Globe => {
                let surface = self.globe_hit(DVec2::new(x, y), DVec2::new(w, h))?;
                Some(Self::surface_to_uv(surface))
            }
        }
    }

    /// Inverse of [`screen_to_map`](Self::screen_to_map).
    ///
    /// Globe mode returns `None` for map points on the far hemisphere.
    pub fn map_to_screen(&self, map: (f64, f64), screen_size: (f64, f64)) -> Option<(f64, f64)> {
        let (u, v) = map;
        let (w, h) = screen_size;
        if !Self::screen_ok(u, v, w, h) {
            return None;
        }
        match self.projection {
            Projection::Flat => {
                let view = self.view_extent(DVec2::new(w, h));
                // Shortest wrapped X distance from the camera
                let du = (u - self.pos.0 + 0.5).rem_euclid(1.0) - 0.5;
                let dv = v - self.pos.1;
                Some(((du / view.x + 0.5) * w, (dv / view.y + 0.5) * h))
            }
            Projection::Globe => {
                let view = self.globe_rotation * Self::uv_to_surface(u, v);
                if view.z <= 0.0 {
                    return None;
                }
                let radius = self.globe_radius_px(DVec2::new(w, h));
                Some((w / 2.0 + view.x * radius, h / 2.0 - view.y * radius))
            }
        }
    }

    /// Uniform snapshot for the renderer.
    pub fn uniform(&self, screen_w: f32, screen_h: f32) -> CameraUniform {
        if screen_w <= 0.0 || screen_h <= 0.0 {
            return CameraUniform::default();
        }
        let view = self.view_extent(DVec2::new(f64::from(screen_w), f64::from(screen_h)));
        CameraUniform {
            pos: [self.pos.0 as f32, self.pos.1 as f32],
            view: [view.x as f32, view.y as f32],
            globe_rotation: Mat4::from_quat(self.globe_rotation.as_quat()).to_cols_array_2d(),
            time: self.time_counter as f32,
            projection: match self.projection {
                Projection::Flat => 0,
                Projection::Globe => 1,
            },
            _padding: [0.0; 2],
        }
    }

    /// Visible map extent at the current zoom, in map units.
    fn view_extent(&self, screen: DVec2) -> DVec2 {
        let view_w = 1.0 / self.zoom;
        let view_h = view_w * self.content_aspect / (screen.x / screen.y);
        DVec2::new(view_w, view_h)
    }

    fn globe_radius_px(&self, screen: DVec2) -> f64 {
        GLOBE_RADIUS_FRAC * screen.x.min(screen.y) * self.zoom
    }

    /// Intersects the cursor ray with the rotated globe, returning the hit
    /// point in model (texture) space.
    fn globe_hit(&self, screen: DVec2, screen_size: DVec2) -> Option<DVec3> {
        let radius = self.globe_radius_px(screen_size);
        let nx = (screen.x - screen_size.x / 2.0) / radius;
        let ny = (screen_size.y / 2.0 - screen.y) / radius;
        let d2 = nx * nx + ny * ny;
        if d2 > 1.0 {
            return None;
        }
        // Orthographic ray: the near hemisphere point above (nx, ny)
        let view = DVec3::new(nx, ny, (1.0 - d2).sqrt());
        Some(self.globe_rotation.inverse() * view)
    }

    /// Map coordinates to the unit sphere: +y is the north pole, u = 0.5
    /// faces the camera at identity rotation.
    fn uv_to_surface(u: f64, v: f64) -> DVec3 {
        let lon = (u - 0.5) * TAU;
        let lat = (0.5 - v) * PI;
        DVec3::new(lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos())
    }

    fn surface_to_uv(p: DVec3) -> (f64, f64) {
        let lat = p.y.clamp(-1.0, 1.0).asin();
        let lon = p.x.atan2(p.z);
        ((lon / TAU + 0.5).rem_euclid(1.0), 0.5 - lat / PI)
    }

    /// Repositions so the wheel anchor stays under the cursor at the
    /// current zoom.
    fn hold_zoom_anchor(&mut self) {
        let Some(anchor) = self.zoom_anchor.clone() else {
            return;
        };
        match self.projection {
            Projection::Flat => {
                let view = self.view_extent(anchor.screen_size);
                let uv = anchor.screen / anchor.screen_size;
                self.pos.0 = anchor.map.x - (uv.x - 0.5) * view.x;
                self.pos.1 = anchor.map.y - (uv.y - 0.5) * view.y;
                self.normalize_pos();
            }
            Projection::Globe => {
                let Some(surface) = anchor.surface else {
                    return;
                };
                match self.globe_hit(anchor.screen, anchor.screen_size) {
                    Some(hit) => {
                        let correction = DQuat::from_rotation_arc(surface.normalize(), hit.normalize());
                        self.globe_rotation = (self.globe_rotation * correction).normalize();
                    }
                    None => {
                        // Cursor slid off the silhouette while zooming out
                        self.zoom_anchor = None;
                    }
                }
            }
        }
    }

    fn normalize_pos(&mut self) {
        self.pos.0 = self.pos.0.rem_euclid(1.0);
        self.pos.1 = self.pos.1.clamp(0.0, 1.0);
    }

    fn screen_ok(x: f64, y: f64, w: f64, h: f64) -> bool {
        x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }
}

/// Uniform data for the map shaders.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Camera center in map coordinates.
    pub pos: [f32; 2],
    /// Visible map extent in map units.
    pub view: [f32; 2],
    /// Globe rotation as a matrix (identity in flat mode).
    pub globe_rotation: [[f32; 4]; 4],
    /// Animation clock in seconds.
    pub time: f32,
    /// 0 = flat, 1 = globe.
    pub projection: u32,
    pub _padding: [f32; 2],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            pos: [0.5, 0.5],
            view: [1.0, 1.0],
            globe_rotation: Mat4::IDENTITY.to_cols_array_2d(),
            time: 0.0,
            projection: 0,
            _padding: [0.0; 2],
        }
    }
}
