//! Interaction state of the relation canvas.
//!
//! [`RelationCanvas`] tracks the viewport transform (pan position and zoom
//! scale), the drag cursor and whether the wheel pans or zooms. It reacts to
//! input events and returns [`Animation`] descriptors for the host to play;
//! it never runs timers itself. The scale always stays within the configured
//! bounds.
//!
//! Coordinates: a content point `p` is shown on screen at
//! `p * scale + position`.

use std::time::Duration;

use log::{debug, trace};

use schemascope_core::geometry::{Bounds, Point, Size};

use crate::config::{CanvasConfig, MAX_SCALE_LIMIT, MIN_SCALE_LIMIT};

/// Cursor state while dragging the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Auto,
    Grab,
    Grabbing,
}

impl DragMode {
    /// The CSS cursor name of this mode.
    pub fn css_cursor(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

/// What the mouse wheel does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Pan,
    Zoom,
}

/// Timing curve of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOutCubic,
    EaseInOutQuad,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Viewport transform: pan position and zoom scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Point,
    scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Point::default(), 1.0)
    }
}

impl Transform {
    pub fn new(position: Point, scale: f32) -> Self {
        Self { position, scale }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Screen position of content point `point`.
    pub fn to_screen(&self, point: Point) -> Point {
        point.scale(self.scale).add_point(self.position)
    }
}

/// A transition between two transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    from: Transform,
    to: Transform,
    duration: Duration,
    easing: Easing,
}

impl Animation {
    pub fn new(from: Transform, to: Transform, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
        }
    }

    pub fn from(&self) -> Transform {
        self.from
    }

    pub fn to(&self) -> Transform {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// The transform `elapsed` after the animation started.
    pub fn sample(&self, elapsed: Duration) -> Transform {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        let t = self.easing.apply(progress);
        Transform {
            position: self.from.position.lerp(self.to.position, t),
            scale: self.from.scale + (self.to.scale - self.from.scale) * t,
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// A mouse wheel event.
///
/// `detail` is the legacy line count reported by some browsers, `wheel_delta`
/// the legacy pixel delta; both are zero when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelEvent {
    delta_x: f32,
    delta_y: f32,
    detail: f32,
    wheel_delta: f32,
}

impl WheelEvent {
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self {
            delta_x,
            delta_y,
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, detail: f32) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_wheel_delta(mut self, wheel_delta: f32) -> Self {
        self.wheel_delta = wheel_delta;
        self
    }

    /// Pan distance of this event, applied to every axis with a non-zero delta.
    fn pan_factor(&self) -> f32 {
        let raw = if self.detail != 0.0 {
            -self.detail / 3.0
        } else {
            self.wheel_delta
        };
        raw * 2.0
    }
}

/// A keyboard event, reduced to what the canvas looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent<'a> {
    key: &'a str,
    meta_key: bool,
}

impl<'a> KeyEvent<'a> {
    pub fn new(key: &'a str, meta_key: bool) -> Self {
        Self { key, meta_key }
    }

    /// Control, Meta and OS keys switch the wheel to zooming.
    fn is_zoom_modifier(&self) -> bool {
        self.meta_key || matches!(self.key, "Control" | "Meta" | "OS")
    }
}

/// Result of a click on the empty canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click ended a drag.
    Ignored,
    /// The focused node loses focus but stays selected.
    Defocus,
    /// The selection is cleared.
    ClearSelection,
}

/// Pan/zoom interaction state of the relation view.
#[derive(Debug, Clone)]
pub struct RelationCanvas {
    config: CanvasConfig,
    viewport: Size,
    transform: Transform,
    drag_mode: DragMode,
    input_mode: InputMode,
    scale_percent: f32,
    selection: bool,
    focused: bool,
}

impl RelationCanvas {
    pub fn new(config: CanvasConfig, viewport: Size) -> Self {
        Self {
            config,
            viewport,
            transform: Transform::default(),
            drag_mode: DragMode::Grab,
            input_mode: InputMode::Pan,
            scale_percent: 100.0,
            selection: false,
            focused: false,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn position(&self) -> Point {
        self.transform.position
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag_mode
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn has_selection(&self) -> bool {
        self.selection
    }

    /// Zoom readout in percent.
    ///
    /// Follows every zoom change and returns to 100 when the selection is
    /// cleared.
    pub fn scale_percent(&self) -> f32 {
        self.scale_percent
    }

    /// Cursor to show: the drag mode while a node is selected, `auto` otherwise.
    pub fn cursor(&self) -> DragMode {
        if self.selection {
            self.drag_mode
        } else {
            DragMode::Auto
        }
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        let min = self.config.min_scale().max(MIN_SCALE_LIMIT);
        let max = self.config.max_scale().min(MAX_SCALE_LIMIT);
        scale.max(min).min(max)
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width() / 2.0, self.viewport.height() / 2.0)
    }

    /// Sets the scale, keeping the content under the viewport centre in place.
    fn zoom_to(&mut self, scale: f32) {
        let old = self.transform.scale;
        let new = self.clamp_scale(scale);
        let center = self.viewport_center();
        let content_center = center.sub_point(self.transform.position).scale(1.0 / old);
        self.transform = Transform::new(center.sub_point(content_center.scale(new)), new);
        self.scale_percent = new * 100.0;
        trace!(scale = new; "Canvas zoomed");
    }

    /// Marks whether a node is selected.
    pub fn set_selection(&mut self, selected: bool) {
        self.selection = selected;
        if !selected {
            self.focused = false;
            self.scale_percent = 100.0;
        }
    }

    pub fn key_down(&mut self, event: KeyEvent<'_>) {
        if event.is_zoom_modifier() {
            self.input_mode = InputMode::Zoom;
        }
    }

    pub fn key_up(&mut self, event: KeyEvent<'_>) {
        if event.is_zoom_modifier() {
            self.input_mode = InputMode::Pan;
        }
    }

    /// Pans or zooms by a wheel event, depending on the input mode.
    ///
    /// Pans move to the target position right away and return the animation
    /// leading there; zooms apply immediately.
    pub fn wheel(&mut self, event: WheelEvent) -> Option<Animation> {
        match self.input_mode {
            InputMode::Zoom => {
                let factor = (-event.delta_y * self.config.wheel_step()).exp();
                self.zoom_to(self.transform.scale * factor);
                None
            }
            InputMode::Pan => {
                let factor = event.pan_factor();
                let from = self.transform;
                let position = from.position;
                let x = if event.delta_x != 0.0 {
                    position.x() + factor
                } else {
                    position.x()
                };
                let y = if event.delta_y != 0.0 {
                    position.y() + factor
                } else {
                    position.y()
                };
                let to = Transform::new(Point::new(x, y), from.scale);
                if to == from {
                    return None;
                }
                self.transform = to;
                Some(Animation::new(
                    from,
                    to,
                    self.config.pan_animation(),
                    Easing::EaseOutCubic,
                ))
            }
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_to(self.transform.scale * self.config.zoom_step().exp());
    }

    pub fn zoom_out(&mut self) {
        self.zoom_to(self.transform.scale * (-self.config.zoom_step()).exp());
    }

    pub fn double_click(&mut self) {
        self.zoom_to(self.transform.scale + self.config.double_click_step());
    }

    pub fn pan_start(&mut self) {
        self.drag_mode = DragMode::Grab;
    }

    /// Drags the canvas by a screen-space offset.
    pub fn pan_move(&mut self, dx: f32, dy: f32) {
        self.drag_mode = DragMode::Grabbing;
        self.transform.position = self.transform.position.add_point(Point::new(dx, dy));
    }

    pub fn pan_stop(&mut self) {
        self.drag_mode = DragMode::Auto;
    }

    /// Centres the element occupying `element` (content coordinates).
    ///
    /// An element rendered taller than `viewport_height / focus_height_ratio`
    /// is additionally scaled down to fit, but never below the minimum focus
    /// scale.
    pub fn focus(&mut self, element: Bounds) -> Animation {
        let from = self.transform;
        let threshold = self.viewport.height() / self.config.focus_height_ratio();

        let mut scale = from.scale;
        if element.height() * from.scale > threshold && element.height() > 0.0 {
            scale = (threshold / element.height()).max(self.config.min_focus_scale());
        }
        let scale = self.clamp_scale(scale);

        let position = self
            .viewport_center()
            .sub_point(element.center().scale(scale));
        let to = Transform::new(position, scale);

        self.transform = to;
        self.scale_percent = scale * 100.0;
        self.selection = true;
        self.focused = true;
        debug!(scale; "Canvas focused on element");

        Animation::new(
            from,
            to,
            self.config.focus_animation(),
            Easing::EaseInOutQuad,
        )
    }

    /// Handles a click on the empty canvas.
    pub fn click(&mut self) -> ClickOutcome {
        if self.drag_mode == DragMode::Grabbing {
            return ClickOutcome::Ignored;
        }
        if self.focused && self.selection {
            self.focused = false;
            return ClickOutcome::Defocus;
        }
        self.set_selection(false);
        ClickOutcome::ClearSelection
    }
}
