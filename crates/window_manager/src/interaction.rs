//! Pointer-driven move and resize sessions.
//!
//! Controllers are host-agnostic: the renderer feeds them pointer ids and client coordinates and
//! owns the animation-frame scheduling. Drag commits are coalesced to one store mutation per
//! frame, resize commits are applied on every pointer event.

use crate::{
    api::WindowApi,
    geometry::{resize_bounds, SizeConstraints},
    model::{BoundsPatch, PointerPosition, ResizeEdge, WindowId, WindowRect, WindowState},
    reducer::Transition,
};

/// What the host should do after feeding a pointer move to a [`DragController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Schedule one animation frame that calls [`DragController::commit_frame`].
    Schedule,
    /// A frame is already outstanding; it will pick up the latest position.
    Coalesced,
    /// The event does not belong to an active drag.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PointerSession {
    pointer_id: i32,
    pointer_start: PointerPosition,
    rect_start: WindowRect,
}

impl PointerSession {
    fn delta(&self, point: PointerPosition) -> (i32, i32) {
        (
            point.x - self.pointer_start.x,
            point.y - self.pointer_start.y,
        )
    }
}

/// Begins a session on `window_id` if it exists and is in the normal state, focusing it first.
fn start_session(
    api: &WindowApi,
    window_id: WindowId,
    pointer_id: i32,
    point: PointerPosition,
    allowed: impl FnOnce(&WindowApi) -> bool,
) -> Option<PointerSession> {
    let is_normal = api.store().with(|state| {
        state
            .window(window_id)
            .is_some_and(|window| window.state == WindowState::Normal)
    });
    if !is_normal || !allowed(api) {
        return None;
    }
    api.focus(window_id);
    let rect_start = api
        .store()
        .with(|state| state.window(window_id).map(|window| window.bounds))?;
    Some(PointerSession {
        pointer_id,
        pointer_start: point,
        rect_start,
    })
}

/// Titlebar drag for one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragController {
    window_id: WindowId,
    session: Option<PointerSession>,
    pending: Option<PointerPosition>,
    frame_requested: bool,
}

impl DragController {
    pub fn new(window_id: WindowId) -> Self {
        Self {
            window_id,
            session: None,
            pending: None,
            frame_requested: false,
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Starts dragging with `pointer_id`. Returns `false` when a drag is already running or the
    /// window is missing or not in the normal state.
    pub fn begin(&mut self, api: &WindowApi, pointer_id: i32, point: PointerPosition) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = start_session(api, self.window_id, pointer_id, point, |_| true);
        self.session.is_some()
    }

    /// Records the window origin for `point`; the store is only touched by
    /// [`Self::commit_frame`].
    pub fn update(&mut self, pointer_id: i32, point: PointerPosition) -> FrameRequest {
        let Some(session) = self.session.filter(|s| s.pointer_id == pointer_id) else {
            return FrameRequest::Ignored;
        };
        let (dx, dy) = session.delta(point);
        self.pending = Some(PointerPosition::new(
            session.rect_start.x + dx,
            session.rect_start.y + dy,
        ));
        if self.frame_requested {
            FrameRequest::Coalesced
        } else {
            self.frame_requested = true;
            FrameRequest::Schedule
        }
    }

    /// Commits the latest pending origin with a single move. Runs even after the drag ended so
    /// the final position is never dropped.
    pub fn commit_frame(&mut self, api: &WindowApi) -> Transition {
        self.frame_requested = false;
        match self.pending.take() {
            Some(origin) => api.move_window(
                self.window_id,
                BoundsPatch::position(origin.x, origin.y),
            ),
            None => Transition::Ignored,
        }
    }

    /// Stops the drag started by `pointer_id`. No snapping is applied on release.
    pub fn end(&mut self, pointer_id: i32) -> bool {
        if self.session.is_some_and(|s| s.pointer_id == pointer_id) {
            self.session = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, pointer_id: i32) -> bool {
        self.end(pointer_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResizeSession {
    pointer: PointerSession,
    constraints: SizeConstraints,
}

/// Resize from one of the eight window handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeController {
    window_id: WindowId,
    edge: ResizeEdge,
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new(window_id: WindowId, edge: ResizeEdge) -> Self {
        Self {
            window_id,
            edge,
            session: None,
        }
    }

    pub fn edge(&self) -> ResizeEdge {
        self.edge
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    /// Starts resizing with `pointer_id`. Only normal windows of resizable apps can be resized.
    pub fn begin(&mut self, api: &WindowApi, pointer_id: i32, point: PointerPosition) -> bool {
        if self.session.is_some() {
            return false;
        }
        let window_id = self.window_id;
        let resizable = |api: &WindowApi| {
            api.store().with(|state| {
                state
                    .window(window_id)
                    .and_then(|window| state.app(&window.app_id))
                    .map_or(true, |app| app.resizable)
            })
        };
        self.session = start_session(api, window_id, pointer_id, point, resizable).map(
            |pointer| ResizeSession {
                pointer,
                constraints: api.size_constraints(window_id),
            },
        );
        self.session.is_some()
    }

    /// Applies the clamped bounds for `point` immediately.
    pub fn update(&mut self, api: &WindowApi, pointer_id: i32, point: PointerPosition) -> Transition {
        let Some(session) = self
            .session
            .filter(|s| s.pointer.pointer_id == pointer_id)
        else {
            return Transition::Ignored;
        };
        let (dx, dy) = session.pointer.delta(point);
        let next = resize_bounds(
            session.pointer.rect_start,
            self.edge,
            dx,
            dy,
            session.constraints,
        );
        api.move_window(self.window_id, BoundsPatch::rect(next))
    }

    pub fn end(&mut self, pointer_id: i32) -> bool {
        if self
            .session
            .is_some_and(|s| s.pointer.pointer_id == pointer_id)
        {
            self.session = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, pointer_id: i32) -> bool {
        self.end(pointer_id)
    }
}
