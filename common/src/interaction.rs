//! Drag/step state machine for scripted multi-stage experiments
//!
//! An experiment is a linear sequence of gestures. Each step names the one
//! handle (or set of clickable handles) the learner may use; the step
//! advances on its own once a tracked handle position crosses a threshold.
//! Steps at or past the terminal step accept no input at all.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use glam::Vec2;

/// Ordinal position in the gesture sequence, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Step(pub u32);

impl Step {
    pub const FIRST: Step = Step(1);

    pub fn next(self) -> Step {
        Step(self.0 + 1)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// World axis a handle slides along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Screen direction a drag is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAxis {
    /// Rightward pointer motion is positive
    Horizontal,
    /// Upward pointer motion is positive
    Vertical,
}

impl ScreenAxis {
    fn delta(self, start: Vec2, current: Vec2) -> f32 {
        match self {
            ScreenAxis::Horizontal => current.x - start.x,
            ScreenAxis::Vertical => start.y - current.y,
        }
    }
}

/// Allowed range for a drag, possibly relative to where the drag began
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Fixed { min: f32, max: f32 },
    /// Lowering only: from `min` up to the position at grab time
    Lowering { min: f32 },
    /// Raising only: from the position at grab time up to `max`
    Raising { max: f32 },
}

impl Bounds {
    pub fn resolve(&self, start: f32) -> (f32, f32) {
        match *self {
            Bounds::Fixed { min, max } => (min, max),
            Bounds::Lowering { min } => (min, start.max(min)),
            Bounds::Raising { max } => (start.min(max), max),
        }
    }

    pub fn clamp(&self, value: f32, start: f32) -> f32 {
        let (min, max) = self.resolve(start);
        value.max(min).min(max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    AtLeast(f32),
    AtMost(f32),
}

impl Threshold {
    pub fn is_crossed(&self, value: f32) -> bool {
        match *self {
            Threshold::AtLeast(limit) => value >= limit,
            Threshold::AtMost(limit) => value <= limit,
        }
    }
}

/// What the learner has to do in a step
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture<K> {
    Drag {
        handle: K,
        screen_axis: ScreenAxis,
        /// Pixels per world unit
        sensitivity: f32,
        bounds: Bounds,
        /// Handle position that completes the step
        until: Threshold,
    },
    /// Clicking any of the targets completes the step
    Click { targets: Vec<K> },
}

impl<K: Copy + PartialEq> Gesture<K> {
    /// Handles that may be hit-tested in this step
    pub fn eligible(&self) -> Vec<K> {
        match self {
            Gesture::Drag { handle, .. } => vec![*handle],
            Gesture::Click { targets } => targets.clone(),
        }
    }
}

/// A logical object that can be slid along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraggableHandle {
    pub axis: Axis,
    pub position: f32,
    /// Position captured when the experiment was set up
    pub origin: f32,
}

impl DraggableHandle {
    pub fn new(axis: Axis, position: f32) -> Self {
        Self {
            axis,
            position,
            origin: position,
        }
    }
}

/// A handle that rides another with a fixed offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dependent<K> {
    pub primary: K,
    pub offset: f32,
}

/// The handle currently grabbed, with the drag parameters of the step it
/// was grabbed in. A session outlives step changes until release or the
/// terminal step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession<K> {
    pub handle: K,
    pub pointer_start: Vec2,
    pub handle_start: f32,
    pub screen_axis: ScreenAxis,
    pub sensitivity: f32,
    pub bounds: Bounds,
}

/// Result of feeding a pointer-down to the machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome<K> {
    /// Nothing eligible was under the pointer
    Ignored,
    /// The step is terminal; input is disabled
    Locked,
    /// A drag is already in progress; release it first
    Busy,
    /// A drag session started on this handle
    Grabbed(K),
    /// A click target was hit and the step advanced
    Clicked { target: K, change: StepChange },
    /// The eligible handle is not loaded
    MissingHandle(K),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepChange {
    pub from: Step,
    pub to: Step,
}

/// Result of a pointer-move
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate<K> {
    /// No session is active
    Idle,
    /// The handle moved; `change` is set when the move completed the step
    Moved {
        handle: K,
        position: f32,
        change: Option<StepChange>,
    },
    /// The step became terminal while dragging and the session was dropped
    Cancelled,
    /// The grabbed handle disappeared
    MissingHandle(K),
}

/// The scripted experiment: step counter, gesture table and handle table
#[derive(Debug, Clone)]
pub struct StepMachine<K> {
    step: Step,
    gestures: Vec<Gesture<K>>,
    handles: HashMap<K, DraggableHandle>,
    dependents: HashMap<K, Dependent<K>>,
    session: Option<DragSession<K>>,
}

impl<K> StepMachine<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// `gestures[i]` is the gesture for step `i + 1`; the step after the
    /// last gesture is terminal.
    pub fn new(gestures: Vec<Gesture<K>>) -> Self {
        Self {
            step: Step::FIRST,
            gestures,
            handles: HashMap::new(),
            dependents: HashMap::new(),
            session: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn terminal_step(&self) -> Step {
        Step(self.gestures.len() as u32 + 1)
    }

    pub fn is_terminal(&self) -> bool {
        self.step >= self.terminal_step()
    }

    pub fn current_gesture(&self) -> Option<&Gesture<K>> {
        if self.is_terminal() {
            return None;
        }
        self.gestures.get(self.step.0 as usize - 1)
    }

    pub fn session(&self) -> Option<&DragSession<K>> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Register a handle once its node has resolved
    pub fn insert_handle(&mut self, key: K, handle: DraggableHandle) {
        self.handles.insert(key, handle);
    }

    /// Attach `key` to `primary`, capturing the current offset between them.
    /// Returns false if either position is unknown.
    pub fn attach_dependent(&mut self, key: K, primary: K, dependent_position: f32) -> bool {
        let Some(primary_handle) = self.handles.get(&primary) else {
            log::debug!("cannot attach {:?}: primary {:?} missing", key, primary);
            return false;
        };
        let offset = dependent_position - primary_handle.position;
        self.dependents.insert(key, Dependent { primary, offset });
        true
    }

    pub fn handle(&self, key: K) -> Option<&DraggableHandle> {
        self.handles.get(&key)
    }

    pub fn position(&self, key: K) -> Option<f32> {
        if let Some(handle) = self.handles.get(&key) {
            return Some(handle.position);
        }
        let dependent = self.dependents.get(&key)?;
        let primary = self.handles.get(&dependent.primary)?;
        Some(primary.position + dependent.offset)
    }

    pub fn dependent(&self, key: K) -> Option<&Dependent<K>> {
        self.dependents.get(&key)
    }

    /// Pointer pressed. `hit` is asked only about handles eligible in the
    /// current step, and not at all while a drag is in progress.
    pub fn pointer_down(&mut self, pointer: Vec2, mut hit: impl FnMut(K) -> bool) -> PointerOutcome<K> {
        let Some(gesture) = self.current_gesture().cloned() else {
            log::debug!("step {} is terminal; pointer ignored", self.step);
            return PointerOutcome::Locked;
        };
        if let Some(session) = &self.session {
            log::debug!("still dragging {:?}; pointer ignored", session.handle);
            return PointerOutcome::Busy;
        }

        match gesture {
            Gesture::Drag {
                handle,
                screen_axis,
                sensitivity,
                bounds,
                ..
            } => {
                let Some(start) = self.handles.get(&handle).map(|h| h.position) else {
                    log::debug!("step {}: handle {:?} not loaded", self.step, handle);
                    return PointerOutcome::MissingHandle(handle);
                };
                if !hit(handle) {
                    return PointerOutcome::Ignored;
                }
                self.session = Some(DragSession {
                    handle,
                    pointer_start: pointer,
                    handle_start: start,
                    screen_axis,
                    sensitivity,
                    bounds,
                });
                log::debug!("step {}: grabbed {:?} at {:.3}", self.step, handle, start);
                PointerOutcome::Grabbed(handle)
            }
            Gesture::Click { targets } => {
                match targets.iter().copied().find(|target| hit(*target)) {
                    Some(target) => {
                        let change = self.advance();
                        PointerOutcome::Clicked { target, change }
                    }
                    None => PointerOutcome::Ignored,
                }
            }
        }
    }

    /// Pointer moved. Moves the grabbed handle with the parameters captured
    /// at grab time, then checks the current step's gate in the same pass.
    pub fn pointer_move(&mut self, pointer: Vec2) -> DragUpdate<K> {
        let Some(session) = self.session else {
            return DragUpdate::Idle;
        };
        if self.is_terminal() {
            self.session = None;
            return DragUpdate::Cancelled;
        }

        let delta = session.screen_axis.delta(session.pointer_start, pointer) / session.sensitivity.max(f32::EPSILON);
        let position = session.bounds.clamp(session.handle_start + delta, session.handle_start);

        let Some(handle) = self.handles.get_mut(&session.handle) else {
            self.session = None;
            return DragUpdate::MissingHandle(session.handle);
        };
        handle.position = position;

        // Only the gated handle can complete a drag step
        let crossed = match self.current_gesture() {
            Some(Gesture::Drag { handle, until, .. }) => *handle == session.handle && until.is_crossed(position),
            _ => false,
        };
        let change = crossed.then(|| self.advance());

        DragUpdate::Moved {
            handle: session.handle,
            position,
            change,
        }
    }

    /// Pointer released: always ends the session, no snapping
    pub fn pointer_up(&mut self) -> Option<K> {
        let session = self.session.take()?;
        log::debug!("released {:?}", session.handle);
        Some(session.handle)
    }

    fn advance(&mut self) -> StepChange {
        let from = self.step;
        self.step = from.next();
        if self.is_terminal() {
            self.session = None;
        }
        log::info!("experiment step {} -> {}", from, self.step);
        StepChange { from, to: self.step }
    }

    /// Return to step 1 with every handle back at its origin
    pub fn reset(&mut self) {
        self.step = Step::FIRST;
        self.session = None;
        for handle in self.handles.values_mut() {
            handle.position = handle.origin;
        }
        log::info!("experiment reset");
    }
}
