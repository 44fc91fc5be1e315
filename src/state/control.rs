//! Per-control reconciliation state
//!
//! Two writers compete for the visible parameter value: local touch input
//! and remote pushes from the DAW. While a touch is held, remote updates are
//! recorded but not applied, so the remote echo cannot fight the gesture;
//! releasing the touch reconciles the visible value to the latest assertion
//! observed. All reconciliation fields are guarded as one unit behind a
//! single mutex, and arrival order decides which assertion wins.

use crate::outbound::OutboundSender;
use crate::protocol::OutboundMessage;
use parking_lot::Mutex;
use tokio::sync::watch;

/// Steps for the default quantization grid (3 decimal places)
const REMOTE_STEPS: f32 = 1000.0;

/// Steps for the Note/Byte grid; the DAW rounds these parameters to MIDI
/// 7-bit steps, so local edits snap to the same grid
const MIDI_STEPS: f32 = 127.0;

/// Pitch names for the Note display mode
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// How a control renders its value locally
///
/// Remote shows the DAW-provided display text; Note and Byte interpret the
/// normalized value as a MIDI step and switch the local edit quantization
/// to the 127-step grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueDisplayMode {
    #[default]
    Remote,
    Note,
    Byte,
}

/// Truncate to the 1000-step grid
///
/// Truncation, not rounding: repeated application at the same displayed step
/// must be idempotent, or redundant edits would be seen as changes.
pub fn quantize(value: f32) -> f32 {
    (value * REMOTE_STEPS).trunc() / REMOTE_STEPS
}

/// Truncate to the 127-step grid used by the Note/Byte display modes
pub fn quantize_midi(value: f32) -> f32 {
    (value * MIDI_STEPS).trunc() / MIDI_STEPS
}

fn quantize_for(mode: ValueDisplayMode, value: f32) -> f32 {
    match mode {
        ValueDisplayMode::Remote => quantize(value),
        ValueDisplayMode::Note | ValueDisplayMode::Byte => quantize_midi(value),
    }
}

fn midi_step(value: f32) -> i32 {
    (value * MIDI_STEPS).trunc() as i32
}

/// Pitch label for a MIDI step, octave numbered so step 0 is C-2
pub fn note_label(step: i32) -> String {
    format!("{}{}", NOTE_NAMES[(step % 12) as usize], step / 12 - 2)
}

/// Reconciliation unit: must only ever change under one lock acquisition
struct Reconcile {
    /// Visible parameter position; holds the raw local value mid-drag
    value: f32,
    /// Latest value asserted by either writer, retained through suppression
    last_known: f32,
    /// True while a local interaction is in progress
    touched: bool,
    display_mode: ValueDisplayMode,
}

/// State of one addressable parameter, identified by `(device, control)`
///
/// Created once at startup and never destroyed; mutated by exactly two
/// actors, the local-intent path (`apply_local_edit`, `set_touched`) and the
/// inbound dispatcher (`apply_remote_edit` and the remote setters).
pub struct ControlState {
    device: usize,
    control: usize,
    outbound: OutboundSender,
    inner: Mutex<Reconcile>,
    name_tx: watch::Sender<String>,
    display_tx: watch::Sender<String>,
    value_tx: watch::Sender<f32>,
    touched_tx: watch::Sender<bool>,
}

impl ControlState {
    pub(crate) fn new(device: usize, control: usize, outbound: OutboundSender) -> Self {
        Self {
            device,
            control,
            outbound,
            inner: Mutex::new(Reconcile {
                value: 0.0,
                last_known: 0.0,
                touched: false,
                display_mode: ValueDisplayMode::default(),
            }),
            name_tx: watch::channel(String::new()).0,
            display_tx: watch::channel(String::new()).0,
            value_tx: watch::channel(0.0).0,
            touched_tx: watch::channel(false).0,
        }
    }

    pub fn device(&self) -> usize {
        self.device
    }

    pub fn control(&self) -> usize {
        self.control
    }

    // =========================================================================
    // Local intent (UI-thread callers)
    // =========================================================================

    /// Apply a local drag/touch edit with a raw value in `[0, 1]`
    ///
    /// A no-op when the value is unchanged after quantization, which
    /// suppresses redundant network chatter from sub-quantum drag jitter.
    /// Otherwise the raw value is applied locally right away so the UI stays
    /// fluid between grid steps, and the quantized value goes on the wire.
    pub fn apply_local_edit(&self, value: f32) {
        let mut inner = self.inner.lock();
        let quantized = quantize_for(inner.display_mode, value);
        if quantized == quantize_for(inner.display_mode, inner.value) {
            return;
        }
        inner.value = value;
        inner.last_known = value;
        self.value_tx.send_replace(value);
        self.outbound.send(OutboundMessage::Value {
            device: self.device,
            control: self.control,
            value: quantized,
        });
    }

    /// Begin or end the touch-hold suppression window
    ///
    /// Idempotent: repeated calls with the current state do nothing. Ending
    /// a touch reconciles the visible value to the latest assertion recorded
    /// while the window was open, so any remote update that arrived mid-touch
    /// wins the moment the finger lifts.
    pub fn set_touched(&self, touched: bool) {
        let mut inner = self.inner.lock();
        if inner.touched == touched {
            return;
        }
        inner.touched = touched;
        if !touched {
            inner.value = inner.last_known;
            self.value_tx.send_replace(inner.last_known);
        }
        self.touched_tx.send_replace(touched);
        self.outbound.send(OutboundMessage::Touch {
            device: self.device,
            control: self.control,
            touched,
        });
    }

    /// Ask the DAW to focus this control's device; no local state change
    pub fn focus(&self) {
        self.outbound.send(OutboundMessage::Focus {
            device: self.device,
        });
    }

    pub fn display_mode(&self) -> ValueDisplayMode {
        self.inner.lock().display_mode
    }

    pub fn set_display_mode(&self, mode: ValueDisplayMode) {
        self.inner.lock().display_mode = mode;
    }

    // =========================================================================
    // Remote writer (inbound dispatcher)
    // =========================================================================

    /// Apply a value pushed by the DAW
    ///
    /// The latest remote assertion is always recorded, even while a touch
    /// suppresses it from the visible value.
    pub fn apply_remote_edit(&self, value: f32) {
        let quantized = quantize(value);
        let mut inner = self.inner.lock();
        inner.last_known = quantized;
        if !inner.touched {
            inner.value = quantized;
            self.value_tx.send_replace(quantized);
        }
    }

    pub(crate) fn set_name_from_remote(&self, name: &str) {
        self.name_tx.send_replace(name.to_string());
    }

    pub(crate) fn set_display_from_remote(&self, text: &str) {
        self.display_tx.send_replace(text.to_string());
    }

    // =========================================================================
    // Observable state (UI readers)
    // =========================================================================

    pub fn name(&self) -> String {
        self.name_tx.borrow().clone()
    }

    pub fn display_value(&self) -> String {
        self.display_tx.borrow().clone()
    }

    pub fn parameter_value(&self) -> f32 {
        *self.value_tx.borrow()
    }

    pub fn touched(&self) -> bool {
        *self.touched_tx.borrow()
    }

    pub fn subscribe_name(&self) -> watch::Receiver<String> {
        self.name_tx.subscribe()
    }

    pub fn subscribe_display_value(&self) -> watch::Receiver<String> {
        self.display_tx.subscribe()
    }

    pub fn subscribe_parameter_value(&self) -> watch::Receiver<f32> {
        self.value_tx.subscribe()
    }

    pub fn subscribe_touched(&self) -> watch::Receiver<bool> {
        self.touched_tx.subscribe()
    }

    /// Human-readable label for the current value under the display mode
    pub fn value_label(&self) -> String {
        let inner = self.inner.lock();
        match inner.display_mode {
            ValueDisplayMode::Remote => self.display_tx.borrow().clone(),
            ValueDisplayMode::Byte => midi_step(inner.value).to_string(),
            ValueDisplayMode::Note => note_label(midi_step(inner.value)),
        }
    }
}
