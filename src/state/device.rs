//! Per-device metadata mirror
//!
//! Structurally simpler than control state: name, color and playing flag are
//! remote-authoritative with no local write path. The navigation intents
//! (next/previous page, pin) are fire-and-forget outbound messages and never
//! mutate local state.

use crate::outbound::OutboundSender;
use crate::protocol::{OutboundMessage, Rgb};
use tokio::sync::watch;

/// State of one device slot, identified by its device index
pub struct DeviceState {
    device: usize,
    outbound: OutboundSender,
    name_tx: watch::Sender<String>,
    color_tx: watch::Sender<Rgb>,
    playing_tx: watch::Sender<bool>,
}

impl DeviceState {
    pub(crate) fn new(device: usize, outbound: OutboundSender) -> Self {
        Self {
            device,
            outbound,
            name_tx: watch::channel(String::new()).0,
            color_tx: watch::channel(Rgb::default()).0,
            playing_tx: watch::channel(false).0,
        }
    }

    pub fn device(&self) -> usize {
        self.device
    }

    // =========================================================================
    // Navigation intents (UI-thread callers)
    // =========================================================================

    pub fn next_page(&self) {
        self.outbound.send(OutboundMessage::NextPage {
            device: self.device,
        });
    }

    pub fn previous_page(&self) {
        self.outbound.send(OutboundMessage::PreviousPage {
            device: self.device,
        });
    }

    pub fn pin(&self) {
        self.outbound.send(OutboundMessage::Pin {
            device: self.device,
        });
    }

    // =========================================================================
    // Remote writer (inbound dispatcher)
    // =========================================================================

    pub(crate) fn set_name_from_remote(&self, name: &str) {
        self.name_tx.send_replace(name.to_string());
    }

    pub(crate) fn set_color_from_remote(&self, color: Rgb) {
        self.color_tx.send_replace(color);
    }

    pub(crate) fn set_playing_from_remote(&self, playing: bool) {
        self.playing_tx.send_replace(playing);
    }

    // =========================================================================
    // Observable state (UI readers)
    // =========================================================================

    pub fn name(&self) -> String {
        self.name_tx.borrow().clone()
    }

    pub fn color(&self) -> Rgb {
        *self.color_tx.borrow()
    }

    pub fn playing(&self) -> bool {
        *self.playing_tx.borrow()
    }

    pub fn subscribe_name(&self) -> watch::Receiver<String> {
        self.name_tx.subscribe()
    }

    pub fn subscribe_color(&self) -> watch::Receiver<Rgb> {
        self.color_tx.subscribe()
    }

    pub fn subscribe_playing(&self) -> watch::Receiver<bool> {
        self.playing_tx.subscribe()
    }
}
