//! Inbound event dispatch
//!
//! Routes each received line to the control or device it addresses.
//! Malformed lines and out-of-range indices are logged and dropped; the
//! receive loop must keep running no matter what the wire delivers.

use crate::protocol::InboundEvent;
use crate::state::StateRegistry;
use std::sync::Arc;
use tracing::warn;

/// Routes parsed inbound events into the state registry
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<StateRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<StateRegistry>) -> Self {
        Self { registry }
    }

    /// Parse and apply one inbound line
    pub fn dispatch_line(&self, line: &str) {
        match InboundEvent::parse(line) {
            Ok(event) => self.apply(event),
            Err(e) => warn!("dropping malformed line {:?}: {}", line, e),
        }
    }

    /// Apply a parsed event to the addressed state
    pub fn apply(&self, event: InboundEvent) {
        match event {
            InboundEvent::DeviceName { device, name } => {
                match self.registry.device(device) {
                    Some(state) => state.set_name_from_remote(&name),
                    None => warn!("dropping name for unknown device {}", device),
                }
            }
            InboundEvent::Playing { device, playing } => {
                match self.registry.device(device) {
                    Some(state) => state.set_playing_from_remote(playing),
                    None => warn!("dropping playing flag for unknown device {}", device),
                }
            }
            InboundEvent::Color { device, color } => match self.registry.device(device) {
                Some(state) => state.set_color_from_remote(color),
                None => warn!("dropping color for unknown device {}", device),
            },
            InboundEvent::ControlName {
                device,
                control,
                name,
            } => match self.registry.control(device, control) {
                Some(state) => state.set_name_from_remote(&name),
                None => warn!("dropping name for unknown control {},{}", device, control),
            },
            InboundEvent::ControlValue {
                device,
                control,
                value,
            } => match self.registry.control(device, control) {
                Some(state) => state.apply_remote_edit(value),
                None => warn!("dropping value for unknown control {},{}", device, control),
            },
            InboundEvent::ControlDisplay {
                device,
                control,
                text,
            } => match self.registry.control(device, control) {
                Some(state) => state.set_display_from_remote(&text),
                None => warn!(
                    "dropping display text for unknown control {},{}",
                    device, control
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound;
    use crate::protocol::Rgb;

    fn test_dispatcher(devices: usize, controls: usize) -> (Dispatcher, Arc<StateRegistry>) {
        let (tx, _rx) = outbound::channel();
        let registry = Arc::new(StateRegistry::new(devices, controls, tx));
        (Dispatcher::new(registry.clone()), registry)
    }

    #[test]
    fn test_devicename_routes_to_device_not_control() {
        // "devicename" in field 2 must never be parsed as a control index
        let (dispatcher, registry) = test_dispatcher(4, 8);
        dispatcher.dispatch_line("3,devicename,Bassline");

        assert_eq!(registry.device(3).unwrap().name(), "Bassline");
    }

    #[test]
    fn test_control_value_reaches_reconciliation() {
        let (dispatcher, registry) = test_dispatcher(4, 8);
        dispatcher.dispatch_line("2,3,value,0.5");

        assert_eq!(registry.control(2, 3).unwrap().parameter_value(), 0.5);
    }

    #[test]
    fn test_control_name_and_display() {
        let (dispatcher, registry) = test_dispatcher(1, 1);
        dispatcher.dispatch_line("0,0,name,Cutoff");
        dispatcher.dispatch_line("0,0,display,880 Hz");

        let control = registry.control(0, 0).unwrap();
        assert_eq!(control.name(), "Cutoff");
        assert_eq!(control.display_value(), "880 Hz");
    }

    #[test]
    fn test_playing_and_color() {
        let (dispatcher, registry) = test_dispatcher(2, 1);
        dispatcher.dispatch_line("1,playing,1");
        dispatcher.dispatch_line("1,color,10,20,30");

        let device = registry.device(1).unwrap();
        assert!(device.playing());
        assert_eq!(
            device.color(),
            Rgb {
                r: 10,
                g: 20,
                b: 30
            }
        );
    }

    #[test]
    fn test_unknown_indices_are_dropped() {
        let (dispatcher, registry) = test_dispatcher(2, 2);

        // None of these may panic or disturb existing state
        dispatcher.dispatch_line("9,devicename,Ghost");
        dispatcher.dispatch_line("9,playing,1");
        dispatcher.dispatch_line("0,5,value,0.5");
        dispatcher.dispatch_line("5,0,value,0.5");

        assert_eq!(registry.device(0).unwrap().name(), "");
        assert_eq!(registry.control(0, 0).unwrap().parameter_value(), 0.0);
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let (dispatcher, registry) = test_dispatcher(2, 2);

        dispatcher.dispatch_line("");
        dispatcher.dispatch_line("nonsense");
        dispatcher.dispatch_line("0,0,value,not-a-number");
        dispatcher.dispatch_line("0,0,unknownaction,1");

        assert_eq!(registry.control(0, 0).unwrap().parameter_value(), 0.0);
    }
}
