//! Mirrored surface state
//!
//! One `ControlState` per `(device, control)` pair and one `DeviceState` per
//! device slot, all created up front for the configured grid and owned by an
//! explicit registry. The registry is built once at startup and shared by
//! handle; nothing about its shape changes at runtime, only the state inside
//! each entry. Out-of-range lookups return `None` so a malformed inbound
//! index can never fault a caller.

pub mod control;
pub mod device;

pub use control::{ControlState, ValueDisplayMode};
pub use device::DeviceState;

use crate::outbound::OutboundSender;
use std::collections::HashMap;

/// Identity of a single addressable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlKey {
    pub device: usize,
    pub control: usize,
}

/// Owner of all control and device state
pub struct StateRegistry {
    devices: Vec<DeviceState>,
    controls: HashMap<ControlKey, ControlState>,
    controls_per_device: usize,
}

impl StateRegistry {
    /// Build the full state grid for `device_count` devices with
    /// `controls_per_device` controls each
    pub fn new(
        device_count: usize,
        controls_per_device: usize,
        outbound: OutboundSender,
    ) -> Self {
        let mut devices = Vec::with_capacity(device_count);
        let mut controls = HashMap::with_capacity(device_count * controls_per_device);

        for device in 0..device_count {
            devices.push(DeviceState::new(device, outbound.clone()));
            for control in 0..controls_per_device {
                controls.insert(
                    ControlKey { device, control },
                    ControlState::new(device, control, outbound.clone()),
                );
            }
        }

        Self {
            devices,
            controls,
            controls_per_device,
        }
    }

    /// Look up a control; `None` when either index is out of range
    pub fn control(&self, device: usize, control: usize) -> Option<&ControlState> {
        self.controls.get(&ControlKey { device, control })
    }

    /// Look up a device slot; `None` when the index is out of range
    pub fn device(&self, device: usize) -> Option<&DeviceState> {
        self.devices.get(device)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn controls_per_device(&self) -> usize {
        self.controls_per_device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound;

    #[test]
    fn test_registry_covers_configured_grid() {
        let (tx, _rx) = outbound::channel();
        let registry = StateRegistry::new(3, 4, tx);

        assert_eq!(registry.device_count(), 3);
        assert_eq!(registry.controls_per_device(), 4);

        for device in 0..3 {
            assert!(registry.device(device).is_some());
            for control in 0..4 {
                let state = registry.control(device, control).unwrap();
                assert_eq!(state.device(), device);
                assert_eq!(state.control(), control);
            }
        }
    }

    #[test]
    fn test_out_of_range_lookups_return_none() {
        let (tx, _rx) = outbound::channel();
        let registry = StateRegistry::new(2, 8, tx);

        assert!(registry.device(2).is_none());
        assert!(registry.control(0, 8).is_none());
        assert!(registry.control(2, 0).is_none());
    }
}
