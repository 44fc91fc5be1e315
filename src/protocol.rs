//! Protocol messages for the DAW link
//!
//! Comma-separated text grammar, no escaping:
//!
//! Outbound (surface -> DAW):
//! - `value,<device>,<control>,<float>`
//! - `touch,<device>,<control>,<0|1>`
//! - `focus,<device>`
//! - `next,<device>` / `previous,<device>` / `pin,<device>`
//!
//! Inbound (DAW -> surface):
//! - `<device>,devicename,<name>`
//! - `<device>,playing,<0|1>`
//! - `<device>,color,<r>,<g>,<b>`
//! - `<device>,<control>,name,<name>`
//! - `<device>,<control>,value,<float>`
//! - `<device>,<control>,display,<text>`
//!
//! The second inbound field is either a literal device-event token or a
//! numeric control index; literal tokens are matched before any numeric
//! parse is attempted. Extra trailing fields are ignored, matching the
//! DAW-side sender.

use std::fmt;

/// An RGB color pushed by the DAW for a device slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// =============================================================================
// Outbound
// =============================================================================

/// A message sent from the surface to the DAW
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    /// Set a parameter to a quantized normalized value
    Value {
        device: usize,
        control: usize,
        value: f32,
    },
    /// Begin or end a touch-hold on a control
    Touch {
        device: usize,
        control: usize,
        touched: bool,
    },
    /// Focus a device in the DAW UI
    Focus { device: usize },
    /// Switch the device's remote-controls page forward
    NextPage { device: usize },
    /// Switch the device's remote-controls page backward
    PreviousPage { device: usize },
    /// Pin the device slot in the DAW
    Pin { device: usize },
}

impl OutboundMessage {
    /// Render the wire line for this message (no framing, no terminator)
    pub fn to_line(&self) -> String {
        match self {
            Self::Value {
                device,
                control,
                value,
            } => format!("value,{},{},{}", device, control, value),
            Self::Touch {
                device,
                control,
                touched,
            } => format!(
                "touch,{},{},{}",
                device,
                control,
                if *touched { 1 } else { 0 }
            ),
            Self::Focus { device } => format!("focus,{}", device),
            Self::NextPage { device } => format!("next,{}", device),
            Self::PreviousPage { device } => format!("previous,{}", device),
            Self::Pin { device } => format!("pin,{}", device),
        }
    }
}

// =============================================================================
// Inbound
// =============================================================================

/// A parsed line received from the DAW
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    DeviceName { device: usize, name: String },
    Playing { device: usize, playing: bool },
    Color { device: usize, color: Rgb },
    ControlName {
        device: usize,
        control: usize,
        name: String,
    },
    ControlValue {
        device: usize,
        control: usize,
        value: f32,
    },
    ControlDisplay {
        device: usize,
        control: usize,
        text: String,
    },
}

/// Why an inbound line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line has fewer fields than the shortest valid message
    TooFewFields { got: usize },
    /// A numeric field did not parse
    BadNumber { field: &'static str, value: String },
    /// Third field of a control message is not a known action tag
    UnknownAction { action: String },
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { got } => write!(f, "too few fields ({})", got),
            Self::BadNumber { field, value } => {
                write!(f, "bad {} value {:?}", field, value)
            }
            Self::UnknownAction { action } => write!(f, "unknown action {:?}", action),
        }
    }
}

impl InboundEvent {
    /// Parse one inbound line into a structured event
    ///
    /// Never panics on malformed input; the dispatcher logs and drops
    /// anything that comes back as an error.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 3 {
            return Err(ParseError::TooFewFields { got: fields.len() });
        }

        let device = parse_number::<usize>("device", fields[0])?;

        // Device events carry a literal token where control messages carry
        // a control index; match the tokens first so a name like "playing"
        // is never mistaken for an index.
        match fields[1] {
            "devicename" => {
                return Ok(Self::DeviceName {
                    device,
                    name: fields[2].to_string(),
                })
            }
            "playing" => {
                let flag = parse_number::<i32>("playing", fields[2])?;
                return Ok(Self::Playing {
                    device,
                    playing: flag > 0,
                });
            }
            "color" => {
                if fields.len() < 5 {
                    return Err(ParseError::TooFewFields { got: fields.len() });
                }
                return Ok(Self::Color {
                    device,
                    color: Rgb {
                        r: parse_number::<u8>("red", fields[2])?,
                        g: parse_number::<u8>("green", fields[3])?,
                        b: parse_number::<u8>("blue", fields[4])?,
                    },
                });
            }
            _ => {}
        }

        let control = parse_number::<usize>("control", fields[1])?;
        if fields.len() < 4 {
            return Err(ParseError::TooFewFields { got: fields.len() });
        }

        match fields[2] {
            "name" => Ok(Self::ControlName {
                device,
                control,
                name: fields[3].to_string(),
            }),
            "value" => Ok(Self::ControlValue {
                device,
                control,
                value: parse_number::<f32>("value", fields[3])?,
            }),
            "display" => Ok(Self::ControlDisplay {
                device,
                control,
                text: fields[3].to_string(),
            }),
            other => Err(ParseError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::BadNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Outbound rendering
    // =========================================================================

    #[test]
    fn test_value_line() {
        let msg = OutboundMessage::Value {
            device: 2,
            control: 3,
            value: 0.5,
        };
        assert_eq!(msg.to_line(), "value,2,3,0.5");
    }

    #[test]
    fn test_touch_lines() {
        let held = OutboundMessage::Touch {
            device: 0,
            control: 7,
            touched: true,
        };
        let released = OutboundMessage::Touch {
            device: 0,
            control: 7,
            touched: false,
        };
        assert_eq!(held.to_line(), "touch,0,7,1");
        assert_eq!(released.to_line(), "touch,0,7,0");
    }

    #[test]
    fn test_navigation_lines() {
        assert_eq!(OutboundMessage::Focus { device: 4 }.to_line(), "focus,4");
        assert_eq!(OutboundMessage::NextPage { device: 4 }.to_line(), "next,4");
        assert_eq!(
            OutboundMessage::PreviousPage { device: 4 }.to_line(),
            "previous,4"
        );
        assert_eq!(OutboundMessage::Pin { device: 4 }.to_line(), "pin,4");
    }

    // =========================================================================
    // Inbound parsing
    // =========================================================================

    #[test]
    fn test_parse_devicename() {
        // The token must win over control-index parsing (field 2 is text)
        let event = InboundEvent::parse("3,devicename,Bassline").unwrap();
        assert_eq!(
            event,
            InboundEvent::DeviceName {
                device: 3,
                name: "Bassline".to_string()
            }
        );
    }

    #[test]
    fn test_parse_playing() {
        assert_eq!(
            InboundEvent::parse("0,playing,1").unwrap(),
            InboundEvent::Playing {
                device: 0,
                playing: true
            }
        );
        assert_eq!(
            InboundEvent::parse("0,playing,0").unwrap(),
            InboundEvent::Playing {
                device: 0,
                playing: false
            }
        );
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(
            InboundEvent::parse("5,color,255,128,0").unwrap(),
            InboundEvent::Color {
                device: 5,
                color: Rgb {
                    r: 255,
                    g: 128,
                    b: 0
                }
            }
        );
    }

    #[test]
    fn test_parse_control_events() {
        assert_eq!(
            InboundEvent::parse("1,2,name,Cutoff").unwrap(),
            InboundEvent::ControlName {
                device: 1,
                control: 2,
                name: "Cutoff".to_string()
            }
        );
        assert_eq!(
            InboundEvent::parse("1,2,value,0.75").unwrap(),
            InboundEvent::ControlValue {
                device: 1,
                control: 2,
                value: 0.75
            }
        );
        assert_eq!(
            InboundEvent::parse("1,2,display,3.4 kHz").unwrap(),
            InboundEvent::ControlDisplay {
                device: 1,
                control: 2,
                text: "3.4 kHz".to_string()
            }
        );
    }

    #[test]
    fn test_parse_too_few_fields() {
        assert_eq!(
            InboundEvent::parse(""),
            Err(ParseError::TooFewFields { got: 1 })
        );
        assert_eq!(
            InboundEvent::parse("3"),
            Err(ParseError::TooFewFields { got: 1 })
        );
        assert_eq!(
            InboundEvent::parse("3,devicename"),
            Err(ParseError::TooFewFields { got: 2 })
        );
        assert_eq!(
            InboundEvent::parse("1,2,value"),
            Err(ParseError::TooFewFields { got: 3 })
        );
        assert_eq!(
            InboundEvent::parse("5,color,255,128"),
            Err(ParseError::TooFewFields { got: 4 })
        );
    }

    #[test]
    fn test_parse_bad_numbers() {
        assert!(matches!(
            InboundEvent::parse("x,devicename,Foo"),
            Err(ParseError::BadNumber { field: "device", .. })
        ));
        assert!(matches!(
            InboundEvent::parse("1,bogus,value,0.5"),
            Err(ParseError::BadNumber {
                field: "control",
                ..
            })
        ));
        assert!(matches!(
            InboundEvent::parse("1,2,value,abc"),
            Err(ParseError::BadNumber { field: "value", .. })
        ));
        assert!(matches!(
            InboundEvent::parse("5,color,300,0,0"),
            Err(ParseError::BadNumber { field: "red", .. })
        ));
    }

    #[test]
    fn test_parse_unknown_action() {
        assert_eq!(
            InboundEvent::parse("1,2,wiggle,0.5"),
            Err(ParseError::UnknownAction {
                action: "wiggle".to_string()
            })
        );
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        // The DAW never escapes commas, so extra fields can only come from
        // trailing data; take the first payload field like the original
        // receiver does.
        assert_eq!(
            InboundEvent::parse("3,devicename,Bassline,extra").unwrap(),
            InboundEvent::DeviceName {
                device: 3,
                name: "Bassline".to_string()
            }
        );
    }
}
