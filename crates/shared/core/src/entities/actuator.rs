use serde::{Deserialize, Serialize};

/// State of the remote actuator (lamp and motor pair)
///
/// The remote side models two outputs, `led` and `motor`, which are always
/// written together with the same value, so they form one logical switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActuatorState {
    pub primary_output_on: bool,
}

impl ActuatorState {
    pub const OFF: ActuatorState = ActuatorState {
        primary_output_on: false,
    };
    pub const ON: ActuatorState = ActuatorState {
        primary_output_on: true,
    };

    pub fn new(primary_output_on: bool) -> Self {
        Self { primary_output_on }
    }

    pub fn is_on(&self) -> bool {
        self.primary_output_on
    }

    /// Returns the opposite state
    pub fn toggled(&self) -> Self {
        Self::new(!self.primary_output_on)
    }

    /// Values for the `(led, motor)` outputs
    pub fn outputs(&self) -> (bool, bool) {
        (self.primary_output_on, self.primary_output_on)
    }
}

impl From<bool> for ActuatorState {
    fn from(on: bool) -> Self {
        Self::new(on)
    }
}
