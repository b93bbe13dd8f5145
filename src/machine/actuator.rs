//! Dispensing hardware seen from the engine.
//!
//! The engine never talks to hardware directly. A driver that has hardware
//! injects an [`Actuator`] at construction; a driver without hardware simply
//! doesn't, and dispensing becomes a notification only.

use crate::catalog::Product;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Pause between servo positions in a dispense sweep.
pub const DEFAULT_SERVO_PAUSE: Duration = Duration::from_millis(400);

/// Error reported by an actuator. Logged by the engine, never propagated.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Actuator failed: {0}")]
pub struct ActuatorError(pub String);

/// Something that physically releases a product.
///
/// Called from the deliver state's entry, after the machine's counters
/// have already been settled. It may block.
pub trait Actuator: Send {
    fn dispense(&mut self, product: &Product) -> Result<(), ActuatorError>;
}

impl<F> Actuator for F
where
    F: FnMut(&Product) -> Result<(), ActuatorError> + Send,
{
    fn dispense(&mut self, product: &Product) -> Result<(), ActuatorError> {
        self(product)
    }
}

/// Positions a hobby servo can be driven to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServoPosition {
    Min,
    Mid,
    Max,
}

/// Minimal servo port.
pub trait Servo: Send {
    fn set_position(&mut self, position: ServoPosition) -> Result<(), ActuatorError>;
}

/// Actuator that sweeps a servo mid, min, max to push a product out.
pub struct ServoSweep<S: Servo> {
    servo: S,
    pause: Duration,
}

impl<S: Servo> ServoSweep<S> {
    pub fn new(servo: S) -> Self {
        Self {
            servo,
            pause: DEFAULT_SERVO_PAUSE,
        }
    }

    /// Override the pause between positions.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn into_inner(self) -> S {
        self.servo
    }
}

impl<S: Servo> Actuator for ServoSweep<S> {
    fn dispense(&mut self, _product: &Product) -> Result<(), ActuatorError> {
        for position in [ServoPosition::Mid, ServoPosition::Min, ServoPosition::Max] {
            self.servo.set_position(position)?;
            if !self.pause.is_zero() {
                thread::sleep(self.pause);
            }
        }
        Ok(())
    }
}
