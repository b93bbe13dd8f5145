//! Console Session
//!
//! Drives a vending machine through two customer sessions the way a GUI
//! or button panel would: one token per step, reading state back after
//! each one.
//!
//! Key concepts:
//! - One event token per step
//! - Pass-through delivery and greedy change
//! - An actuator injected at construction
//!
//! Run with: cargo run --example console_session

use coinbox::machine::{ActuatorError, Servo, ServoPosition, ServoSweep};
use coinbox::{MachineBuilder, VendingMachine, RETURN_TOKEN};
use std::error::Error;
use std::time::Duration;

/// Stands in for a GPIO servo.
struct PrintingServo;

impl Servo for PrintingServo {
    fn set_position(&mut self, position: ServoPosition) -> Result<(), ActuatorError> {
        println!("    servo -> {position:?}");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Vending Machine Console Session ===\n");

    let mut machine = MachineBuilder::new()
        .standard_states()
        .actuator(ServoSweep::new(PrintingServo).with_pause(Duration::from_millis(50)))
        .build()?;

    println!("Session 1: 10 + 10 + 25, try gum early, then buy it");
    for token in ["10", "10", "gum", "25", "gum"] {
        machine.handle(token)?;
        report(&mut machine, token);
    }
    machine.step()?;
    report(&mut machine, "(pay out)");

    println!("\nSession 2: toonie, then change of heart");
    for token in ["toonie", RETURN_TOKEN] {
        machine.handle(token)?;
        report(&mut machine, token);
    }
    machine.step()?;
    report(&mut machine, "(pay out)");

    println!("\nTransitions recorded: {}", machine.history().len());
    println!("\n=== Example Complete ===");
    Ok(())
}

fn report(machine: &mut VendingMachine, token: &str) {
    println!("  > {token}");
    for notification in machine.take_notifications() {
        println!("    {notification}");
    }
    println!("    {}", machine.snapshot());
}
