//! Operator-confirmed device selection
//!
//! Selecting a device is the only gate before the card is wiped, so the loop
//! has no way out except an explicit `y`/`Y`. Any other confirmation answer,
//! including `yes`, sends the operator back to the device list.

use crate::error::{Result, WizardError};
use crate::ui::input::InputSource;
use crate::ui::{Logger, highlight};

use super::{DeviceDescriptor, list_entry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionState<'a> {
    AwaitingIndex,
    AwaitingConfirmation(&'a DeviceDescriptor),
    Done(&'a DeviceDescriptor),
}

/// Interactive selection over an enumerated device list
pub struct DeviceSelector<'a> {
    devices: &'a [DeviceDescriptor],
    logger: Logger,
}

impl<'a> DeviceSelector<'a> {
    pub fn new(devices: &'a [DeviceDescriptor], logger: Logger) -> Self {
        Self { devices, logger }
    }

    /// Prompt until the operator picks a device and confirms it
    pub fn select(&self, input: &mut dyn InputSource) -> Result<&'a DeviceDescriptor> {
        if self.devices.is_empty() {
            return Err(WizardError::NoRemovableDevices);
        }

        let mut state = SelectionState::AwaitingIndex;
        loop {
            state = match state {
                SelectionState::AwaitingIndex => {
                    self.render();
                    let prompt = format!(
                        "Please choose the target device by {}",
                        highlight("number")
                    );
                    let answer = input.read_line(&prompt)?;
                    self.on_index(&answer)
                }
                SelectionState::AwaitingConfirmation(device) => {
                    let prompt = format!(
                        "All data on {} will be lost, proceed? (y/n)",
                        highlight(&device.description)
                    );
                    let answer = input.read_line(&prompt)?;
                    Self::on_confirmation(device, &answer)
                }
                SelectionState::Done(device) => return Ok(device),
            };
        }
    }

    fn render(&self) {
        for (index, device) in self.devices.iter().enumerate() {
            self.logger.info(&list_entry(index, device));
        }
    }

    /// Only the number exactly as listed selects a device
    fn on_index(&self, answer: &str) -> SelectionState<'a> {
        let index = answer
            .parse::<usize>()
            .ok()
            .filter(|i| i.to_string() == answer);
        match index.and_then(|i| self.devices.get(i)) {
            Some(device) => SelectionState::AwaitingConfirmation(device),
            None => SelectionState::AwaitingIndex,
        }
    }

    fn on_confirmation(device: &'a DeviceDescriptor, answer: &str) -> SelectionState<'a> {
        if answer == "y" || answer == "Y" {
            SelectionState::Done(device)
        } else {
            SelectionState::AwaitingIndex
        }
    }
}
