//! Controller-value to command dispatch.
//!
//! A dispatcher is bound to one (channel, controller number) pair at
//! construction. Control Change messages matching that pair are routed to
//! the action registered for their controller value; everything else is
//! ignored. The command table is built once at startup and read-only after.

use std::collections::HashMap;

use crate::midi::{MidiMessage, CONTROL_CHANGE};

/// A registered action, invoked with the controller value that triggered it.
pub type Action = Box<dyn Fn(u8) -> anyhow::Result<()>>;

/// Routes Control Change messages to registered actions.
pub struct CommandDispatcher {
    channel: u8,
    controller_number: u8,
    commands: HashMap<u8, Action>,
}

impl CommandDispatcher {
    /// Create a dispatcher for one channel (1-based) and controller number.
    pub fn new(channel: u8, controller_number: u8) -> Self {
        Self {
            channel,
            controller_number,
            commands: HashMap::new(),
        }
    }

    /// Register `action` for `controller_value`, replacing any previous one.
    pub fn register_command(&mut self, controller_value: u8, action: Action) {
        self.commands.insert(controller_value, action);
    }

    /// Feed one decoded message through the dispatcher.
    ///
    /// Messages with another type, channel, or controller number are ignored.
    /// A matching message with no registered action logs a warning and is not
    /// an error. Errors from the invoked action propagate to the caller.
    pub fn process_message(&self, message: &MidiMessage) -> anyhow::Result<()> {
        log::debug!(
            "Message type {}, channel {}",
            message.message_type,
            message.channel
        );

        if message.message_type != CONTROL_CHANGE || message.channel != self.channel {
            return Ok(());
        }
        if message.data.len() < 2 {
            return Ok(());
        }

        let controller_number = message.data[0];
        let controller_value = message.data[1];
        if controller_number != self.controller_number {
            return Ok(());
        }

        log::debug!("Processing controller value {}", controller_value);
        match self.commands.get(&controller_value) {
            Some(action) => action(controller_value),
            None => {
                log::warn!(
                    "No command registered for controller value {}",
                    controller_value
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    const TEST_CHANNEL: u8 = 5;
    const TEST_CONTROLLER: u8 = 16;
    const TEST_VALUE: u8 = 57;

    fn cc_message(channel: u8, controller: u8, value: u8) -> MidiMessage {
        MidiMessage {
            message_type: CONTROL_CHANGE,
            channel,
            data: vec![controller, value],
        }
    }

    fn recording_dispatcher() -> (CommandDispatcher, Rc<RefCell<Vec<u8>>>) {
        let mut dispatcher = CommandDispatcher::new(TEST_CHANNEL, TEST_CONTROLLER);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let recorded = calls.clone();
        dispatcher.register_command(
            TEST_VALUE,
            Box::new(move |value| {
                recorded.borrow_mut().push(value);
                Ok(())
            }),
        );
        (dispatcher, calls)
    }

    #[test]
    fn test_dispatches_registered_value_once() {
        let (dispatcher, calls) = recording_dispatcher();
        let msg = cc_message(TEST_CHANNEL, TEST_CONTROLLER, TEST_VALUE);
        dispatcher.process_message(&msg).unwrap();
        assert_eq!(*calls.borrow(), vec![TEST_VALUE]);
    }

    #[test]
    fn test_end_to_end_from_raw_bytes() {
        // 0xB4 = CC on wire channel 4, labelled channel 5.
        let (dispatcher, calls) = recording_dispatcher();
        let msg = MidiMessage::from_raw(&[0b1011_0100, TEST_CONTROLLER, TEST_VALUE]).unwrap();
        dispatcher.process_message(&msg).unwrap();
        assert_eq!(*calls.borrow(), vec![TEST_VALUE]);
    }

    #[test]
    fn test_ignores_other_channel() {
        let (dispatcher, calls) = recording_dispatcher();
        let msg = cc_message(TEST_CHANNEL + 1, TEST_CONTROLLER, TEST_VALUE);
        dispatcher.process_message(&msg).unwrap();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_ignores_other_controller_number() {
        let (dispatcher, calls) = recording_dispatcher();
        let msg = cc_message(TEST_CHANNEL, TEST_CONTROLLER + 1, TEST_VALUE);
        dispatcher.process_message(&msg).unwrap();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_ignores_other_message_type() {
        let (dispatcher, calls) = recording_dispatcher();
        let msg = MidiMessage {
            message_type: 0b1001, // Note On
            channel: TEST_CHANNEL,
            data: vec![TEST_CONTROLLER, TEST_VALUE],
        };
        dispatcher.process_message(&msg).unwrap();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_ignores_short_data() {
        let (dispatcher, calls) = recording_dispatcher();
        let msg = MidiMessage {
            message_type: CONTROL_CHANGE,
            channel: TEST_CHANNEL,
            data: vec![TEST_CONTROLLER],
        };
        dispatcher.process_message(&msg).unwrap();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_unregistered_value_is_not_an_error() {
        let (dispatcher, calls) = recording_dispatcher();
        let msg = cc_message(TEST_CHANNEL, TEST_CONTROLLER, TEST_VALUE + 1);
        assert!(dispatcher.process_message(&msg).is_ok());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_action_error_propagates() {
        let mut dispatcher = CommandDispatcher::new(TEST_CHANNEL, TEST_CONTROLLER);
        dispatcher.register_command(
            TEST_VALUE,
            Box::new(|_| Err(anyhow::anyhow!("request failed"))),
        );
        let msg = cc_message(TEST_CHANNEL, TEST_CONTROLLER, TEST_VALUE);
        assert!(dispatcher.process_message(&msg).is_err());
    }

    #[test]
    fn test_reregistering_replaces_action() {
        let (mut dispatcher, calls) = recording_dispatcher();
        dispatcher.register_command(TEST_VALUE, Box::new(|_| Ok(())));
        let msg = cc_message(TEST_CHANNEL, TEST_CONTROLLER, TEST_VALUE);
        dispatcher.process_message(&msg).unwrap();
        // The original recording action was replaced.
        assert!(calls.borrow().is_empty());
    }
}
