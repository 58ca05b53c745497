//! Call event notifiers.
//!
//! Every event a call records is also handed to its notifier, so consumers
//! can follow a call while it runs (print a live transcript, stream to a UI).

use callflow_module::Event;
use tokio::sync::mpsc;

/// Receives call events as they happen.
pub trait CallNotifier: Send + Sync {
  fn notify(&self, call_id: &str, event: &Event);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl CallNotifier for NoopNotifier {
  fn notify(&self, _call_id: &str, _event: &Event) {}
}

/// An event tagged with the call it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEvent {
  pub call_id: String,
  pub event: Event,
}

/// A notifier that sends events to an unbounded channel.
///
/// The simulator never waits on the consumer.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<CallEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<CallEvent>) -> Self {
    Self { sender }
  }

  /// A notifier with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<CallEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

impl CallNotifier for ChannelNotifier {
  fn notify(&self, call_id: &str, event: &Event) {
    // Receiver may have been dropped
    let _ = self.sender.send(CallEvent {
      call_id: call_id.to_string(),
      event: event.clone(),
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_channel_notifier() {
    let (notifier, mut receiver) = ChannelNotifier::channel();

    notifier.notify("call-1", &Event::CallEnded);

    let received = receiver.try_recv().unwrap();
    assert_eq!(received.call_id, "call-1");
    assert_eq!(received.event, Event::CallEnded);
  }

  #[test]
  fn test_dropped_receiver_is_ignored() {
    let (notifier, receiver) = ChannelNotifier::channel();
    drop(receiver);

    notifier.notify("call-1", &Event::CallEnded);
  }
}
