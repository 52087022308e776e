//! crossbeam-channel plumbing between the engine and whoever renders progress.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Handle the engine reports progress through.
///
/// Cheap to clone; rayon workers share one by reference.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { inner: sender }
    }

    /// Report an event. Never blocks and never fails: with nobody listening
    /// the event is dropped.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Listening end, owned by the CLI (or any other front end)
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Wait for the next event; `None` once every sender is gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Events until every sender has been dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Constructor for sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Unbounded pair; a run emits a handful of events per image
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (EventSender::new(sender), EventReceiver { inner: receiver })
    }
}

/// Sender whose receiver is already gone, for headless runs and tests
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PipelineEvent, ProcessEvent, ProcessProgress};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn progress_crosses_threads() {
        let (sender, receiver) = EventChannel::new();

        thread::spawn(move || {
            sender.send(Event::Process(ProcessEvent::Progress(ProcessProgress {
                completed: 3,
                total: 12,
                current_path: PathBuf::from("/shots/standup.png"),
            })));
        })
        .join()
        .unwrap();

        match receiver.recv() {
            Some(Event::Process(ProcessEvent::Progress(p))) => {
                assert_eq!((p.completed, p.total), (3, 12));
            }
            other => panic!("unexpected event {:?}", other),
        }
        // Sender dropped with the thread
        assert!(receiver.recv().is_none());
    }

    #[test]
    fn null_sender_swallows_events() {
        null_sender().send(Event::Pipeline(PipelineEvent::Started));
    }

    #[test]
    fn try_recv_is_empty_until_sent() {
        let (sender, receiver) = EventChannel::new();
        assert!(receiver.try_recv().is_none());

        sender.send(Event::Pipeline(PipelineEvent::Started));
        assert!(matches!(
            receiver.try_recv(),
            Some(Event::Pipeline(PipelineEvent::Started))
        ));
    }
}
