use std::fmt;

/// Progress notifications emitted during a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationEvent {
    SizingStarted {
        monomers: usize,
    },
    SizingFinished {
        atoms: usize,
        residues: usize,
        chains: usize,
    },
    PlacementStarted,
    PlacementFinished,
    RefinementStarted {
        residues: usize,
    },
    RefinementFinished,
    /// The cached model was replaced by a freshly generated one.
    Refreshed,
}

type EventCallback<'a> = Box<dyn Fn(GenerationEvent) + Send + Sync + 'a>;

/// Optional observer for generation progress.
///
/// The default sink discards events; callers that drive a UI or log progress
/// install a callback with [`EventSink::with_callback`].
#[derive(Default)]
pub struct EventSink<'a> {
    callback: Option<EventCallback<'a>>,
}

impl<'a> EventSink<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: impl Fn(GenerationEvent) + Send + Sync + 'a) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    pub fn emit(&self, event: GenerationEvent) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }
}

impl fmt::Debug for EventSink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("installed", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn default_sink_discards_events() {
        let sink = EventSink::new();
        sink.emit(GenerationEvent::PlacementStarted);
    }

    #[test]
    fn callback_receives_events_in_order() {
        let received = Mutex::new(Vec::new());
        let sink = EventSink::with_callback(|event| received.lock().unwrap().push(event));

        sink.emit(GenerationEvent::SizingStarted { monomers: 3 });
        sink.emit(GenerationEvent::Refreshed);

        assert_eq!(
            *received.lock().unwrap(),
            vec![
                GenerationEvent::SizingStarted { monomers: 3 },
                GenerationEvent::Refreshed,
            ]
        );
    }
}
