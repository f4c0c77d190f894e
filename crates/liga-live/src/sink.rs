use tokio::sync::mpsc;

use crate::error::SinkError;
use crate::frame::Frame;

/// Write side of one subscriber stream, owned by the registry.
///
/// `send` must not block: it runs while the registry lock is held.
pub trait ClientSink: Send {
    fn send(&mut self, frame: Frame) -> Result<(), SinkError>;
}

/// The HTTP layer drains the receiving half into the response body. A full
/// queue means the client stopped reading, which counts as a failed write.
impl ClientSink for mpsc::Sender<Frame> {
    fn send(&mut self, frame: Frame) -> Result<(), SinkError> {
        self.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records encoded frames; can be switched into a failing state.
    #[derive(Clone, Default)]
    pub struct Recorder {
        frames: Arc<Mutex<Vec<String>>>,
        broken: Arc<AtomicBool>,
    }

    impl Recorder {
        pub fn frames(&self) -> Vec<String> {
            self.frames.lock().unwrap().clone()
        }

        pub fn last(&self) -> Option<String> {
            self.frames.lock().unwrap().last().cloned()
        }

        pub fn break_pipe(&self) {
            self.broken.store(true, Ordering::SeqCst);
        }

        pub fn boxed(&self) -> Box<dyn ClientSink> {
            Box::new(self.clone())
        }
    }

    impl ClientSink for Recorder {
        fn send(&mut self, frame: Frame) -> Result<(), SinkError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(SinkError::Closed);
            }
            self.frames.lock().unwrap().push(frame.encode());
            Ok(())
        }
    }
}
