use std::fmt;
use std::sync::Arc;

/// One unit written to a subscriber stream.
///
/// Wire text (server-sent events):
///   comment: `:<text>\n\n`
///   event:   `event: <name>\ndata: <json>\n\n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Comment(&'static str),
    Event { name: Arc<str>, data: Arc<str> },
}

/// Sent once to every accepted subscriber, before anything else.
pub const PREAMBLE: Frame = Frame::Comment("ok");

/// Sent by the keepalive sweep.
pub const PING: Frame = Frame::Comment("ping");

impl Frame {
    pub fn event(name: &str, data: &str) -> Self {
        Frame::Event {
            name: Arc::from(name),
            data: Arc::from(data),
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Comment(text) => write!(f, ":{text}\n\n"),
            Frame::Event { name, data } => write!(f, "event: {name}\ndata: {data}\n\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_frames() {
        assert_eq!(PREAMBLE.encode(), ":ok\n\n");
        assert_eq!(PING.encode(), ":ping\n\n");
    }

    #[test]
    fn event_frame() {
        let f = Frame::event("general-update", r#"{"message":"x"}"#);
        assert_eq!(
            f.encode(),
            "event: general-update\ndata: {\"message\":\"x\"}\n\n"
        );
    }
}
