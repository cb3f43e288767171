use crate::types::Message;
use serde::Serialize;

/// Ordered, append-only sequence of messages shared by every agent in a
/// conversation. Nothing already appended can be changed or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript holding only the user's opening message
    pub fn with_opening(user_input: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(user_input)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl Extend<Message> for Transcript {
    fn extend<I: IntoIterator<Item = Message>>(&mut self, iter: I) {
        self.messages.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    #[test]
    fn test_opening_message() {
        let transcript = Transcript::with_opening("hello");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role(), MessageRole::User);
        assert_eq!(transcript.last().map(Message::content), Some("hello"));
    }

    #[test]
    fn test_append_keeps_prefix() {
        let mut transcript = Transcript::with_opening("q");
        let before = transcript.messages().to_vec();

        transcript.push(Message::assistant("a").attributed_to("ada"));
        transcript.extend([Message::tool_result("c1", "1"), Message::assistant("b")]);

        assert_eq!(transcript.len(), 4);
        assert_eq!(&transcript.messages()[..before.len()], before.as_slice());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let json = serde_json::to_value(Transcript::with_opening("hi")).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "user");
    }
}
