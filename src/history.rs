/// Opening greeting shown when a session starts and restored on every reset.
pub const GREETING: &str = "Hello! I'm the campus assistant. Ask me about the \
academic calendar, administration, or course offerings.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
}

/// Conversation history for the active session.
///
/// The sequence always begins with the seed greeting and is never empty:
/// `reset` restores the seed instead of leaving the list bare. Messages are
/// append-only and keep their insertion order; ids are monotonic and unique
/// within the session.
pub struct History {
    messages: Vec<Message>,
    next_id: u64,
}

impl History {
    pub fn new() -> Self {
        let mut history = Self {
            messages: Vec::new(),
            next_id: 0,
        };
        history.push(GREETING.to_string(), Sender::Bot);
        history
    }

    pub fn append(&mut self, text: impl Into<String>, sender: Sender) {
        self.push(text.into(), sender);
    }

    /// Discard everything and restore the one-element seed sequence.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.push(GREETING.to_string(), Sender::Bot);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn push(&mut self, text: String, sender: Sender) {
        self.messages.push(Message {
            id: self.next_id,
            text,
            sender,
        });
        self.next_id += 1;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_seed_greeting() {
        let history = History::new();
        assert_eq!(history.messages().len(), 1);
        assert_eq!(history.messages()[0].text, GREETING);
        assert_eq!(history.messages()[0].sender, Sender::Bot);
    }

    #[test]
    fn append_grows_by_one_and_preserves_order() {
        let mut history = History::new();
        history.append("first", Sender::User);
        assert_eq!(history.messages().len(), 2);
        history.append("second", Sender::Bot);
        assert_eq!(history.messages().len(), 3);

        let texts: Vec<&str> = history.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![GREETING, "first", "second"]);
    }

    #[test]
    fn ids_are_unique_within_a_session() {
        let mut history = History::new();
        history.append("a", Sender::User);
        history.reset();
        history.append("b", Sender::User);

        let mut ids: Vec<u64> = history.messages().iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), history.messages().len());
    }

    #[test]
    fn reset_restores_exactly_the_seed() {
        let mut history = History::new();
        history.append("hello", Sender::User);
        history.append("hi there", Sender::Bot);
        history.reset();

        assert_eq!(history.messages().len(), 1);
        assert_eq!(history.messages()[0].text, GREETING);
        assert_eq!(history.messages()[0].sender, Sender::Bot);
    }
}
