use crate::api::ChatClient;
use crate::config::Config;
use crate::history::{History, Sender};

/// Name shown for sessions entered without credentials.
pub const GUEST_NAME: &str = "Guest";

/// Fixed reply rendered in place of the bot answer when the backend call
/// fails for any reason. The raw error only goes to the diagnostic log.
pub const CONNECTION_ERROR_REPLY: &str = "Error: could not reach the assistant server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Login,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeChoice {
    Login,
    Guest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,

    // Welcome state
    pub welcome_choice: WelcomeChoice,

    // Login state
    pub email: String,
    pub password: String,
    pub login_field: LoginField,

    // Chat state
    pub user_name: String,
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars
    pub is_loading: bool,
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of transcript area for scroll calculations
    pub chat_width: u16,  // Width of transcript area for wrap calculations
    pub reply_task: Option<tokio::task::JoinHandle<anyhow::Result<String>>>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Conversation store
    pub history: History,

    // Backend client
    pub client: ChatClient,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Welcome,
            input_mode: InputMode::Normal,

            welcome_choice: WelcomeChoice::Login,

            email: String::new(),
            password: String::new(),
            login_field: LoginField::Email,

            user_name: String::new(),
            input: String::new(),
            input_cursor: 0,
            is_loading: false,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            reply_task: None,

            animation_frame: 0,

            history: History::new(),

            client: ChatClient::new(config.server_url()),
        }
    }

    // Screen transitions

    pub fn start_login(&mut self) {
        self.screen = Screen::Login;
        self.login_field = LoginField::Email;
    }

    pub fn enter_as_guest(&mut self) {
        self.user_name = GUEST_NAME.to_string();
        self.screen = Screen::Chat;
        self.input_mode = InputMode::Editing;
    }

    /// Back out of the login form, discarding anything typed so far.
    pub fn back_to_welcome(&mut self) {
        self.email.clear();
        self.password.clear();
        self.login_field = LoginField::Email;
        self.screen = Screen::Welcome;
    }

    /// Submit the login form. With either field empty nothing happens and the
    /// form stays up. The display name is the local part of the email (the
    /// whole identifier when there is no `@`); credentials are not verified
    /// anywhere, only captured.
    pub fn submit_login(&mut self) {
        if self.email.is_empty() || self.password.is_empty() {
            return;
        }

        let user_name = self
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string();

        self.user_name = user_name;
        self.email.clear();
        self.password.clear();
        self.login_field = LoginField::Email;
        self.screen = Screen::Chat;
        self.input_mode = InputMode::Editing;
    }

    /// End the session: wipe the conversation back to its seed, drop the user
    /// name and any pending input, and return to the welcome screen. A live
    /// request is aborted so a late reply cannot land in the fresh history.
    pub fn logout(&mut self) {
        if let Some(task) = self.reply_task.take() {
            task.abort();
        }
        self.is_loading = false;
        self.history.reset();
        self.user_name.clear();
        self.input.clear();
        self.input_cursor = 0;
        self.chat_scroll = 0;
        self.input_mode = InputMode::Normal;
        self.screen = Screen::Welcome;
    }

    // Send cycle

    /// First half of a chat turn: validate, record the user message, and hand
    /// the outgoing text to the caller, who owns the request task. Returns
    /// None (and changes nothing) when the trimmed input is empty, no user is
    /// set, or a request is already in flight.
    pub fn submit_message(&mut self) -> Option<String> {
        let outgoing = self.input.trim().to_string();
        if outgoing.is_empty() || self.user_name.is_empty() {
            return None;
        }
        if self.is_loading || self.reply_task.is_some() {
            return None;
        }

        self.history.append(outgoing.clone(), Sender::User);
        self.input.clear();
        self.input_cursor = 0;
        self.is_loading = true;
        self.scroll_chat_to_bottom();

        Some(outgoing)
    }

    /// Second half of a chat turn: fold the request outcome into the
    /// conversation. Failures are absorbed into a fixed bot-visible error
    /// line; loading is cleared on every path.
    pub fn finish_reply(&mut self, result: anyhow::Result<String>) {
        match result {
            Ok(reply) => self.history.append(reply, Sender::Bot),
            Err(err) => {
                tracing::error!("chat request failed: {err:#}");
                self.history.append(CONNECTION_ERROR_REPLY, Sender::Bot);
            }
        }
        self.is_loading = false;
        self.scroll_chat_to_bottom();
    }

    /// Reap the request task once it has finished and fold its outcome into
    /// the conversation. Called from the tick arm of the event loop.
    pub async fn poll_reply(&mut self) {
        let finished = self
            .reply_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.reply_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(err) => Err(anyhow::anyhow!(err)),
            };
            self.finish_reply(result);
        }
    }

    // Transcript scrolling

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max_scroll = self.transcript_lines().saturating_sub(self.chat_height);
        if self.chat_scroll < max_scroll {
            self.chat_scroll += 1;
        }
    }

    /// Scroll so the newest message (and the typing indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.transcript_lines();

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines - visible_height;
        } else {
            self.chat_scroll = 0;
        }
    }

    /// Rendered line count of the transcript at the current wrap width.
    fn transcript_lines(&self) -> u16 {
        // Use actual transcript width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.history.messages() {
            total_lines += 1; // Sender line ("You:" or "Assistant:")
            for line in msg.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1; // Empty line still takes one line
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.is_loading {
            total_lines += 2; // "Assistant:" + "Typing..."
        }

        total_lines
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::GREETING;
    use anyhow::anyhow;

    fn app() -> App {
        App::new(&Config::new())
    }

    fn chat_app(user: &str) -> App {
        let mut app = app();
        app.user_name = user.to_string();
        app.screen = Screen::Chat;
        app
    }

    #[test]
    fn login_with_an_empty_field_stays_on_the_form() {
        let mut app = app();
        app.start_login();

        app.email = "student@uern.br".to_string();
        app.submit_login();
        assert_eq!(app.screen, Screen::Login);

        app.email.clear();
        app.password = "x".to_string();
        app.submit_login();
        assert_eq!(app.screen, Screen::Login);
        assert!(app.user_name.is_empty());
    }

    #[test]
    fn login_derives_the_name_from_the_email_local_part() {
        let mut app = app();
        app.start_login();
        app.email = "student@uern.br".to_string();
        app.password = "x".to_string();
        app.submit_login();

        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.user_name, "student");
        assert!(app.email.is_empty());
        assert!(app.password.is_empty());
    }

    #[test]
    fn login_without_an_at_sign_uses_the_whole_identifier() {
        let mut app = app();
        app.start_login();
        app.email = "student".to_string();
        app.password = "x".to_string();
        app.submit_login();

        assert_eq!(app.user_name, "student");
    }

    #[test]
    fn guest_entry_uses_the_fixed_guest_name() {
        let mut app = app();
        app.enter_as_guest();

        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.user_name, GUEST_NAME);
    }

    #[test]
    fn backing_out_of_login_discards_credentials() {
        let mut app = app();
        app.start_login();
        app.email = "half-typed".to_string();
        app.password = "secret".to_string();
        app.back_to_welcome();

        assert_eq!(app.screen, Screen::Welcome);
        assert!(app.email.is_empty());
        assert!(app.password.is_empty());
    }

    #[test]
    fn blank_input_send_is_a_no_op() {
        let mut app = chat_app("student");
        app.input = "   \t ".to_string();

        assert!(app.submit_message().is_none());
        assert_eq!(app.history.messages().len(), 1);
        assert!(!app.is_loading);
    }

    #[test]
    fn send_without_a_user_is_a_no_op() {
        let mut app = chat_app("");
        app.input = "hello".to_string();

        assert!(app.submit_message().is_none());
        assert_eq!(app.history.messages().len(), 1);
    }

    #[test]
    fn send_while_loading_is_a_no_op() {
        let mut app = chat_app("student");
        app.input = "first".to_string();
        assert_eq!(app.submit_message().as_deref(), Some("first"));

        app.input = "second".to_string();
        assert!(app.submit_message().is_none());
        assert_eq!(app.history.messages().len(), 2); // seed + first only
        assert_eq!(app.input, "second"); // rejected input stays put
    }

    #[test]
    fn submit_trims_and_records_the_user_message() {
        let mut app = chat_app("student");
        app.input = "  when does the semester start?  ".to_string();

        let outgoing = app.submit_message().unwrap();
        assert_eq!(outgoing, "when does the semester start?");
        assert!(app.input.is_empty());
        assert!(app.is_loading);

        let last = app.history.messages().last().unwrap();
        assert_eq!(last.text, "when does the semester start?");
        assert_eq!(last.sender, Sender::User);
    }

    #[test]
    fn successful_reply_appends_user_then_bot() {
        let mut app = chat_app("student");
        app.input = "question".to_string();
        app.submit_message().unwrap();
        app.finish_reply(Ok("42".to_string()));

        let messages = app.history.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[2].sender, Sender::Bot);
        assert_eq!(messages[2].text, "42");
        assert!(!app.is_loading);
    }

    #[test]
    fn failed_reply_appends_the_fixed_error_line() {
        let mut app = chat_app("student");
        app.input = "question".to_string();
        app.submit_message().unwrap();
        app.finish_reply(Err(anyhow!("connection refused")));

        let messages = app.history.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].sender, Sender::Bot);
        assert_eq!(messages[2].text, CONNECTION_ERROR_REPLY);
        assert!(!app.is_loading);
    }

    #[test]
    fn logout_resets_the_session() {
        let mut app = chat_app("student");
        app.input = "draft".to_string();
        app.history.append("hello", Sender::User);
        app.history.append("hi", Sender::Bot);

        app.logout();

        assert_eq!(app.screen, Screen::Welcome);
        assert!(app.user_name.is_empty());
        assert!(app.input.is_empty());
        assert_eq!(app.history.messages().len(), 1);
        assert_eq!(app.history.messages()[0].text, GREETING);
    }
}
