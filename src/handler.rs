use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, InputMode, LoginField, Screen, WelcomeChoice};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_reply().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global quit, works in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Welcome => handle_welcome_key(app, key),
        Screen::Login => handle_login_key(app, key),
        Screen::Chat => match app.input_mode {
            InputMode::Normal => handle_chat_normal(app, key),
            InputMode::Editing => handle_chat_editing(app, key),
        },
    }
}

fn handle_welcome_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('k') | KeyCode::Up | KeyCode::Tab => {
            app.welcome_choice = match app.welcome_choice {
                WelcomeChoice::Login => WelcomeChoice::Guest,
                WelcomeChoice::Guest => WelcomeChoice::Login,
            };
        }

        KeyCode::Enter => match app.welcome_choice {
            WelcomeChoice::Login => app.start_login(),
            WelcomeChoice::Guest => app.enter_as_guest(),
        },

        _ => {}
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.back_to_welcome(),

        KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
            app.login_field = match app.login_field {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
        }

        KeyCode::Enter => app.submit_login(),

        KeyCode::Backspace => {
            match app.login_field {
                LoginField::Email => app.email.pop(),
                LoginField::Password => app.password.pop(),
            };
        }

        KeyCode::Char(c) => match app.login_field {
            LoginField::Email => app.email.push(c),
            LoginField::Password => app.password.push(c),
        },

        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        // End the session and return to the welcome screen
        KeyCode::Char('q') => app.logout(),

        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,

        // Transcript scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') => app.chat_scroll = 0,
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,

        // Enter sends, same path as any other send trigger
        KeyCode::Enter => send_chat_message(app),

        KeyCode::Left => app.input_cursor = app.input_cursor.saturating_sub(1),
        KeyCode::Right => {
            app.input_cursor = (app.input_cursor + 1).min(app.input.chars().count());
        }

        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let idx = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(idx);
            }
        }

        KeyCode::Char(c) => {
            let idx = char_to_byte_index(&app.input, app.input_cursor);
            app.input.insert(idx, c);
            app.input_cursor += 1;
        }

        _ => {}
    }
}

/// Kick off one chat turn. The precondition check (non-blank input, user set,
/// nothing in flight) lives in `App::submit_message`; when it passes, the
/// request task is spawned and reaped later on a Tick.
fn send_chat_message(app: &mut App) {
    if let Some(outgoing) = app.submit_message() {
        let client = app.client.clone();
        let session_id = app.user_name.clone();
        app.reply_task = Some(tokio::spawn(async move {
            client.send(&session_id, &outgoing).await
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_to_byte_index_handles_multibyte_text() {
        let s = "olá mundo";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 2), 2);
        assert_eq!(char_to_byte_index(s, 3), 4); // 'á' is two bytes
        assert_eq!(char_to_byte_index(s, 100), s.len());
    }
}
