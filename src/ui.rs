use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::{App, InputMode, LoginField, Screen, WelcomeChoice};
use crate::history::Sender;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Welcome => render_welcome_screen(app, frame, body_area),
        Screen::Login => render_login_screen(app, frame, body_area),
        Screen::Chat => render_chat_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let session_indicator = if app.user_name.is_empty() {
        String::new()
    } else {
        format!(" Hello, {}!", app.user_name)
    };

    let title = Line::from(vec![
        Span::styled(" Campus Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(session_indicator, Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match (app.screen, app.input_mode) {
        (Screen::Chat, InputMode::Editing) => Style::default().bg(Color::Yellow).fg(Color::Black),
        _ => Style::default().bg(Color::Blue).fg(Color::White),
    };

    let mode_text = match app.screen {
        Screen::Welcome => " WELCOME ",
        Screen::Login => " LOGIN ",
        Screen::Chat => " CHAT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match (app.screen, app.input_mode) {
        (Screen::Welcome, _) => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" choose ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" confirm ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Login, _) => vec![
            Span::styled(" Tab ", key_style),
            Span::styled(" field ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" sign in ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" back ", label_style),
        ],
        (Screen::Chat, InputMode::Normal) => vec![
            Span::styled(" i ", key_style),
            Span::styled(" type ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" logout ", label_style),
            Span::styled(" Ctrl+C ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Chat, InputMode::Editing) => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" done ", label_style),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    let footer = Paragraph::new(Line::from(spans));
    frame.render_widget(footer, area);
}

fn render_welcome_screen(app: &App, frame: &mut Frame, area: Rect) {
    let card = centered_rect(area, 44, 9);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Campus Assistant ");

    let choice_line = |label: &str, selected: bool| {
        let line = if selected {
            Line::from(Span::styled(
                format!("> {label}"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(format!("  {label}"), Style::default().fg(Color::White)))
        };
        line.centered()
    };

    let lines = vec![
        Line::default(),
        Line::from("Welcome! Choose how you want to continue.").centered(),
        Line::default(),
        choice_line("Sign in", app.welcome_choice == WelcomeChoice::Login),
        Line::default(),
        choice_line("Continue as guest", app.welcome_choice == WelcomeChoice::Guest),
    ];

    let welcome = Paragraph::new(Text::from(lines)).block(block);
    frame.render_widget(welcome, card);
}

fn render_login_screen(app: &App, frame: &mut Frame, area: Rect) {
    let card = centered_rect(area, 44, 10);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Sign in ");
    let inner = outer.inner(card);
    frame.render_widget(outer, card);

    let [email_area, password_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(inner);

    let field_border = |field: LoginField| {
        if app.login_field == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let email = Paragraph::new(app.email.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_border(LoginField::Email))
            .title(" Email "),
    );
    frame.render_widget(email, email_area);

    // Never echo the password itself
    let masked = "*".repeat(app.password.chars().count());
    let password = Paragraph::new(masked.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_border(LoginField::Password))
            .title(" Password "),
    );
    frame.render_widget(password, password_area);

    // Cursor at the end of the focused field
    let (field_area, width) = match app.login_field {
        LoginField::Email => (email_area, app.email.chars().count() as u16),
        LoginField::Password => (password_area, masked.chars().count() as u16),
    };
    frame.set_cursor_position((field_area.x + 1 + width, field_area.y + 1));
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [transcript_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store transcript dimensions for scroll calculations (inner size minus borders)
    app.chat_height = transcript_area.height.saturating_sub(2);
    app.chat_width = transcript_area.width.saturating_sub(2);

    let transcript_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");

    let mut lines: Vec<Line> = Vec::new();

    for msg in app.history.messages() {
        match msg.sender {
            Sender::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
            Sender::Bot => {
                lines.push(Line::from(Span::styled(
                    "Assistant:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
            }
        }
        for line in msg.text.lines() {
            lines.push(Line::from(line));
        }
        lines.push(Line::default());
    }

    if app.is_loading {
        lines.push(Line::from(Span::styled(
            "Assistant:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let transcript = Paragraph::new(Text::from(lines))
        .block(transcript_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(transcript, transcript_area);

    let input_border = if app.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(input_border)
            .title(" Your question "),
    );
    frame.render_widget(input, input_area);

    if app.input_mode == InputMode::Editing {
        frame.set_cursor_position((
            input_area.x + 1 + app.input_cursor as u16,
            input_area.y + 1,
        ));
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [horizontal] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [centered] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(horizontal);
    centered
}
