pub mod field;
pub mod home;

use ratatui::prelude::*;
use ratatui::widgets::*;

use rustgalaga::scores::NAME_LEN;
use rustgalaga::sim::hooks::Outcome;
use rustgalaga::sim::powerup::PowerUp;
use rustgalaga::sim::Session;

use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    match app.screen {
        Screen::Start => home::render_start(frame, area, app.selected, app.error.as_deref()),
        Screen::HighScores => home::render_high_scores(frame, area, &app.high_scores),
        Screen::Playing => render_game(frame, area, app),
        Screen::NameEntry => {
            home::render_start(frame, area, app.selected, None);
            // Name entry overlay (renders on top of everything)
            render_name_entry(frame, area, &app.name_buffer, app.name_score, app.name_level);
        }
    }
}

fn render_game(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session.as_ref() else { return };
    let accent = app.canvas.palette().player;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" Galaga ({}) ", session.game_type()))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(session)), chunks[0]);

    let fw = chunks[1].width as usize;
    let fh = chunks[1].height as usize;
    if fw > 0 && fh > 0 {
        let lines = app.canvas.render_field(fw, fh);
        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    if let Some((outcome, score)) = app.outcome {
        let (text, color) = match outcome {
            Outcome::Win => (" YOU WIN! ", Color::Rgb(255, 220, 80)),
            Outcome::Loss => (" GAME OVER! ", Color::Red),
        };
        let msg = Paragraph::new(Line::from(vec![
            Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!("Final score {score}. "), Style::default().fg(Color::Yellow)),
            Span::styled("Press ENTER to continue", Style::default().fg(Color::Gray)),
        ]));
        frame.render_widget(msg, chunks[2]);
    } else if app.paused {
        let msg = Paragraph::new(Line::from(vec![
            Span::styled(" PAUSED - Press P to resume ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        ]));
        frame.render_widget(msg, chunks[2]);
    } else {
        let help = Paragraph::new(Line::from(vec![
            Span::styled(" \u{2190}\u{2192} Move ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Space Shoot ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
        ]));
        frame.render_widget(help, chunks[2]);
    }

    if let Some(banner) = app.banner.as_ref() {
        render_banner(frame, chunks[1], &banner.text);
    }
}

fn status_line(session: &Session) -> Line<'static> {
    let lives_str = "\u{2666} ".repeat(session.lives().min(10) as usize);
    let mut spans = vec![
        Span::styled(
            format!(" Score: {} ", session.score()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Lives: {}", lives_str),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Level: {} ", session.level()),
            Style::default().fg(Color::Green),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Enemies: {} ", session.formation().len()),
            Style::default().fg(Color::Rgb(255, 80, 80)),
        ),
    ];
    for effect in session.effects().iter() {
        let secs = effect.expires_at_ms.saturating_sub(session.now_ms()).div_ceil(1000);
        let color = match effect.kind {
            PowerUp::SpeedBoost => Color::Rgb(80, 200, 255),
            PowerUp::Shield => Color::Rgb(120, 255, 120),
            PowerUp::TripleBulletCap => Color::Rgb(255, 160, 60),
            PowerUp::ExtraLife => Color::White,
        };
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("{} {}s", effect.kind.label(), secs),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn render_banner(frame: &mut Frame, area: Rect, text: &str) {
    let w = (text.len() as u16 + 6).min(area.width);
    let h = 3u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    let banner_area = Rect::new(x, y, w, h);
    frame.render_widget(Clear, banner_area);
    let p = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Rgb(255, 220, 80))),
    );
    frame.render_widget(p, banner_area);
}

fn render_name_entry(frame: &mut Frame, area: Rect, name_buffer: &str, score: u32, level: u32) {
    let overlay_w = 44u16.min(area.width.saturating_sub(4));
    let overlay_h = 13u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    // Clear background
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(" 🏆 NEW HIGH SCORE! ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    // Typed chars + underscores for the rest
    let typed_len = name_buffer.chars().count();
    let remaining = NAME_LEN.saturating_sub(typed_len);
    let display_name = format!("{}{}", name_buffer, "_".repeat(remaining));

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  Score: {}", score), Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled(format!("  Level: {}", level), Style::default().fg(Color::Rgb(80, 200, 255))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter your name:", Style::default().fg(Color::Rgb(180, 180, 200))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("    [ ", Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled(display_name, Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" ]", Style::default().fg(Color::Rgb(100, 100, 130))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" confirm  ", Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled("Esc", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" skip", Style::default().fg(Color::Rgb(100, 100, 130))),
        ]),
    ];

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
