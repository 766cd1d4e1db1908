use ratatui::prelude::*;
use ratatui::widgets::*;

use rustgalaga::scores::{HighScores, MAX_ENTRIES};

use crate::app::MENU;

const BANNER: &str = r#"
  ██████╗  █████╗ ██╗      █████╗  ██████╗  █████╗
 ██╔════╝ ██╔══██╗██║     ██╔══██╗██╔════╝ ██╔══██╗
 ██║  ███╗███████║██║     ███████║██║  ███╗███████║
 ██║   ██║██╔══██║██║     ██╔══██║██║   ██║██╔══██║
 ╚██████╔╝██║  ██║███████╗██║  ██║╚██████╔╝██║  ██║
  ╚═════╝ ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝ ╚═════╝ ╚═╝  ╚═╝"#;

const MENU_KEYS: [&str; 4] = ["1", "2", "H", "Q"];

pub fn render_start(frame: &mut Frame, area: Rect, selected: usize, error: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Banner
            Constraint::Length(2), // Subtitle
            Constraint::Length(8), // Menu
            Constraint::Min(6),    // Controls
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(vec![Span::styled(
        "  ✦ Three waves stand between you and the stars ✦  ",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )]))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let items: Vec<Line> = MENU
        .iter()
        .zip(MENU_KEYS.iter())
        .enumerate()
        .map(|(i, (label, key))| {
            let is_selected = i == selected;
            let marker = if is_selected { "▶ " } else { "  " };
            let name_color = if is_selected { Color::Rgb(255, 255, 255) } else { Color::Rgb(120, 120, 140) };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Rgb(255, 220, 80))),
                Span::styled(format!("[{}] ", key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
                Span::styled(*label, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    let menu = Paragraph::new(items).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ↑↓ Select, Enter to Play ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(menu, centered(chunks[2], 40));

    let controls = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("    ← / →            ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Move fighter", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    Space / ↑        ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Shoot", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Pause", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    Esc              ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Back to menu", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(" ⌨ Controls ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, centered(chunks[3], 40));

    let mut footer = vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
    ];
    if let Some(error) = error {
        footer.push(Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))));
        footer.push(Span::styled(error.to_string(), Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)).alignment(Alignment::Center), chunks[4]);
}

pub fn render_high_scores(frame: &mut Frame, area: Rect, high_scores: &HighScores) {
    let overlay_w = 50u16.min(area.width.saturating_sub(4));
    let overlay_h = (MAX_ENTRIES as u16 + 8).min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 High Scores ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let medal_colors = [
        Color::Rgb(255, 215, 0),   // Gold
        Color::Rgb(192, 192, 192), // Silver
        Color::Rgb(205, 127, 50),  // Bronze
    ];

    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "   #   Name        Score   Level",
            Style::default().fg(Color::Rgb(100, 100, 130)),
        )]),
    ];

    if high_scores.entries().is_empty() {
        lines.push(Line::from(vec![
            Span::styled("    No scores yet", Style::default().fg(Color::Rgb(60, 60, 80))),
        ]));
    }
    for (rank, entry) in high_scores.entries().iter().enumerate() {
        let score_color = medal_colors.get(rank).copied().unwrap_or(Color::Rgb(200, 200, 220));
        let name_display = if entry.name.is_empty() { "???" } else { entry.name.as_str() };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>2}.  ", rank + 1), Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled(format!("{:<9}  ", name_display), Style::default().fg(Color::Rgb(200, 200, 220))),
            Span::styled(format!("{:>7}", entry.score), Style::default().fg(score_color).add_modifier(Modifier::BOLD)),
            Span::styled(format!("   {:>3}", entry.level), Style::default().fg(Color::Rgb(80, 200, 255))),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("Enter", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" to return", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}

fn centered(area: Rect, width: u16) -> Rect {
    let w = width.min(area.width);
    Rect::new(area.x + (area.width - w) / 2, area.y, w, area.height)
}
