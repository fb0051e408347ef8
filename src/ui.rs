pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use typograph::{
    chrome::Theme,
    highlight::{self, CharState},
    session::{Phase, Session},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

struct Palette {
    base: Style,
    correct: Color,
    incorrect: Color,
    current: Color,
    untyped: Color,
    accent: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                base: Style::default().fg(Color::White).bg(Color::Black),
                correct: Color::Green,
                incorrect: Color::Red,
                current: Color::Yellow,
                untyped: Color::DarkGray,
                accent: Color::Magenta,
            },
            Theme::Light => Self {
                base: Style::default().fg(Color::Black).bg(Color::White),
                correct: Color::Rgb(0, 128, 0),
                incorrect: Color::Rgb(200, 0, 0),
                current: Color::Blue,
                untyped: Color::Gray,
                accent: Color::Rgb(128, 0, 128),
            },
        }
    }

    fn char_style(&self, state: CharState, emphasized: bool) -> Style {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let style = match state {
            CharState::Correct => bold.fg(self.correct),
            CharState::Incorrect => bold.fg(self.incorrect).add_modifier(Modifier::CROSSED_OUT),
            CharState::Current => bold.fg(self.current).add_modifier(Modifier::REVERSED),
            CharState::Untyped => Style::default().fg(self.untyped),
        };
        if emphasized {
            style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
        } else {
            style
        }
    }
}

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let prefs = self.chrome.preferences();
        let palette = Palette::for_theme(prefs.theme);
        buf.set_style(area, palette.base);

        let session = self.engine.session();
        match session.phase() {
            Phase::Idle | Phase::Running => {
                render_typing(session, prefs.shake_mode, &palette, area, buf)
            }
            Phase::Completed => render_results(session, &palette, area, buf),
        }
    }
}

fn stats_line(session: &Session) -> String {
    let stats = session.stats();
    format!(
        "{} wpm   {}% acc   {} err   {}s left",
        stats.wpm,
        stats.accuracy,
        stats.error_count,
        session.clock_remaining()
    )
}

fn render_typing(
    session: &Session,
    shake_mode: bool,
    palette: &Palette,
    area: Rect,
    buf: &mut Buffer,
) {
    let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let passage = &session.passage().text;
    let prompt_lines = if passage.width() <= text_width as usize {
        1
    } else {
        (passage.width() as f64 / text_width as f64).ceil() as u16 + 1
    };
    let padding = area.height.saturating_sub(prompt_lines + 5) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(2), // stats
            Constraint::Length(prompt_lines),
            Constraint::Length(1), // attribution
            Constraint::Min(0),
            Constraint::Length(2), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        stats_line(session),
        Style::default().add_modifier(Modifier::BOLD | Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let spans: Vec<Span> = highlight::runs(session, shake_mode)
        .into_iter()
        .map(|run| Span::styled(run.text, palette.char_style(run.state, run.emphasized)))
        .collect();

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    if let Some(source) = &session.passage().source {
        Paragraph::new(Span::styled(
            format!("- {source}"),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Right)
        .render(chunks[3], buf);
    }

    let hint = if session.phase() == Phase::Idle {
        "start typing to begin\n"
    } else {
        "\n"
    };
    let legend = format!(
        "{hint}(←) restart / (→) new / (ctrl+t) theme / (ctrl+s) shake{} / (esc)ape",
        if shake_mode { " on" } else { "" }
    );
    Paragraph::new(legend)
        .style(Style::default().fg(palette.untyped).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
}

fn render_results(session: &Session, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let points: Vec<(f64, f64)> = session.samples().iter().map(|&s| s.into()).collect();
    let (overall_duration, highest_wpm) = charting::compute_chart_params(&points);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(palette.accent))
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        )
        .render(chunks[0], buf);

    let stats = session.stats();
    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {} err   {:.2} sd",
            stats.wpm,
            stats.accuracy,
            stats.error_count,
            session.consistency()
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "(r)etry / (n)ew / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[3], buf);
}
