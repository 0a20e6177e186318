use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::highlight::{compute_highlights, HighlightRange, HighlightTag};
use crate::score::Score;
use crate::session::{Phase, TypingSession};

const HORIZONTAL_MARGIN: u16 = 5;

/// Drill view: the active line with highlight styling, the lookahead line,
/// and the typed-buffer echo. Reads the session; never mutates it.
pub struct TypingScreen<'a> {
    pub session: &'a TypingSession,
}

impl Widget for &TypingScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session;

        let dim_bold_style = Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(area.height.saturating_sub(4) / 2),
                    Constraint::Length(1), // active line
                    Constraint::Length(1), // lookahead line
                    Constraint::Length(1),
                    Constraint::Length(1), // typed echo
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        if session.phase() == Phase::Idle {
            let hint = Paragraph::new(Span::styled(
                "start typing to begin · space finalizes a word · esc quits",
                italic_style,
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            hint.render(chunks[3], buf);
        }

        if let Some(line) = session.exercise().line(session.curr_line()) {
            let rendered = line.render();
            let ranges = compute_highlights(
                line,
                &session.line_correctness(),
                session.curr_word(),
                session.active_mismatch(),
            );
            let alignment = if rendered.width() <= chunks[1].width as usize {
                Alignment::Center
            } else {
                Alignment::Left
            };
            Paragraph::new(TextLine::from(styled_spans(&rendered, &ranges)))
                .alignment(alignment)
                .render(chunks[1], buf);
        }

        if let Some(next) = session.exercise().line(session.curr_line() + 1) {
            Paragraph::new(Span::styled(next.render(), dim_bold_style))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
        }

        if session.phase() == Phase::Active {
            let echo_style = if session.active_mismatch() {
                Style::default().fg(Color::Red).patch(italic_style)
            } else {
                italic_style
            };
            Paragraph::new(Span::styled(format!("> {}", session.typed()), echo_style))
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        }
    }
}

/// Post-drill summary.
pub struct ResultsScreen {
    pub score: Score,
    pub words: usize,
    pub elapsed: Duration,
}

impl Widget for &ResultsScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let magenta_style = Style::default().fg(Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(area.height.saturating_sub(3) / 2),
                    Constraint::Length(2),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        let summary = format!(
            "{:.0} wpm · {:.0}% acc · {} words in {:.1}s",
            self.score.wpm,
            self.score.accuracy * 100.0,
            self.words,
            self.elapsed.as_secs_f64(),
        );
        Paragraph::new(Span::styled(summary, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled("(r)etry / (n)ew / (esc)ape", magenta_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }
}

// Maps highlight ranges onto the rendered line, grouping runs of characters
// that share a style.
fn styled_spans(rendered: &str, ranges: &[HighlightRange]) -> Vec<Span<'static>> {
    let style_at = |idx: usize| {
        let covered = |tag: HighlightTag| {
            ranges
                .iter()
                .any(|r| r.tag == tag && r.start <= idx && idx < r.end)
        };
        match (covered(HighlightTag::Active), covered(HighlightTag::Mistyped)) {
            (true, true) => Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            (true, false) => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            (false, true) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            (false, false) => Style::default().add_modifier(Modifier::BOLD | Modifier::DIM),
        }
    };

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = None;
    for (idx, ch) in rendered.chars().enumerate() {
        let style = style_at(idx);
        match run_style {
            Some(prev) if prev == style => run.push(ch),
            Some(prev) => {
                spans.push(Span::styled(std::mem::take(&mut run), prev));
                run.push(ch);
                run_style = Some(style);
            }
            None => {
                run.push(ch);
                run_style = Some(style);
            }
        }
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }
    spans
}
