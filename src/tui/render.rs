//! TUI Rendering
//!
//! One centered kiosk card: header, step indicators, the active step's
//! panel, and the button row. A submission in flight draws a blocking
//! overlay on top.

use super::app::App;
use super::theme::Theme;
use crate::capture::{CaptureMode, SourcePanel};
use crate::flow::{CaptureFlow, STEP_NAME, STEP_PHOTO, STEP_RESULT};
use crate::locale;
use crate::slip::{PrescriptionSlip, SlipLineKind};
use crate::utils::truncate_to_width;
use crate::wizard::{StepStatus, Wizard};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 36;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const STEP_LABELS: [&str; 3] = ["이름", "사진", "처방전"];

/// Render the entire UI
pub fn render(f: &mut Frame, app: &App) {
    let area = centered_rect(CARD_WIDTH, CARD_HEIGHT, f.area());
    let inner_width = area.width.saturating_sub(4) as usize;
    let theme = &app.theme;
    let step = app.current_step();

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(locale::APP_TITLE, theme.title())));
    lines.push(Line::from(Span::styled(locale::APP_TAGLINE, theme.dim())));
    lines.push(Line::from(""));
    lines.push(step_indicator_line(&app.wizard, theme));
    lines.push(Line::from(""));

    match step {
        STEP_NAME => render_name(&mut lines, &app.flow, theme),
        STEP_PHOTO => render_photo(&mut lines, app, theme, inner_width),
        STEP_RESULT => render_result(&mut lines, &app.flow, theme, inner_width),
        _ => {}
    }

    if step == STEP_PHOTO {
        if let Some(err) = app.flow.last_error() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("! {}", err),
                Style::default().fg(theme.error),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(button_line(&app.flow, step, theme));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border())
                .title(Span::styled(
                    format!(
                        " {} ({}/{}) ",
                        locale::APP_TITLE,
                        step.min(app.wizard.total_steps()),
                        app.wizard.total_steps()
                    ),
                    theme.border().add_modifier(Modifier::BOLD),
                )),
        )
        .alignment(Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);

    if app.flow.is_submitting() {
        render_overlay(f, area, theme, app.animation_frame);
    }
}

/// `✓ 이름 ─── ● 사진 ─── ○ 처방전`
pub fn step_indicator_line(wizard: &Wizard, theme: &Theme) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (idx, label) in STEP_LABELS.iter().enumerate() {
        let step = idx + 1;
        let (marker, style) = match wizard.indicator(step) {
            StepStatus::Complete => ("✓", Style::default().fg(theme.done)),
            StepStatus::Active => (
                "●",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            StepStatus::Upcoming => ("○", theme.dim()),
        };
        spans.push(Span::styled(format!("{} {}", marker, label), style));

        if step < STEP_LABELS.len() {
            let connector = if wizard.connector_complete(step) {
                Style::default().fg(theme.done)
            } else {
                theme.dim()
            };
            spans.push(Span::styled(" ─── ", connector));
        }
    }
    Line::from(spans)
}

fn step_heading(lines: &mut Vec<Line<'static>>, title: &'static str, subtitle: &'static str, theme: &Theme) {
    lines.push(Line::from(Span::styled(title, theme.title())));
    lines.push(Line::from(Span::styled(subtitle, theme.dim())));
    lines.push(Line::from(""));
}

fn render_name(lines: &mut Vec<Line<'static>>, flow: &CaptureFlow, theme: &Theme) {
    step_heading(lines, locale::NAME_TITLE, locale::NAME_SUBTITLE, theme);

    let field = if flow.name().is_empty() {
        Span::styled(locale::NAME_PLACEHOLDER, theme.dim())
    } else {
        Span::styled(flow.name().to_string(), theme.body())
    };
    lines.push(Line::from(vec![
        Span::styled("[ ", theme.border()),
        field,
        Span::styled("▏", Style::default().fg(theme.accent)),
        Span::styled(" ]", theme.border()),
    ]));
}

fn render_photo(lines: &mut Vec<Line<'static>>, app: &App, theme: &Theme, width: usize) {
    let flow = &app.flow;
    step_heading(lines, locale::PHOTO_TITLE, locale::PHOTO_SUBTITLE, theme);
    lines.push(mode_tabs_line(flow.mode(), theme));
    lines.push(Line::from(""));

    match flow.capture().panel() {
        SourcePanel::Upload { path_input } => {
            lines.push(Line::from(Span::styled(locale::UPLOAD_HINT, theme.dim())));
            let shown = tail_to_width(path_input, width.saturating_sub(6));
            lines.push(Line::from(vec![
                Span::styled("> ", theme.border()),
                Span::styled(shown, theme.body()),
                Span::styled("▏", Style::default().fg(theme.accent)),
            ]));
        }
        SourcePanel::Camera { session } => match session {
            Some(session) => {
                lines.push(Line::from(Span::styled(
                    format!("◉ {}", truncate_to_width(session.label(), width.saturating_sub(2))),
                    Style::default().fg(theme.done),
                )));
                if app.is_capturing() {
                    lines.push(Line::from(Span::styled(
                        locale::CAMERA_CAPTURING,
                        Style::default().fg(theme.highlight),
                    )));
                } else {
                    lines.push(Line::from(Span::styled(locale::CAMERA_HINT, theme.dim())));
                }
            }
            None => {
                lines.push(Line::from(Span::styled(
                    locale::CAMERA_UNAVAILABLE,
                    Style::default().fg(theme.error),
                )));
            }
        },
    }

    lines.push(Line::from(""));
    match flow.preview() {
        Some(preview) => {
            lines.push(Line::from(Span::styled(
                format!("▣ {}", truncate_to_width(&preview.summary(), width.saturating_sub(2))),
                theme.body().add_modifier(Modifier::BOLD),
            )));
            let retake_key = match flow.mode() {
                CaptureMode::Upload => "Del",
                CaptureMode::Camera => "r",
            };
            lines.push(Line::from(Span::styled(
                format!("[{}] {}", retake_key, locale::RETAKE),
                theme.dim(),
            )));
        }
        None => lines.push(Line::from(Span::styled("▢", theme.dim()))),
    }
}

fn mode_tabs_line(mode: CaptureMode, theme: &Theme) -> Line<'static> {
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                format!(" {} ", label),
                Style::default()
                    .fg(theme.slip_bg)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {} ", label), theme.dim())
        }
    };
    Line::from(vec![
        tab(locale::MODE_UPLOAD, mode == CaptureMode::Upload),
        Span::styled("  [Tab]  ", theme.dim()),
        tab(locale::MODE_CAMERA, mode == CaptureMode::Camera),
    ])
}

fn render_result(lines: &mut Vec<Line<'static>>, flow: &CaptureFlow, theme: &Theme, width: usize) {
    lines.push(Line::from(Span::styled(locale::RESULT_TITLE, theme.title())));
    lines.push(Line::from(""));

    let Some(result) = flow.result() else {
        lines.push(Line::from(Span::styled(locale::RESULT_EMPTY, theme.dim())));
        return;
    };

    lines.push(Line::from(Span::styled(locale::TODAYS_PICK, theme.dim())));
    let slip = PrescriptionSlip::issued_today(flow.name(), result);
    let slip_width = width.saturating_sub(4).max(8);
    let paper = theme.slip();
    for line in slip.lines(slip_width) {
        let style = match line.kind {
            SlipLineKind::Clinic | SlipLineKind::Title => paper.add_modifier(Modifier::BOLD),
            SlipLineKind::Label => paper.add_modifier(Modifier::UNDERLINED),
            SlipLineKind::Rule | SlipLineKind::Meta => paper.add_modifier(Modifier::DIM),
            SlipLineKind::Footer => paper.add_modifier(Modifier::ITALIC),
            SlipLineKind::Body | SlipLineKind::Blank => paper,
        };
        lines.push(Line::from(Span::styled(pad_to_width(&line.text, slip_width), style)));
    }
}

fn button_line(flow: &CaptureFlow, step: usize, theme: &Theme) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    if flow.back_enabled(step) {
        spans.push(Span::styled(
            "[Esc] ",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!("{}   ", locale::BUTTON_BACK), theme.body()));
    }

    let enabled = flow.next_enabled(step);
    let key_style = if enabled {
        Style::default()
            .fg(theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        theme.dim()
    };
    spans.push(Span::styled("[Enter] ", key_style));
    spans.push(Span::styled(
        flow.next_button_label(step),
        if enabled { theme.body() } else { theme.dim() },
    ));
    Line::from(spans)
}

fn render_overlay(f: &mut Frame, card: Rect, theme: &Theme, frame: usize) {
    let area = centered_rect(card.width.saturating_sub(8), 5, card);
    let spinner = SPINNER[frame % SPINNER.len()];
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::default().fg(theme.accent)),
            Span::styled(locale::ANALYZING, theme.title()),
        ]),
    ];
    let overlay = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border()),
        )
        .alignment(Alignment::Center);
    f.render_widget(Clear, area);
    f.render_widget(overlay, area);
}

/// `width` x `height` rect centered in `area`, shrunk to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(v_chunks[1])[1]
}

/// Rightmost part of `s` that fits, so the end of a long path stays visible
fn tail_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;
    let mut width = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = idx;
    }
    s[start..].to_string()
}

fn pad_to_width(s: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthStr;
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analysis, AnalysisError, AnalysisResult, Analyzer, Recommendation};
    use crate::camera::{Camera, CameraFactory};
    use crate::error::MoodRxError;
    use crate::media::ImageBlob;
    use crate::tui::events::EventHandler;
    use async_trait::async_trait;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use std::sync::Arc;

    struct Unused;

    #[async_trait]
    impl Analyzer for Unused {
        async fn analyze(
            &self,
            _image: &ImageBlob,
            _username: &str,
        ) -> Result<AnalysisResult, AnalysisError> {
            Err(AnalysisError::Decode("not used".to_string()))
        }
    }

    fn app() -> App {
        let events = EventHandler::new();
        let factory: CameraFactory = Arc::new(|| -> crate::error::Result<Box<dyn Camera>> {
            Err(MoodRxError::Camera("none".to_string()))
        });
        App::new(Arc::new(Unused), factory, Theme::CLINIC, "fallback", events.sender())
    }

    fn draw(app: &App) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_step_indicator_statuses() {
        let mut wizard = Wizard::new(3);
        wizard.advance();
        let text = line_text(&step_indicator_line(&wizard, &Theme::CLINIC));
        assert_eq!(text, "✓ 이름 ─── ● 사진 ─── ○ 처방전");
    }

    #[test]
    fn test_name_step_renders_typed_name() {
        let mut app = app();
        app.flow.set_name("Alice");
        let text = buffer_text(&draw(&app));
        assert!(text.contains("Alice"));
        assert!(text.contains("[Enter]"));
        assert!(!text.contains("[Esc]"));
    }

    #[test]
    fn test_photo_step_shows_preview_and_error() {
        let mut app = app();
        app.wizard.go_to_step(STEP_PHOTO);
        app.flow
            .select_upload(ImageBlob::new("face.jpg", "image/jpeg", vec![1, 2, 3]));
        app.flow.upload_failed("bad path");
        let text = buffer_text(&draw(&app));
        assert!(text.contains("face.jpg"));
        assert!(text.contains("bad path"));
        assert!(text.contains("[Esc]"));
    }

    #[tokio::test]
    async fn test_camera_panel_shows_running_capture() {
        use crate::camera::testing::StillCamera;
        use crate::tui::events::TuiEvent;
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let events = EventHandler::new();
        let factory: CameraFactory = Arc::new(|| -> crate::error::Result<Box<dyn Camera>> {
            Ok(Box::new(StillCamera::new(Some(vec![0xFF, 0xD8]))))
        });
        let mut app = App::new(Arc::new(Unused), factory, Theme::CLINIC, "fallback", events.sender());
        app.flow.set_name("kim");
        app.wizard.go_to_step(STEP_PHOTO);

        let press = |code| TuiEvent::Key(KeyEvent::new(code, KeyModifiers::empty()));
        app.handle_event(press(KeyCode::Tab)).await.unwrap();
        let text = buffer_text(&draw(&app));
        assert!(text.contains("still"));
        assert!(text.contains("Space"));

        // The frame is never delivered, so the capture stays pending
        app.handle_event(press(KeyCode::Char(' '))).await.unwrap();
        assert!(app.is_capturing());
        let text = buffer_text(&draw(&app));
        assert!(text.contains("still"));
        assert!(!text.contains("Space"));
    }

    #[test]
    fn test_result_step_renders_slip() {
        let mut app = app();
        app.flow.set_name("kim");
        app.flow
            .select_upload(ImageBlob::new("face.jpg", "image/jpeg", vec![1]));
        let ticket = app.flow.begin_submission().unwrap();
        app.flow.finish_submission(
            ticket.generation,
            Ok(AnalysisResult {
                analysis: Analysis {
                    detected_emotion: "joy".to_string(),
                    reason: "smile".to_string(),
                },
                recommendation: Recommendation {
                    title: "Sample Book".to_string(),
                    author: "Writer".to_string(),
                    genre: "Poem".to_string(),
                    content: "A quiet line".to_string(),
                },
            }),
        );
        app.wizard.go_to_step(STEP_RESULT);

        let text = buffer_text(&draw(&app));
        assert!(text.contains("Sample Book"));
        assert!(text.contains("joy"));
        assert!(text.contains("A quiet line"));
    }

    #[test]
    fn test_overlay_while_submitting() {
        let mut app = app();
        app.wizard.go_to_step(STEP_PHOTO);
        app.flow
            .select_upload(ImageBlob::new("face.jpg", "image/jpeg", vec![1]));
        app.flow.begin_submission().unwrap();
        let text = buffer_text(&draw(&app));
        assert!(text.contains(SPINNER[0]));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
    }

    #[test]
    fn test_tail_to_width() {
        assert_eq!(tail_to_width("/very/long/path.jpg", 8), "path.jpg");
        assert_eq!(tail_to_width("short", 10), "short");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("가", 4), "가  ");
    }
}
