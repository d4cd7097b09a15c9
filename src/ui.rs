use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::lod::TraversalContext;
use crate::map::{draw_marker, GridRenderer};

/// Render the UI: tiling view plus status bar.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Tiling view
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let stats = render_tiling(frame, app, chunks[0]);
    render_status_bar(frame, app, &stats, chunks[1]);
}

/// Draw the basemap and the projection's tiling grid; returns the
/// traversal statistics for the status bar.
fn render_tiling(frame: &mut Frame, app: &App, area: Rect) -> TraversalContext {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", app.mode.label()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Size the view to the inner area; braille gives 2x4 pixels per cell.
    let mut view = app.view.clone();
    view.set_size(inner.width as usize * 2, inner.height as usize * 4);

    let mut base_layer = BrailleCanvas::new(inner.width as usize, inner.height as usize);
    if app.show_basemap {
        app.basemap.render(&mut base_layer, &view);
    }

    let mut grid_layer = BrailleCanvas::new(inner.width as usize, inner.height as usize);
    let stats = {
        let mut out = GridRenderer::new(&mut grid_layer, &view);
        app.mode.run(view.camera(), &mut out)
    };

    // Cross-hair on the sub-camera point (always the view center).
    draw_marker(
        &mut grid_layer,
        (view.width / 2) as i32,
        (view.height / 2) as i32,
        2,
    );

    frame.render_widget(
        TilingWidget {
            base: base_layer,
            grid: grid_layer,
        },
        inner,
    );

    stats
}

/// Renders the braille layers into the buffer, basemap beneath the grid.
struct TilingWidget {
    base: BrailleCanvas,
    grid: BrailleCanvas,
}

impl TilingWidget {
    /// Paint a braille layer with a specific color, skipping blank cells.
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for TilingWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_layer(&self.base, Color::DarkGray, area, buf);
        Self::render_layer(&self.grid, Color::Green, area, buf);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, stats: &TraversalContext, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let status = Line::from(vec![
        Span::styled(" Leaves: ", dim),
        Span::styled(stats.leaf_count.to_string(), Style::default().fg(Color::Magenta)),
        Span::styled(" Depth: ", dim),
        Span::styled(
            format!("{}/{}", stats.deepest_level, stats.max_level),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(" | ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" alt ", dim),
        Span::styled(app.altitude_label(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(") ", dim),
        Span::styled(
            if app.show_basemap { "[M]ap " } else { "[m]ap " },
            Style::default().fg(if app.show_basemap {
                Color::Green
            } else {
                Color::DarkGray
            }),
        ),
        Span::styled(
            "| 1-4:projection tab:next drag/hjkl:rotate +/-:zoom r:reset q:quit",
            dim,
        ),
    ]);

    let paragraph = Paragraph::new(status);
    frame.render_widget(paragraph, area);
}
