use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::Path;
use std::time::Duration;

use tui_lod::app::App;
use tui_lod::lod::ProjectionKind;
use tui_lod::ui;

fn main() -> Result<()> {
    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for rotating and zooming the globe
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        // Click and drag to rotate
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize);

    // Coastline underlay (falls back to a built-in outline)
    app.load_basemap(Path::new("data"));

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Projection selection
                            KeyCode::Char('1') => app.set_mode(ProjectionKind::PlateCarree),
                            KeyCode::Char('2') => app.set_mode(ProjectionKind::Mercator),
                            KeyCode::Char('3') => app.set_mode(ProjectionKind::BentMercator),
                            KeyCode::Char('4') => app.set_mode(ProjectionKind::CubeCell),
                            KeyCode::Tab | KeyCode::Char(' ') => app.next_mode(),

                            // Rotate with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.rotate(-12, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.rotate(12, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.rotate(0, -8),
                            KeyCode::Down | KeyCode::Char('j') => app.rotate(0, 8),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            // Basemap toggle
                            KeyCode::Char('m') | KeyCode::Char('M') => app.toggle_basemap(),

                            // Reset view
                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
