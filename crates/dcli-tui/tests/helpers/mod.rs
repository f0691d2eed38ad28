use crossterm::event::{KeyCode, KeyModifiers};
use dcli_config::GlobalConfig;
use dcli_core::test_support::*;
use dcli_tui::App;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;

/// Engine with two containers: "nginx" (running) and "db" (exited)
#[allow(dead_code)]
pub fn two_container_engine() -> MockEngine {
    MockEngine::new().with_containers(vec![
        mock_container("abc", "db", "mysql", "exited"),
        mock_container("1234567890", "nginx", "nginx:latest", "running"),
    ])
}

/// Build an App on top of a mock engine
#[allow(dead_code)]
pub async fn app_with(mock: MockEngine) -> (App, Arc<MockEngine>) {
    let mock = Arc::new(mock);
    let app = App::new(mock.clone(), &GlobalConfig::default())
        .await
        .unwrap();
    (app, mock)
}

#[allow(dead_code)]
pub async fn press(app: &mut App, code: KeyCode) {
    app.send_key(code, KeyModifiers::NONE).await.unwrap();
}

#[allow(dead_code)]
pub async fn ctrl(app: &mut App, c: char) {
    app.send_key(KeyCode::Char(c), KeyModifiers::CONTROL)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

/// Render the app to a TestBackend and capture output as a string
#[allow(dead_code)]
pub fn render_app(app: &mut App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| dcli_tui::ui::draw(frame, app))
        .unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer_to_string(&buffer)
}

/// Convert a ratatui buffer to a string representation
#[allow(dead_code)]
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            let cell = buffer.get(x, y);
            output.push_str(cell.symbol());
        }
        output.push('\n');
    }
    output
}
