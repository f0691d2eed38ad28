//! Rendering tests against ratatui's TestBackend, with insta snapshots of
//! whole screens

mod helpers;

use crossterm::event::KeyCode;
use dcli_core::test_support::*;
use dcli_tui::shell::{EXEC_FAILED_MESSAGE, NOT_RUNNING_MESSAGE};
use dcli_tui::Screen;
use helpers::*;

const WIDTH: u16 = 160;
const HEIGHT: u16 = 40;

/// Snapshot size: wide enough for the container table, short enough to review
const SNAPSHOT_HEIGHT: u16 = 24;

/// Container list with the running container first and selected
#[tokio::test]
async fn test_container_list() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    let output = render_app(&mut app, WIDTH, SNAPSHOT_HEIGHT);
    insta::assert_snapshot!(output);
}

#[tokio::test]
async fn test_status_bar_render() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    let output = render_app(&mut app, WIDTH, HEIGHT);

    assert!(output.contains("DockerVersion: 24.0.7"));
    assert!(output.contains("CPUs: 8"));
    assert!(output.contains("Memory: 16.00 GB"));
    assert!(output.contains("GENERAL ↑/↓ Navigate • ctrl+c Exit • ctrl+r refresh • esc Back"));
    assert!(output.contains("CONTAINERS ctrl+f Search • ctrl+l Logs • ctrl+o Options"));
    assert!(output.contains("IMAGES ctrl+b • NETWORKS ctrl+n • VOLUMES ctrl+v • STACKS ctrl+p"));
}

#[tokio::test]
async fn test_filtered_list_title() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    ctrl(&mut app, 'f').await;
    type_text(&mut app, "db").await;
    press(&mut app, KeyCode::Enter).await;

    let output = render_app(&mut app, WIDTH, HEIGHT);
    assert!(output.contains("Containers (filter: db)"));
    assert!(!output.contains("nginx:latest"));
}

#[tokio::test]
async fn test_empty_list_render() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    ctrl(&mut app, 'b').await;

    let output = render_app(&mut app, WIDTH, HEIGHT);
    assert!(output.contains("No images found."));
}

#[tokio::test]
async fn test_search_prompt_render() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    ctrl(&mut app, 'f').await;
    type_text(&mut app, "ngi").await;

    let output = render_app(&mut app, WIDTH, HEIGHT);
    assert!(output.contains("Search container by name"));
    assert!(output.contains("> ngi"));
    assert!(output.contains("(esc to back)"));
}

#[tokio::test]
async fn test_container_detail_render() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    press(&mut app, KeyCode::Enter).await;

    let output = render_app(&mut app, WIDTH, HEIGHT);
    assert!(output.contains("Container: nginx"));
    assert!(output.contains("Container status"));
    assert!(output.contains("172.17.0.2"));
    assert!(!output.contains("| -------------"), "separator rows are not drawn");
}

/// Container options menu with the second choice selected
#[tokio::test]
async fn test_container_options() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    ctrl(&mut app, 'o').await;
    press(&mut app, KeyCode::Down).await;

    let output = render_app(&mut app, WIDTH, SNAPSHOT_HEIGHT);
    insta::assert_snapshot!(output);
}

#[tokio::test]
async fn test_options_error_render() {
    let (mut app, mock) = app_with(two_container_engine()).await;
    *mock.start_result.lock().unwrap() =
        Err(dcli_engine::EngineError::RuntimeError("already started".into()));
    ctrl(&mut app, 'o').await;
    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Enter).await;

    let output = render_app(&mut app, WIDTH, HEIGHT);
    assert!(output.contains("Error: Container engine error: already started"));
}

/// Logs viewer, newest line first
#[tokio::test]
async fn test_container_logs() {
    let (mut app, mock) = app_with(two_container_engine()).await;
    *mock.logs_result.lock().unwrap() = Ok(vec!["older line".into(), "newer line".into()]);
    ctrl(&mut app, 'l').await;

    let output = render_app(&mut app, WIDTH, SNAPSHOT_HEIGHT);
    insta::assert_snapshot!(output);
}

/// Shell menu for the selected container
#[tokio::test]
async fn test_shell_choice() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    ctrl(&mut app, 'e').await;

    let output = render_app(&mut app, WIDTH, SNAPSHOT_HEIGHT);
    insta::assert_snapshot!(output);
}

/// Centered panel after an attach to a stopped container
#[tokio::test]
async fn test_exec_error_not_running() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    app.screen = Screen::ExecError(NOT_RUNNING_MESSAGE.into());

    let output = render_app(&mut app, WIDTH, SNAPSHOT_HEIGHT);
    insta::assert_snapshot!(output);
}

#[tokio::test]
async fn test_exec_failed_panel() {
    let (mut app, _mock) = app_with(two_container_engine()).await;
    app.screen = Screen::ExecError(EXEC_FAILED_MESSAGE.into());

    let output = render_app(&mut app, WIDTH, HEIGHT);
    assert!(output.contains("Error: OCI runtime exec failed"));
    assert!(output.contains("Esc to go back"));
}

#[tokio::test]
async fn test_network_detail_render() {
    let (mut app, _mock) =
        app_with(two_container_engine().with_networks(vec![mock_network("n1", "backend")])).await;
    ctrl(&mut app, 'n').await;
    press(&mut app, KeyCode::Enter).await;

    let output = render_app(&mut app, WIDTH, HEIGHT);
    assert!(output.contains("Network: backend"));
    assert!(output.contains("172.18.0.0/16"));
}
