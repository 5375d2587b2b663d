use anyhow::Context;
use tracing::info;

mod app;
mod dialogs;

use app::VenvManagerApp;

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("venv-rs manager starting");

    iced::application(VenvManagerApp::new, VenvManagerApp::update, VenvManagerApp::view)
        .title(VenvManagerApp::title)
        .theme(VenvManagerApp::theme)
        .style(VenvManagerApp::style)
        .window(iced::window::Settings {
            size: iced::Size::new(760.0, 560.0),
            min_size: Some(iced::Size::new(560.0, 400.0)),
            position: iced::window::Position::Centered,
            ..Default::default()
        })
        .run()
        .context("the environment manager window failed")
}
