//! wsi - workspace switch indicator
//!
//! Connects to the compositor, then redraws the indicator for every
//! workspace change received on the control socket until the socket
//! stops delivering.

use log::info;
use wsi::config::Config;
use wsi::listener::SocketListener;
use wsi::session::Session;
use wsi::transport::WaylandTransport;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting wsi");
    let config = Config::default();

    let transport = WaylandTransport::connect()?;
    let mut session = Session::start(transport, &config)?;
    let listener = SocketListener::bind(&config.socket_path)?;

    session.run(&listener);

    Ok(())
}
