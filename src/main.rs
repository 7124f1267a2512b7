mod app;
mod config;
mod device;
mod io;
mod message;
mod osc_recv;
mod osc_send;
mod playback;
mod player;
mod volume;

use crate::app::App;
use crate::config::Settings;
use crate::device::panel::{Board, MonomePanel};
use crate::osc_send::OscSend;
use crate::player::BridgePlayer;
use crate::volume::FileStore;
use anyhow::anyhow;
use clap::Parser;
use monome::{Monome, MonomeDeviceType};
use osc_recv::OscRecv;
use std::net::SocketAddr;
use std::path::PathBuf;

use std::sync::mpsc::channel;
use std::thread;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where remote commands, events and busy reports arrive.
    #[arg(short, long, default_value = "127.0.0.1:9100")]
    listen_addr: SocketAddr,

    /// Playback bridge driving the MP3 module.
    #[arg(short, long, default_value = "127.0.0.1:9200")]
    player_addr: SocketAddr,

    /// Receives replies and status.
    #[arg(short, long, default_value = "127.0.0.1:9300")]
    remote_addr: SocketAddr,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Volume store.
    #[arg(short, long, default_value = "clip-announcer-state.yml")]
    state: PathBuf,

    #[arg(long, default_value = "/clip-announcer")]
    prefix: String,
}

fn main() -> anyhow::Result<()> {
    // install tracing
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(fmt::Layer::new().pretty().with_writer(std::io::stdout));
    tracing::subscriber::set_global_default(subscriber)?;

    // run clap
    let args: Args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;

    let (tx_in, rx_in) = channel();
    let (tx_out, rx_out) = channel();

    let bind_addr: SocketAddr = "127.0.0.1:0".parse()?;
    let sender = OscSend::new(rx_out, bind_addr, args.player_addr, args.remote_addr)?;
    thread::spawn(move || sender.run());
    thread::spawn(move || OscRecv::new(tx_in, args.listen_addr).run());

    let monome = Monome::new(args.prefix).map_err(|e| anyhow!("no monome device: {e:?}"))?;
    match monome.device_type() {
        MonomeDeviceType::Grid => {}
        _ => {
            tracing::error!(?monome, "unknown device");
            anyhow::bail!("expected a monome grid");
        }
    }
    let board = Board::new(MonomePanel::new(monome, settings.panel));

    let app = App::new(
        settings,
        BridgePlayer::new(tx_out.clone()),
        FileStore::new(args.state),
        tx_out,
    );
    app::run(app, board, rx_in)
}
