use crate::message::{DeviceCommand, Outbound};
use anyhow::{anyhow, Context};
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::{SocketAddr, UdpSocket};
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Player,
    Remote,
}

pub struct OscSend {
    rx: Receiver<Outbound>,
    sock: UdpSocket,
    player_addr: SocketAddr,
    remote_addr: SocketAddr,
}

impl OscSend {
    pub(crate) fn new(
        rx: Receiver<Outbound>,
        bind_addr: SocketAddr,
        player_addr: SocketAddr,
        remote_addr: SocketAddr,
    ) -> anyhow::Result<Self> {
        let sock = UdpSocket::bind(bind_addr)
            .with_context(|| format!("binding send socket on {bind_addr}"))?;
        Ok(Self {
            rx,
            sock,
            player_addr,
            remote_addr,
        })
    }

    fn to_message(msg: Outbound) -> (Target, OscMessage) {
        let (target, addr, args) = match msg {
            Outbound::Device(DeviceCommand::SetVolume(level)) => {
                (Target::Player, "/mp3/volume", vec![OscType::Int(i32::from(level))])
            }
            Outbound::Device(DeviceCommand::Play(clip)) => {
                (Target::Player, "/mp3/play", vec![OscType::Int(i32::from(clip))])
            }
            Outbound::Reply { op, status } => (
                Target::Remote,
                "/reply",
                vec![OscType::String(op.to_string()), OscType::Int(status)],
            ),
            Outbound::Status(diag) => (
                Target::Remote,
                "/status",
                vec![
                    OscType::String(diag.version),
                    OscType::Int(i32::from(diag.volume)),
                    OscType::Int(i32::from(diag.clip)),
                    OscType::String(diag.last_event),
                ],
            ),
        };
        (
            target,
            OscMessage {
                addr: addr.to_string(),
                args,
            },
        )
    }

    fn send_message(&self, target: Target, msg: OscMessage) -> anyhow::Result<()> {
        let msg_buf = encoder::encode(&OscPacket::Message(msg))
            .map_err(|e| anyhow!("encoding OSC message: {e:?}"))?;
        let to_addr = match target {
            Target::Player => self.player_addr,
            Target::Remote => self.remote_addr,
        };
        self.sock
            .send_to(&msg_buf, to_addr)
            .with_context(|| format!("sending to {to_addr}"))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn run(self) {
        // ends when the controller loop drops its sender
        while let Ok(msg) = self.rx.recv() {
            let (target, osc) = Self::to_message(msg);
            if let Err(e) = self.send_message(target, osc) {
                tracing::warn!(?target, error = %e, "unable to deliver message");
            }
        }
        tracing::debug!("outbound channel closed");
    }
}
