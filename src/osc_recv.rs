use crate::message::{Inbound, RemoteCommand};
use rosc::OscPacket::{Bundle, Message};
use rosc::{OscBundle, OscMessage, OscPacket, OscType};
use std::net::{SocketAddr, UdpSocket};
use std::sync::mpsc::Sender;

#[derive(Debug)]
pub(crate) struct OscRecv {
    tx: Sender<Inbound>,
    bind_addr: SocketAddr,
}

impl OscRecv {
    pub(crate) fn new(tx: Sender<Inbound>, bind_addr: SocketAddr) -> Self {
        Self { tx, bind_addr }
    }

    #[tracing::instrument(skip(self), fields(addr = %self.bind_addr))]
    pub(crate) fn run(self) {
        let sock = match UdpSocket::bind(self.bind_addr) {
            Ok(sock) => sock,
            Err(e) => {
                tracing::error!(error = %e, "unable to bind listen socket");
                self.forward(Inbound::LinkDown);
                return;
            }
        };
        self.forward(Inbound::LinkUp);
        let mut buf = [0u8; 8192];

        loop {
            match sock.recv_from(&mut buf) {
                Ok((size, from)) => match rosc::decoder::decode_udp(&buf[..size]) {
                    Ok((_, packet)) => self.handle_packet(packet),
                    Err(e) => tracing::warn!(%from, error = ?e, "undecodable datagram"),
                },
                Err(e) => {
                    tracing::error!(error = %e, "error receiving from socket");
                    self.forward(Inbound::LinkDown);
                    break;
                }
            }
        }
    }

    fn forward(&self, msg: Inbound) {
        if self.tx.send(msg).is_err() {
            tracing::debug!("controller loop has gone away");
        }
    }

    fn handle_packet(&self, packet: OscPacket) {
        match packet {
            Bundle(bundle) => self.handle_bundle(bundle),
            Message(msg) => {
                if let Some(inbound) = Self::parse_message(&msg) {
                    self.forward(inbound);
                }
            }
        }
    }

    fn handle_bundle(&self, bundle: OscBundle) {
        bundle
            .content
            .into_iter()
            .for_each(|x| self.handle_packet(x));
    }

    pub(crate) fn parse_message(msg: &OscMessage) -> Option<Inbound> {
        let command = match msg.addr.as_str() {
            "/volume" => RemoteCommand::SetVolume(Self::arg_to_string(msg.args.first())),
            "/clip" => RemoteCommand::PlayClip(Self::arg_to_string(msg.args.first())),
            "/trigger" => RemoteCommand::Trigger(Self::arg_to_string(msg.args.first())),
            "/event" => RemoteCommand::Event(Self::arg_to_string(msg.args.first())),
            "/status" => RemoteCommand::Status,
            "/mp3/busy" => return Some(Inbound::Busy(Self::arg_to_bool(msg.args.first()))),
            addr => {
                tracing::trace!(addr, "ignoring message");
                return None;
            }
        };
        Some(Inbound::Remote(command))
    }

    /// Numeric arguments are accepted as their decimal text.
    fn arg_to_string(arg: Option<&OscType>) -> String {
        match arg {
            Some(OscType::String(s)) => s.clone(),
            Some(OscType::Int(i)) => i.to_string(),
            Some(OscType::Long(l)) => l.to_string(),
            _ => String::new(),
        }
    }

    fn arg_to_bool(arg: Option<&OscType>) -> bool {
        match arg {
            Some(OscType::Int(i)) => *i != 0,
            Some(OscType::Bool(b)) => *b,
            _ => false,
        }
    }
}
