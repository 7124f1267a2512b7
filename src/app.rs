use crate::config::{Settings, FIRMWARE_VERSION, REPLAY_WINDOW};
use crate::device::panel::{Board, Panel};
use crate::io::{device_busy, DigitalIo, Pin};
use crate::message::{Diagnostics, Inbound, Outbound, RemoteCommand};
use crate::playback::blink::Blinker;
use crate::playback::button::ButtonMonitor;
use crate::playback::controller::{Effect, PlaybackController};
use crate::playback::trigger::{parse_int, TriggerSurface};
use crate::player::PlaybackDevice;
use crate::volume::{VolumeSetter, VolumeStore};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

const LOOP_INTERVAL: Duration = Duration::from_millis(1);

pub struct App<D, S> {
    controller: PlaybackController,
    surface: TriggerSurface,
    button: ButtonMonitor,
    blinker: Blinker,
    volume: VolumeSetter<S>,
    device: D,
    replies: Sender<Outbound>,
    last_event: String,
}

impl<D: PlaybackDevice, S: VolumeStore> App<D, S> {
    pub fn new(settings: Settings, device: D, store: S, replies: Sender<Outbound>) -> Self {
        let clips = settings.clips;
        Self {
            controller: PlaybackController::new(clips.nothing_announced_clip),
            surface: TriggerSurface::new(clips),
            button: ButtonMonitor::new(),
            blinker: Blinker::new(),
            volume: VolumeSetter::load(store),
            device,
            replies,
            last_event: String::new(),
        }
    }

    pub fn start(&mut self, io: &mut impl DigitalIo) {
        io.write(Pin::ReadyLed, true);
        tracing::info!(version = FIRMWARE_VERSION, "announcer ready");
    }

    /// Runs one remote operation to completion.
    pub fn remote(&mut self, cmd: RemoteCommand) {
        let reply = match cmd {
            RemoteCommand::SetVolume(arg) => {
                let volume = self.volume.set(parse_int(&arg));
                Outbound::Reply {
                    op: "volume",
                    status: i32::from(volume.get()),
                }
            }
            RemoteCommand::PlayClip(arg) => Outbound::Reply {
                op: "clip",
                status: i32::from(self.surface.play_clip(&mut self.controller, &arg)),
            },
            RemoteCommand::Trigger(arg) => Outbound::Reply {
                op: "trigger",
                status: i32::from(self.surface.trigger(&mut self.controller, &arg)),
            },
            RemoteCommand::Event(payload) => {
                self.surface.event(&mut self.controller, &payload);
                self.last_event = payload;
                return;
            }
            RemoteCommand::Status => Outbound::Status(self.diagnostics()),
        };
        if self.replies.send(reply).is_err() {
            tracing::warn!("reply channel closed");
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            version: FIRMWARE_VERSION.to_string(),
            volume: self.volume.volume().get(),
            clip: self.controller.request().clip,
            last_event: self.last_event.clone(),
        }
    }

    /// One pass of the cooperative loop: indicator, button, then playback.
    pub fn tick(&mut self, io: &mut impl DigitalIo, now: Instant) {
        self.blinker.poll(io, now);

        if self.button.poll(io, now) {
            self.replay(now);
        }

        let busy = device_busy(io);
        match self.controller.poll(now, busy, self.volume.volume()) {
            Some(Effect::StartBlink) => self.blinker.set_enabled(true),
            Some(Effect::StopBlink) => self.blinker.set_enabled(false),
            Some(Effect::Play {
                clip,
                device_volume,
            }) => {
                tracing::info!(clip, device_volume, "playing clip");
                self.device.set_volume(device_volume);
                self.device.play_clip(clip);
            }
            None => {}
        }
    }

    fn replay(&mut self, now: Instant) {
        let stale = self
            .controller
            .last_played()
            .map_or(true, |at| now.saturating_duration_since(at) > REPLAY_WINDOW);
        if stale {
            let clip = self.surface.table().nothing_announced_clip;
            tracing::info!(clip, "nothing recent to replay");
            self.controller.submit(clip);
        } else {
            tracing::info!(clip = self.controller.request().clip, "replaying last announcement");
            self.controller.replay();
        }
    }
}

fn dispatch<D, S, P>(app: &mut App<D, S>, board: &mut Board<P>, msg: Inbound)
where
    D: PlaybackDevice,
    S: VolumeStore,
    P: Panel,
{
    match msg {
        Inbound::Remote(cmd) => app.remote(cmd),
        Inbound::Busy(playing) => board.set_device_busy(playing),
        Inbound::LinkUp => {
            tracing::info!("remote link up");
            board.write(Pin::LinkLed, true);
        }
        Inbound::LinkDown => {
            tracing::warn!("remote link down");
            board.write(Pin::LinkLed, false);
        }
    }
}

/// Owns the loop state: the app, its board and the inbound side.
pub struct Runner<D, S, P> {
    app: App<D, S>,
    board: Board<P>,
    rx: Receiver<Inbound>,
    connected: bool,
}

impl<D, S, P> Runner<D, S, P>
where
    D: PlaybackDevice,
    S: VolumeStore,
    P: Panel,
{
    pub fn new(mut app: App<D, S>, mut board: Board<P>, rx: Receiver<Inbound>) -> Self {
        app.start(&mut board);
        Self {
            app,
            board,
            rx,
            connected: true,
        }
    }

    /// Applies queued messages. Stops after a busy report so the
    /// controller sees every level for at least one tick.
    fn drain(&mut self) {
        while self.connected {
            match self.rx.try_recv() {
                Ok(msg) => {
                    let busy = matches!(msg, Inbound::Busy(_));
                    dispatch(&mut self.app, &mut self.board, msg);
                    if busy {
                        break;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("inbound channel closed, running on local input only");
                    self.board.write(Pin::LinkLed, false);
                    self.connected = false;
                }
            }
        }
    }

    /// One loop iteration: callbacks, panel input, then the polls.
    pub fn step(&mut self, now: Instant) {
        self.drain();
        self.board.pump();
        self.app.tick(&mut self.board, now);
    }
}

/// Runs the cooperative loop forever; local input keeps working without the link.
pub fn run<D, S, P>(app: App<D, S>, board: Board<P>, rx: Receiver<Inbound>) -> !
where
    D: PlaybackDevice,
    S: VolumeStore,
    P: Panel,
{
    let mut runner = Runner::new(app, board, rx);
    loop {
        runner.step(Instant::now());
        std::thread::sleep(LOOP_INTERVAL);
    }
}
