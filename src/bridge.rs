use crate::dispatch::PlaybackCommand;
use crate::embed::EmbedSpec;
use crate::error::MoodError;
use crate::host::{EmbedPayload, ErrorKind, Host, InboundMessage};
use crate::player::PlayerBackend;
use std::io;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

pub const REQUEST_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeRequest {
    Mount { generation: u64, url: String },
    Teardown { generation: u64 },
    Command { generation: u64, command: PlaybackCommand },
}

/// [`Host`] for the terminal front-end. Embed work is queued to the bridge
/// task; notifications are held for the UI to pick up.
pub struct ChannelHost {
    requests: mpsc::Sender<BridgeRequest>,
    notice: Option<String>,
}

impl ChannelHost {
    pub fn new(requests: mpsc::Sender<BridgeRequest>) -> Self {
        Self {
            requests,
            notice: None,
        }
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn queue(&self, request: BridgeRequest) -> Result<(), String> {
        self.requests.try_send(request).map_err(|e| match e {
            TrySendError::Full(_) => "player bridge is busy".to_string(),
            TrySendError::Closed(_) => "player bridge is gone".to_string(),
        })
    }
}

impl Host for ChannelHost {
    fn mount_embed(&mut self, spec: &EmbedSpec) -> crate::error::Result<()> {
        self.queue(BridgeRequest::Mount {
            generation: spec.generation,
            url: spec.url.clone(),
        })
        .map_err(MoodError::EmbedLoad)
    }

    fn teardown_embed(&mut self, spec: &EmbedSpec) {
        if let Err(e) = self.queue(BridgeRequest::Teardown {
            generation: spec.generation,
        }) {
            debug!(generation = spec.generation, error = %e, "teardown not queued");
        }
    }

    fn post_command(
        &mut self,
        generation: u64,
        command: PlaybackCommand,
    ) -> crate::error::Result<()> {
        self.queue(BridgeRequest::Command {
            generation,
            command,
        })
        .map_err(MoodError::MessageDispatch)
    }

    fn open_link(&mut self, url: &str) -> io::Result<()> {
        open_in_browser(url)
    }

    fn notify(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }
}

/// Hand a URL to the desktop's default browser. Does not wait for it.
pub fn open_in_browser(url: &str) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = Command::new("xdg-open");

    info!(%url, "opening link");
    cmd.arg(url);
    spawn_reaped(cmd)
}

/// Spawn without blocking; a helper thread waits on the child so it never
/// lingers as a zombie.
fn spawn_reaped(mut cmd: Command) -> io::Result<()> {
    let mut child = cmd.stdout(Stdio::null()).stderr(Stdio::null()).spawn()?;
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            debug!(error = %e, "could not reap link opener");
        }
    });
    Ok(())
}

/// Owns the backend. Requests run in arrival order; every outcome goes back
/// as an [`InboundMessage`] tagged with `origin`.
pub async fn run_bridge(
    backend: Arc<dyn PlayerBackend>,
    origin: String,
    mut requests: mpsc::Receiver<BridgeRequest>,
    inbound: mpsc::Sender<InboundMessage>,
) {
    let mut active: Option<u64> = None;

    while let Some(request) = requests.recv().await {
        let payload = match request {
            BridgeRequest::Mount { generation, url } => {
                active = Some(generation);
                Some(mount(backend.clone(), generation, url).await)
            }
            BridgeRequest::Teardown { generation } => {
                if active == Some(generation) {
                    active = None;
                }
                None
            }
            BridgeRequest::Command {
                generation,
                command,
            } => {
                if active != Some(generation) {
                    debug!(generation, %command, "command for inactive embed dropped");
                    continue;
                }
                send(backend.clone(), generation, command).await
            }
        };

        if let Some(payload) = payload {
            if inbound
                .send(InboundMessage::new(origin.clone(), &payload))
                .await
                .is_err()
            {
                break;
            }
        }
    }
    debug!("player bridge stopped");
}

async fn mount(backend: Arc<dyn PlayerBackend>, generation: u64, url: String) -> EmbedPayload {
    let result = tokio::task::spawn_blocking(move || -> Result<(), (ErrorKind, String)> {
        backend
            .probe()
            .map_err(|e| (ErrorKind::Probe, e.to_string()))?;
        backend
            .load(&url)
            .map_err(|e| (ErrorKind::Load, e.to_string()))
    })
    .await;

    match result {
        Ok(Ok(())) => EmbedPayload::Ready { generation },
        Ok(Err((kind, message))) => {
            warn!(generation, ?kind, %message, "embed could not start");
            EmbedPayload::Error {
                generation,
                kind,
                message,
            }
        }
        Err(e) => EmbedPayload::Error {
            generation,
            kind: ErrorKind::Load,
            message: e.to_string(),
        },
    }
}

/// Runtime failures surface as load errors; success has nothing to report.
async fn send(
    backend: Arc<dyn PlayerBackend>,
    generation: u64,
    command: PlaybackCommand,
) -> Option<EmbedPayload> {
    let result = tokio::task::spawn_blocking(move || backend.send(command)).await;
    let message = match result {
        Ok(Ok(())) => return None,
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };
    warn!(generation, %command, %message, "player rejected command");
    Some(EmbedPayload::Error {
        generation,
        kind: ErrorKind::Load,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{parse_inbound, EmbedEvent};
    use anyhow::bail;
    use std::sync::Mutex;

    const ORIGIN: &str = "https://open.spotify.com";

    #[derive(Default)]
    struct FakeBackend {
        probe_fails: bool,
        sent: Mutex<Vec<PlaybackCommand>>,
    }

    impl PlayerBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "Fake"
        }

        fn probe(&self) -> anyhow::Result<()> {
            if self.probe_fails {
                bail!("no player");
            }
            Ok(())
        }

        fn load(&self, _embed_url: &str) -> anyhow::Result<()> {
            Ok(())
        }

        fn send(&self, command: PlaybackCommand) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(command);
            Ok(())
        }
    }

    fn start(
        backend: Arc<FakeBackend>,
    ) -> (mpsc::Sender<BridgeRequest>, mpsc::Receiver<InboundMessage>) {
        let (req_tx, req_rx) = mpsc::channel(REQUEST_CAPACITY);
        let (in_tx, in_rx) = mpsc::channel(REQUEST_CAPACITY);
        tokio::spawn(run_bridge(backend, ORIGIN.to_string(), req_rx, in_tx));
        (req_tx, in_rx)
    }

    fn mount_req(generation: u64) -> BridgeRequest {
        BridgeRequest::Mount {
            generation,
            url: "https://open.spotify.com/embed/playlist/abc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mount_reports_ready() {
        let (tx, mut rx) = start(Arc::new(FakeBackend::default()));
        tx.send(mount_req(1)).await.unwrap();

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.origin, ORIGIN);
        assert_eq!(
            parse_inbound(&msg, ORIGIN),
            Some(EmbedEvent::Ready { generation: 1 })
        );
    }

    #[tokio::test]
    async fn test_probe_failure_reported() {
        let backend = Arc::new(FakeBackend {
            probe_fails: true,
            ..Default::default()
        });
        let (tx, mut rx) = start(backend);
        tx.send(mount_req(3)).await.unwrap();

        let msg = rx.recv().await.unwrap();
        assert!(matches!(
            parse_inbound(&msg, ORIGIN),
            Some(EmbedEvent::Failed {
                generation: 3,
                error: MoodError::CapabilityProbe(_),
            })
        ));
    }

    #[tokio::test]
    async fn test_commands_only_reach_active_embed() {
        let backend = Arc::new(FakeBackend::default());
        let (tx, mut rx) = start(backend.clone());

        tx.send(mount_req(1)).await.unwrap();
        rx.recv().await.unwrap();
        tx.send(mount_req(2)).await.unwrap();
        rx.recv().await.unwrap();

        for (generation, command) in [
            (1, PlaybackCommand::Play),
            (2, PlaybackCommand::Play),
            (2, PlaybackCommand::Next),
        ] {
            tx.send(BridgeRequest::Command {
                generation,
                command,
            })
            .await
            .unwrap();
        }
        tx.send(BridgeRequest::Teardown { generation: 2 }).await.unwrap();
        tx.send(BridgeRequest::Command {
            generation: 2,
            command: PlaybackCommand::Pause,
        })
        .await
        .unwrap();

        drop(tx);
        // Channel closes once the bridge has drained every request
        assert!(rx.recv().await.is_none());
        assert_eq!(
            *backend.sent.lock().unwrap(),
            vec![PlaybackCommand::Play, PlaybackCommand::Next]
        );
    }

    #[test]
    fn test_channel_host_reports_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut host = ChannelHost::new(tx);
        assert!(matches!(
            host.post_command(1, PlaybackCommand::Play),
            Err(MoodError::MessageDispatch(_))
        ));
    }

    /// Zombie children of this process, read from `/proc/<pid>/stat`.
    #[cfg(target_os = "linux")]
    fn zombie_children() -> usize {
        let me = std::process::id().to_string();
        std::fs::read_dir("/proc")
            .unwrap()
            .filter_map(|e| std::fs::read_to_string(e.ok()?.path().join("stat")).ok())
            .filter(|stat| {
                // "pid (comm) S ppid ..."; comm may contain spaces
                let Some((_, rest)) = stat.rsplit_once(')') else {
                    return false;
                };
                let mut fields = rest.split_whitespace();
                fields.next() == Some("Z") && fields.next() == Some(me.as_str())
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_link_openers_are_reaped() {
        for _ in 0..5 {
            spawn_reaped(Command::new("true")).unwrap();
        }

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while zombie_children() > 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        assert_eq!(zombie_children(), 0);
    }

    #[test]
    fn test_channel_host_keeps_last_notice() {
        let (tx, _rx) = mpsc::channel(1);
        let mut host = ChannelHost::new(tx);
        host.notify("first");
        host.notify("second");
        assert_eq!(host.take_notice().as_deref(), Some("second"));
        assert_eq!(host.take_notice(), None);
    }
}
