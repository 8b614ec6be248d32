use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket};
use tokio::sync::{watch, Mutex};

/// Creates a fairing that reports the port Rocket bound to, and the handle
/// that receives it. Needed when the configured port is 0.
pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = watch::channel(None);
    (PortSaver { sender: tx }, Port { rx: Mutex::new(rx) })
}

pub struct Port {
    rx: Mutex<watch::Receiver<Option<u16>>>,
}

impl Port {
    /// Waits for liftoff. Returns `None` if the server was dropped before it
    /// bound a socket.
    pub async fn get(&self) -> Option<u16> {
        let mut rx = self.rx.lock().await;
        loop {
            if let Some(port) = *rx.borrow() {
                return Some(port);
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }
}

pub struct PortSaver {
    sender: watch::Sender<Option<u16>>,
}

#[rocket::async_trait]
impl Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let port = rocket.config().port;
        tracing::info!(port, "Listening");
        // Nobody waiting on the port is not an error.
        let _ = self.sender.send(Some(port));
    }
}
