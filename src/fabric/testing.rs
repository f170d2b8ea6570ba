//! In-process stand-in for a running Fabric shell.
//!
//! `connect_fake` serves `FakeFabric` at `/org/Fabric/fabric` on one end of a
//! peer-to-peer connection and hands back a `FabricClient` on the other end.
//! There is no bus daemon behind it, so `org.freedesktop.DBus` calls fail.

use std::collections::HashMap;
use tokio::net::UnixStream;
use zbus::{Connection, Guid};

use super::{FABRIC_DBUS_OBJECT_PATH, FabricClient};

pub struct FakeFabric {
    pub file: String,
    pub windows: HashMap<String, bool>,
}

impl Default for FakeFabric {
    fn default() -> Self {
        let windows = [("status-bar", true), ("launcher", false), ("dock", true)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self {
            file: "/home/user/.config/fabric/bar.py".to_string(),
            windows,
        }
    }
}

#[zbus::interface(name = "org.Fabric.fabric")]
impl FakeFabric {
    #[zbus(property)]
    fn file(&self) -> String {
        self.file.clone()
    }

    #[zbus(property)]
    fn windows(&self) -> HashMap<String, bool> {
        self.windows.clone()
    }

    /// `raise ...` sources fail, everything else succeeds.
    fn execute(&self, source: &str) -> String {
        match source.strip_prefix("raise ") {
            Some(exc) => format!("{exc}: raised"),
            None => String::new(),
        }
    }

    /// Echoes the code back as the result; `1/0` fails like Python would.
    #[zbus(out_args("result", "exception"))]
    fn evaluate(&self, code: &str) -> (String, String) {
        if code.replace(' ', "") == "1/0" {
            (String::new(), "ZeroDivisionError: division by zero".to_string())
        } else {
            (code.to_string(), String::new())
        }
    }
}

/// Returns the serving connection (keep it alive) and a client wired to it.
pub async fn connect_fake(fake: FakeFabric) -> (Connection, FabricClient) {
    let guid = Guid::generate();
    let (server_end, client_end) = UnixStream::pair().unwrap();
    let server = zbus::connection::Builder::unix_stream(server_end)
        .server(guid)
        .unwrap()
        .p2p()
        .serve_at(FABRIC_DBUS_OBJECT_PATH, fake)
        .unwrap()
        .build();
    let client = zbus::connection::Builder::unix_stream(client_end)
        .p2p()
        .build();
    let (server, client) = tokio::try_join!(server, client).unwrap();
    (server, FabricClient::from_connection(client))
}
