//! Bus client for running Fabric instances.
//!
//! resolve_bus_name / instance_short_name -> name mapping (no bus needed)
//! FabricClient::connect -> session bus (or explicit address)
//! Helpers: running_instances / checked_instance / file / windows / execute / evaluate
//!
use anyhow::{Context, Result, bail};
use std::collections::{BTreeMap, HashMap};
use zbus::Connection;
use zbus::fdo::DBusProxy;
use zbus::names::BusName;
use zbus::proxy::CacheProperties;

use crate::{log_debug, log_trace};

/// Well-known name prefix; also the interface name exposed by every instance.
pub const FABRIC_DBUS_INTERFACE_NAME: &str = "org.Fabric.fabric";

/// Object path the interface is served at.
pub const FABRIC_DBUS_OBJECT_PATH: &str = "/org/Fabric/fabric";

#[cfg(test)]
pub(crate) mod testing;

#[zbus::proxy(interface = "org.Fabric.fabric", gen_blocking = false)]
trait Fabric {
    /// Config file the instance was started from.
    #[zbus(property)]
    fn file(&self) -> zbus::Result<String>;

    /// Window name -> visibility.
    #[zbus(property)]
    fn windows(&self) -> zbus::Result<HashMap<String, bool>>;

    /// Run `source`; returns the formatted exception (empty on success).
    fn execute(&self, source: &str) -> zbus::Result<String>;

    /// Evaluate `code`; returns `(result, exception)`.
    fn evaluate(&self, code: &str) -> zbus::Result<(String, String)>;
}

/// Map a user-supplied instance name onto the bus name it owns.
///
/// - "org.Fabric.fabric..." -> used verbatim
/// - "bar"                  -> "org.Fabric.fabric.bar"
/// - ""                     -> "org.Fabric.fabric"
pub fn resolve_bus_name(instance: &str) -> String {
    if instance.starts_with(FABRIC_DBUS_INTERFACE_NAME) {
        return instance.to_string();
    }
    if instance.is_empty() {
        FABRIC_DBUS_INTERFACE_NAME.to_string()
    } else {
        format!("{FABRIC_DBUS_INTERFACE_NAME}.{instance}")
    }
}

/// Inverse of `resolve_bus_name` for display. The bare prefix stays as-is.
pub fn instance_short_name(bus_name: &str) -> &str {
    bus_name
        .strip_prefix(FABRIC_DBUS_INTERFACE_NAME)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(bus_name)
}

/// One running instance, as reported by `list-all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceInfo {
    pub bus_name: String,
    pub file: String,
}

impl InstanceInfo {
    pub fn name(&self) -> &str {
        instance_short_name(&self.bus_name)
    }
}

/// Thin wrapper over a bus connection.
pub struct FabricClient {
    connection: Connection,
}

impl FabricClient {
    /// Connect to `address` if given, otherwise to the session bus.
    pub async fn connect(address: Option<&str>) -> Result<Self> {
        let connection = match address {
            Some(addr) => {
                log_debug!("connecting to bus at {addr}");
                zbus::connection::Builder::address(addr)
                    .with_context(|| format!("invalid bus address: {addr}"))?
                    .build()
                    .await
                    .with_context(|| format!("couldn't connect to bus at {addr}"))?
            }
            None => {
                log_debug!("connecting to session bus");
                Connection::session()
                    .await
                    .context("couldn't connect to the session bus")?
            }
        };
        Ok(Self::from_connection(connection))
    }

    /// Wrap an already established connection.
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    async fn dbus(&self) -> Result<DBusProxy<'_>> {
        DBusProxy::builder(&self.connection)
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .context("couldn't create org.freedesktop.DBus proxy")
    }

    async fn proxy<'a>(&'a self, bus_name: &'a str) -> Result<FabricProxy<'a>> {
        FabricProxy::builder(&self.connection)
            .destination(bus_name)
            .with_context(|| format!("invalid bus name: {bus_name}"))?
            .path(FABRIC_DBUS_OBJECT_PATH)?
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .with_context(|| format!("couldn't create proxy for {bus_name}"))
    }

    /// `org.freedesktop.DBus.ListNames`
    pub async fn list_names(&self) -> Result<Vec<String>> {
        let names = self
            .dbus()
            .await?
            .list_names()
            .await
            .context("ListNames failed")?;
        Ok(names.into_iter().map(|n| n.to_string()).collect())
    }

    /// `org.freedesktop.DBus.NameHasOwner`. Malformed names are never owned.
    pub async fn name_has_owner(&self, name: &str) -> Result<bool> {
        let Ok(bus_name) = BusName::try_from(name) else {
            log_debug!("'{name}' is not a valid bus name");
            return Ok(false);
        };
        self.dbus()
            .await?
            .name_has_owner(bus_name)
            .await
            .with_context(|| format!("NameHasOwner failed for {name}"))
    }

    /// Bus names of every running instance, in bus order.
    pub async fn running_instances(&self) -> Result<Vec<String>> {
        let names = self.list_names().await?;
        log_trace!("bus reported {} names", names.len());
        Ok(filter_instance_names(names))
    }

    /// Resolve `instance` and make sure something owns it.
    pub async fn checked_instance(&self, instance: &str) -> Result<String> {
        let bus_name = resolve_bus_name(instance);
        log_debug!("instance '{instance}' -> {bus_name}");
        let running = self.name_has_owner(&bus_name).await.unwrap_or(false);
        if !running {
            bail!("couldn't find a running Fabric instance with the name {instance}");
        }
        Ok(bus_name)
    }

    pub async fn file(&self, bus_name: &str) -> Result<String> {
        self.proxy(bus_name)
            .await?
            .file()
            .await
            .with_context(|| format!("couldn't read File property of {bus_name}"))
    }

    /// Windows sorted by name.
    pub async fn windows(&self, bus_name: &str) -> Result<BTreeMap<String, bool>> {
        let windows = self
            .proxy(bus_name)
            .await?
            .windows()
            .await
            .with_context(|| format!("couldn't read Windows property of {bus_name}"))?;
        Ok(windows.into_iter().collect())
    }

    pub async fn instance_info(&self, bus_name: &str) -> Result<InstanceInfo> {
        Ok(InstanceInfo {
            bus_name: bus_name.to_string(),
            file: self.file(bus_name).await?,
        })
    }

    pub async fn execute(&self, bus_name: &str, source: &str) -> Result<String> {
        log_trace!("Execute on {bus_name} ({} bytes)", source.len());
        self.proxy(bus_name)
            .await?
            .execute(source)
            .await
            .with_context(|| format!("Execute call on {bus_name} failed"))
    }

    pub async fn evaluate(&self, bus_name: &str, code: &str) -> Result<(String, String)> {
        log_trace!("Evaluate on {bus_name} ({} bytes)", code.len());
        self.proxy(bus_name)
            .await?
            .evaluate(code)
            .await
            .with_context(|| format!("Evaluate call on {bus_name} failed"))
    }
}

/// Keep only names under the Fabric prefix.
pub fn filter_instance_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|n| n.starts_with(FABRIC_DBUS_INTERFACE_NAME))
        .collect()
}
