use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Trainer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Trainer => "trainer",
        }
    }
}

/// Token plus the name shown for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub display_name: String,
}

/// Credential slots, one per role. The client and trainer slots are
/// independent: clearing one never touches the other.
pub trait SessionContext {
    fn get(&self, role: Role) -> Option<Credential>;
    fn set(&mut self, role: Role, credential: Credential);
    fn clear(&mut self, role: Role);
}

#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    slots: HashMap<Role, Credential>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionContext for MemorySession {
    fn get(&self, role: Role) -> Option<Credential> {
        self.slots.get(&role).cloned()
    }

    fn set(&mut self, role: Role, credential: Credential) {
        self.slots.insert(role, credential);
    }

    fn clear(&mut self, role: Role) {
        self.slots.remove(&role);
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFileContents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client: Option<Credential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trainer: Option<Credential>,
}

/// Session slots persisted as JSON so the CLI stays signed in between runs.
///
/// Writes are best-effort: a failed write is logged and the in-memory state
/// stays authoritative for the rest of the process.
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    contents: SessionFileContents,
}

impl FileSession {
    /// Open `path`, starting empty when it is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let contents = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                SessionFileContents::default()
            }),
            Err(_) => SessionFileContents::default(),
        };
        Self { path, contents }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<Credential> {
        match role {
            Role::Client => &mut self.contents.client,
            Role::Trainer => &mut self.contents.trainer,
        }
    }

    fn persist(&self) {
        let written = serde_json::to_string_pretty(&self.contents)
            .map_err(|e| e.to_string())
            .and_then(|json| write_private(&self.path, &json).map_err(|e| e.to_string()));

        if let Err(e) = written {
            tracing::warn!(path = %self.path.display(), error = %e, "could not persist session");
        }
    }
}

/// The file holds bearer tokens, so on unix it is readable by the owner only,
/// including when an older file with wider permissions is overwritten.
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

impl SessionContext for FileSession {
    fn get(&self, role: Role) -> Option<Credential> {
        match role {
            Role::Client => self.contents.client.clone(),
            Role::Trainer => self.contents.trainer.clone(),
        }
    }

    fn set(&mut self, role: Role, credential: Credential) {
        *self.slot_mut(role) = Some(credential);
        self.persist();
    }

    fn clear(&mut self, role: Role) {
        if self.slot_mut(role).take().is_some() {
            self.persist();
        }
    }
}
