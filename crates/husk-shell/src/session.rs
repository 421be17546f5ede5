//! Session: one terminal's filesystem, history, registry, and
//! persistence glued together.

use husk_types::cipher::CipherService;
use husk_types::error::Result;
use husk_vfs::{FileSystem, snapshot};

use crate::history::{self, History};
use crate::interpreter::{self, CommandRegistry, Environment, LineResult, Signal};
use crate::seed;
use crate::storage::KeyValueStore;

/// Store key holding the filesystem snapshot.
pub const FS_KEY: &str = "filesystem";
/// Store key holding the newline-joined history.
pub const HISTORY_KEY: &str = "history";

/// A live terminal session.
///
/// Construction restores the filesystem and history from the store,
/// falling back to the seed tree; every executed line is persisted
/// back. The registry starts empty; front ends register the command
/// sets they want.
pub struct Session {
    fs: FileSystem,
    history: History,
    store: Box<dyn KeyValueStore>,
    registry: CommandRegistry,
    cipher: Option<Box<dyn CipherService>>,
}

impl Session {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_history_capacity(store, history::DEFAULT_CAPACITY)
    }

    pub fn with_history_capacity(store: Box<dyn KeyValueStore>, capacity: usize) -> Self {
        let fs = match store.get(FS_KEY) {
            Some(text) => match snapshot::parse(&text) {
                Ok(fs) => {
                    log::debug!("restored filesystem snapshot ({} bytes)", text.len());
                    fs
                },
                Err(err) => {
                    log::warn!("discarding corrupt filesystem snapshot: {err}");
                    seed::seed_filesystem()
                },
            },
            None => seed::seed_filesystem(),
        };
        let history = match store.get(HISTORY_KEY) {
            Some(text) => History::deserialize(&text, capacity),
            None => History::with_capacity(capacity),
        };
        Self {
            fs,
            history,
            store,
            registry: CommandRegistry::new(),
            cipher: None,
        }
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Inject the encryption backend used by `encrypt`/`decrypt`.
    pub fn set_cipher(&mut self, cipher: Box<dyn CipherService>) {
        self.cipher = Some(cipher);
    }

    pub fn fs(&self) -> &FileSystem {
        &self.fs
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Interpret one input line.
    ///
    /// Lines that tokenize to nothing are ignored. Everything else is
    /// recorded in history before it runs, so `history` lists itself.
    /// A reboot signal rebuilds the seed tree and an empty history; the
    /// resulting state is persisted either way.
    pub fn run_line(&mut self, line: &str) -> Result<LineResult> {
        let tokens = interpreter::tokenize(line)?;
        if tokens.is_empty() {
            return Ok(LineResult::empty());
        }
        self.history.push(line.trim());

        let result = {
            let mut env = Environment {
                fs: &mut self.fs,
                history: &mut self.history,
                store: self.store.as_mut(),
                cipher: self.cipher.as_deref(),
            };
            self.registry.execute_tokens(tokens, &mut env)?
        };

        if result.signal == Some(Signal::Reboot) {
            log::debug!("reboot: rebuilding the seed tree");
            self.fs = seed::seed_filesystem();
            self.history = History::with_capacity(self.history.capacity());
        }

        self.persist()?;
        Ok(result)
    }

    fn persist(&mut self) -> Result<()> {
        self.store.set(FS_KEY, &snapshot::render(&self.fs))?;
        self.store.set(HISTORY_KEY, &self.history.serialize())?;
        Ok(())
    }
}
