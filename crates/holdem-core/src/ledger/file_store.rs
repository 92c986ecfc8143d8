// JSON-file persistence for the League.
//
// The file holds a JSON array of `{"Name", "Wins"}` objects. The whole array is
// re-encoded after every recorded win and swapped into place with a rename, so
// a reader of the file sees either the previous league or the new one.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use super::{League, LedgerError, Player, PlayerStore};

/// File-backed [`PlayerStore`]. The league is loaded once on open and kept in
/// memory; the file is rewritten on every win.
pub struct FileSystemPlayerStore {
    path: PathBuf,
    league: RwLock<League>,
}

impl FileSystemPlayerStore {
    /// Open (or create) the store at `path` and load the league from it.
    ///
    /// An empty file is seeded with `[]` before decoding. A file that does not
    /// decode as a league is an error: the store must not be served corrupt.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LedgerError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LedgerError::Io {
                path: path.clone(),
                source,
            })?;

        initialise_store_file(&mut file).map_err(|source| LedgerError::Io {
            path: path.clone(),
            source,
        })?;

        let league =
            League::from_reader(BufReader::new(&file)).map_err(|source| LedgerError::Decode {
                path: path.clone(),
                source,
            })?;

        info!(
            "Loaded {} players from {}",
            league.len(),
            path.display()
        );

        Ok(Self {
            path,
            league: RwLock::new(league),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Panics if the lock is poisoned (another thread panicked while holding
    /// it). This should never happen in normal operation.
    fn read_league(&self) -> RwLockReadGuard<'_, League> {
        self.league.read().expect("player store lock poisoned")
    }

    fn write_league(&self) -> RwLockWriteGuard<'_, League> {
        self.league.write().expect("player store lock poisoned")
    }

    /// Encode `league` into a sibling temp file and rename it over the store.
    fn persist(&self, league: &League) -> Result<(), LedgerError> {
        let encoded = serde_json::to_vec(league)?;
        let staging = self.staging_path();

        let io_err = |source| LedgerError::Io {
            path: staging.clone(),
            source,
        };
        let mut file = File::create(&staging).map_err(io_err)?;
        file.write_all(&encoded).map_err(io_err)?;
        file.write_all(b"\n").map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        fs::rename(&staging, &self.path).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PlayerStore for FileSystemPlayerStore {
    fn find(&self, name: &str) -> Option<Player> {
        self.read_league().find(name).cloned()
    }

    fn record_win(&self, name: &str) -> Result<(), LedgerError> {
        let mut league = self.write_league();

        // Stage on a copy so a failed write leaves memory and disk in agreement.
        let mut staged = league.clone();
        let wins = staged.record_win(name);
        self.persist(&staged)?;
        *league = staged;

        debug!("Recorded win for {name} (now {wins})");
        Ok(())
    }

    fn get_league(&self) -> Vec<Player> {
        self.read_league().ranked()
    }
}

/// Seed an empty file with `[]` and rewind it for decoding.
fn initialise_store_file(file: &mut File) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(0))?;

    if file.metadata()?.len() == 0 {
        file.write_all(b"[]")?;
        file.sync_all()?;
        file.seek(SeekFrom::Start(0))?;
    }

    Ok(())
}
