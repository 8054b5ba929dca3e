use std::{
    ffi::OsStr,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

use crate::config;

/// audio formats rodio decodes out of the box
const CHIME_EXTENSIONS: &[&str] = &["flac", "mp3", "ogg", "wav"];

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("couldn't open chime file {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("couldn't decode chime file {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    #[error("couldn't create audio sink: {0}")]
    Sink(#[from] rodio::PlayError),
}

/// fire-and-forget playback capability, injected so the scheduler can be
/// exercised without an audio device
pub trait Player {
    /// start playing the chime at `path`, returning as soon as playback
    /// has begun
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError>;
}

/// plays chimes through the default rodio output stream
pub struct RodioPlayer {
    // the stream must stay alive for detached sinks to keep playing
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RodioPlayer {
    #[must_use]
    pub fn new() -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(e) => {
                log::error!("no audio output device: {e}");
                None
            }
        };
        Self { output }
    }
}

impl Player for RodioPlayer {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let (_stream, handle) = self
            .output
            .as_ref()
            .ok_or(PlaybackError::NoOutputDevice)?;
        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let sink = Sink::try_new(handle)?;
        sink.append(source);
        sink.detach();
        Ok(())
    }
}

/// a selectable chime sound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chime {
    pub name: String,
    pub path: PathBuf,
}

/// scan `dir` for audio files, sorted by file name
///
/// an unreadable directory yields no chimes, which the gui reports as
/// "no chimes found"
#[must_use]
pub fn available_chimes(dir: &Path) -> Vec<Chime> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("couldn't read chime directory {}: {e}", dir.display());
            return Vec::new();
        }
    };
    let mut chimes: Vec<Chime> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().and_then(OsStr::to_str).is_some_and(|ext| {
                CHIME_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
        })
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some(Chime { name, path })
        })
        .collect();
    chimes.sort_by(|a, b| a.name.cmp(&b.name));
    chimes
}

/// copy an audio file into the chime directory so it shows up in the
/// chime selector
pub fn install_chime(source: &Path) -> io::Result<Chime> {
    let dir = config::chimes_path();
    std::fs::create_dir_all(&dir)?;
    let name = source.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "chime path has no file name")
    })?;
    let path = dir.join(name);
    std::fs::copy(source, &path)?;
    Ok(Chime {
        name: name.to_string_lossy().into_owned(),
        path,
    })
}
