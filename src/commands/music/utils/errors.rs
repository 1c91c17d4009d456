use thiserror::Error;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("The queue is empty")]
    QueueEmpty,

    #[error("The queue has no current track")]
    NoCurrentTrack,

    #[error("No tracks found")]
    NoTracksFound,

    #[error("Already connected to a voice channel")]
    AlreadyConnected,

    #[error("No suitable voice channel")]
    NoVoiceChannel,

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("The player is already paused")]
    PlayerAlreadyPaused,

    #[error("Nothing is playing")]
    NothingPlaying,

    #[error("No more tracks in the queue")]
    NoMoreTracks,

    #[error("Invalid repeat mode: {0}")]
    InvalidRepeatMode(String),

    #[error("Volume {0} is above the maximum")]
    VolumeTooHigh(i64),

    #[error("Volume {0} is below the minimum")]
    VolumeTooLow(i64),

    #[error("Already at max volume")]
    MaxVolume,

    #[error("Already at min volume")]
    MinVolume,

    #[error("Playback node error: {0}")]
    Node(String),

    #[error("Audio source error: {0}")]
    AudioSource(String),

    #[error(transparent)]
    Discord(#[from] serenity::Error),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

impl From<songbird::error::JoinError> for MusicError {
    fn from(err: songbird::error::JoinError) -> Self {
        MusicError::Node(err.to_string())
    }
}

impl From<songbird::error::ControlError> for MusicError {
    fn from(err: songbird::error::ControlError) -> Self {
        MusicError::Node(err.to_string())
    }
}
