use gl_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("run configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("a run needs at least one participant")]
    NoParticipants,

    #[error("{0} participants exceed the ParticipantId range")]
    TooManyParticipants(usize),
}

pub type SimResult<T> = Result<T, SimError>;
