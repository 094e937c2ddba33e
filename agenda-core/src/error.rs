//! Error types for the agenda.

use thiserror::Error;

/// Errors that can occur in agenda operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("No se puede {action} ({from})")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error("Cita no encontrada: {0}")]
    EventNotFound(String),

    #[error("El servidor respondió {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Error de conexión: {0}")]
    Http(String),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Respuesta inválida: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AgendaError {
    fn from(e: serde_json::Error) -> Self {
        AgendaError::Serialization(e.to_string())
    }
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
