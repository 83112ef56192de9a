//! Classification of failed list/item requests.

/// Server-side failures split by whether the user can fix the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    Validation,
    Generic,
}

/// Why a request failed. Stored verbatim by the cache and passed through
/// the list controller untouched; nothing in the query layer retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authenticated")]
    Unauthorized,
    #[error("server error {status}: {message}")]
    Server {
        kind: ServerErrorKind,
        status: u16,
        message: String,
    },
    #[error("unexpected response: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Maps a non-success HTTP status plus the optional envelope message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_default();
        match status {
            401 => FetchError::Unauthorized,
            400 | 422 => FetchError::Server {
                kind: ServerErrorKind::Validation,
                status,
                message,
            },
            500..=599 | 402..=499 => FetchError::Server {
                kind: ServerErrorKind::Generic,
                status,
                message,
            },
            _ => FetchError::Unknown(format!("unexpected status {}", status)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }

    /// Текст для уведомления: сообщение сервера, если оно есть, иначе общий текст.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            FetchError::Server {
                kind: ServerErrorKind::Validation,
                ..
            } => "Проверьте введённые данные".to_string(),
            FetchError::Server { .. } => "Ошибка сервера, попробуйте позже".to_string(),
            FetchError::Unauthorized => "Сессия истекла, войдите заново".to_string(),
            FetchError::Network(_) => "Нет связи с сервером".to_string(),
            FetchError::Unknown(_) => "Не удалось обработать ответ сервера".to_string(),
        }
    }
}
