use serde::Serialize;

pub const TEXT_PLAIN: &str = "text/plain";

/// Serialized text ready to hand to a save dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlob {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub file_name: String,
}

impl TextBlob {
    /// Plain-text blob named `extracted-text-<unix_epoch_millis>.txt`
    pub fn plain_text(text: &str, timestamp_millis: i64) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            mime: TEXT_PLAIN,
            file_name: format!("extracted-text-{}.txt", timestamp_millis),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing notification raised by the session
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
