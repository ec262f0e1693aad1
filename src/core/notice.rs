//! Transient user-facing notices

use console::style;
use std::fmt;

/// Shown after a local file parses as JSON
pub fn upload_succeeded(name: &str) -> String {
    format!("{} 上传成功", name)
}

/// Shown when a local file cannot be read or is not valid JSON
pub const UPLOAD_PARSE_FAILED: &str = "文件解析失败，请上传正确的 JSON Schema 文件";

/// Shown when the remote listing or any raw fetch fails
pub const REMOTE_FETCH_FAILED: &str = "获取 Schema 列表失败";

/// Shown in place of a form while nothing is selected
pub const SELECT_PLACEHOLDER: &str = "请选择一个 Schema 以生成表单";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
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

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "{} {}", style("✓").green(), self.message),
            NoticeLevel::Error => write!(f, "{} {}", style("✗").red(), self.message),
        }
    }
}
