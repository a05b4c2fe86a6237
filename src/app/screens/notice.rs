use std::time::{Duration, Instant};

/// 通知顯示多久後自動消失
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    raised_at: Instant,
}

impl Notice {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) < NOTICE_TTL
    }
}

/// 每個畫面一個，新訊息覆蓋舊訊息
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn info(&mut self, message: impl Into<String>) {
        self.raise(NoticeKind::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(NoticeKind::Error, message.into());
    }

    fn raise(&mut self, kind: NoticeKind, message: String) {
        match kind {
            NoticeKind::Info => tracing::info!("{}", message),
            NoticeKind::Error => tracing::warn!("{}", message),
        }
        self.current = Some(Notice {
            kind,
            message,
            raised_at: Instant::now(),
        });
    }

    /// 目前仍在顯示期間的通知
    pub fn active(&self) -> Option<&Notice> {
        self.active_at(Instant::now())
    }

    pub fn active_at(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| n.is_visible_at(now))
    }

    /// 最後一則通知，不管是否已過期
    pub fn last(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

/// 刪除前的互動確認
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
