use async_trait::async_trait;
use ci_core::ports::{Notice, NoticeLevel, NotificationPort};
use tracing::{error, info};

/// Notifications rendered as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationPort for TracingNotifier {
    async fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => error!(target: "notice", "{}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => {
                info!(target: "notice", level = ?notice.level, "{}", notice.message)
            }
        }
    }
}
