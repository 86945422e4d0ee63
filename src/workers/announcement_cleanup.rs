use crate::store::Store;

pub async fn run(store: &Store) {
    tracing::debug!("announcement_cleanup: start");
    match store.cleanup_expired_announcements() {
        Ok(count) => tracing::info!(cleaned = count, "announcement_cleanup: done"),
        Err(e) => tracing::error!(error=%e, "announcement_cleanup failed"),
    }
}
