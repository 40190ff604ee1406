//! File stage.
//!
//! Every selected file becomes an entry immediately. Files within the size
//! ceiling are uploaded concurrently, one task per file, with no cap and no
//! ordering between them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};

use ci_core::files::{FileSizePolicy, SelectedFile, UploadedFile};
use ci_core::ids::FileId;
use ci_core::ports::{FileTransferPort, Notice, NotificationPort, UploadProgressFn, WizardEventPort};

type Entries = Arc<Mutex<Vec<UploadedFile>>>;

pub struct FileStage {
    policy: FileSizePolicy,
    entries: Entries,
    uploads: tokio::sync::Mutex<JoinSet<()>>,
    transfer: Arc<dyn FileTransferPort>,
    notifier: Arc<dyn NotificationPort>,
    events: Arc<dyn WizardEventPort>,
}

impl FileStage {
    pub fn new(
        policy: FileSizePolicy,
        transfer: Arc<dyn FileTransferPort>,
        notifier: Arc<dyn NotificationPort>,
        events: Arc<dyn WizardEventPort>,
    ) -> Self {
        Self {
            policy,
            entries: Arc::new(Mutex::new(Vec::new())),
            uploads: tokio::sync::Mutex::new(JoinSet::new()),
            transfer,
            notifier,
            events,
        }
    }

    pub fn policy(&self) -> FileSizePolicy {
        self.policy
    }

    /// Add the selected files and start uploading those within the ceiling.
    pub async fn select(&self, files: Vec<SelectedFile>) -> Vec<FileId> {
        let mut ids = Vec::with_capacity(files.len());
        let mut oversized = Vec::new();

        for file in files {
            let entry = self.policy.admit(&file);
            let id = entry.id.clone();
            ids.push(id.clone());

            if entry.is_oversized() {
                debug!(file = %entry.name, size = entry.size, "file exceeds upload ceiling");
                oversized.push(entry.name.clone());
                lock(&self.entries).push(entry);
                continue;
            }

            lock(&self.entries).push(entry);
            self.spawn_upload(id, file).await;
        }

        for name in oversized {
            self.notifier
                .notify(Notice::error(format!(
                    "{name} is larger than the {} limit",
                    format_size(self.policy.max_file_size)
                )))
                .await;
        }
        self.emit().await;
        ids
    }

    /// Remove an entry locally; delete the remote copy when it finished uploading.
    ///
    /// Remote failures are reported as a notification and never block removal.
    pub async fn remove(&self, id: &FileId) -> Option<UploadedFile> {
        let removed = {
            let mut entries = lock(&self.entries);
            let index = entries.iter().position(|entry| &entry.id == id)?;
            entries.remove(index)
        };
        self.emit().await;

        if let (true, Some(public_id)) = (removed.is_uploaded(), removed.public_id.as_deref()) {
            if let Err(err) = self.transfer.delete(public_id).await {
                warn!(file = %removed.name, error = %err, "remote file deletion failed");
                self.notifier
                    .notify(Notice::error(format!(
                        "Could not delete {} from the server: {err}",
                        removed.name
                    )))
                    .await;
            }
        }
        Some(removed)
    }

    pub fn files(&self) -> Vec<UploadedFile> {
        lock(&self.entries).clone()
    }

    pub fn uploaded_files(&self) -> Vec<UploadedFile> {
        lock(&self.entries)
            .iter()
            .filter(|entry| entry.is_uploaded())
            .cloned()
            .collect()
    }

    pub fn has_pending_uploads(&self) -> bool {
        lock(&self.entries).iter().any(UploadedFile::is_in_flight)
    }

    /// Wait for every upload started so far.
    pub async fn wait_idle(&self) {
        let mut uploads = self.uploads.lock().await;
        while let Some(joined) = uploads.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "upload task ended abnormally");
            }
        }
    }

    /// Forget all entries. In-flight uploads keep running; their results are
    /// dropped because the entries are gone.
    pub async fn clear(&self) {
        lock(&self.entries).clear();
        reap_finished(&mut *self.uploads.lock().await);
        self.emit().await;
    }

    async fn spawn_upload(&self, id: FileId, file: SelectedFile) {
        let entries = Arc::clone(&self.entries);
        let transfer = Arc::clone(&self.transfer);
        let notifier = Arc::clone(&self.notifier);
        let events = Arc::clone(&self.events);
        let span = info_span!("usecase.file_stage.upload", file = %file.name, size = file.size());

        let progress: UploadProgressFn = {
            let entries = Arc::clone(&entries);
            let id = id.clone();
            Arc::new(move |sent: u64, total: u64| {
                if let Some(entry) = lock(&entries).iter_mut().find(|entry| entry.id == id) {
                    entry.record_progress(sent, total);
                }
            })
        };

        let task = async move {
            let name = file.name.clone();
            let result = transfer.upload(file, progress).await;

            let still_listed = {
                let mut entries = lock(&entries);
                match entries.iter_mut().find(|entry| entry.id == id) {
                    Some(entry) => {
                        match &result {
                            Ok(receipt) => {
                                entry.mark_uploaded(receipt.url.clone(), receipt.public_id.clone())
                            }
                            Err(err) => entry.mark_failed(err.to_string()),
                        }
                        true
                    }
                    None => false,
                }
            };

            match result {
                Ok(receipt) if still_listed => {
                    info!(url = %receipt.url, "file uploaded");
                }
                Ok(receipt) => {
                    debug!("file removed while uploading, discarding remote copy");
                    if let Some(public_id) = receipt.public_id.as_deref() {
                        if let Err(err) = transfer.delete(public_id).await {
                            warn!(error = %err, "failed to discard orphaned upload");
                        }
                    }
                    return;
                }
                Err(err) if still_listed => {
                    warn!(error = %err, "file upload failed");
                    notifier
                        .notify(Notice::error(format!("Failed to upload {name}: {err}")))
                        .await;
                }
                Err(_) => return,
            }

            let snapshot = lock(&entries).clone();
            events.emit_files_changed(&snapshot).await;
        }
        .instrument(span);

        let mut uploads = self.uploads.lock().await;
        reap_finished(&mut uploads);
        uploads.spawn(task);
    }

    async fn emit(&self) {
        let snapshot = self.files();
        self.events.emit_files_changed(&snapshot).await;
    }
}

fn lock(entries: &Mutex<Vec<UploadedFile>>) -> MutexGuard<'_, Vec<UploadedFile>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drop tasks that already finished so the set only tracks live uploads.
fn reap_finished(uploads: &mut JoinSet<()>) {
    while let Some(joined) = uploads.try_join_next() {
        if let Err(err) = joined {
            warn!(error = %err, "upload task ended abnormally");
        }
    }
}

fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}
