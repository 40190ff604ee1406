//! End-to-end wizard flows against mocked ports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;

use ci_app::{IntakeDeps, WizardOrchestrator};
use ci_core::files::{FileSizePolicy, SelectedFile, UploadStatus, UploadedFile};
use ci_core::intake::{
    ConsultationRequest, ContactInfo, FeaturesData, PaymentData, ProjectData, SubmissionReceipt,
};
use ci_core::ports::{
    ApiError, AuthSessionPort, AuthUser, FileTransferPort, IntakeApiPort, Notice, NoticeLevel,
    NotificationPort, RegistrationRequest, SnapshotStorePort, UploadProgressFn, UploadReceipt,
    WizardEventPort,
};
use ci_core::session::{RestorePhase, SessionSnapshot, SnapshotKey};
use ci_core::wizard::{AuthGate, RegisterStage, WizardState, WizardStep};
use ci_core::RetryPolicy;

mock! {
    pub Api {}

    #[async_trait]
    impl IntakeApiPort for Api {
        async fn check_email(&self, email: &str) -> Result<bool, ApiError>;
        async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError>;
        async fn submit_consultation(
            &self,
            request: &ConsultationRequest,
        ) -> Result<SubmissionReceipt, ApiError>;
    }
}

mock! {
    pub Transfer {}

    #[async_trait]
    impl FileTransferPort for Transfer {
        async fn upload(
            &self,
            file: SelectedFile,
            progress: UploadProgressFn,
        ) -> Result<UploadReceipt, ApiError>;
        async fn delete(&self, public_id: &str) -> Result<(), ApiError>;
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl SnapshotStorePort for Store {
        async fn load(&self, key: &SnapshotKey) -> anyhow::Result<Option<String>>;
        async fn save(&self, key: &SnapshotKey, value: String) -> anyhow::Result<()>;
        async fn remove(&self, key: &SnapshotKey) -> anyhow::Result<()>;
    }
}

#[derive(Default)]
struct StaticAuth {
    user: Mutex<Option<AuthUser>>,
}

impl StaticAuth {
    fn signed_in(email: &str) -> Self {
        Self {
            user: Mutex::new(Some(AuthUser {
                email: email.to_string(),
                name: None,
            })),
        }
    }
}

#[async_trait]
impl AuthSessionPort for StaticAuth {
    async fn current_user(&self) -> Option<AuthUser> {
        self.user.lock().unwrap().clone()
    }
    async fn sign_in(&self, user: AuthUser) {
        *self.user.lock().unwrap() = Some(user);
    }
    async fn sign_out(&self) {
        self.user.lock().unwrap().take();
    }
}

#[derive(Default)]
struct MemoryStore {
    entries: Mutex<HashMap<SnapshotKey, String>>,
}

#[async_trait]
impl SnapshotStorePort for MemoryStore {
    async fn load(&self, key: &SnapshotKey) -> anyhow::Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }
    async fn save(&self, key: &SnapshotKey, value: String) -> anyhow::Result<()> {
        self.entries.lock().unwrap().insert(key.clone(), value);
        Ok(())
    }
    async fn remove(&self, key: &SnapshotKey) -> anyhow::Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct Surface {
    notices: Mutex<Vec<Notice>>,
    states: AtomicU32,
    completions: Mutex<Vec<SubmissionReceipt>>,
}

#[async_trait]
impl NotificationPort for Surface {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[async_trait]
impl WizardEventPort for Surface {
    async fn emit_state_changed(&self, _state: &WizardState) {
        self.states.fetch_add(1, Ordering::SeqCst);
    }
    async fn emit_files_changed(&self, _files: &[UploadedFile]) {}
    async fn emit_intake_completed(&self, receipt: &SubmissionReceipt) {
        self.completions.lock().unwrap().push(receipt.clone());
    }
}

fn build(
    auth: StaticAuth,
    api: MockApi,
    transfer: MockTransfer,
    store: Arc<dyn SnapshotStorePort>,
) -> (WizardOrchestrator, Arc<Surface>) {
    let surface = Arc::new(Surface::default());
    let deps = IntakeDeps {
        auth: Arc::new(auth),
        api: Arc::new(api),
        file_transfer: Arc::new(transfer),
        snapshot_store: store,
        notifier: surface.clone(),
        events: surface.clone(),
    };
    let orchestrator =
        WizardOrchestrator::with_policies(deps, RetryPolicy::default(), FileSizePolicy::default());
    (orchestrator, surface)
}

fn shop() -> ProjectData {
    ProjectData {
        project_name: "Shop".into(),
        project_type: "web-app".into(),
        description: "We need an online shop for our bakery with ordering and delivery slots."
            .into(),
        timeline: "1-month".into(),
        budget: "5k-15k".into(),
    }
}

fn features() -> FeaturesData {
    FeaturesData {
        features: vec!["Product catalog".into(), "Checkout".into()],
        priority: "high".into(),
        integrations: Default::default(),
    }
}

#[tokio::test]
async fn authenticated_step_one_advances_without_network() {
    let mut api = MockApi::new();
    api.expect_check_email().never();
    let (wizard, _surface) = build(
        StaticAuth::signed_in("owner@shop.test"),
        api,
        MockTransfer::new(),
        Arc::new(MemoryStore::default()),
    );

    wizard.open().await.unwrap();
    wizard.update_project(shop()).await;
    let state = wizard.next().await;

    assert_eq!(state.step, WizardStep::Features);
    assert_eq!(state.gate, AuthGate::Closed);
}

#[tokio::test]
async fn new_email_goes_to_registration_not_login() {
    let mut api = MockApi::new();
    api.expect_check_email()
        .withf(|email| email == "new@x.com")
        .times(1)
        .returning(|_| Ok(false));
    let (wizard, _surface) = build(
        StaticAuth::default(),
        api,
        MockTransfer::new(),
        Arc::new(MemoryStore::default()),
    );

    wizard.open().await.unwrap();
    wizard
        .update_contact(ContactInfo {
            email: "new@x.com".into(),
        })
        .await;
    wizard.update_project(shop()).await;
    let state = wizard.next().await;

    assert_eq!(state.step, WizardStep::Description);
    assert_eq!(
        state.gate,
        AuthGate::Register {
            email: "new@x.com".into(),
            full_name: None,
            stage: RegisterStage::Name,
        }
    );
}

#[tokio::test]
async fn existing_email_shows_login_prompt_and_keeps_step() {
    let mut api = MockApi::new();
    api.expect_check_email().times(1).returning(|_| Ok(true));
    let (wizard, _surface) = build(
        StaticAuth::default(),
        api,
        MockTransfer::new(),
        Arc::new(MemoryStore::default()),
    );

    wizard.open().await.unwrap();
    wizard
        .update_contact(ContactInfo {
            email: "Client@Shop.test ".into(),
        })
        .await;
    wizard.update_project(shop()).await;
    let state = wizard.next().await;

    assert_eq!(state.step, WizardStep::Description);
    assert_eq!(
        state.gate,
        AuthGate::LoginPrompt {
            email: "client@shop.test".into()
        }
    );
    assert!(!state.can_continue());

    // Continue stays disabled while the prompt is open.
    let state = wizard.next().await;
    assert_eq!(state.step, WizardStep::Description);
}

#[tokio::test]
async fn email_check_failure_closes_gate_with_notice() {
    let mut api = MockApi::new();
    api.expect_check_email()
        .times(1)
        .returning(|_| Err(ApiError::Network("connection refused".into())));
    let (wizard, surface) = build(
        StaticAuth::default(),
        api,
        MockTransfer::new(),
        Arc::new(MemoryStore::default()),
    );

    wizard.open().await.unwrap();
    wizard
        .update_contact(ContactInfo {
            email: "new@x.com".into(),
        })
        .await;
    wizard.update_project(shop()).await;
    let state = wizard.next().await;

    assert_eq!(state.gate, AuthGate::Closed);
    assert!(state.error.is_some());
    let notices = surface.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn oversized_file_is_never_posted() {
    let mut transfer = MockTransfer::new();
    transfer.expect_upload().never();
    let (wizard, _surface) = build(
        StaticAuth::signed_in("owner@shop.test"),
        MockApi::new(),
        transfer,
        Arc::new(MemoryStore::default()),
    );

    let stage = wizard.file_stage();
    stage
        .select(vec![SelectedFile::new(
            "walkthrough.mp4",
            vec![0u8; 25 * 1024 * 1024],
        )])
        .await;
    stage.wait_idle().await;

    let files = stage.files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].status, UploadStatus::Oversized);
}

#[tokio::test]
async fn snapshot_is_read_at_most_once_per_session() {
    let snapshot = SessionSnapshot {
        project_data: shop(),
        features_data: features(),
        full_name: None,
        password: None,
    };
    let raw = snapshot.to_json().unwrap();

    let mut store = MockStore::new();
    store
        .expect_load()
        .withf(|key| key.as_str() == "sessionData_owner@shop.test")
        .times(1)
        .returning(move |_| Ok(Some(raw.clone())));
    store.expect_remove().times(1).returning(|_| Ok(()));

    let (wizard, _surface) = build(
        StaticAuth::signed_in("owner@shop.test"),
        MockApi::new(),
        MockTransfer::new(),
        Arc::new(store),
    );

    let state = wizard.open().await.unwrap();
    assert_eq!(state.step, WizardStep::Files);
    assert_eq!(state.draft.features, features());
    assert_eq!(wizard.restore_phase().await, RestorePhase::Consumed);

    // A later auth change in the same session does not read the store again.
    let state = wizard.on_auth_changed().await.unwrap();
    assert_eq!(state.step, WizardStep::Files);
}

#[tokio::test]
async fn full_flow_submits_uploaded_attachments() {
    let mut api = MockApi::new();
    api.expect_check_email().never();
    api.expect_submit_consultation()
        .withf(|request| {
            request.email.as_deref() == Some("owner@shop.test")
                && request.project.project_name == "Shop"
                && request.attachments.len() == 1
                && request.attachments[0].url == "https://cdn.test/brief.pdf"
        })
        .times(1)
        .returning(|_| {
            Ok(SubmissionReceipt {
                id: Some("cons-1".into()),
                message: Some("Thanks!".into()),
            })
        });

    let mut transfer = MockTransfer::new();
    transfer.expect_upload().times(1).returning(|file, progress| {
        progress(file.size(), file.size());
        Ok(UploadReceipt {
            url: format!("https://cdn.test/{}", file.name),
            public_id: Some("brief".into()),
        })
    });

    let (wizard, surface) = build(
        StaticAuth::signed_in("owner@shop.test"),
        api,
        transfer,
        Arc::new(MemoryStore::default()),
    );

    wizard.open().await.unwrap();
    wizard.update_project(shop()).await;
    assert_eq!(wizard.next().await.step, WizardStep::Features);
    wizard.update_features(features()).await;
    assert_eq!(wizard.next().await.step, WizardStep::Files);

    let stage = wizard.file_stage();
    stage
        .select(vec![SelectedFile::new("brief.pdf", b"%PDF-1.4".to_vec())])
        .await;
    stage.wait_idle().await;

    assert_eq!(wizard.next().await.step, WizardStep::Review);
    assert_eq!(wizard.next().await.step, WizardStep::Payment);

    // Terms not accepted yet: inline error, no submission.
    let state = wizard.next().await;
    assert!(!state.field_errors.is_empty());
    assert!(!state.completed);

    wizard
        .update_payment(PaymentData {
            terms_accepted: true,
            ..Default::default()
        })
        .await;
    let state = wizard.next().await;

    assert!(state.completed);
    assert!(!state.submitting);
    let completions = surface.completions.lock().unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].message.as_deref(), Some("Thanks!"));
}

#[tokio::test]
async fn back_then_next_returns_to_same_step() {
    let (wizard, _surface) = build(
        StaticAuth::signed_in("owner@shop.test"),
        MockApi::new(),
        MockTransfer::new(),
        Arc::new(MemoryStore::default()),
    );

    wizard.open().await.unwrap();
    wizard.update_project(shop()).await;
    wizard.update_features(features()).await;
    wizard.next().await;
    wizard.next().await;
    assert_eq!(wizard.get_state().await.step, WizardStep::Files);

    assert_eq!(wizard.back().await.step, WizardStep::Features);
    assert_eq!(wizard.next().await.step, WizardStep::Files);
}
