use artisan_core::gallery::GALLERY_KEY;
use artisan_core::{
    AlwaysAuthorized, AppError, AuthorizationGate, CaptureSource, Displayed, FileStorage,
    GalleryItem, GalleryStore, GenerationClient, GenerationError, GenerationRequest,
    MemoryStorage, Screen, StateController, StyleCatalog, View,
};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Replies with queued results and records every request it receives.
#[derive(Clone, Default)]
struct ScriptedClient {
    replies: Arc<Mutex<Vec<Result<String, GenerationError>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedClient {
    fn replying(replies: Vec<Result<String, GenerationError>>) -> Self {
        let client = Self::default();
        *client.replies.lock().unwrap() = replies.into_iter().rev().collect();
        client
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl GenerationClient for ScriptedClient {
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'_, Result<String, GenerationError>> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(GenerationError::Unknown("no scripted reply".into())));
        Box::pin(async move { reply })
    }
}

/// A gate whose answer can be flipped from the test.
#[derive(Clone)]
struct SwitchGate {
    open: Arc<AtomicBool>,
    grants: Arc<AtomicUsize>,
}

impl SwitchGate {
    fn new(open: bool) -> Self {
        Self {
            open: Arc::new(AtomicBool::new(open)),
            grants: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl AuthorizationGate for SwitchGate {
    fn has_access(&self) -> BoxFuture<'_, bool> {
        let open = self.open.load(Ordering::SeqCst);
        Box::pin(async move { open })
    }

    fn grant_access(&self) -> BoxFuture<'_, ()> {
        self.grants.fetch_add(1, Ordering::SeqCst);
        self.open.store(true, Ordering::SeqCst);
        Box::pin(async {})
    }
}

/// Records whether it is currently holding its device.
#[derive(Default)]
struct FakeCamera {
    fail_start: bool,
    blank_frame: bool,
    acquired: bool,
    releases: usize,
}

impl CaptureSource for FakeCamera {
    fn start(&mut self) -> BoxFuture<'_, artisan_core::Result<()>> {
        Box::pin(async move {
            if self.fail_start {
                return Err(AppError::capture("permission denied"));
            }
            self.acquired = true;
            Ok(())
        })
    }

    fn capture(&mut self) -> artisan_core::Result<String> {
        if self.acquired && self.blank_frame {
            Ok(String::new())
        } else if self.acquired {
            Ok("data:image/jpeg;base64,RlJBTUU=".to_string())
        } else {
            Err(AppError::DeviceUnavailable)
        }
    }

    fn release(&mut self) {
        self.acquired = false;
        self.releases += 1;
    }
}

async fn start_with(
    storage: MemoryStorage,
    client: ScriptedClient,
    gate: impl AuthorizationGate + 'static,
) -> StateController {
    StateController::start(
        GalleryStore::load(Box::new(storage)),
        Box::new(client),
        Box::new(gate),
    )
    .await
}

fn saved(id: &str, timestamp: i64, style_id: &str) -> GalleryItem {
    GalleryItem {
        id: id.to_string(),
        original_image: format!("orig-{}", id),
        processed_image: format!("proc-{}", id),
        style_id: style_id.to_string(),
        timestamp,
    }
}

fn storage_with(items: &[GalleryItem]) -> MemoryStorage {
    MemoryStorage::with_entry(GALLERY_KEY, &serde_json::to_string(items).unwrap())
}

#[tokio::test]
async fn capture_generate_save() {
    let client = ScriptedClient::replying(vec![Ok("Y".into())]);
    let mut controller = start_with(MemoryStorage::new(), client.clone(), AlwaysAuthorized).await;

    controller.handle_capture("X");
    assert_eq!(controller.state().view, View::Editing);
    assert_eq!(controller.state().image.as_deref(), Some("X"));

    controller.select_style("renaissance");
    controller.handle_generate().await;
    let state = controller.state();
    assert_eq!(state.view, View::Result);
    assert_eq!(state.processed_image.as_deref(), Some("Y"));
    assert!(!state.is_processing);

    let requests = client.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].image_data, "X");
    let renaissance = StyleCatalog::default().find("renaissance").unwrap();
    assert_eq!(requests[0].instruction_text, renaissance.prompt);

    controller.save_to_gallery();
    let first = &controller.state().gallery[0];
    assert_eq!(first.original_image, "X");
    assert_eq!(first.processed_image, "Y");
    assert_eq!(first.style_id, "renaissance");
    assert_eq!(controller.state().view, View::Gallery);
}

#[tokio::test]
async fn invalid_credential_keeps_the_editor() {
    let client = ScriptedClient::replying(vec![Err(GenerationError::InvalidCredential)]);
    let mut controller = start_with(MemoryStorage::new(), client, AlwaysAuthorized).await;

    controller.handle_capture("X");
    controller.select_style("charcoal");
    controller.handle_generate().await;

    let state = controller.state();
    assert!(!state.authorized);
    assert!(!state.is_processing);
    assert!(state.error.is_some());
    assert_eq!(state.view, View::Editing);
    assert_eq!(state.image.as_deref(), Some("X"));
    assert_eq!(state.selected_style.unwrap().id, "charcoal");
    assert_eq!(state.displayed(), Displayed::Authorization);
}

#[tokio::test]
async fn other_failures_allow_retry() {
    let client = ScriptedClient::replying(vec![
        Err(GenerationError::EmptyResult),
        Ok("Y".into()),
    ]);
    let mut controller = start_with(MemoryStorage::new(), client.clone(), AlwaysAuthorized).await;

    controller.handle_capture("X");
    controller.handle_generate().await;
    assert!(controller.state().authorized);
    assert_eq!(controller.state().view, View::Editing);
    assert_eq!(
        controller.state().error.as_deref(),
        Some(GenerationError::EmptyResult.to_string().as_str())
    );

    controller.handle_generate().await;
    assert_eq!(controller.state().view, View::Result);
    assert!(controller.state().error.is_none());
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn deleting_the_viewed_item_returns_to_gallery() {
    let storage = storage_with(&[saved("B", 2, "renaissance"), saved("A", 1, "renaissance")]);
    let mut controller = start_with(storage, ScriptedClient::default(), AlwaysAuthorized).await;

    controller.open_gallery_item("B");
    assert_eq!(controller.state().selected_gallery_item().unwrap().id, "B");

    controller.delete_gallery_item("B");
    let state = controller.state();
    let ids: Vec<&str> = state.gallery.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["A"]);
    assert!(state.selected_gallery_item().is_none());
    assert_eq!(state.view, View::Gallery);
}

#[tokio::test]
async fn corrupt_store_starts_empty() {
    let storage = MemoryStorage::with_entry(GALLERY_KEY, "definitely not json");
    let controller = start_with(storage, ScriptedClient::default(), AlwaysAuthorized).await;
    assert!(controller.state().gallery.is_empty());
    assert_eq!(controller.state().view, View::Home);
}

#[tokio::test]
async fn generate_without_image_or_style_changes_nothing() {
    let client = ScriptedClient::replying(vec![Ok("Y".into())]);
    let mut controller = start_with(MemoryStorage::new(), client.clone(), AlwaysAuthorized).await;

    let before = controller.state().clone();
    controller.handle_generate().await;
    assert_eq!(controller.state(), &before);
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn set_view_is_idempotent() {
    let mut controller =
        start_with(MemoryStorage::new(), ScriptedClient::default(), AlwaysAuthorized).await;
    controller.handle_capture("X");

    controller.set_view(Screen::Gallery);
    let once = controller.state().clone();
    controller.set_view(Screen::Gallery);
    assert_eq!(controller.state(), &once);
    assert!(once.error.is_none());

    controller.set_view(Screen::Result);
    assert_eq!(controller.state().view, View::Gallery);
}

#[tokio::test]
async fn closed_gate_blocks_generation_until_granted() {
    let gate = SwitchGate::new(false);
    let client = ScriptedClient::replying(vec![Ok("Y".into())]);
    let mut controller = start_with(MemoryStorage::new(), client.clone(), gate.clone()).await;
    assert_eq!(controller.state().displayed(), Displayed::Authorization);

    controller.handle_capture("X");
    assert_eq!(controller.state().view, View::Editing);

    controller.handle_generate().await;
    assert_eq!(client.request_count(), 0);
    assert!(!controller.state().is_processing);

    controller.grant_access().await;
    assert_eq!(gate.grants.load(Ordering::SeqCst), 1);
    assert!(controller.state().authorized);

    controller.handle_generate().await;
    assert_eq!(controller.state().view, View::Result);
}

#[tokio::test]
async fn gate_is_rechecked_before_each_request() {
    let gate = SwitchGate::new(true);
    let client = ScriptedClient::replying(vec![Ok("Y".into())]);
    let mut controller = start_with(MemoryStorage::new(), client.clone(), gate.clone()).await;
    assert!(controller.state().authorized);

    controller.handle_capture("X");
    gate.open.store(false, Ordering::SeqCst);
    controller.handle_generate().await;
    assert!(!controller.state().authorized);
    assert_eq!(client.request_count(), 0);

    gate.open.store(true, Ordering::SeqCst);
    controller.refresh_authorization().await;
    assert!(controller.state().authorized);
}

#[tokio::test]
async fn re_edit_falls_back_for_dangling_styles() {
    let storage = storage_with(&[saved("A", 1, "cubist"), saved("B", 0, "cyberpunk")]);
    let mut controller = start_with(storage, ScriptedClient::default(), AlwaysAuthorized).await;

    let dangling = controller.state().gallery[0].clone();
    controller.re_edit_item(&dangling);
    let state = controller.state();
    assert_eq!(state.view, View::Editing);
    assert_eq!(state.image.as_deref(), Some("orig-A"));
    assert_eq!(state.selected_style.unwrap().id, "renaissance");
    assert!(state.processed_image.is_none());

    let known = controller.state().gallery[1].clone();
    controller.re_edit_item(&known);
    assert_eq!(controller.state().selected_style.unwrap().id, "cyberpunk");
}

#[tokio::test]
async fn capture_source_is_released_on_success() {
    let mut controller =
        start_with(MemoryStorage::new(), ScriptedClient::default(), AlwaysAuthorized).await;
    let mut camera = FakeCamera::default();

    controller.capture_from(&mut camera).await;
    assert_eq!(controller.state().view, View::Editing);
    assert_eq!(
        controller.state().image.as_deref(),
        Some("data:image/jpeg;base64,RlJBTUU=")
    );
    assert!(!camera.acquired);
    assert_eq!(camera.releases, 1);
}

#[tokio::test]
async fn unavailable_capture_returns_home() {
    let mut controller =
        start_with(MemoryStorage::new(), ScriptedClient::default(), AlwaysAuthorized).await;
    let mut camera = FakeCamera {
        fail_start: true,
        ..FakeCamera::default()
    };

    controller.capture_from(&mut camera).await;
    let state = controller.state();
    assert_eq!(state.view, View::Home);
    assert!(state.error.as_deref().unwrap().contains("permission denied"));
    assert!(state.image.is_none());
    assert_eq!(camera.releases, 1);
}

#[tokio::test]
async fn failed_gallery_write_keeps_session_copy() {
    let client = ScriptedClient::replying(vec![Ok("Y".into())]);
    let storage = MemoryStorage::new().failing_writes();
    let mut controller = start_with(storage, client, AlwaysAuthorized).await;

    controller.handle_capture("X");
    controller.handle_generate().await;
    controller.save_to_gallery();

    assert_eq!(controller.state().gallery.len(), 1);
    assert!(controller.state().error.is_none());
}

#[tokio::test]
async fn gallery_survives_restart() {
    let dir = TempDir::new().unwrap();
    let client = ScriptedClient::replying(vec![Ok("Y1".into()), Ok("Y2".into())]);

    let mut controller = StateController::start(
        GalleryStore::load(Box::new(FileStorage::new(dir.path()))),
        Box::new(client),
        Box::new(AlwaysAuthorized),
    )
    .await;

    controller.handle_capture("X1");
    controller.handle_generate().await;
    controller.save_to_gallery();
    controller.handle_capture("X2");
    controller.select_style("sculpture");
    controller.handle_generate().await;
    controller.save_to_gallery();
    let saved = controller.state().gallery.clone();

    let restarted = StateController::start(
        GalleryStore::load(Box::new(FileStorage::new(dir.path()))),
        Box::new(ScriptedClient::default()),
        Box::new(AlwaysAuthorized),
    )
    .await;

    assert_eq!(restarted.state().gallery, saved);
    assert_eq!(saved[0].processed_image, "Y2");
    assert_eq!(saved[0].style_id, "sculpture");
    assert_eq!(saved[1].processed_image, "Y1");
}

#[tokio::test]
async fn changing_style_discards_the_previous_rendering() {
    let client = ScriptedClient::replying(vec![Ok("Y".into())]);
    let mut controller = start_with(MemoryStorage::new(), client, AlwaysAuthorized).await;

    controller.handle_capture("X");
    controller.handle_generate().await;
    controller.set_view(Screen::Editing);
    controller.select_style("charcoal");
    assert!(controller.state().processed_image.is_none());

    controller.set_view(Screen::Result);
    assert_eq!(controller.state().view, View::Editing);

    controller.save_to_gallery();
    assert!(controller.state().gallery.is_empty());
}

#[tokio::test]
async fn changing_style_on_the_result_view_returns_to_the_editor() {
    let client = ScriptedClient::replying(vec![Ok("Y".into())]);
    let mut controller = start_with(MemoryStorage::new(), client, AlwaysAuthorized).await;

    controller.handle_capture("X");
    controller.handle_generate().await;
    controller.select_style("renaissance");
    assert_eq!(controller.state().processed_image.as_deref(), Some("Y"));

    controller.select_style("sculpture");
    assert_eq!(controller.state().view, View::Editing);
    assert!(controller.state().processed_image.is_none());
}

#[tokio::test]
async fn new_capture_discards_the_previous_rendering() {
    let client = ScriptedClient::replying(vec![Ok("Y".into())]);
    let mut controller = start_with(MemoryStorage::new(), client, AlwaysAuthorized).await;

    controller.handle_capture("X");
    controller.handle_generate().await;
    controller.handle_capture("Z");
    let state = controller.state();
    assert_eq!(state.view, View::Editing);
    assert_eq!(state.image.as_deref(), Some("Z"));
    assert!(state.processed_image.is_none());

    controller.save_to_gallery();
    assert!(controller.state().gallery.is_empty());
}

#[tokio::test]
async fn capture_is_refused_while_a_request_is_in_flight() {
    let mut controller =
        start_with(MemoryStorage::new(), ScriptedClient::default(), AlwaysAuthorized).await;

    controller.handle_capture("X");
    assert!(controller.begin_generate().is_some());

    controller.handle_capture("Z");
    let mut camera = FakeCamera::default();
    controller.capture_from(&mut camera).await;
    assert_eq!(camera.releases, 0);
    assert_eq!(controller.state().image.as_deref(), Some("X"));

    controller.finish_generate(Ok("Y".into()));
    controller.save_to_gallery();
    let first = &controller.state().gallery[0];
    assert_eq!(first.original_image, "X");
    assert_eq!(first.processed_image, "Y");
}

#[tokio::test]
async fn blank_frame_returns_home_with_an_error() {
    let mut controller =
        start_with(MemoryStorage::new(), ScriptedClient::default(), AlwaysAuthorized).await;
    let mut camera = FakeCamera {
        blank_frame: true,
        ..FakeCamera::default()
    };

    controller.capture_from(&mut camera).await;
    let state = controller.state();
    assert_eq!(state.view, View::Home);
    assert!(state.error.is_some());
    assert!(state.image.is_none());
    assert_eq!(camera.releases, 1);
}
