//! Application Coordinator
//!
//! Owns the state shared between views: the camera list, which view is
//! visible, the selected camera (map focus) and the camera open in the
//! history viewer. Selection and the open viewer are independent.

use serde::Serialize;

use crate::browse::{list_cameras, ListEntry, ListMode, ListQuery};
use crate::catalog::{Camera, CameraLoader, GeoPoint};
use crate::map::{markers, MapView, Marker};
use crate::viewer::HistoryViewer;

/// Viewports narrower than this switch to the map after a list selection
pub const NARROW_VIEWPORT_PX: u32 = 768;

/// Which pane is visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Map,
    List,
}

pub struct App {
    cameras: Vec<Camera>,
    loading: bool,
    view_mode: ViewMode,
    selected: Option<Camera>,
    fly_to: bool,
    map: MapView,
    list: ListQuery,
    viewer: HistoryViewer,
    open_camera: Option<Camera>,
}

impl App {
    pub fn new(viewer: HistoryViewer) -> Self {
        Self {
            cameras: Vec::new(),
            loading: false,
            view_mode: ViewMode::default(),
            selected: None,
            fly_to: false,
            map: MapView::default(),
            list: ListQuery::default(),
            viewer,
            open_camera: None,
        }
    }

    /// Load the camera list; failures leave it empty
    pub async fn load(&mut self, loader: &CameraLoader) {
        self.loading = true;
        let catalog = loader.load_or_empty().await;
        self.cameras = catalog.cameras;
        self.loading = false;
    }

    pub fn set_cameras(&mut self, cameras: Vec<Camera>) {
        self.cameras = cameras;
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn selected(&self) -> Option<&Camera> {
        self.selected.as_ref()
    }

    /// Whether the map should animate to the selection
    pub fn should_fly(&self) -> bool {
        self.fly_to
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Selection from the list: focus the map on the camera, and bring the
    /// map to front on narrow screens
    pub fn select_from_list(&mut self, camera: &Camera, viewport_width: u32) {
        self.selected = Some(camera.clone());
        self.fly_to = true;
        self.map.fly_to(camera);

        if viewport_width < NARROW_VIEWPORT_PX {
            self.view_mode = ViewMode::Map;
        }
    }

    /// Selection by clicking a marker: no camera movement
    pub fn select_on_map(&mut self, camera: &Camera) {
        self.selected = Some(camera.clone());
        self.fly_to = false;
    }

    /// Open the history viewer; selection is left alone
    pub async fn open_viewer(&mut self, camera: Camera) {
        self.open_camera = Some(camera.clone());
        self.viewer.open(camera).await;
    }

    pub fn close_viewer(&mut self) {
        self.open_camera = None;
        self.viewer.close();
    }

    pub fn open_camera(&self) -> Option<&Camera> {
        self.open_camera.as_ref()
    }

    pub fn viewer(&self) -> &HistoryViewer {
        &self.viewer
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.list.search = term.into();
    }

    /// Geolocation result; `None` when unavailable or denied
    pub fn set_location(&mut self, location: Option<GeoPoint>) {
        self.list.location = location;
    }

    pub fn set_list_mode(&mut self, mode: ListMode) {
        self.list.mode = mode;
    }

    pub fn set_nearest_limit(&mut self, limit: usize) {
        self.list.limit = limit;
    }

    /// Rows of the list view
    pub fn list_entries(&self) -> Vec<ListEntry> {
        list_cameras(&self.cameras, &self.list)
    }

    /// Markers of the map view
    pub fn markers(&self) -> Vec<Marker> {
        markers(
            &self.cameras,
            self.selected.as_ref().map(|c| c.id.as_str()),
            self.viewer.image_base_url(),
        )
    }
}
