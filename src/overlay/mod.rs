use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;

use geo::Point;
use geojson::FeatureCollection;
use log::{debug, info, warn};

use crate::feature::builder::waypoint_collection;
use crate::feature::job::{BuiltRouteSet, FeatureJob};
use crate::host::{LayerSpec, MapStyle, NavigationHost};
use crate::route::Route;
use crate::style::{apply, RouteTheme};
use select::RouteSlot;

#[doc(hidden)]
pub mod error;
mod select;

#[doc(inline)]
pub use error::OverlayError;

type SelectionListener = Box<dyn FnMut(&Route)>;

/// Draws a set of candidate routes onto a map style host and keeps the
/// drawing current across primary-route changes, visibility toggles and
/// style reloads.
///
/// The overlay owns the route list and everything derived from it (the
/// feature collections, the tap-resolution registry and the created layer
/// ids) as one transactional unit: they are built together when a route
/// set is added and destroyed together when it is removed or replaced.
///
/// All map mutation happens on the thread that owns the overlay. Feature
/// construction is the only work that runs elsewhere; its completion is
/// drained with [`RouteOverlay::poll`] (or [`RouteOverlay::flush`]) on
/// the owning thread before any map object is touched.
pub struct RouteOverlay<M: MapStyle> {
    map: M,
    theme: RouteTheme,

    /// Anchor pinned by the caller; survives style reloads.
    configured_below: Option<String>,
    /// Anchor in effect, re-resolved from the style when not pinned.
    below_layer: Option<String>,

    routes: Vec<Route>,
    collections: Vec<FeatureCollection>,
    slots: Vec<RouteSlot>,
    waypoints: Option<FeatureCollection>,
    layer_ids: Vec<String>,

    primary_index: usize,
    alternatives_visible: bool,
    attached: bool,

    selection_listener: Option<SelectionListener>,
    pending: Option<FeatureJob>,
    generation: Arc<AtomicU64>,
}

impl<M: MapStyle> RouteOverlay<M> {
    pub fn new(map: M) -> Self {
        Self::with_theme(map, RouteTheme::default())
    }

    pub fn with_theme(map: M, theme: RouteTheme) -> Self {
        let mut overlay = RouteOverlay {
            map,
            theme,
            configured_below: None,
            below_layer: None,
            routes: Vec::new(),
            collections: Vec::new(),
            slots: Vec::new(),
            waypoints: None,
            layer_ids: Vec::new(),
            primary_index: 0,
            alternatives_visible: true,
            attached: false,
            selection_listener: None,
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
        };
        overlay.below_layer = apply::locate_below_anchor(&overlay.map);
        overlay
    }

    /// Pins the layer the route stack is inserted below, instead of
    /// resolving an anchor from the style's layer stack.
    pub fn set_below_layer(&mut self, layer_id: impl Into<String>) {
        let id = layer_id.into();
        self.configured_below = Some(id.clone());
        self.below_layer = Some(id);
    }

    /// Adds a single route to traverse along; no alternatives are drawn.
    pub fn add_route(&mut self, route: Route) -> crate::Result<()> {
        self.add_routes(vec![route])
    }

    /// Replaces the active route set. The first route is primary; the
    /// rest are drawn as alternatives. Any previous set is torn down
    /// first, and feature construction for the new set starts in the
    /// background, to be drained with [`RouteOverlay::poll`].
    pub fn add_routes(&mut self, routes: Vec<Route>) -> crate::Result<()> {
        if routes.is_empty() {
            return Err(OverlayError::EmptyRouteSet.into());
        }

        self.teardown();
        info!("Building features for {} route(s)", routes.len());

        self.alternatives_visible = routes.len() > 1;
        self.primary_index = 0;
        self.routes = routes;

        let generation = self.generation.load(Ordering::Acquire);
        self.pending = Some(FeatureJob::spawn(
            self.routes.clone(),
            generation,
            Arc::clone(&self.generation),
        ));
        Ok(())
    }

    /// Removes all routes from the map. Safe to call with nothing drawn.
    pub fn remove_routes(&mut self) {
        self.teardown();
    }

    /// Drains a finished feature build, then draws routes and waypoints.
    /// Call from the thread that owns the map, e.g. a render tick or a
    /// map-idle event. Completions from a superseded build are discarded.
    pub fn poll(&mut self) {
        match self.pending.as_ref().map(FeatureJob::try_complete) {
            Some(Ok(built)) => {
                self.pending = None;
                self.finish_build(built);
            }
            Some(Err(TryRecvError::Disconnected)) => {
                self.pending = None;
            }
            _ => {}
        }
    }

    /// Blocking [`RouteOverlay::poll`]: waits for an in-flight build and
    /// applies it before returning.
    pub fn flush(&mut self) {
        if let Some(job) = self.pending.take() {
            if let Some(built) = job.complete() {
                self.finish_build(built);
            }
        }
    }

    /// Toggles alternative-route visibility. The primary route's layers
    /// and the waypoint markers stay visible regardless.
    pub fn show_alternatives(&mut self, visible: bool) {
        self.alternatives_visible = visible;
        apply::toggle_alternatives(&mut self.map, &self.layer_ids, self.primary_index, visible);
    }

    /// Registers a listener fired when a tap promotes a different route
    /// to primary.
    pub fn set_selection_listener(&mut self, listener: impl FnMut(&Route) + 'static) {
        self.selection_listener = Some(Box::new(listener));
    }

    pub fn clear_selection_listener(&mut self) {
        self.selection_listener = None;
    }

    /// Resolves a map tap to the nearest registered route and promotes it
    /// to primary. No-op when nothing is registered or alternatives are
    /// hidden; an unresolvable tap changes nothing.
    pub fn on_map_click(&mut self, click: Point<f64>) {
        if self.slots.is_empty() || !self.alternatives_visible {
            return;
        }

        let Some(selected) = select::nearest_route(click, &self.slots) else {
            debug!("Tap projection indeterminate; ignoring click");
            return;
        };
        if selected == self.primary_index {
            return;
        }

        self.primary_index = selected;
        self.restyle_routes();

        if let Some(route) = self.routes.get(selected) {
            if let Some(listener) = self.selection_listener.as_mut() {
                listener(route);
            }
        }
    }

    /// Reacts to the map style finishing a (re)load. A style swap
    /// invalidates every prior layer and source binding, so the anchor is
    /// re-resolved and the whole presentation is rebuilt.
    pub fn on_style_loaded(&mut self) {
        self.below_layer = self
            .configured_below
            .clone()
            .or_else(|| apply::locate_below_anchor(&self.map));

        self.draw_routes();
        self.draw_waypoints();
        self.show_alternatives(self.alternatives_visible);
    }

    /// Registers the progress subscription with the navigation session.
    /// Invoked from the owning application's lifecycle start; repeated
    /// calls do not double-subscribe.
    pub fn attach<N: NavigationHost>(&mut self, navigation: &mut N) {
        if !self.attached {
            navigation.add_progress_listener();
            self.attached = true;
        }
    }

    /// Removes the progress subscription; lifecycle stop counterpart of
    /// [`RouteOverlay::attach`].
    pub fn detach<N: NavigationHost>(&mut self, navigation: &mut N) {
        if self.attached {
            navigation.remove_progress_listener();
            self.attached = false;
        }
    }

    /// Progress callback from the navigation session. A reroute (the
    /// session's route geometry differing from the current primary's)
    /// replaces the route set so the line reflects the new geometry.
    pub fn on_progress_update(&mut self, route: Route) {
        let rerouted = self
            .routes
            .get(self.primary_index)
            .map(|current| current.geometry != route.geometry)
            .unwrap_or(true);

        if rerouted {
            if let Err(err) = self.add_routes(vec![route]) {
                warn!("Unable to apply rerouted geometry: {err:?}");
            }
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn primary_index(&self) -> usize {
        self.primary_index
    }

    pub fn primary_route(&self) -> Option<&Route> {
        self.routes.get(self.primary_index)
    }

    pub fn alternatives_visible(&self) -> bool {
        self.alternatives_visible
    }

    pub fn theme(&self) -> &RouteTheme {
        &self.theme
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    fn finish_build(&mut self, built: BuiltRouteSet) {
        if built.generation != self.generation.load(Ordering::Acquire) {
            debug!("Dropping stale build result");
            return;
        }

        self.collections = built.collections;
        self.slots = built
            .lines
            .into_iter()
            .map(|line| RouteSlot { line })
            .collect();
        self.waypoints = self.routes.get(self.primary_index).map(waypoint_collection);

        self.draw_routes();
        self.draw_waypoints();
    }

    fn draw_routes(&mut self) {
        self.layer_ids.clear();
        let below = self.below_layer.clone();

        // Reverse order keeps the primary route (index zero) topmost:
        // layers added later sit above those added earlier.
        for index in (0..self.collections.len()).rev() {
            let source_id = crate::feature::route_source_id(index);
            self.map
                .upsert_geojson_source(&source_id, self.collections[index].clone());

            let primary = index == self.primary_index;
            let shield = apply::route_shield_layer(&self.theme, index, primary);
            let line = apply::route_line_layer(&self.theme, index, primary);

            self.layer_ids.push(shield.id.clone());
            self.layer_ids.push(line.id.clone());

            // Shield first, so it stays beneath the foreground line.
            self.map.add_layer(LayerSpec::Line(shield), below.as_deref());
            self.map.add_layer(LayerSpec::Line(line), below.as_deref());
        }
    }

    fn draw_waypoints(&mut self) {
        let Some(waypoints) = &self.waypoints else {
            return;
        };

        self.map
            .upsert_geojson_source(crate::feature::WAYPOINT_SOURCE_ID, waypoints.clone());

        if !self.map.has_layer(crate::feature::WAYPOINT_LAYER_ID) {
            let layer = apply::waypoint_layer(&self.theme);
            self.layer_ids.push(layer.id.clone());
            self.map
                .add_layer(LayerSpec::Symbol(layer), self.below_layer.as_deref());
        }
    }

    fn restyle_routes(&mut self) {
        for index in 0..self.routes.len() {
            apply::restyle_route(&mut self.map, &self.theme, index, self.primary_index);
        }
    }

    fn teardown(&mut self) {
        // Cancel any in-flight build before touching shared state; a
        // worker that observes the bumped generation abandons its result.
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.pending = None;

        for id in self.layer_ids.drain(..) {
            self.map.remove_layer(&id);
        }

        self.routes.clear();
        self.collections.clear();
        self.slots.clear();
        self.waypoints = None;
        self.primary_index = 0;
    }
}

impl<M: MapStyle> Debug for RouteOverlay<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RouteOverlay with {} route(s), primary {}",
            self.routes.len(),
            self.primary_index
        )
    }
}
