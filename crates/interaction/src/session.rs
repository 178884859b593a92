use std::sync::Arc;

use formats::BoundaryCollection;
use foundation::{Chamber, ViewportFit};
use roster::{RosterError, RosterMember, RosterSource, Rosters};
use streaming::{
    BoundaryLoadError, BoundarySource, BoxFuture, GeoDataLoader, LoadOutcome, LoadTicket,
};
use tracing::{info, warn};

use crate::event_bus::{EventBus, RecordedEvent, SessionEvent};
use crate::pointer::PointerEvent;
use crate::preview::HoverPreview;
use crate::selection::{Outcome, SelectionCoordinator, SelectionEffect, SelectionState};

/// The renderer the session drives.
pub trait MapSurface {
    fn fit_bounds(&mut self, fit: ViewportFit);
    /// `None` removes the chamber layer (failed or pending load).
    fn show_boundaries(&mut self, layer: Option<Arc<BoundaryCollection>>);
    fn show_outline(&mut self, outline: Arc<BoundaryCollection>);
}

/// Surface for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl MapSurface for NullSurface {
    fn fit_bounds(&mut self, _fit: ViewportFit) {}
    fn show_boundaries(&mut self, _layer: Option<Arc<BoundaryCollection>>) {}
    fn show_outline(&mut self, _outline: Arc<BoundaryCollection>) {}
}

/// Everything behind the map: boundary loading, rosters and selection.
///
/// The embedding UI forwards pointer events and drains [`SessionEvent`]s.
/// Boundary fetches run outside the session: take the future from
/// [`MapSession::fetch`], await it anywhere, and hand the result back via
/// [`MapSession::finish_load`]. Pointer handling stays available meanwhile.
pub struct MapSession<S: MapSurface> {
    loader: GeoDataLoader,
    rosters: Rosters,
    coordinator: SelectionCoordinator,
    surface: S,
    events: EventBus,
}

impl<S: MapSurface> MapSession<S> {
    pub fn new(
        source: Arc<dyn BoundarySource>,
        rosters: Rosters,
        chamber: Chamber,
        surface: S,
    ) -> Self {
        let coordinator = SelectionCoordinator::new(chamber, rosters.get(chamber));
        Self {
            loader: GeoDataLoader::new(source),
            rosters,
            coordinator,
            surface,
            events: EventBus::new(),
        }
    }

    /// Frames the continental US and loads the state outline overlay.
    pub async fn start(&mut self) {
        self.surface.fit_bounds(ViewportFit::continental_us());
        match self.loader.load_outline().await {
            Ok(outline) => self.surface.show_outline(outline),
            Err(err) => {
                warn!("state outline unavailable: {err}");
                self.events.emit(SessionEvent::load_failed(None, &err));
            }
        }
    }

    /// Fetches both chambers' rosters, as on application start. A chamber
    /// whose fetch fails keeps its previous roster; the first error is
    /// returned after both were tried.
    pub async fn refresh_rosters(&mut self, source: &dyn RosterSource) -> Result<(), RosterError> {
        let mut first_err = None;
        for chamber in Chamber::ALL {
            if let Err(err) = self.refresh_roster(source, chamber).await {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub async fn refresh_roster(
        &mut self,
        source: &dyn RosterSource,
        chamber: Chamber,
    ) -> Result<(), RosterError> {
        match source.fetch(chamber).await {
            Ok(members) => {
                self.replace_roster(chamber, members);
                Ok(())
            }
            Err(err) => {
                warn!(%chamber, "roster refresh failed: {err}");
                Err(err)
            }
        }
    }

    pub fn chamber(&self) -> Chamber {
        self.coordinator.chamber()
    }

    /// Switches the active chamber. Returns the ticket to fetch with, or
    /// `None` when the chamber's layer is already loaded.
    pub fn switch_chamber(&mut self, chamber: Chamber) -> Option<LoadTicket> {
        let changed = self.loader.chamber() != Some(chamber);
        self.coordinator
            .switch_chamber(chamber, self.rosters.get(chamber));
        let ticket = self.loader.select_chamber(chamber);
        if changed {
            info!(%chamber, "chamber switched");
            self.surface.show_boundaries(None);
        }
        match self.loader.current() {
            Some(_) => None,
            None => Some(ticket),
        }
    }

    pub fn fetch(
        &self,
        ticket: LoadTicket,
    ) -> BoxFuture<'static, Result<BoundaryCollection, BoundaryLoadError>> {
        self.loader.fetch(ticket)
    }

    /// Hands a finished fetch back. Results for a chamber that is no longer
    /// active are dropped.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<BoundaryCollection, BoundaryLoadError>,
    ) -> LoadOutcome {
        let outcome = self.loader.apply(ticket, result);
        match &outcome {
            LoadOutcome::Applied(layer) => {
                self.surface.show_boundaries(Some(layer.clone()));
                self.events.emit(SessionEvent::BoundariesReady {
                    chamber: ticket.chamber,
                    features: layer.len(),
                });
            }
            LoadOutcome::Failed(err) => {
                self.surface.show_boundaries(None);
                self.events
                    .emit(SessionEvent::load_failed(Some(ticket.chamber), err));
            }
            LoadOutcome::Stale => {}
        }
        outcome
    }

    /// Switch and load in one step.
    pub async fn activate(&mut self, chamber: Chamber) -> LoadOutcome {
        match self.switch_chamber(chamber) {
            Some(ticket) => {
                let result = self.fetch(ticket).await;
                self.finish_load(ticket, result)
            }
            None => match self.loader.current() {
                Some(layer) => LoadOutcome::Applied(layer),
                None => LoadOutcome::Stale,
            },
        }
    }

    pub fn boundaries(&self) -> Option<Arc<BoundaryCollection>> {
        self.loader.current()
    }

    pub fn replace_roster(&mut self, chamber: Chamber, members: Vec<RosterMember>) {
        let index = self.rosters.replace(chamber, members);
        info!(%chamber, members = index.len(), "roster replaced");
        if chamber == self.coordinator.chamber() {
            self.coordinator.replace_index(index);
        }
    }

    pub fn rosters(&self) -> &Rosters {
        &self.rosters
    }

    pub fn pointer_moved(&mut self, event: PointerEvent<'_>) -> Outcome {
        self.coordinator.pointer_moved(event)
    }

    pub fn pointer_left(&mut self) -> Outcome {
        self.coordinator.pointer_left()
    }

    pub fn clicked(&mut self, event: PointerEvent<'_>) -> Outcome {
        let outcome = self.coordinator.clicked(event);
        self.publish(&outcome);
        outcome
    }

    pub fn pick_candidate(&mut self, member: &RosterMember) -> Outcome {
        let outcome = self.coordinator.pick(member);
        self.publish(&outcome);
        outcome
    }

    pub fn dismiss(&mut self) -> Outcome {
        self.coordinator.dismiss()
    }

    pub fn clear(&mut self) -> Outcome {
        self.coordinator.clear()
    }

    pub fn preview(&self) -> Option<HoverPreview> {
        self.coordinator.preview()
    }

    pub fn selection(&self) -> &SelectionState {
        self.coordinator.state()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn events(&self) -> &[RecordedEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<RecordedEvent> {
        self.events.drain()
    }

    fn publish(&mut self, outcome: &Outcome) {
        let Outcome::Effect(effect) = outcome else {
            return;
        };
        let event = match effect.clone() {
            SelectionEffect::Selected(member) => SessionEvent::Selected { member },
            SelectionEffect::DisambiguationRequested(candidates) => {
                SessionEvent::DisambiguationRequested { candidates }
            }
            SelectionEffect::NotFound { position } => SessionEvent::NotFound { position },
        };
        self.events.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{MapSession, MapSurface};
    use crate::event_bus::SessionEvent;
    use crate::pointer::{PointerEvent, ScreenPoint};
    use crate::selection::SelectionState;
    use formats::BoundaryCollection;
    use foundation::{BoundaryDataset, CONTINENTAL_US, Chamber, ViewportFit};
    use roster::{BoxFuture, RosterError, RosterMember, RosterSource, Rosters};
    use streaming::{LoadOutcome, StaticBoundarySource};

    const DISTRICTS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"STATEFP":"48","GEOID":"4812","CD119FP":"12"},"geometry":null}]}"#;
    const STATES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"STATEFP":"06","GEOID":"06","NAME":"California"},"geometry":null},
        {"type":"Feature","properties":{"STATEFP":"56","GEOID":"56","NAME":"Wyoming"},"geometry":null}]}"#;

    #[derive(Default)]
    struct Recording {
        fits: Vec<ViewportFit>,
        layers: Vec<Option<BoundaryDataset>>,
        outlines: usize,
    }

    impl MapSurface for Recording {
        fn fit_bounds(&mut self, fit: ViewportFit) {
            self.fits.push(fit);
        }

        fn show_boundaries(&mut self, layer: Option<Arc<BoundaryCollection>>) {
            self.layers.push(layer.map(|l| l.dataset));
        }

        fn show_outline(&mut self, _outline: Arc<BoundaryCollection>) {
            self.outlines += 1;
        }
    }

    fn rosters() -> Rosters {
        Rosters::new(
            vec![RosterMember::new("Doe", "Texas", Chamber::House, Some(12))],
            vec![
                RosterMember::new("Ca One", "California", Chamber::Senate, None),
                RosterMember::new("Ca Two", "California", Chamber::Senate, None),
                RosterMember::new("Wy One", "Wyoming", Chamber::Senate, None),
            ],
        )
    }

    fn session() -> MapSession<Recording> {
        let source = StaticBoundarySource::new()
            .with(BoundaryDataset::CongressionalDistricts, DISTRICTS)
            .with(BoundaryDataset::States, STATES);
        MapSession::new(Arc::new(source), rosters(), Chamber::House, Recording::default())
    }

    #[tokio::test]
    async fn start_fits_the_continental_us_and_shows_the_outline() {
        let mut s = session();
        s.start().await;
        assert_eq!(s.surface().fits.len(), 1);
        assert_eq!(s.surface().fits[0].bounds, CONTINENTAL_US);
        assert_eq!(s.surface().fits[0].padding_px, 40);
        assert_eq!(s.surface().outlines, 1);
        assert!(s.events().is_empty());
    }

    #[tokio::test]
    async fn house_click_selects_the_representative() {
        let mut s = session();
        assert!(matches!(s.activate(Chamber::House).await, LoadOutcome::Applied(_)));

        let layer = s.boundaries().expect("house layer");
        let tx12 = &layer.features[0];
        s.clicked(PointerEvent::over(ScreenPoint::new(1.0, 1.0), tx12));

        let events = s.drain_events();
        assert!(matches!(
            events[0].event,
            SessionEvent::BoundariesReady { chamber: Chamber::House, features: 1 }
        ));
        match &events[1].event {
            SessionEvent::Selected { member } => assert_eq!(member.name, "Doe"),
            other => panic!("expected selection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stale_load_is_dropped_after_a_quick_switch() {
        let mut s = session();
        let house = s.switch_chamber(Chamber::House).expect("house ticket");
        let house_fetch = s.fetch(house);
        let senate = s.switch_chamber(Chamber::Senate).expect("senate ticket");

        let result = s.fetch(senate).await;
        assert!(matches!(s.finish_load(senate, result), LoadOutcome::Applied(_)));
        let result = house_fetch.await;
        assert_eq!(s.finish_load(house, result), LoadOutcome::Stale);

        assert_eq!(
            s.boundaries().map(|b| b.dataset),
            Some(BoundaryDataset::States)
        );
        let ready: Vec<_> = s
            .events()
            .iter()
            .filter(|e| matches!(e.event, SessionEvent::BoundariesReady { .. }))
            .collect();
        assert_eq!(ready.len(), 1);
    }

    #[tokio::test]
    async fn senate_disambiguation_flows_through_the_outbox() {
        let mut s = session();
        s.activate(Chamber::Senate).await;
        let layer = s.boundaries().unwrap();
        let ca = &layer.features[0];
        s.clicked(PointerEvent::over(ScreenPoint::default(), ca));

        let candidates = match &s.events().last().unwrap().event {
            SessionEvent::DisambiguationRequested { candidates } => candidates.clone(),
            other => panic!("expected disambiguation, got {other:?}"),
        };
        s.pick_candidate(&candidates[0]);
        assert_eq!(s.selection(), &SelectionState::Selected(candidates[0].clone()));

        // Chamber switch clears the selection and asks for a new layer.
        assert!(s.switch_chamber(Chamber::House).is_some());
        assert_eq!(s.selection(), &SelectionState::Idle);
        assert!(s.boundaries().is_none());
        assert_eq!(s.surface().layers.last(), Some(&None));
    }

    #[tokio::test]
    async fn failed_layer_is_reported_and_nothing_is_shown() {
        let source = StaticBoundarySource::new().with(BoundaryDataset::States, STATES);
        let mut s = MapSession::new(Arc::new(source), rosters(), Chamber::House, Recording::default());
        assert!(matches!(s.activate(Chamber::House).await, LoadOutcome::Failed(_)));
        assert_eq!(s.surface().layers.last(), Some(&None));
        assert!(matches!(
            s.events()[0].event,
            SessionEvent::BoundaryLoadFailed { chamber: Some(Chamber::House), .. }
        ));

        // Reselecting the chamber retries.
        assert!(s.switch_chamber(Chamber::House).is_some());
    }

    #[tokio::test]
    async fn replaced_roster_is_used_for_the_next_click() {
        let mut s = session();
        s.activate(Chamber::House).await;
        s.replace_roster(
            Chamber::House,
            vec![RosterMember::new("Roe", "Texas", Chamber::House, Some(12))],
        );
        let layer = s.boundaries().unwrap();
        s.clicked(PointerEvent::over(ScreenPoint::default(), &layer.features[0]));
        match &s.events().last().unwrap().event {
            SessionEvent::Selected { member } => assert_eq!(member.name, "Roe"),
            other => panic!("expected selection, got {other:?}"),
        }
    }

    /// Serves a fixed House roster; Senate fetches fail.
    struct HouseOnly;

    impl RosterSource for HouseOnly {
        fn fetch(
            &self,
            chamber: Chamber,
        ) -> BoxFuture<'_, Result<Vec<RosterMember>, RosterError>> {
            Box::pin(async move {
                match chamber {
                    Chamber::House => Ok(vec![RosterMember::new(
                        "Roe",
                        "Texas",
                        Chamber::House,
                        Some(12),
                    )]),
                    Chamber::Senate => Err(RosterError::Status(503)),
                }
            })
        }
    }

    #[tokio::test]
    async fn roster_refresh_keeps_the_chamber_that_failed() {
        let mut s = session();
        let senate_before = s.rosters().get(Chamber::Senate);

        let err = s.refresh_rosters(&HouseOnly).await.unwrap_err();
        assert_eq!(err, RosterError::Status(503));

        let house = s.rosters().get(Chamber::House);
        assert_eq!(house.members()[0].name, "Roe");
        assert!(Arc::ptr_eq(&senate_before, &s.rosters().get(Chamber::Senate)));

        // The active House coordinator picked up the new roster.
        s.activate(Chamber::House).await;
        let layer = s.boundaries().unwrap();
        s.clicked(PointerEvent::over(ScreenPoint::default(), &layer.features[0]));
        match &s.events().last().unwrap().event {
            SessionEvent::Selected { member } => assert_eq!(member.name, "Roe"),
            other => panic!("expected selection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn house_selection_is_cleared_by_switching_to_the_senate() {
        let mut s = session();
        s.activate(Chamber::House).await;
        let layer = s.boundaries().unwrap();
        s.clicked(PointerEvent::over(ScreenPoint::default(), &layer.features[0]));
        assert!(matches!(s.selection(), SelectionState::Selected(_)));

        assert!(s.switch_chamber(Chamber::Senate).is_some());
        assert_eq!(s.selection(), &SelectionState::Idle);
        assert_eq!(s.chamber(), Chamber::Senate);
    }
}
