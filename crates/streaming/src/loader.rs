use std::sync::Arc;

use formats::BoundaryCollection;
use foundation::{BoundaryDataset, Chamber};
use tracing::{debug, info, warn};

use crate::request::LoadTicket;
use crate::source::{BoundaryLoadError, BoundarySource, BoxFuture};

/// What happened when a finished fetch was handed back to the loader.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The collection is now the active boundary layer.
    Applied(Arc<BoundaryCollection>),
    /// The chamber changed while the fetch was in flight; result dropped.
    Stale,
    /// The fetch failed for the current chamber; no boundary layer.
    Failed(BoundaryLoadError),
}

/// Fetches and caches the boundary layer for the active chamber, plus the
/// chamber-independent state outline overlay.
///
/// Ordering contract:
/// - Only the chamber selected last can install a result. A fetch that was
///   issued before a chamber switch is dropped when it completes, even if it
///   completes after the fetch for the new chamber.
/// - The cached layer is replaced, never merged, on chamber switch.
pub struct GeoDataLoader {
    source: Arc<dyn BoundarySource>,
    chamber: Option<Chamber>,
    epoch: u64,
    active: Option<Arc<BoundaryCollection>>,
    outline: Option<Arc<BoundaryCollection>>,
}

impl GeoDataLoader {
    pub fn new(source: Arc<dyn BoundarySource>) -> Self {
        Self {
            source,
            chamber: None,
            epoch: 0,
            active: None,
            outline: None,
        }
    }

    pub fn chamber(&self) -> Option<Chamber> {
        self.chamber
    }

    /// Boundary layer of the current chamber, if loaded.
    pub fn current(&self) -> Option<Arc<BoundaryCollection>> {
        self.active.clone()
    }

    /// State outline overlay, if loaded.
    pub fn outline(&self) -> Option<Arc<BoundaryCollection>> {
        self.outline.clone()
    }

    /// Makes `chamber` current and returns the ticket its fetch must carry.
    ///
    /// Switching to a different chamber drops the cached layer and
    /// invalidates every ticket issued before.
    pub fn select_chamber(&mut self, chamber: Chamber) -> LoadTicket {
        if self.chamber != Some(chamber) {
            self.epoch += 1;
            self.chamber = Some(chamber);
            if self.active.take().is_some() {
                debug!(%chamber, epoch = self.epoch, "dropped cached boundary layer");
            }
        }
        LoadTicket {
            epoch: self.epoch,
            chamber,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.epoch == self.epoch && self.chamber == Some(ticket.chamber)
    }

    /// Fetch for a ticket. The future owns everything it needs, so the loader
    /// stays free for further `select_chamber` calls while it runs.
    pub fn fetch(
        &self,
        ticket: LoadTicket,
    ) -> BoxFuture<'static, Result<BoundaryCollection, BoundaryLoadError>> {
        fetch_collection(self.source.clone(), ticket.chamber.dataset(), true)
    }

    /// Hands a finished fetch back. Stale tickets are ignored.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        result: Result<BoundaryCollection, BoundaryLoadError>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            debug!(
                chamber = %ticket.chamber,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "discarding stale boundary load"
            );
            return LoadOutcome::Stale;
        }

        match self.install(ticket.chamber, result) {
            Ok(collection) => LoadOutcome::Applied(collection),
            Err(err) => LoadOutcome::Failed(err),
        }
    }

    /// Selects `chamber` and loads its layer, reusing the cache when the
    /// chamber did not change.
    pub async fn load(
        &mut self,
        chamber: Chamber,
    ) -> Result<Arc<BoundaryCollection>, BoundaryLoadError> {
        let ticket = self.select_chamber(chamber);
        if let Some(cached) = &self.active {
            return Ok(cached.clone());
        }
        let result = self.fetch(ticket).await;
        self.install(chamber, result)
    }

    fn install(
        &mut self,
        chamber: Chamber,
        result: Result<BoundaryCollection, BoundaryLoadError>,
    ) -> Result<Arc<BoundaryCollection>, BoundaryLoadError> {
        match result {
            Ok(collection) => {
                info!(%chamber, features = collection.len(), "boundary layer ready");
                let collection = Arc::new(collection);
                self.active = Some(collection.clone());
                Ok(collection)
            }
            Err(err) => {
                warn!(%chamber, "boundary load failed: {err}");
                self.active = None;
                Err(err)
            }
        }
    }

    /// Loads the state outline overlay once; later calls return the cache.
    pub async fn load_outline(&mut self) -> Result<Arc<BoundaryCollection>, BoundaryLoadError> {
        if let Some(outline) = &self.outline {
            return Ok(outline.clone());
        }
        let collection = Arc::new(self.fetch_outline().await?);
        self.outline = Some(collection.clone());
        Ok(collection)
    }

    fn fetch_outline(
        &self,
    ) -> BoxFuture<'static, Result<BoundaryCollection, BoundaryLoadError>> {
        fetch_collection(self.source.clone(), BoundaryDataset::States, false)
    }
}

fn fetch_collection(
    source: Arc<dyn BoundarySource>,
    dataset: BoundaryDataset,
    with_buckets: bool,
) -> BoxFuture<'static, Result<BoundaryCollection, BoundaryLoadError>> {
    Box::pin(async move {
        debug!(%dataset, location = %source.locate(dataset), "fetching boundaries");
        let payload = source.fetch(dataset).await?;
        let collection = BoundaryCollection::from_geojson_str(dataset, &payload)
            .map_err(|e| BoundaryLoadError::Parse { dataset, source: e })?;
        Ok(if with_buckets {
            layers::augment(collection)
        } else {
            collection
        })
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{GeoDataLoader, LoadOutcome};
    use crate::source::{BoundaryLoadError, StaticBoundarySource};
    use foundation::{BoundaryDataset, Chamber};

    const DISTRICTS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"STATEFP":"48","GEOID":"4812","CD119FP":"12"},"geometry":null},
        {"type":"Feature","properties":{"STATEFP":"56","GEOID":"5600","CD119FP":"00"},"geometry":null}]}"#;
    const STATES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"STATEFP":"06","GEOID":"06","NAME":"California"},"geometry":null}]}"#;

    fn loader() -> GeoDataLoader {
        GeoDataLoader::new(Arc::new(
            StaticBoundarySource::new()
                .with(BoundaryDataset::CongressionalDistricts, DISTRICTS)
                .with(BoundaryDataset::States, STATES),
        ))
    }

    #[tokio::test]
    async fn loads_and_buckets_the_chamber_layer() {
        let mut loader = loader();
        let house = loader.load(Chamber::House).await.expect("house");
        assert_eq!(house.dataset, BoundaryDataset::CongressionalDistricts);
        assert_eq!(house.len(), 2);
        assert!(house.features.iter().all(|f| f.bucket.is_some()));

        // Same chamber: served from cache.
        let again = loader.load(Chamber::House).await.unwrap();
        assert!(Arc::ptr_eq(&house, &again));
    }

    #[tokio::test]
    async fn switching_chamber_replaces_the_cache() {
        let mut loader = loader();
        loader.load(Chamber::House).await.unwrap();
        let senate = loader.load(Chamber::Senate).await.unwrap();
        assert_eq!(senate.dataset, BoundaryDataset::States);
        let current = loader.current().expect("cached");
        assert!(Arc::ptr_eq(&current, &senate));
    }

    #[tokio::test]
    async fn stale_house_load_does_not_overwrite_senate() {
        let mut loader = loader();
        let house_ticket = loader.select_chamber(Chamber::House);
        let house_fetch = loader.fetch(house_ticket);

        let senate_ticket = loader.select_chamber(Chamber::Senate);
        let senate_result = loader.fetch(senate_ticket).await;
        assert!(matches!(
            loader.apply(senate_ticket, senate_result),
            LoadOutcome::Applied(_)
        ));

        // The House fetch completes last but must lose.
        let house_result = house_fetch.await;
        assert_eq!(loader.apply(house_ticket, house_result), LoadOutcome::Stale);
        assert_eq!(
            loader.current().map(|c| c.dataset),
            Some(BoundaryDataset::States)
        );
    }

    #[tokio::test]
    async fn repeated_selection_of_same_chamber_keeps_tickets_valid() {
        let mut loader = loader();
        let first = loader.select_chamber(Chamber::House);
        let second = loader.select_chamber(Chamber::House);
        assert_eq!(first, second);

        let round_trip = loader.select_chamber(Chamber::Senate);
        assert!(!loader.is_current(first));
        assert!(loader.is_current(round_trip));
    }

    #[tokio::test]
    async fn failures_clear_the_layer_and_are_reported() {
        let mut loader = GeoDataLoader::new(Arc::new(
            StaticBoundarySource::new().with(BoundaryDataset::CongressionalDistricts, "[1, 2"),
        ));
        let err = loader.load(Chamber::House).await.unwrap_err();
        assert!(matches!(err, BoundaryLoadError::Parse { .. }), "{err}");
        assert!(loader.current().is_none());

        let err = loader.load(Chamber::Senate).await.unwrap_err();
        assert!(matches!(err, BoundaryLoadError::Io { .. }));
    }

    #[tokio::test]
    async fn outline_is_loaded_once_and_kept_across_switches() {
        let mut loader = loader();
        let outline = loader.load_outline().await.unwrap();
        assert!(outline.features.iter().all(|f| f.bucket.is_none()));

        loader.load(Chamber::House).await.unwrap();
        loader.load(Chamber::Senate).await.unwrap();
        let again = loader.load_outline().await.unwrap();
        assert!(Arc::ptr_eq(&outline, &again));
    }
}
