//! The dashboard: wires store, catalog, boundaries and views together.
//!
//! REPORT ORDER (fixed, matches the menu):
//!   1. Transaction dynamics
//!   2. Device engagement
//!   3. Insurance penetration
//!   4. Market expansion
//!   5. User growth
//!
//! RULES:
//!   - The store is opened read-only; the dashboard never writes facts.
//!   - Reports render independently and share only the read-only context.
//!   - A missing boundary document degrades maps; it never fails a page.
//!   - Only the most recent request's frame is delivered.

use crate::{
    aggregation::Aggregator,
    boundary::{BoundaryDocument, BoundaryLoader},
    cache::{CacheStats, DerivedCache},
    catalog::RegionCatalog,
    config::DashboardConfig,
    error::{InsightsError, InsightsResult},
    filter::{FilterInput, FilterSelection, ScopeFilter},
    panel::Page,
    request::{Frame, Request, Response},
    sequencer::{RequestSequencer, RequestToken},
    store::InsightsStore,
    types::MetricFamily,
    views::{
        device_engagement::DeviceEngagementReport, home::HomeView,
        insurance_penetration::InsurancePenetrationReport,
        market_expansion::MarketExpansionReport,
        transaction_dynamics::TransactionDynamicsReport, user_growth::UserGrowthReport,
        ReportId, ReportView, ViewContext,
    },
};
use std::sync::Arc;

pub struct Dashboard {
    pub session_id: String,
    config:         DashboardConfig,
    store:          InsightsStore,
    catalog:        RegionCatalog,
    boundaries:     Option<BoundaryDocument>,
    cache:          DerivedCache,
    reports:        Vec<Box<dyn ReportView>>,
    sequencer:      Arc<RequestSequencer>,
}

impl Dashboard {
    pub fn new(
        config: DashboardConfig,
        store: InsightsStore,
        boundaries: Option<BoundaryDocument>,
    ) -> InsightsResult<Self> {
        let catalog = RegionCatalog::load(&store)?;
        Ok(Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            config,
            store,
            catalog,
            boundaries,
            cache:      DerivedCache::new(),
            reports:    Vec::new(),
            sequencer:  Arc::new(RequestSequencer::new()),
        })
    }

    /// Build a dashboard with every report registered in menu order.
    pub fn build(
        config: DashboardConfig,
        store: InsightsStore,
        boundaries: Option<BoundaryDocument>,
    ) -> InsightsResult<Self> {
        let mut dashboard = Dashboard::new(config, store, boundaries)?;
        dashboard.register(Box::new(TransactionDynamicsReport));
        dashboard.register(Box::new(DeviceEngagementReport));
        dashboard.register(Box::new(InsurancePenetrationReport));
        dashboard.register(Box::new(MarketExpansionReport));
        dashboard.register(Box::new(UserGrowthReport));
        log::info!(
            "Dashboard {} ready: {} regions, {} reports, boundaries {}",
            dashboard.session_id,
            dashboard.catalog.regions().len(),
            dashboard.reports.len(),
            if dashboard.boundaries.is_some() { "loaded" } else { "unavailable" },
        );
        Ok(dashboard)
    }

    /// Open the configured database read-only and fetch the boundary document.
    pub fn open(config: DashboardConfig) -> InsightsResult<Self> {
        let store = InsightsStore::open_read_only(&config.database_path)?;
        let boundaries =
            BoundaryLoader::new(config.boundary_timeout_secs).load(&config.boundary_source);
        Self::build(config, store, boundaries)
    }

    /// Register a report. Call in menu order.
    pub fn register(&mut self, report: Box<dyn ReportView>) {
        self.reports.push(report);
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &InsightsStore {
        &self.store
    }

    pub fn boundaries(&self) -> Option<&BoundaryDocument> {
        self.boundaries.as_ref()
    }

    pub fn sequencer(&self) -> Arc<RequestSequencer> {
        Arc::clone(&self.sequencer)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Report ids in registration order.
    pub fn report_ids(&self) -> Vec<ReportId> {
        self.reports.iter().map(|r| r.id()).collect()
    }

    fn context(&self) -> ViewContext<'_> {
        ViewContext {
            agg:        Aggregator::new(&self.store, &self.cache),
            config:     &self.config,
            boundaries: self.boundaries.as_ref(),
        }
    }

    pub fn resolve(&self, input: &FilterInput) -> InsightsResult<ScopeFilter> {
        input.resolve(&self.config, &self.catalog)
    }

    pub fn render_home(&self, metric: MetricFamily, scope: &ScopeFilter) -> InsightsResult<Page> {
        let selection = FilterSelection { metric, scope: scope.clone() };
        HomeView.render(&self.context(), &selection)
    }

    pub fn render_report(&self, id: ReportId, scope: &ScopeFilter) -> InsightsResult<Page> {
        let report = self
            .reports
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| InsightsError::UnknownReport { id: id.menu_label() })?;
        log::debug!(
            "Rendering report {} for {} {}",
            id.number(),
            scope.period.label(),
            scope.region.label()
        );
        let panels = report.render(&self.context(), scope)?;
        Ok(Page { title: id.title().to_string(), panels })
    }

    /// Answer one request. `Quit` has no response.
    pub fn handle(&self, request: &Request) -> InsightsResult<Option<Response>> {
        let response = match request {
            Request::Home { metric, filter } => {
                let scope = self.resolve(filter)?;
                Response::Page(self.render_home(*metric, &scope)?)
            }
            Request::Report { report, filter } => {
                let scope = self.resolve(filter)?;
                Response::Page(self.render_report(*report, &scope)?)
            }
            Request::Regions => Response::Regions { options: self.catalog.options() },
            Request::Quit => return Ok(None),
        };
        Ok(Some(response))
    }

    /// Issue a token for a request about to be rendered. Only filter
    /// changes advance the sequence.
    pub fn submit(&self, request: &Request) -> RequestToken {
        request.token(&self.sequencer)
    }

    /// Render a request issued under `token`. Returns `None` for `Quit`
    /// and for pages superseded by a newer filter change.
    pub fn render_frame(&self, token: RequestToken, request: &Request) -> InsightsResult<Option<Frame>> {
        let sequenced = request.supersedes_pending();
        if sequenced && !self.sequencer.is_current(token) {
            log::debug!("Skipping superseded request {}", token.0);
            return Ok(None);
        }
        let Some(body) = self.handle(request)? else {
            return Ok(None);
        };
        let body = if sequenced {
            self.sequencer.accept(token, body)
        } else {
            Some(body)
        };
        Ok(body.map(|body| Frame::new(&self.session_id, token, body)))
    }
}
