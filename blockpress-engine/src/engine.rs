use crate::config::EngineConfig;
use crate::dispatch::{RenderDispatcher, RenderOutput};
use crate::error::EngineResult;
use crate::prefetch::{EnrichmentResults, PrefetchOrchestrator};
use blockpress_locale::LocaleRequest;
use blockpress_model::{PageContent, ensure_page_valid, validate};
use blockpress_registry::{BlockRegistry, RenderContext};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Save-time validation plus the render pipeline over one shared registry.
///
/// Cheap to share: holds the registry behind an `Arc` and keeps no per-render
/// state.
#[derive(Debug, Clone)]
pub struct PageEngine {
    registry: Arc<BlockRegistry>,
    config: EngineConfig,
    prefetch: PrefetchOrchestrator,
    dispatcher: RenderDispatcher,
}

impl PageEngine {
    pub fn new(registry: Arc<BlockRegistry>, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let prefetch = PrefetchOrchestrator::new(
            Arc::clone(&registry),
            config.max_in_flight,
            config.enrich_timeout(),
        );
        let dispatcher = RenderDispatcher::new(Arc::clone(&registry));
        Ok(Self {
            registry,
            config,
            prefetch,
            dispatcher,
        })
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn prefetch(&self) -> &PrefetchOrchestrator {
        &self.prefetch
    }

    pub fn dispatcher(&self) -> &RenderDispatcher {
        &self.dispatcher
    }

    /// Rejects a page that must not be persisted: malformed structure, a
    /// child policy violation, or values that break a block's schema.
    pub fn check_save(&self, page: &PageContent) -> EngineResult<()> {
        ensure_page_valid(page, &*self.registry)?;
        Ok(())
    }

    /// Validates the page, then drops stored values for nodes that no longer
    /// exist. Returns how many were dropped.
    pub fn prepare_save(&self, page: &mut PageContent) -> EngineResult<usize> {
        self.check_save(page)?;
        let pruned = page.values.retain_tree(&page.tree);
        if pruned > 0 {
            info!(pruned, "dropped values of removed nodes");
        }
        Ok(pruned)
    }

    /// Resolution request for the context's locale; an empty locale means
    /// the site default.
    pub fn locale_request(&self, ctx: &RenderContext) -> LocaleRequest {
        let locales = &self.config.locales;
        if ctx.locale.is_empty() {
            locales.request_for(&locales.default_locale)
        } else {
            locales.request_for(&ctx.locale)
        }
    }

    /// Prefetches then renders a page. Never fails.
    pub async fn render_page(&self, page: &PageContent, ctx: &RenderContext) -> RenderOutput {
        let locale = self.locale_request(ctx);
        self.log_stored_violations(page);
        let enrichment = self
            .prefetch
            .enrich(&page.tree, &page.values, &locale, ctx)
            .await;
        self.dispatcher
            .render(&page.tree, &page.values, &enrichment, &locale, ctx)
    }

    /// Like [`render_page`](Self::render_page), but gives up with
    /// [`EngineError::Cancelled`](crate::EngineError::Cancelled) when `cancel`
    /// fires during prefetch.
    pub async fn render_page_cancellable(
        &self,
        page: &PageContent,
        ctx: &RenderContext,
        cancel: &CancellationToken,
    ) -> EngineResult<RenderOutput> {
        let locale = self.locale_request(ctx);
        self.log_stored_violations(page);
        let enrichment = self
            .prefetch
            .enrich_cancellable(&page.tree, &page.values, &locale, ctx, cancel)
            .await?;
        Ok(self
            .dispatcher
            .render(&page.tree, &page.values, &enrichment, &locale, ctx))
    }

    /// Renders with enrichment results the caller already has, e.g. from a
    /// cache in front of the engine.
    pub fn render_with(
        &self,
        page: &PageContent,
        enrichment: &EnrichmentResults,
        ctx: &RenderContext,
    ) -> RenderOutput {
        let locale = self.locale_request(ctx);
        self.dispatcher
            .render(&page.tree, &page.values, enrichment, &locale, ctx)
    }

    fn log_stored_violations(&self, page: &PageContent) {
        for violation in validate(&page.tree, &*self.registry) {
            warn!(%violation, "stored page violates block constraints, rendering anyway");
        }
    }
}
