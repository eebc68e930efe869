//! Async entry point for the presentation layer.
//!
//! [`AssemblerService`] owns its catalog cache: the catalog is loaded on
//! first use on the blocking pool, then shared read-only between requests.
//! Each request runs the CPU-bound pipeline on the blocking pool under a
//! timeout, so a slow solve never stalls the async runtime.

use crate::catalog::{Catalog, CatalogLoader};
use crate::engine::{AllocationEngine, Bundle, BuildError};
use crate::filter::FilterConfig;
use crate::pipeline::Pipeline;
use crate::report::{BuildResponse, ResultAssembler};
use crate::settings::Settings;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

pub struct AssemblerService {
    loader: Option<CatalogLoader>,
    catalog: OnceCell<Arc<Catalog>>,
    pipeline: Arc<Pipeline>,
    assembler: ResultAssembler,
    solve_timeout: Duration,
}

impl AssemblerService {
    /// Service that loads its catalog from `loader` on first request.
    pub fn new(
        loader: CatalogLoader,
        pipeline: Pipeline,
        assembler: ResultAssembler,
        solve_timeout: Duration,
    ) -> Self {
        Self {
            loader: Some(loader),
            catalog: OnceCell::new(),
            pipeline: Arc::new(pipeline),
            assembler,
            solve_timeout,
        }
    }

    /// Service over an already loaded catalog.
    pub fn with_catalog(
        catalog: Catalog,
        pipeline: Pipeline,
        assembler: ResultAssembler,
        solve_timeout: Duration,
    ) -> Self {
        Self {
            loader: None,
            catalog: OnceCell::new_with(Some(Arc::new(catalog))),
            pipeline: Arc::new(pipeline),
            assembler,
            solve_timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, String> {
        let engine = AllocationEngine::new(settings.engine_config());
        let pipeline = Pipeline::new(FilterConfig::default(), settings.scoring_config(), engine);
        pipeline.validate()?;

        let options = settings.report_options();
        options.validate()?;

        Ok(Self::new(
            CatalogLoader::new(&settings.catalog.data_dir),
            pipeline,
            ResultAssembler::new(options),
            settings.solve_timeout(),
        ))
    }

    /// The catalog, loading it on first call.
    ///
    /// A failed load is not cached; the next call tries again.
    pub async fn catalog(&self) -> Result<Arc<Catalog>, BuildError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let loader = self
                    .loader
                    .clone()
                    .ok_or_else(|| BuildError::internal("no catalog source configured"))?;
                let catalog = tokio::task::spawn_blocking(move || loader.load())
                    .await
                    .map_err(|err| BuildError::internal(format!("catalog load task failed: {err}")))??;
                info!(
                    "Catalog ready: {} parts in {} categories",
                    catalog.len(),
                    catalog.categories().count()
                );
                Ok::<_, BuildError>(Arc::new(catalog))
            })
            .await?;
        Ok(catalog.clone())
    }

    /// Builds the best bundle for a budget and goal.
    pub async fn generate_build(&self, budget: f64, goal: &str) -> Result<Bundle, BuildError> {
        let catalog = self.catalog().await?;
        let pipeline = self.pipeline.clone();
        let goal = goal.to_string();

        let task = tokio::task::spawn_blocking(move || pipeline.run(&catalog, budget, &goal));
        match tokio::time::timeout(self.solve_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => Err(BuildError::internal(format!("build task failed: {err}"))),
            Err(_) => {
                warn!(
                    "Build for budget {budget:.2} exceeded {} ms, discarding",
                    self.solve_timeout.as_millis()
                );
                Err(BuildError::Timeout(self.solve_timeout))
            }
        }
    }

    /// [`generate_build`](Self::generate_build), wrapped for presentation.
    pub async fn respond(&self, budget: f64, goal: &str) -> BuildResponse {
        BuildResponse::from_result(self.generate_build(budget, goal).await, &self.assembler)
    }
}
