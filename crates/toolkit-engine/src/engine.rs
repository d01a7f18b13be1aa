//! Pipeline facade.

use crate::catalog::CapabilityCatalog;
use std::fmt;
use toolkit_engine_adapters::{AdapterOptions, AdapterRegistry, ProductRegistry};
use toolkit_engine_client::{ClientBuilder, GeneratedClient};
use toolkit_engine_core::{
    Credentials, EngineConfig, ProductDefinition, ProductId, Result, normalize_endpoints,
};
use toolkit_engine_selection::{
    CapabilityGroup, Chooser, Mapping, Selector, ambiguities, group, score_all,
};
use toolkit_engine_store::{JsonFileStore, RecordKind, RecordStore, RecordStoreExt, StoreError};

/// Ties registration, discovery, selection and client generation together.
///
/// Every stage reads its input from and writes its output to the record
/// store, so stages can run in separate processes.
///
/// # Examples
///
/// ```
/// use toolkit_engine::Engine;
/// use toolkit_engine_core::{AuthMethod, EngineConfig, ProductDefinition, ProductType};
///
/// # fn main() -> toolkit_engine_core::Result<()> {
/// let temp = tempfile::tempdir().unwrap();
/// let mut engine = Engine::new(EngineConfig::from_home(temp.path())?)?;
///
/// engine.register_product(ProductDefinition::new(
///     "pipedrive",
///     "Pipedrive",
///     ProductType::Crm,
///     "https://api.pipedrive.com/v1",
///     AuthMethod::ApiKey,
/// ))?;
///
/// let products = engine.list_products()?;
/// assert_eq!(products[0].name, "Pipedrive");
/// # Ok(())
/// # }
/// ```
pub struct Engine {
    config: EngineConfig,
    store: Box<dyn RecordStore>,
    adapters: AdapterRegistry,
    products: ProductRegistry,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("adapters", &self.adapters)
            .field("products", &self.products.len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine storing records in the configured home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the home
    /// directory cannot be created.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let store = JsonFileStore::new(&config.home_dir)?;
        Ok(Self::with_parts(
            config,
            store,
            AdapterRegistry::with_defaults(),
        ))
    }

    /// Creates an engine from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: EngineConfig,
        store: impl RecordStore + 'static,
        adapters: AdapterRegistry,
    ) -> Self {
        Self {
            config,
            store: Box::new(store),
            adapters,
            products: ProductRegistry::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Adapter registry used for discovery and authentication.
    #[must_use]
    pub const fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// Registers a product and persists its definition.
    ///
    /// Re-registering overwrites the previous definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition cannot be persisted.
    pub fn register_product(&mut self, product: ProductDefinition) -> Result<ProductDefinition> {
        let product = if product.registered_at.is_some() {
            product
        } else {
            product.registered_now()
        };

        self.store
            .save_as(&product.product_id, RecordKind::Product, &product)?;
        self.products.register(product.clone());
        Ok(product)
    }

    /// Looks up a product, in memory first and then in the store.
    ///
    /// # Errors
    ///
    /// Returns [`toolkit_engine_core::Error::ProductNotFound`] if the
    /// product was never registered.
    pub fn product(&self, product_id: &ProductId) -> Result<ProductDefinition> {
        if let Ok(product) = self.products.get(product_id) {
            return Ok(product.clone());
        }
        Ok(self.store.load_as(product_id, RecordKind::Product)?)
    }

    /// All persisted products, sorted by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_products(&self) -> Result<Vec<ProductDefinition>> {
        let mut products = Vec::new();
        for id in self.store.list_products()? {
            match self.store.load_as::<ProductDefinition>(&id, RecordKind::Product) {
                Ok(product) => products.push(product),
                Err(StoreError::Serialization(e)) => {
                    tracing::warn!("Skipping unreadable product record {}: {}", id, e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(products)
    }

    /// Fetches the product's API description and persists both the raw
    /// description and the normalized capabilities.
    ///
    /// # Errors
    ///
    /// - [`toolkit_engine_core::Error::ProductNotFound`] if not registered
    /// - [`toolkit_engine_core::Error::AdapterNotFound`] if no adapter
    ///   exists for the product
    /// - [`toolkit_engine_core::Error::Discovery`] if the description cannot
    ///   be fetched
    pub async fn discover(
        &self,
        product_id: &ProductId,
        options: AdapterOptions,
    ) -> Result<CapabilityCatalog> {
        let product = self.product(product_id)?;
        tracing::info!(
            "Starting discovery for {} ({}, {})",
            product.name,
            product.product_type,
            product.auth_method
        );

        let adapter = self.adapters.create(product_id, options)?;
        let spec = adapter.discover_spec().await?;
        self.store.save(product_id, RecordKind::RawSpec, &spec)?;

        let raw = adapter.extract_capabilities(&spec);
        let catalog = CapabilityCatalog::new(
            product_id.clone(),
            normalize_endpoints(product_id, raw),
        );
        self.store
            .save_as(product_id, RecordKind::Capabilities, &catalog)?;

        tracing::info!(
            "Discovered {} capabilities for {}",
            catalog.total_capabilities,
            product_id
        );
        Ok(catalog)
    }

    /// Capabilities persisted by the last discovery.
    ///
    /// # Errors
    ///
    /// Returns [`toolkit_engine_core::Error::NotFound`] if discovery has not
    /// run.
    pub fn capabilities(&self, product_id: &ProductId) -> Result<CapabilityCatalog> {
        Ok(self.store.load_as(product_id, RecordKind::Capabilities)?)
    }

    /// Scores and groups the discovered capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`toolkit_engine_core::Error::NotFound`] if discovery has not
    /// run.
    pub fn selection_groups(&self, product_id: &ProductId) -> Result<Vec<CapabilityGroup>> {
        let catalog = self.capabilities(product_id)?;
        let groups = group(score_all(catalog.capabilities));
        tracing::info!(
            "{} groups for {}, {} ambiguous",
            groups.len(),
            product_id,
            ambiguities(&groups).len()
        );
        Ok(groups)
    }

    /// Resolves groups into a mapping and persists it.
    ///
    /// Ambiguous groups are resolved by `chooser`, or automatically by score
    /// without one.
    ///
    /// # Errors
    ///
    /// Returns selection errors from the chooser or the selector, or an
    /// error if the mapping cannot be persisted.
    pub fn resolve(
        &self,
        product_id: &ProductId,
        groups: Vec<CapabilityGroup>,
        chooser: Option<&mut dyn Chooser>,
    ) -> Result<Mapping> {
        let mapping = Selector::new()
            .with_max_attempts(self.config.selection_attempts)
            .resolve(product_id, groups, chooser)?;
        self.store.save_as(product_id, RecordKind::Mapping, &mapping)?;
        Ok(mapping)
    }

    /// Scores, groups and resolves in one step.
    ///
    /// # Errors
    ///
    /// See [`selection_groups`](Self::selection_groups) and
    /// [`resolve`](Self::resolve).
    pub fn select(
        &self,
        product_id: &ProductId,
        chooser: Option<&mut dyn Chooser>,
    ) -> Result<Mapping> {
        let groups = self.selection_groups(product_id)?;
        self.resolve(product_id, groups, chooser)
    }

    /// Mapping persisted by the last selection.
    ///
    /// # Errors
    ///
    /// Returns [`toolkit_engine_core::Error::NotFound`] if selection has not
    /// run.
    pub fn mapping(&self, product_id: &ProductId) -> Result<Mapping> {
        Ok(self.store.load_as(product_id, RecordKind::Mapping)?)
    }

    /// Builds a client from the product definition and the persisted
    /// mapping, authenticated by the product's adapter.
    ///
    /// # Errors
    ///
    /// - [`toolkit_engine_core::Error::ProductNotFound`] if not registered
    /// - [`toolkit_engine_core::Error::AdapterNotFound`] for unknown
    ///   products
    /// - [`toolkit_engine_core::Error::NotFound`] if selection has not run
    /// - [`toolkit_engine_core::Error::Config`] for missing credentials or
    ///   an invalid base URL
    pub fn generate_client(
        &self,
        product_id: &ProductId,
        credentials: &Credentials,
    ) -> Result<GeneratedClient> {
        let product = self.product(product_id)?;
        let adapter = self.adapters.create(product_id, AdapterOptions::default())?;
        let mapping = self.mapping(product_id)?;

        ClientBuilder::from_config(&self.config).build(
            &mapping,
            &product.api_base_url,
            credentials,
            |creds| adapter.resolve_auth(creds),
        )
    }
}
