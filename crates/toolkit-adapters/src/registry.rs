//! Adapter and product registries.

use crate::adapter::{AdapterOptions, ProductAdapter};
use crate::hubspot::HubSpotAdapter;
use crate::pipedrive::PipedriveAdapter;
use std::collections::BTreeMap;
use std::fmt;
use toolkit_engine_core::{Error, ProductDefinition, ProductId, Result};

/// Constructor of an adapter for one product.
pub type AdapterFactory =
    Box<dyn Fn(AdapterOptions) -> Result<Box<dyn ProductAdapter>> + Send + Sync>;

/// Maps product ids to adapter factories.
///
/// # Examples
///
/// ```
/// use toolkit_engine_adapters::{AdapterOptions, AdapterRegistry};
/// use toolkit_engine_core::ProductId;
///
/// let registry = AdapterRegistry::with_defaults();
/// assert_eq!(registry.supported(), vec!["hubspot", "pipedrive"]);
///
/// let err = registry
///     .create(&ProductId::new("zoho"), AdapterOptions::default())
///     .unwrap_err();
/// assert!(err.to_string().contains("hubspot, pipedrive"));
/// ```
#[derive(Default)]
pub struct AdapterRegistry {
    factories: BTreeMap<ProductId, AdapterFactory>,
}

impl AdapterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in HubSpot and Pipedrive adapters.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HubSpotAdapter::PRODUCT_ID, |options| {
            Ok(Box::new(HubSpotAdapter::new(options)?) as Box<dyn ProductAdapter>)
        });
        registry.register(PipedriveAdapter::PRODUCT_ID, |options| {
            Ok(Box::new(PipedriveAdapter::new(options)?) as Box<dyn ProductAdapter>)
        });
        registry
    }

    /// Registers a factory, replacing any previous one for the product.
    pub fn register<F>(&mut self, product_id: impl Into<ProductId>, factory: F)
    where
        F: Fn(AdapterOptions) -> Result<Box<dyn ProductAdapter>> + Send + Sync + 'static,
    {
        let product_id = product_id.into();
        tracing::debug!("Registered adapter factory for {}", product_id);
        self.factories.insert(product_id, Box::new(factory));
    }

    /// Creates the adapter for a product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdapterNotFound`] if no factory is registered, or
    /// the factory's own error.
    pub fn create(
        &self,
        product_id: &ProductId,
        options: AdapterOptions,
    ) -> Result<Box<dyn ProductAdapter>> {
        let factory = self
            .factories
            .get(product_id)
            .ok_or_else(|| Error::AdapterNotFound {
                product: product_id.to_string(),
                supported: self.supported().join(", "),
            })?;
        factory(options)
    }

    /// Returns `true` if an adapter is registered for the product.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.factories.contains_key(product_id)
    }

    /// Supported product ids, sorted.
    #[must_use]
    pub fn supported(&self) -> Vec<&str> {
        self.factories.keys().map(ProductId::as_str).collect()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("supported", &self.supported())
            .finish()
    }
}

/// In-memory registry of product definitions.
///
/// # Examples
///
/// ```
/// use toolkit_engine_adapters::ProductRegistry;
/// use toolkit_engine_core::{AuthMethod, ProductDefinition, ProductId, ProductType};
///
/// let mut registry = ProductRegistry::new();
/// registry.register(ProductDefinition::new(
///     "hubspot",
///     "HubSpot",
///     ProductType::Crm,
///     "https://api.hubapi.com",
///     AuthMethod::Oauth2,
/// ));
///
/// assert_eq!(registry.get(&ProductId::new("hubspot")).unwrap().name, "HubSpot");
/// assert!(registry.get(&ProductId::new("zoho")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProductRegistry {
    products: BTreeMap<ProductId, ProductDefinition>,
}

impl ProductRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a product. Re-registration overwrites with a warning.
    pub fn register(&mut self, product: ProductDefinition) {
        let id = product.product_id.clone();
        if self.products.insert(id.clone(), product).is_some() {
            tracing::warn!("Product {} already registered, overwriting", id);
        } else {
            tracing::info!("Registered product: {}", id);
        }
    }

    /// Looks up a product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProductNotFound`] if the product is not registered.
    pub fn get(&self, product_id: &ProductId) -> Result<&ProductDefinition> {
        self.products
            .get(product_id)
            .ok_or_else(|| Error::ProductNotFound {
                product: product_id.to_string(),
            })
    }

    /// All products sorted by id.
    #[must_use]
    pub fn list(&self) -> Vec<&ProductDefinition> {
        self.products.values().collect()
    }

    /// Removes every product.
    pub fn reset(&mut self) {
        self.products.clear();
    }

    /// Number of registered products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
