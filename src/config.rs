//! Catalog of plans and payment methods, read from TOML.
//!
//! The catalog lives in the platform config dir (`catalog.toml`). If it is
//! missing, the embedded default is written there on first use so it can
//! be edited.

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::OrderError;
use crate::model::{PaymentMethod, PlanOption, Yen};

pub const DEFAULT_CATALOG: &str = include_str!("../catalog.toml");
const CATALOG_FILE: &str = "catalog.toml";

/// Largest price (either sign) a catalog may list. Keeps every total the
/// engine can produce far inside `i64`.
pub const MAX_CATALOG_PRICE: Yen = 1_000_000_000_000;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MessagingConfig {
    pub url: Option<String>, // deep link opened after the summary is copied
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Catalog {
    pub default_plan: Option<String>,
    #[serde(default)]
    pub messaging: MessagingConfig,
    pub plans: Vec<PlanOption>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
}

impl Catalog {
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, OrderError> {
        let catalog: Catalog = toml::from_str(content).map_err(|source| OrderError::CatalogParse {
            path: origin.to_path_buf(),
            source,
        })?;
        catalog.check()?;
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self, OrderError> {
        Self::from_toml(DEFAULT_CATALOG, Path::new("<builtin>"))
    }

    fn check(&self) -> Result<(), OrderError> {
        let mut seen = HashSet::new();
        for plan in &self.plans {
            if !seen.insert(plan.id.as_str()) {
                return Err(OrderError::Catalog(format!("duplicate plan id '{}'", plan.id)));
            }
            if plan.light_discount_price > 0 {
                return Err(OrderError::Catalog(format!(
                    "plan '{}' has a positive light discount ({})",
                    plan.id, plan.light_discount_price
                )));
            }
            for price in [plan.base_price, plan.light_discount_price] {
                if price.unsigned_abs() > MAX_CATALOG_PRICE.unsigned_abs() {
                    return Err(OrderError::Catalog(format!(
                        "plan '{}' price {price} is out of range",
                        plan.id
                    )));
                }
            }
            check_single_line("plan", &plan.id, &plan.label)?;
        }
        for method in &self.payment_methods {
            check_single_line("payment method", &method.value, &method.label)?;
        }
        if let Some(id) = &self.default_plan {
            if self.plan(id).is_none() {
                return Err(OrderError::Catalog(format!("default plan '{id}' is not listed")));
            }
        }
        Ok(())
    }

    pub fn plan(&self, id: &str) -> Option<&PlanOption> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn default_plan(&self) -> Option<&PlanOption> {
        self.default_plan.as_deref().and_then(|id| self.plan(id))
    }

    /// Looks a payment method up by submitted value or display label.
    pub fn payment_method(&self, key: &str) -> Option<&PaymentMethod> {
        self.payment_methods
            .iter()
            .find(|m| m.value == key || m.label == key)
    }
}

// Each label becomes exactly one summary line
fn check_single_line(kind: &str, key: &str, label: &str) -> Result<(), OrderError> {
    if label.contains(['\n', '\r']) {
        return Err(OrderError::Catalog(format!(
            "{kind} '{key}' has a multi-line label"
        )));
    }
    Ok(())
}

pub fn default_catalog_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "mirai-navi", "order-form") {
        return proj_dirs.config_dir().join(CATALOG_FILE);
    }
    PathBuf::from(CATALOG_FILE)
}

pub fn expand_home_dir(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    if raw == "~" || raw.starts_with("~/") {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return PathBuf::from(raw.replacen('~', &home, 1));
        }
    }
    path.to_path_buf()
}

pub fn load_catalog(path: &Path) -> Result<Catalog, OrderError> {
    let content = fs::read_to_string(path).map_err(|e| OrderError::io(path, e))?;
    let catalog = Catalog::from_toml(&content, path)?;
    debug!(path = %path.display(), plans = catalog.plans.len(), "loaded catalog");
    Ok(catalog)
}

/// Writes the embedded default catalog to `path` unless a file is already
/// there. Returns whether a file was written.
pub fn init_catalog(path: &Path) -> Result<bool, OrderError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| OrderError::io(dir, e))?;
    }
    fs::write(path, DEFAULT_CATALOG).map_err(|e| OrderError::io(path, e))?;
    info!(path = %path.display(), "initialized default catalog");
    Ok(true)
}

pub fn load_or_init_catalog(path: &Path) -> Result<Catalog, OrderError> {
    init_catalog(path)?;
    load_catalog(path)
}
