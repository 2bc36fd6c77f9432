use async_trait::async_trait;
use models::{Debt, FinanceData, Month, Preferences, Profile, QuickAction, Salary, Savings};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::Result;

/// Keyed-upsert store for the single finance document.
/// This abstraction allows swapping the JSON file for a database-backed
/// implementation without touching the handlers.
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    async fn fetch_all(&self) -> Result<FinanceData>;
    async fn find_debt(&self, id: &str) -> Result<Option<Debt>>;
    async fn upsert_debt(&self, debt: Debt) -> Result<Debt>;
    async fn delete_debt(&self, id: &str) -> Result<()>;
    async fn update_salary(&self, salary: Salary) -> Result<Salary>;
    async fn update_savings(&self, savings: Savings) -> Result<Savings>;
    async fn upsert_month(&self, month: Month) -> Result<Month>;
    async fn replace_quick_actions(&self, actions: Vec<QuickAction>) -> Result<Vec<QuickAction>>;
    async fn reorder_quick_actions(&self, route_order: Vec<String>) -> Result<Vec<QuickAction>>;
    async fn remove_quick_action(&self, route: &str) -> Result<()>;
    async fn update_preferences(&self, preferences: Preferences) -> Result<Preferences>;
    async fn update_profile(&self, profile: Profile) -> Result<Profile>;
    async fn invalidate_cache(&self);
}

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// In-memory copy of the document plus freshness bookkeeping. Lives
/// inside the repository object so tests can construct and reset it
/// instead of fighting process-global state.
#[derive(Debug, Default)]
struct CachedDocument {
    data: Option<FinanceData>,
    loaded_at: Option<Instant>,
    version: u64,
}

impl CachedDocument {
    fn fresh(&self, ttl: Duration) -> Option<&FinanceData> {
        let loaded_at = self.loaded_at?;
        if loaded_at.elapsed() < ttl {
            self.data.as_ref()
        } else {
            None
        }
    }
}

/// File-based implementation that keeps the whole document in one JSON
/// file, seeded with defaults on first access.
pub struct JsonFileRepository {
    data_path: PathBuf,
    cache_ttl: Duration,
    cache: RwLock<CachedDocument>,
}

impl JsonFileRepository {
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        Self::with_ttl(data_path, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl<P: AsRef<Path>>(data_path: P, cache_ttl: Duration) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            cache_ttl,
            cache: RwLock::new(CachedDocument::default()),
        }
    }

    /// Monotonic counter bumped on every write or invalidation.
    pub async fn cache_version(&self) -> u64 {
        self.cache.read().await.version
    }

    /// Load the document, using the cache while it is fresh.
    async fn load(&self) -> Result<FinanceData> {
        {
            let cache = self.cache.read().await;
            if let Some(data) = cache.fresh(self.cache_ttl) {
                return Ok(data.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have filled the cache while we waited.
        if let Some(data) = cache.fresh(self.cache_ttl) {
            return Ok(data.clone());
        }

        let data = self.read_or_seed().await?;
        cache.data = Some(data.clone());
        cache.loaded_at = Some(Instant::now());
        Ok(data)
    }

    async fn read_or_seed(&self) -> Result<FinanceData> {
        if self.data_path.exists() {
            let content = tokio::fs::read_to_string(&self.data_path).await?;
            Ok(serde_json::from_str(&content)?)
        } else {
            // First run: seed the file with the starter document.
            let data = FinanceData::seeded();
            self.write_file(&data).await?;
            Ok(data)
        }
    }

    async fn write_file(&self, data: &FinanceData) -> Result<()> {
        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&self.data_path, json).await?;
        Ok(())
    }

    /// Read-modify-write helper every mutation goes through. The cache
    /// write lock is held across the whole cycle, so concurrent mutations
    /// serialize instead of overwriting each other's changes.
    async fn mutate<F>(&self, apply: F) -> Result<FinanceData>
    where
        F: FnOnce(&mut FinanceData) + Send,
    {
        let mut cache = self.cache.write().await;
        let mut data = match cache.fresh(self.cache_ttl) {
            Some(cached) => cached.clone(),
            None => self.read_or_seed().await?,
        };

        apply(&mut data);

        self.write_file(&data).await?;
        cache.data = Some(data.clone());
        cache.loaded_at = Some(Instant::now());
        cache.version += 1;
        Ok(data)
    }
}

#[async_trait]
impl FinanceRepository for JsonFileRepository {
    async fn fetch_all(&self) -> Result<FinanceData> {
        self.load().await
    }

    async fn find_debt(&self, id: &str) -> Result<Option<Debt>> {
        let data = self.load().await?;
        Ok(data.debts.into_iter().find(|d| d.id == id))
    }

    async fn upsert_debt(&self, mut debt: Debt) -> Result<Debt> {
        // Last line of defense for the unpaid-debt invariant; every
        // write path lands here.
        calculations::enforce_paid_invariant(&mut debt);
        let stored = debt.clone();
        self.mutate(move |data| {
            match data.debts.iter_mut().find(|d| d.id == debt.id) {
                Some(existing) => *existing = debt,
                None => data.debts.push(debt),
            }
        })
        .await?;
        Ok(stored)
    }

    async fn delete_debt(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.mutate(move |data| data.debts.retain(|d| d.id != id))
            .await?;
        Ok(())
    }

    async fn update_salary(&self, salary: Salary) -> Result<Salary> {
        let stored = salary.clone();
        self.mutate(move |data| data.salary = salary).await?;
        Ok(stored)
    }

    async fn update_savings(&self, savings: Savings) -> Result<Savings> {
        let stored = savings.clone();
        self.mutate(move |data| data.savings = savings).await?;
        Ok(stored)
    }

    async fn upsert_month(&self, month: Month) -> Result<Month> {
        let stored = month.clone();
        self.mutate(move |data| {
            match data.months.iter_mut().find(|m| m.id == month.id) {
                Some(existing) => *existing = month,
                None => data.months.push(month),
            }
        })
        .await?;
        Ok(stored)
    }

    async fn replace_quick_actions(&self, actions: Vec<QuickAction>) -> Result<Vec<QuickAction>> {
        let data = self.mutate(move |data| data.quick_actions = actions).await?;
        Ok(data.quick_actions)
    }

    async fn reorder_quick_actions(&self, route_order: Vec<String>) -> Result<Vec<QuickAction>> {
        let data = self
            .mutate(move |data| {
                for action in data.quick_actions.iter_mut() {
                    if let Some(position) = route_order.iter().position(|r| *r == action.route) {
                        action.order = position as i32;
                    }
                }
                data.quick_actions.sort_by_key(|a| a.order);
            })
            .await?;
        Ok(data.quick_actions)
    }

    async fn remove_quick_action(&self, route: &str) -> Result<()> {
        let route = route.to_string();
        self.mutate(move |data| data.quick_actions.retain(|a| a.route != route))
            .await?;
        Ok(())
    }

    async fn update_preferences(&self, preferences: Preferences) -> Result<Preferences> {
        let stored = preferences.clone();
        self.mutate(move |data| data.preferences = preferences)
            .await?;
        Ok(stored)
    }

    async fn update_profile(&self, profile: Profile) -> Result<Profile> {
        let stored = profile.clone();
        self.mutate(move |data| data.profile = profile).await?;
        Ok(stored)
    }

    async fn invalidate_cache(&self) {
        let mut cache = self.cache.write().await;
        cache.data = None;
        cache.loaded_at = None;
        cache.version += 1;
    }
}
