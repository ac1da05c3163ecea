//! The seven directory operations.
//!
//! # Design Decisions
//! - Every read view is derived from one canonical list fetch; derived
//!   queries never refetch within a cache generation
//! - Lookup by id always goes to the dedicated endpoint so "not found" comes
//!   from the upstream rather than from a possibly stale list
//! - Concurrent list misses within one cache generation await a single
//!   fetch and all receive its outcome, failures included
//! - Successful writes invalidate every view

use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use crate::config::{CacheConfig, DirectoryConfig};
use crate::directory::cache::{CachedView, Generation, ViewCache, ViewKey};
use crate::directory::types::{Confirmation, CreateEmployeeRequest, CreatedEmployee, Employee};
use crate::directory::validation;
use crate::error::{DirectoryError, DirectoryResult};
use crate::resilience::RetryPolicy;
use crate::upstream::envelope::{validate, EnvelopeError};
use crate::upstream::{ApiPath, UpstreamClient, UpstreamError};

/// Size of the top earners view.
pub const TOP_EARNERS_LIMIT: usize = 10;

type ListOutcome = DirectoryResult<Arc<Vec<Employee>>>;

/// The list fetch currently running for one cache generation.
#[derive(Debug)]
struct ListFlight {
    generation: Generation,
    outcome: Arc<OnceCell<ListOutcome>>,
}

#[derive(Debug)]
pub struct EmployeeDirectory {
    upstream: UpstreamClient,
    retry: RetryPolicy,
    cache: ViewCache,
    list_flight: Mutex<Option<ListFlight>>,
}

impl EmployeeDirectory {
    pub fn new(upstream: UpstreamClient, retry: RetryPolicy, cache: &CacheConfig) -> Self {
        Self {
            upstream,
            retry,
            cache: ViewCache::from_config(cache),
            list_flight: Mutex::new(None),
        }
    }

    /// Build the directory with the production `reqwest` transport.
    pub fn from_config(config: &DirectoryConfig) -> Result<Self, UpstreamError> {
        Ok(Self::new(
            UpstreamClient::from_config(&config.upstream)?,
            RetryPolicy::from_config(&config.retries),
            &config.cache,
        ))
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    /// Every employee, served from cache when possible.
    pub async fn list_all(&self) -> DirectoryResult<Vec<Employee>> {
        Ok(self.all_employees().await?.as_ref().clone())
    }

    /// Employees whose name contains `term`, ignoring case.
    pub async fn search_by_name(&self, term: &str) -> DirectoryResult<Vec<Employee>> {
        let term = validation::validate_search_string(Some(term))?;
        let key = ViewKey::search(term);
        if let Some(CachedView::Employees(found)) = self.cache.get(&key) {
            return Ok(found.as_ref().clone());
        }

        let generation = self.cache.generation();
        let needle = term.to_lowercase();
        let found: Vec<Employee> = self
            .all_employees()
            .await?
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        if found.is_empty() {
            tracing::debug!(term, "Search matched no employees");
            return Err(DirectoryError::NoData);
        }

        self.cache
            .insert(key, CachedView::Employees(Arc::new(found.clone())), generation);
        Ok(found)
    }

    /// One employee from the by-id endpoint. Never cached.
    pub async fn get_by_id(&self, id: &str) -> DirectoryResult<Employee> {
        let id = validation::validate_id(Some(id))?;
        let envelope = self
            .retry
            .run(ApiPath::Employee.operation(), || self.upstream.employee(id))
            .await?;

        validate::<Employee>(envelope).map_err(|err| match err {
            EnvelopeError::NoData => DirectoryError::NotFound { id: id.to_string() },
            other => other.into(),
        })
    }

    pub async fn highest_salary(&self) -> DirectoryResult<u64> {
        if let Some(CachedView::Salary(salary)) = self.cache.get(&ViewKey::HighestSalary) {
            return Ok(salary);
        }

        let generation = self.cache.generation();
        let salary = self
            .all_employees()
            .await?
            .iter()
            .map(|e| e.salary)
            .max()
            .ok_or(DirectoryError::NoData)?;

        self.cache
            .insert(ViewKey::HighestSalary, CachedView::Salary(salary), generation);
        Ok(salary)
    }

    /// Names of the ten best paid employees, highest first. Ties keep list
    /// order. Fewer than ten when the list is shorter.
    pub async fn top_ten_earners(&self) -> DirectoryResult<Vec<String>> {
        if let Some(CachedView::Names(names)) = self.cache.get(&ViewKey::TopTenEarners) {
            return Ok(names.as_ref().clone());
        }

        let generation = self.cache.generation();
        let mut ranked: Vec<Employee> = self.all_employees().await?.as_ref().clone();
        ranked.sort_by(|a, b| b.salary.cmp(&a.salary));
        let names: Vec<String> = ranked
            .into_iter()
            .take(TOP_EARNERS_LIMIT)
            .map(|e| e.name)
            .collect();

        self.cache
            .insert(ViewKey::TopTenEarners, CachedView::Names(Arc::new(names.clone())), generation);
        Ok(names)
    }

    /// Create an employee from caller-supplied fields.
    pub async fn create(&self, fields: &Map<String, Value>) -> DirectoryResult<Employee> {
        let new = validation::parse_new_employee(fields)?;
        let request = CreateEmployeeRequest::from(&new);

        let envelope = self
            .retry
            .run(ApiPath::Create.operation(), || self.upstream.create_employee(&request))
            .await?;
        let created: CreatedEmployee = validate(envelope)?;

        self.cache.invalidate_all();

        let employee = created.into_employee(&new);
        tracing::info!(id = employee.id, name = %employee.name, "Employee created");
        Ok(employee)
    }

    /// Delete by id, returning the upstream confirmation.
    pub async fn delete_by_id(&self, id: &str) -> DirectoryResult<String> {
        let id = validation::validate_id(Some(id))?;
        let envelope = self
            .retry
            .run(ApiPath::Delete.operation(), || self.upstream.delete_employee(id))
            .await?;
        let Confirmation(confirmation) = validate::<Confirmation>(envelope)?;

        self.cache.invalidate_all();

        tracing::info!(id, "Employee deleted");
        Ok(confirmation)
    }

    async fn all_employees(&self) -> ListOutcome {
        if let Some(CachedView::Employees(all)) = self.cache.get(&ViewKey::AllEmployees) {
            return Ok(all);
        }

        let generation = self.cache.generation();
        let outcome = self.join_list_flight(generation).await;
        let result = outcome
            .get_or_init(|| self.fetch_list(generation))
            .await
            .clone();

        let mut slot = self.list_flight.lock().await;
        if slot
            .as_ref()
            .is_some_and(|flight| Arc::ptr_eq(&flight.outcome, &outcome))
        {
            *slot = None;
        }
        result
    }

    /// Join the running list fetch for `generation`, or register a new one.
    async fn join_list_flight(&self, generation: Generation) -> Arc<OnceCell<ListOutcome>> {
        let mut slot = self.list_flight.lock().await;
        match slot.as_ref() {
            Some(flight) if flight.generation == generation && !flight.outcome.initialized() => {
                tracing::debug!("Joining list fetch in flight");
                flight.outcome.clone()
            }
            _ => {
                let outcome = Arc::new(OnceCell::new());
                *slot = Some(ListFlight {
                    generation,
                    outcome: outcome.clone(),
                });
                outcome
            }
        }
    }

    async fn fetch_list(&self, generation: Generation) -> ListOutcome {
        let envelope = self
            .retry
            .run(ApiPath::Employees.operation(), || self.upstream.list_employees())
            .await?;
        let all: Arc<Vec<Employee>> = Arc::new(validate(envelope)?);

        tracing::debug!(count = all.len(), "Fetched employee list");
        self.cache
            .insert(ViewKey::AllEmployees, CachedView::Employees(all.clone()), generation);
        Ok(all)
    }
}
