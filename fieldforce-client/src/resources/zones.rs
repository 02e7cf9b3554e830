//! Zone and territory manager

use shared::list::{Pagination, paginate};
use shared::models::{
    Territory, TerritoryCreate, TerritoryUpdate, Zone, ZoneCreate, ZoneUpdate,
};
use shared::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use shared::{DomainError, list};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::{DataMode, SyncedResource};
use crate::{ClientResult, resources};

/// Rows shown per zone/territory page
pub const PAGE_SIZE: usize = 8;

/// Manager for the geographic sales hierarchy
#[derive(Debug)]
pub struct ZoneManager {
    api: ApiClient,
    store: LocalStore,
    zones_resource: SyncedResource<Zone>,
    territories_resource: SyncedResource<Territory>,
    zones: Vec<Zone>,
    territories: Vec<Territory>,
    mode: DataMode,
}

impl ZoneManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let zones_resource = SyncedResource::new("zones", keys::ZONES);
        let territories_resource = SyncedResource::new("territories", keys::TERRITORIES);
        let zones = zones_resource.load_local(&store);
        let territories = territories_resource.load_local(&store);
        Self {
            api,
            store,
            zones_resource,
            territories_resource,
            zones,
            territories,
            mode: DataMode::Fallback,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// Fetch zones and territories together; the zone fetch decides the
    /// mode.
    pub async fn refresh(&mut self) -> DataMode {
        let (zones, territories) = tokio::join!(
            self.zones_resource.refresh(&self.api, &self.store),
            self.territories_resource.refresh(&self.api, &self.store),
        );
        let (mode, zones) = zones;
        let (_, territories) = territories;
        self.mode = mode;
        self.zones = zones;
        self.territories = territories;
        mode
    }

    /// Zones matching a name/description search, in list order.
    pub fn search_zones(&self, term: &str) -> Vec<&Zone> {
        self.zones
            .iter()
            .filter(|z| {
                list::matches_search(term, &[&z.name, z.description.as_deref().unwrap_or("")])
            })
            .collect()
    }

    /// Territories matching a name/zone/manager search, in list order.
    pub fn search_territories(&self, term: &str) -> Vec<&Territory> {
        self.territories
            .iter()
            .filter(|t| {
                list::matches_search(
                    term,
                    &[&t.name, &t.zone, t.manager.as_deref().unwrap_or("")],
                )
            })
            .collect()
    }

    pub fn zone_page(&self, term: &str, page: usize) -> (Vec<&Zone>, Pagination) {
        let filtered = self.search_zones(term);
        let paged = paginate(&filtered, page, PAGE_SIZE);
        (paged.items.to_vec(), paged.pagination)
    }

    /// Territories grouped under one zone name.
    pub fn territories_in(&self, zone: &str) -> Vec<&Territory> {
        self.territories.iter().filter(|t| t.zone == zone).collect()
    }

    // ========== Zone CRUD ==========

    pub async fn add_zone(&mut self, payload: ZoneCreate) -> ClientResult<()> {
        validate_required_text(&payload.name, "zone name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        if self.mode == DataMode::Api {
            match self.api.post::<Zone, _>("zones", &payload).await {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "zone create failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        let id = resources::next_id(self.zones.iter().map(|z| z.id));
        self.zones.push(Zone::from_create(id, payload));
        self.zones_resource.save_local(&self.store, &self.zones);
        Ok(())
    }

    pub async fn update_zone(&mut self, id: i64, update: ZoneUpdate) -> ClientResult<()> {
        if !self.zones.iter().any(|z| z.id == id) {
            return Err(DomainError::not_found(format!("zone {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self.api.put::<Zone, _>(&format!("zones/{id}"), &update).await {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "zone update failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(zone) = self.zones.iter_mut().find(|z| z.id == id) {
            zone.apply(update);
        }
        self.zones_resource.save_local(&self.store, &self.zones);
        Ok(())
    }

    pub async fn delete_zone(&mut self, id: i64) -> ClientResult<()> {
        if !self.zones.iter().any(|z| z.id == id) {
            return Err(DomainError::not_found(format!("zone {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self.api.delete(&format!("zones/{id}")).await {
                Ok(()) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "zone delete failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        self.zones.retain(|z| z.id != id);
        self.zones_resource.save_local(&self.store, &self.zones);
        Ok(())
    }

    // ========== Territory CRUD ==========

    pub async fn add_territory(&mut self, payload: TerritoryCreate) -> ClientResult<()> {
        validate_required_text(&payload.name, "territory name", MAX_NAME_LEN)?;
        validate_required_text(&payload.zone, "zone", MAX_NAME_LEN)?;
        if self.mode == DataMode::Api {
            match self.api.post::<Territory, _>("territories", &payload).await {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "territory create failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        let id = resources::next_id(self.territories.iter().map(|t| t.id));
        self.territories.push(Territory::from_create(id, payload));
        self.territories_resource
            .save_local(&self.store, &self.territories);
        Ok(())
    }

    pub async fn update_territory(&mut self, id: i64, update: TerritoryUpdate) -> ClientResult<()> {
        if !self.territories.iter().any(|t| t.id == id) {
            return Err(DomainError::not_found(format!("territory {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self
                .api
                .put::<Territory, _>(&format!("territories/{id}"), &update)
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "territory update failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(territory) = self.territories.iter_mut().find(|t| t.id == id) {
            territory.apply(update);
        }
        self.territories_resource
            .save_local(&self.store, &self.territories);
        Ok(())
    }

    pub async fn delete_territory(&mut self, id: i64) -> ClientResult<()> {
        if !self.territories.iter().any(|t| t.id == id) {
            return Err(DomainError::not_found(format!("territory {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self.api.delete(&format!("territories/{id}")).await {
                Ok(()) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "territory delete failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        self.territories.retain(|t| t.id != id);
        self.territories_resource
            .save_local(&self.store, &self.territories);
        Ok(())
    }
}
