//! Work order backlog: service requests raised from equipment nodes.

use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::application::services::{MAX_ID_ATTEMPTS, READING_DATE_FORMAT};
use crate::application::store::{load_json, save_json};
use crate::application::ApplicationResult;
use crate::domain::records::{find_by_key, prepend, update_by_key};
use crate::domain::{
    DomainError, EquipmentNode, Sector, WorkOrder, WorkOrderStatus, WorkOrderUpdate,
};
use crate::infrastructure::traits::FileSystem;

pub struct WorkOrderService {
    fs: Arc<dyn FileSystem>,
}

impl WorkOrderService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<WorkOrder>> {
        load_json(self.fs.as_ref(), path)
    }

    pub fn save(&self, path: &Path, orders: &[WorkOrder]) -> ApplicationResult<()> {
        save_json(self.fs.as_ref(), path, orders)
    }

    /// Orders matching both filters. `None` keeps everything.
    pub fn list(
        &self,
        orders: &[WorkOrder],
        status: Option<WorkOrderStatus>,
        sector: Option<Sector>,
    ) -> Vec<WorkOrder> {
        orders
            .iter()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .filter(|o| sector.map_or(true, |s| o.sector == s))
            .cloned()
            .collect()
    }

    /// Raise a service request against `node`, dated today.
    pub fn create(
        &self,
        orders: &[WorkOrder],
        node: &EquipmentNode,
        title: &str,
        description: &str,
    ) -> ApplicationResult<(Vec<WorkOrder>, WorkOrder)> {
        self.create_on(orders, node, title, description, Local::now().date_naive())
    }

    /// New orders go to the front of the backlog.
    #[instrument(level = "debug", skip(self, orders, node))]
    pub fn create_on(
        &self,
        orders: &[WorkOrder],
        node: &EquipmentNode,
        title: &str,
        description: &str,
        date: NaiveDate,
    ) -> ApplicationResult<(Vec<WorkOrder>, WorkOrder)> {
        let id = generate_order_id(orders, date.year())?;
        let request_id = format!("SS-{}", rand::thread_rng().gen_range(0..10_000));
        let order = WorkOrder::service_request(
            id,
            request_id,
            node,
            title,
            description,
            date.format(READING_DATE_FORMAT).to_string(),
        );
        info!("create work order: {} for {}", order.id, node.id);
        Ok((prepend(orders, order.clone()), order))
    }

    /// Merge `update` into the order `id`.
    #[instrument(level = "debug", skip(self, orders))]
    pub fn update(
        &self,
        orders: &[WorkOrder],
        id: &str,
        update: &WorkOrderUpdate,
    ) -> ApplicationResult<(Vec<WorkOrder>, WorkOrder)> {
        let current =
            find_by_key(orders, id).ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        let merged = update.apply_to(current)?;
        let updated = update_by_key(orders, id, |_| merged.clone());
        Ok((updated, merged))
    }
}

/// `OM-{year}-{n}` not yet used in `orders`.
pub fn generate_order_id(orders: &[WorkOrder], year: i32) -> ApplicationResult<String> {
    let prefix = format!("OM-{year}");
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = format!("{}-{}", prefix, rng.gen_range(0..10_000));
        if find_by_key(orders, &candidate).is_none() {
            return Ok(candidate);
        }
        debug!("generate_order_id: {} taken, retrying", candidate);
    }
    Err(DomainError::IdGenerationExhausted {
        prefix,
        attempts: MAX_ID_ATTEMPTS,
    }
    .into())
}
