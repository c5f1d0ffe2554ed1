use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use retailcraft_core::{Ack, BackendError, Size, StockBackend};
use retailcraft_inventory::{
    AdjustmentError, AdjustmentKind, GroupedInventory, InventoryQuery, StockAdjustment, aggregate,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Validation(#[from] AdjustmentError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "ok: {}", self.message),
            NoticeLevel::Warning => write!(f, "warning: {}", self.message),
            NoticeLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTiles {
    pub total_products: u64,
    pub total_stock: u64,
    pub low_stock_count: usize,
}

pub struct StockDesk<B>
where
    B: StockBackend,
{
    backend: Arc<B>,
    snapshot: Vec<GroupedInventory>,
    refreshed_at: Option<DateTime<Utc>>,
    notice: Option<Notice>,
}

impl<B> StockDesk<B>
where
    B: StockBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            snapshot: Vec::new(),
            refreshed_at: None,
            notice: None,
        }
    }

    pub fn snapshot(&self) -> &[GroupedInventory] {
        &self.snapshot
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn product(&self, product_id: &str) -> Option<&GroupedInventory> {
        self.snapshot
            .iter()
            .find(|group| group.product_id == product_id)
    }

    pub fn view(&self, query: &InventoryQuery) -> Vec<&GroupedInventory> {
        query.apply(&self.snapshot)
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub async fn refresh(&mut self) -> Result<&[GroupedInventory], DeskError> {
        match self.reload().await {
            Ok(()) => Ok(&self.snapshot),
            Err(err) => {
                self.fail(&err);
                Err(err.into())
            }
        }
    }

    async fn reload(&mut self) -> Result<(), BackendError> {
        let records = self.backend.list_stocks().await.inspect_err(|err| {
            warn!(error = %err, "inventory refresh failed, keeping last snapshot");
        })?;
        self.snapshot = aggregate(&records);
        self.refreshed_at = Some(Utc::now());
        info!(
            records = records.len(),
            products = self.snapshot.len(),
            "inventory refreshed"
        );
        Ok(())
    }

    pub async fn add_stock(
        &mut self,
        product_id: &str,
        size: Size,
        quantity: i64,
    ) -> Result<Ack, DeskError> {
        self.apply(StockAdjustment::add(product_id, size, quantity))
            .await
    }

    pub async fn reduce_stock(
        &mut self,
        product_id: &str,
        size: Size,
        quantity: i64,
    ) -> Result<Ack, DeskError> {
        self.apply(StockAdjustment::reduce(product_id, size, quantity))
            .await
    }

    /// Validates against the snapshot, sends the change, then re-fetches.
    /// An accepted change whose re-fetch fails still returns the
    /// acknowledgement, with a warning notice over the stale snapshot.
    pub async fn apply(&mut self, adjustment: StockAdjustment) -> Result<Ack, DeskError> {
        let change = match adjustment.validate(&self.snapshot) {
            Ok(change) => change,
            Err(err) => {
                self.notice = Some(Notice {
                    level: NoticeLevel::Error,
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };

        let result = match adjustment.kind {
            AdjustmentKind::Add => self.backend.add_stock(&change).await,
            AdjustmentKind::Reduce => self.backend.reduce_stock(&change).await,
        };

        let ack = match result {
            Ok(ack) => ack,
            Err(err) => {
                warn!(
                    product_id = %change.product_id,
                    size = %change.size,
                    kind = %adjustment.kind,
                    error = %err,
                    "stock change failed"
                );
                self.fail(&err);
                return Err(err.into());
            }
        };

        info!(
            product_id = %change.product_id,
            size = %change.size,
            quantity = change.quantity,
            kind = %adjustment.kind,
            "stock change accepted"
        );
        let message = ack
            .message
            .clone()
            .unwrap_or_else(|| default_ack_message(adjustment.kind).to_string());

        self.notice = Some(match self.reload().await {
            Ok(()) => Notice {
                level: NoticeLevel::Success,
                message,
            },
            Err(err) => Notice {
                level: NoticeLevel::Warning,
                message: format!("{message}; refresh failed: {}", err.notice_text()),
            },
        });
        Ok(ack)
    }

    pub async fn dashboard(&mut self) -> Result<DashboardTiles, DeskError> {
        let summary = match self.backend.stock_summary().await {
            Ok(summary) => summary,
            Err(err) => {
                self.fail(&err);
                return Err(err.into());
            }
        };
        let low_stock = match self.backend.low_stock().await {
            Ok(items) => items,
            Err(err) => {
                self.fail(&err);
                return Err(err.into());
            }
        };

        Ok(DashboardTiles {
            total_products: summary.total_products,
            total_stock: summary.total_stock,
            low_stock_count: low_stock.len(),
        })
    }

    fn fail(&mut self, err: &BackendError) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            message: err.notice_text(),
        });
    }
}

fn default_ack_message(kind: AdjustmentKind) -> &'static str {
    match kind {
        AdjustmentKind::Add => "Stock added",
        AdjustmentKind::Reduce => "Stock reduced",
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use retailcraft_core::{BackendResult, LowStockItem, StockChange, StockRecord, StockSummary};
    use retailcraft_inventory::StockStatus;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakeBackend {
        records: Mutex<Vec<StockRecord>>,
        list_calls: Mutex<usize>,
        mutations: Mutex<Vec<StockChange>>,
        fail_list: Mutex<bool>,
        reject_mutations: Mutex<Option<String>>,
    }

    impl FakeBackend {
        fn with(records: Vec<StockRecord>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
                ..Self::default()
            })
        }

        async fn change(&self, change: &StockChange, delta: i64) -> BackendResult<Ack> {
            if let Some(message) = self.reject_mutations.lock().await.clone() {
                return Err(BackendError::Rejected(message));
            }
            self.mutations.lock().await.push(change.clone());
            let mut records = self.records.lock().await;
            match records
                .iter_mut()
                .find(|r| r.product_id == change.product_id && r.size == change.size)
            {
                Some(record) => {
                    record.quantity = (i64::from(record.quantity) + delta) as u32;
                }
                None => records.push(StockRecord {
                    product_id: change.product_id.clone(),
                    product_name: "New".to_string(),
                    bar_code: "NEW".to_string(),
                    size: change.size,
                    quantity: delta as u32,
                }),
            }
            Ok(Ack { message: None })
        }
    }

    #[async_trait]
    impl StockBackend for FakeBackend {
        async fn list_stocks(&self) -> BackendResult<Vec<StockRecord>> {
            *self.list_calls.lock().await += 1;
            if *self.fail_list.lock().await {
                return Err(BackendError::Transport("connection refused".to_string()));
            }
            Ok(self.records.lock().await.clone())
        }

        async fn stock_summary(&self) -> BackendResult<StockSummary> {
            Ok(StockSummary {
                total_products: 7,
                total_stock: 310,
            })
        }

        async fn low_stock(&self) -> BackendResult<Vec<LowStockItem>> {
            let records = self.records.lock().await;
            Ok(records
                .iter()
                .filter(|r| r.quantity <= 5)
                .map(LowStockItem::from)
                .collect())
        }

        async fn add_stock(&self, change: &StockChange) -> BackendResult<Ack> {
            self.change(change, i64::from(change.quantity)).await
        }

        async fn reduce_stock(&self, change: &StockChange) -> BackendResult<Ack> {
            self.change(change, -i64::from(change.quantity)).await
        }
    }

    fn record(product_id: &str, name: &str, size: Size, quantity: u32) -> StockRecord {
        StockRecord {
            product_id: product_id.to_string(),
            product_name: name.to_string(),
            bar_code: format!("BC-{product_id}"),
            size,
            quantity,
        }
    }

    fn shelf() -> Vec<StockRecord> {
        vec![
            record("p1", "Shirt", Size::M, 0),
            record("p1", "Shirt", Size::L, 5),
            record("p1", "Shirt", Size::XL, 20),
            record("p2", "Cap", Size::S, 9),
        ]
    }

    #[tokio::test]
    async fn refresh_groups_the_fetched_records() {
        let mut desk = StockDesk::new(FakeBackend::with(shelf()));
        let groups = desk.refresh().await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].total_stock, 25);
        assert!(desk.refreshed_at().is_some());

        let low = desk.view(&InventoryQuery {
            status: StockStatus::Low,
            ..InventoryQuery::default()
        });
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].product_id, "p1");
    }

    #[tokio::test]
    async fn accepted_change_is_followed_by_a_full_refetch() {
        let backend = FakeBackend::with(shelf());
        let mut desk = StockDesk::new(backend.clone());
        desk.refresh().await.unwrap();

        desk.add_stock("p1", Size::M, 10).await.unwrap();

        assert_eq!(*backend.list_calls.lock().await, 2);
        let shirt = desk.product("p1").unwrap();
        assert_eq!(shirt.quantity(Size::M), Some(10));
        assert!(shirt.out_of_stock_sizes.is_empty());
        assert_eq!(
            desk.take_notice(),
            Some(Notice {
                level: NoticeLevel::Success,
                message: "Stock added".to_string()
            })
        );
        assert_eq!(desk.take_notice(), None);
    }

    #[tokio::test]
    async fn accepted_change_with_failed_refetch_warns_instead_of_failing() {
        let backend = FakeBackend::with(shelf());
        let mut desk = StockDesk::new(backend.clone());
        desk.refresh().await.unwrap();

        *backend.fail_list.lock().await = true;
        let ack = desk.add_stock("p1", Size::M, 3).await.unwrap();

        assert_eq!(ack, Ack { message: None });
        assert_eq!(backend.mutations.lock().await.len(), 1);
        assert_eq!(desk.product("p1").and_then(|p| p.quantity(Size::M)), Some(0));
        assert_eq!(
            desk.take_notice().map(|n| n.to_string()),
            Some("warning: Stock added; refresh failed: network error: connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn over_reduction_never_reaches_the_backend() {
        let backend = FakeBackend::with(shelf());
        let mut desk = StockDesk::new(backend.clone());
        desk.refresh().await.unwrap();

        let err = desk.reduce_stock("p1", Size::L, 6).await.unwrap_err();
        assert!(matches!(
            err,
            DeskError::Validation(AdjustmentError::ExceedsStock { available: 5, .. })
        ));
        assert!(backend.mutations.lock().await.is_empty());
        assert_eq!(desk.take_notice().map(|n| n.level), Some(NoticeLevel::Error));

        let err = desk.add_stock("p1", Size::L, 0).await.unwrap_err();
        assert!(matches!(
            err,
            DeskError::Validation(AdjustmentError::NonPositiveQuantity)
        ));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_stale_snapshot() {
        let backend = FakeBackend::with(shelf());
        let mut desk = StockDesk::new(backend.clone());
        desk.refresh().await.unwrap();
        let before = desk.snapshot().to_vec();

        *backend.fail_list.lock().await = true;
        assert!(matches!(
            desk.refresh().await,
            Err(DeskError::Backend(BackendError::Transport(_)))
        ));
        assert_eq!(desk.snapshot(), before.as_slice());
        assert_eq!(
            desk.take_notice().map(|n| n.message),
            Some("network error: connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn rejected_change_surfaces_backend_message() {
        let backend = FakeBackend::with(shelf());
        let mut desk = StockDesk::new(backend.clone());
        desk.refresh().await.unwrap();

        *backend.reject_mutations.lock().await = Some("Branch is locked".to_string());
        let err = desk.reduce_stock("p2", Size::S, 1).await.unwrap_err();
        assert!(matches!(err, DeskError::Backend(BackendError::Rejected(_))));
        assert_eq!(*backend.list_calls.lock().await, 1);
        assert_eq!(desk.product("p2").and_then(|p| p.quantity(Size::S)), Some(9));
        assert_eq!(
            desk.take_notice().map(|n| n.to_string()),
            Some("error: Branch is locked".to_string())
        );
    }

    #[tokio::test]
    async fn dashboard_uses_backend_figures() {
        let mut desk = StockDesk::new(FakeBackend::with(shelf()));
        let tiles = desk.dashboard().await.unwrap();
        assert_eq!(
            tiles,
            DashboardTiles {
                total_products: 7,
                total_stock: 310,
                low_stock_count: 2,
            }
        );
    }
}
