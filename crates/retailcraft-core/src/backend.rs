use async_trait::async_trait;

use crate::{
    auth::{Credentials, Principal},
    error::BackendError,
    models::{
        Branch, BranchUser, Customer, NewBranch, NewBranchUser, NewCustomer, NewProduct, Product,
    },
    stock::{Ack, LowStockItem, StockChange, StockRecord, StockSummary},
};

pub type BackendResult<T> = Result<T, BackendError>;

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Principal>;
    async fn sign_out(&self);
}

#[async_trait]
pub trait StockBackend: Send + Sync {
    async fn list_stocks(&self) -> BackendResult<Vec<StockRecord>>;
    async fn stock_summary(&self) -> BackendResult<StockSummary>;
    async fn low_stock(&self) -> BackendResult<Vec<LowStockItem>>;
    async fn add_stock(&self, change: &StockChange) -> BackendResult<Ack>;
    async fn reduce_stock(&self, change: &StockChange) -> BackendResult<Ack>;
}

#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    async fn list_branches(&self) -> BackendResult<Vec<Branch>>;
    async fn create_branch(&self, branch: &NewBranch) -> BackendResult<Branch>;
    async fn list_branch_users(&self, branch_id: &str) -> BackendResult<Vec<BranchUser>>;
    async fn create_branch_user(&self, user: &NewBranchUser) -> BackendResult<BranchUser>;
    async fn list_customers(&self) -> BackendResult<Vec<Customer>>;
    async fn create_customer(&self, customer: &NewCustomer) -> BackendResult<Customer>;
    async fn list_products(&self) -> BackendResult<Vec<Product>>;
    async fn create_product(&self, product: &NewProduct) -> BackendResult<Product>;
}
