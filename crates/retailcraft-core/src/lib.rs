pub mod auth;
pub mod backend;
pub mod error;
pub mod locations;
pub mod models;
pub mod stock;

pub use auth::{Credentials, Portal, Principal, Role};
pub use backend::{AuthBackend, BackendResult, DirectoryBackend, StockBackend};
pub use error::{BackendError, ParseCustomerTypeError, ParseSizeError};
pub use locations::{Country, LocationDirectory, LocationSelection, Region};
pub use models::{
    Address, Branch, BranchUser, BusinessDetails, Customer, CustomerType, NewBranch,
    NewBranchUser, NewCustomer, NewProduct, Product,
};
pub use stock::{Ack, LowStockItem, Size, StockChange, StockRecord, StockSummary};
