use chrono::{DateTime, Utc};
use retailcraft_core::{Ack, BackendError, Principal, StockSummary};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

pub trait IntoPayload {
    type Output;

    fn into_payload(self) -> Option<Self::Output>;
}

impl<T: IntoPayload> Envelope<T> {
    pub fn into_result(self) -> Result<T::Output, BackendError> {
        if !self.success {
            return Err(BackendError::Rejected(self.message.unwrap_or_default()));
        }
        self.payload
            .into_payload()
            .ok_or_else(|| BackendError::Malformed("success response without payload".to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPayload<T> {
    pub data: Option<T>,
}

impl<T> IntoPayload for DataPayload<T> {
    type Output = T;

    fn into_payload(self) -> Option<T> {
        self.data
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub total_products: Option<u64>,
    pub total_stock: Option<u64>,
}

impl IntoPayload for SummaryPayload {
    type Output = StockSummary;

    fn into_payload(self) -> Option<StockSummary> {
        Some(StockSummary {
            total_products: self.total_products?,
            total_stock: self.total_stock?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub token: Option<String>,
    pub user: Option<Principal>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub principal: Principal,
    pub expires_at: Option<DateTime<Utc>>,
}

impl IntoPayload for LoginPayload {
    type Output = LoginGrant;

    fn into_payload(self) -> Option<LoginGrant> {
        Some(LoginGrant {
            token: self.token.filter(|token| !token.is_empty())?,
            principal: self.user?,
            expires_at: self.expires_at,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoPayload {}

impl Envelope<NoPayload> {
    pub fn into_ack(self) -> Result<Ack, BackendError> {
        if !self.success {
            return Err(BackendError::Rejected(self.message.unwrap_or_default()));
        }
        Ok(Ack {
            message: self.message,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
