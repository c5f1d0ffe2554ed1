use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use retailcraft_core::{
    Ack, AuthBackend, BackendError, BackendResult, Branch, BranchUser, Credentials, Customer,
    DirectoryBackend, LowStockItem, NewBranch, NewBranchUser, NewCustomer, NewProduct, Portal,
    Principal, Product, StockBackend, StockChange, StockRecord, StockSummary,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    contracts::{DataPayload, Envelope, ErrorBody, IntoPayload, LoginPayload, NoPayload, SummaryPayload},
    session::{AuthSession, Session},
};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct RetailClient {
    http: Client,
    base_url: String,
    session: RwLock<Session>,
}

impl RetailClient {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("retailcraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session: RwLock::new(Session::default()),
        })
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn principal(&self) -> Option<Principal> {
        self.session.read().await.principal().cloned()
    }

    fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn authorized(&self, request: RequestBuilder) -> BackendResult<RequestBuilder> {
        let session = self.session.read().await;
        let token = session
            .bearer_token()
            .ok_or(BackendError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn get<P>(&self, path: &str) -> BackendResult<P::Output>
    where
        P: IntoPayload + DeserializeOwned,
    {
        let request = self.authorized(self.http.get(self.endpoint(path))).await?;
        self.dispatch::<P>(request).await?.into_result()
    }

    async fn post<B, P>(&self, path: &str, body: &B) -> BackendResult<P::Output>
    where
        B: Serialize + Sync,
        P: IntoPayload + DeserializeOwned,
    {
        let request = self
            .authorized(self.http.post(self.endpoint(path)).json(body))
            .await?;
        self.dispatch::<P>(request).await?.into_result()
    }

    async fn post_ack<B>(&self, path: &str, body: &B) -> BackendResult<Ack>
    where
        B: Serialize + Sync,
    {
        let request = self
            .authorized(self.http.post(self.endpoint(path)).json(body))
            .await?;
        self.dispatch::<NoPayload>(request).await?.into_ack()
    }

    async fn dispatch<P: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> BackendResult<Envelope<P>> {
        let request_id = Uuid::new_v4();
        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        debug!(%request_id, status = status.as_u16(), "backend responded");

        if status == StatusCode::UNAUTHORIZED && self.force_expiry().await {
            return Err(BackendError::Unauthorized);
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(%request_id, error = %e, "backend sent an unreadable body");
            BackendError::Malformed(e.to_string())
        })
    }

    // false when no live session existed, as during a failed login
    async fn force_expiry(&self) -> bool {
        let mut session = self.session.write().await;
        match session.expire() {
            Ok(()) => {
                warn!("backend rejected the session token, signing out");
                true
            }
            Err(_) => false,
        }
    }
}

#[async_trait]
impl AuthBackend for RetailClient {
    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Principal> {
        let path = match credentials.portal {
            Portal::Admin => "/api/auth/admin/login",
            Portal::Branch => "/api/auth/user/login",
        };
        let request = self.http.post(self.endpoint(path)).json(credentials);
        let grant = self.dispatch::<LoginPayload>(request).await?.into_result()?;

        info!(user = %grant.principal.email, portal = %credentials.portal, "signed in");
        let principal = grant.principal.clone();
        self.session.write().await.sign_in(AuthSession::new(
            grant.token,
            grant.principal,
            grant.expires_at,
        ));
        Ok(principal)
    }

    async fn sign_out(&self) {
        self.session.write().await.sign_out();
        info!("signed out");
    }
}

#[async_trait]
impl StockBackend for RetailClient {
    async fn list_stocks(&self) -> BackendResult<Vec<StockRecord>> {
        self.get::<DataPayload<Vec<StockRecord>>>("/api/stocks").await
    }

    async fn stock_summary(&self) -> BackendResult<StockSummary> {
        self.get::<SummaryPayload>("/api/stocks/summary").await
    }

    async fn low_stock(&self) -> BackendResult<Vec<LowStockItem>> {
        self.get::<DataPayload<Vec<LowStockItem>>>("/api/stocks/low-stock")
            .await
    }

    async fn add_stock(&self, change: &StockChange) -> BackendResult<Ack> {
        self.post_ack("/api/stocks/add", change).await
    }

    async fn reduce_stock(&self, change: &StockChange) -> BackendResult<Ack> {
        self.post_ack("/api/stocks/reduce", change).await
    }
}

#[async_trait]
impl DirectoryBackend for RetailClient {
    async fn list_branches(&self) -> BackendResult<Vec<Branch>> {
        self.get::<DataPayload<Vec<Branch>>>("/api/branches").await
    }

    async fn create_branch(&self, branch: &NewBranch) -> BackendResult<Branch> {
        self.post::<_, DataPayload<Branch>>("/api/branches", branch)
            .await
    }

    async fn list_branch_users(&self, branch_id: &str) -> BackendResult<Vec<BranchUser>> {
        self.get::<DataPayload<Vec<BranchUser>>>(&format!("/api/branches/{branch_id}/users"))
            .await
    }

    async fn create_branch_user(&self, user: &NewBranchUser) -> BackendResult<BranchUser> {
        self.post::<_, DataPayload<BranchUser>>("/api/users", user)
            .await
    }

    async fn list_customers(&self) -> BackendResult<Vec<Customer>> {
        self.get::<DataPayload<Vec<Customer>>>("/api/customers").await
    }

    async fn create_customer(&self, customer: &NewCustomer) -> BackendResult<Customer> {
        self.post::<_, DataPayload<Customer>>("/api/customers", customer)
            .await
    }

    async fn list_products(&self) -> BackendResult<Vec<Product>> {
        self.get::<DataPayload<Vec<Product>>>("/api/products").await
    }

    async fn create_product(&self, product: &NewProduct) -> BackendResult<Product> {
        self.post::<_, DataPayload<Product>>("/api/products", product)
            .await
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn error_from_body(status: u16, body: String) -> BackendError {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) if !message.trim().is_empty() => BackendError::Rejected(message),
        _ => BackendError::Http { status, body },
    }
}

fn map_reqwest_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(e.to_string())
    }
}
