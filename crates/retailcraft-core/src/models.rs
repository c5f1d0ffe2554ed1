use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ParseCustomerTypeError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub country: String,
    pub state: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Address,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBranch {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchUser {
    pub id: String,
    pub branch_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBranchUser {
    pub branch_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    B2B,
    B2C,
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerType::B2B => f.pad("B2B"),
            CustomerType::B2C => f.pad("B2C"),
        }
    }
}

impl FromStr for CustomerType {
    type Err = ParseCustomerTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "B2B" => Ok(CustomerType::B2B),
            "B2C" => Ok(CustomerType::B2C),
            _ => Err(ParseCustomerTypeError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    pub company_name: String,
    pub gst_number: Option<String>,
    pub contact_person: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub branch_id: String,
    pub customer_type: CustomerType,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Address,
    pub business: Option<BusinessDetails>,
}

impl Customer {
    pub fn display_name(&self) -> &str {
        match (&self.customer_type, &self.business) {
            (CustomerType::B2B, Some(business)) => &business.company_name,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub branch_id: String,
    pub customer_type: CustomerType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessDetails>,
}

impl NewCustomer {
    pub fn normalized(mut self) -> Self {
        if self.customer_type == CustomerType::B2C {
            self.business = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub branch_id: String,
    pub name: String,
    pub bar_code: String,
    pub category: Option<String>,
    pub b2b_price: Decimal,
    pub b2c_price: Decimal,
    pub description: Option<String>,
}

impl Product {
    pub fn price_for(&self, customer_type: CustomerType) -> Decimal {
        match customer_type {
            CustomerType::B2B => self.b2b_price,
            CustomerType::B2C => self.b2c_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub branch_id: String,
    pub name: String,
    pub bar_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub b2b_price: Decimal,
    pub b2c_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_active() -> bool {
    true
}
