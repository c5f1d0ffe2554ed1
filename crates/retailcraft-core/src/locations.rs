use serde::{Deserialize, Serialize};

use crate::models::Address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    #[serde(default)]
    pub states: Vec<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDirectory {
    pub countries: Vec<Country>,
}

impl LocationDirectory {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn country(&self, name: &str) -> Option<&Country> {
        self.countries.iter().find(|country| country.name == name)
    }

    pub fn state(&self, country: &str, state: &str) -> Option<&Region> {
        self.country(country)?
            .states
            .iter()
            .find(|region| region.name == state)
    }

    pub fn country_names(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(|country| country.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSelection {
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
}

impl LocationSelection {
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn select_country(&mut self, country: impl Into<String>) {
        let country = country.into();
        if self.country.as_deref() != Some(country.as_str()) {
            self.state = None;
            self.city = None;
        }
        self.country = Some(country);
    }

    pub fn select_state(&mut self, state: impl Into<String>) {
        let state = state.into();
        if self.state.as_deref() != Some(state.as_str()) {
            self.city = None;
        }
        self.state = Some(state);
    }

    pub fn select_city(&mut self, city: impl Into<String>) {
        self.city = Some(city.into());
    }

    pub fn state_options<'a>(&self, directory: &'a LocationDirectory) -> &'a [Region] {
        self.country
            .as_deref()
            .and_then(|country| directory.country(country))
            .map(|country| country.states.as_slice())
            .unwrap_or(&[])
    }

    pub fn city_options<'a>(&self, directory: &'a LocationDirectory) -> &'a [String] {
        match (self.country.as_deref(), self.state.as_deref()) {
            (Some(country), Some(state)) => directory
                .state(country, state)
                .map(|region| region.cities.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn reconcile(&mut self, directory: &LocationDirectory) {
        let Some(country) = self
            .country
            .as_deref()
            .and_then(|country| directory.country(country))
        else {
            *self = Self::default();
            return;
        };

        let Some(region) = self
            .state
            .as_deref()
            .and_then(|state| country.states.iter().find(|region| region.name == state))
        else {
            self.state = None;
            self.city = None;
            return;
        };

        if let Some(city) = self.city.as_deref() {
            if !region.cities.iter().any(|candidate| candidate == city) {
                self.city = None;
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.country.is_some() && self.state.is_some() && self.city.is_some()
    }

    pub fn into_address(self, address: Address) -> Option<Address> {
        let (Some(country), Some(state), Some(city)) = (self.country, self.state, self.city) else {
            return None;
        };
        Some(Address {
            country,
            state,
            city,
            ..address
        })
    }
}

impl From<&Address> for LocationSelection {
    fn from(address: &Address) -> Self {
        let non_empty = |value: &str| (!value.trim().is_empty()).then(|| value.to_string());
        Self {
            country: non_empty(&address.country),
            state: non_empty(&address.state),
            city: non_empty(&address.city),
        }
    }
}
