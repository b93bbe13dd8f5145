//! Coin and product catalogs.
//!
//! A catalog maps event tokens to a display label and an integer amount in
//! minor currency units (cents). It is built once, validated, and never
//! mutated afterwards.

use crate::core::{Event, RETURN_TOKEN};
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod error;

pub use builder::CatalogBuilder;
pub use error::{CatalogError, CatalogViolation};

/// A coin the machine accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Token the driver sends when this coin is inserted
    pub token: String,
    /// Human-facing label, e.g. `25¢`
    pub label: String,
    /// Value in minor units
    pub value: u32,
}

/// A product the machine sells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Token the driver sends when this product is selected
    pub token: String,
    /// Human-facing label, e.g. `GUM`
    pub label: String,
    /// Price in minor units
    pub price: u32,
}

/// Immutable coin and product catalog.
///
/// # Example
///
/// ```rust
/// use coinbox::catalog::Catalog;
///
/// let catalog = Catalog::standard();
/// assert_eq!(catalog.coin("toonie").map(|c| c.value), Some(200));
/// assert_eq!(catalog.product("gum").map(|p| p.price), Some(25));
/// assert_eq!(catalog.descending_coin_values(), &[200, 100, 25, 10, 5]);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct Catalog {
    coins: Vec<Coin>,
    products: Vec<Product>,
    #[serde(skip)]
    descending_coin_values: Vec<u32>,
}

impl Catalog {
    /// The fixed catalog: five Canadian coins and five snacks.
    pub fn standard() -> Self {
        let coins = [
            ("5", "5¢", 5),
            ("10", "10¢", 10),
            ("25", "25¢", 25),
            ("loonie", "$1.00", 100),
            ("toonie", "$2.00", 200),
        ]
        .into_iter()
        .map(|(token, label, value)| Coin {
            token: token.to_string(),
            label: label.to_string(),
            value,
        })
        .collect();

        let products = [
            ("chips", "CHIPS", 150),
            ("gum", "GUM", 25),
            ("drink", "DRINK", 200),
            ("candy", "CANDY", 100),
            ("surprise", "SURPRISE", 50),
        ]
        .into_iter()
        .map(|(token, label, price)| Product {
            token: token.to_string(),
            label: label.to_string(),
            price,
        })
        .collect();

        Self::from_parts(coins, products)
    }

    /// Start building a custom catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    pub(crate) fn from_parts(coins: Vec<Coin>, products: Vec<Product>) -> Self {
        let mut descending_coin_values: Vec<u32> = coins.iter().map(|c| c.value).collect();
        descending_coin_values.sort_unstable_by(|a, b| b.cmp(a));
        descending_coin_values.dedup();

        Self {
            coins,
            products,
            descending_coin_values,
        }
    }

    pub fn coin(&self, token: &str) -> Option<&Coin> {
        self.coins.iter().find(|c| c.token == token)
    }

    pub fn product(&self, token: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.token == token)
    }

    /// Coins in catalog order.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct coin values, largest first.
    pub fn descending_coin_values(&self) -> &[u32] {
        &self.descending_coin_values
    }

    /// Resolve a raw token.
    ///
    /// The return token wins over everything else, then coins, then products.
    pub fn classify(&self, token: &str) -> Event<'_> {
        if token == RETURN_TOKEN {
            return Event::Return;
        }
        if let Some(coin) = self.coin(token) {
            return Event::Coin(coin);
        }
        match self.product(token) {
            Some(product) => Event::Product(product),
            None => Event::Unrecognized,
        }
    }

    /// Cheapest product price, if the catalog sells anything.
    pub fn cheapest_price(&self) -> Option<u32> {
        self.products.iter().map(|p| p.price).min()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
