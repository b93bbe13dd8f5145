//! Builder for validated catalogs.
//!
//! Validation uses Stillwater's `Validation` so a broken catalog reports
//! every problem at once instead of the first one.

use crate::catalog::error::{CatalogError, CatalogViolation};
use crate::catalog::{Catalog, Coin, Product};
use crate::core::RETURN_TOKEN;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<CatalogViolation>>;

/// Builder for constructing catalogs with a fluent API.
///
/// # Example
///
/// ```rust
/// use coinbox::catalog::CatalogBuilder;
///
/// let catalog = CatalogBuilder::new()
///     .coin("quarter", "25¢", 25)
///     .product("gum", "GUM", 50)
///     .build()
///     .unwrap();
///
/// assert_eq!(catalog.descending_coin_values(), &[25]);
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    coins: Vec<Coin>,
    products: Vec<Product>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted coin.
    pub fn coin(mut self, token: impl Into<String>, label: impl Into<String>, value: u32) -> Self {
        self.coins.push(Coin {
            token: token.into(),
            label: label.into(),
            value,
        });
        self
    }

    /// Add a product for sale.
    pub fn product(
        mut self,
        token: impl Into<String>,
        label: impl Into<String>,
        price: u32,
    ) -> Self {
        self.products.push(Product {
            token: token.into(),
            label: label.into(),
            price,
        });
        self
    }

    /// Validate and build the catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        match self.validate() {
            Validation::Success(_) => Ok(Catalog::from_parts(self.coins, self.products)),
            Validation::Failure(errors) => Err(CatalogError::Invalid {
                violations: errors.iter().cloned().collect(),
            }),
        }
    }

    fn validate(&self) -> Check {
        let mut checks: Vec<Check> = vec![require(!self.coins.is_empty(), || {
            CatalogViolation::NoCoins
        })];

        for coin in &self.coins {
            checks.push(require(coin.value > 0, || CatalogViolation::ZeroCoinValue {
                token: coin.token.clone(),
            }));
        }

        for product in &self.products {
            checks.push(require(product.price > 0, || {
                CatalogViolation::ZeroProductPrice {
                    token: product.token.clone(),
                }
            }));
        }

        let tokens = self
            .coins
            .iter()
            .map(|c| c.token.as_str())
            .chain(self.products.iter().map(|p| p.token.as_str()));

        let mut seen = HashSet::new();
        for token in tokens {
            checks.push(require(!token.trim().is_empty(), || {
                CatalogViolation::BlankToken
            }));
            checks.push(require(token != RETURN_TOKEN, || {
                CatalogViolation::ReservedToken {
                    token: token.to_string(),
                }
            }));
            checks.push(require(seen.insert(token), || {
                CatalogViolation::DuplicateToken {
                    token: token.to_string(),
                }
            }));
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

fn require(ok: bool, violation: impl FnOnce() -> CatalogViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}
