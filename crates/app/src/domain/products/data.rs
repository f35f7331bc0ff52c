//! Products Data

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{
    InvalidValue,
    products::records::{Benefits, ProductStatus, ProductUuid},
};

/// Highest pH a product may declare.
pub const MAX_PH: Decimal = Decimal::from_parts(14, 0, 0, false, 0);

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub details: ProductDetails,
}

/// Editable product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub name: String,
    pub description: String,
    pub ph: Decimal,
    pub size: String,
    pub price: u64,
    pub image: String,
    pub benefits: Benefits,
    pub stock: u32,
    pub status: ProductStatus,
}

/// Product Update Data
pub type ProductUpdate = ProductDetails;

impl ProductDetails {
    /// Whether the values fit the catalogue's constraints.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.size.trim().is_empty()
            && self.ph >= Decimal::ZERO
            && self.ph <= MAX_PH
    }
}

/// Catalogue ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    PhAsc,
    PhDesc,
}

impl ProductSort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::PhAsc => "ph_asc",
            Self::PhDesc => "ph_desc",
        }
    }
}

impl FromStr for ProductSort {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "ph_asc" => Ok(Self::PhAsc),
            "ph_desc" => Ok(Self::PhDesc),
            other => Err(InvalidValue::new("sort", other)),
        }
    }
}

/// Catalogue listing filter; newest first when no sort is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub status: Option<ProductStatus>,
    pub sort: Option<ProductSort>,
}
