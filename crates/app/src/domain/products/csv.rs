//! Product CSV import and export.
//!
//! Columns: `name, description, ph, size, price, image, benefits, stock,
//! status`. Prices are decimal amounts in the shop currency and benefits are a
//! comma-separated list inside a single field.

use std::{
    io::{Read, Write},
    str::FromStr,
};

use csv::{ReaderBuilder, Trim, Writer};
use gennessence::money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::products::{
    data::{NewProduct, ProductDetails},
    records::{Benefits, ProductRecord, ProductStatus, ProductUuid},
};

/// A CSV upload that could not be turned into products. Rows are numbered
/// from 1 for the header line.
#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("row {row}: {source}")]
    Malformed {
        row: u64,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: invalid {field}")]
    InvalidField { row: u64, field: &'static str },

    #[error("csv file contains no products")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct ImportRow {
    name: String,
    #[serde(default)]
    description: String,
    ph: String,
    size: String,
    price: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    benefits: String,
    #[serde(default)]
    stock: Option<u32>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    description: &'a str,
    ph: String,
    size: &'a str,
    price: String,
    image: &'a str,
    benefits: String,
    stock: u32,
    status: &'static str,
}

/// Parse every row of an uploaded catalogue. Nothing is returned unless all
/// rows are valid.
///
/// # Errors
///
/// Returns the first malformed or invalid row, or [`CsvImportError::Empty`].
pub fn parse_products(input: impl Read) -> Result<Vec<NewProduct>, CsvImportError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let mut products = Vec::new();

    for (index, result) in reader.deserialize::<ImportRow>().enumerate() {
        let row = u64::try_from(index).unwrap_or(u64::MAX).saturating_add(2);

        let record = result.map_err(|source| CsvImportError::Malformed { row, source })?;

        products.push(NewProduct {
            uuid: ProductUuid::new(),
            details: record.into_details(row)?,
        });
    }

    if products.is_empty() {
        return Err(CsvImportError::Empty);
    }

    Ok(products)
}

impl ImportRow {
    fn into_details(self, row: u64) -> Result<ProductDetails, CsvImportError> {
        let invalid = |field| CsvImportError::InvalidField { row, field };

        let ph = Decimal::from_str(&self.ph).map_err(|_| invalid("ph"))?;

        let price = Decimal::from_str(&self.price)
            .ok()
            .and_then(money::from_decimal)
            .ok_or_else(|| invalid("price"))?;

        let status = match self.status.as_deref() {
            None | Some("") => ProductStatus::Active,
            Some(status) => status.parse().map_err(|_| invalid("status"))?,
        };

        let details = ProductDetails {
            name: self.name,
            description: self.description,
            ph,
            size: self.size,
            price,
            image: self.image,
            benefits: split_benefits(&self.benefits),
            stock: self.stock.unwrap_or_default(),
            status,
        };

        if !details.is_valid() {
            return Err(invalid("product"));
        }

        Ok(details)
    }
}

fn split_benefits(field: &str) -> Benefits {
    field
        .split(',')
        .map(str::trim)
        .filter(|benefit| !benefit.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write `products` as CSV with a header row.
///
/// # Errors
///
/// Returns an error when the writer fails.
pub fn write_products(products: &[ProductRecord], output: impl Write) -> Result<(), csv::Error> {
    let mut writer = Writer::from_writer(output);

    for product in products {
        writer.serialize(ExportRow {
            name: &product.name,
            description: &product.description,
            ph: product.ph.normalize().to_string(),
            size: &product.size,
            price: money::to_fixed(product.price),
            image: &product.image,
            benefits: product.benefits.join(","),
            stock: product.stock,
            status: product.status.as_str(),
        })?;
    }

    writer.flush()?;

    Ok(())
}
