//! Warehouse record parsing and the file-to-file driver.
//!
//! The driver reads a record count followed by one whitespace-separated
//! record per line (`day id name stock demand`), inserts each record into a
//! [`Warehouse`] in input order, and writes the collection's textual
//! rendering to an output file. Malformed input produces a typed error that
//! propagates to the caller; there is no recovery or partial-failure
//! handling.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use thiserror::Error;
use tracing::*;

#[derive(Error, Debug)]
pub enum WarehouseError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing record count on first line")]
    MissingCount,

    #[error("Missing field {field:?} in record")]
    MissingField { field: &'static str },

    #[error("Invalid number for {field:?}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Expected {expected} records, found {found}")]
    TruncatedInput { expected: usize, found: usize },
}

/// One product record.
///
/// Parses from a whitespace-separated line in the field order
/// `day id name stock demand`; the name is a single token.
///
/// # Example
/// ```
/// use collager::warehouse::Product;
///
/// let product: Product = "1 101 Widget 50 5".parse().unwrap();
/// assert_eq!(product.id, 101);
/// assert_eq!(product.name, "Widget");
/// assert_eq!(product.stock, 50);
/// assert_eq!(product.arrival_day, 1);
/// assert_eq!(product.demand, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub stock: u32,
    pub arrival_day: u32,
    pub demand: u32,
}

impl FromStr for Product {
    type Err = WarehouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let arrival_day = parse_number(&mut fields, "day")?;
        let id = parse_number(&mut fields, "id")?;
        let name = fields
            .next()
            .ok_or(WarehouseError::MissingField { field: "name" })?
            .to_string();
        let stock = parse_number(&mut fields, "stock")?;
        let demand = parse_number(&mut fields, "demand")?;
        Ok(Product {
            id,
            name,
            stock,
            arrival_day,
            demand,
        })
    }
}

fn parse_number(fields: &mut SplitWhitespace, field: &'static str) -> Result<u32, WarehouseError> {
    let value = fields
        .next()
        .ok_or(WarehouseError::MissingField { field })?;
    value.parse().map_err(|_| WarehouseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// An ordered collection of products keyed by identifier.
///
/// Inserting a record with an identifier already present overwrites the
/// stored record. The [`Display`](fmt::Display) rendering lists products in
/// ascending identifier order under a count header.
///
/// # Example
/// ```
/// use collager::warehouse::{Product, Warehouse};
///
/// let mut warehouse = Warehouse::new();
/// warehouse.add_product("1 101 Widget 50 5".parse::<Product>().unwrap());
/// assert_eq!(warehouse.len(), 1);
/// assert_eq!(warehouse.get(101).unwrap().name, "Widget");
/// ```
#[derive(Debug, Default)]
pub struct Warehouse {
    products: BTreeMap<u32, Product>,
}

impl Warehouse {
    pub fn new() -> Self {
        Warehouse::default()
    }

    /// Inserts `product`, keyed by its identifier. A duplicate identifier
    /// replaces the stored record.
    pub fn add_product(&mut self, product: Product) {
        trace!("Adding product {} ({})", product.id, product.name);
        self.products.insert(product.id, product);
    }

    /// Returns the product with the given identifier, if present.
    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Returns the number of stored products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Returns an iterator over stored products in ascending identifier
    /// order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}

impl fmt::Display for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "warehouse: {} products", self.products.len())?;
        for product in self.products.values() {
            writeln!(
                f,
                "{} {} stock={} day={} demand={}",
                product.id, product.name, product.stock, product.arrival_day, product.demand
            )?;
        }
        Ok(())
    }
}

/// Parses a record stream: the first line is the record count, each
/// subsequent line one product record. Returns the records in input order.
///
/// Lines beyond the declared count are ignored; fewer records than declared
/// is an error.
pub fn read_records(input: &str) -> Result<Vec<Product>, WarehouseError> {
    let mut lines = input.lines();
    let count_line = lines.next().ok_or(WarehouseError::MissingCount)?;
    let expected: usize =
        count_line
            .trim()
            .parse()
            .map_err(|_| WarehouseError::InvalidNumber {
                field: "count",
                value: count_line.trim().to_string(),
            })?;

    debug!("Reading {} records", expected);
    let mut records = Vec::with_capacity(expected);
    for line in lines.filter(|l| !l.trim().is_empty()).take(expected) {
        records.push(line.parse()?);
    }
    if records.len() != expected {
        error!(
            "Record stream truncated: expected {}, found {}",
            expected,
            records.len()
        );
        return Err(WarehouseError::TruncatedInput {
            expected,
            found: records.len(),
        });
    }
    Ok(records)
}

/// Runs the driver: reads records from `input`, inserts each into a fresh
/// [`Warehouse`] in input order, and writes the collection's rendering to
/// `output`.
pub fn run_driver(input: &Path, output: &Path) -> Result<(), WarehouseError> {
    let text = fs::read_to_string(input)?;
    let records = read_records(&text)?;

    let mut warehouse = Warehouse::new();
    for product in records {
        warehouse.add_product(product);
    }

    fs::write(output, warehouse.to_string())?;
    Ok(())
}
