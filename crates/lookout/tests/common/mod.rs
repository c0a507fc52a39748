//! Shared fixture types for the integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use lookout::{FieldPath, PropertyMapping};
use lookout_macros::Queryable;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Queryable)]
pub struct Omega {
    pub psi: Option<String>,
    pub chi: Option<String>,
    pub sigma: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Default, Queryable)]
pub struct Alpha {
    pub beta: i32,
    pub rho: i32,
    pub gamma: Option<String>,
    pub delta: Option<String>,
    pub epsilon: Option<String>,
    pub phi: Option<String>,
    pub lambda: i32,
    pub lambda_nullable: Option<i32>,
    pub my: Decimal,
    pub my_nullable_one: Option<Decimal>,
    pub ny: f32,
    pub ny_nullable: Option<f32>,
    pub xi: f64,
    pub xi_nullable: Option<f64>,
    pub psi: Option<NaiveDateTime>,
    pub omega_date_time: NaiveDateTime,
    pub stigma_one: bool,
    pub stigma_two: Option<bool>,
    pub chi: Option<Uuid>,
    pub sigma: Option<Vec<i32>>,
    pub kappa: Option<Omega>,
    #[query(skip)]
    pub note: String,
}

impl Alpha {
    pub fn with_beta(beta: i32) -> Self {
        Alpha {
            beta,
            ..Alpha::default()
        }
    }
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 29).unwrap()
}

pub fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, min, sec).unwrap()
}

/// Path to a member of the nested `kappa` value.
pub fn kappa(inner: &str) -> FieldPath<Alpha> {
    FieldPath::nested::<Omega, _>("kappa", |a: &Alpha| a.kappa.as_ref(), inner).unwrap()
}

pub fn mapping(name: &str, paths: Vec<FieldPath<Alpha>>) -> PropertyMapping<Alpha> {
    PropertyMapping::new().with(name, paths)
}

pub fn betas(items: &[&Alpha]) -> Vec<i32> {
    items.iter().map(|a| a.beta).collect()
}

pub fn rhos(items: &[&Alpha]) -> Vec<i32> {
    items.iter().map(|a| a.rho).collect()
}
