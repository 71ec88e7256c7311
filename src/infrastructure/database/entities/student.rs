//! Student entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain;

/// Student status as stored in the `status` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum StudentStatus {
    #[sea_orm(string_value = "ativo")]
    Active,
    #[sea_orm(string_value = "inativo")]
    Inactive,
}

impl From<StudentStatus> for domain::StudentStatus {
    fn from(status: StudentStatus) -> Self {
        match status {
            StudentStatus::Active => Self::Active,
            StudentStatus::Inactive => Self::Inactive,
        }
    }
}

impl From<domain::StudentStatus> for StudentStatus {
    fn from(status: domain::StudentStatus) -> Self {
        match status {
            domain::StudentStatus::Active => Self::Active,
            domain::StudentStatus::Inactive => Self::Inactive,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// UUID v4 string
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub rga: String,

    pub name: String,

    /// `name` lowercased on write; SQLite's LOWER() only folds ASCII
    #[serde(skip)]
    pub name_search: String,

    pub course: String,

    pub status: Option<StudentStatus>,

    pub registered_in: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for domain::Student {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            rga: m.rga,
            name: m.name,
            course: m.course,
            status: m.status.map(Into::into),
            registered_in: m.registered_in,
        }
    }
}
