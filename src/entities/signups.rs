use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "signups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Advisory reference to `workshops.id`; no enforcing constraint.
    pub workshop_id: Option<i32>,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    /// Combined country code + number, as submitted.
    pub phone: Option<String>,

    /// UTC `%Y-%m-%d %H:%M:%S`, set at insertion.
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
