//! Studio entity model
//!
//! A casting organization owned by a single `STUDIO` tenant. Rows are created
//! lazily the first time a studio user passes the authorization guard.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "studios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning tenant (unique: one studio per tenant)
    #[sea_orm(unique)]
    pub tenant_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
    #[sea_orm(has_many = "super::casting_call::Entity")]
    CastingCalls,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::casting_call::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CastingCalls.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
