//! Auth session entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub client: String,
    pub user_id: Uuid,
    pub token_id: Uuid,
    pub expires_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for blog_core::domain::AuthSession {
    fn from(model: Model) -> Self {
        Self {
            client: model.client,
            user_id: model.user_id,
            token_id: model.token_id,
            expires_at: model.expires_at.into(),
            created_at: model.created_at.into(),
        }
    }
}

impl From<blog_core::domain::AuthSession> for ActiveModel {
    fn from(session: blog_core::domain::AuthSession) -> Self {
        Self {
            client: Set(session.client),
            user_id: Set(session.user_id),
            token_id: Set(session.token_id),
            expires_at: Set(session.expires_at.into()),
            created_at: Set(session.created_at.into()),
        }
    }
}
