//! `Storage` implementation for `SeaOrmStorage`
//!
//! Mutations that touch both relations (click + counter, link + cascade)
//! run inside one database transaction; the counter increment is an
//! in-database `total_clicks = total_clicks + 1` expression, so
//! concurrent recordings cannot lose updates.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionError, TransactionTrait,
};

use super::converters::{link_to_active_model, model_to_click, model_to_link};
use super::SeaOrmStorage;
use crate::errors::{LinkTrackerError, Result};
use crate::storage::{Click, ClickDetail, Link, Storage, StoreStats};
use migration::entities::{click, link};

fn unwrap_transaction_error(err: TransactionError<LinkTrackerError>) -> LinkTrackerError {
    match err {
        TransactionError::Connection(db_err) => db_err.into(),
        TransactionError::Transaction(err) => err,
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn create_link(&self, new_link: Link) -> Result<()> {
        let model = link_to_active_model(&new_link);
        match link::Entity::insert(model).exec(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(LinkTrackerError::code_conflict(format!(
                        "Short code '{}' already exists",
                        new_link.short_code
                    )))
                }
                _ => Err(e.into()),
            },
        }
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Link>> {
        let model = link::Entity::find()
            .filter(link::Column::ShortCode.eq(code))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_link))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Link>> {
        let model = link::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_link))
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .order_by_desc(link::Column::CreatedAt)
            .order_by_desc(link::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_link).collect())
    }

    async fn delete_link(&self, id: &str) -> Result<()> {
        let link_id = id.to_string();
        self.db
            .transaction::<_, (), LinkTrackerError>(|txn| {
                Box::pin(async move {
                    click::Entity::delete_many()
                        .filter(click::Column::LinkId.eq(link_id.clone()))
                        .exec(txn)
                        .await?;
                    link::Entity::delete_many()
                        .filter(link::Column::Id.eq(link_id))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .map_err(unwrap_transaction_error)
    }

    async fn record_click(&self, detail: ClickDetail) -> Result<Click> {
        self.db
            .transaction::<_, Click, LinkTrackerError>(|txn| {
                Box::pin(async move {
                    if link::Entity::find_by_id(detail.link_id.clone())
                        .one(txn)
                        .await?
                        .is_none()
                    {
                        return Err(LinkTrackerError::not_found(format!(
                            "Link '{}' not found",
                            detail.link_id
                        )));
                    }

                    let model = click::ActiveModel {
                        id: NotSet,
                        link_id: Set(detail.link_id.clone()),
                        ip_address: Set(detail.ip_address),
                        user_agent: Set(detail.user_agent),
                        referrer: Set(detail.referrer),
                        country: Set(detail.country),
                        city: Set(detail.city),
                        clicked_at: Set(detail.clicked_at),
                    };
                    let inserted = model.insert(txn).await?;

                    link::Entity::update_many()
                        .col_expr(
                            link::Column::TotalClicks,
                            Expr::col(link::Column::TotalClicks).add(1),
                        )
                        .filter(link::Column::Id.eq(detail.link_id))
                        .exec(txn)
                        .await?;

                    Ok(model_to_click(inserted))
                })
            })
            .await
            .map_err(unwrap_transaction_error)
    }

    async fn clicks_for_link(&self, link_id: &str) -> Result<Vec<Click>> {
        let models = click::Entity::find()
            .filter(click::Column::LinkId.eq(link_id))
            .order_by_desc(click::Column::ClickedAt)
            .order_by_desc(click::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_click).collect())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let links_count = link::Entity::find().count(&self.db).await?;
        let clicks_count = click::Entity::find().count(&self.db).await?;
        Ok(StoreStats {
            links_count,
            clicks_count,
        })
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
