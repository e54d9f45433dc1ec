//! Output types. Each wraps a domain entity and exposes only its public fields.

use crate::app::Services;
use crate::domain::model::{Product, Review, User};
use crate::transport::graphql::errors::to_gql_error;
use async_graphql::{Context, Object, Result, SimpleObject, ID};
use serde_json::json;
use std::sync::Arc;

pub struct ProductObject(pub Product);

#[Object(name = "Product")]
impl ProductObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn price(&self) -> f64 {
        self.0.price
    }

    async fn quantity(&self) -> i32 {
        self.0.quantity
    }

    async fn categories(&self) -> Vec<String> {
        self.0.categories.clone()
    }

    async fn description(&self) -> Option<String> {
        self.0.description.clone()
    }

    /// Reviews in the order they were attached.
    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentObject>> {
        let services = ctx.data::<Arc<Services>>()?;
        let reviews = services
            .catalog
            .reviews_for(&self.0)
            .await
            .map_err(|e| to_gql_error(e, json!({ "product": self.0.id })))?;
        Ok(reviews.into_iter().map(CommentObject).collect())
    }

    #[graphql(name = "units_sold")]
    async fn units_sold(&self) -> i32 {
        self.0.units_sold
    }
}

pub struct CommentObject(pub Review);

#[Object(name = "Comment")]
impl CommentObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    /// Author's display name.
    async fn user(&self) -> &str {
        &self.0.author
    }

    /// Id of the reviewed product.
    async fn product(&self) -> ID {
        ID(self.0.product_id.to_string())
    }

    async fn content(&self) -> &str {
        &self.0.content
    }

    async fn grade(&self) -> Option<i32> {
        self.0.grade
    }
}

pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn username(&self) -> &str {
        &self.0.username
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Token")]
pub struct TokenObject {
    pub value: String,
}
