use crate::app::catalog_service::parse_comment_ids;
use crate::app::Services;
use crate::domain::model::{NewProduct, User};
use crate::domain::StorefrontError;
use crate::infra::config::GraphqlLimits;
use crate::transport::graphql::errors::{to_gql_error, REDACTED};
use crate::transport::graphql::objects::{CommentObject, ProductObject, TokenObject, UserObject};
use async_graphql::{Context, EmptySubscription, Object, Result, Schema};
use serde_json::json;
use std::sync::Arc;

pub type StorefrontSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Identity of the caller, attached to each request. `None` is an anonymous caller.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

pub fn build_schema(services: Arc<Services>, limits: GraphqlLimits) -> StorefrontSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .limit_depth(limits.max_depth)
        .limit_complexity(limits.max_complexity)
        .finish()
}

fn services<'a>(ctx: &Context<'a>) -> Result<&'a Arc<Services>> {
    ctx.data::<Arc<Services>>()
}

fn current_user<'a>(ctx: &Context<'a>) -> Option<&'a User> {
    ctx.data_opt::<CurrentUser>().and_then(|c| c.0.as_ref())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn product_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let count = services(ctx)?
            .catalog
            .product_count()
            .await
            .map_err(|e| to_gql_error(e, json!({})))?;
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    }

    /// Best sellers first when unfiltered; insertion order within a category.
    async fn all_products(
        &self,
        ctx: &Context<'_>,
        category: Option<String>,
    ) -> Result<Vec<ProductObject>> {
        let products = services(ctx)?
            .catalog
            .list_products(category.as_deref())
            .await
            .map_err(|e| to_gql_error(e, json!({ "category": category })))?;
        Ok(products.into_iter().map(ProductObject).collect())
    }

    async fn all_categories(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        services(ctx)?
            .catalog
            .all_categories()
            .await
            .map_err(|e| to_gql_error(e, json!({})))
    }

    async fn me(&self, ctx: &Context<'_>) -> Option<UserObject> {
        current_user(ctx).cloned().map(UserObject)
    }

    async fn find_product(&self, ctx: &Context<'_>, name: String) -> Result<Option<ProductObject>> {
        let product = services(ctx)?
            .catalog
            .find_product(&name)
            .await
            .map_err(|e| to_gql_error(e, json!({ "name": name })))?;
        Ok(product.map(ProductObject))
    }

    async fn all_comments(
        &self,
        ctx: &Context<'_>,
        product: Option<String>,
    ) -> Result<Vec<CommentObject>> {
        let reviews = services(ctx)?
            .catalog
            .list_reviews(product.as_deref())
            .await
            .map_err(|e| to_gql_error(e, json!({ "product": product })))?;
        Ok(reviews.into_iter().map(CommentObject).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[allow(clippy::too_many_arguments)]
    async fn add_product(
        &self,
        ctx: &Context<'_>,
        name: String,
        price: f64,
        quantity: i32,
        categories: Vec<String>,
        description: Option<String>,
        #[graphql(default)] comments: Vec<String>,
        #[graphql(name = "units_sold")] units_sold: i32,
    ) -> Result<ProductObject> {
        let args = json!({
            "name": name,
            "price": price,
            "quantity": quantity,
            "categories": categories,
            "description": description,
            "comments": comments,
            "units_sold": units_sold,
        });
        let comment_ids =
            parse_comment_ids(&comments).map_err(|e| to_gql_error(e, args.clone()))?;
        let product = services(ctx)?
            .catalog
            .add_product(NewProduct {
                name,
                price,
                quantity,
                categories,
                description,
                units_sold,
                comment_ids,
            })
            .await
            .map_err(|e| to_gql_error(e, args))?;
        Ok(ProductObject(product))
    }

    async fn increase_quantity(
        &self,
        ctx: &Context<'_>,
        name: String,
        quantity: i32,
    ) -> Result<ProductObject> {
        let product = services(ctx)?
            .inventory
            .increase(&name, quantity)
            .await
            .map_err(|e| to_gql_error(e, json!({ "name": name, "quantity": quantity })))?;
        Ok(ProductObject(product))
    }

    async fn decrease_quantity(
        &self,
        ctx: &Context<'_>,
        name: String,
        quantity: i32,
    ) -> Result<ProductObject> {
        let product = services(ctx)?
            .inventory
            .decrease(&name, quantity)
            .await
            .map_err(|e| to_gql_error(e, json!({ "name": name, "quantity": quantity })))?;
        Ok(ProductObject(product))
    }

    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
        password_conf: String,
    ) -> Result<UserObject> {
        let user = services(ctx)?
            .auth
            .register(&username, &password, &password_conf)
            .await
            .map_err(|e| {
                to_gql_error(
                    e,
                    json!({ "username": username, "password": REDACTED, "passwordConf": REDACTED }),
                )
            })?;
        Ok(UserObject(user))
    }

    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<TokenObject> {
        let value = services(ctx)?
            .auth
            .login(&username, &password)
            .await
            .map_err(|e| to_gql_error(e, json!({ "username": username, "password": REDACTED })))?;
        Ok(TokenObject { value })
    }

    /// Requires an authenticated caller, who may only post under their own username.
    async fn add_comment(
        &self,
        ctx: &Context<'_>,
        product: String,
        user: String,
        content: String,
        grade: Option<i32>,
    ) -> Result<CommentObject> {
        let args = json!({ "product": product, "user": user, "content": content, "grade": grade });
        let Some(caller) = current_user(ctx) else {
            return Err(to_gql_error(
                StorefrontError::auth("authentication required"),
                args,
            ));
        };
        if caller.username != user {
            return Err(to_gql_error(
                StorefrontError::auth("reviews can only be posted under your own username"),
                args,
            ));
        }
        let review = services(ctx)?
            .reviews
            .add_review(&product, &caller.username, &content, grade)
            .await
            .map_err(|e| to_gql_error(e, args))?;
        Ok(CommentObject(review))
    }
}
