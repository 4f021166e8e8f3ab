//! ActorEntity implementation for [`ProductRecord`].

use crate::catalog::CatalogError;
use crate::framework::ActorEntity;
use crate::model::{ProductDraft, ProductId, ProductRecord};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for ProductRecord {
    type Id = ProductId;
    type Create = ProductDraft;
    type Context = ();
    type Error = CatalogError;

    fn from_create_params(id: ProductId, params: ProductDraft) -> Result<Self, Self::Error> {
        Ok(Self::new(id, params.name, params.description, params.price))
    }
}
