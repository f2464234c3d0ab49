//! Read-only catalogue service for tags and ingredients.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, CatalogueRepository};
use crate::domain::repository_errors::map_catalogue_error;
use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Catalogue service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn tags(&self) -> Result<Vec<Tag>, Error> {
        self.catalogue.list_tags().await.map_err(map_catalogue_error)
    }

    async fn tag(&self, id: TagId) -> Result<Tag, Error> {
        self.catalogue
            .find_tag(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn ingredients(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let name_prefix = name_prefix
            .map(|prefix| prefix.trim().to_owned())
            .filter(|prefix| !prefix.is_empty());
        self.catalogue
            .list_ingredients(name_prefix)
            .await
            .map_err(map_catalogue_error)
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.catalogue
            .find_ingredient(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{CatalogueRepositoryError, MockCatalogueRepository};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn tag(id: i64, slug: &str) -> Tag {
        Tag {
            id: TagId::new(id),
            name: slug.to_uppercase(),
            color: "#49B64E".to_owned(),
            slug: slug.to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn tags_are_returned_as_stored() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_list_tags()
            .times(1)
            .return_once(|| Ok(vec![tag(1, "breakfast"), tag(2, "lunch")]));

        let tags = CatalogueService::new(Arc::new(repo))
            .tags()
            .await
            .expect("tags");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].slug, "lunch");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_tag_is_not_found() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_find_tag()
            .with(eq(TagId::new(9)))
            .return_once(|_| Ok(None));

        let err = CatalogueService::new(Arc::new(repo))
            .tag(TagId::new(9))
            .await
            .expect_err("absent tag");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some(" Sug "), Some("Sug"))]
    #[tokio::test]
    async fn ingredient_prefix_is_trimmed(
        #[case] raw: Option<&'static str>,
        #[case] expected: Option<&'static str>,
    ) {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_list_ingredients()
            .with(eq(expected.map(str::to_owned)))
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        CatalogueService::new(Arc::new(repo))
            .ingredients(raw.map(str::to_owned))
            .await
            .expect("ingredients");
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failure_is_service_unavailable() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_find_ingredient()
            .return_once(|_| Err(CatalogueRepositoryError::connection("pool timed out")));

        let err = CatalogueService::new(Arc::new(repo))
            .ingredient(IngredientId::new(1))
            .await
            .expect_err("pool failure");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
