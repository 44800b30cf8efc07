use tracing::{debug, warn};
use validator::Validate;

use crate::application::association::AssociationKind;
use crate::application::builder::Builder;
use crate::application::chain::Chain;
use crate::application::dto::PlanRequest;
use crate::application::errors::PlanRequestError;
use crate::application::paging::OffsetPagingBuilder;
use crate::application::ports::QueryTarget;
use crate::config::Config;
use crate::domain::condition::Condition;

/// A chain plus the optional page window derived from the same request
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPlan {
    pub chain: Chain,
    pub paging: Option<OffsetPagingBuilder>,
}

impl Builder for CompiledPlan {
    fn build<T: QueryTarget>(&self, target: T) -> T {
        let target = self.chain.build(target);
        self.paging.build(target)
    }
}

/// Use case: turn a declarative plan request into a query plan
pub struct CompilePlanUseCase {
    config: Config,
}

impl CompilePlanUseCase {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Compile `request`; `total_records` feeds the page count when the
    /// request asks for a page.
    pub fn execute(
        &self,
        request: PlanRequest,
        total_records: i64,
    ) -> Result<CompiledPlan, PlanRequestError> {
        // 1. Validate shape
        request.validate()?;
        if request.page.is_some() && (request.limit.is_some() || request.offset.is_some()) {
            return Err(PlanRequestError::InvalidRequest(
                "limit/offset cannot be combined with page".to_string(),
            ));
        }

        // 2. Build the chain
        let mut chain = Chain::new().select(request.select).omit(request.omit);
        if let Some(limit) = request.limit {
            chain = chain.limit(limit);
        }
        if let Some(offset) = request.offset {
            chain = chain.offset(offset);
        }
        if let Some(filter) = request.filter {
            chain = chain.filter(Condition::from(filter));
        }
        let joins = request
            .joins
            .into_iter()
            .map(|dto| dto.into_association(AssociationKind::Join));
        let preloads = request
            .preloads
            .into_iter()
            .map(|dto| dto.into_association(AssociationKind::Preload));
        chain = chain.associate(joins.chain(preloads));

        // 3. Derive the page window
        let paging = request.page.map(|page| {
            let per_page = self.config.page_size(page.per_page);
            if page.per_page.is_some_and(|requested| requested != per_page) {
                warn!(
                    requested = ?page.per_page,
                    applied = per_page,
                    "per_page clamped to configured maximum"
                );
            }
            OffsetPagingBuilder::new(
                per_page,
                page.page,
                total_records,
                page.sort_order.as_deref().unwrap_or_default(),
                page.sort_by,
            )
            .with_default_sort_key(self.config.default_sort_key.clone())
        });

        debug!(
            associations = chain.associations().len(),
            paged = paging.is_some(),
            "compiled plan request"
        );

        Ok(CompiledPlan { chain, paging })
    }
}
