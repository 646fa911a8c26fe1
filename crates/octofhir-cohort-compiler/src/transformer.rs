//! Query transformer: descriptor in, CQL library out

use crate::codesystems::CodesystemDefinitionsFactory;
use crate::options::{FieldScope, TransformerOptions};
use crate::predicate::PredicateFactory;
use crate::singletons::SingletonStatementsFactory;
use crate::source::{QuerySource, ScopedSource};
use octofhir_cohort_config::ConfigResolver;
use octofhir_cohort_model::{EntityGroup, EntityType, EssentialQuery, QueryDescriptor};
use std::marker::PhantomData;

/// Compiles one descriptor shape into CQL.
///
/// Stateless between calls; the resolver is shared and never mutated, so a
/// transformer can be cloned into concurrent request handlers.
#[derive(Debug, Clone)]
pub struct QueryTransformer<S> {
    resolver: ConfigResolver,
    options: TransformerOptions,
    source: PhantomData<fn(&S)>,
}

/// Transformer for the richer query model
pub type DescriptorTransformer = QueryTransformer<QueryDescriptor>;

/// Transformer for the essential DTO
pub type EssentialTransformer = QueryTransformer<EssentialQuery>;

impl<S: QuerySource> QueryTransformer<S> {
    pub fn new(resolver: ConfigResolver) -> Self {
        Self::with_options(resolver, TransformerOptions::default())
    }

    pub fn with_options(resolver: ConfigResolver, options: TransformerOptions) -> Self {
        Self {
            resolver,
            options,
            source: PhantomData,
        }
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    pub fn options(&self) -> &TransformerOptions {
        &self.options
    }

    /// Compile `source` into a CQL library for `entity_type`
    pub fn to_query(&self, source: &S, entity_type: EntityType) -> String {
        match self.options.scope {
            FieldScope::AllGroups => self.compile(source, entity_type),
            FieldScope::MatchingGroups => {
                let scoped = ScopedSource::new(source, self.options.targets.groups_for(entity_type));
                self.compile(&scoped, entity_type)
            }
        }
    }

    /// Compile for the entity type `group` is mapped to
    pub fn to_query_for_group(&self, source: &S, group: EntityGroup) -> String {
        self.to_query(source, self.options.targets.target(group))
    }

    fn compile<Q: QuerySource>(&self, source: &Q, entity_type: EntityType) -> String {
        let codesystems = CodesystemDefinitionsFactory::new(&self.resolver)
            .create(source, self.options.fixed_codesystems_for(entity_type));
        let singletons = SingletonStatementsFactory::new(&self.resolver).create(source, entity_type);
        let predicate = PredicateFactory::new(&self.resolver).create(source, entity_type);

        log::debug!(
            "Compiled {} query: {} codesystem(s), {} singleton line(s)",
            entity_type,
            codesystems.lines().count(),
            singletons.lines().filter(|l| !l.is_empty()).count()
        );

        // Singleton definitions precede the population marker.
        let mut query = self
            .resolver
            .preamble_with_definitions(entity_type, &codesystems, &singletons);
        query.push_str(&predicate);
        query
    }
}
