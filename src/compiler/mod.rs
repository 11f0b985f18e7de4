use crate::classifier::{FieldResolver, FieldTables};
use crate::condition::{Collection, Condition};
use crate::graph::{NodeKind, Workflow};
use crate::query::{Clause, CollectionQuery, Filter, JoinEntry, Joins, QueryDocument, QueryOp};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub mod config;
pub mod operator;

pub use config::*;
pub use operator::{CURRENT_DATE, GENDER_FIELD, compile_clauses, compile_operator, is_anniversary};

/// Field on `point_histories` that triggers the expiring-points sub-query.
const EXPIRE_DATE_FIELD: &str = "expire_date";

/// Compiles condition lists into [`QueryDocument`]s.
///
/// The assembler holds only configuration; every call to [`assemble`](Self::assemble) is
/// independent, so a single instance can be shared freely across threads.
pub struct QueryAssembler {
    config: CompilerConfig,
    resolver: Box<dyn FieldResolver>,
}

pub struct QueryAssemblerBuilder {
    config: CompilerConfig,
    resolver: Box<dyn FieldResolver>,
}

impl QueryAssemblerBuilder {
    pub fn new() -> Self {
        Self {
            config: CompilerConfig::default(),
            resolver: Box::new(FieldTables::default()),
        }
    }
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }
    pub fn with_merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
        self.config.merchant_id = merchant_id.into();
        self
    }
    pub fn with_resolver(mut self, resolver: Box<dyn FieldResolver>) -> Self {
        self.resolver = resolver;
        self
    }
    pub fn build(self) -> QueryAssembler {
        QueryAssembler {
            config: self.config,
            resolver: self.resolver,
        }
    }
}

impl Default for QueryAssemblerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for QueryAssembler {
    fn default() -> Self {
        QueryAssemblerBuilder::new().build()
    }
}

/// Clause lists gathered while walking the conditions.
#[derive(Default)]
struct Assembly {
    contact_clauses: Vec<Clause>,
    having_clauses: Vec<Clause>,
    joins: Joins,
    needs_aggregation: bool,
    /// The `point_histories` join holds the expiring-points sub-query.
    expiring_join: bool,
}

impl Assembly {
    /// Registers a join; the first registration for a collection wins.
    fn register_join(&mut self, collection: &Collection, entry: impl FnOnce() -> JoinEntry) {
        if !self.joins.contains(collection.as_str()) {
            self.joins.insert(collection.as_str(), entry());
        }
    }

    /// Stores the expiring-points sub-query, replacing whatever join the collection had.
    fn register_expiring_join(&mut self, collection: &Collection, entry: JoinEntry) {
        let replaced = self.joins.insert(collection.as_str(), entry);
        if replaced.is_some() && !self.expiring_join {
            debug!(
                collection = %collection,
                "Expiring-points sub-query replaces the aggregate join"
            );
        }
        self.expiring_join = true;
    }
}

impl QueryAssembler {
    pub fn builder() -> QueryAssemblerBuilder {
        QueryAssemblerBuilder::new()
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &dyn FieldResolver {
        self.resolver.as_ref()
    }

    fn merchant_clause(&self) -> Clause {
        Clause::equals("merchant_id", self.config.merchant_id.as_str())
    }

    /// Compiles an ordered condition list into a contacts-rooted query document.
    ///
    /// Contact conditions become `where` clauses; order and point-history conditions are
    /// promoted to `having` clauses over a joined aggregate. The merchant filter is always the
    /// last `where` clause. Input is never mutated and malformed conditions degrade to
    /// best-effort clauses instead of failing.
    pub fn assemble(&self, conditions: &[Condition]) -> QueryDocument {
        let key = self.config.key_column.as_str();
        let mut query = CollectionQuery::new([key]);

        if conditions.is_empty() {
            query.filter = Some(Filter::Clause(self.merchant_clause()));
            return QueryDocument::new(Collection::Contacts.as_str(), query);
        }

        let mut assembly = Assembly::default();
        for condition in conditions {
            self.route(&mut assembly, condition);
        }
        assembly.contact_clauses.push(self.merchant_clause());

        let has_gender = conditions.iter().any(|c| c.field == operator::GENDER_FIELD);
        let has_point_join = assembly.joins.contains(Collection::PointHistories.as_str());

        query.filter = if assembly.contact_clauses.len() == 2 && has_gender && has_point_join {
            Some(Filter::Merged(assembly.contact_clauses))
        } else {
            Filter::from_clauses(assembly.contact_clauses)
        };

        if assembly.needs_aggregation {
            query.group_by = Some(vec![key.to_string()]);
        }
        query.having = Filter::from_clauses(assembly.having_clauses);
        query.joins = assembly.joins;

        let document = QueryDocument::new(Collection::Contacts.as_str(), query);
        debug!(
            conditions = conditions.len(),
            joins = document.query.joins.len(),
            query = %document,
            "Assembled query document"
        );
        document
    }

    fn route(&self, assembly: &mut Assembly, condition: &Condition) {
        let field = condition.field.as_str();
        let key = self.config.key_column.as_str();
        let collection = self
            .resolver
            .resolve(field, condition.collection.as_ref());

        match collection {
            Collection::Contacts => {
                assembly
                    .contact_clauses
                    .extend(compile_clauses(field, condition));
            }
            Collection::Orders => {
                self.aggregate(assembly, &collection, condition);
                assembly.register_join(&collection, || {
                    JoinEntry::new([format!("SUM({field}) as {field}")], key, key)
                });
            }
            Collection::PointHistories if field == EXPIRE_DATE_FIELD => {
                let entry =
                    JoinEntry::new(["SUM(point_histories.point) as expiring_points"], key, key)
                        .with_filter(Filter::And(vec![compile_operator(field, condition)]))
                        .with_group_by([key])
                        .with_having(Filter::Clause(Clause::op(
                            "sum",
                            QueryOp::GreaterThan,
                            EXPIRING_POINTS_THRESHOLD,
                        )));
                assembly.register_expiring_join(&collection, entry);
            }
            // The having clause still applies when the expiring sub-query already owns the join.
            Collection::PointHistories => {
                let aggregate = self.aggregate(assembly, &collection, condition);
                assembly.register_join(&collection, || {
                    JoinEntry::new([format!("{aggregate} as {field}s")], key, key)
                });
            }
            other => {
                warn!(
                    condition_id = %condition.id,
                    collection = %other,
                    field,
                    "No assembly path for collection; condition skipped"
                );
            }
        }
    }

    /// Adds a `having` clause over `SUM(collection.field)` and returns the aggregate expression.
    fn aggregate(
        &self,
        assembly: &mut Assembly,
        collection: &Collection,
        condition: &Condition,
    ) -> String {
        let aggregate = format!("SUM({}.{})", collection, condition.field);
        assembly.needs_aggregation = true;
        assembly
            .having_clauses
            .push(compile_operator(&aggregate, condition));
        aggregate
    }

    /// Compiles every condition node of a workflow into its query document.
    pub fn compile_workflow<'a>(&self, workflow: &'a Workflow) -> CompiledWorkflow<'a> {
        let queries = workflow
            .graph
            .nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Condition)
            .map(|node| (node.id.clone(), self.assemble(&node.data.conditions)))
            .collect();

        CompiledWorkflow { workflow, queries }
    }
}

/// Compiles a condition list with the default configuration and field tables.
pub fn assemble(conditions: &[Condition]) -> QueryDocument {
    QueryAssembler::default().assemble(conditions)
}

/// A workflow together with the query document of each of its condition nodes.
#[derive(Debug, Serialize)]
pub struct CompiledWorkflow<'a> {
    pub workflow: &'a Workflow,
    /// Query documents keyed by condition node id.
    pub queries: BTreeMap<String, QueryDocument>,
}

impl CompiledWorkflow<'_> {
    pub fn query_for(&self, node_id: &str) -> Option<&QueryDocument> {
        self.queries.get(node_id)
    }
}
