use std::collections::HashMap;

use crate::config::RoutingConfig;

/// Alias of the per-tenant database. Modules without a routing opinion fall
/// back to this at the persistence layer.
pub const DEFAULT_ALIAS: &str = "default";

/// Alias of the shared cross-tenant database.
pub const GLOBAL_ALIAS: &str = "global";

/// The complete alias set this router will vouch for.
pub const KNOWN_ALIASES: [&str; 2] = [DEFAULT_ALIAS, GLOBAL_ALIAS];

/// Whether a module's data is shared across tenants or partitioned per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleScope {
    Global,
    Tenant,
}

/// Persistence operation being routed. Reads and writes currently resolve to
/// the same alias; the distinction is kept because callers route per
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// A handle to a persisted entity as the relation check sees it: the module
/// that owns it and the database alias the instance was loaded from.
#[derive(Debug, Clone, Copy)]
pub struct EntityRef<'a> {
    pub module: &'a str,
    pub database: &'a str,
}

/// Static, process-wide module classification. Built once at startup and
/// never mutated afterwards.
///
/// Module labels are matched case-insensitively. A label registered both
/// global and tenant resolves to global.
#[derive(Debug, Clone, Default)]
pub struct AppRoutingPolicy {
    modules: HashMap<String, ModuleScope>,
}

impl AppRoutingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        let mut policy = Self::new();
        for module in &config.tenant_modules {
            policy.register(module, ModuleScope::Tenant);
        }
        // Registered last so a duplicated label lands on the shared side
        for module in &config.global_modules {
            policy.register(module, ModuleScope::Global);
        }
        policy
    }

    pub fn register(&mut self, module: &str, scope: ModuleScope) {
        self.modules.insert(module.to_ascii_lowercase(), scope);
    }

    pub fn scope_of(&self, module: &str) -> Option<ModuleScope> {
        self.modules.get(&module.to_ascii_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Routing decisions for the persistence layer.
///
/// Every decision is a pure function of the static policy table and the
/// inputs; neither the resolved tenant nor any per-request state is
/// consulted. License gating is a separate, independent check.
#[derive(Debug, Clone)]
pub struct DatabaseRouter {
    policy: AppRoutingPolicy,
}

impl DatabaseRouter {
    pub fn new(policy: AppRoutingPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(AppRoutingPolicy::from_config(config))
    }

    pub fn policy(&self) -> &AppRoutingPolicy {
        &self.policy
    }

    /// Resolve the database alias for an operation on `module`.
    ///
    /// Returns `None` for modules the policy does not know, leaving the
    /// caller to fall back to its own default alias.
    pub fn decide_database(&self, module: &str, operation: Operation) -> Option<&'static str> {
        let alias = match self.policy.scope_of(module) {
            Some(ModuleScope::Global) => Some(GLOBAL_ALIAS),
            Some(ModuleScope::Tenant) => Some(DEFAULT_ALIAS),
            None => None,
        };
        tracing::trace!(module, ?operation, ?alias, "database routing decision");
        alias
    }

    /// Vouch for a relation between two persisted entities.
    ///
    /// `Some(true)` iff both entities live in a known alias; otherwise
    /// `None`. This check never actively forbids a relation.
    pub fn allow_relation(&self, a: &EntityRef<'_>, b: &EntityRef<'_>) -> Option<bool> {
        if KNOWN_ALIASES.contains(&a.database) && KNOWN_ALIASES.contains(&b.database) {
            Some(true)
        } else {
            tracing::trace!(
                module_a = a.module,
                database_a = a.database,
                module_b = b.module,
                database_b = b.database,
                "relation outside known aliases, no opinion"
            );
            None
        }
    }

    /// Gate a schema migration of `module` against `target_db`.
    ///
    /// Unlike the relation check this is a strict boolean: global-scope
    /// modules migrate only on the global alias, every other module
    /// (registered tenant-scope or unregistered) only on the default alias.
    pub fn allow_migrate(&self, target_db: &str, module: &str) -> bool {
        match self.policy.scope_of(module) {
            Some(ModuleScope::Global) => target_db == GLOBAL_ALIAS,
            _ => target_db == DEFAULT_ALIAS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_router() -> DatabaseRouter {
        let mut policy = AppRoutingPolicy::new();
        policy.register("licencas", ModuleScope::Global);
        policy.register("parametros_admin", ModuleScope::Global);
        policy.register("produtos", ModuleScope::Tenant);
        policy.register("pedidos", ModuleScope::Tenant);
        DatabaseRouter::new(policy)
    }

    #[test]
    fn global_modules_route_to_global_for_reads_and_writes() {
        let router = test_router();
        for module in ["licencas", "parametros_admin"] {
            assert_eq!(
                router.decide_database(module, Operation::Read),
                Some(GLOBAL_ALIAS)
            );
            assert_eq!(
                router.decide_database(module, Operation::Write),
                Some(GLOBAL_ALIAS)
            );
        }
    }

    #[test]
    fn tenant_modules_route_to_default_for_reads_and_writes() {
        let router = test_router();
        for module in ["produtos", "pedidos"] {
            assert_eq!(
                router.decide_database(module, Operation::Read),
                Some(DEFAULT_ALIAS)
            );
            assert_eq!(
                router.decide_database(module, Operation::Write),
                Some(DEFAULT_ALIAS)
            );
        }
    }

    #[test]
    fn unregistered_modules_get_no_opinion() {
        let router = test_router();
        assert_eq!(router.decide_database("auditoria", Operation::Read), None);
        assert_eq!(router.decide_database("auditoria", Operation::Write), None);
    }

    #[test]
    fn module_labels_match_case_insensitively() {
        let router = test_router();
        assert_eq!(
            router.decide_database("Licencas", Operation::Read),
            Some(GLOBAL_ALIAS)
        );
        assert_eq!(
            router.decide_database("PRODUTOS", Operation::Write),
            Some(DEFAULT_ALIAS)
        );
    }

    #[test]
    fn duplicate_label_resolves_to_global() {
        let config = RoutingConfig {
            global_modules: vec!["licencas".to_string()],
            tenant_modules: vec!["licencas".to_string(), "produtos".to_string()],
        };
        let router = DatabaseRouter::from_config(&config);
        assert_eq!(
            router.decide_database("licencas", Operation::Read),
            Some(GLOBAL_ALIAS)
        );
    }

    #[test]
    fn relation_allowed_when_both_aliases_known() {
        let router = test_router();
        let cases = [
            (DEFAULT_ALIAS, DEFAULT_ALIAS),
            (DEFAULT_ALIAS, GLOBAL_ALIAS),
            (GLOBAL_ALIAS, DEFAULT_ALIAS),
            (GLOBAL_ALIAS, GLOBAL_ALIAS),
        ];
        for (db_a, db_b) in cases {
            let a = EntityRef { module: "produtos", database: db_a };
            let b = EntityRef { module: "licencas", database: db_b };
            assert_eq!(router.allow_relation(&a, &b), Some(true));
        }
    }

    #[test]
    fn relation_never_returns_false() {
        let router = test_router();
        let known = EntityRef { module: "produtos", database: DEFAULT_ALIAS };
        let foreign = EntityRef { module: "relatorios", database: "analytics" };
        assert_eq!(router.allow_relation(&known, &foreign), None);
        assert_eq!(router.allow_relation(&foreign, &known), None);
        assert_eq!(router.allow_relation(&foreign, &foreign), None);
    }

    #[test]
    fn migrate_grid_is_exhaustive() {
        let router = test_router();
        // module kind x target db
        assert!(router.allow_migrate(GLOBAL_ALIAS, "licencas"));
        assert!(!router.allow_migrate(DEFAULT_ALIAS, "licencas"));
        assert!(router.allow_migrate(DEFAULT_ALIAS, "produtos"));
        assert!(!router.allow_migrate(GLOBAL_ALIAS, "produtos"));
        // unknown target db is always refused
        assert!(!router.allow_migrate("analytics", "licencas"));
        assert!(!router.allow_migrate("analytics", "produtos"));
    }

    #[test]
    fn migrate_treats_unregistered_modules_as_tenant_scoped() {
        let router = test_router();
        assert!(router.allow_migrate(DEFAULT_ALIAS, "auditoria"));
        assert!(!router.allow_migrate(GLOBAL_ALIAS, "auditoria"));
        assert!(!router.allow_migrate("analytics", "auditoria"));
    }

    #[test]
    fn policy_from_config_counts_both_sides() {
        let policy = AppRoutingPolicy::from_config(&RoutingConfig::default());
        assert!(!policy.is_empty());
        assert_eq!(policy.len(), 16);
        assert_eq!(policy.scope_of("licencas"), Some(ModuleScope::Global));
        assert_eq!(policy.scope_of("cfop"), Some(ModuleScope::Tenant));
        assert_eq!(policy.scope_of("nao_registrado"), None);
    }
}
