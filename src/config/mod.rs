use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub routing: RoutingConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Settings for the embedded license store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub store_path: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

/// Static module-to-alias classification consumed by the database router.
///
/// Modules listed in `global_modules` route to the shared "global" alias;
/// modules in `tenant_modules` route to "default". Anything else is
/// unregistered and the router voices no opinion for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub global_modules: Vec<String>,
    pub tenant_modules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            global_modules: default_global_modules(),
            tenant_modules: default_tenant_modules(),
        }
    }
}

fn default_global_modules() -> Vec<String> {
    ["licencas", "parametros_admin"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_tenant_modules() -> Vec<String> {
    [
        "entidades",
        "produtos",
        "pedidos",
        "orcamentos",
        "entradas_estoque",
        "saidas_estoque",
        "contas_a_pagar",
        "contas_a_receber",
        "financeiro",
        "caixa_diario",
        "notas_fiscais",
        "cfop",
        "contratos",
        "dashboards",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // License store overrides
        if let Ok(v) = env::var("LICENSE_DB_PATH") {
            self.database.store_path = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging =
                v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // Routing policy overrides
        if let Ok(v) = env::var("ROUTING_GLOBAL_MODULES") {
            self.routing.global_modules = split_module_list(&v);
        }
        if let Ok(v) = env::var("ROUTING_TENANT_MODULES") {
            self.routing.tenant_modules = split_module_list(&v);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_ENABLE_CORS") {
            self.api.enable_cors = v.parse().unwrap_or(self.api.enable_cors);
        }
        if let Ok(v) = env::var("API_CORS_ORIGINS") {
            self.api.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                store_path: "tenant_gate.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            routing: RoutingConfig::default(),
            api: ApiConfig {
                enable_request_logging: true,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                store_path: "tenant_gate.db".to_string(),
                max_connections: 10,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            routing: RoutingConfig::default(),
            api: ApiConfig {
                enable_request_logging: true,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                store_path: "tenant_gate.db".to_string(),
                max_connections: 20,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            routing: RoutingConfig::default(),
            api: ApiConfig {
                enable_request_logging: false,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

fn split_module_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
