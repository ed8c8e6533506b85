#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Option<Database>,
    pub membership: Membership,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendServer {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// Seconds
    pub timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub trial_period_months: u32,
    pub voucher_seed_path: Option<String>,
}
