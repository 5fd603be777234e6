fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

lazy_static::lazy_static!(
    pub static ref BIND: String = env_or("DRAWER_BIND", "127.0.0.1:16835");
    pub static ref DIST: String = env_or("DRAWER_DIST", "../frontend/dist");
    pub static ref DEMO_NAME: String = env_or("DRAWER_DEMO_NAME", "jane");
);
