//! Configuration handling for the extraction pipeline.
//!
//! Values are injected by the embedding service; `Config::from_env` reads
//! them from environment variables with development defaults so the CLI and
//! tests can run without any setup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Environment variable names.
pub const ENV_SCRAPER_API_TOKEN: &str = "SCRAPER_API_TOKEN";
pub const ENV_SCRAPER_TASK_URL: &str = "SCRAPER_TASK_URL";
pub const ENV_SCRAPER_OUTPUT_URL: &str = "SCRAPER_OUTPUT_URL";
pub const ENV_SCRAPER_POLL_INTERVAL_MS: &str = "SCRAPER_POLL_INTERVAL_MS";
pub const ENV_SCRAPER_MAX_POLL_ATTEMPTS: &str = "SCRAPER_MAX_POLL_ATTEMPTS";
pub const ENV_EXTRACT_POOL_CORE: &str = "EXTRACT_POOL_CORE";
pub const ENV_EXTRACT_POOL_MAX: &str = "EXTRACT_POOL_MAX";
pub const ENV_EXTRACT_POOL_QUEUE: &str = "EXTRACT_POOL_QUEUE";
pub const ENV_JOB_POOL_CORE: &str = "JOB_POOL_CORE";
pub const ENV_JOB_POOL_MAX: &str = "JOB_POOL_MAX";
pub const ENV_JOB_POOL_QUEUE: &str = "JOB_POOL_QUEUE";
pub const ENV_POOL_SHUTDOWN_GRACE_SECS: &str = "POOL_SHUTDOWN_GRACE_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "CACHE_TTL_SECS";
pub const ENV_CACHE_MAX_ENTRIES: &str = "CACHE_MAX_ENTRIES";

const DEFAULT_TASK_URL: &str = "https://api.apify.com/v2/acts/apify~instagram-scraper/runs";
const DEFAULT_OUTPUT_URL: &str = "https://api.apify.com/v2";
const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;
const DEFAULT_POOL_CORE: usize = 5;
const DEFAULT_POOL_MAX: usize = 10;
const DEFAULT_POOL_QUEUE: usize = 500;
const DEFAULT_JOB_POOL_CORE: usize = 2;
const DEFAULT_JOB_POOL_MAX: usize = 4;
const DEFAULT_JOB_POOL_QUEUE: usize = 100;
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 6 * 60 * 60;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Sizing for one bounded worker pool.
///
/// Up to `core_size` tasks run at once; further submissions wait in a backlog
/// of `queue_capacity`. Once the backlog is full the pool grows to `max_size`,
/// and past that the submitting caller runs the task itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub core_size: usize,
    pub max_size: usize,
    pub queue_capacity: usize,
    pub shutdown_grace: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            core_size: DEFAULT_POOL_CORE,
            max_size: DEFAULT_POOL_MAX,
            queue_capacity: DEFAULT_POOL_QUEUE,
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS),
        }
    }
}

impl PoolConfig {
    pub fn job_default() -> Self {
        Self {
            core_size: DEFAULT_JOB_POOL_CORE,
            max_size: DEFAULT_JOB_POOL_MAX,
            queue_capacity: DEFAULT_JOB_POOL_QUEUE,
            ..Self::default()
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.core_size == 0 {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "core size must be at least 1".to_string(),
            });
        }
        if self.max_size < self.core_size {
            return Err(ConfigError::InvalidValue {
                field,
                reason: format!(
                    "max size {} is below core size {}",
                    self.max_size, self.core_size
                ),
            });
        }
        Ok(())
    }
}

/// Settings for the third-party scraping service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub api_token: String,
    pub task_url: String,
    pub output_base_url: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            task_url: DEFAULT_TASK_URL.to_string(),
            output_base_url: DEFAULT_OUTPUT_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

/// Pipeline runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub extract_pool: PoolConfig,
    pub job_pool: PoolConfig,
    pub job: JobConfig,
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extract_pool: PoolConfig::default(),
            job_pool: PoolConfig::job_default(),
            job: JobConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let grace = Duration::from_secs(env_parse(
            ENV_POOL_SHUTDOWN_GRACE_SECS,
            DEFAULT_SHUTDOWN_GRACE_SECS,
        )?);

        let extract_pool = PoolConfig {
            core_size: env_parse(ENV_EXTRACT_POOL_CORE, DEFAULT_POOL_CORE)?,
            max_size: env_parse(ENV_EXTRACT_POOL_MAX, DEFAULT_POOL_MAX)?,
            queue_capacity: env_parse(ENV_EXTRACT_POOL_QUEUE, DEFAULT_POOL_QUEUE)?,
            shutdown_grace: grace,
        };
        extract_pool.validate(ENV_EXTRACT_POOL_MAX)?;

        let job_pool = PoolConfig {
            core_size: env_parse(ENV_JOB_POOL_CORE, DEFAULT_JOB_POOL_CORE)?,
            max_size: env_parse(ENV_JOB_POOL_MAX, DEFAULT_JOB_POOL_MAX)?,
            queue_capacity: env_parse(ENV_JOB_POOL_QUEUE, DEFAULT_JOB_POOL_QUEUE)?,
            shutdown_grace: grace,
        };
        job_pool.validate(ENV_JOB_POOL_MAX)?;

        let job = JobConfig {
            api_token: env::var(ENV_SCRAPER_API_TOKEN).unwrap_or_default(),
            task_url: env::var(ENV_SCRAPER_TASK_URL)
                .unwrap_or_else(|_| DEFAULT_TASK_URL.to_string()),
            output_base_url: env::var(ENV_SCRAPER_OUTPUT_URL)
                .unwrap_or_else(|_| DEFAULT_OUTPUT_URL.to_string()),
            poll_interval: Duration::from_millis(env_parse(
                ENV_SCRAPER_POLL_INTERVAL_MS,
                DEFAULT_POLL_INTERVAL_MS,
            )?),
            max_poll_attempts: env_parse(ENV_SCRAPER_MAX_POLL_ATTEMPTS, DEFAULT_MAX_POLL_ATTEMPTS)?,
        };
        if job.max_poll_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_SCRAPER_MAX_POLL_ATTEMPTS,
                reason: "must be at least 1".to_string(),
            });
        }

        let cache = CacheConfig {
            ttl: Duration::from_secs(env_parse(ENV_CACHE_TTL_SECS, DEFAULT_CACHE_TTL_SECS)?),
            max_entries: env_parse(ENV_CACHE_MAX_ENTRIES, DEFAULT_CACHE_MAX_ENTRIES)?,
        };

        Ok(Self {
            extract_pool,
            job_pool,
            job,
            cache,
        })
    }
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: format!("{raw:?}: {e}"),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_KEYS: [&str; 14] = [
        ENV_SCRAPER_API_TOKEN,
        ENV_SCRAPER_TASK_URL,
        ENV_SCRAPER_OUTPUT_URL,
        ENV_SCRAPER_POLL_INTERVAL_MS,
        ENV_SCRAPER_MAX_POLL_ATTEMPTS,
        ENV_EXTRACT_POOL_CORE,
        ENV_EXTRACT_POOL_MAX,
        ENV_EXTRACT_POOL_QUEUE,
        ENV_JOB_POOL_CORE,
        ENV_JOB_POOL_MAX,
        ENV_JOB_POOL_QUEUE,
        ENV_POOL_SHUTDOWN_GRACE_SECS,
        ENV_CACHE_TTL_SECS,
        ENV_CACHE_MAX_ENTRIES,
    ];

    fn clear_env() {
        for key in ALL_KEYS {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.extract_pool.core_size, 5);
        assert_eq!(cfg.extract_pool.max_size, 10);
        assert_eq!(cfg.extract_pool.queue_capacity, 500);
        assert_eq!(cfg.job_pool.core_size, 2);
        assert_eq!(cfg.job_pool.max_size, 4);
        assert_eq!(cfg.job_pool.queue_capacity, 100);
        assert_eq!(cfg.job.task_url, DEFAULT_TASK_URL);
        assert_eq!(cfg.job.poll_interval, Duration::from_millis(5_000));
        assert!(cfg.job.api_token.is_empty());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn default_keeps_job_pool_separate() {
        let cfg = Config::default();
        assert_eq!(cfg.job_pool, PoolConfig::job_default());
        assert_ne!(cfg.job_pool, cfg.extract_pool);
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_SCRAPER_API_TOKEN, "tok");
            env::set_var(ENV_SCRAPER_OUTPUT_URL, "http://localhost:9999");
            env::set_var(ENV_SCRAPER_POLL_INTERVAL_MS, "250");
            env::set_var(ENV_JOB_POOL_CORE, "3");
            env::set_var(ENV_JOB_POOL_MAX, "6");
            env::set_var(ENV_CACHE_TTL_SECS, "60");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.job.api_token, "tok");
        assert_eq!(cfg.job.output_base_url, "http://localhost:9999");
        assert_eq!(cfg.job.poll_interval, Duration::from_millis(250));
        assert_eq!(cfg.job_pool.core_size, 3);
        assert_eq!(cfg.job_pool.max_size, 6);
        assert_eq!(cfg.cache.ttl, Duration::from_secs(60));
        clear_env();
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_EXTRACT_POOL_CORE, "five");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_EXTRACT_POOL_CORE));
        clear_env();
    }

    #[test]
    fn rejects_max_below_core() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_EXTRACT_POOL_CORE, "8");
            env::set_var(ENV_EXTRACT_POOL_MAX, "4");
        }
        assert!(Config::from_env().is_err());
        clear_env();
    }
}
