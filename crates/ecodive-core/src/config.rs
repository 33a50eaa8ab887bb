//! Dispatch configuration

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable consulted by [`DispatchConfig::from_env`]
pub const THREADS_ENV: &str = "ECODIVE_NUM_THREADS";

/// Work-unit count below which calls always run on the calling thread
pub const DEFAULT_MIN_PARALLEL_UNITS: usize = 100;

/// Controls how many workers a call may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Requested worker count; `1` forces single-threaded execution
    pub threads: usize,
    /// Minimum number of work units before workers are spawned
    pub min_parallel_units: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get().max(1),
            min_parallel_units: DEFAULT_MIN_PARALLEL_UNITS,
        }
    }
}

impl DispatchConfig {
    /// Single-threaded configuration
    pub fn sequential() -> Self {
        Self {
            threads: 1,
            ..Self::default()
        }
    }

    /// Set the requested worker count (`0` is treated as `1`)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Set the parallel threshold
    pub fn with_min_parallel_units(mut self, units: usize) -> Self {
        self.min_parallel_units = units;
        self
    }

    /// Default configuration with the thread count overridden by
    /// `ECODIVE_NUM_THREADS` when set.
    pub fn from_env() -> Result<Self> {
        match std::env::var(THREADS_ENV) {
            Ok(raw) => {
                let threads = raw.trim().parse::<usize>().map_err(|e| {
                    Error::InvalidParameter(format!("{THREADS_ENV}='{raw}': {e}"))
                })?;
                Ok(Self::default().with_threads(threads))
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Number of workers that would be used for `units` work units
    pub fn workers_for(&self, units: usize) -> usize {
        if cfg!(feature = "parallel") && self.threads > 1 && units >= self.min_parallel_units {
            self.threads.min(units)
        } else {
            1
        }
    }
}

/// Whether multithreading is compiled in, and how many CPUs are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parallelism {
    pub multithreaded: bool,
    pub cpus: usize,
}

/// Report the parallel capabilities of this build
pub fn available_parallelism() -> Parallelism {
    Parallelism {
        multithreaded: cfg!(feature = "parallel"),
        cpus: num_cpus::get(),
    }
}
