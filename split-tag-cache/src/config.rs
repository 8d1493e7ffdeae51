//! `key=value` configuration for SPLIT-TAG CACHE.

use cache_core::{Geometry, Policy};
use plugin_host::{parse_options, ConfigError};

#[derive(Debug, Clone, Copy)]
pub struct CacheGeometryConfig {
    pub blksize: u64,
    pub assoc: u64,
    pub cachesize: u64,
    pub taglsize: u64,
}

impl CacheGeometryConfig {
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::new(self.blksize, self.assoc, self.cachesize, self.taglsize)
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub l1i: CacheGeometryConfig,
    pub l1d: CacheGeometryConfig,
    pub l2: Option<CacheGeometryConfig>,
    pub cores: usize,
    pub policy: Policy,
    pub magic: bool,
    pub limit: usize,
}

impl CacheConfig {
    /// Parse `args` against the supported `key=value` options. `default_cores`
    /// is the host's vCPU count, used when `cores=` is not supplied.
    pub fn parse(args: &[String], default_cores: usize) -> Result<Self, ConfigError> {
        let mut opts = parse_options(args)?;

        let l1i = CacheGeometryConfig {
            blksize: opts.take_int("iblksize", 64)?,
            assoc: opts.take_int("iassoc", 8)?,
            cachesize: opts.take_int("icachesize", 16384)?,
            taglsize: opts.take_int("itaglsize", 53)?,
        };
        let l1d = CacheGeometryConfig {
            blksize: opts.take_int("dblksize", 64)?,
            assoc: opts.take_int("dassoc", 8)?,
            cachesize: opts.take_int("dcachesize", 16384)?,
            taglsize: opts.take_int("dtaglsize", 53)?,
        };

        let l2_geometry_given = opts.contains("l2blksize")
            || opts.contains("l2assoc")
            || opts.contains("l2cachesize")
            || opts.contains("l2taglsize");
        let l2_geometry = CacheGeometryConfig {
            blksize: opts.take_int("l2blksize", 64)?,
            assoc: opts.take_int("l2assoc", 16)?,
            cachesize: opts.take_int("l2cachesize", 2_097_152)?,
            taglsize: opts.take_int("l2taglsize", 45)?,
        };
        let l2_enabled = opts.take_bool("l2", l2_geometry_given)?;
        let l2 = l2_enabled.then_some(l2_geometry);

        let cores = opts.take_int("cores", default_cores.max(1) as u64)? as usize;
        let replace = opts.take_str("replace").unwrap_or_else(|| "lru".to_string());
        let policy: Policy = replace.parse()?;
        let magic = opts.take_bool("magic", false)?;
        let limit = opts.take_int("limit", 32)? as usize;

        opts.finish()?;

        Ok(CacheConfig {
            l1i,
            l1d,
            l2,
            cores,
            policy,
            magic,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_table() {
        let cfg = CacheConfig::parse(&[], 1).unwrap();
        assert_eq!(cfg.l1i.blksize, 64);
        assert_eq!(cfg.l1i.assoc, 8);
        assert_eq!(cfg.l1i.cachesize, 16384);
        assert_eq!(cfg.l2.is_none(), true);
        assert_eq!(cfg.cores, 1);
        assert_eq!(cfg.limit, 32);
        assert!(!cfg.magic);
    }

    #[test]
    fn any_l2_geometry_key_enables_l2() {
        let cfg = CacheConfig::parse(&["l2assoc=4".to_string()], 1).unwrap();
        assert!(cfg.l2.is_some());
        assert_eq!(cfg.l2.unwrap().assoc, 4);
    }

    #[test]
    fn explicit_l2_false_overrides_implied_enable() {
        let cfg = CacheConfig::parse(
            &["l2assoc=4".to_string(), "l2=false".to_string()],
            1,
        )
        .unwrap();
        assert!(cfg.l2.is_none());
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let err = CacheConfig::parse(&["replace=mru".to_string()], 1);
        assert!(matches!(err, Err(ConfigError::UnknownPolicy(_))));
    }

    #[test]
    fn unrecognized_key_is_an_error() {
        let err = CacheConfig::parse(&["bogus=1".to_string()], 1);
        assert!(matches!(err, Err(ConfigError::UnknownKey(k)) if k == "bogus"));
    }
}
