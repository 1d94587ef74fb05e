use rustc_hash::FxHashMap;

use compact_str::CompactString;

use super::Level;

/// Per-target level filters in `RUST_LOG` syntax.
///
/// Entries are comma separated and either a bare level, which sets the base level,
/// or `target=level`. A target matches itself and every module below it.
#[derive(Clone, Debug)]
pub struct Filters {
    targets: FxHashMap<CompactString, Level>,
    base: Level,
}

impl Default for Filters {

    fn default() -> Self {
        Self {
            targets: FxHashMap::default(),
            base: Level::Error,
        }
    }
}

impl Filters {

    pub fn from_env() -> Self {
        match std::env::var("RUST_LOG") {
            Ok(spec) => Self::parse(&spec),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(spec: &str) -> Self {
        let mut filters = Self::default();
        for arg in spec.split(',') {
            let (target, level) = match arg.split_once('=') {
                Some((target, level)) => (Some(target.trim()), level.trim()),
                None => (None, arg.trim()),
            };
            let Ok(level) = level.parse::<Level>() else {
                continue
            };
            match target {
                Some(target) if !target.is_empty() => {
                    let entry = filters.targets
                        .entry(CompactString::new(target))
                        .or_insert(level);
                    *entry = (*entry).min(level);
                },
                _ => filters.base = level,
            }
        }
        filters
    }

    #[inline(always)]
    pub fn base_level(&self) -> Level {
        self.base
    }

    pub fn level_for(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.targets.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[..i];
            if let Some(&level) = self.targets.get(substr) {
                return level
            }
        }
        self.base
    }

    #[inline(always)]
    pub fn enabled(&self, target: &str, level: Level) -> bool {
        level <= self.level_for(target)
    }
}
