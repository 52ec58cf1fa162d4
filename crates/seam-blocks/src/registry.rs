use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::BlocksConfig;
use crate::types::{AIR, BlockId};

pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Resolves configured identifiers to block ids.
pub trait TypeRegistry {
    fn resolve_type_id(&self, identifier: &str) -> Option<BlockId>;
}

/// Dense id -> name table with a name index. Id 0 is always `<ns>:air`.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    names: Vec<Option<String>>,
    by_name: HashMap<String, BlockId>,
    default_namespace: String,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }

    fn with_namespace(ns: &str) -> Self {
        let mut reg = Self {
            names: Vec::new(),
            by_name: HashMap::new(),
            default_namespace: ns.to_string(),
        };
        let air = reg.qualify("air");
        reg.names.push(Some(air.clone()));
        reg.by_name.insert(air, AIR);
        reg
    }

    /// Registers `names` in order, assigning ids 1.. after air.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut reg = Self::new();
        for n in names {
            let qualified = reg.qualify(n.as_ref());
            if reg.by_name.contains_key(&qualified) {
                continue;
            }
            let id = reg.names.len() as BlockId;
            reg.names.push(Some(qualified.clone()));
            reg.by_name.insert(qualified, id);
        }
        reg
    }

    pub fn from_configs(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let ns = cfg
            .default_namespace
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE)
            .to_string();
        let mut reg = Self::with_namespace(&ns);
        let mut next: BlockId = 1;
        for def in cfg.blocks {
            let name = reg.qualify(&def.name);
            if name == reg.qualify("air") {
                if def.id.is_some_and(|id| id != AIR) {
                    return Err(format!("'{name}' must keep id 0").into());
                }
                continue;
            }
            let id = def.id.unwrap_or(next);
            if id == AIR {
                return Err(format!("id 0 is reserved for air, got '{name}'").into());
            }
            if reg.by_name.contains_key(&name) {
                return Err(format!("duplicate block name '{name}'").into());
            }
            let slot = id as usize;
            if reg.names.len() <= slot {
                reg.names.resize(slot + 1, None);
            }
            if let Some(existing) = &reg.names[slot] {
                return Err(format!("block id {id} used by both '{existing}' and '{name}'").into());
            }
            reg.names[slot] = Some(name.clone());
            reg.by_name.insert(name, id);
            next = next.max(id.saturating_add(1));
        }
        Ok(reg)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_configs(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Adds `ns:path` when `identifier` has no namespace.
    pub fn qualify(&self, identifier: &str) -> String {
        let ident = identifier.trim();
        if ident.contains(':') {
            ident.to_string()
        } else {
            format!("{}:{}", self.default_namespace, ident)
        }
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(&self.qualify(name)).copied()
    }

    pub fn name_of(&self, id: BlockId) -> Option<&str> {
        self.names.get(id as usize).and_then(|n| n.as_deref())
    }

    /// One past the highest registered id.
    #[inline]
    pub fn id_bound(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl TypeRegistry for BlockRegistry {
    fn resolve_type_id(&self, identifier: &str) -> Option<BlockId> {
        self.id_by_name(identifier)
    }
}
