//! Style property name resolution.
//!
//! Authored names (`margin-left`, `box_shadow`) are rewritten to the
//! camel-cased form the style boundary addresses (`marginLeft`,
//! `boxShadow`). When the runtime only supports a vendor prefixed variant
//! of a property, the prefixed name is used instead.
//!
//! The set of supported names is injected once as a [`CapabilityTable`].

use std::collections::{HashMap, HashSet};

use relax_config::CapabilityConfig;

const VENDOR_PREFIXES: [&str; 3] = ["Moz", "webkit", "ms"];

/// Style property names supported by the target runtime.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    supported: HashSet<String>,
    vendor_prefix: Option<String>,
}

impl CapabilityTable {
    /// Build a table from supported camel-cased names.
    ///
    /// The vendor prefix is taken from the first name of the form
    /// `Moz*`, `webkit*` or `ms*` followed by an uppercase letter.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut supported = HashSet::new();
        let mut vendor_prefix = None;
        for name in names {
            let name = name.into();
            if vendor_prefix.is_none() {
                vendor_prefix = detect_vendor_prefix(&name).map(str::to_string);
            }
            supported.insert(name);
        }
        Self {
            supported,
            vendor_prefix,
        }
    }

    pub fn from_config(config: &CapabilityConfig) -> Self {
        Self::new(config.supported_properties.iter().cloned())
    }

    pub fn supports(&self, name: &str) -> bool {
        self.supported.contains(name)
    }

    pub fn vendor_prefix(&self) -> Option<&str> {
        self.vendor_prefix.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
    }
}

fn detect_vendor_prefix(name: &str) -> Option<&'static str> {
    VENDOR_PREFIXES.into_iter().find(|prefix| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
    })
}

/// Convert a `-`/`_` separated name to camel case.
///
/// The first segment is kept as written so already camel-cased names pass
/// through unchanged.
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split(['-', '_']).enumerate() {
        if i == 0 {
            out.push_str(segment);
        } else {
            out.push_str(&capitalize(segment));
        }
    }
    out
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Memoising resolver from authored names to target property names.
#[derive(Debug, Clone, Default)]
pub struct PropertyNames {
    capabilities: CapabilityTable,
    cache: HashMap<String, String>,
}

impl PropertyNames {
    pub fn new(capabilities: CapabilityTable) -> Self {
        Self {
            capabilities,
            cache: HashMap::new(),
        }
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Resolve an authored name. Idempotent: resolving a resolved name returns it unchanged.
    pub fn resolve(&mut self, raw: &str) -> String {
        if let Some(name) = self.cache.get(raw) {
            return name.clone();
        }
        let name = self.resolve_uncached(raw);
        self.cache.insert(raw.to_string(), name.clone());
        name
    }

    fn resolve_uncached(&self, raw: &str) -> String {
        let name = to_camel_case(raw);
        let Some(prefix) = self.capabilities.vendor_prefix() else {
            return name;
        };
        if self.capabilities.supports(&name) {
            return name;
        }
        let prefixed = format!("{}{}", prefix, capitalize(&name));
        if self.capabilities.supports(&prefixed) {
            tracing::debug!(property = %raw, resolved = %prefixed, "using vendor prefixed property");
            prefixed
        } else {
            name
        }
    }
}
