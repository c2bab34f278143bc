//! Zone remapping rules.
//!
//! A [`ZoneMapping`] ties the zone this node serves (`from_zone`) to the
//! backend zone queries are rewritten into (`to_zone`). All names are kept in
//! canonical form: lowercase and fully qualified.

use crate::errors::DomainError;

/// Lowercases `name` and appends the root label if it is missing.
pub fn canonical_name(name: &str) -> String {
    let mut name = name.trim().to_ascii_lowercase();
    if !name.ends_with('.') {
        name.push('.');
    }
    name
}

/// Returns `true` when `child` equals `parent` or sits below it.
///
/// Both names are expected in canonical form. The root zone contains every
/// name.
pub fn is_subdomain(parent: &str, child: &str) -> bool {
    if parent == "." {
        return true;
    }
    child == parent
        || child
            .strip_suffix(parent)
            .is_some_and(ends_at_label_boundary)
}

/// True when `prefix` ends with a dot that separates labels, as opposed to
/// an escaped dot (`\.`) inside a label.
fn ends_at_label_boundary(prefix: &str) -> bool {
    let Some(rest) = prefix.strip_suffix('.') else {
        return false;
    };
    rest.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 0
}

/// Label difference between `from` and a parent zone `to`.
///
/// When `from` ends with `"." + to` the leading part is returned, so that
/// `diff + to == from` (`dev.corp.net.` / `corp.net.` gives `dev.`). The
/// match has to land on a label boundary; anything else yields an empty
/// string.
pub fn compute_zone_diff(from: &str, to: &str) -> String {
    match from.strip_suffix(to) {
        Some(diff) if ends_at_label_boundary(diff) => diff.to_string(),
        _ => String::new(),
    }
}

/// Splits a presentation-format name into labels. Escaped characters,
/// `\.` included, stay inside their label.
fn split_labels(name: &str) -> Vec<&str> {
    let mut labels = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, b) in name.bytes().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'.' => {
                if i > start {
                    labels.push(&name[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < name.len() {
        labels.push(&name[start..]);
    }
    labels
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMapping {
    from_zone: String,
    to_zone: String,
    zone_diff: String,
    prefix_len: usize,
}

impl ZoneMapping {
    pub fn new(from_zone: &str, to_zone: &str, prefix_len: usize) -> Result<Self, DomainError> {
        if from_zone.trim().is_empty() {
            return Err(DomainError::ZoneConfiguration(
                "serving zone cannot be empty".to_string(),
            ));
        }
        if to_zone.trim().is_empty() {
            return Err(DomainError::ZoneConfiguration(
                "'to_zone' parameter is required".to_string(),
            ));
        }
        if prefix_len < 1 {
            return Err(DomainError::ZoneConfiguration(format!(
                "prefix_len can't be less than 1: {}",
                prefix_len
            )));
        }

        let from_zone = canonical_name(from_zone);
        let to_zone = canonical_name(to_zone);

        if is_subdomain(&from_zone, &to_zone) {
            return Err(DomainError::ZoneConfiguration(
                "'to_zone' cannot be equal to or be a child of serving zone".to_string(),
            ));
        }

        let zone_diff = compute_zone_diff(&from_zone, &to_zone);

        Ok(Self {
            from_zone,
            to_zone,
            zone_diff,
            prefix_len,
        })
    }

    pub fn from_zone(&self) -> &str {
        &self.from_zone
    }

    pub fn to_zone(&self) -> &str {
        &self.to_zone
    }

    pub fn zone_diff(&self) -> &str {
        &self.zone_diff
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Whether `qname` belongs to the served zone.
    pub fn serves(&self, qname: &str) -> bool {
        is_subdomain(&self.from_zone, &canonical_name(qname))
    }

    /// Maps a query name under `from_zone` to the name asked of the backend.
    ///
    /// The labels in front of the served zone are stripped, the `prefix_len`
    /// labels closest to the zone cut are kept and `to_zone` is appended. A
    /// prefix that already ends with the zone diff means the query has been
    /// through the backend zone once, which fails with
    /// [`DomainError::LoopDetected`].
    pub fn derive_lookup_name(&self, qname: &str) -> Result<String, DomainError> {
        let qname = canonical_name(qname);
        let prefix = if self.from_zone == "." {
            qname.as_str()
        } else if qname == self.from_zone {
            ""
        } else {
            qname
                .strip_suffix(&self.from_zone)
                .filter(|prefix| ends_at_label_boundary(prefix))
                .ok_or_else(|| {
                    DomainError::InvalidDomainName(format!(
                        "{} is not within zone {}",
                        qname, self.from_zone
                    ))
                })?
        };

        if self.is_loop(prefix) {
            return Err(DomainError::LoopDetected);
        }

        let labels = split_labels(prefix);
        let keep = self.prefix_len.min(labels.len());
        let kept = &labels[labels.len() - keep..];

        if kept.is_empty() {
            Ok(self.to_zone.clone())
        } else {
            Ok(format!("{}.{}", kept.join("."), self.to_zone))
        }
    }

    fn is_loop(&self, prefix: &str) -> bool {
        if self.zone_diff.is_empty() {
            return false;
        }
        prefix == self.zone_diff
            || prefix
                .strip_suffix(&self.zone_diff)
                .is_some_and(ends_at_label_boundary)
    }
}
