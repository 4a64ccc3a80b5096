//! Parsing of wheel core metadata (`*.dist-info/METADATA`).
//!
//! Only the header block is read: parsing stops at the first blank line,
//! where the long description begins. The fields kept are the ones the
//! verifier checks: `Name`, `Version`, `Provides-Extra`, and `Requires-Dist`.

use log::trace;

/// A single `Requires-Dist` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Distribution name exactly as written.
    pub name: String,
    /// Environment marker after `;`, if any.
    pub marker: Option<String>,
}

impl Requirement {
    /// Parse the value of a `Requires-Dist` header.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_verifier::metadata::Requirement;
    ///
    /// let req = Requirement::parse("mloda-community-example-a==0.5.0; extra == \"all\"");
    /// assert_eq!(req.name, "mloda-community-example-a");
    /// assert!(req.is_for_extra("all"));
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let (spec, marker) = match value.split_once(';') {
            Some((spec, marker)) => (spec, Some(marker.trim().to_owned())),
            None => (value, None),
        };
        let name: String = spec
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            .collect();

        Self {
            name,
            marker: marker.filter(|m| !m.is_empty()),
        }
    }

    /// Whether this requirement names `package` (compared after normalisation).
    #[must_use]
    pub fn names(&self, package: &str) -> bool {
        normalize_name(&self.name) == normalize_name(package)
    }

    /// Whether the marker restricts this requirement to `extra`.
    #[must_use]
    pub fn is_for_extra(&self, extra: &str) -> bool {
        self.marker.as_deref().is_some_and(|marker| {
            let compact: String = marker.chars().filter(|c| !c.is_whitespace()).collect();
            compact.contains(&format!("extra==\"{extra}\""))
                || compact.contains(&format!("extra=='{extra}'"))
        })
    }

    /// Whether the requirement applies without the consumer opting into an extra.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.marker
            .as_deref()
            .is_none_or(|marker| !marker.contains("extra"))
    }
}

/// The header fields of a wheel's core metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreMetadata {
    /// The `Name` header.
    pub name: Option<String>,
    /// The `Version` header.
    pub version: Option<String>,
    /// Every `Provides-Extra` value.
    pub provides_extra: Vec<String>,
    /// Every `Requires-Dist` entry.
    pub requires_dist: Vec<Requirement>,
}

impl CoreMetadata {
    /// Parse METADATA text.
    ///
    /// Unknown headers and continuation lines are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_verifier::metadata::CoreMetadata;
    ///
    /// let meta = CoreMetadata::parse("Metadata-Version: 2.1\nName: mloda-testing\nVersion: 0.5.0\n");
    /// assert_eq!(meta.version.as_deref(), Some("0.5.0"));
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut metadata = Self::default();

        for line in text.lines() {
            if line.trim().is_empty() {
                break;
            }
            if line.starts_with([' ', '\t']) {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                trace!("ignoring malformed metadata line: {line}");
                continue;
            };
            let field = value.trim();
            match key.trim() {
                "Name" => metadata.name = Some(field.to_owned()),
                "Version" => metadata.version = Some(field.to_owned()),
                "Provides-Extra" => metadata.provides_extra.push(field.to_owned()),
                "Requires-Dist" => metadata.requires_dist.push(Requirement::parse(field)),
                _ => {}
            }
        }

        metadata
    }

    /// Whether the `Version` header equals `expected`.
    #[must_use]
    pub fn declares_version(&self, expected: &str) -> bool {
        self.version.as_deref() == Some(expected)
    }

    /// Whether `extra` appears among the `Provides-Extra` headers.
    #[must_use]
    pub fn provides_extra(&self, extra: &str) -> bool {
        self.provides_extra.iter().any(|e| e == extra)
    }

    /// Whether `package` is required when the consumer requests `extra`.
    #[must_use]
    pub fn requires_under_extra(&self, package: &str, extra: &str) -> bool {
        self.requires_dist
            .iter()
            .any(|req| req.names(package) && req.is_for_extra(extra))
    }

    /// Whether `package` is required unconditionally.
    #[must_use]
    pub fn requires_unconditionally(&self, package: &str) -> bool {
        self.requires_dist
            .iter()
            .any(|req| req.names(package) && req.is_unconditional())
    }
}

/// Normalise a distribution name: lowercase, with runs of `-`, `_`, and `.`
/// collapsed to a single `-`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }

    normalized
}
