//! Namespaces the mapping writes into.

use oxiri::Iri;

use crate::Error;

/// Base of every IRI minted for activities, codelists and predicates.
pub const IATI_NAMESPACE: &str = "http://purl.org/collections/iati/";

/// Base for `owl:sameAs` links of GeoNames gazetteer entries.
pub const GEONAMES_BASE: &str = "http://sws.geonames.org/";

/// Read-only settings shared by every activity in a conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    namespace: String,
    custom_namespace: String,
    geonames_base: String,
}

impl Config {
    /// Uses `namespace` instead of [`IATI_NAMESPACE`]. It must be an absolute
    /// IRI; it is used as a plain string prefix, so it normally ends in `/`
    /// or `#`.
    pub fn new(namespace: impl Into<String>) -> Result<Self, Error> {
        let namespace = validate(namespace.into())?;
        Ok(Self {
            custom_namespace: format!("{namespace}custom/"),
            namespace,
            geonames_base: GEONAMES_BASE.to_string(),
        })
    }

    pub fn with_geonames_base(mut self, base: impl Into<String>) -> Result<Self, Error> {
        self.geonames_base = validate(base.into())?;
        Ok(self)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Namespace for attribute predicates invented by the fallback walker.
    pub fn custom_namespace(&self) -> &str {
        &self.custom_namespace
    }

    pub fn geonames_base(&self) -> &str {
        &self.geonames_base
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: IATI_NAMESPACE.to_string(),
            custom_namespace: format!("{IATI_NAMESPACE}custom/"),
            geonames_base: GEONAMES_BASE.to_string(),
        }
    }
}

fn validate(iri: String) -> Result<String, Error> {
    Iri::parse(iri.clone())
        .map(Iri::into_inner)
        .map_err(|source| Error::IriParseError { source, iri })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_iati_namespace() {
        let config = Config::default();
        assert_eq!(config.namespace(), IATI_NAMESPACE);
        assert_eq!(
            config.custom_namespace(),
            "http://purl.org/collections/iati/custom/"
        );
        assert_eq!(config, Config::new(IATI_NAMESPACE).unwrap());
    }

    #[test]
    fn relative_namespace_is_rejected() {
        let err = Config::new("not an iri").unwrap_err();
        assert!(matches!(err, Error::IriParseError { iri, .. } if iri == "not an iri"));
    }
}
