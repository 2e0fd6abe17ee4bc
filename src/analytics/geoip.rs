//! GeoIP lookup using a MaxMind GeoLite2/GeoIP2 City MMDB.
//!
//! The database is optional: without one, every click carries "unknown"
//! geo hints and the rest of the pipeline is unaffected.

use anyhow::{Context, Result};
use maxminddb::{geoip2, Mmap, Reader};
use std::net::IpAddr;
use std::sync::Arc;

use crate::analytics::models::GeoHints;

pub struct GeoIpService {
    city_reader: Option<Arc<Reader<Mmap>>>,
}

impl GeoIpService {
    /// Create a new GeoIP service, memory-mapping the City database when a
    /// path is configured.
    pub fn new(city_path: Option<&str>) -> Result<Self> {
        let city_reader = if let Some(path) = city_path {
            let reader = unsafe { Reader::open_mmap(path) }
                .with_context(|| format!("Failed to open GeoIP City database at {}", path))?;
            Some(Arc::new(reader))
        } else {
            None
        };

        Ok(Self { city_reader })
    }

    /// Lookup geo hints for an IP address. Misses and absent databases both
    /// yield the "unknown" defaults.
    pub fn lookup(&self, ip: IpAddr) -> GeoHints {
        let mut hints = GeoHints::default();

        if let Some(ref reader) = self.city_reader {
            if let Ok(result) = reader.lookup(ip) {
                if let Ok(Some(city)) = result.decode::<geoip2::City>() {
                    if let Some(code) = city.country.iso_code {
                        hints.country = code.to_string();
                    }
                    if let Some(name) = city.city.names.english {
                        hints.city = name.to_string();
                    }
                    if let Some(subdivision) = city.subdivisions.first() {
                        if let Some(name) = subdivision.names.english {
                            hints.region = name.to_string();
                        }
                    }
                }
            }
        }

        hints
    }
}

impl Clone for GeoIpService {
    fn clone(&self) -> Self {
        Self {
            city_reader: self.city_reader.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_fails_on_invalid_path() {
        assert!(GeoIpService::new(Some("/nonexistent/path.mmdb")).is_err());
    }

    #[test]
    fn no_database_yields_unknown_hints() {
        let service = GeoIpService::new(None).unwrap();
        let hints = service.lookup("8.8.8.8".parse().unwrap());
        assert_eq!(hints.country, "unknown");
        assert_eq!(hints.city, "unknown");
        assert_eq!(hints.region, "unknown");
    }
}
