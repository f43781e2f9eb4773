//! Ad-hoc filtering over the shipment and transport registries.
//!
//! Filters mirror what dispatchers type into the search boxes: free-text id
//! fragments, department codes, relative date windows and postal-code range
//! expressions like `"BE:2700-3500,NL:1000-2000"`. Expressions are parsed
//! leniently; terms that make no sense are dropped rather than rejected.

use time::{Date, Duration};

use super::shipment::Shipment;
use super::store::PlanningStore;
use super::transport::{Transport, TransportStatus};

/// One comma-separated term of a postal expression: an optional country
/// code plus an optional numeric range. Parsing guarantees at least one of
/// the two is present.
#[derive(Clone, Debug, PartialEq, Eq)]
struct PostalTerm {
    country: Option<String>,
    range: Option<(u32, u32)>,
}

impl PostalTerm {
    fn matches(&self, country: &str, postal_code: u32) -> bool {
        if let Some(wanted) = &self.country {
            if !country.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        match self.range {
            Some((min, max)) => (min..=max).contains(&postal_code),
            // A bare country code matches the whole country.
            None => true,
        }
    }
}

/// A parsed postal-code range expression; empty means "match everything".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostalRangeFilter {
    terms: Vec<PostalTerm>,
}

impl PostalRangeFilter {
    /// Parses expressions like `"BE:2700-3500,NL:1000-2000"`, a bare
    /// country code (`"BE"`) or a bare range (`"2700-3500"`). Terms are
    /// ORed together; malformed terms are silently dropped.
    pub fn parse(expression: &str) -> Self {
        let terms = expression
            .split(',')
            .filter_map(|raw| Self::parse_term(raw.trim()))
            .collect();
        Self { terms }
    }

    fn parse_term(raw: &str) -> Option<PostalTerm> {
        if raw.is_empty() {
            return None;
        }
        let (country, range_part) = if let Some((head, tail)) = raw.split_once(':') {
            let country = head.trim().to_uppercase();
            let tail = tail.trim();
            (
                (!country.is_empty()).then_some(country),
                (!tail.is_empty()).then(|| tail.to_string()),
            )
        } else if is_country_code(raw) {
            (Some(raw.to_uppercase()), None)
        } else {
            (None, Some(raw.to_string()))
        };

        let range = match &range_part {
            Some(part) => Some(parse_range(part)?),
            None => None,
        };
        if country.is_none() && range.is_none() {
            return None;
        }
        Some(PostalTerm { country, range })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True if any term matches; an empty filter matches everything.
    pub fn matches(&self, country: &str, postal_code: u32) -> bool {
        self.terms.is_empty() || self.terms.iter().any(|t| t.matches(country, postal_code))
    }
}

/// Country codes are 2-3 letters, nothing else.
fn is_country_code(raw: &str) -> bool {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    !cleaned.is_empty() && cleaned.len() <= 3 && cleaned.chars().all(|c| c.is_ascii_alphabetic())
}

fn parse_range(raw: &str) -> Option<(u32, u32)> {
    let (min, max) = raw.split_once('-')?;
    let min = min.trim().parse().ok()?;
    let max = max.trim().parse().ok()?;
    Some((min, max))
}

/// An inclusive date window anchored at a start date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Date,
    pub end: Date,
}

impl DateWindow {
    /// Builds a window from an anchor date and a signed day count; a
    /// negative count extends the window backwards from the anchor.
    pub fn from_anchor(anchor: Date, range_days: i32) -> Self {
        let shifted = anchor
            .checked_add(Duration::days(range_days as i64))
            .unwrap_or(anchor);
        if range_days >= 0 {
            Self {
                start: anchor,
                end: shifted,
            }
        } else {
            Self {
                start: shifted,
                end: anchor,
            }
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Search criteria over the shipment registry. Default matches everything.
#[derive(Clone, Debug, Default)]
pub struct ShipmentFilter {
    /// `None` means all departments.
    pub department: Option<String>,
    pub unassigned_only: bool,
    pub id_contains: Option<String>,
    pub collection_postal: PostalRangeFilter,
    pub delivery_postal: PostalRangeFilter,
    pub pickup_window: Option<DateWindow>,
}

impl ShipmentFilter {
    pub fn matches(&self, shipment: &Shipment) -> bool {
        if let Some(department) = &self.department {
            if &shipment.department != department {
                return false;
            }
        }
        if self.unassigned_only && shipment.is_assigned() {
            return false;
        }
        if let Some(fragment) = &self.id_contains {
            if !shipment
                .id
                .to_lowercase()
                .contains(&fragment.to_lowercase())
            {
                return false;
            }
        }
        if !self.collection_postal.matches(
            &shipment.collection_country,
            shipment.collection_postal_code,
        ) {
            return false;
        }
        if !self
            .delivery_postal
            .matches(&shipment.delivery_country, shipment.delivery_postal_code)
        {
            return false;
        }
        if let Some(window) = &self.pickup_window {
            if !window.contains(shipment.pickup_date) {
                return false;
            }
        }
        true
    }
}

/// Applies a filter over all registered shipments, sorted by id for stable
/// presentation.
pub fn filter_shipments<'a>(store: &'a PlanningStore, filter: &ShipmentFilter) -> Vec<&'a Shipment> {
    let mut shipments: Vec<&Shipment> = store
        .shipments()
        .filter(|s| filter.matches(s))
        .collect();
    shipments.sort_by(|a, b| a.id.cmp(&b.id));
    shipments
}

/// Search criteria over the transport registry. Postal filters apply to the
/// first and last stop of the route.
#[derive(Clone, Debug, Default)]
pub struct TransportFilter {
    pub department: Option<String>,
    pub id_contains: Option<String>,
    pub first_stop_postal: PostalRangeFilter,
    pub last_stop_postal: PostalRangeFilter,
    pub pickup_window: Option<DateWindow>,
    /// Restrict to transports still in planning (the dispatch board view).
    pub planning_only: bool,
}

impl TransportFilter {
    pub fn matches(&self, store: &PlanningStore, transport: &Transport) -> bool {
        if let Some(department) = &self.department {
            if &transport.department != department {
                return false;
            }
        }
        if self.planning_only && transport.status != TransportStatus::Planning {
            return false;
        }
        if let Some(fragment) = &self.id_contains {
            if !transport
                .id
                .to_lowercase()
                .contains(&fragment.to_lowercase())
            {
                return false;
            }
        }
        if !self.first_stop_postal.is_empty() {
            let matched = transport
                .first_stop_id()
                .and_then(|sid| store.stop(sid))
                .map(|stop| self.first_stop_postal.matches(&stop.country, stop.postal_code));
            if matched != Some(true) {
                return false;
            }
        }
        if !self.last_stop_postal.is_empty() {
            let matched = transport
                .last_stop_id()
                .and_then(|sid| store.stop(sid))
                .map(|stop| self.last_stop_postal.matches(&stop.country, stop.postal_code));
            if matched != Some(true) {
                return false;
            }
        }
        if let Some(window) = &self.pickup_window {
            if !window.contains(transport.pickup_date) {
                return false;
            }
        }
        true
    }
}

/// Applies a filter over all registered transports, sorted by id.
pub fn filter_transports<'a>(
    store: &'a PlanningStore,
    filter: &TransportFilter,
) -> Vec<&'a Transport> {
    let mut transports: Vec<&Transport> = store
        .transports()
        .filter(|t| filter.matches(store, t))
        .collect();
    transports.sort_by(|a, b| a.id.cmp(&b.id));
    transports
}
