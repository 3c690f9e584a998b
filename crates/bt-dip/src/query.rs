//! Listing query parameters
//!
//! Every listing request asks for exactly one record, newest first.

/// DIP resource path for plenary protocols
pub const PLENARY_PROTOCOL_RESOURCE: &str = "plenarprotokoll";

/// Sort order: descending by date
pub const SORT_DATE_DESC: &str = "-datum";

/// Number of records requested per listing
pub const LATEST_LIMIT: u32 = 1;

/// Query for the most recent record of a DIP resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    resource: &'static str,
    /// Parliament chamber filter (`BT` = Bundestag)
    zuordnung: &'static str,
}

impl ListingQuery {
    /// Latest Bundestag plenary protocol
    pub fn latest_plenary_protocol() -> Self {
        Self {
            resource: PLENARY_PROTOCOL_RESOURCE,
            zuordnung: "BT",
        }
    }

    /// Resource path segment, appended to the base URL
    pub fn resource(&self) -> &str {
        self.resource
    }

    /// Query pairs in the order they are sent
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("f.zuordnung", self.zuordnung.to_string()),
            ("format", "json".to_string()),
            ("sort", SORT_DATE_DESC.to_string()),
            ("limit", LATEST_LIMIT.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_query_requests_single_newest_record() {
        let params = ListingQuery::latest_plenary_protocol().params();
        assert!(params.contains(&("limit", "1".to_string())));
        assert!(params.contains(&("sort", "-datum".to_string())));
        assert!(params.contains(&("f.zuordnung", "BT".to_string())));
    }

    #[test]
    fn latest_query_targets_plenary_protocols() {
        assert_eq!(ListingQuery::latest_plenary_protocol().resource(), "plenarprotokoll");
    }
}
